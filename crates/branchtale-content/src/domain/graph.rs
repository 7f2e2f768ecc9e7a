//! Immutable story graphs.
//!
//! A graph has exactly one `start` room plus any number of other rooms,
//! each either a regular room with ordered options or an ending. The JSON
//! shape mirrors the story files under `resources/adventures`.

use std::collections::{BTreeMap, HashSet};

use branchtale_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Id of the room every session starts in.
pub const START_ROOM_ID: &str = "start";

/// A selectable transition out of a room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomOption {
    /// Option label.
    pub text: String,
    /// Room this option leads to.
    #[serde(rename = "leads_to")]
    pub target_room_id: String,
    /// Glyph the player selects to pick this option.
    #[serde(rename = "emoji")]
    pub glyph: String,
    /// Effect the player must hold for this option to be visible.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requires_effect: Option<String>,
    /// Effect that hides this option once the player holds it.
    #[serde(
        rename = "effect_restricts",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub restricts_effect: Option<String>,
    /// Effect granted when this option is picked.
    #[serde(rename = "effect", default, skip_serializing_if = "Option::is_none")]
    pub grants_effect: Option<String>,
}

/// A regular room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    /// Narrative text.
    pub text: String,
    /// Picture file name, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    /// Options in rendering order.
    pub options: Vec<RoomOption>,
}

/// Marker for the `"type": "end"` key of an ending room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EndingKind {
    /// The only ending kind.
    #[serde(rename = "end")]
    End,
}

/// A terminal room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndingRoom {
    /// Narrative text.
    pub text: String,
    /// Always [`EndingKind::End`].
    #[serde(rename = "type")]
    pub kind: EndingKind,
    /// Glyph shown next to "Game ended!".
    #[serde(rename = "emoji")]
    pub glyph: String,
}

/// A room in `other_rooms`: regular or ending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RoomVariant {
    /// An ending room (`"type": "end"`).
    Ending(EndingRoom),
    /// A regular room.
    Regular(Room),
}

/// Borrowed view of any room in a graph, including `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomRef<'a> {
    /// A regular room.
    Regular(&'a Room),
    /// An ending room.
    Ending(&'a EndingRoom),
}

impl<'a> RoomRef<'a> {
    /// Narrative text of the room.
    #[must_use]
    pub fn text(self) -> &'a str {
        match self {
            Self::Regular(room) => &room.text,
            Self::Ending(ending) => &ending.text,
        }
    }

    /// Picture reference; endings never carry one.
    #[must_use]
    pub fn picture(self) -> Option<&'a str> {
        match self {
            Self::Regular(room) => room.picture.as_deref(),
            Self::Ending(_) => None,
        }
    }

    /// All options in order; empty for endings.
    #[must_use]
    pub fn options(self) -> &'a [RoomOption] {
        match self {
            Self::Regular(room) => &room.options,
            Self::Ending(_) => &[],
        }
    }

    /// Whether this is an ending room.
    #[must_use]
    pub fn is_ending(self) -> bool {
        matches!(self, Self::Ending(_))
    }
}

/// Parsed story graph of one adventure. Shared read-only between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameGraph {
    /// The start room.
    pub start: Room,
    /// Every other room, keyed by id.
    pub other_rooms: BTreeMap<String, RoomVariant>,
}

impl GameGraph {
    /// Parses and validates a story file.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Infrastructure` if the JSON does not match the
    /// story shape, and `DomainError::Validation` if the graph is
    /// inconsistent (see [`GameGraph::validate`]).
    pub fn from_json(source: &str) -> Result<Self, DomainError> {
        let graph: Self = serde_json::from_str(source)
            .map_err(|e| DomainError::Infrastructure(format!("story parse failed: {e}")))?;
        graph.validate()?;
        Ok(graph)
    }

    /// Looks up a room by id.
    #[must_use]
    pub fn room(&self, id: &str) -> Option<RoomRef<'_>> {
        if id == START_ROOM_ID {
            return Some(RoomRef::Regular(&self.start));
        }
        self.other_rooms.get(id).map(|variant| match variant {
            RoomVariant::Regular(room) => RoomRef::Regular(room),
            RoomVariant::Ending(ending) => RoomRef::Ending(ending),
        })
    }

    /// Whether `id` names a room in this graph.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.room(id).is_some()
    }

    /// Checks the graph's referential invariants.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if `other_rooms` redefines the start
    /// room, an option leads to an unknown room, or two options in one room
    /// share a glyph.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.other_rooms.contains_key(START_ROOM_ID) {
            return Err(DomainError::Validation(
                "`other_rooms` must not define a second `start` room".to_owned(),
            ));
        }

        let regular_rooms = std::iter::once((START_ROOM_ID, &self.start)).chain(
            self.other_rooms
                .iter()
                .filter_map(|(id, variant)| match variant {
                    RoomVariant::Regular(room) => Some((id.as_str(), room)),
                    RoomVariant::Ending(_) => None,
                }),
        );

        for (room_id, room) in regular_rooms {
            let mut glyphs = HashSet::with_capacity(room.options.len());
            for option in &room.options {
                if !self.contains(&option.target_room_id) {
                    return Err(DomainError::Validation(format!(
                        "option `{}` in room `{room_id}` leads to unknown room `{}`",
                        option.text, option.target_room_id
                    )));
                }
                if !glyphs.insert(option.glyph.as_str()) {
                    return Err(DomainError::Validation(format!(
                        "glyph {} is used twice in room `{room_id}`",
                        option.glyph
                    )));
                }
            }
        }

        Ok(())
    }
}
