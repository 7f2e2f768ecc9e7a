//! Per-player session state.
//!
//! A `SessionState` tracks where the player is in a shared, immutable
//! [`GameGraph`]. Path, effects and choice log only ever grow; replaying a
//! story means building a fresh `SessionState`.

use std::sync::Arc;

use branchtale_content::domain::graph::{GameGraph, RoomOption, RoomRef, START_ROOM_ID};
use branchtale_core::clock::Clock;
use branchtale_core::error::DomainError;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::visibility;

/// Where a session is in its lifecycle.
///
/// `Ending` and `EndingShowingLog` are derived from the kind of the current
/// room; no explicit transition call moves a session into them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// In a regular room, waiting for a choice.
    Active,
    /// In an ending room.
    Ending,
    /// In an ending room with the choice log displayed.
    EndingShowingLog,
    /// Stopped; no further input is accepted.
    Stopped,
}

/// One entry of the choice log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceRecord {
    /// The option that was picked.
    pub option: RoomOption,
    /// When it was picked.
    pub chosen_at: DateTime<Utc>,
}

/// Mutable progress of one player through one story.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Session identifier, for tracing.
    id: Uuid,
    game_id: String,
    graph: Arc<GameGraph>,
    current_room_id: String,
    path: Vec<String>,
    effects: Vec<String>,
    choice_log: Vec<ChoiceRecord>,
    showing_log: bool,
    stopped: bool,
    started_at: DateTime<Utc>,
}

impl SessionState {
    /// Creates a fresh session at the start room.
    #[must_use]
    pub fn new(game_id: impl Into<String>, graph: Arc<GameGraph>, clock: &dyn Clock) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id: game_id.into(),
            graph,
            current_room_id: START_ROOM_ID.to_owned(),
            path: vec![START_ROOM_ID.to_owned()],
            effects: Vec::new(),
            choice_log: Vec::new(),
            showing_log: false,
            stopped: false,
            started_at: clock.now(),
        }
    }

    /// Session identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The game this session plays.
    #[must_use]
    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    /// The story graph this session is bound to.
    #[must_use]
    pub fn graph(&self) -> &Arc<GameGraph> {
        &self.graph
    }

    /// Id of the current room.
    #[must_use]
    pub fn current_room_id(&self) -> &str {
        &self.current_room_id
    }

    /// Rooms visited so far, starting with `start`.
    #[must_use]
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Effects granted so far, in the order they were granted.
    #[must_use]
    pub fn effects(&self) -> &[String] {
        &self.effects
    }

    /// Choices made so far.
    #[must_use]
    pub fn choice_log(&self) -> &[ChoiceRecord] {
        &self.choice_log
    }

    /// When the session started.
    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// The current room.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the current room id does not
    /// resolve, which can only happen with a graph that skipped validation.
    pub fn current_room(&self) -> Result<RoomRef<'_>, DomainError> {
        self.graph.room(&self.current_room_id).ok_or_else(|| {
            DomainError::Validation(format!(
                "room `{}` missing from game `{}`",
                self.current_room_id, self.game_id
            ))
        })
    }

    /// Whether the current room is an ending.
    #[must_use]
    pub fn is_in_ending_room(&self) -> bool {
        self.current_room().is_ok_and(RoomRef::is_ending)
    }

    /// Whether the choice log is displayed. Only ever true in an ending.
    #[must_use]
    pub fn is_showing_log(&self) -> bool {
        self.showing_log && self.is_in_ending_room()
    }

    /// Whether the session has been stopped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// The current lifecycle phase.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        if self.stopped {
            SessionPhase::Stopped
        } else if self.is_showing_log() {
            SessionPhase::EndingShowingLog
        } else if self.is_in_ending_room() {
            SessionPhase::Ending
        } else {
            SessionPhase::Active
        }
    }

    /// Every option of the current room, locked or not.
    #[must_use]
    pub fn all_options(&self) -> &[RoomOption] {
        match self.current_room() {
            Ok(room) => room.options(),
            Err(_) => &[],
        }
    }

    /// The selectable options of the current room.
    #[must_use]
    pub fn visible_options(&self) -> Vec<&RoomOption> {
        self.current_room()
            .map(|room| visibility::visible(room, &self.effects))
            .unwrap_or_default()
    }

    /// Position of `glyph` in the visible option list.
    #[must_use]
    pub fn visible_index_of(&self, glyph: &str) -> Option<usize> {
        self.visible_options()
            .iter()
            .position(|option| option.glyph == glyph)
    }

    /// Picks the option at `index` of the *visible* option list.
    ///
    /// Moves to the option's target room, appends it to the path, records the
    /// choice and collects the granted effect, if any.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidChoice` if the session is not active or
    /// `index` does not address a visible option, and
    /// `DomainError::Validation` if the option leads to a room missing from
    /// the graph. The state is unchanged on error.
    pub fn apply_choice(&mut self, index: usize, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.phase() != SessionPhase::Active {
            return Err(DomainError::InvalidChoice(format!(
                "session is not accepting choices ({:?})",
                self.phase()
            )));
        }

        let visible = self.visible_options();
        let chosen = visible
            .get(index)
            .map(|&option| option.clone())
            .ok_or_else(|| {
                DomainError::InvalidChoice(format!(
                    "index {index} out of range for {} visible options",
                    visible.len()
                ))
            })?;

        if !self.graph.contains(&chosen.target_room_id) {
            return Err(DomainError::Validation(format!(
                "option `{}` leads to unknown room `{}`",
                chosen.text, chosen.target_room_id
            )));
        }

        self.current_room_id.clone_from(&chosen.target_room_id);
        self.path.push(chosen.target_room_id.clone());
        if let Some(effect) = &chosen.grants_effect {
            self.effects.push(effect.clone());
        }
        self.choice_log.push(ChoiceRecord {
            option: chosen,
            chosen_at: clock.now(),
        });

        Ok(())
    }

    /// Shows or hides the choice log and returns the new setting.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidChoice` unless the session is in an
    /// ending room and not stopped.
    pub fn toggle_log(&mut self) -> Result<bool, DomainError> {
        if self.stopped || !self.is_in_ending_room() {
            return Err(DomainError::InvalidChoice(
                "the log is only available in an ending".to_owned(),
            ));
        }
        self.showing_log = !self.showing_log;
        Ok(self.showing_log)
    }

    /// Stops the session. Returns `false` if it was already stopped.
    pub fn stop(&mut self) -> bool {
        !std::mem::replace(&mut self.stopped, true)
    }
}
