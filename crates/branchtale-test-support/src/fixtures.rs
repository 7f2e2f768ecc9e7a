//! Story fixtures.

use std::collections::BTreeMap;

use branchtale_content::domain::catalog::{GameCatalog, GameInfo};
use branchtale_content::domain::graph::{EndingKind, EndingRoom, GameGraph, Room, RoomOption, RoomVariant};

/// Id of the three little pigs story.
pub const PIGS_GAME_ID: &str = "three_little_pigs";

const PIGS_STORY: &str = include_str!("../../../resources/adventures/three_little_pigs.json");

/// A three-game catalog: the pigs story, a two-option story and a game
/// whose story file does not exist.
///
/// # Panics
///
/// Never; the fixture ids are unique.
#[must_use]
pub fn sample_catalog() -> GameCatalog {
    GameCatalog::new(vec![
        GameInfo {
            id: PIGS_GAME_ID.to_owned(),
            name: "Three Little Pigs".to_owned(),
            description: "A wolf is on the prowl.".to_owned(),
            color: "0xFFC0CB".to_owned(),
            timeout_seconds: 30,
        },
        GameInfo {
            id: "fork".to_owned(),
            name: "The Fork".to_owned(),
            description: "Three roads, three endings.".to_owned(),
            color: "0x00FF00".to_owned(),
            timeout_seconds: 10,
        },
        GameInfo {
            id: "lost_story".to_owned(),
            name: "Lost Story".to_owned(),
            description: "Catalogued, but nobody wrote it.".to_owned(),
            color: "0x000000".to_owned(),
            timeout_seconds: 30,
        },
    ])
    .unwrap()
}

/// The shipped three little pigs story.
///
/// # Panics
///
/// Panics if the shipped story file is invalid.
#[must_use]
pub fn pigs_graph() -> GameGraph {
    GameGraph::from_json(PIGS_STORY).unwrap()
}

/// A start room with options A, B and C, each leading to its own ending.
/// C grants the effect `"lucky"`.
#[must_use]
pub fn three_option_graph() -> GameGraph {
    let option = |label: &str, glyph: &str| RoomOption {
        text: format!("Take road {label}"),
        target_room_id: format!("end_{}", label.to_lowercase()),
        glyph: glyph.to_owned(),
        requires_effect: None,
        restricts_effect: None,
        grants_effect: None,
    };
    let mut c = option("C", "🇨");
    c.grants_effect = Some("lucky".to_owned());

    let other_rooms: BTreeMap<String, RoomVariant> = ["a", "b", "c"]
        .into_iter()
        .map(|label| {
            (
                format!("end_{label}"),
                RoomVariant::Ending(EndingRoom {
                    text: format!("Road {label} ends here."),
                    kind: EndingKind::End,
                    glyph: "🏁".to_owned(),
                }),
            )
        })
        .collect();

    GameGraph {
        start: Room {
            text: "Three roads meet.".to_owned(),
            picture: None,
            options: vec![option("A", "🇦"), option("B", "🇧"), c],
        },
        other_rooms,
    }
}
