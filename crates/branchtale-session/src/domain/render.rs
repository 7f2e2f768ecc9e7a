//! Rendering session state into presentation payloads.
//!
//! Rendering is a pure function of the session state and its catalog entry.

use std::fmt::Write as _;
use std::time::Duration;

use branchtale_content::domain::catalog::{GameCatalog, GameInfo};
use branchtale_content::domain::graph::RoomRef;
use branchtale_core::error::DomainError;
use branchtale_core::presentation::Payload;

use super::state::{ChoiceRecord, SessionState};
use super::visibility;

/// Glyph that restarts a finished story.
pub const REPLAY_GLYPH: &str = "🔄";

/// Glyph that shows or hides the choice log in an ending.
pub const LOG_GLYPH: &str = "📖";

/// Line shown in place of an option the player cannot pick yet.
pub const LOCKED_OPTION_LINE: &str = "🔒 ***This option is locked***";

/// Notice attached to a surface when the player ran out of time.
pub const TIMEOUT_NOTICE: &str = "⏰ You took too long to make a choice! The game has ended. :(";

/// A payload plus the glyphs to offer with it, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// Surface content.
    pub payload: Payload,
    /// Selectable glyphs.
    pub affordances: Vec<String>,
}

/// Footer shown while a choice is pending.
#[must_use]
pub fn timeout_hint(timeout: Duration) -> String {
    format!(
        "⏳ Hint: time is running out! You must make a choice within {} seconds.",
        timeout.as_secs()
    )
}

/// Renders the current state of a session.
///
/// # Errors
///
/// Returns `DomainError::Validation` if the current room is missing from
/// the graph.
pub fn render_state(state: &SessionState, info: &GameInfo) -> Result<Rendered, DomainError> {
    let room = state.current_room()?;
    let accent = info.accent();

    let rendered = match room {
        RoomRef::Ending(_) if state.is_showing_log() => Rendered {
            payload: Payload {
                author_line: format!("{LOG_GLYPH} Game Log"),
                body: format_log(state.choice_log(), &info.name),
                picture_ref: None,
                footer: format!(
                    "✨ Thanks for playing {}!\n - use {REPLAY_GLYPH} to play again.\n",
                    info.name
                ),
                accent,
            },
            affordances: vec![REPLAY_GLYPH.to_owned()],
        },
        RoomRef::Ending(ending) => Rendered {
            payload: Payload {
                author_line: format!("Game ended! {}", ending.glyph),
                body: ending.text.clone(),
                picture_ref: None,
                footer: format!(
                    "✨ Thanks for playing {}!\n - use {REPLAY_GLYPH} to play again.\n - use {LOG_GLYPH} to see the choices you made",
                    info.name
                ),
                accent,
            },
            affordances: vec![REPLAY_GLYPH.to_owned(), LOG_GLYPH.to_owned()],
        },
        RoomRef::Regular(_) => {
            let visible = visibility::visible(room, state.effects());
            Rendered {
                payload: Payload {
                    author_line: info.name.clone(),
                    body: format_room(room, state.effects()),
                    picture_ref: room.picture().map(str::to_owned),
                    footer: timeout_hint(info.timeout()),
                    accent,
                },
                affordances: visible.iter().map(|option| option.glyph.clone()).collect(),
            }
        }
    };

    Ok(rendered)
}

/// Room text followed by one line per option, locked options in place.
#[must_use]
pub fn format_room(room: RoomRef<'_>, effects: &[String]) -> String {
    let lines: Vec<String> = room
        .options()
        .iter()
        .map(|option| {
            if visibility::is_visible(option, effects) {
                format!("{} {}", option.glyph, option.text)
            } else {
                LOCKED_OPTION_LINE.to_owned()
            }
        })
        .collect();

    format!("{}\n\n{}", room.text(), lines.join("\n"))
}

/// Game name in bold followed by the numbered choice log.
#[must_use]
pub fn format_log(choices: &[ChoiceRecord], game_name: &str) -> String {
    let mut body = format!("**{game_name}**\n");
    let lines: Vec<String> = choices
        .iter()
        .enumerate()
        .map(|(index, record)| {
            let mut line = format!("{}. {} {}", index + 1, record.option.glyph, record.option.text);
            if let Some(effect) = &record.option.grants_effect {
                let _ = write!(line, " (Effect: {effect})");
            }
            line
        })
        .collect();
    body.push_str(&lines.join("\n"));
    body
}

/// The "available games" listing.
#[must_use]
pub fn render_catalog(catalog: &GameCatalog) -> Payload {
    let body = catalog
        .list_all()
        .iter()
        .enumerate()
        .map(|(index, game)| {
            format!(
                "{}. **{}** (`{}`)\n*{}*",
                index + 1,
                game.name,
                game.id,
                game.description
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    Payload {
        author_line: "📋 Available Games".to_owned(),
        body,
        picture_ref: None,
        footer: "💡 Hint: use `.adventure [game_code]` or `.adventure [index]` to start a game."
            .to_owned(),
        accent: None,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use branchtale_test_support::{FixedClock, PIGS_GAME_ID, pigs_graph, sample_catalog};

    fn pigs_session() -> (SessionState, GameInfo) {
        let info = sample_catalog().get(PIGS_GAME_ID).unwrap().clone();
        let state = SessionState::new(PIGS_GAME_ID, Arc::new(pigs_graph()), &FixedClock::default());
        (state, info)
    }

    fn play(state: &mut SessionState, glyphs: &[&str]) {
        let clock = FixedClock::default();
        for glyph in glyphs {
            let index = state.visible_index_of(glyph).unwrap();
            state.apply_choice(index, &clock).unwrap();
        }
    }

    #[test]
    fn test_start_room_renders_all_options_and_timeout_footer() {
        // Arrange
        let (state, info) = pigs_session();

        // Act
        let rendered = render_state(&state, &info).unwrap();

        // Assert
        assert_eq!(
            rendered.payload.body,
            "A wolf is on the prowl! You are one of the three little pigs. Choose your starting action:\n\n\
             🌾 Build a Straw House\n\
             🪵 Build a Stick House\n\
             🧱 Build a Brick House"
        );
        assert_eq!(rendered.payload.body.matches('\n').count(), 4);
        assert_eq!(
            rendered.payload.footer,
            "⏳ Hint: time is running out! You must make a choice within 30 seconds."
        );
        assert_eq!(rendered.payload.author_line, "Three Little Pigs");
        assert_eq!(rendered.payload.picture_ref.as_deref(), Some("three_little_pigs.jpeg"));
        assert_eq!(rendered.payload.accent, Some(0x00FF_C0CB));
        assert_eq!(rendered.affordances, ["🌾", "🪵", "🧱"]);
    }

    #[test]
    fn test_locked_options_keep_their_position() {
        let (mut state, info) = pigs_session();
        play(&mut state, &["🧱"]);

        let rendered = render_state(&state, &info).unwrap();

        assert_eq!(
            rendered.payload.body,
            "Safe behind brick walls, you hear claws scraping across the roof.\n\n\
             🔥 Light the fireplace\n\
             🔒 ***This option is locked***\n\
             🔒 ***This option is locked***"
        );
        assert_eq!(rendered.affordances, ["🔥"]);
    }

    #[test]
    fn test_ending_renders_replay_and_log_affordances() {
        let (mut state, info) = pigs_session();
        play(&mut state, &["🌾", "🙏"]);

        let rendered = render_state(&state, &info).unwrap();

        assert_eq!(rendered.payload.author_line, "Game ended! 🐺");
        assert_eq!(
            rendered.payload.body,
            "The wolf huffs, and puffs, and has pork for dinner."
        );
        assert_eq!(
            rendered.payload.footer,
            "✨ Thanks for playing Three Little Pigs!\n - use 🔄 to play again.\n - use 📖 to see the choices you made"
        );
        assert_eq!(rendered.affordances, [REPLAY_GLYPH, LOG_GLYPH]);
        assert_eq!(rendered.payload.picture_ref, None);
    }

    #[test]
    fn test_log_view_lists_choices_with_effects() {
        // Arrange
        let (mut state, info) = pigs_session();
        play(&mut state, &["🧱", "🔥", "↩️", "🍲"]);
        state.toggle_log().unwrap();

        // Act
        let rendered = render_state(&state, &info).unwrap();

        // Assert
        assert_eq!(rendered.payload.author_line, "📖 Game Log");
        assert_eq!(
            rendered.payload.body,
            "**Three Little Pigs**\n\
             1. 🧱 Build a Brick House (Effect: sturdy_walls)\n\
             2. 🔥 Light the fireplace (Effect: fire_lit)\n\
             3. ↩️ Go back to the main room\n\
             4. 🍲 Hang a pot of water over the fire"
        );
        assert_eq!(
            rendered.payload.footer,
            "✨ Thanks for playing Three Little Pigs!\n - use 🔄 to play again.\n"
        );
        assert_eq!(rendered.affordances, [REPLAY_GLYPH]);
    }

    #[test]
    fn test_toggling_log_twice_restores_ending_body() {
        let (mut state, info) = pigs_session();
        play(&mut state, &["🌾", "🙏"]);
        let before = render_state(&state, &info).unwrap();

        state.toggle_log().unwrap();
        state.toggle_log().unwrap();
        let after = render_state(&state, &info).unwrap();

        assert_eq!(before, after);
    }

    #[test]
    fn test_catalog_listing_numbers_games_from_one() {
        let payload = render_catalog(&sample_catalog());

        assert_eq!(payload.author_line, "📋 Available Games");
        assert!(payload.body.starts_with(
            "1. **Three Little Pigs** (`three_little_pigs`)\n*A wolf is on the prowl.*\n\n2. **The Fork**"
        ));
        assert!(payload.body.contains("3. **Lost Story** (`lost_story`)"));
        assert_eq!(
            payload.footer,
            "💡 Hint: use `.adventure [game_code]` or `.adventure [index]` to start a game."
        );
    }
}
