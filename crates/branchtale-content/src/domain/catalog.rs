//! The catalog of available adventures.

use std::collections::HashMap;
use std::time::Duration;

use branchtale_core::error::DomainError;
use serde::{Deserialize, Serialize};

/// Catalog entry for one adventure, as declared in `available_games.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameInfo {
    /// Unique game identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// One-line description shown in the listing.
    pub description: String,
    /// Accent colour as a hex string (`"0xFF5733"`, `"#FF5733"` or `"FF5733"`).
    pub color: String,
    /// Seconds the player has to make each choice.
    #[serde(rename = "time")]
    pub timeout_seconds: u64,
}

impl GameInfo {
    /// Returns the accent colour, or `None` if `color` is not valid hex.
    #[must_use]
    pub fn accent(&self) -> Option<u32> {
        let digits = self
            .color
            .trim()
            .trim_start_matches("0x")
            .trim_start_matches("0X")
            .trim_start_matches('#');
        u32::from_str_radix(digits, 16).ok()
    }

    /// Returns the per-choice timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

/// Reduces a raw selector to a bare token, dropping any path structure.
///
/// `"../../etc/passwd"` becomes `"passwd"`; `"."` and `".."` become empty.
#[must_use]
pub fn sanitize_selector(selector: &str) -> String {
    let token = selector
        .trim()
        .rsplit(['/', '\\'])
        .find(|segment| !segment.is_empty())
        .unwrap_or_default();

    if matches!(token, "." | "..") {
        String::new()
    } else {
        token.to_owned()
    }
}

/// Ordered, id-indexed set of available adventures.
#[derive(Debug, Clone, Default)]
pub struct GameCatalog {
    games: Vec<GameInfo>,
    by_id: HashMap<String, usize>,
}

impl GameCatalog {
    /// Builds a catalog, preserving declaration order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if two entries share an id.
    pub fn new(games: Vec<GameInfo>) -> Result<Self, DomainError> {
        let mut by_id = HashMap::with_capacity(games.len());
        for (position, game) in games.iter().enumerate() {
            if by_id.insert(game.id.clone(), position).is_some() {
                return Err(DomainError::Validation(format!(
                    "duplicate game id `{}` in catalog",
                    game.id
                )));
            }
        }
        Ok(Self { games, by_id })
    }

    /// Resolves a selector to a game id.
    ///
    /// A sanitized token that parses as a 1-based position within the
    /// catalog maps to the id at that position; anything else is returned
    /// unchanged as a literal id candidate. Existence is not checked here.
    #[must_use]
    pub fn resolve(&self, selector: &str) -> String {
        let token = sanitize_selector(selector);
        match token.parse::<usize>() {
            Ok(index) if (1..=self.games.len()).contains(&index) => {
                self.games[index - 1].id.clone()
            }
            _ => token,
        }
    }

    /// Looks up a game by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&GameInfo> {
        self.by_id.get(id).map(|&position| &self.games[position])
    }

    /// All games in declaration order.
    #[must_use]
    pub fn list_all(&self) -> &[GameInfo] {
        &self.games
    }

    /// Number of games in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.games.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game(id: &str) -> GameInfo {
        GameInfo {
            id: id.to_owned(),
            name: id.to_uppercase(),
            description: format!("{id} description"),
            color: "0xFF5733".to_owned(),
            timeout_seconds: 30,
        }
    }

    fn three_game_catalog() -> GameCatalog {
        GameCatalog::new(vec![
            game("three_little_pigs"),
            game("sleeping_dragon"),
            game("haunted_mill"),
        ])
        .unwrap()
    }

    #[test]
    fn test_resolve_index_one_returns_first_game() {
        let catalog = three_game_catalog();

        assert_eq!(catalog.resolve("1"), "three_little_pigs");
        assert_eq!(catalog.resolve("3"), "haunted_mill");
    }

    #[test]
    fn test_resolve_out_of_range_index_returns_token_unchanged() {
        let catalog = three_game_catalog();

        assert_eq!(catalog.resolve("999"), "999");
        assert_eq!(catalog.resolve("0"), "0");
        assert_eq!(catalog.resolve("-1"), "-1");
    }

    #[test]
    fn test_resolve_literal_id_is_returned_unchanged() {
        let catalog = three_game_catalog();

        assert_eq!(catalog.resolve("sleeping_dragon"), "sleeping_dragon");
        assert_eq!(catalog.resolve("no_game"), "no_game");
    }

    #[test]
    fn test_resolve_strips_path_structure() {
        let catalog = three_game_catalog();

        assert_eq!(catalog.resolve("../../secrets/haunted_mill"), "haunted_mill");
        assert_eq!(catalog.resolve("stories/2"), "sleeping_dragon");
        assert_eq!(catalog.resolve(r"..\..\boot"), "boot");
    }

    #[test]
    fn test_sanitize_selector_rejects_dot_segments() {
        assert_eq!(sanitize_selector(".."), "");
        assert_eq!(sanitize_selector("a/.."), "");
        assert_eq!(sanitize_selector("a/b/"), "b");
        assert_eq!(sanitize_selector("  pigs  "), "pigs");
    }

    #[test]
    fn test_resolve_index_on_empty_catalog_is_literal() {
        let catalog = GameCatalog::default();

        assert_eq!(catalog.resolve("1"), "1");
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_new_rejects_duplicate_ids() {
        let result = GameCatalog::new(vec![game("a"), game("b"), game("a")]);

        assert!(matches!(result, Err(DomainError::Validation(_))));
    }

    #[test]
    fn test_list_all_preserves_declaration_order() {
        let catalog = three_game_catalog();

        let ids: Vec<&str> = catalog.list_all().iter().map(|g| g.id.as_str()).collect();

        assert_eq!(ids, ["three_little_pigs", "sleeping_dragon", "haunted_mill"]);
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get("haunted_mill").unwrap().name, "HAUNTED_MILL");
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_accent_accepts_common_hex_spellings() {
        let mut info = game("x");
        assert_eq!(info.accent(), Some(0x00FF_5733));

        info.color = "#00ff00".to_owned();
        assert_eq!(info.accent(), Some(0x0000_FF00));

        info.color = "not a colour".to_owned();
        assert_eq!(info.accent(), None);
    }

    #[test]
    fn test_game_info_deserializes_catalog_keys() {
        let json = r#"{"id":"pigs","name":"Pigs","description":"d","color":"0x1","time":45}"#;

        let info: GameInfo = serde_json::from_str(json).unwrap();

        assert_eq!(info.timeout(), Duration::from_secs(45));
    }
}
