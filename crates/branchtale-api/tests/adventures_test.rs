//! Integration tests for the adventure commands.

mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn test_list_adventures_numbers_games_from_one() {
    let app = common::build_test_app(common::build_test_state());

    let (status, json) = common::get_json(app, "/api/v1/adventures").await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|game| game["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, ["three_little_pigs", "fork", "lost_story"]);
    assert_eq!(json[2]["index"], 3);
}

#[tokio::test]
async fn test_start_without_selector_renders_listing_surface() {
    // Arrange
    let state = common::build_test_state();
    let app = common::build_test_app(state.clone());

    // Act
    let (status, json) = common::post_json(
        app.clone(),
        "/api/v1/adventures",
        &serde_json::json!({ "user_id": common::PLAYER }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["session"], false);
    let surface = json["surface"].as_str().unwrap();
    let (status, view) = common::get_json(app, &format!("/api/v1/surfaces/{surface}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["payload"]["author_line"], "📋 Available Games");
    assert!(
        view["payload"]["body"]
            .as_str()
            .unwrap()
            .starts_with("1. **Three Little Pigs** (`three_little_pigs`)")
    );
    assert!(common::affordances(&view).is_empty());
    assert!(state.registry.is_empty());
}

#[tokio::test]
async fn test_start_by_index_renders_start_room() {
    // Arrange
    let state = common::build_test_state();
    let app = common::build_test_app(state.clone());

    // Act
    let (status, json) = common::post_json(
        app,
        "/api/v1/adventures",
        &serde_json::json!({ "user_id": common::PLAYER, "selector": " `1` " }),
    )
    .await;

    // Assert
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["session"], true);
    let view = &json["view"];
    assert_eq!(view["payload"]["author_line"], "Three Little Pigs");
    assert_eq!(view["payload"]["picture_ref"], "three_little_pigs.jpeg");
    assert_eq!(
        view["payload"]["footer"],
        "⏳ Hint: time is running out! You must make a choice within 30 seconds."
    );
    assert_eq!(common::affordances(view), ["🌾", "🪵", "🧱"]);
    assert_eq!(state.registry.len(), 1);
}

#[tokio::test]
async fn test_start_out_of_range_index_returns_game_not_found() {
    let app = common::build_test_app(common::build_test_state());

    let (status, json) = common::post_json(
        app,
        "/api/v1/adventures",
        &serde_json::json!({ "user_id": common::PLAYER, "selector": "999" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "game_not_found");
    assert_eq!(json["message"], "Game code `999` not found.");
}

#[tokio::test]
async fn test_start_path_like_selector_is_reduced_to_bare_token() {
    let app = common::build_test_app(common::build_test_state());

    let (status, json) = common::post_json(
        app,
        "/api/v1/adventures",
        &serde_json::json!({ "user_id": common::PLAYER, "selector": "../../secrets/fork" }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["view"]["payload"]["author_line"], "The Fork");
}

#[tokio::test]
async fn test_start_catalogued_game_without_story_returns_game_not_found() {
    let app = common::build_test_app(common::build_test_state());

    let (status, json) = common::post_json(
        app,
        "/api/v1/adventures",
        &serde_json::json!({ "user_id": common::PLAYER, "selector": "lost_story" }),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Game code `lost_story` not found.");
}
