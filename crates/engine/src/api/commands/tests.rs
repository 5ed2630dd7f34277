use serde_json::{json, Value};

use gamenight_shared::{Command, CommandFailure, CommandResponse, ErrorKind};

use super::dispatch;
use crate::app::App;
use crate::config::EngineConfig;
use crate::use_cases::test_support::Harness;

async fn app() -> (App, Harness) {
    let h = Harness::empty().await;
    let app = App::new(
        &EngineConfig::default(),
        h.store.clone(),
        h.clock.port(),
        h.terrain.clone(),
    );
    (app, h)
}

async fn run(app: &App, command: Value) -> Result<CommandResponse, CommandFailure> {
    let command: Command = serde_json::from_value(command).unwrap();
    dispatch(app, command).await
}

async fn ok(app: &App, command: Value) -> CommandResponse {
    run(app, command).await.unwrap()
}

async fn fail(app: &App, command: Value) -> CommandFailure {
    run(app, command).await.unwrap_err()
}

/// Session with Kira (viewer mira) and bot-held Renn.
async fn session() -> (App, Harness) {
    let (app, h) = app().await;
    ok(
        &app,
        json!({"command": "init", "adventureId": "escape-from-mos-eisley", "botCharacters": ["Kira", "Renn"]}),
    )
    .await;
    ok(
        &app,
        json!({"command": "join", "viewerId": "mira", "character": "Kira"}),
    )
    .await;
    (app, h)
}

async fn combat(app: &App) {
    ok(
        app,
        json!({"command": "initiative", "characters": ["Kira", "Stormtrooper"], "timeoutSeconds": 120}),
    )
    .await;
}

#[tokio::test]
async fn wrong_viewer_in_combat_is_not_your_turn() {
    let (app, h) = session().await;
    combat(&app).await;
    let before = h.snapshot().await;

    let failure = fail(
        &app,
        json!({"command": "log-action", "viewerId": "Renn", "character": "Kira", "text": "fires"}),
    )
    .await;

    assert_eq!(failure.kind, ErrorKind::NotYourTurn);
    assert_eq!(failure.details.unwrap()["current"], "Kira");
    assert_eq!(h.snapshot().await, before);
}

#[tokio::test]
async fn expired_turn_counts_a_skip() {
    let (app, h) = session().await;
    combat(&app).await;
    h.clock.advance(121);

    let response = ok(&app, json!({"command": "auto-advance"})).await;

    let CommandResponse::AutoAdvanced {
        advanced,
        turn,
        skipped,
        ..
    } = response
    else {
        panic!("expected auto_advanced");
    };
    assert!(advanced);
    assert_eq!(turn.unwrap().current, "Stormtrooper");
    let skipped = skipped.unwrap();
    assert_eq!(skipped.character, "Kira");
    assert_eq!(skipped.skip_count, 1);
    assert!(!skipped.became_afk);
}

#[tokio::test]
async fn auto_advance_before_deadline_reports_timer() {
    let (app, h) = session().await;
    combat(&app).await;
    h.clock.advance(20);

    let response = ok(&app, json!({"command": "auto-advance"})).await;

    assert_eq!(response.summary(), "Kira's turn: 100s left");
}

#[tokio::test]
async fn transfer_follows_the_exit() {
    let (app, _h) = session().await;
    ok(
        &app,
        json!({"command": "move-token", "character": "Kira", "map": "cantina.svg", "position": "bar-stool-l3"}),
    )
    .await;

    let response = ok(
        &app,
        json!({"command": "transfer-token", "character": "Kira", "toMap": "streets.svg"}),
    )
    .await;

    let CommandResponse::TokenTransferred {
        token,
        from_map,
        resolved_via,
        ..
    } = response
    else {
        panic!("expected token_transferred");
    };
    assert_eq!(token.position.as_str(), "cantina-door");
    assert_eq!(from_map, "cantina.svg");
    assert!(resolved_via.ends_with(":entrance"));
}

#[tokio::test]
async fn unknown_position_lists_valid_ones() {
    let (app, h) = session().await;
    ok(
        &app,
        json!({"command": "move-token", "character": "Kira", "map": "cantina.svg", "position": "entrance"}),
    )
    .await;

    let failure = fail(
        &app,
        json!({"command": "move-token", "character": "Kira", "map": "cantina.svg", "position": "nonexistent-spot"}),
    )
    .await;

    assert_eq!(failure.kind, ErrorKind::UnknownPosition);
    let valid = failure.details.unwrap()["valid"].clone();
    assert!(valid.as_array().unwrap().contains(&json!("entrance")));
    let snapshot = h.snapshot().await;
    assert_eq!(snapshot.tokens().len(), 1);
    assert_eq!(snapshot.tokens()[0].position.as_str(), "entrance");
}

#[tokio::test]
async fn narrator_acts_during_cutscene() {
    let (app, _h) = session().await;
    ok(&app, json!({"command": "set-mode", "mode": "cutscene"})).await;

    let failure = fail(
        &app,
        json!({"command": "log-action", "viewerId": "mira", "character": "Kira", "text": "Wait!"}),
    )
    .await;
    assert_eq!(failure.kind, ErrorKind::NarratorOnly);

    let response = ok(
        &app,
        json!({"command": "log-action", "viewerId": "gm", "character": "Vader", "text": "Impressive.", "kind": "say"}),
    )
    .await;
    assert_eq!(response.summary(), "Vader: Impressive.");
}

#[tokio::test]
async fn malformed_arguments_are_validation_errors() {
    let (app, _h) = session().await;

    for command in [
        json!({"command": "set-mode", "mode": "battle"}),
        json!({"command": "join", "viewerId": "bot", "character": "Kira"}),
        json!({"command": "move-token", "character": "Kira", "map": "../etc/passwd", "position": "x"}),
        json!({"command": "log-action", "viewerId": "mira", "character": "Kira", "text": "hi", "kind": "shout"}),
        json!({"command": "wound", "character": "Kira", "level": 9}),
    ] {
        let failure = fail(&app, command).await;
        assert_eq!(failure.kind, ErrorKind::ValidationError, "{}", failure.message);
    }
}

#[tokio::test]
async fn commands_need_a_session() {
    let (app, _h) = app().await;

    let failure = fail(&app, json!({"command": "next-turn"})).await;
    assert_eq!(failure.kind, ErrorKind::ValidationError);

    let CommandResponse::Status(status) = ok(&app, json!({"command": "status"})).await else {
        panic!("expected status");
    };
    assert!(status.session.is_none());
}

#[tokio::test]
async fn ended_session_rejects_changes() {
    let (app, _h) = session().await;

    let response = ok(&app, json!({"command": "end-session", "canon": true})).await;
    let CommandResponse::SessionEnded { session, archived_to } = response else {
        panic!("expected session_ended");
    };
    assert!(session.canon);
    assert!(std::path::Path::new(&archived_to).exists());

    let failure = fail(
        &app,
        json!({"command": "join", "viewerId": "ola", "character": "Renn"}),
    )
    .await;
    assert_eq!(failure.kind, ErrorKind::ValidationError);
}

#[tokio::test]
async fn points_and_wounds_round_trip_through_status() {
    let (app, _h) = session().await;
    ok(&app, json!({"command": "award-cp", "character": "Kira", "points": 2})).await;
    ok(&app, json!({"command": "spend-cp", "character": "Kira"})).await;
    ok(&app, json!({"command": "wound", "character": "Kira", "level": 2})).await;

    let CommandResponse::Status(status) = ok(&app, json!({"command": "status"})).await else {
        panic!("expected status");
    };
    let kira = status
        .participants
        .iter()
        .find(|p| p.character_name().as_str() == "Kira")
        .unwrap();
    assert_eq!(kira.character_points(), 6);
    assert_eq!(kira.wound_level(), gamenight_domain::WoundLevel::Wounded);
}

#[tokio::test]
async fn narrator_cannot_take_a_character() {
    let h = Harness::empty().await;
    let config = EngineConfig {
        narrator_id: "gm".to_string(),
        ..Default::default()
    };
    let app = App::new(&config, h.store.clone(), h.clock.port(), h.terrain.clone());
    ok(
        &app,
        json!({"command": "init", "adventureId": "escape-from-mos-eisley", "botCharacters": ["Kira"]}),
    )
    .await;

    let failure = fail(
        &app,
        json!({"command": "join", "viewerId": "GM", "character": "Kira"}),
    )
    .await;

    assert_eq!(failure.kind, ErrorKind::ValidationError);
    assert!(h
        .snapshot()
        .await
        .participant(&gamenight_domain::CharacterName::new("Kira").unwrap())
        .unwrap()
        .controller()
        .is_bot());
}

#[tokio::test]
async fn camera_follows_the_party_into_and_out_of_combat() {
    let (app, h) = session().await;
    ok(&app, json!({"command": "set-map", "image": "cantina.svg"})).await;
    ok(
        &app,
        json!({"command": "move-token", "character": "Kira", "map": "cantina", "position": "booth-1"}),
    )
    .await;
    ok(
        &app,
        json!({"command": "move-token", "character": "Renn", "map": "cantina.svg", "position": "bar-stool-l3"}),
    )
    .await;

    let response = ok(&app, json!({"command": "set-camera", "followParty": true})).await;
    assert_eq!(response.summary(), "Camera: party (260, 210) zoom 1");

    combat(&app).await;
    let camera = h.snapshot().await.camera().cloned().unwrap();
    assert_eq!(camera.zoom, gamenight_domain::Zoom::COMBAT);

    ok(&app, json!({"command": "end-combat"})).await;
    let CommandResponse::Status(status) = ok(&app, json!({"command": "status"})).await else {
        panic!("expected status");
    };
    let camera = status.camera.unwrap();
    assert_eq!(camera.zoom, gamenight_domain::Zoom::FIT);
    assert_eq!((camera.x, camera.y), (260, 210));

    let failure = fail(&app, json!({"command": "set-camera", "x": 100})).await;
    assert_eq!(failure.kind, ErrorKind::ValidationError);
    let failure = fail(&app, json!({"command": "set-camera", "preset": "vault"})).await;
    assert_eq!(failure.kind, ErrorKind::ValidationError);
}
