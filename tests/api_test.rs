//! Integration tests for the HTTP API.
//!
//! Requires the server to be running on localhost:8000 with a fresh database.
//! Run with `cargo test --test api_test -- --ignored`.

mod common;

use serde_json::{json, Value};

/// Create → fetch → render a project with one overlay.
#[tokio::test]
#[ignore]
async fn project_lifecycle_and_render() {
    let client = common::client();

    // ── Create ──────────────────────────────────────────────────────
    let body = common::create_sample_project(&client).await;
    assert_eq!(body["project"]["title"], "Alice vs Bob");
    assert_eq!(body["moves"].as_array().unwrap().len(), 3);
    assert_eq!(body["moves"][0]["notation"], "e4");
    assert_eq!(body["moves"][2]["index"], 3);

    let project_id = body["project"]["id"].as_i64().unwrap();
    let first_move = body["moves"][0]["id"].as_i64().unwrap();

    // ── Overlay ─────────────────────────────────────────────────────
    let meme_id = common::create_meme(&client, &format!("surprised_{}", common::unique_suffix()), 3000).await;
    let resp = client
        .post(common::url(&format!("/api/moves/{first_move}/overlays")))
        .json(&json!({ "square": "e4", "memeClipId": meme_id, "startOffsetMs": 500 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200, "Overlay creation should succeed");

    // ── Fetch ───────────────────────────────────────────────────────
    let resp = client
        .get(common::url(&format!("/api/projects/{project_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["moves"][0]["overlays"][0]["square"], "e4");

    // ── Render ──────────────────────────────────────────────────────
    let resp = client
        .get(common::url(&format!("/api/projects/{project_id}/render")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["plan"]["totalFrames"], 180);
    assert_eq!(body["plan"]["moves"][1]["window"]["startFrame"], 60);
    assert_eq!(body["plan"]["moves"][0]["overlays"][0]["overlayWindow"]["startFrame"], 15);
    assert_eq!(body["outputPath"], format!("renders/{project_id}/final.mp4"));

    // ── Delete ──────────────────────────────────────────────────────
    let resp = client
        .delete(common::url(&format!("/api/projects/{project_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .get(common::url(&format!("/api/projects/{project_id}")))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

/// Changing a move's duration shifts every later window.
#[tokio::test]
#[ignore]
async fn move_duration_edit_shifts_timeline() {
    let client = common::client();
    let body = common::create_sample_project(&client).await;
    let project_id = body["project"]["id"].as_i64().unwrap();
    let first_move = body["moves"][0]["id"].as_i64().unwrap();

    let resp = client
        .patch(common::url(&format!("/api/moves/{first_move}")))
        .json(&json!({ "durationMs": 1000 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["durationMs"], 1000);

    let body: Value = client
        .get(common::url(&format!("/api/projects/{project_id}/render")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["plan"]["moves"][1]["window"]["startFrame"], 30);
    assert_eq!(body["plan"]["totalFrames"], 150);
}

/// A move edit naming an unknown sound is rejected as a whole.
#[tokio::test]
#[ignore]
async fn rejected_move_edit_changes_nothing() {
    let client = common::client();
    let body = common::create_sample_project(&client).await;
    let project_id = body["project"]["id"].as_i64().unwrap();
    let first_move = body["moves"][0]["id"].as_i64().unwrap();

    let resp = client
        .patch(common::url(&format!("/api/moves/{first_move}")))
        .json(&json!({ "durationMs": 500, "transitionSoundId": i64::MAX }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404, "Unknown sound should be a missing asset");

    let moves: Vec<Value> = client
        .get(common::url(&format!("/api/projects/{project_id}/moves")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(moves[0]["durationMs"], 2000, "Duration must be unchanged");
    assert!(moves[0]["transitionSoundId"].is_null());
}

/// Overlays of an unknown move are a 404, like moves of an unknown project.
#[tokio::test]
#[ignore]
async fn unknown_parents_are_not_found() {
    let client = common::client();

    let resp = client
        .get(common::url(&format!("/api/moves/{}/overlays", i64::MAX)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    let resp = client
        .get(common::url(&format!("/api/projects/{}/moves", i64::MAX)))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
#[ignore]
async fn invalid_pgn_is_rejected() {
    let client = common::client();

    let resp = client
        .post(common::url("/api/projects"))
        .json(&json!({ "pgn": "1. e4 e5 2. Ke3" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert!(
        body["detail"].as_str().unwrap().contains("Invalid PGN format"),
        "got {:?}",
        body["detail"]
    );

    let resp = client
        .post(common::url("/api/projects"))
        .json(&json!({ "pgn": "[Event \"Empty\"]\n\n*" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["detail"], "PGN contains no moves");
}

#[tokio::test]
#[ignore]
async fn overlay_on_bad_square_or_missing_meme_fails() {
    let client = common::client();
    let body = common::create_sample_project(&client).await;
    let first_move = body["moves"][0]["id"].as_i64().unwrap();

    let resp = client
        .post(common::url(&format!("/api/moves/{first_move}/overlays")))
        .json(&json!({ "square": "i9", "memeClipId": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400, "Off-board square should be rejected");

    let resp = client
        .post(common::url(&format!("/api/moves/{first_move}/overlays")))
        .json(&json!({ "square": "e4", "memeClipId": i64::MAX }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404, "Unknown meme should be a missing asset");
}

/// Only one transition sound is the default at any time.
#[tokio::test]
#[ignore]
async fn single_default_sound() {
    let client = common::client();
    let suffix = common::unique_suffix();

    let mut ids = Vec::new();
    for name in ["whoosh", "ding"] {
        let resp = client
            .post(common::url("/api/sounds"))
            .json(&json!({
                "name": format!("{name}_{suffix}"),
                "audioPath": format!("transition-audio/{suffix}-{name}.mp3"),
                "isDefault": true,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let body: Value = resp.json().await.unwrap();
        ids.push(body["id"].as_i64().unwrap());
    }

    let sounds: Vec<Value> = client
        .get(common::url("/api/sounds"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let defaults: Vec<i64> = sounds
        .iter()
        .filter(|s| s["isDefault"] == true)
        .map(|s| s["id"].as_i64().unwrap())
        .collect();
    assert_eq!(defaults, vec![ids[1]]);

    let resp = client
        .post(common::url(&format!("/api/sounds/{}/default", ids[0])))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let sounds: Vec<Value> = client
        .get(common::url("/api/sounds"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(sounds[0]["id"].as_i64().unwrap(), ids[0], "Default is listed first");
    assert_eq!(sounds.iter().filter(|s| s["isDefault"] == true).count(), 1);
}

#[tokio::test]
#[ignore]
async fn meme_search_by_name_and_tag() {
    let client = common::client();
    let suffix = common::unique_suffix();
    let name = format!("galaxybrain_{suffix}");
    let id = common::create_meme(&client, &name, 2000).await;

    let hits: Vec<Value> = client
        .get(common::url(&format!("/api/memes?q=GALAXYBRAIN_{suffix}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"].as_i64().unwrap(), id);
    assert!(hits[0]["videoUrl"].as_str().unwrap().ends_with(".mp4"));

    let misses: Vec<Value> = client
        .get(common::url(&format!("/api/memes?q={name}&tags=nonexistent")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(misses.is_empty());
}

#[tokio::test]
#[ignore]
async fn health() {
    let resp = common::client()
        .get(common::url("/health"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
}
