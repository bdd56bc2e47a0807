use reqwest::Client;
use serde_json::{json, Value};
use std::time::{SystemTime, UNIX_EPOCH};

pub const BASE_URL: &str = "http://localhost:8000";

/// Short game used across the HTTP tests.
pub const SAMPLE_PGN: &str = "[Event \"Casual Game\"]\n\
[White \"Alice\"]\n\
[Black \"Bob\"]\n\
\n\
1. e4 e5 2. Nf3 *";

/// Build a reqwest client for tests.
pub fn client() -> Client {
    Client::new()
}

/// Unique suffix so repeated runs don't collide on names.
pub fn unique_suffix() -> String {
    let ts = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    format!("{}", ts % 1_000_000_000)
}

/// Build a URL for an API endpoint.
pub fn url(path: &str) -> String {
    format!("{}{}", BASE_URL, path)
}

/// Create a project from `SAMPLE_PGN` and return the response body.
pub async fn create_sample_project(client: &Client) -> Value {
    let resp = client
        .post(url("/api/projects"))
        .json(&json!({ "pgn": SAMPLE_PGN }))
        .send()
        .await
        .expect("Failed to send create project request");
    assert_eq!(resp.status(), 200, "Project creation should succeed");
    resp.json().await.unwrap()
}

/// Register a meme clip and return its id.
pub async fn create_meme(client: &Client, name: &str, duration_ms: u32) -> i64 {
    let resp = client
        .post(url("/api/memes"))
        .json(&json!({
            "name": name,
            "tags": ["test"],
            "videoPath": format!("memes/videos/{}-{name}.mp4", unique_suffix()),
            "durationMs": duration_ms,
        }))
        .send()
        .await
        .expect("Failed to send create meme request");
    assert_eq!(resp.status(), 200, "Meme creation should succeed");
    let body: Value = resp.json().await.unwrap();
    body["id"].as_i64().unwrap()
}
