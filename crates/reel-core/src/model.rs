use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::square::Square;

pub const DEFAULT_MOVE_DURATION_MS: u32 = 2000;
pub const DEFAULT_MEME_DURATION_MS: u32 = 3000;
pub const DEFAULT_SOUND_DURATION_MS: u32 = 1000;

/// Header tags recognised in a transcript. Any of them may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameMetadata {
    pub event: Option<String>,
    pub site: Option<String>,
    pub date: Option<String>,
    pub white: Option<String>,
    pub black: Option<String>,
    pub result: Option<String>,
}

/// One ply as produced by the notation adapter, before it is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedMove {
    pub index: u32,
    pub notation: String, // SAN, display only
    pub fen: String,      // position after the move
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedGame {
    pub metadata: GameMetadata,
    pub moves: Vec<ParsedMove>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub pgn: String,
    pub default_move_duration_ms: u32,
    pub default_transition_sound_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub id: i64,
    pub project_id: i64,
    pub index: u32, // 1-based playback order
    pub notation: String,
    pub fen: String,
    pub duration_ms: u32,
    pub transition_sound_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub id: i64,
    pub move_id: i64,
    pub square: Square,
    pub meme_clip_id: i64,
    pub start_offset_ms: u32,
    pub scale: f64,
    pub rotation_degrees: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemeClip {
    pub id: i64,
    pub name: String,
    pub tags: Vec<String>,
    pub video_path: String,
    pub thumbnail_path: String,
    pub duration_ms: u32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionSound {
    pub id: i64,
    pub name: String,
    pub tags: Vec<String>,
    pub audio_path: String,
    pub duration_ms: u32,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}
