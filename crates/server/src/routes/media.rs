use axum::{extract::Path, extract::Query, Extension, Json};
use reel_core::media::{self as library, MEME_THUMBNAIL_DIR};
use reel_core::model::{DEFAULT_MEME_DURATION_MS, DEFAULT_SOUND_DURATION_MS};
use reel_core::render::{MemeClipSource, TransitionSoundSource};
use reel_core::{MemeClip, TransitionSound};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use validator::Validate;

use crate::config::Config;
use crate::db::media;
use crate::error::AppError;
use crate::storage::resolve_public_url;

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    /// Comma-separated; a hit needs any one of them.
    pub tags: Option<String>,
}

impl SearchQuery {
    fn terms(&self) -> (String, Vec<String>) {
        (
            self.q.clone().unwrap_or_default(),
            self.tags.as_deref().map(library::parse_tags).unwrap_or_default(),
        )
    }
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateMemeRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    /// Object path of the already uploaded video.
    #[validate(length(min = 1))]
    pub video_path: String,
    pub thumbnail_path: Option<String>,
    #[validate(range(min = 1, max = 2_147_483_647))]
    pub duration_ms: Option<u32>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSoundRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[validate(length(min = 1))]
    pub audio_path: String,
    #[validate(range(min = 1, max = 2_147_483_647))]
    pub duration_ms: Option<u32>,
    #[serde(default)]
    pub is_default: bool,
}

fn meme_source(config: &Config, clip: MemeClip) -> MemeClipSource {
    MemeClipSource {
        video_url: resolve_public_url(config, &clip.video_path),
        thumbnail_url: resolve_public_url(config, &clip.thumbnail_path),
        clip,
    }
}

fn sound_source(config: &Config, sound: TransitionSound) -> TransitionSoundSource {
    TransitionSoundSource {
        audio_url: resolve_public_url(config, &sound.audio_path),
        sound,
    }
}

fn clean_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

// ---------------------------------------------------------------------------
// Meme clips
// ---------------------------------------------------------------------------

/// GET /api/memes?q=cat&tags=funny,reaction
pub async fn list_memes(
    Extension(pool): Extension<PgPool>,
    Extension(config): Extension<Config>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<JsonValue>, AppError> {
    let clips = media::list_meme_clips(&pool).await?;
    let (query, tags) = q.terms();

    let result: Vec<MemeClipSource> = library::search(&clips, &query, &tags)
        .into_iter()
        .map(|clip| meme_source(&config, clip.clone()))
        .collect();

    Ok(Json(serde_json::json!(result)))
}

/// POST /api/memes
pub async fn create_meme(
    Extension(pool): Extension<PgPool>,
    Extension(config): Extension<Config>,
    Json(req): Json<CreateMemeRequest>,
) -> Result<Json<JsonValue>, AppError> {
    req.validate()?;

    // No thumbnail extraction yet; reserve a path next to the others.
    let thumbnail_path = req.thumbnail_path.unwrap_or_else(|| {
        library::upload_path(
            MEME_THUMBNAIL_DIR,
            chrono::Utc::now().timestamp_millis(),
            "thumb.jpg",
        )
    });

    let clip = media::create_meme_clip(
        &pool,
        req.name.trim(),
        &clean_tags(req.tags),
        &req.video_path,
        &thumbnail_path,
        req.duration_ms.unwrap_or(DEFAULT_MEME_DURATION_MS),
    )
    .await?;

    Ok(Json(serde_json::json!(meme_source(&config, clip))))
}

/// DELETE /api/memes/{id}
/// Returns the object paths the caller should remove from storage.
pub async fn delete_meme(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<JsonValue>, AppError> {
    let clip = media::delete_meme_clip(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Meme not found".into()))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "removedPaths": [clip.video_path, clip.thumbnail_path],
    })))
}

// ---------------------------------------------------------------------------
// Transition sounds
// ---------------------------------------------------------------------------

/// GET /api/sounds?q=&tags=
pub async fn list_sounds(
    Extension(pool): Extension<PgPool>,
    Extension(config): Extension<Config>,
    Query(q): Query<SearchQuery>,
) -> Result<Json<JsonValue>, AppError> {
    let sounds = media::list_transition_sounds(&pool).await?;
    let (query, tags) = q.terms();

    let result: Vec<TransitionSoundSource> = library::search(&sounds, &query, &tags)
        .into_iter()
        .map(|sound| sound_source(&config, sound.clone()))
        .collect();

    Ok(Json(serde_json::json!(result)))
}

/// POST /api/sounds
pub async fn create_sound(
    Extension(pool): Extension<PgPool>,
    Extension(config): Extension<Config>,
    Json(req): Json<CreateSoundRequest>,
) -> Result<Json<JsonValue>, AppError> {
    req.validate()?;

    let sound = media::create_transition_sound(
        &pool,
        req.name.trim(),
        &clean_tags(req.tags),
        &req.audio_path,
        req.duration_ms.unwrap_or(DEFAULT_SOUND_DURATION_MS),
        req.is_default,
    )
    .await?;
    if sound.is_default {
        tracing::info!(sound_id = sound.id, "new default transition sound");
    }

    Ok(Json(serde_json::json!(sound_source(&config, sound))))
}

/// POST /api/sounds/{id}/default
pub async fn set_default_sound(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<JsonValue>, AppError> {
    if !media::set_default_transition_sound(&pool, id).await? {
        return Err(AppError::NotFound("Sound not found".into()));
    }
    tracing::info!(sound_id = id, "new default transition sound");
    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/sounds/{id}
pub async fn delete_sound(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<JsonValue>, AppError> {
    let sound = media::delete_transition_sound(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Sound not found".into()))?;

    Ok(Json(serde_json::json!({
        "success": true,
        "removedPaths": [sound.audio_path],
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_query_splits_tags() {
        let q = SearchQuery {
            q: Some("cat".into()),
            tags: Some("funny, reaction".into()),
        };
        assert_eq!(q.terms(), ("cat".to_string(), vec!["funny".to_string(), "reaction".to_string()]));

        let empty = SearchQuery { q: None, tags: None };
        assert_eq!(empty.terms(), (String::new(), vec![]));
    }

    #[test]
    fn tags_are_trimmed() {
        assert_eq!(
            clean_tags(vec![" shock ".into(), "".into(), "anime".into()]),
            vec!["shock", "anime"]
        );
    }

    #[test]
    fn meme_requests_need_a_video_path() {
        let req: CreateMemeRequest =
            serde_json::from_str(r#"{"name":"Pikachu","videoPath":""}"#).unwrap();
        assert!(req.validate().is_err());

        let req: CreateMemeRequest =
            serde_json::from_str(r#"{"name":"Pikachu","videoPath":"memes/videos/1-p.mp4"}"#)
                .unwrap();
        assert!(req.validate().is_ok());
        assert!(req.tags.is_empty());
    }

    #[test]
    fn clip_and_sound_durations_must_fit_an_integer_column() {
        let meme: CreateMemeRequest = serde_json::from_str(
            r#"{"name":"Pikachu","videoPath":"memes/videos/1-p.mp4","durationMs":3000000000}"#,
        )
        .unwrap();
        assert!(meme.validate().is_err());

        let sound: CreateSoundRequest = serde_json::from_str(
            r#"{"name":"Whoosh","audioPath":"transition-audio/1-w.mp3","durationMs":3000000000}"#,
        )
        .unwrap();
        assert!(sound.validate().is_err());
    }
}
