use reel_core::{MemeClip, TransitionSound};
use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MemeClipRow {
    pub id: i64,
    pub name: String,
    pub tags: Vec<String>,
    pub video_path: String,
    pub thumbnail_path: String,
    pub duration_ms: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<MemeClipRow> for MemeClip {
    fn from(r: MemeClipRow) -> Self {
        MemeClip {
            id: r.id,
            name: r.name,
            tags: r.tags,
            video_path: r.video_path,
            thumbnail_path: r.thumbnail_path,
            duration_ms: r.duration_ms as u32,
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TransitionSoundRow {
    pub id: i64,
    pub name: String,
    pub tags: Vec<String>,
    pub audio_path: String,
    pub duration_ms: i32,
    pub is_default: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<TransitionSoundRow> for TransitionSound {
    fn from(r: TransitionSoundRow) -> Self {
        TransitionSound {
            id: r.id,
            name: r.name,
            tags: r.tags,
            audio_path: r.audio_path,
            duration_ms: r.duration_ms as u32,
            is_default: r.is_default,
            created_at: r.created_at,
        }
    }
}

const MEME_COLUMNS: &str = "id, name, tags, video_path, thumbnail_path, duration_ms, created_at";
const SOUND_COLUMNS: &str = "id, name, tags, audio_path, duration_ms, is_default, created_at";

// ---------------------------------------------------------------------------
// Meme clips
// ---------------------------------------------------------------------------

pub async fn list_meme_clips(pool: &PgPool) -> Result<Vec<MemeClip>, AppError> {
    let query = format!("SELECT {MEME_COLUMNS} FROM meme_clips ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, MemeClipRow>(&query)
        .fetch_all(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(rows.into_iter().map(MemeClip::from).collect())
}

pub async fn get_meme_clip(pool: &PgPool, id: i64) -> Result<Option<MemeClip>, AppError> {
    let query = format!("SELECT {MEME_COLUMNS} FROM meme_clips WHERE id = $1");
    let row = sqlx::query_as::<_, MemeClipRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(row.map(MemeClip::from))
}

pub async fn create_meme_clip(
    pool: &PgPool,
    name: &str,
    tags: &[String],
    video_path: &str,
    thumbnail_path: &str,
    duration_ms: u32,
) -> Result<MemeClip, AppError> {
    let query = format!(
        r#"INSERT INTO meme_clips (name, tags, video_path, thumbnail_path, duration_ms)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING {MEME_COLUMNS}"#
    );
    let row = sqlx::query_as::<_, MemeClipRow>(&query)
        .bind(name)
        .bind(tags)
        .bind(video_path)
        .bind(thumbnail_path)
        .bind(duration_ms as i32)
        .fetch_one(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(row.into())
}

/// Removes the row and returns it so the caller can clean up stored objects.
pub async fn delete_meme_clip(pool: &PgPool, id: i64) -> Result<Option<MemeClip>, AppError> {
    let query = format!("DELETE FROM meme_clips WHERE id = $1 RETURNING {MEME_COLUMNS}");
    let row = sqlx::query_as::<_, MemeClipRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(row.map(MemeClip::from))
}

// ---------------------------------------------------------------------------
// Transition sounds
// ---------------------------------------------------------------------------

/// Default sound first, then newest.
pub async fn list_transition_sounds(pool: &PgPool) -> Result<Vec<TransitionSound>, AppError> {
    let query = format!(
        "SELECT {SOUND_COLUMNS} FROM transition_sounds ORDER BY is_default DESC, created_at DESC"
    );
    let rows = sqlx::query_as::<_, TransitionSoundRow>(&query)
        .fetch_all(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(rows.into_iter().map(TransitionSound::from).collect())
}

pub async fn get_transition_sound(
    pool: &PgPool,
    id: i64,
) -> Result<Option<TransitionSound>, AppError> {
    let query = format!("SELECT {SOUND_COLUMNS} FROM transition_sounds WHERE id = $1");
    let row = sqlx::query_as::<_, TransitionSoundRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(row.map(TransitionSound::from))
}

/// Insert a sound. When `is_default` is set, the previous default is cleared
/// in the same transaction.
pub async fn create_transition_sound(
    pool: &PgPool,
    name: &str,
    tags: &[String],
    audio_path: &str,
    duration_ms: u32,
    is_default: bool,
) -> Result<TransitionSound, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::Sqlx)?;

    if is_default {
        sqlx::query("UPDATE transition_sounds SET is_default = FALSE WHERE is_default")
            .execute(&mut *tx)
            .await
            .map_err(AppError::Sqlx)?;
    }

    let query = format!(
        r#"INSERT INTO transition_sounds (name, tags, audio_path, duration_ms, is_default)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING {SOUND_COLUMNS}"#
    );
    let row = sqlx::query_as::<_, TransitionSoundRow>(&query)
        .bind(name)
        .bind(tags)
        .bind(audio_path)
        .bind(duration_ms as i32)
        .bind(is_default)
        .fetch_one(&mut *tx)
        .await
        .map_err(AppError::Sqlx)?;

    tx.commit().await.map_err(AppError::Sqlx)?;
    Ok(row.into())
}

/// Make `id` the only default sound. Returns false when it does not exist,
/// leaving the previous default untouched.
pub async fn set_default_transition_sound(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::Sqlx)?;

    sqlx::query("UPDATE transition_sounds SET is_default = FALSE WHERE is_default AND id <> $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Sqlx)?;

    let result = sqlx::query("UPDATE transition_sounds SET is_default = TRUE WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Sqlx)?;

    if result.rows_affected() == 0 {
        tx.rollback().await.map_err(AppError::Sqlx)?;
        return Ok(false);
    }

    tx.commit().await.map_err(AppError::Sqlx)?;
    Ok(true)
}

pub async fn delete_transition_sound(
    pool: &PgPool,
    id: i64,
) -> Result<Option<TransitionSound>, AppError> {
    let query = format!("DELETE FROM transition_sounds WHERE id = $1 RETURNING {SOUND_COLUMNS}");
    let row = sqlx::query_as::<_, TransitionSoundRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(row.map(TransitionSound::from))
}
