use reel_core::{Overlay, Square};
use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OverlayRow {
    pub id: i64,
    pub move_id: i64,
    pub square: String,
    pub meme_clip_id: i64,
    pub start_offset_ms: i32,
    pub scale: f64,
    pub rotation_degrees: f64,
}

impl TryFrom<OverlayRow> for Overlay {
    type Error = AppError;

    fn try_from(r: OverlayRow) -> Result<Self, Self::Error> {
        Ok(Overlay {
            id: r.id,
            move_id: r.move_id,
            square: Square::parse(&r.square)?,
            meme_clip_id: r.meme_clip_id,
            start_offset_ms: r.start_offset_ms as u32,
            scale: r.scale,
            rotation_degrees: r.rotation_degrees,
        })
    }
}

const OVERLAY_COLUMNS: &str =
    "o.id, o.move_id, o.square, o.meme_clip_id, o.start_offset_ms, o.scale, o.rotation_degrees";

pub struct NewOverlay {
    pub move_id: i64,
    pub square: Square,
    pub meme_clip_id: i64,
    pub start_offset_ms: u32,
    pub scale: f64,
    pub rotation_degrees: f64,
}

pub async fn create_overlay(pool: &PgPool, overlay: &NewOverlay) -> Result<Overlay, AppError> {
    let row = sqlx::query_as::<_, OverlayRow>(
        r#"INSERT INTO overlays AS o (move_id, square, meme_clip_id, start_offset_ms, scale, rotation_degrees)
           VALUES ($1, $2, $3, $4, $5, $6)
           RETURNING o.id, o.move_id, o.square, o.meme_clip_id, o.start_offset_ms, o.scale, o.rotation_degrees"#,
    )
    .bind(overlay.move_id)
    .bind(overlay.square.to_string())
    .bind(overlay.meme_clip_id)
    .bind(overlay.start_offset_ms as i32)
    .bind(overlay.scale)
    .bind(overlay.rotation_degrees)
    .fetch_one(pool)
    .await
    .map_err(AppError::Sqlx)?;

    Overlay::try_from(row)
}

pub async fn list_overlays(pool: &PgPool, move_id: i64) -> Result<Vec<Overlay>, AppError> {
    let query = format!("SELECT {OVERLAY_COLUMNS} FROM overlays o WHERE o.move_id = $1 ORDER BY o.id");
    let rows = sqlx::query_as::<_, OverlayRow>(&query)
        .bind(move_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Sqlx)?;
    rows.into_iter().map(Overlay::try_from).collect()
}

/// Every overlay on every move of a project.
pub async fn list_project_overlays(
    pool: &PgPool,
    project_id: i64,
) -> Result<Vec<Overlay>, AppError> {
    let query = format!(
        r#"SELECT {OVERLAY_COLUMNS}
           FROM overlays o
           JOIN moves m ON o.move_id = m.id
           WHERE m.project_id = $1
           ORDER BY m.move_number, o.id"#
    );
    let rows = sqlx::query_as::<_, OverlayRow>(&query)
        .bind(project_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Sqlx)?;
    rows.into_iter().map(Overlay::try_from).collect()
}

pub async fn delete_overlay(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM overlays WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(result.rows_affected() > 0)
}
