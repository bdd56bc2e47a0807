use axum::{extract::Path, Extension, Json};
use reel_core::{AssetKind, CoreError, Square};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use validator::Validate;

use crate::db::{media, moves, overlays, projects};
use crate::error::AppError;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOverlayRequest {
    pub square: String,
    pub meme_clip_id: i64,
    #[validate(range(max = 2_147_483_647))]
    pub start_offset_ms: Option<u32>,
    #[validate(range(exclusive_min = 0.0, max = 10.0))]
    pub scale: Option<f64>,
    #[validate(range(min = -360.0, max = 360.0))]
    pub rotation_degrees: Option<f64>,
}

/// GET /api/moves/{id}/overlays
pub async fn list_overlays(
    Extension(pool): Extension<PgPool>,
    Path(move_id): Path<i64>,
) -> Result<Json<JsonValue>, AppError> {
    if moves::get_move(&pool, move_id).await?.is_none() {
        return Err(AppError::NotFound("Move not found".into()));
    }
    let list = overlays::list_overlays(&pool, move_id).await?;
    Ok(Json(serde_json::json!(list)))
}

/// POST /api/moves/{id}/overlays
pub async fn create_overlay(
    Extension(pool): Extension<PgPool>,
    Path(move_id): Path<i64>,
    Json(req): Json<CreateOverlayRequest>,
) -> Result<Json<JsonValue>, AppError> {
    req.validate()?;
    let square = Square::parse(&req.square)?;

    let parent = moves::get_move(&pool, move_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Move not found".into()))?;
    if media::get_meme_clip(&pool, req.meme_clip_id).await?.is_none() {
        return Err(CoreError::MissingAsset {
            kind: AssetKind::MemeClip,
            id: req.meme_clip_id,
        }
        .into());
    }

    let overlay = overlays::create_overlay(
        &pool,
        &overlays::NewOverlay {
            move_id,
            square,
            meme_clip_id: req.meme_clip_id,
            start_offset_ms: req.start_offset_ms.unwrap_or(0),
            scale: req.scale.unwrap_or(1.0),
            rotation_degrees: req.rotation_degrees.unwrap_or(0.0),
        },
    )
    .await?;
    projects::touch_project(&pool, parent.project_id).await?;

    Ok(Json(serde_json::json!(overlay)))
}

/// DELETE /api/overlays/{id}
pub async fn delete_overlay(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<JsonValue>, AppError> {
    if !overlays::delete_overlay(&pool, id).await? {
        return Err(AppError::NotFound("Overlay not found".into()));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
