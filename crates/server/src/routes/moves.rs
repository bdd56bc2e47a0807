use axum::{extract::Path, Extension, Json};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use validator::Validate;

use crate::db::{moves, projects};
use crate::error::AppError;
use crate::routes::projects::ensure_sound_exists;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMoveRequest {
    #[validate(range(min = 1, max = 2_147_483_647))]
    pub duration_ms: Option<u32>,
    /// `null` reverts the move to the project default sound.
    #[serde(default, deserialize_with = "super::nullable")]
    pub transition_sound_id: Option<Option<i64>>,
}

/// GET /api/projects/{id}/moves
pub async fn list_moves(
    Extension(pool): Extension<PgPool>,
    Path(project_id): Path<i64>,
) -> Result<Json<JsonValue>, AppError> {
    if projects::get_project(&pool, project_id).await?.is_none() {
        return Err(AppError::NotFound("Project not found".into()));
    }
    let list = moves::list_moves(&pool, project_id).await?;
    Ok(Json(serde_json::json!(list)))
}

/// PATCH /api/moves/{id}
/// Duration and transition sound are the only mutable parts of a move.
pub async fn update_move(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateMoveRequest>,
) -> Result<Json<JsonValue>, AppError> {
    req.validate()?;

    // Reject unknown sounds before anything is written.
    if let Some(sound) = req.transition_sound_id {
        ensure_sound_exists(&pool, sound).await?;
    }

    let changes = moves::MoveChanges {
        duration_ms: req.duration_ms,
        transition_sound_id: req.transition_sound_id,
    };
    let updated = moves::update_move(&pool, id, &changes)
        .await?
        .ok_or_else(|| AppError::NotFound("Move not found".into()))?;
    Ok(Json(serde_json::json!(updated)))
}
