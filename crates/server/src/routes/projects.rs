use axum::{extract::Path, Extension, Json};
use reel_core::model::DEFAULT_MOVE_DURATION_MS;
use reel_core::{notation, AssetKind, CoreError};
use serde::Deserialize;
use serde_json::Value as JsonValue;
use sqlx::PgPool;
use validator::Validate;

use crate::db::{media, moves, overlays, projects};
use crate::error::AppError;

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    #[validate(length(max = 200))]
    pub title: Option<String>,
    #[validate(length(min = 1))]
    pub pgn: String,
    #[validate(range(min = 1, max = 2_147_483_647))]
    pub default_move_duration_ms: Option<u32>,
    pub default_transition_sound_id: Option<i64>,
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    #[validate(range(min = 1, max = 2_147_483_647))]
    pub default_move_duration_ms: Option<u32>,
    #[serde(default, deserialize_with = "super::nullable")]
    pub default_transition_sound_id: Option<Option<i64>>,
}

pub(crate) async fn ensure_sound_exists(pool: &PgPool, id: Option<i64>) -> Result<(), AppError> {
    if let Some(id) = id {
        if media::get_transition_sound(pool, id).await?.is_none() {
            return Err(CoreError::MissingAsset {
                kind: AssetKind::TransitionSound,
                id,
            }
            .into());
        }
    }
    Ok(())
}

/// GET /api/projects
pub async fn list_projects(
    Extension(pool): Extension<PgPool>,
) -> Result<Json<JsonValue>, AppError> {
    let list = projects::list_projects(&pool).await?;
    Ok(Json(serde_json::json!(list)))
}

/// POST /api/projects
/// Parses the transcript and stores the project with one row per ply.
pub async fn create_project(
    Extension(pool): Extension<PgPool>,
    Json(req): Json<CreateProjectRequest>,
) -> Result<Json<JsonValue>, AppError> {
    req.validate()?;

    let game = notation::parse_transcript(&req.pgn)?;
    ensure_sound_exists(&pool, req.default_transition_sound_id).await?;

    let title = req
        .title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| notation::project_title(&req.pgn));
    let duration = req.default_move_duration_ms.unwrap_or(DEFAULT_MOVE_DURATION_MS);

    let project_id = projects::create_project(
        &pool,
        &title,
        &req.pgn,
        duration,
        req.default_transition_sound_id,
        &game.moves,
    )
    .await?;
    tracing::info!(project_id, moves = game.moves.len(), "created project");

    let project = projects::get_project(&pool, project_id)
        .await?
        .ok_or(AppError::Internal("Failed to create project".into()))?;
    let created_moves = moves::list_moves(&pool, project_id).await?;

    Ok(Json(serde_json::json!({
        "project": project,
        "moves": created_moves,
        "metadata": game.metadata,
    })))
}

/// GET /api/projects/{id}
/// Project with its moves, each carrying its overlays.
pub async fn get_project(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<JsonValue>, AppError> {
    let project = projects::get_project(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
    let project_moves = moves::list_moves(&pool, id).await?;
    let project_overlays = overlays::list_project_overlays(&pool, id).await?;

    let moves_json: Vec<JsonValue> = project_moves
        .iter()
        .map(|m| {
            let mut value = serde_json::json!(m);
            let own: Vec<_> = project_overlays.iter().filter(|o| o.move_id == m.id).collect();
            value["overlays"] = serde_json::json!(own);
            value
        })
        .collect();

    Ok(Json(serde_json::json!({
        "project": project,
        "moves": moves_json,
    })))
}

/// PATCH /api/projects/{id}
pub async fn update_project(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateProjectRequest>,
) -> Result<Json<JsonValue>, AppError> {
    req.validate()?;

    if let Some(sound) = req.default_transition_sound_id {
        ensure_sound_exists(&pool, sound).await?;
    }

    let changes = projects::ProjectChanges {
        title: req.title.map(|t| t.trim().to_string()),
        default_move_duration_ms: req.default_move_duration_ms,
        default_transition_sound_id: req.default_transition_sound_id,
    };
    if !projects::update_project(&pool, id, &changes).await? {
        return Err(AppError::NotFound("Project not found".into()));
    }

    Ok(Json(serde_json::json!({ "success": true })))
}

/// DELETE /api/projects/{id}
pub async fn delete_project(
    Extension(pool): Extension<PgPool>,
    Path(id): Path<i64>,
) -> Result<Json<JsonValue>, AppError> {
    if !projects::delete_project(&pool, id).await? {
        return Err(AppError::NotFound("Project not found".into()));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
