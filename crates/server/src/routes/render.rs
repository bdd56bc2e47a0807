use axum::{extract::Path, Extension, Json};
use reel_core::media::{render_path, thumbnail_render_path};
use reel_core::render::{build_render_input, plan_render};
use serde_json::Value as JsonValue;
use sqlx::PgPool;

use crate::config::Config;
use crate::db::{media, moves, overlays, projects};
use crate::error::AppError;
use crate::storage::resolve_public_url;

/// GET /api/projects/{id}/render
/// Everything the composition renderer needs for one project: the flattened
/// input with resolved asset URLs, the precomputed plan, and where to upload
/// the result.
pub async fn render_project(
    Extension(pool): Extension<PgPool>,
    Extension(config): Extension<Config>,
    Path(id): Path<i64>,
) -> Result<Json<JsonValue>, AppError> {
    let project = projects::get_project(&pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
    let project_moves = moves::list_moves(&pool, id).await?;
    if project_moves.is_empty() {
        return Err(AppError::BadRequest("Project has no moves".into()));
    }
    let project_overlays = overlays::list_project_overlays(&pool, id).await?;
    let clips = media::list_meme_clips(&pool).await?;
    let sounds = media::list_transition_sounds(&pool).await?;

    let settings = config.render_settings();
    let input = build_render_input(
        &project,
        project_moves,
        project_overlays,
        &clips,
        &sounds,
        &settings,
        |path| resolve_public_url(&config, path),
    )?;
    let plan = plan_render(&input, settings.overrun_policy)?;

    tracing::info!(
        project_id = id,
        moves = plan.moves.len(),
        total_frames = plan.total_frames,
        "prepared render"
    );

    Ok(Json(serde_json::json!({
        "input": input,
        "plan": plan,
        "outputPath": render_path(id),
        "thumbnailPath": thumbnail_render_path(id),
    })))
}
