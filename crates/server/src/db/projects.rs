use reel_core::{ParsedMove, Project};
use sqlx::PgPool;

use crate::error::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProjectRow {
    pub id: i64,
    pub title: String,
    pub pgn: String,
    pub default_move_duration_ms: i32,
    pub default_transition_sound_id: Option<i64>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<ProjectRow> for Project {
    fn from(r: ProjectRow) -> Self {
        Project {
            id: r.id,
            title: r.title,
            pgn: r.pgn,
            default_move_duration_ms: r.default_move_duration_ms as u32,
            default_transition_sound_id: r.default_transition_sound_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

const PROJECT_COLUMNS: &str = "id, title, pgn, default_move_duration_ms, default_transition_sound_id, created_at, updated_at";

/// Fields a project edit may touch. `None` leaves a column alone; the inner
/// option of the sound clears it.
#[derive(Debug, Default)]
pub struct ProjectChanges {
    pub title: Option<String>,
    pub default_move_duration_ms: Option<u32>,
    pub default_transition_sound_id: Option<Option<i64>>,
}

/// Insert a project and all of its moves in one transaction.
pub async fn create_project(
    pool: &PgPool,
    title: &str,
    pgn: &str,
    default_move_duration_ms: u32,
    default_transition_sound_id: Option<i64>,
    moves: &[ParsedMove],
) -> Result<i64, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::Sqlx)?;

    let row: (i64,) = sqlx::query_as(
        r#"INSERT INTO projects (title, pgn, default_move_duration_ms, default_transition_sound_id)
           VALUES ($1, $2, $3, $4)
           RETURNING id"#,
    )
    .bind(title)
    .bind(pgn)
    .bind(default_move_duration_ms as i32)
    .bind(default_transition_sound_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(AppError::Sqlx)?;
    let project_id = row.0;

    let v_number: Vec<i32> = moves.iter().map(|m| m.index as i32).collect();
    let v_notation: Vec<String> = moves.iter().map(|m| m.notation.clone()).collect();
    let v_fen: Vec<String> = moves.iter().map(|m| m.fen.clone()).collect();

    sqlx::query(
        r#"INSERT INTO moves (project_id, duration_ms, move_number, notation, fen)
           SELECT $1, $2, * FROM UNNEST($3::int[], $4::text[], $5::text[])
               AS t(move_number, notation, fen)"#,
    )
    .bind(project_id)
    .bind(default_move_duration_ms as i32)
    .bind(&v_number)
    .bind(&v_notation)
    .bind(&v_fen)
    .execute(&mut *tx)
    .await
    .map_err(AppError::Sqlx)?;

    tx.commit().await.map_err(AppError::Sqlx)?;
    Ok(project_id)
}

pub async fn get_project(pool: &PgPool, id: i64) -> Result<Option<Project>, AppError> {
    let query = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");
    let row = sqlx::query_as::<_, ProjectRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(row.map(Project::from))
}

pub async fn list_projects(pool: &PgPool) -> Result<Vec<Project>, AppError> {
    let query = format!("SELECT {PROJECT_COLUMNS} FROM projects ORDER BY updated_at DESC");
    let rows = sqlx::query_as::<_, ProjectRow>(&query)
        .fetch_all(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(rows.into_iter().map(Project::from).collect())
}

/// Returns false when no project has that id.
pub async fn update_project(
    pool: &PgPool,
    id: i64,
    changes: &ProjectChanges,
) -> Result<bool, AppError> {
    let (set_sound, sound) = match changes.default_transition_sound_id {
        Some(sound) => (true, sound),
        None => (false, None),
    };

    let result = sqlx::query(
        r#"UPDATE projects SET
               title = COALESCE($2, title),
               default_move_duration_ms = COALESCE($3, default_move_duration_ms),
               default_transition_sound_id = CASE WHEN $4 THEN $5 ELSE default_transition_sound_id END,
               updated_at = NOW()
           WHERE id = $1"#,
    )
    .bind(id)
    .bind(changes.title.as_deref())
    .bind(changes.default_move_duration_ms.map(|d| d as i32))
    .bind(set_sound)
    .bind(sound)
    .execute(pool)
    .await
    .map_err(AppError::Sqlx)?;

    Ok(result.rows_affected() > 0)
}

/// Moves and their overlays go with the project (ON DELETE CASCADE).
pub async fn delete_project(pool: &PgPool, id: i64) -> Result<bool, AppError> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(result.rows_affected() > 0)
}

pub async fn touch_project(pool: &PgPool, id: i64) -> Result<(), AppError> {
    sqlx::query("UPDATE projects SET updated_at = NOW() WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(())
}
