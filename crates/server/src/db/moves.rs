use reel_core::Move;
use sqlx::{PgConnection, PgPool};

use crate::error::AppError;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MoveRow {
    pub id: i64,
    pub project_id: i64,
    pub move_number: i32,
    pub notation: String,
    pub fen: String,
    pub duration_ms: i32,
    pub transition_sound_id: Option<i64>,
}

impl From<MoveRow> for Move {
    fn from(r: MoveRow) -> Self {
        Move {
            id: r.id,
            project_id: r.project_id,
            index: r.move_number as u32,
            notation: r.notation,
            fen: r.fen,
            duration_ms: r.duration_ms as u32,
            transition_sound_id: r.transition_sound_id,
        }
    }
}

const MOVE_COLUMNS: &str = "id, project_id, move_number, notation, fen, duration_ms, transition_sound_id";

/// All moves of a project in playback order.
pub async fn list_moves(pool: &PgPool, project_id: i64) -> Result<Vec<Move>, AppError> {
    let query = format!(
        "SELECT {MOVE_COLUMNS} FROM moves WHERE project_id = $1 ORDER BY move_number"
    );
    let rows = sqlx::query_as::<_, MoveRow>(&query)
        .bind(project_id)
        .fetch_all(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(rows.into_iter().map(Move::from).collect())
}

pub async fn get_move(pool: &PgPool, id: i64) -> Result<Option<Move>, AppError> {
    let query = format!("SELECT {MOVE_COLUMNS} FROM moves WHERE id = $1");
    let row = sqlx::query_as::<_, MoveRow>(&query)
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(row.map(Move::from))
}

/// Fields a move edit may touch. The inner option of the sound clears the
/// override.
#[derive(Debug, Default)]
pub struct MoveChanges {
    pub duration_ms: Option<u32>,
    pub transition_sound_id: Option<Option<i64>>,
}

/// Apply `changes` to a move and bump its project's `updated_at`, all in one
/// transaction. Returns the updated move, or `None` when it does not exist.
pub async fn update_move(
    pool: &PgPool,
    id: i64,
    changes: &MoveChanges,
) -> Result<Option<Move>, AppError> {
    let mut tx = pool.begin().await.map_err(AppError::Sqlx)?;

    if let Some(duration) = changes.duration_ms {
        update_move_duration(&mut *tx, id, duration).await?;
    }
    if let Some(sound) = changes.transition_sound_id {
        update_move_transition_sound(&mut *tx, id, sound).await?;
    }

    let query = format!("SELECT {MOVE_COLUMNS} FROM moves WHERE id = $1");
    let row = sqlx::query_as::<_, MoveRow>(&query)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(AppError::Sqlx)?;
    let Some(row) = row else {
        tx.rollback().await.map_err(AppError::Sqlx)?;
        return Ok(None);
    };

    sqlx::query("UPDATE projects SET updated_at = NOW() WHERE id = $1")
        .bind(row.project_id)
        .execute(&mut *tx)
        .await
        .map_err(AppError::Sqlx)?;

    tx.commit().await.map_err(AppError::Sqlx)?;
    Ok(Some(row.into()))
}

pub async fn update_move_duration(
    conn: &mut PgConnection,
    id: i64,
    duration_ms: u32,
) -> Result<bool, AppError> {
    let result = sqlx::query("UPDATE moves SET duration_ms = $2 WHERE id = $1")
        .bind(id)
        .bind(duration_ms as i32)
        .execute(conn)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(result.rows_affected() > 0)
}

/// `None` falls back to the project default at render time.
pub async fn update_move_transition_sound(
    conn: &mut PgConnection,
    id: i64,
    transition_sound_id: Option<i64>,
) -> Result<bool, AppError> {
    let result = sqlx::query("UPDATE moves SET transition_sound_id = $2 WHERE id = $1")
        .bind(id)
        .bind(transition_sound_id)
        .execute(conn)
        .await
        .map_err(AppError::Sqlx)?;
    Ok(result.rows_affected() > 0)
}
