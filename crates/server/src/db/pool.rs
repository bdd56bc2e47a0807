use sqlx::postgres::{PgPool, PgPoolOptions};

pub async fn create_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Run the full Postgres schema migration inline.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    Ok(())
}

const SCHEMA_SQL: &str = r#"
-- Meme clip library (project-agnostic)
CREATE TABLE IF NOT EXISTS meme_clips (
    id             BIGSERIAL PRIMARY KEY,
    name           TEXT NOT NULL,
    tags           TEXT[] NOT NULL DEFAULT '{}',
    video_path     TEXT NOT NULL,
    thumbnail_path TEXT NOT NULL,
    duration_ms    INTEGER NOT NULL CHECK (duration_ms > 0),
    created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_meme_clips_created_at ON meme_clips (created_at DESC);

-- Transition sound library
CREATE TABLE IF NOT EXISTS transition_sounds (
    id          BIGSERIAL PRIMARY KEY,
    name        TEXT NOT NULL,
    tags        TEXT[] NOT NULL DEFAULT '{}',
    audio_path  TEXT NOT NULL,
    duration_ms INTEGER NOT NULL CHECK (duration_ms > 0),
    is_default  BOOLEAN NOT NULL DEFAULT FALSE,
    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

-- At most one default sound at any time
CREATE UNIQUE INDEX IF NOT EXISTS idx_transition_sounds_single_default
    ON transition_sounds (is_default) WHERE is_default;

-- Projects
CREATE TABLE IF NOT EXISTS projects (
    id                          BIGSERIAL PRIMARY KEY,
    title                       TEXT NOT NULL,
    pgn                         TEXT NOT NULL,
    default_move_duration_ms    INTEGER NOT NULL DEFAULT 2000 CHECK (default_move_duration_ms > 0),
    default_transition_sound_id BIGINT REFERENCES transition_sounds(id) ON DELETE SET NULL,
    created_at                  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at                  TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_projects_updated_at ON projects (updated_at DESC);

-- Moves (one per ply, created with the project)
CREATE TABLE IF NOT EXISTS moves (
    id                  BIGSERIAL PRIMARY KEY,
    project_id          BIGINT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
    move_number         INTEGER NOT NULL CHECK (move_number > 0),
    notation            TEXT NOT NULL,
    fen                 TEXT NOT NULL,
    duration_ms         INTEGER NOT NULL CHECK (duration_ms > 0),
    transition_sound_id BIGINT REFERENCES transition_sounds(id) ON DELETE SET NULL,
    created_at          TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE(project_id, move_number)
);

CREATE INDEX IF NOT EXISTS idx_moves_project_id ON moves (project_id);

-- Overlays (meme clips anchored to a square during one move)
CREATE TABLE IF NOT EXISTS overlays (
    id               BIGSERIAL PRIMARY KEY,
    move_id          BIGINT NOT NULL REFERENCES moves(id) ON DELETE CASCADE,
    square           TEXT NOT NULL CHECK (square ~ '^[a-h][1-8]$'),
    meme_clip_id     BIGINT NOT NULL REFERENCES meme_clips(id) ON DELETE CASCADE,
    start_offset_ms  INTEGER NOT NULL DEFAULT 0 CHECK (start_offset_ms >= 0),
    scale            DOUBLE PRECISION NOT NULL DEFAULT 1.0 CHECK (scale > 0),
    rotation_degrees DOUBLE PRECISION NOT NULL DEFAULT 0.0,
    created_at       TIMESTAMPTZ NOT NULL DEFAULT NOW()
);

CREATE INDEX IF NOT EXISTS idx_overlays_move_id ON overlays (move_id);
"#;
