use server::config;
use server::db;
use server::routes;

use anyhow::Context;
use axum::{routing::{delete, get, patch, post}, Extension, Router};
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env();

    tracing::info!("Connecting to database...");
    let pool = db::pool::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;

    tracing::info!("Running migrations...");
    db::pool::run_migrations(&pool)
        .await
        .context("Failed to run migrations")?;

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(routes::health::health_check))
        // Projects
        .route(
            "/api/projects",
            get(routes::projects::list_projects).post(routes::projects::create_project),
        )
        .route(
            "/api/projects/{id}",
            get(routes::projects::get_project)
                .patch(routes::projects::update_project)
                .delete(routes::projects::delete_project),
        )
        .route("/api/projects/{id}/moves", get(routes::moves::list_moves))
        .route("/api/projects/{id}/render", get(routes::render::render_project))
        // Moves and overlays
        .route("/api/moves/{id}", patch(routes::moves::update_move))
        .route(
            "/api/moves/{id}/overlays",
            get(routes::overlays::list_overlays).post(routes::overlays::create_overlay),
        )
        .route("/api/overlays/{id}", delete(routes::overlays::delete_overlay))
        // Media library
        .route(
            "/api/memes",
            get(routes::media::list_memes).post(routes::media::create_meme),
        )
        .route("/api/memes/{id}", delete(routes::media::delete_meme))
        .route(
            "/api/sounds",
            get(routes::media::list_sounds).post(routes::media::create_sound),
        )
        .route("/api/sounds/{id}", delete(routes::media::delete_sound))
        .route("/api/sounds/{id}/default", post(routes::media::set_default_sound))
        // Transcripts
        .route("/api/pgn/validate", post(routes::pgn::validate_pgn))
        // Shared state
        .layer(Extension(pool))
        .layer(Extension(config.clone()))
        .layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
