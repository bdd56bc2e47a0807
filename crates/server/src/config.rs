use std::env;

use reel_core::render::{RenderSettings, DEFAULT_FPS, DEFAULT_HEIGHT, DEFAULT_WIDTH};

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    /// Base URL under which storage buckets are publicly readable.
    pub storage_public_url: String,
    pub storage_bucket: String,
    pub render_fps: u32,
    pub render_width: u32,
    pub render_height: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .expect("DATABASE_URL must be set"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: parse_var("PORT").unwrap_or(8000),
            storage_public_url: env::var("STORAGE_PUBLIC_URL").unwrap_or_else(|_| {
                "http://localhost:54321/storage/v1/object/public".to_string()
            }),
            storage_bucket: env::var("STORAGE_BUCKET")
                .unwrap_or_else(|_| "chess-meme-generator".to_string()),
            render_fps: parse_var("RENDER_FPS").filter(|&v| v > 0).unwrap_or(DEFAULT_FPS),
            render_width: parse_var("RENDER_WIDTH").filter(|&v| v > 0).unwrap_or(DEFAULT_WIDTH),
            render_height: parse_var("RENDER_HEIGHT").filter(|&v| v > 0).unwrap_or(DEFAULT_HEIGHT),
        }
    }

    pub fn render_settings(&self) -> RenderSettings {
        RenderSettings {
            fps: self.render_fps,
            width: self.render_width,
            height: self.render_height,
            ..RenderSettings::default()
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
