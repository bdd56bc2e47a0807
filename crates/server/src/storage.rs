use crate::config::Config;

/// Public URL of an object stored at `path` in the configured bucket.
pub fn resolve_public_url(config: &Config, path: &str) -> String {
    format!(
        "{}/{}/{}",
        config.storage_public_url.trim_end_matches('/'),
        config.storage_bucket,
        path.trim_start_matches('/')
    )
}
