//! Library search and storage path conventions for meme clips and
//! transition sounds.

use crate::model::{MemeClip, TransitionSound};

pub const MEME_VIDEO_DIR: &str = "memes/videos";
pub const MEME_THUMBNAIL_DIR: &str = "memes/thumbnails";
pub const TRANSITION_SOUND_DIR: &str = "transition-audio";
pub const RENDER_DIR: &str = "renders";

/// Anything searchable by name and tags.
pub trait Tagged {
    fn name(&self) -> &str;
    fn tags(&self) -> &[String];

    /// Case-insensitive name substring match, and at least one shared tag
    /// when `tags` is non-empty.
    fn matches(&self, query: &str, tags: &[String]) -> bool {
        let name_match = self
            .name()
            .to_lowercase()
            .contains(&query.to_lowercase());
        let tag_match = tags.is_empty() || self.tags().iter().any(|t| tags.contains(t));
        name_match && tag_match
    }
}

impl Tagged for MemeClip {
    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Tagged for TransitionSound {
    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

pub fn search<'a, T: Tagged>(items: &'a [T], query: &str, tags: &[String]) -> Vec<&'a T> {
    items.iter().filter(|item| item.matches(query, tags)).collect()
}

/// Split `"funny, reaction ,"` into `["funny", "reaction"]`.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Object path for an uploaded file, prefixed with a millisecond timestamp so
/// repeated uploads of the same name do not collide.
pub fn upload_path(dir: &str, timestamp_ms: i64, file_name: &str) -> String {
    format!("{dir}/{timestamp_ms}-{file_name}")
}

pub fn render_path(project_id: i64) -> String {
    format!("{RENDER_DIR}/{project_id}/final.mp4")
}

pub fn thumbnail_render_path(project_id: i64) -> String {
    format!("{RENDER_DIR}/{project_id}/thumbnail.jpg")
}
