pub mod health;
pub mod media;
pub mod moves;
pub mod overlays;
pub mod pgn;
pub mod projects;
pub mod render;

use serde::{Deserialize, Deserializer};

/// Tell an explicit `null` apart from an absent field: absent stays `None`,
/// `null` becomes `Some(None)`.
pub(crate) fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
