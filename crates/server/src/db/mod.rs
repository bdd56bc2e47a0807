pub mod media;
pub mod moves;
pub mod overlays;
pub mod pool;
pub mod projects;
