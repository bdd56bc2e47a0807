//! Move-timeline and overlay-placement core for chess meme reels.
//!
//! Pure and synchronous: transcripts become move snapshots, moves become
//! frame windows, and overlays become pixel rectangles plus frame windows
//! for an external renderer.

pub mod error;
pub mod media;
pub mod model;
pub mod notation;
pub mod placement;
pub mod render;
pub mod square;
pub mod timeline;

pub use error::{AssetKind, CoreError, CoreResult};
pub use model::{GameMetadata, MemeClip, Move, Overlay, ParsedGame, ParsedMove, Project, TransitionSound};
pub use placement::{BoardGeometry, OverlayPlacement, OverlayTransform, OverrunPolicy, PixelRect};
pub use square::Square;
pub use timeline::{FrameWindow, Timeline};
