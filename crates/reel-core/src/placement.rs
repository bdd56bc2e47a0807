//! Where and when an overlay clip appears: square-to-pixel mapping and
//! overlay frame windows relative to their move.

use serde::{Deserialize, Serialize};

use crate::square::Square;
use crate::timeline::{frames_for_ms, FrameWindow};

/// Board placement inside a video frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardGeometry {
    pub board_size: u32,
    pub offset_x: u32,
    pub offset_y: u32,
}

impl BoardGeometry {
    /// Board at 90% of the frame width, centred on both axes.
    pub fn for_frame(width: u32, height: u32) -> Self {
        let board_size = (u64::from(width) * 9 / 10) as u32;
        Self {
            board_size,
            offset_x: width.saturating_sub(board_size) / 2,
            offset_y: height.saturating_sub(board_size) / 2,
        }
    }

    pub fn square_size(&self) -> f64 {
        f64::from(self.board_size) / 8.0
    }

    /// Pixel rectangle of `square` with white at the bottom.
    pub fn pixel_rect(&self, square: Square) -> PixelRect {
        let size = self.square_size();
        PixelRect {
            x: f64::from(self.offset_x) + f64::from(square.file_index()) * size,
            y: f64::from(self.offset_y) + f64::from(square.row_index()) * size,
            size,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub size: f64,
}

impl PixelRect {
    pub fn right(&self) -> f64 {
        self.x + self.size
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.size
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.size / 2.0, self.y + self.size / 2.0)
    }
}

/// Scale and rotation applied to the clip about the centre of its square.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayTransform {
    pub scale: f64,
    pub rotation_degrees: f64,
}

impl Default for OverlayTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_degrees: 0.0,
        }
    }
}

impl OverlayTransform {
    /// Corners of `rect` after the transform, clockwise from the top-left.
    pub fn corners(&self, rect: &PixelRect) -> [(f64, f64); 4] {
        let (cx, cy) = rect.center();
        let half = rect.size * self.scale / 2.0;
        let (sin, cos) = self.rotation_degrees.to_radians().sin_cos();

        [(-half, -half), (half, -half), (half, half), (-half, half)]
            .map(|(dx, dy)| (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos))
    }
}

/// What to do with an overlay whose clip outlasts its move.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OverrunPolicy {
    /// Clip duration wins; the overlay may play over the following moves.
    #[default]
    Extend,
    /// Cut the overlay at the end of its move.
    Clamp,
}

/// The two frame ranges an overlay lives in, kept apart so overrun is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayPlacement {
    pub move_window: FrameWindow,
    pub overlay_window: FrameWindow,
}

impl OverlayPlacement {
    /// Frames the overlay plays past the end of its move.
    pub fn overrun_frames(&self) -> u64 {
        self.overlay_window
            .end_frame()
            .saturating_sub(self.move_window.end_frame())
    }
}

/// Absolute frame window for an overlay starting `start_offset_ms` into its
/// move and lasting one play of its clip.
pub fn place_overlay(
    move_window: FrameWindow,
    start_offset_ms: u32,
    clip_duration_ms: u32,
    fps: u32,
    policy: OverrunPolicy,
) -> OverlayPlacement {
    let start = move_window.start_frame + frames_for_ms(start_offset_ms, fps);
    let count = frames_for_ms(clip_duration_ms, fps);

    let overlay_window = match policy {
        OverrunPolicy::Extend => FrameWindow::new(start, count),
        OverrunPolicy::Clamp => {
            let end = (start + count).min(move_window.end_frame());
            let start = start.min(end);
            FrameWindow::new(start, end - start)
        }
    };

    OverlayPlacement {
        move_window,
        overlay_window,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::parse(s).unwrap()
    }

    fn vertical_hd() -> BoardGeometry {
        BoardGeometry::for_frame(1080, 1920)
    }

    #[test]
    fn geometry_for_vertical_video() {
        assert_eq!(
            vertical_hd(),
            BoardGeometry {
                board_size: 972,
                offset_x: 54,
                offset_y: 474,
            }
        );
    }

    #[test]
    fn e4_on_vertical_video() {
        let rect = vertical_hd().pixel_rect(sq("e4"));
        assert_eq!(rect.x, 54.0 + 4.0 * 121.5);
        assert_eq!(rect.y, 474.0 + 4.0 * 121.5);
        assert_eq!(rect.size, 121.5);
    }

    #[test]
    fn corner_squares_touch_board_corners() {
        let g = vertical_hd();
        let a8 = g.pixel_rect(sq("a8"));
        assert_eq!((a8.x, a8.y), (54.0, 474.0));

        let h1 = g.pixel_rect(sq("h1"));
        assert_eq!((h1.right(), h1.bottom()), (54.0 + 972.0, 474.0 + 972.0));
    }

    #[test]
    fn squares_tile_the_board() {
        for g in [vertical_hd(), BoardGeometry::for_frame(1920, 1080), BoardGeometry::for_frame(803, 803)] {
            let s = g.square_size();
            let (left, top) = (f64::from(g.offset_x), f64::from(g.offset_y));
            let (right, bottom) = (left + f64::from(g.board_size), top + f64::from(g.board_size));

            let rects: Vec<PixelRect> = Square::all().map(|q| g.pixel_rect(q)).collect();
            for r in &rects {
                assert!(r.x >= left && r.right() <= right + 1e-9);
                assert!(r.y >= top && r.bottom() <= bottom + 1e-9);
            }

            // Neighbours share edges exactly and the rows/columns cover the span.
            for (i, r) in rects.iter().enumerate() {
                let (row, col) = (i / 8, i % 8);
                assert!((r.x - (left + col as f64 * s)).abs() < 1e-9);
                assert!((r.y - (top + row as f64 * s)).abs() < 1e-9);
            }
            let area: f64 = rects.iter().map(|r| r.size * r.size).sum();
            let board = f64::from(g.board_size);
            assert!((area - board * board).abs() < 1e-6);
        }
    }

    #[test]
    fn overlay_window_is_offset_from_its_move() {
        let move_window = FrameWindow::new(60, 60);
        let placed = place_overlay(move_window, 500, 1000, 30, OverrunPolicy::Extend);
        assert_eq!(placed.move_window, move_window);
        assert_eq!(placed.overlay_window, FrameWindow::new(75, 30));
        assert_eq!(placed.overrun_frames(), 0);
    }

    #[test]
    fn long_clip_extends_past_its_move_by_default() {
        let move_window = FrameWindow::new(0, 60);
        let placed = place_overlay(move_window, 1000, 3000, 30, OverrunPolicy::default());
        assert_eq!(placed.overlay_window, FrameWindow::new(30, 90));
        assert_eq!(placed.overrun_frames(), 60);
    }

    #[test]
    fn clamp_policy_cuts_at_move_end() {
        let move_window = FrameWindow::new(0, 60);
        let placed = place_overlay(move_window, 1000, 3000, 30, OverrunPolicy::Clamp);
        assert_eq!(placed.overlay_window, FrameWindow::new(30, 30));
        assert_eq!(placed.overrun_frames(), 0);

        // Starting after the move is over leaves nothing to show.
        let late = place_overlay(move_window, 5000, 1000, 30, OverrunPolicy::Clamp);
        assert!(late.overlay_window.is_empty());
        assert_eq!(late.overlay_window.start_frame, 60);
    }

    #[test]
    fn identity_transform_keeps_the_square() {
        let rect = PixelRect { x: 10.0, y: 20.0, size: 100.0 };
        let corners = OverlayTransform::default().corners(&rect);
        assert_eq!(corners, [(10.0, 20.0), (110.0, 20.0), (110.0, 120.0), (10.0, 120.0)]);
    }

    #[test]
    fn scale_and_rotation_pivot_on_centre() {
        let rect = PixelRect { x: 0.0, y: 0.0, size: 100.0 };
        let t = OverlayTransform { scale: 2.0, rotation_degrees: 90.0 };
        let corners = t.corners(&rect);
        // Top-left of a doubled square, rotated a quarter turn, lands top-right.
        assert!((corners[0].0 - 150.0).abs() < 1e-9);
        assert!((corners[0].1 - -50.0).abs() < 1e-9);
        for (x, y) in corners {
            let d = ((x - 50.0).powi(2) + (y - 50.0).powi(2)).sqrt();
            assert!((d - 100.0 * 2f64.sqrt()).abs() < 1e-9);
        }
    }
}
