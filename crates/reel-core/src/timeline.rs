//! Frame timeline for a sequence of moves.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// `{startFrame, frameCount}`: a half-open range of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameWindow {
    pub start_frame: u64,
    pub frame_count: u64,
}

impl FrameWindow {
    pub fn new(start_frame: u64, frame_count: u64) -> Self {
        Self {
            start_frame,
            frame_count,
        }
    }

    /// First frame past the window.
    pub fn end_frame(self) -> u64 {
        self.start_frame + self.frame_count
    }

    pub fn is_empty(self) -> bool {
        self.frame_count == 0
    }

    pub fn contains(self, frame: u64) -> bool {
        self.start_frame <= frame && frame < self.end_frame()
    }
}

/// Frames needed to show `ms` milliseconds at `fps`, rounded half away from
/// zero. Integer arithmetic keeps `.5` cases exact.
pub fn frames_for_ms(ms: u32, fps: u32) -> u64 {
    (u64::from(ms) * u64::from(fps) + 500) / 1000
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeline {
    pub fps: u32,
    pub windows: Vec<FrameWindow>,
    pub total_frames: u64,
}

impl Timeline {
    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }

    /// Zero-based position of the move on screen at `frame`, if any.
    pub fn move_at_frame(&self, frame: u64) -> Option<usize> {
        if frame >= self.total_frames {
            return None;
        }
        // Zero-length windows never own a frame; partition_point skips them.
        let idx = self.windows.partition_point(|w| w.end_frame() <= frame);
        self.windows.get(idx).filter(|w| w.contains(frame)).map(|_| idx)
    }
}

/// Lay out moves back to back, each rounded to whole frames on its own.
///
/// Rounding error is not carried between moves, so the timeline may drift
/// from the summed millisecond duration by up to half a frame per move.
pub fn layout_timeline(durations_ms: &[u32], fps: u32) -> CoreResult<Timeline> {
    if fps == 0 {
        return Err(CoreError::InvalidFrameRate);
    }
    if let Some(pos) = durations_ms.iter().position(|&d| d == 0) {
        return Err(CoreError::InvalidDuration { index: pos + 1 });
    }

    let mut start = 0u64;
    let windows = durations_ms
        .iter()
        .map(|&ms| {
            let window = FrameWindow::new(start, frames_for_ms(ms, fps));
            start = window.end_frame();
            window
        })
        .collect();

    Ok(Timeline {
        fps,
        windows,
        total_frames: start,
    })
}

pub fn total_duration_ms(durations_ms: &[u32]) -> u64 {
    durations_ms.iter().map(|&d| u64::from(d)).sum()
}

/// `M:SS`, truncating sub-second remainders.
pub fn format_duration(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn three_moves_at_two_seconds() {
        let timeline = layout_timeline(&[2000, 2000, 2000], 30).unwrap();
        assert_eq!(
            timeline.windows,
            vec![
                FrameWindow::new(0, 60),
                FrameWindow::new(60, 60),
                FrameWindow::new(120, 60),
            ]
        );
        assert_eq!(timeline.total_frames, 180);
    }

    #[test]
    fn windows_are_contiguous_and_sum_to_total() {
        let durations = [1, 17, 33, 50, 999, 1234, 2000, 4567, 16];
        for fps in [1, 24, 25, 30, 60] {
            let timeline = layout_timeline(&durations, fps).unwrap();
            assert_eq!(timeline.windows[0].start_frame, 0);
            for pair in timeline.windows.windows(2) {
                assert_eq!(pair[1].start_frame, pair[0].end_frame());
            }
            let sum: u64 = timeline.windows.iter().map(|w| w.frame_count).sum();
            assert_eq!(sum, timeline.total_frames);
        }
    }

    #[test]
    fn rounding_is_half_up_per_move() {
        // 50ms at 30fps is exactly 1.5 frames.
        assert_eq!(frames_for_ms(50, 30), 2);
        assert_eq!(frames_for_ms(49, 30), 1);
        assert_eq!(frames_for_ms(16, 30), 0);

        // Each 50ms move rounds up on its own: 4 moves = 8 frames, not 6.
        let timeline = layout_timeline(&[50, 50, 50, 50], 30).unwrap();
        assert_eq!(timeline.total_frames, 8);
    }

    #[test]
    fn empty_input_is_an_empty_timeline() {
        let timeline = layout_timeline(&[], 30).unwrap();
        assert!(timeline.is_empty());
        assert_eq!(timeline.total_frames, 0);
        assert_eq!(timeline.move_at_frame(0), None);
    }

    #[test]
    fn bad_inputs_produce_nothing() {
        assert_eq!(layout_timeline(&[2000], 0), Err(CoreError::InvalidFrameRate));
        assert_eq!(
            layout_timeline(&[2000, 0, 2000], 30),
            Err(CoreError::InvalidDuration { index: 2 })
        );
    }

    #[test]
    fn frame_lookup() {
        // The 10ms move rounds to zero frames and is never on screen.
        let timeline = layout_timeline(&[1000, 10, 500], 30).unwrap();
        assert_eq!(timeline.move_at_frame(0), Some(0));
        assert_eq!(timeline.move_at_frame(29), Some(0));
        assert_eq!(timeline.move_at_frame(30), Some(2));
        assert_eq!(timeline.move_at_frame(44), Some(2));
        assert_eq!(timeline.move_at_frame(45), None);
    }

    #[test]
    fn duration_helpers() {
        assert_eq!(total_duration_ms(&[2000, 2500, 500]), 5000);
        assert_eq!(format_duration(0), "0:00");
        assert_eq!(format_duration(65_999), "1:05");
        assert_eq!(format_duration(600_000), "10:00");
    }
}
