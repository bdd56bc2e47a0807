//! Flattened input for the external composition renderer, and a render plan
//! with every frame window and pixel rectangle worked out in advance.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::{AssetKind, CoreError, CoreResult};
use crate::model::{MemeClip, Move, Overlay, Project, TransitionSound};
use crate::placement::{
    place_overlay, BoardGeometry, OverlayPlacement, OverlayTransform, OverrunPolicy, PixelRect,
};
use crate::square::Square;
use crate::timeline::{layout_timeline, FrameWindow};

pub const DEFAULT_FPS: u32 = 30;
pub const DEFAULT_WIDTH: u32 = 1080;
pub const DEFAULT_HEIGHT: u32 = 1920;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSettings {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub overrun_policy: OverrunPolicy,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            fps: DEFAULT_FPS,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            overrun_policy: OverrunPolicy::Extend,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderMove {
    pub id: i64,
    pub index: u32,
    pub notation: String,
    pub fen: String,
    pub duration_ms: u32,
    /// Move-level sound, or the project default when the move has none.
    pub transition_sound_id: Option<i64>,
    pub overlays: Vec<Overlay>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemeClipSource {
    #[serde(flatten)]
    pub clip: MemeClip,
    pub video_url: String,
    pub thumbnail_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionSoundSource {
    #[serde(flatten)]
    pub sound: TransitionSound,
    pub audio_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderInput {
    pub moves: Vec<RenderMove>,
    pub meme_clips_by_id: BTreeMap<i64, MemeClipSource>,
    pub transition_sounds_by_id: BTreeMap<i64, TransitionSoundSource>,
    pub fps: u32,
    pub width: u32,
    pub height: u32,
}

/// The sound that plays when `mv` comes on screen.
pub fn effective_transition_sound(mv: &Move, project: &Project) -> Option<i64> {
    mv.transition_sound_id.or(project.default_transition_sound_id)
}

/// Join a project's rows into renderer input. Every referenced meme clip and
/// transition sound must be present in `clips` / `sounds`.
pub fn build_render_input(
    project: &Project,
    mut moves: Vec<Move>,
    overlays: Vec<Overlay>,
    clips: &[MemeClip],
    sounds: &[TransitionSound],
    settings: &RenderSettings,
    resolve_url: impl Fn(&str) -> String,
) -> CoreResult<RenderInput> {
    moves.sort_by_key(|m| m.index);

    let clip_lookup: HashMap<i64, &MemeClip> = clips.iter().map(|c| (c.id, c)).collect();
    let sound_lookup: HashMap<i64, &TransitionSound> = sounds.iter().map(|s| (s.id, s)).collect();

    let mut overlays_by_move: HashMap<i64, Vec<Overlay>> = HashMap::new();
    for overlay in overlays {
        overlays_by_move.entry(overlay.move_id).or_default().push(overlay);
    }

    let mut meme_clips_by_id = BTreeMap::new();
    let mut transition_sounds_by_id = BTreeMap::new();
    let mut render_moves = Vec::with_capacity(moves.len());

    for mv in moves {
        let transition_sound_id = effective_transition_sound(&mv, project);
        if let Some(id) = transition_sound_id {
            let sound = sound_lookup.get(&id).ok_or(CoreError::MissingAsset {
                kind: AssetKind::TransitionSound,
                id,
            })?;
            transition_sounds_by_id
                .entry(id)
                .or_insert_with(|| TransitionSoundSource {
                    sound: (*sound).clone(),
                    audio_url: resolve_url(&sound.audio_path),
                });
        }

        let mut move_overlays = overlays_by_move.remove(&mv.id).unwrap_or_default();
        move_overlays.sort_by_key(|o| o.id);
        for overlay in &move_overlays {
            let clip = clip_lookup
                .get(&overlay.meme_clip_id)
                .ok_or(CoreError::MissingAsset {
                    kind: AssetKind::MemeClip,
                    id: overlay.meme_clip_id,
                })?;
            meme_clips_by_id
                .entry(clip.id)
                .or_insert_with(|| MemeClipSource {
                    clip: (*clip).clone(),
                    video_url: resolve_url(&clip.video_path),
                    thumbnail_url: resolve_url(&clip.thumbnail_path),
                });
        }

        render_moves.push(RenderMove {
            id: mv.id,
            index: mv.index,
            notation: mv.notation,
            fen: mv.fen,
            duration_ms: mv.duration_ms,
            transition_sound_id,
            overlays: move_overlays,
        });
    }

    Ok(RenderInput {
        moves: render_moves,
        meme_clips_by_id,
        transition_sounds_by_id,
        fps: settings.fps,
        width: settings.width,
        height: settings.height,
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedOverlay {
    pub overlay_id: i64,
    pub meme_clip_id: i64,
    pub square: Square,
    pub rect: PixelRect,
    pub transform: OverlayTransform,
    #[serde(flatten)]
    pub placement: OverlayPlacement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedMove {
    pub move_id: i64,
    pub index: u32,
    pub fen: String,
    pub window: FrameWindow,
    pub transition_sound_id: Option<i64>,
    pub overlays: Vec<PlannedOverlay>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderPlan {
    pub fps: u32,
    pub width: u32,
    pub height: u32,
    pub board: BoardGeometry,
    pub total_frames: u64,
    pub moves: Vec<PlannedMove>,
}

/// Lay out the whole video: move windows, square rectangles and overlay
/// windows. Nothing is returned unless every move and overlay is well formed.
pub fn plan_render(input: &RenderInput, policy: OverrunPolicy) -> CoreResult<RenderPlan> {
    let durations: Vec<u32> = input.moves.iter().map(|m| m.duration_ms).collect();
    let timeline = layout_timeline(&durations, input.fps)?;
    let board = BoardGeometry::for_frame(input.width, input.height);

    let moves = input
        .moves
        .iter()
        .zip(&timeline.windows)
        .map(|(mv, &window)| -> CoreResult<PlannedMove> {
            let overlays = mv
                .overlays
                .iter()
                .map(|overlay| plan_overlay(input, board, window, overlay, policy))
                .collect::<CoreResult<Vec<_>>>()?;

            Ok(PlannedMove {
                move_id: mv.id,
                index: mv.index,
                fen: mv.fen.clone(),
                window,
                transition_sound_id: mv.transition_sound_id,
                overlays,
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(RenderPlan {
        fps: input.fps,
        width: input.width,
        height: input.height,
        board,
        total_frames: timeline.total_frames,
        moves,
    })
}

fn plan_overlay(
    input: &RenderInput,
    board: BoardGeometry,
    move_window: FrameWindow,
    overlay: &Overlay,
    policy: OverrunPolicy,
) -> CoreResult<PlannedOverlay> {
    let clip = input
        .meme_clips_by_id
        .get(&overlay.meme_clip_id)
        .ok_or(CoreError::MissingAsset {
            kind: AssetKind::MemeClip,
            id: overlay.meme_clip_id,
        })?;

    let placement = place_overlay(
        move_window,
        overlay.start_offset_ms,
        clip.clip.duration_ms,
        input.fps,
        policy,
    );
    if placement.overrun_frames() > 0 {
        tracing::debug!(
            overlay_id = overlay.id,
            overrun = placement.overrun_frames(),
            "overlay plays past the end of its move"
        );
    }

    Ok(PlannedOverlay {
        overlay_id: overlay.id,
        meme_clip_id: overlay.meme_clip_id,
        square: overlay.square,
        rect: board.pixel_rect(overlay.square),
        transform: OverlayTransform {
            scale: overlay.scale,
            rotation_degrees: overlay.rotation_degrees,
        },
        placement,
    })
}
