use serde::{Deserialize, Serialize};
use crate::TileId;

/// One step of a tile's animation sequence.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
pub struct Frame {
    /// Tile displayed while this frame is current.
    pub tile_id: TileId,
    /// Display duration in milliseconds.
    pub duration: u32,
}

impl Frame {
    pub fn new(tile_id: TileId, duration: u32) -> Self {
        Self { tile_id, duration }
    }
}

/**
 * Cyclic playback state over a sequence of [`Frame`]s.
 *
 * Time is fed in via [`advance`](Self::advance) as elapsed milliseconds.
 * Whatever a call does not consume by switching frames is kept as unused
 * time and counts toward the next switch. An empty sequence means
 * "not animated" and ignores all playback calls.
 */
#[derive(Clone, PartialEq, Default, Debug)]
pub struct TileAnimation {
    frames: Vec<Frame>,
    current_frame_index: usize,
    unused_time: u32,
}

impl TileAnimation {

    pub fn new(frames: Vec<Frame>) -> Self {
        Self {
            frames,
            current_frame_index: 0,
            unused_time: 0,
        }
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    /// Replaces the frame sequence and rewinds playback to the start.
    pub fn set_frames(&mut self, frames: Vec<Frame>) {
        self.frames = frames;
        self.current_frame_index = 0;
        self.unused_time = 0;
    }

    pub fn is_animated(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Index of the frame currently displayed.
    /// Always in bounds while the sequence is non-empty.
    pub fn current_frame_index(&self) -> usize {
        self.current_frame_index
    }

    /// Milliseconds accumulated toward the next frame switch.
    pub fn unused_time(&self) -> u32 {
        self.unused_time
    }

    /// Tile id of the frame currently displayed, if animated.
    pub fn current_frame_tile_id(&self) -> Option<TileId> {
        self.frames
            .get(self.current_frame_index)
            .map(|frame| frame.tile_id)
    }

    /// Rewinds playback to the first frame with no accumulated time.
    /// Returns whether that changed playback state, so callers can skip
    /// a redraw when there was nothing to rewind.
    pub fn reset(&mut self) -> bool {
        let changed = self.current_frame_index != 0 || self.unused_time != 0;
        self.current_frame_index = 0;
        self.unused_time = 0;
        changed
    }

    /// Feeds elapsed milliseconds into playback. Every frame whose duration
    /// is covered by the accumulated time is stepped past, wrapping to the
    /// first frame after the last. Returns whether the call ended on a
    /// different frame index than it started on.
    ///
    /// Zero-duration frames never consume time, so stepping is capped at
    /// one full cycle per call. Accumulated time is dropped when the cap
    /// stops the loop, which keeps repeated calls from spinning on it.
    pub fn advance(&mut self, elapsed_ms: u32) -> bool {
        if self.frames.is_empty() {
            return false;
        }
        let previous_index = self.current_frame_index;
        self.unused_time += elapsed_ms;
        let mut steps = 0;
        while steps < self.frames.len() && self.unused_time >= self.frames[self.current_frame_index].duration {
            self.unused_time -= self.frames[self.current_frame_index].duration;
            self.current_frame_index = (self.current_frame_index + 1) % self.frames.len();
            steps += 1;
        }
        if steps == self.frames.len() {
            self.unused_time = 0;
        }
        self.current_frame_index != previous_index
    }
}
