//! Transport control over the playback engine
//!
//! Keyboard shortcuts and the shuttle controller both drive playback through
//! [`TransportController`]. Every request is fire-and-forget; the position it
//! produces is observed later by the [`frame_sync::FrameSyncLoop`].

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{FrameRate, MarkFields, SeekDirective, Timecode, TimecodeCodec};
use crate::ports::PlaybackPort;
use crate::utils::time::TimestampParser;

pub mod frame_sync;
pub mod keys;

pub use frame_sync::{FrameSyncLoop, TimecodeDisplay};
pub use keys::{Focus, Key, KeyboardShortcuts, ShortcutAction};

/// Which mark field an operation targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkPoint {
    In,
    Out,
}

/// Play/pause/seek/step/mark operations against the playback engine
pub struct TransportController {
    playback: Arc<dyn PlaybackPort>,
    codec: TimecodeCodec,
    parser: TimestampParser,
    marks: Mutex<MarkFields>,
}

impl TransportController {
    pub fn new(playback: Arc<dyn PlaybackPort>, rate: FrameRate) -> Self {
        Self {
            playback,
            codec: TimecodeCodec::new(rate),
            parser: TimestampParser::new(rate),
            marks: Mutex::new(MarkFields::default()),
        }
    }

    pub fn codec(&self) -> &TimecodeCodec {
        &self.codec
    }

    pub fn parser(&self) -> &TimestampParser {
        &self.parser
    }

    pub fn current_time(&self) -> f64 {
        self.playback.current_time()
    }

    pub fn current_timecode(&self) -> Timecode {
        self.codec.seconds_to_timecode(self.playback.current_time())
    }

    /// Toggle between playing and paused
    pub fn play_pause(&self) {
        if self.playback.is_paused() {
            self.play();
        } else {
            self.pause();
        }
    }

    pub fn play(&self) {
        guard("play", self.playback.play());
    }

    pub fn pause(&self) {
        guard("pause", self.playback.pause());
    }

    /// Move by `frames` (negative steps back)
    pub fn step_frames(&self, frames: i64) {
        if frames == 0 {
            return;
        }
        let delta = frames as f64 / self.codec.frame_rate().as_f64();
        self.seek_to(self.playback.current_time() + delta);
    }

    pub fn step_forward(&self) {
        self.step_frames(1);
    }

    pub fn step_back(&self) {
        self.step_frames(-1);
    }

    pub fn seek(&self, directive: SeekDirective) {
        self.seek_to(directive.resolve(self.playback.current_time()));
    }

    /// Parse operator text and seek; the position is untouched on bad input
    pub fn seek_entry(&self, text: &str) -> Result<(), DomainError> {
        let directive = self.parser.parse(text)?;
        self.seek(directive);
        Ok(())
    }

    /// Capture the current position into the in-point field
    pub fn mark_in(&self) -> String {
        self.mark(MarkPoint::In)
    }

    /// Capture the current position into the out-point field
    pub fn mark_out(&self) -> String {
        self.mark(MarkPoint::Out)
    }

    pub fn go_to_in(&self) -> Result<(), DomainError> {
        self.go_to(MarkPoint::In)
    }

    pub fn go_to_out(&self) -> Result<(), DomainError> {
        self.go_to(MarkPoint::Out)
    }

    /// Replace a mark field with operator-typed text
    pub fn set_mark(&self, point: MarkPoint, text: &str) {
        let mut marks = self.marks.lock();
        match point {
            MarkPoint::In => marks.in_point = text.to_string(),
            MarkPoint::Out => marks.out_point = text.to_string(),
        }
    }

    pub fn marks(&self) -> MarkFields {
        self.marks.lock().clone()
    }

    fn mark(&self, point: MarkPoint) -> String {
        let formatted = self.codec.format(self.playback.current_time());
        self.set_mark(point, &formatted);
        debug!(?point, timecode = %formatted, "Mark set");
        formatted
    }

    fn go_to(&self, point: MarkPoint) -> Result<(), DomainError> {
        let field = {
            let marks = self.marks.lock();
            match point {
                MarkPoint::In => marks.in_point.clone(),
                MarkPoint::Out => marks.out_point.clone(),
            }
        };
        self.seek_entry(&field)
    }

    fn seek_to(&self, seconds: f64) {
        let target = seconds.max(0.0);
        guard("seek", self.playback.set_current_time(target));
    }
}

/// Engine failures are logged and dropped; the transport never faults
fn guard(operation: &str, result: Result<(), DomainError>) {
    if let Err(e) = result {
        warn!("Playback engine rejected {}: {}", operation, e);
    }
}
