// Domain models - Core types and data structures

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

pub mod config;
pub mod talks;

pub use config::{LogLevel, ShuttleSettings, VideologConfig};
pub use talks::{TalkCatalog, TalkInfo};

/// Frames per second of the loaded media.
///
/// Fixed for the lifetime of a session; every timecode computation is
/// parameterized by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct FrameRate(u32);

impl FrameRate {
    /// Create a frame rate, rejecting zero
    pub fn new(fps: u32) -> Result<Self, DomainError> {
        if fps == 0 {
            return Err(DomainError::InvalidFrameRate(fps));
        }
        Ok(Self(fps))
    }

    pub fn fps(&self) -> u32 {
        self.0
    }

    pub fn as_f64(&self) -> f64 {
        self.0 as f64
    }

    /// Duration of a single frame in seconds
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.as_f64()
    }
}

impl Default for FrameRate {
    fn default() -> Self {
        Self(50)
    }
}

impl TryFrom<u32> for FrameRate {
    type Error = DomainError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<FrameRate> for u32 {
    fn from(rate: FrameRate) -> Self {
        rate.0
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} fps", self.0)
    }
}

/// `HH:MM:SS:FF` position at a fixed frame rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Timecode {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub frames: u32,
}

impl Timecode {
    pub fn new(hours: u32, minutes: u32, seconds: u32, frames: u32) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            frames,
        }
    }
}

impl fmt::Display for Timecode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frames
        )
    }
}

/// Converts between elapsed seconds and timecodes at one frame rate.
///
/// Conversions go through a whole frame count, so anything finer than a frame
/// is dropped on the way to a [`Timecode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimecodeCodec {
    rate: FrameRate,
}

impl TimecodeCodec {
    pub fn new(rate: FrameRate) -> Self {
        Self { rate }
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.rate
    }

    /// Nearest whole frame count for `seconds`; negative or non-finite input is frame zero
    pub fn total_frames(&self, seconds: f64) -> u64 {
        if !seconds.is_finite() || seconds <= 0.0 {
            return 0;
        }
        (seconds * self.rate.as_f64()).round() as u64
    }

    /// Convert elapsed seconds to a timecode. Hours wrap at 60.
    pub fn seconds_to_timecode(&self, seconds: f64) -> Timecode {
        let total = self.total_frames(seconds);
        let fps = self.rate.fps() as u64;

        Timecode {
            hours: ((total / (fps * 60 * 60)) % 60) as u32,
            minutes: ((total / (fps * 60)) % 60) as u32,
            seconds: ((total / fps) % 60) as u32,
            frames: (total % fps) as u32,
        }
    }

    /// Convert a timecode back to elapsed seconds
    pub fn timecode_to_seconds(&self, timecode: &Timecode) -> f64 {
        let fps = self.rate.fps() as u64;
        let whole_seconds = timecode.hours as u64 * 3600
            + timecode.minutes as u64 * 60
            + timecode.seconds as u64;
        let total = whole_seconds * fps + timecode.frames as u64;
        total as f64 / self.rate.as_f64()
    }

    /// Format elapsed seconds as `HH:MM:SS:FF`
    pub fn format(&self, seconds: f64) -> String {
        self.seconds_to_timecode(seconds).to_string()
    }
}

/// Seek target produced from operator text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SeekDirective {
    Absolute(f64),
    RelativeForward(f64),
    RelativeBackward(f64),
}

impl SeekDirective {
    /// Target position given the current playback position
    pub fn resolve(&self, current: f64) -> f64 {
        match self {
            SeekDirective::Absolute(seconds) => *seconds,
            SeekDirective::RelativeForward(seconds) => current + seconds,
            SeekDirective::RelativeBackward(seconds) => current - seconds,
        }
    }

    pub fn is_relative(&self) -> bool {
        !matches!(self, SeekDirective::Absolute(_))
    }
}

/// In/out field contents as the operator sees them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkFields {
    pub in_point: String,
    pub out_point: String,
}

/// Fields of a clip-extraction job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobField {
    StartTc,
    EndTc,
    Presenter,
    Title,
    Video,
    TalkId,
}

impl JobField {
    /// Multipart form field name
    pub fn form_name(&self) -> &'static str {
        match self {
            JobField::StartTc => "start_tc",
            JobField::EndTc => "end_tc",
            JobField::Presenter => "presenter",
            JobField::Title => "title",
            JobField::Video => "video",
            JobField::TalkId => "talkid",
        }
    }
}

impl fmt::Display for JobField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.form_name())
    }
}

/// Clip-extraction job as submitted to the backend
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipJob {
    pub start_tc: String,
    pub end_tc: String,
    pub presenter: String,
    pub title: String,
    pub video: String,
    #[serde(rename = "talkid")]
    pub talk_id: String,
}

impl ClipJob {
    /// Form fields in submission order
    pub fn form_fields(&self) -> [(JobField, &str); 6] {
        [
            (JobField::StartTc, self.start_tc.as_str()),
            (JobField::EndTc, self.end_tc.as_str()),
            (JobField::Presenter, self.presenter.as_str()),
            (JobField::Title, self.title.as_str()),
            (JobField::Video, self.video.as_str()),
            (JobField::TalkId, self.talk_id.as_str()),
        ]
    }

    /// Take in/out points from the mark fields
    pub fn with_marks(mut self, marks: &MarkFields) -> Self {
        self.start_tc = marks.in_point.clone();
        self.end_tc = marks.out_point.clone();
        self
    }

    /// Autofill talk metadata from a catalog entry
    pub fn with_talk(mut self, talk_id: u64, talk: &TalkInfo) -> Self {
        self.talk_id = talk_id.to_string();
        self.title = talk.title.clone();
        self.presenter = talk.presenter.clone();
        self
    }
}

/// Backend acknowledgement of a queued job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReceipt {
    pub result_id: String,
}

#[cfg(test)]
mod tests;
