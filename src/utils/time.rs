//! Timestamp entry parsing
//!
//! Operator entry is keypad-style: digits fill the `HH:MM:SS:FF` fields from
//! the right, so `130` reads as `00:00:01:30`. A leading `+` or `-` makes the
//! entry relative to the current playback position. The first sign-and-digits
//! run in the text is used and anything around it is ignored.

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::errors::DomainError;
use crate::domain::model::{FrameRate, SeekDirective, Timecode, TimecodeCodec};

/// Longest digit run accepted (`HHMMSSFF`)
pub const MAX_ENTRY_DIGITS: usize = 8;

/// Highest minutes/seconds value kept after clamping
const MAX_SEXAGESIMAL: u32 = 59;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Sign {
    Forward,
    Backward,
}

/// Parser for free-form timestamp entry
#[derive(Debug, Clone, Copy)]
pub struct TimestampParser {
    codec: TimecodeCodec,
}

impl TimestampParser {
    /// Create a new timestamp parser
    pub fn new(rate: FrameRate) -> Self {
        Self {
            codec: TimecodeCodec::new(rate),
        }
    }

    pub fn frame_rate(&self) -> FrameRate {
        self.codec.frame_rate()
    }

    /// Parse operator text into a seek directive
    pub fn parse(&self, text: &str) -> Result<SeekDirective, DomainError> {
        let (sign, digits) = split_entry(text)?;
        let seconds = self.digits_to_seconds(&digits);

        Ok(match sign {
            None => SeekDirective::Absolute(seconds),
            Some(Sign::Forward) => SeekDirective::RelativeForward(seconds),
            Some(Sign::Backward) => SeekDirective::RelativeBackward(seconds),
        })
    }

    /// Parse operator text and resolve it against the current position
    pub fn resolve(&self, text: &str, current_position: f64) -> Result<f64, DomainError> {
        Ok(self.parse(text)?.resolve(current_position))
    }

    /// Interpret an unsigned entry (with or without `:`) as absolute seconds
    pub fn entry_to_seconds(&self, text: &str) -> Result<f64, DomainError> {
        match split_entry(text)? {
            (None, digits) => Ok(self.digits_to_seconds(&digits)),
            (Some(_), _) => Err(DomainError::InvalidTimestamp(text.to_string())),
        }
    }

    /// Clamped timecode for a run of one to eight ASCII digits
    fn digits_to_timecode(&self, digits: &str) -> Timecode {
        let padded = format!("{:0>width$}", digits, width = MAX_ENTRY_DIGITS);
        let bytes = padded.as_bytes();
        let field = |i: usize| -> u32 {
            let pair = &bytes[i * 2..i * 2 + 2];
            (pair[0] - b'0') as u32 * 10 + (pair[1] - b'0') as u32
        };

        Timecode {
            hours: field(0),
            minutes: field(1).min(MAX_SEXAGESIMAL),
            seconds: field(2).min(MAX_SEXAGESIMAL),
            frames: field(3).min(self.codec.frame_rate().fps()),
        }
    }

    fn digits_to_seconds(&self, digits: &str) -> f64 {
        let timecode = self.digits_to_timecode(digits);
        self.codec.timecode_to_seconds(&timecode)
    }
}

fn entry_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"([-+])?([0-9]{1,8})").expect("entry pattern is a valid regex")
    })
}

/// Drop `:` separators and take the first optional sign plus 1-8 digit run
fn split_entry(text: &str) -> Result<(Option<Sign>, String), DomainError> {
    let stripped: String = text.chars().filter(|c| *c != ':').collect();

    let captures = entry_pattern()
        .captures(&stripped)
        .ok_or_else(|| DomainError::InvalidTimestamp(text.to_string()))?;

    let sign = captures.get(1).map(|m| match m.as_str() {
        "+" => Sign::Forward,
        _ => Sign::Backward,
    });
    let digits = captures
        .get(2)
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| DomainError::InvalidTimestamp(text.to_string()))?;

    Ok((sign, digits))
}
