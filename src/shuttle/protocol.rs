//! Input/output report layout of the jog/shuttle controller.
//!
//! Pure decoding only: a raw input report becomes a [`ShuttleSample`], and a
//! pair of consecutive samples yields the transport actions they trigger.

use std::time::Duration;

use crate::domain::errors::DomainError;

/// USB vendor id of the supported controller
pub const SHUTTLE_VENDOR_ID: u16 = 0x0b33;
/// USB product id of the supported controller
pub const SHUTTLE_PRODUCT_ID: u16 = 0x0030;

/// Output report that arms continuous input reporting
pub const ACTIVATION_REPORT_ID: u8 = 0x01;
pub const ACTIVATION_PAYLOAD: [u8; 1] = [42];

/// Always-on wheel poll, running from construction
pub const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(300);
/// Wheel poll started once the device acknowledges activation
pub const ACTIVE_POLL_INTERVAL: Duration = Duration::from_millis(20);

/// Frames moved per poll tick for each unit of wheel deflection
pub const FRAMES_PER_DEFLECTION: i64 = 5;

/// Byte offsets within an input report
pub const WHEEL_OFFSET: usize = 0;
pub const DIAL_OFFSET: usize = 1;
pub const BUTTONS_LOW_OFFSET: usize = 3;
pub const BUTTONS_HIGH_OFFSET: usize = 4;

/// Shortest input report carrying every decoded byte
pub const MIN_REPORT_LEN: usize = BUTTONS_HIGH_OFFSET + 1;

/// Decoded snapshot of one input report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShuttleSample {
    pub wheel: u8,
    pub dial: u8,
    pub buttons_low: u8,
    pub buttons_high: u8,
}

impl ShuttleSample {
    /// Decode a raw input report
    pub fn decode(report: &[u8]) -> Result<Self, DomainError> {
        if report.len() < MIN_REPORT_LEN {
            return Err(DomainError::DeviceFailed(format!(
                "input report too short: {} bytes, need {}",
                report.len(),
                MIN_REPORT_LEN
            )));
        }

        Ok(Self {
            wheel: report[WHEEL_OFFSET],
            dial: report[DIAL_OFFSET],
            buttons_low: report[BUTTONS_LOW_OFFSET],
            buttons_high: report[BUTTONS_HIGH_OFFSET],
        })
    }

    /// Value of the byte at a report offset
    pub fn byte_at(&self, offset: usize) -> Option<u8> {
        match offset {
            WHEEL_OFFSET => Some(self.wheel),
            DIAL_OFFSET => Some(self.dial),
            BUTTONS_LOW_OFFSET => Some(self.buttons_low),
            BUTTONS_HIGH_OFFSET => Some(self.buttons_high),
            _ => None,
        }
    }
}

/// Continuous motion requested by the spring-loaded shuttle wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuttleSpeed {
    Neutral,
    Forward(i64),
    Reverse(i64),
}

impl ShuttleSpeed {
    /// Decode the wheel byte into frames per poll tick.
    ///
    /// `1..=126` runs forward, `129..=255` runs in reverse with 255 the
    /// slowest; 0, 127 and 128 are rest positions.
    pub fn from_wheel(wheel: u8) -> Self {
        match wheel {
            1..=126 => ShuttleSpeed::Forward(wheel as i64 * FRAMES_PER_DEFLECTION),
            129..=255 => ShuttleSpeed::Reverse((256 - wheel as i64) * FRAMES_PER_DEFLECTION),
            _ => ShuttleSpeed::Neutral,
        }
    }

    /// Signed frame step for one tick
    pub fn frames_per_tick(&self) -> i64 {
        match self {
            ShuttleSpeed::Neutral => 0,
            ShuttleSpeed::Forward(frames) => *frames,
            ShuttleSpeed::Reverse(frames) => -*frames,
        }
    }
}

/// Single-frame step from the free-spinning jog dial
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialStep {
    Forward,
    Back,
}

impl DialStep {
    /// Edge-triggered comparison against the previous sample
    pub fn between(previous: Option<&ShuttleSample>, current: &ShuttleSample) -> Option<Self> {
        let previous = previous?;
        if current.dial > previous.dial {
            Some(DialStep::Forward)
        } else if current.dial < previous.dial {
            Some(DialStep::Back)
        } else {
            None
        }
    }

    pub fn frames(&self) -> i64 {
        match self {
            DialStep::Forward => 1,
            DialStep::Back => -1,
        }
    }
}

/// Transport action bound to a controller button
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    MarkIn,
    MarkOut,
    GoToIn,
    GoToOut,
    Pause,
    Play,
}

/// A button binding: fires when the byte at `offset` equals `mask` exactly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonRule {
    pub offset: usize,
    pub mask: u8,
    pub action: ButtonAction,
}

const fn rule(offset: usize, mask: u8, action: ButtonAction) -> ButtonRule {
    ButtonRule {
        offset,
        mask,
        action,
    }
}

/// Button bindings. Groups are evaluated independently and in order; within
/// a group only the first matching rule fires.
pub const BUTTON_TABLE: &[&[ButtonRule]] = &[
    &[
        rule(BUTTONS_HIGH_OFFSET, 32, ButtonAction::MarkIn),
        rule(BUTTONS_HIGH_OFFSET, 64, ButtonAction::MarkOut),
    ],
    &[
        rule(BUTTONS_LOW_OFFSET, 16, ButtonAction::GoToIn),
        rule(BUTTONS_HIGH_OFFSET, 1, ButtonAction::GoToOut),
        rule(BUTTONS_LOW_OFFSET, 64, ButtonAction::Pause),
        rule(BUTTONS_LOW_OFFSET, 128, ButtonAction::Play),
    ],
];

/// Actions triggered by the button bytes of one sample, in table order
pub fn button_actions(sample: &ShuttleSample) -> Vec<ButtonAction> {
    BUTTON_TABLE
        .iter()
        .filter_map(|group| {
            group
                .iter()
                .find(|rule| sample.byte_at(rule.offset) == Some(rule.mask))
                .map(|rule| rule.action)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(wheel: u8, dial: u8, low: u8, high: u8) -> ShuttleSample {
        ShuttleSample {
            wheel,
            dial,
            buttons_low: low,
            buttons_high: high,
        }
    }

    #[test]
    fn test_decode_report() {
        let s = ShuttleSample::decode(&[200, 17, 0, 16, 32]).unwrap();
        assert_eq!(s, sample(200, 17, 16, 32));

        // trailing bytes are ignored
        let s = ShuttleSample::decode(&[1, 2, 3, 4, 5, 6, 7]).unwrap();
        assert_eq!(s, sample(1, 2, 4, 5));
    }

    #[test]
    fn test_decode_rejects_short_report() {
        assert!(ShuttleSample::decode(&[1, 2, 3, 4]).is_err());
        assert!(ShuttleSample::decode(&[]).is_err());
    }

    #[test]
    fn test_wheel_zones() {
        assert_eq!(ShuttleSpeed::from_wheel(0), ShuttleSpeed::Neutral);
        assert_eq!(ShuttleSpeed::from_wheel(127), ShuttleSpeed::Neutral);
        assert_eq!(ShuttleSpeed::from_wheel(128), ShuttleSpeed::Neutral);
        assert_eq!(ShuttleSpeed::from_wheel(1), ShuttleSpeed::Forward(5));
        assert_eq!(ShuttleSpeed::from_wheel(126), ShuttleSpeed::Forward(630));
        assert_eq!(ShuttleSpeed::from_wheel(129), ShuttleSpeed::Reverse(635));
        assert_eq!(ShuttleSpeed::from_wheel(255), ShuttleSpeed::Reverse(5));
    }

    #[test]
    fn test_wheel_200_reverses_280_frames() {
        let speed = ShuttleSpeed::from_wheel(200);
        assert_eq!(speed, ShuttleSpeed::Reverse(280));
        assert_eq!(speed.frames_per_tick(), -280);
        assert_eq!(ShuttleSpeed::from_wheel(0).frames_per_tick(), 0);
    }

    #[test]
    fn test_dial_is_edge_triggered() {
        let prev = sample(0, 10, 0, 0);
        assert_eq!(DialStep::between(Some(&prev), &sample(0, 11, 0, 0)), Some(DialStep::Forward));
        assert_eq!(DialStep::between(Some(&prev), &sample(0, 40, 0, 0)), Some(DialStep::Forward));
        assert_eq!(DialStep::between(Some(&prev), &sample(0, 9, 0, 0)), Some(DialStep::Back));
        assert_eq!(DialStep::between(Some(&prev), &sample(0, 10, 0, 0)), None);
        assert_eq!(DialStep::between(None, &sample(0, 200, 0, 0)), None);
    }

    #[test]
    fn test_mark_in_fires_regardless_of_low_byte() {
        for low in [0, 16, 64, 128, 255] {
            let actions = button_actions(&sample(0, 0, low, 32));
            assert_eq!(actions.first(), Some(&ButtonAction::MarkIn), "low byte {}", low);
        }
    }

    #[test]
    fn test_button_groups_are_independent() {
        assert_eq!(
            button_actions(&sample(0, 0, 16, 32)),
            vec![ButtonAction::MarkIn, ButtonAction::GoToIn]
        );
        assert_eq!(
            button_actions(&sample(0, 0, 128, 64)),
            vec![ButtonAction::MarkOut, ButtonAction::Play]
        );
    }

    #[test]
    fn test_first_match_wins_within_group() {
        // GoToIn shadows Pause/Play checks on the same report
        assert_eq!(button_actions(&sample(0, 0, 16, 0)), vec![ButtonAction::GoToIn]);
        // GoToOut on the high byte shadows Pause on the low byte
        assert_eq!(button_actions(&sample(0, 0, 64, 1)), vec![ButtonAction::GoToOut]);
        assert_eq!(button_actions(&sample(0, 0, 64, 0)), vec![ButtonAction::Pause]);
        assert_eq!(button_actions(&sample(0, 0, 128, 0)), vec![ButtonAction::Play]);
    }

    #[test]
    fn test_unbound_values_trigger_nothing() {
        assert!(button_actions(&sample(0, 0, 0, 0)).is_empty());
        // combined bits are not a match
        assert!(button_actions(&sample(0, 0, 16 | 64, 32 | 64)).is_empty());
    }
}
