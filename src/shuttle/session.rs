//! Per-connection shuttle state

use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use crate::ports::HidDevice;
use crate::shuttle::protocol::{button_actions, ButtonAction, DialStep, ShuttleSample, ShuttleSpeed};

/// Last received wheel byte, shared between the report reader and both polls.
///
/// Last writer wins.
#[derive(Debug, Clone, Default)]
pub struct WheelDeflection(Arc<AtomicU8>);

impl WheelDeflection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }

    pub fn set(&self, wheel: u8) {
        self.0.store(wheel, Ordering::Relaxed);
    }

    pub fn speed(&self) -> ShuttleSpeed {
        ShuttleSpeed::from_wheel(self.get())
    }
}

/// What one input report asks the transport to do
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportEffects {
    pub dial: Option<DialStep>,
    pub buttons: Vec<ButtonAction>,
}

impl ReportEffects {
    pub fn is_empty(&self) -> bool {
        self.dial.is_none() && self.buttons.is_empty()
    }
}

/// The open device, the previous sample and the wheel value it feeds
pub struct ShuttleSession {
    device: Arc<dyn HidDevice>,
    last_sample: Option<ShuttleSample>,
    wheel: WheelDeflection,
}

impl ShuttleSession {
    pub fn new(device: Arc<dyn HidDevice>, wheel: WheelDeflection) -> Self {
        Self {
            device,
            last_sample: None,
            wheel,
        }
    }

    pub fn device(&self) -> &Arc<dyn HidDevice> {
        &self.device
    }

    pub fn last_sample(&self) -> Option<&ShuttleSample> {
        self.last_sample.as_ref()
    }

    /// Record a sample and work out the discrete actions it triggers.
    ///
    /// The wheel byte is only stored; the polls turn it into motion.
    pub fn ingest(&mut self, sample: ShuttleSample) -> ReportEffects {
        self.wheel.set(sample.wheel);

        let effects = ReportEffects {
            dial: DialStep::between(self.last_sample.as_ref(), &sample),
            buttons: button_actions(&sample),
        };

        self.last_sample = Some(sample);
        effects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::errors::DomainError;
    use async_trait::async_trait;

    struct NullDevice;

    #[async_trait]
    impl HidDevice for NullDevice {
        fn product_name(&self) -> String {
            "null".to_string()
        }

        async fn open(&self) -> Result<(), DomainError> {
            Ok(())
        }

        async fn send_report(&self, _report_id: u8, _data: &[u8]) -> Result<(), DomainError> {
            Ok(())
        }

        async fn read_report(&self) -> Result<Option<Vec<u8>>, DomainError> {
            Ok(None)
        }

        async fn close(&self) {}
    }

    fn sample(wheel: u8, dial: u8, low: u8, high: u8) -> ShuttleSample {
        ShuttleSample {
            wheel,
            dial,
            buttons_low: low,
            buttons_high: high,
        }
    }

    #[test]
    fn test_first_report_never_steps() {
        let wheel = WheelDeflection::new();
        let mut session = ShuttleSession::new(Arc::new(NullDevice), wheel.clone());
        assert!(session.last_sample().is_none());

        let effects = session.ingest(sample(0, 99, 0, 0));
        assert!(effects.is_empty());
        assert_eq!(session.last_sample(), Some(&sample(0, 99, 0, 0)));
    }

    #[test]
    fn test_dial_compares_with_previous_sample() {
        let mut session = ShuttleSession::new(Arc::new(NullDevice), WheelDeflection::new());
        session.ingest(sample(0, 5, 0, 0));

        assert_eq!(session.ingest(sample(0, 6, 0, 0)).dial, Some(DialStep::Forward));
        assert_eq!(session.ingest(sample(0, 6, 0, 0)).dial, None);
        assert_eq!(session.ingest(sample(0, 2, 0, 0)).dial, Some(DialStep::Back));
    }

    #[test]
    fn test_wheel_value_is_shared() {
        let wheel = WheelDeflection::new();
        let mut session = ShuttleSession::new(Arc::new(NullDevice), wheel.clone());

        session.ingest(sample(200, 0, 0, 0));
        assert_eq!(wheel.get(), 200);
        assert_eq!(wheel.speed(), ShuttleSpeed::Reverse(280));

        session.ingest(sample(0, 0, 0, 0));
        assert_eq!(wheel.speed(), ShuttleSpeed::Neutral);
    }

    #[test]
    fn test_buttons_reported_with_dial() {
        let mut session = ShuttleSession::new(Arc::new(NullDevice), WheelDeflection::new());
        session.ingest(sample(0, 1, 0, 0));

        let effects = session.ingest(sample(0, 2, 0, 32));
        assert_eq!(effects.dial, Some(DialStep::Forward));
        assert_eq!(effects.buttons, vec![ButtonAction::MarkIn]);
    }
}
