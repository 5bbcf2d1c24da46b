//! Shuttle controller lifecycle: acquisition, activation, report reading and
//! the two wheel polls.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::ShuttleSettings;
use crate::ports::{DeviceFilter, HidDevice, HidPort};
use crate::shuttle::protocol::{
    ButtonAction, ShuttleSample, ACTIVATION_PAYLOAD, ACTIVATION_REPORT_ID,
};
use crate::shuttle::session::{ReportEffects, ShuttleSession, WheelDeflection};
use crate::transport::TransportController;

/// Connection state of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShuttleState {
    Disconnected,
    Requesting,
    Connected,
}

#[derive(Default)]
struct Tasks {
    idle_poll: Option<JoinHandle<()>>,
    active_poll: Option<JoinHandle<()>>,
    reader: Option<JoinHandle<()>>,
}

struct Inner {
    hid: Arc<dyn HidPort>,
    transport: Arc<TransportController>,
    filter: DeviceFilter,
    idle_period: Duration,
    active_period: Duration,
    wheel: WheelDeflection,
    state: Mutex<ShuttleState>,
    session: Mutex<Option<ShuttleSession>>,
    tasks: Mutex<Tasks>,
}

/// A USB jog/shuttle controller driving the transport.
///
/// Must be created inside a tokio runtime: the idle wheel poll starts at
/// construction and keeps running whether or not a device is connected.
pub struct ShuttleDevice {
    inner: Arc<Inner>,
}

impl ShuttleDevice {
    pub fn new(
        hid: Arc<dyn HidPort>,
        transport: Arc<TransportController>,
        settings: &ShuttleSettings,
    ) -> Self {
        let inner = Arc::new(Inner {
            hid,
            transport,
            filter: DeviceFilter {
                vendor_id: settings.vendor_id,
                product_id: settings.product_id,
            },
            idle_period: Duration::from_millis(settings.idle_poll_ms),
            active_period: Duration::from_millis(settings.active_poll_ms),
            wheel: WheelDeflection::new(),
            state: Mutex::new(ShuttleState::Disconnected),
            session: Mutex::new(None),
            tasks: Mutex::new(Tasks::default()),
        });

        inner.ensure_idle_poll();
        Self { inner }
    }

    pub fn state(&self) -> ShuttleState {
        *self.inner.state.lock()
    }

    /// Shared wheel value read by both polls
    pub fn wheel(&self) -> WheelDeflection {
        self.inner.wheel.clone()
    }

    /// Request, open and activate a matching controller.
    ///
    /// Acquisition failures leave the device disconnected without surfacing
    /// an error; activation failures tear the session down and are returned.
    pub async fn connect(&self) -> Result<ShuttleState, DomainError> {
        let inner = &self.inner;
        {
            let mut state = inner.state.lock();
            if *state != ShuttleState::Disconnected {
                return Ok(*state);
            }
            *state = ShuttleState::Requesting;
        }
        inner.ensure_idle_poll();

        let devices = match inner.hid.request_device(&inner.filter).await {
            Ok(devices) => devices,
            Err(e) => {
                info!("No shuttle device acquired: {}", e);
                inner.set_state(ShuttleState::Disconnected);
                return Ok(ShuttleState::Disconnected);
            }
        };

        let Some(device) = devices.into_iter().next() else {
            info!("No shuttle device selected");
            inner.set_state(ShuttleState::Disconnected);
            return Ok(ShuttleState::Disconnected);
        };

        if let Err(e) = device.open().await {
            warn!("Failed to open {}: {}", device.product_name(), e);
            inner.set_state(ShuttleState::Disconnected);
            return Ok(ShuttleState::Disconnected);
        }
        info!("Opened device: {}", device.product_name());

        *inner.session.lock() = Some(ShuttleSession::new(
            Arc::clone(&device),
            inner.wheel.clone(),
        ));
        let reader = tokio::spawn(Inner::read_reports(Arc::clone(inner), Arc::clone(&device)));
        inner.tasks.lock().reader = Some(reader);

        if let Err(e) = device
            .send_report(ACTIVATION_REPORT_ID, &ACTIVATION_PAYLOAD)
            .await
        {
            warn!("Shuttle activation failed: {}", e);
            inner.teardown().await;
            return Err(e);
        }
        debug!("Sent output report {}", ACTIVATION_REPORT_ID);

        // a disconnect may have raced the acknowledgement
        if inner.session.lock().is_none() {
            return Ok(ShuttleState::Disconnected);
        }

        let active = inner.spawn_poll(inner.active_period);
        inner.tasks.lock().active_poll = Some(active);
        inner.set_state(ShuttleState::Connected);
        info!("Shuttle connected: {}", device.product_name());

        Ok(ShuttleState::Connected)
    }

    /// Close the device, stop both polls and drop the session
    pub async fn disconnect(&self) {
        self.inner.teardown().await;
    }
}

impl Drop for ShuttleDevice {
    fn drop(&mut self) {
        self.inner.abort_tasks();
    }
}

impl Inner {
    fn set_state(&self, state: ShuttleState) {
        *self.state.lock() = state;
    }

    fn ensure_idle_poll(self: &Arc<Self>) {
        let mut tasks = self.tasks.lock();
        if tasks.idle_poll.is_none() {
            tasks.idle_poll = Some(self.spawn_poll(self.idle_period));
        }
    }

    /// Repeating wheel evaluation at `period`, independent of report arrival
    fn spawn_poll(self: &Arc<Self>, period: Duration) -> JoinHandle<()> {
        let wheel = self.wheel.clone();
        let transport = Arc::clone(&self.transport);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let frames = wheel.speed().frames_per_tick();
                if frames != 0 {
                    transport.step_frames(frames);
                }
            }
        })
    }

    async fn read_reports(inner: Arc<Self>, device: Arc<dyn HidDevice>) {
        loop {
            match device.read_report().await {
                Ok(Some(report)) => inner.handle_report(&report),
                Ok(None) => {
                    info!("Device disconnected: {}", device.product_name());
                    break;
                }
                Err(e) => {
                    warn!("Device read failed: {}", e);
                    break;
                }
            }
        }

        // the reader is finishing on its own, so only the polls need stopping
        inner.tasks.lock().reader.take();
        inner.teardown().await;
    }

    fn handle_report(&self, report: &[u8]) {
        let sample = match ShuttleSample::decode(report) {
            Ok(sample) => sample,
            Err(e) => {
                debug!("Ignoring input report: {}", e);
                return;
            }
        };

        let effects = {
            let mut session = self.session.lock();
            match session.as_mut() {
                Some(session) => session.ingest(sample),
                None => return,
            }
        };

        debug!(?sample, ?effects, "Input report");
        self.apply(effects);
    }

    fn apply(&self, effects: ReportEffects) {
        if let Some(step) = effects.dial {
            self.transport.step_frames(step.frames());
        }

        for action in effects.buttons {
            let result = match action {
                ButtonAction::MarkIn => {
                    self.transport.mark_in();
                    Ok(())
                }
                ButtonAction::MarkOut => {
                    self.transport.mark_out();
                    Ok(())
                }
                ButtonAction::GoToIn => self.transport.go_to_in(),
                ButtonAction::GoToOut => self.transport.go_to_out(),
                ButtonAction::Pause => {
                    self.transport.pause();
                    Ok(())
                }
                ButtonAction::Play => {
                    self.transport.play();
                    Ok(())
                }
            };

            if let Err(e) = result {
                debug!("Shuttle {:?} ignored: {}", action, e);
            }
        }
    }

    /// Stop every task, close the device and forget the session
    async fn teardown(&self) {
        self.abort_tasks();
        self.wheel.set(0);
        let session = self.session.lock().take();
        self.set_state(ShuttleState::Disconnected);

        if let Some(session) = session {
            session.device().close().await;
            info!("Shuttle session closed");
        }
    }

    fn abort_tasks(&self) {
        let mut tasks = self.tasks.lock();
        for handle in [
            tasks.idle_poll.take(),
            tasks.active_poll.take(),
            tasks.reader.take(),
        ]
        .into_iter()
        .flatten()
        {
            handle.abort();
        }
    }
}
