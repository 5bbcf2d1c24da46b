use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::adapters::{default_hid_port, ClockPlaybackAdapter, HttpJobAdapter};
use crate::app::submit_interactor::SubmitInteractor;
use crate::domain::errors::DomainError;
use crate::domain::model::VideologConfig;
use crate::ports::{HidPort, JobPort, PlaybackPort};
use crate::shuttle::ShuttleDevice;
use crate::transport::{FrameSyncLoop, TimecodeDisplay, TransportController};

pub trait AppContainer: Send + Sync {
    fn transport(&self) -> Arc<TransportController>;
    fn display(&self) -> TimecodeDisplay;
    fn shuttle(&self) -> Arc<ShuttleDevice>;
    fn submit_interactor(&self) -> Arc<SubmitInteractor>;
}

/// Wires the adapters into one logging session.
///
/// Must be built inside a tokio runtime: the frame presenter, the frame sync
/// loop and the shuttle idle poll all start here.
pub struct DefaultAppContainer {
    transport: Arc<TransportController>,
    display: TimecodeDisplay,
    shuttle: Arc<ShuttleDevice>,
    submit_interactor: Arc<SubmitInteractor>,
    tasks: Vec<JoinHandle<()>>,
}

impl DefaultAppContainer {
    /// Clock playback over `duration` seconds, the build's HID access and the HTTP backend
    pub fn new(config: &VideologConfig, duration: Option<f64>) -> Result<Self, DomainError> {
        let playback = Arc::new(ClockPlaybackAdapter::new(duration));
        let hid_port = default_hid_port();
        let job_port = Arc::new(HttpJobAdapter::new(&config.api_base_url));
        Self::with_ports(config, playback, hid_port, job_port)
    }

    /// Build around caller-supplied ports; the playback adapter presents frames
    pub fn with_ports(
        config: &VideologConfig,
        playback: Arc<ClockPlaybackAdapter>,
        hid_port: Arc<dyn HidPort>,
        job_port: Arc<dyn JobPort>,
    ) -> Result<Self, DomainError> {
        config.validate()?;
        let rate = config.frame_rate()?;

        let presenter = playback.start_presenting(rate);
        let playback_port = Arc::clone(&playback) as Arc<dyn PlaybackPort>;

        let transport = Arc::new(TransportController::new(Arc::clone(&playback_port), rate));
        let display = TimecodeDisplay::new();
        let frame_sync = FrameSyncLoop::new(
            playback_port,
            *transport.codec(),
            display.clone(),
        )
        .spawn();

        let shuttle = Arc::new(ShuttleDevice::new(
            hid_port,
            Arc::clone(&transport),
            &config.shuttle,
        ));

        let submit_interactor = Arc::new(SubmitInteractor::new(job_port, rate));

        Ok(Self {
            transport,
            display,
            shuttle,
            submit_interactor,
            tasks: vec![presenter, frame_sync],
        })
    }
}

impl Drop for DefaultAppContainer {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

impl AppContainer for DefaultAppContainer {
    fn transport(&self) -> Arc<TransportController> {
        Arc::clone(&self.transport)
    }

    fn display(&self) -> TimecodeDisplay {
        self.display.clone()
    }

    fn shuttle(&self) -> Arc<ShuttleDevice> {
        Arc::clone(&self.shuttle)
    }

    fn submit_interactor(&self) -> Arc<SubmitInteractor> {
        Arc::clone(&self.submit_interactor)
    }
}
