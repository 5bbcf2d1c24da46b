use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;

use videolog::adapters::ClockPlaybackAdapter;
use videolog::domain::model::ShuttleSettings;
use videolog::ports::*;
use videolog::*;

/// Scripted controller: input reports are fed through a channel
struct MockDevice {
    reports: tokio::sync::Mutex<mpsc::UnboundedReceiver<Vec<u8>>>,
    sent: Mutex<Vec<(u8, Vec<u8>)>>,
    opened: Mutex<bool>,
    closed: Mutex<bool>,
    reject_reports: bool,
}

#[async_trait]
impl HidDevice for MockDevice {
    fn product_name(&self) -> String {
        "ShuttleXpress".to_string()
    }

    async fn open(&self) -> Result<(), DomainError> {
        *self.opened.lock() = true;
        Ok(())
    }

    async fn send_report(&self, report_id: u8, data: &[u8]) -> Result<(), DomainError> {
        if self.reject_reports {
            return Err(DomainError::DeviceFailed("stalled".to_string()));
        }
        self.sent.lock().push((report_id, data.to_vec()));
        Ok(())
    }

    async fn read_report(&self) -> Result<Option<Vec<u8>>, DomainError> {
        Ok(self.reports.lock().await.recv().await)
    }

    async fn close(&self) {
        *self.closed.lock() = true;
    }
}

struct MockHid {
    devices: Vec<Arc<MockDevice>>,
    requests: Mutex<Vec<DeviceFilter>>,
}

#[async_trait]
impl HidPort for MockHid {
    async fn request_device(
        &self,
        filter: &DeviceFilter,
    ) -> Result<Vec<Arc<dyn HidDevice>>, DomainError> {
        self.requests.lock().push(*filter);
        Ok(self
            .devices
            .iter()
            .map(|d| Arc::clone(d) as Arc<dyn HidDevice>)
            .collect())
    }
}

struct Rig {
    engine: Arc<ClockPlaybackAdapter>,
    transport: Arc<TransportController>,
    shuttle: ShuttleDevice,
    device: Arc<MockDevice>,
    hid: Arc<MockHid>,
    reports: mpsc::UnboundedSender<Vec<u8>>,
}

fn rig_with(reject_reports: bool, with_device: bool) -> Rig {
    let (reports, rx) = mpsc::unbounded_channel();
    let device = Arc::new(MockDevice {
        reports: tokio::sync::Mutex::new(rx),
        sent: Mutex::new(Vec::new()),
        opened: Mutex::new(false),
        closed: Mutex::new(false),
        reject_reports,
    });
    let hid = Arc::new(MockHid {
        devices: if with_device {
            vec![Arc::clone(&device)]
        } else {
            Vec::new()
        },
        requests: Mutex::new(Vec::new()),
    });

    let engine = Arc::new(ClockPlaybackAdapter::new(None));
    let transport = Arc::new(TransportController::new(
        Arc::clone(&engine) as Arc<dyn PlaybackPort>,
        FrameRate::new(50).unwrap(),
    ));
    let shuttle = ShuttleDevice::new(
        Arc::clone(&hid) as Arc<dyn HidPort>,
        Arc::clone(&transport),
        &ShuttleSettings::default(),
    );

    Rig {
        engine,
        transport,
        shuttle,
        device,
        hid,
        reports,
    }
}

fn rig() -> Rig {
    rig_with(false, true)
}

/// Let the reader task pick up queued reports
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

fn close_to(actual: f64, expected: f64) -> bool {
    (actual - expected).abs() < 1e-9
}

#[tokio::test(start_paused = true)]
async fn connect_opens_and_activates_the_controller() {
    let rig = rig();
    assert_eq!(rig.shuttle.state(), ShuttleState::Disconnected);

    let state = rig.shuttle.connect().await.unwrap();
    assert_eq!(state, ShuttleState::Connected);
    assert!(*rig.device.opened.lock());
    assert_eq!(*rig.device.sent.lock(), vec![(0x01, vec![42])]);
    assert_eq!(
        rig.hid.requests.lock()[0],
        DeviceFilter {
            vendor_id: 0x0b33,
            product_id: 0x0030
        }
    );

    // a second connect while connected is a no-op
    assert_eq!(rig.shuttle.connect().await.unwrap(), ShuttleState::Connected);
    assert_eq!(rig.hid.requests.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn no_device_chosen_stays_disconnected() {
    let rig = rig_with(false, false);
    assert_eq!(
        rig.shuttle.connect().await.unwrap(),
        ShuttleState::Disconnected
    );
    assert!(!*rig.device.opened.lock());
}

#[tokio::test(start_paused = true)]
async fn failed_activation_tears_down() {
    let rig = rig_with(true, true);
    assert!(rig.shuttle.connect().await.is_err());
    assert_eq!(rig.shuttle.state(), ShuttleState::Disconnected);
    assert!(*rig.device.closed.lock());
}

#[tokio::test(start_paused = true)]
async fn mark_buttons_capture_exact_engine_time() {
    let rig = rig();
    rig.shuttle.connect().await.unwrap();
    rig.engine.set_current_time(2.0).unwrap();

    // byte3 is ignored for the mark group
    rig.reports.send(vec![0, 0, 0, 0xff, 32]).unwrap();
    settle().await;
    assert_eq!(rig.transport.marks().in_point, "00:00:02:00");

    rig.engine.set_current_time(4.5).unwrap();
    rig.reports.send(vec![0, 0, 0, 0, 64]).unwrap();
    settle().await;
    assert_eq!(rig.transport.marks().out_point, "00:00:04:25");

    // go to in
    rig.reports.send(vec![0, 0, 0, 16, 0]).unwrap();
    settle().await;
    assert!(close_to(rig.engine.current_time(), 2.0));
}

#[tokio::test(start_paused = true)]
async fn play_and_pause_buttons() {
    let rig = rig();
    rig.shuttle.connect().await.unwrap();

    rig.reports.send(vec![0, 0, 0, 128, 0]).unwrap();
    settle().await;
    assert!(!rig.engine.is_paused());

    rig.reports.send(vec![0, 0, 0, 64, 0]).unwrap();
    settle().await;
    assert!(rig.engine.is_paused());
}

#[tokio::test(start_paused = true)]
async fn dial_steps_one_frame_per_change() {
    let rig = rig();
    rig.shuttle.connect().await.unwrap();
    rig.engine.set_current_time(10.0).unwrap();

    // first report only records the dial position
    rig.reports.send(vec![0, 5, 0, 0, 0]).unwrap();
    settle().await;
    assert!(close_to(rig.engine.current_time(), 10.0));

    rig.reports.send(vec![0, 6, 0, 0, 0]).unwrap();
    settle().await;
    assert!(close_to(rig.engine.current_time(), 10.02));

    rig.reports.send(vec![0, 4, 0, 0, 0]).unwrap();
    settle().await;
    assert!(close_to(rig.engine.current_time(), 10.0));
}

#[tokio::test(start_paused = true)]
async fn shuttle_wheel_drives_the_polls() {
    let rig = rig();
    rig.shuttle.connect().await.unwrap();
    rig.engine.set_current_time(100.0).unwrap();

    // 200 is reverse at 280 frames (5.6 s at 50 fps) per tick
    rig.reports.send(vec![200, 0, 0, 0, 0]).unwrap();
    settle().await;
    assert_eq!(rig.shuttle.wheel().get(), 200);

    tokio::time::sleep(Duration::from_millis(50)).await;
    let moved = rig.engine.current_time();
    assert!(moved < 100.0);
    let steps = (100.0 - moved) / 5.6;
    assert!(close_to(steps, steps.round()));

    // back to rest: no more motion
    rig.reports.send(vec![0, 0, 0, 0, 0]).unwrap();
    settle().await;
    let rested = rig.engine.current_time();
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert!(close_to(rig.engine.current_time(), rested));
}

#[tokio::test(start_paused = true)]
async fn short_reports_are_ignored() {
    let rig = rig();
    rig.shuttle.connect().await.unwrap();

    rig.reports.send(vec![0, 0, 0, 0]).unwrap();
    rig.reports.send(vec![0, 0, 0, 0, 32]).unwrap();
    settle().await;
    assert_eq!(rig.shuttle.state(), ShuttleState::Connected);
    assert_eq!(rig.transport.marks().in_point, "00:00:00:00");
}

#[tokio::test(start_paused = true)]
async fn disconnect_resets_everything() {
    let rig = rig();
    rig.shuttle.connect().await.unwrap();
    rig.reports.send(vec![60, 0, 0, 0, 0]).unwrap();
    settle().await;
    assert_eq!(rig.shuttle.wheel().get(), 60);

    rig.shuttle.disconnect().await;
    assert_eq!(rig.shuttle.state(), ShuttleState::Disconnected);
    assert_eq!(rig.shuttle.wheel().get(), 0);
    assert!(*rig.device.closed.lock());

    let position = rig.engine.current_time();
    tokio::time::sleep(Duration::from_secs(1)).await;
    assert!(close_to(rig.engine.current_time(), position));
}

#[tokio::test(start_paused = true)]
async fn unplugged_device_ends_the_session() {
    let rig = rig();
    rig.shuttle.connect().await.unwrap();

    drop(rig.reports);
    settle().await;
    assert_eq!(rig.shuttle.state(), ShuttleState::Disconnected);
    assert!(*rig.device.closed.lock());
}
