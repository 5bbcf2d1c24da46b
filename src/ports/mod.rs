// Ports - Interface definitions (contracts)

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::errors::*;
use crate::domain::model::*;

/// One frame handed to the compositor by the playback engine
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FramePresented {
    /// Presentation timestamp of the frame, in media seconds
    pub media_time: f64,
}

/// Port for the media playback engine.
///
/// All requests are fire-and-forget: the resulting position is only observed
/// later through frame or seek events.
pub trait PlaybackPort: Send + Sync {
    /// Current media position in seconds
    fn current_time(&self) -> f64;

    /// Request a seek to `seconds`
    fn set_current_time(&self, seconds: f64) -> Result<(), DomainError>;

    fn play(&self) -> Result<(), DomainError>;

    fn pause(&self) -> Result<(), DomainError>;

    fn is_paused(&self) -> bool;

    /// Native per-frame presentation events, if the engine has them
    fn frame_events(&self) -> Option<broadcast::Receiver<FramePresented>>;

    /// Position after each completed seek
    fn seek_events(&self) -> broadcast::Receiver<f64>;
}

/// Vendor/product pair a device request is filtered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceFilter {
    pub vendor_id: u16,
    pub product_id: u16,
}

/// Port for USB HID device discovery
#[async_trait]
pub trait HidPort: Send + Sync {
    /// Devices matching the filter; an empty list means nothing was chosen
    async fn request_device(
        &self,
        filter: &DeviceFilter,
    ) -> Result<Vec<Arc<dyn HidDevice>>, DomainError>;
}

/// One HID device handle
#[async_trait]
pub trait HidDevice: Send + Sync {
    fn product_name(&self) -> String;

    async fn open(&self) -> Result<(), DomainError>;

    /// Send an output report and wait for the device to acknowledge it
    async fn send_report(&self, report_id: u8, data: &[u8]) -> Result<(), DomainError>;

    /// Next input report; `None` once the device is gone
    async fn read_report(&self) -> Result<Option<Vec<u8>>, DomainError>;

    async fn close(&self);
}

/// Port for the backend clip job API
#[async_trait]
pub trait JobPort: Send + Sync {
    async fn submit(&self, job: &ClipJob) -> Result<JobReceipt, DomainError>;
}

/// Port for configuration management
#[async_trait]
pub trait ConfigPort: Send + Sync {
    /// Snapshot of the effective configuration
    async fn current(&self) -> VideologConfig;

    /// Set a single value by key
    async fn set_config(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Load configuration from file, overriding current values
    async fn load_config(&self, file_path: &str) -> Result<(), DomainError>;

    /// Save configuration to file
    async fn save_config(&self, file_path: &str) -> Result<(), DomainError>;

    /// Validate configuration
    async fn validate_config(&self) -> Result<(), DomainError>;

    /// Path of the last loaded or saved file, or the default location
    async fn get_config_file_path(&self) -> Result<String, DomainError>;
}
