// hidapi backed device access

use std::ffi::CString;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use hidapi::HidApi;
use tracing::debug;

use crate::domain::errors::*;
use crate::ports::*;

const READ_BUFFER_LEN: usize = 64;
const READ_TIMEOUT_MS: i32 = 100;

fn device_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::DeviceFailed(e.to_string())
}

/// Enumerates USB HID devices through hidapi
#[derive(Default)]
pub struct HidapiAdapter;

impl HidapiAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl HidPort for HidapiAdapter {
    async fn request_device(
        &self,
        filter: &DeviceFilter,
    ) -> Result<Vec<Arc<dyn HidDevice>>, DomainError> {
        let filter = *filter;
        let found = tokio::task::spawn_blocking(move || {
            let api = HidApi::new().map_err(device_error)?;
            let devices = api
                .device_list()
                .filter(|info| {
                    info.vendor_id() == filter.vendor_id && info.product_id() == filter.product_id
                })
                .map(|info| HidapiDevice {
                    path: info.path().to_owned(),
                    name: info.product_string().unwrap_or("HID device").to_string(),
                    handle: Arc::new(Mutex::new(None)),
                })
                .collect::<Vec<_>>();
            Ok::<_, DomainError>(devices)
        })
        .await
        .map_err(device_error)??;

        debug!("{} matching HID device(s)", found.len());
        Ok(found
            .into_iter()
            .map(|device| Arc::new(device) as Arc<dyn HidDevice>)
            .collect())
    }
}

/// One enumerated device; the handle exists between `open` and `close`
pub struct HidapiDevice {
    path: CString,
    name: String,
    handle: Arc<Mutex<Option<hidapi::HidDevice>>>,
}

impl HidapiDevice {
    async fn with_handle<T, F>(&self, op: F) -> Result<T, DomainError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Option<hidapi::HidDevice>) -> Result<T, DomainError> + Send + 'static,
    {
        let handle = Arc::clone(&self.handle);
        tokio::task::spawn_blocking(move || {
            let mut guard = handle.lock().map_err(device_error)?;
            op(&mut *guard)
        })
        .await
        .map_err(device_error)?
    }
}

#[async_trait]
impl HidDevice for HidapiDevice {
    fn product_name(&self) -> String {
        self.name.clone()
    }

    async fn open(&self) -> Result<(), DomainError> {
        let path = self.path.clone();
        self.with_handle(move |slot| {
            if slot.is_none() {
                let api = HidApi::new().map_err(device_error)?;
                *slot = Some(api.open_path(&path).map_err(device_error)?);
            }
            Ok(())
        })
        .await
    }

    async fn send_report(&self, report_id: u8, data: &[u8]) -> Result<(), DomainError> {
        let mut report = Vec::with_capacity(data.len() + 1);
        report.push(report_id);
        report.extend_from_slice(data);

        self.with_handle(move |slot| {
            let device = slot
                .as_ref()
                .ok_or_else(|| DomainError::DeviceFailed("device is not open".to_string()))?;
            device.write(&report).map_err(device_error)?;
            Ok(())
        })
        .await
    }

    async fn read_report(&self) -> Result<Option<Vec<u8>>, DomainError> {
        loop {
            let read = self
                .with_handle(|slot| {
                    let Some(device) = slot.as_ref() else {
                        return Ok(None);
                    };
                    let mut buffer = [0u8; READ_BUFFER_LEN];
                    let len = device
                        .read_timeout(&mut buffer, READ_TIMEOUT_MS)
                        .map_err(device_error)?;
                    Ok(Some(buffer[..len].to_vec()))
                })
                .await?;

            match read {
                // timed out without a report; give close() a chance at the lock
                Some(report) if report.is_empty() => tokio::task::yield_now().await,
                other => return Ok(other),
            }
        }
    }

    async fn close(&self) {
        let closed = self
            .with_handle(|slot| {
                slot.take();
                Ok(())
            })
            .await;
        if let Err(e) = closed {
            debug!("Closing {} failed: {}", self.name, e);
        }
    }
}
