// HID adapters - USB shuttle controller access

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::errors::*;
use crate::ports::*;

#[cfg(feature = "hidapi")]
mod hidapi_device;

#[cfg(feature = "hidapi")]
pub use hidapi_device::HidapiAdapter;

/// Stand-in for builds without USB HID support; every request fails
pub struct UnavailableHidAdapter;

#[async_trait]
impl HidPort for UnavailableHidAdapter {
    async fn request_device(
        &self,
        _filter: &DeviceFilter,
    ) -> Result<Vec<Arc<dyn HidDevice>>, DomainError> {
        Err(DomainError::Unsupported(
            "built without the `hidapi` feature".to_string(),
        ))
    }
}

/// HID access for this build
pub fn default_hid_port() -> Arc<dyn HidPort> {
    #[cfg(feature = "hidapi")]
    {
        Arc::new(HidapiAdapter::new())
    }
    #[cfg(not(feature = "hidapi"))]
    {
        Arc::new(UnavailableHidAdapter)
    }
}
