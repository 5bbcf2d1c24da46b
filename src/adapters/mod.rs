// Adapters - External system implementations

pub mod clock_playback;
pub mod hid;
pub mod http_jobs;
pub mod tracing_log;
pub mod toml_config;

// Re-export adapters
pub use clock_playback::ClockPlaybackAdapter;
pub use hid::{default_hid_port, UnavailableHidAdapter};
pub use http_jobs::HttpJobAdapter;
pub use tracing_log::TracingLogAdapter;
pub use toml_config::TomlConfigAdapter;
