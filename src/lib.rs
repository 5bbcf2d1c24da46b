//! videolog library
//!
//! Frame-accurate video logging: SMPTE-style timecode conversion, operator
//! timestamp entry, transport control over a playback engine, a USB
//! jog/shuttle controller driver and clip job submission.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod error;
pub mod ports;
pub mod shuttle;
pub mod transport;
pub mod utils;

// Re-export commonly used types
pub use domain::errors::DomainError;
pub use domain::model::{
    ClipJob, FrameRate, JobReceipt, SeekDirective, Timecode, TimecodeCodec, VideologConfig,
};
pub use error::{VideologError, VideologResult};
pub use shuttle::{ShuttleDevice, ShuttleState};
pub use transport::{TimecodeDisplay, TransportController};
pub use utils::time::TimestampParser;
