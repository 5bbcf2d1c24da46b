//! USB jog/shuttle controller support
//!
//! [`protocol`] decodes the controller's input reports, [`session`] holds the
//! per-connection state, and [`device`] runs the connection lifecycle and the
//! wheel polls that turn shuttle deflection into transport steps.

pub mod device;
pub mod protocol;
pub mod session;

pub use device::{ShuttleDevice, ShuttleState};
pub use protocol::{ButtonAction, DialStep, ShuttleSample, ShuttleSpeed};
pub use session::{ShuttleSession, WheelDeflection};
