//! Pseudo-simultaneous acquisition: every camera is triggered, read,
//! presented and released in turn, once per cycle.

mod report;
mod runner;

pub use report::{AcquisitionReport, DeviceStats};
pub use runner::AcquisitionLoop;
