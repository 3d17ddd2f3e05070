//! Target-agnostic compilation passes.
//!
//! These passes operate purely on gate order and layer structure without
//! consulting the device description. They are safe to run on any
//! placement solution regardless of the grid it was computed for.

pub mod schedule;
pub mod verification;

pub use schedule::{LayerScheduler, ScheduleStats, SchedulerConfig, SingleGateOrder, schedule};
pub use verification::{ScheduleVerification, VerificationResult};
