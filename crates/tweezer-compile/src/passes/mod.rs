//! Built-in compilation passes.
//!
//! Passes are organized into two categories:
//! - [`agnostic`]: Passes that only look at gate order and layer structure
//! - [`target`]: Passes that require the device description

pub mod agnostic;
pub mod target;

pub use agnostic::{
    LayerScheduler, ScheduleStats, ScheduleVerification, SchedulerConfig, SingleGateOrder,
    VerificationResult,
};
pub use target::{
    CapacityCheck, CapacityMode, CapacityReport, CollisionPolicy, ResolveDuplicates,
    ResolvedPlacement, ResolverConfig, RotationLayer, SteaneConfig, SteaneEncoding,
};
