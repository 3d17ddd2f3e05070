//! Target-specific compilation passes.
//!
//! These passes require the device description from the `PropertySet`
//! (grid padding, coordinate capacity) and produce circuits laid out for
//! a concrete neutral-atom array.

pub mod capacity;
pub mod duplicates;
pub mod steane;

pub use capacity::{CapacityCheck, CapacityMode, CapacityReport, check_capacity};
pub use duplicates::{
    CollisionPolicy, ResolveDuplicates, ResolvedPlacement, ResolverConfig, resolve_duplicates,
};
pub use steane::{RotationLayer, SteaneConfig, SteaneEncoding, encode};
