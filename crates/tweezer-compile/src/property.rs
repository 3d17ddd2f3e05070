//! `PropertySet` and related types for pass communication.
//!
//! This module provides the [`PropertySet`] type, which enables compilation passes
//! to share data with each other. It contains the standard inputs (the
//! program's gate stream and the target device) and supports arbitrary custom
//! properties.
//!
//! # Overview
//!
//! During neutral-atom compilation, multiple passes need to share information:
//! - **Scheduling** needs the original gate stream next to the solver's layers
//! - **Duplicate resolution** hands collision-free positions to the encoder
//! - **Encoding** and the capacity check read the device's grid dimensions
//!
//! The `PropertySet` acts as a shared context passed through all compilation passes.
//!
//! # Examples
//!
//! ## Basic usage with a device
//!
//! ```
//! use tweezer_compile::{DeviceSpec, PropertySet};
//!
//! let props = PropertySet::new().with_device(DeviceSpec::aquila());
//!
//! assert_eq!(props.device.capacity, 302);
//! assert!(props.gate_stream.is_none());
//! ```
//!
//! ## Custom properties for pass communication
//!
//! ```
//! use tweezer_compile::PropertySet;
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct MoveStats {
//!     moved_atoms: usize,
//! }
//!
//! let mut props = PropertySet::new();
//! props.insert(MoveStats { moved_atoms: 4 });
//!
//! let stats = props.get::<MoveStats>().unwrap();
//! assert_eq!(stats.moved_atoms, 4);
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::any::{Any, TypeId};

use tweezer_ir::GateStream;

use crate::error::{CompileError, CompileResult};
use crate::passes::target::steane::template::CELL_WIDTH;

/// Physical description of the target device grid.
///
/// Coordinates are padded as `(v + padding_offset) * padding_scale` before
/// encoding so every logical qubit owns a cell wide enough for its two
/// seven-atom blocks. After padding, `x + y + c + r` of any atom must stay
/// within `capacity`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceSpec {
    /// Upper bound on the coordinate sum of a padded record.
    pub capacity: i64,
    /// Added to each coordinate before scaling.
    pub padding_offset: i64,
    /// Cell size of one logical qubit after padding.
    pub padding_scale: i64,
}

impl DeviceSpec {
    /// QuEra Aquila grid limits.
    pub fn aquila() -> Self {
        Self {
            capacity: 302,
            padding_offset: 1,
            padding_scale: 5,
        }
    }

    /// Pad a single coordinate value.
    #[inline]
    pub fn pad(&self, value: i64) -> i64 {
        (value + self.padding_offset) * self.padding_scale
    }

    /// Reject values the encoder cannot work with.
    pub fn validate(&self) -> CompileResult<()> {
        if self.padding_scale < CELL_WIDTH {
            return Err(CompileError::InvalidConfiguration(format!(
                "padding scale must be at least {CELL_WIDTH}, got {}",
                self.padding_scale
            )));
        }
        // Template offsets reach one full cell below the padded origin.
        if self.padding_offset < 1 {
            return Err(CompileError::InvalidConfiguration(format!(
                "padding offset must be at least 1, got {}",
                self.padding_offset
            )));
        }
        if self.capacity <= 0 {
            return Err(CompileError::InvalidConfiguration(format!(
                "device capacity must be positive, got {}",
                self.capacity
            )));
        }
        Ok(())
    }
}

impl Default for DeviceSpec {
    fn default() -> Self {
        Self::aquila()
    }
}

/// Properties shared between compilation passes.
#[derive(Debug, Default)]
pub struct PropertySet {
    /// The original program, in causal order.
    ///
    /// Must be set before the scheduler runs.
    pub gate_stream: Option<GateStream>,

    /// Target device grid.
    pub device: DeviceSpec,

    /// Custom properties storage (type-erased).
    custom: FxHashMap<TypeId, Box<dyn Any + Send + Sync>>,
}

impl PropertySet {
    /// Create a new empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the program's gate stream.
    #[must_use]
    pub fn with_gate_stream(mut self, stream: GateStream) -> Self {
        self.gate_stream = Some(stream);
        self
    }

    /// Set the target device.
    #[must_use]
    pub fn with_device(mut self, device: DeviceSpec) -> Self {
        self.device = device;
        self
    }

    /// Insert a custom property.
    pub fn insert<T: Any + Send + Sync>(&mut self, value: T) {
        self.custom.insert(TypeId::of::<T>(), Box::new(value));
    }

    /// Get a custom property.
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.custom
            .get(&TypeId::of::<T>())
            .and_then(|v| v.downcast_ref())
    }

    /// Get a mutable custom property.
    pub fn get_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.custom
            .get_mut(&TypeId::of::<T>())
            .and_then(|v| v.downcast_mut())
    }

    /// Remove a custom property.
    pub fn remove<T: Any>(&mut self) -> Option<T> {
        self.custom
            .remove(&TypeId::of::<T>())
            .and_then(|v| v.downcast().ok())
            .map(|v| *v)
    }

    /// Check whether a custom property of type `T` is present.
    pub fn contains<T: Any>(&self) -> bool {
        self.custom.contains_key(&TypeId::of::<T>())
    }
}
