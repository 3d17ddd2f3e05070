//! Addressable-area check for padded coordinates.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use tweezer_ir::{LayeredCircuit, QubitId, QubitRecord};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{DeviceSpec, PropertySet};

/// What to do when a record exceeds the device capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapacityMode {
    /// Log a warning and keep going.
    #[default]
    Warn,
    /// Fail compilation.
    Strict,
}

/// Outcome of a capacity check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityReport {
    /// Records inspected.
    pub checked: usize,
    /// Largest coordinate sum seen.
    pub max_sum: i64,
    /// Records over the limit, with their sums.
    pub violations: Vec<(QubitId, i64)>,
}

impl CapacityReport {
    /// Whether every record was within capacity.
    pub fn within_capacity(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Check `x + y + c + r` of each record against the device capacity.
///
/// In [`CapacityMode::Warn`] each offending record is logged and collected
/// in the report; in [`CapacityMode::Strict`] the first one is an error.
pub fn check_capacity<'a>(
    records: impl IntoIterator<Item = &'a QubitRecord>,
    device: &DeviceSpec,
    mode: CapacityMode,
) -> CompileResult<CapacityReport> {
    let mut report = CapacityReport::default();

    for record in records {
        let sum = record.coordinate_sum();
        report.checked += 1;
        report.max_sum = report.max_sum.max(sum);

        if sum <= device.capacity {
            continue;
        }
        match mode {
            CapacityMode::Strict => {
                return Err(CompileError::CapacityExceeded {
                    qubit: record.id,
                    sum,
                    limit: device.capacity,
                });
            }
            CapacityMode::Warn => {
                warn!(
                    qubit = record.id.0,
                    sum,
                    limit = device.capacity,
                    "coordinates exceed the device's addressable area"
                );
                report.violations.push((record.id, sum));
            }
        }
    }

    Ok(report)
}

/// Analysis pass that checks every layer of the circuit against the device
/// capacity and stores a [`CapacityReport`].
///
/// Skipped when an earlier pass already produced a report.
#[derive(Debug, Clone, Default)]
pub struct CapacityCheck {
    mode: CapacityMode,
}

impl CapacityCheck {
    /// Create a new capacity check.
    pub fn new(mode: CapacityMode) -> Self {
        Self { mode }
    }
}

impl Pass for CapacityCheck {
    fn name(&self) -> &'static str {
        "capacity_check"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut LayeredCircuit, properties: &mut PropertySet) -> CompileResult<()> {
        let records = circuit.layers.iter().flat_map(|l| &l.qubits);
        let report = check_capacity(records, &properties.device, self.mode)?;
        debug!(
            "Capacity check: {} records, max sum {}, {} over limit",
            report.checked,
            report.max_sum,
            report.violations.len()
        );
        properties.insert(report);
        Ok(())
    }

    fn should_run(&self, _circuit: &LayeredCircuit, properties: &PropertySet) -> bool {
        !properties.contains::<CapacityReport>()
    }
}
