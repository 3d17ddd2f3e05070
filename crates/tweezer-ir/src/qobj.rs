//! Ingestion of the transpiler's assembled-qobj output.
//!
//! The external transpiler decomposes the user circuit into the `rx`, `ry`,
//! `rz`, `cz` basis and emits an assembled qobj. Only the first experiment's
//! instruction list matters here:
//!
//! ```json
//! {"experiments": [{"instructions": [
//!     {"name": "ry", "qubits": [0], "params": [1.5707963267948966]},
//!     {"name": "cz", "qubits": [0, 1]},
//!     {"name": "measure", "qubits": [0], "memory": [0]}
//! ]}]}
//! ```

use serde::Deserialize;
use std::f64::consts::PI;

use crate::error::{IrError, IrResult};
use crate::gate::GateKind;
use crate::qubit::QubitId;
use crate::stream::GateStream;

/// Decimal places kept when converting radians to multiples of π.
const ANGLE_DECIMALS: i32 = 5;

/// Assembled transpiler output.
#[derive(Debug, Clone, Deserialize)]
pub struct Qobj {
    /// Experiments; only the first one is ingested.
    pub experiments: Vec<Experiment>,
}

/// One experiment of a qobj.
#[derive(Debug, Clone, Deserialize)]
pub struct Experiment {
    /// Instructions in program order.
    pub instructions: Vec<QobjInstruction>,
}

/// One qobj instruction.
#[derive(Debug, Clone, Deserialize)]
pub struct QobjInstruction {
    /// Gate name.
    pub name: String,
    /// Operand qubits.
    pub qubits: Vec<u32>,
    /// Gate parameters in radians.
    #[serde(default)]
    pub params: Vec<f64>,
}

/// Convert radians to a multiple of π rounded for stable artifacts.
pub fn angle_in_pi(radians: f64) -> f64 {
    let scale = 10f64.powi(ANGLE_DECIMALS);
    (radians / PI * scale).round() / scale
}

impl Qobj {
    /// Parse qobj JSON.
    pub fn from_json(json: &str) -> IrResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Convert the first experiment into a gate stream.
    ///
    /// Barriers are dropped without consuming a gate id.
    pub fn to_gate_stream(&self) -> IrResult<GateStream> {
        let experiment = self.experiments.first().ok_or(IrError::NoExperiment)?;
        let mut stream = GateStream::new();

        for (index, inst) in experiment.instructions.iter().enumerate() {
            if inst.name == "barrier" {
                continue;
            }
            let kind = GateKind::from_name(&inst.name).ok_or_else(|| IrError::UnknownGate {
                name: inst.name.clone(),
                index: Some(index),
            })?;

            #[allow(clippy::cast_possible_truncation)]
            let got = inst.qubits.len() as u32;
            if got != kind.num_qubits() {
                return Err(IrError::QubitCountMismatch {
                    gate_name: inst.name.clone(),
                    expected: kind.num_qubits(),
                    got,
                });
            }
            let q0 = QubitId(inst.qubits[0]);

            match kind {
                GateKind::Cz => {
                    stream.cz(q0, QubitId(inst.qubits[1]))?;
                }
                GateKind::Measure => {
                    stream.measure(q0)?;
                }
                GateKind::Rx | GateKind::Ry | GateKind::Rz => {
                    let radians = *inst
                        .params
                        .first()
                        .ok_or_else(|| IrError::MissingParameter(inst.name.clone()))?;
                    let angle = angle_in_pi(radians);
                    match kind {
                        GateKind::Rx => stream.rx(angle, q0)?,
                        GateKind::Ry => stream.ry(angle, q0)?,
                        _ => stream.rz(angle, q0)?,
                    };
                }
            }
        }

        Ok(stream)
    }
}

/// Parse qobj JSON straight into a gate stream.
pub fn parse_qobj(json: &str) -> IrResult<GateStream> {
    Qobj::from_json(json)?.to_gate_stream()
}
