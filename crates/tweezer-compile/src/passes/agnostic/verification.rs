//! Verification passes for ensuring compilation correctness.
//!
//! These passes validate that scheduling kept every program gate and did not
//! reorder gates that share a qubit.

use rustc_hash::FxHashMap;
use tracing::debug;

use tweezer_ir::{CircuitStage, GateId, LayeredCircuit, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Result of schedule verification.
#[derive(Debug, Clone, Default)]
pub struct VerificationResult {
    /// Whether the verification passed.
    pub passed: bool,
    /// Number of qubits verified.
    pub qubits_checked: usize,
    /// Number of program gates found in the layers.
    pub gates_checked: usize,
}

/// Analysis pass that checks a scheduled circuit against the gate stream.
///
/// Every program gate must appear exactly once. On each qubit, the gates
/// must occur in program order, comparing first by layer and then by
/// position inside the layer.
pub struct ScheduleVerification;

impl Pass for ScheduleVerification {
    fn name(&self) -> &'static str {
        "schedule_verification"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut LayeredCircuit, properties: &mut PropertySet) -> CompileResult<()> {
        let stream = properties
            .gate_stream
            .as_ref()
            .ok_or(CompileError::MissingGateStream)?;

        // Program id -> (layer, position in layer).
        let mut slots: FxHashMap<u32, (usize, usize)> = FxHashMap::default();
        for (layer_idx, layer) in circuit.layers.iter().enumerate() {
            for (pos, gate) in layer.gates.iter().enumerate() {
                let GateId::Program(id) = gate.id else {
                    return Err(CompileError::PassFailed {
                        name: self.name().into(),
                        reason: format!("synthesized gate in layer {layer_idx} before encoding"),
                    });
                };
                if slots.insert(id, (layer_idx, pos)).is_some() {
                    return Err(CompileError::ScheduleViolation {
                        gate: id,
                        detail: "scheduled more than once".into(),
                    });
                }
            }
        }

        let mut last_slot: FxHashMap<QubitId, (usize, usize)> = FxHashMap::default();
        for gate in stream.gates() {
            let slot = *slots
                .get(&gate.id)
                .ok_or_else(|| CompileError::ScheduleViolation {
                    gate: gate.id,
                    detail: "missing from the scheduled circuit".into(),
                })?;

            for qubit in gate.qubits() {
                let Some(prev) = last_slot.insert(qubit, slot) else {
                    continue;
                };
                if prev >= slot {
                    return Err(CompileError::ScheduleViolation {
                        gate: gate.id,
                        detail: format!(
                            "runs at layer {} position {} on {qubit}, not after the \
                             preceding gate at layer {} position {}",
                            slot.0, slot.1, prev.0, prev.1
                        ),
                    });
                }
            }
        }

        if slots.len() != stream.len() {
            return Err(CompileError::PassFailed {
                name: self.name().into(),
                reason: format!(
                    "{} gates scheduled, program has {}",
                    slots.len(),
                    stream.len()
                ),
            });
        }

        let result = VerificationResult {
            passed: true,
            qubits_checked: last_slot.len(),
            gates_checked: slots.len(),
        };

        debug!(
            "Schedule verification passed: {} qubits checked, {} gates found",
            result.qubits_checked, result.gates_checked
        );

        properties.insert(result);

        Ok(())
    }

    fn should_run(&self, circuit: &LayeredCircuit, _properties: &PropertySet) -> bool {
        circuit.stage() == CircuitStage::Scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::passes::agnostic::schedule::{SingleGateOrder, schedule};
    use tweezer_ir::{GateInLayer, GateStream, Layer, QubitRecord};

    fn two_qubit_solution() -> LayeredCircuit {
        let qubits = vec![
            QubitRecord::new(0, 0, 0, 0, 0),
            QubitRecord::new(1, 0, 0, 1, 0),
        ];
        let mut sol = LayeredCircuit::new("t", 2);
        sol.layers.push(Layer {
            qubits,
            gates: vec![GateInLayer {
                id: GateId::Program(0),
                q0: QubitId(0),
                q1: Some(QubitId(1)),
                op: None,
                angle: 0.0,
            }],
        });
        sol
    }

    fn run_verification(
        stream: GateStream,
        circuit: &mut LayeredCircuit,
    ) -> CompileResult<VerificationResult> {
        let mut props = PropertySet::new().with_gate_stream(stream);
        ScheduleVerification.run(circuit, &mut props)?;
        Ok(props.get::<VerificationResult>().unwrap().clone())
    }

    fn bell_stream() -> GateStream {
        let mut stream = GateStream::new();
        stream.ry(0.5, QubitId(0)).unwrap();
        stream.cz(QubitId(0), QubitId(1)).unwrap();
        stream.measure(QubitId(0)).unwrap();
        stream.measure(QubitId(1)).unwrap();
        stream
    }

    #[test]
    fn test_scheduled_circuit_passes() {
        let stream = bell_stream();
        let (mut scheduled, _) =
            schedule(&stream, &two_qubit_solution(), SingleGateOrder::default()).unwrap();

        let result = run_verification(stream, &mut scheduled).unwrap();
        assert!(result.passed);
        assert_eq!(result.qubits_checked, 2);
        assert_eq!(result.gates_checked, 4);
    }

    #[test]
    fn test_reordered_gate_fails() {
        let stream = bell_stream();
        let (mut scheduled, _) =
            schedule(&stream, &two_qubit_solution(), SingleGateOrder::default()).unwrap();

        // Move the ry behind the cz it must precede.
        scheduled.layers[0].gates.swap(0, 1);
        let err = run_verification(stream, &mut scheduled).unwrap_err();
        assert!(matches!(err, CompileError::ScheduleViolation { gate: 1, .. }));
    }

    #[test]
    fn test_dropped_gate_fails() {
        let stream = bell_stream();
        let (mut scheduled, _) =
            schedule(&stream, &two_qubit_solution(), SingleGateOrder::default()).unwrap();

        scheduled.layers[1].gates.pop();
        let err = run_verification(stream, &mut scheduled).unwrap_err();
        assert!(matches!(err, CompileError::ScheduleViolation { gate: 3, .. }));
    }

    #[test]
    fn test_empty_circuit() {
        let mut circuit = LayeredCircuit::new("empty", 0).with_stage(CircuitStage::Scheduled);
        let result = run_verification(GateStream::new(), &mut circuit).unwrap();
        assert!(result.passed);
        assert_eq!(result.gates_checked, 0);
    }
}
