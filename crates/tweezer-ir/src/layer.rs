//! Layers: a fixed trap geometry plus the gates executed on it.

use serde::{Deserialize, Serialize};

use crate::gate::{Gate, GateId, GateKind, operand};
use crate::qubit::{QubitId, QubitRecord};

/// A gate placed in a layer.
///
/// Raw placement-solver output only carries `id`, `q0` and `q1`; `op` and
/// `angle` are filled in by the scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateInLayer {
    /// Program id, compact two-qubit index (solver output) or synthesis tag.
    pub id: GateId,
    /// First operand.
    pub q0: QubitId,
    /// Second operand, `-1` in artifacts for single-qubit operations.
    #[serde(with = "operand")]
    pub q1: Option<QubitId>,
    /// Operation, absent in raw solver output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<GateKind>,
    /// Rotation angle as a multiple of π.
    #[serde(default)]
    pub angle: f64,
}

impl GateInLayer {
    /// Place a program gate.
    pub fn from_gate(gate: &Gate) -> Self {
        Self {
            id: GateId::Program(gate.id),
            q0: gate.q0,
            q1: gate.q1,
            op: Some(gate.kind),
            angle: if gate.kind.is_entangling() {
                0.0
            } else {
                gate.angle
            },
        }
    }

    /// A synthesized single-qubit rotation.
    pub fn synthesized_rotation(kind: GateKind, qubit: QubitId, angle: f64) -> Self {
        Self {
            id: GateId::Synthesis,
            q0: qubit,
            q1: None,
            op: Some(kind),
            angle,
        }
    }

    /// A synthesized entangling gate.
    pub fn synthesized_entangle(q0: QubitId, q1: QubitId) -> Self {
        Self {
            id: GateId::Synthesis,
            q0,
            q1: Some(q1),
            op: Some(GateKind::Cz),
            angle: 0.0,
        }
    }

    /// Whether this gate acts on two qubits.
    #[inline]
    pub fn is_two_qubit(&self) -> bool {
        self.q1.is_some()
    }

    /// Iterate over the operands.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        std::iter::once(self.q0).chain(self.q1)
    }
}

/// One time step of the layered circuit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    /// Atom positions while this layer's gates execute.
    pub qubits: Vec<QubitRecord>,
    /// Gates executed in this layer.
    #[serde(default)]
    pub gates: Vec<GateInLayer>,
}

impl Layer {
    /// Create a layer with the given geometry and no gates.
    pub fn with_qubits(qubits: Vec<QubitRecord>) -> Self {
        Self {
            qubits,
            gates: vec![],
        }
    }

    /// Find the position record of a qubit.
    pub fn record(&self, qubit: QubitId) -> Option<&QubitRecord> {
        self.qubits.iter().find(|q| q.id == qubit)
    }

    /// Number of single-qubit gates.
    pub fn num_single_qubit_gates(&self) -> usize {
        self.gates.iter().filter(|g| !g.is_two_qubit()).count()
    }

    /// Number of two-qubit gates.
    pub fn num_two_qubit_gates(&self) -> usize {
        self.gates.iter().filter(|g| g.is_two_qubit()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_solver_layer() {
        let json = r#"{
            "qubits": [
                {"id": 0, "a": 0, "x": 1, "y": 1, "c": 0, "r": 0},
                {"id": 1, "a": 1, "x": 1, "y": 1, "c": 1, "r": 0}
            ],
            "gates": [{"id": 0, "q0": 0, "q1": 1}]
        }"#;
        let layer: Layer = serde_json::from_str(json).unwrap();
        assert_eq!(layer.qubits.len(), 2);
        assert_eq!(layer.gates[0].id, GateId::Program(0));
        assert_eq!(layer.gates[0].op, None);
        assert_eq!(layer.num_two_qubit_gates(), 1);
        assert!(layer.record(QubitId(1)).is_some());
        assert!(layer.record(QubitId(2)).is_none());
    }

    #[test]
    fn test_from_gate_zeroes_entangling_angle() {
        let mut gate = Gate::entangle(3, QubitId(0), QubitId(1)).unwrap();
        gate.angle = 0.25;
        let placed = GateInLayer::from_gate(&gate);
        assert_eq!(placed.angle, 0.0);
        assert_eq!(placed.op, Some(GateKind::Cz));
    }

    #[test]
    fn test_synthesized_gate_serializes_tag() {
        let g = GateInLayer::synthesized_rotation(GateKind::Ry, QubitId(5), 0.5);
        let json = serde_json::to_value(&g).unwrap();
        assert_eq!(json["id"], "S");
        assert_eq!(json["q1"], -1);
        assert_eq!(json["op"], "ry");
    }
}
