//! The causally ordered program gate stream.

use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind};
use crate::qubit::QubitId;

/// A program as a totally ordered list of gates.
///
/// The order encodes causality. Every gate's `id` equals its position in the
/// stream, which keeps ids stable through scheduling and encoding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Gate>", into = "Vec<Gate>")]
pub struct GateStream {
    gates: Vec<Gate>,
}

impl GateStream {
    /// Create an empty stream.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a stream from gates, checking ids and operand counts.
    pub fn from_gates(gates: Vec<Gate>) -> IrResult<Self> {
        for (position, gate) in gates.iter().enumerate() {
            if gate.id as usize != position {
                return Err(IrError::NonSequentialId {
                    position,
                    id: gate.id,
                });
            }
            gate.validate()?;
        }
        Ok(Self { gates })
    }

    #[allow(clippy::cast_possible_truncation)]
    fn next_id(&self) -> u32 {
        self.gates.len() as u32
    }

    fn push_single(&mut self, kind: GateKind, qubit: QubitId, angle: f64) -> IrResult<&mut Self> {
        let gate = Gate::single(self.next_id(), kind, qubit, angle)?;
        self.gates.push(gate);
        Ok(self)
    }

    // =========================================================================
    // Builder API
    // =========================================================================

    /// Append an X rotation by `angle`·π.
    pub fn rx(&mut self, angle: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_single(GateKind::Rx, qubit, angle)
    }

    /// Append a Y rotation by `angle`·π.
    pub fn ry(&mut self, angle: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_single(GateKind::Ry, qubit, angle)
    }

    /// Append a Z rotation by `angle`·π.
    pub fn rz(&mut self, angle: f64, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_single(GateKind::Rz, qubit, angle)
    }

    /// Append a measurement.
    pub fn measure(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.push_single(GateKind::Measure, qubit, 0.0)
    }

    /// Append an entangling gate.
    pub fn cz(&mut self, q0: QubitId, q1: QubitId) -> IrResult<&mut Self> {
        let gate = Gate::entangle(self.next_id(), q0, q1)?;
        self.gates.push(gate);
        Ok(self)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Gates in program order.
    #[inline]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Look up a gate by id.
    #[inline]
    pub fn get(&self, id: u32) -> Option<&Gate> {
        self.gates.get(id as usize)
    }

    /// Number of gates.
    #[inline]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Whether the stream has no gates.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Number of qubits touched (highest operand id + 1).
    pub fn num_qubits(&self) -> u32 {
        self.gates
            .iter()
            .flat_map(Gate::qubits)
            .map(|q| q.0 + 1)
            .max()
            .unwrap_or(0)
    }

    /// Two-qubit gates in program order.
    pub fn two_qubit_gates(&self) -> impl Iterator<Item = &Gate> + '_ {
        self.gates.iter().filter(|g| g.is_two_qubit())
    }

    /// The operand pairs of the two-qubit-only subsequence, in program order.
    ///
    /// This is what the placement solver consumes: the position of a pair in
    /// this list is the compact index the solver reports back.
    pub fn entangling_pairs(&self) -> Vec<[QubitId; 2]> {
        self.two_qubit_gates()
            .filter_map(|g| g.q1.map(|q1| [g.q0, q1]))
            .collect()
    }

    /// Like [`entangling_pairs`](Self::entangling_pairs) but keeping each
    /// pair's original stream id.
    pub fn indexed_entangling_pairs(&self) -> Vec<(u32, [QubitId; 2])> {
        self.two_qubit_gates()
            .filter_map(|g| g.q1.map(|q1| (g.id, [g.q0, q1])))
            .collect()
    }
}

impl TryFrom<Vec<Gate>> for GateStream {
    type Error = IrError;

    fn try_from(gates: Vec<Gate>) -> IrResult<Self> {
        Self::from_gates(gates)
    }
}

impl From<GateStream> for Vec<Gate> {
    fn from(stream: GateStream) -> Self {
        stream.gates
    }
}
