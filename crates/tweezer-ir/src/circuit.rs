//! The layered circuit artifact shared by every pipeline stage.

use serde::{Deserialize, Serialize};

use crate::gate::GateId;
use crate::layer::Layer;
use crate::qubit::QubitId;

/// Which pipeline stage produced a [`LayeredCircuit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CircuitStage {
    /// Raw placement-solver output: two-qubit gates only, compact ids.
    #[default]
    Placement,
    /// Every program gate placed, ids rewritten to stream ids.
    Scheduled,
    /// Steane-encoded: ids scaled by the block width, synthesis layers in
    /// front.
    Encoded,
}

/// A time-layered circuit.
///
/// Serialized as the persisted artifact
/// `{"layers": [...], "name": ..., "n_q": ..., "no_transfer": ...}`. The same
/// shape carries placement solutions, scheduled circuits and encoded
/// circuits; [`CircuitStage`] records which one this is in memory. Unknown
/// solver metadata fields are ignored on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayeredCircuit {
    /// Layers in time order.
    pub layers: Vec<Layer>,
    /// Circuit name.
    #[serde(default)]
    pub name: String,
    /// Number of qubits.
    pub n_q: u32,
    /// Whether the solver ran without atom transfers between arrays.
    #[serde(default)]
    pub no_transfer: bool,
    /// Producing stage.
    #[serde(skip)]
    stage: CircuitStage,
}

impl LayeredCircuit {
    /// Create an empty circuit.
    pub fn new(name: impl Into<String>, n_q: u32) -> Self {
        Self {
            layers: vec![],
            name: name.into(),
            n_q,
            no_transfer: false,
            stage: CircuitStage::Placement,
        }
    }

    /// Parse an artifact from JSON.
    pub fn from_json(json: &str) -> crate::IrResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to JSON.
    pub fn to_json(&self) -> crate::IrResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// The producing stage.
    #[inline]
    pub fn stage(&self) -> CircuitStage {
        self.stage
    }

    /// Record the producing stage.
    #[inline]
    pub fn set_stage(&mut self, stage: CircuitStage) {
        self.stage = stage;
    }

    /// Builder-style variant of [`set_stage`](Self::set_stage).
    #[must_use]
    pub fn with_stage(mut self, stage: CircuitStage) -> Self {
        self.stage = stage;
        self
    }

    /// Number of layers.
    #[inline]
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }

    /// Whether there are no layers.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Total number of gates over all layers.
    pub fn num_gates(&self) -> usize {
        self.layers.iter().map(|l| l.gates.len()).sum()
    }

    /// The first layer, whose geometry is the initial atom placement.
    #[inline]
    pub fn first_layer(&self) -> Option<&Layer> {
        self.layers.first()
    }

    /// Iterate over `(layer index, gate id)` for every program gate.
    pub fn program_gate_layers(&self) -> impl Iterator<Item = (usize, u32)> + '_ {
        self.layers.iter().enumerate().flat_map(|(i, layer)| {
            layer
                .gates
                .iter()
                .filter_map(move |g| g.id.program().map(|id| (i, id)))
        })
    }

    /// Number of gates not coming from the program.
    pub fn num_synthesized_gates(&self) -> usize {
        self.layers
            .iter()
            .flat_map(|l| &l.gates)
            .filter(|g| g.id == GateId::Synthesis)
            .count()
    }

    /// Distinct qubit ids recorded in the first layer.
    pub fn initial_qubits(&self) -> Vec<QubitId> {
        self.first_layer()
            .map(|l| l.qubits.iter().map(|q| q.id).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qubit::QubitRecord;

    const SOLVER_OUTPUT: &str = r#"{
        "sat": true,
        "n_t": 2,
        "n_q": 2,
        "no_transfer": false,
        "aod_r": 16,
        "layers": [
            {"qubits": [
                {"id": 0, "a": 0, "x": 1, "y": 1, "c": 0, "r": 0},
                {"id": 1, "a": 1, "x": 1, "y": 1, "c": 1, "r": 0}
            ], "gates": [{"id": 0, "q0": 0, "q1": 1}]}
        ]
    }"#;

    #[test]
    fn test_load_solver_output_ignores_metadata() {
        let circuit = LayeredCircuit::from_json(SOLVER_OUTPUT).unwrap();
        assert_eq!(circuit.n_q, 2);
        assert_eq!(circuit.num_layers(), 1);
        assert_eq!(circuit.num_gates(), 1);
        assert_eq!(circuit.stage(), CircuitStage::Placement);
        assert_eq!(circuit.name, "");
    }

    #[test]
    fn test_artifact_shape() {
        let mut circuit = LayeredCircuit::new("bell", 2);
        circuit
            .layers
            .push(Layer::with_qubits(vec![QubitRecord::new(0, 0, 0, 0, 0)]));
        let value = serde_json::to_value(&circuit).unwrap();
        assert_eq!(value["name"], "bell");
        assert_eq!(value["n_q"], 2);
        assert_eq!(value["no_transfer"], false);
        assert!(value["layers"].is_array());
        assert!(value.get("stage").is_none());
    }

    #[test]
    fn test_program_gate_layers() {
        let circuit = LayeredCircuit::from_json(SOLVER_OUTPUT).unwrap();
        let placed: Vec<_> = circuit.program_gate_layers().collect();
        assert_eq!(placed, vec![(0, 0)]);
        assert_eq!(circuit.num_synthesized_gates(), 0);
        assert_eq!(circuit.initial_qubits(), vec![QubitId(0), QubitId(1)]);
    }
}
