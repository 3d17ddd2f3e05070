//! Boundary to the external placement solver.
//!
//! The solver receives only the two-qubit gates of a program, as operand
//! pairs in program order, and answers with a [`LayeredCircuit`] whose gates
//! carry compact indices into that list. The search itself runs outside this
//! crate; [`RecordedSolver`] replays a solution that was produced earlier.

use serde::{Deserialize, Serialize};
use tracing::debug;

use tweezer_ir::{CircuitStage, GateStream, LayeredCircuit, QubitId};

use crate::error::{CompileError, CompileResult};

/// What the placement solver is asked to lay out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementRequest {
    #[serde(default)]
    pub name: String,
    pub n_q: u32,
    /// Operand pairs, indexed by compact two-qubit index.
    pub pairs: Vec<[QubitId; 2]>,
    /// Program id of each pair, for provenance.
    #[serde(default)]
    pub gate_ids: Vec<u32>,
}

impl PlacementRequest {
    /// Build the request for a gate stream.
    pub fn from_stream(name: impl Into<String>, stream: &GateStream) -> Self {
        let (gate_ids, pairs) = stream.indexed_entangling_pairs().into_iter().unzip();
        Self {
            name: name.into(),
            n_q: stream.num_qubits(),
            pairs,
            gate_ids,
        }
    }

    /// Number of two-qubit gates to place.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there is nothing to place.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// A source of placement solutions.
pub trait PlacementSolver {
    /// Place `program` (two-qubit operand pairs in program order) on a grid
    /// holding `n_q` atoms.
    fn solve(&self, program: &[[QubitId; 2]], n_q: u32) -> CompileResult<LayeredCircuit>;
}

/// Replays a stored solver artifact.
#[derive(Debug, Clone)]
pub struct RecordedSolver {
    solution: LayeredCircuit,
}

impl RecordedSolver {
    /// Wrap an already loaded solution.
    pub fn new(solution: LayeredCircuit) -> Self {
        Self { solution }
    }

    /// Parse a solver artifact.
    pub fn from_json(json: &str) -> CompileResult<Self> {
        Ok(Self::new(LayeredCircuit::from_json(json)?))
    }
}

impl PlacementSolver for RecordedSolver {
    fn solve(&self, program: &[[QubitId; 2]], n_q: u32) -> CompileResult<LayeredCircuit> {
        let found = self.solution.num_gates();
        if found != program.len() {
            return Err(CompileError::SolutionMismatch {
                expected: program.len(),
                found,
            });
        }
        if self.solution.n_q < n_q {
            return Err(CompileError::MalformedSolution(format!(
                "solution covers {} qubits, program uses {n_q}",
                self.solution.n_q
            )));
        }

        debug!(
            "Replaying recorded solution: {} layers, {} gates",
            self.solution.num_layers(),
            found
        );
        Ok(self.solution.clone().with_stage(CircuitStage::Placement))
    }
}
