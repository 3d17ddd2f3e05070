//! Error types for the IR crate.

use crate::qubit::QubitId;
use thiserror::Error;

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate name not understood by the gate stream model.
    #[error("Unknown gate '{name}'{}", format_index_context(.index))]
    UnknownGate {
        /// The unrecognized gate name.
        name: String,
        /// Position in the source instruction list, if known.
        index: Option<usize>,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    QubitCountMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: u32,
        /// Actual number of qubits provided.
        got: u32,
    },

    /// Duplicate qubit in a two-qubit operation.
    #[error("Duplicate qubit {qubit} in operation (gate: {gate_name})")]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Gate name for context.
        gate_name: String,
    },

    /// Rotation without an angle parameter.
    #[error("Rotation '{0}' is missing its angle parameter")]
    MissingParameter(String),

    /// Operand id that is negative but not the `-1` single-qubit sentinel.
    #[error("Invalid operand id {0}")]
    InvalidOperand(i64),

    /// Gate ids must equal their stream position.
    #[error("Gate at stream position {position} carries id {id}")]
    NonSequentialId {
        /// Position in the stream.
        position: usize,
        /// Id found at that position.
        id: u32,
    },

    /// Transpiler output had no experiment to ingest.
    #[error("Transpiler output contains no experiments")]
    NoExperiment,

    /// Malformed JSON input.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Helper function to format optional instruction position.
#[allow(clippy::ref_option)]
fn format_index_context(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at instruction {i}"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
