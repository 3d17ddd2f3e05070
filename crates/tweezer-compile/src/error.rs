//! Error types for the compilation crate.

use thiserror::Error;
use tweezer_ir::QubitId;

/// Errors that can occur during compilation.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] tweezer_ir::IrError),

    /// The placement solution references a two-qubit index with no gate in
    /// the program.
    #[error("Placement solution references two-qubit index {index} with no program gate")]
    MissingIdMapping { index: u32 },

    /// The placement solution placed the same two-qubit gate twice.
    #[error("Two-qubit index {index} placed more than once")]
    DuplicatePlacement { index: u32 },

    /// A two-qubit gate of the program was never placed.
    #[error("Two-qubit gate #{id} was not placed by the solver")]
    UnplacedGate { id: u32 },

    /// Solver operands disagree with the program's operands.
    #[error("Gate #{id} acts on {expected:?} in the program but on {found:?} in the solution")]
    OperandMismatch {
        id: u32,
        expected: [QubitId; 2],
        found: [QubitId; 2],
    },

    /// Structurally invalid solver output.
    #[error("Malformed placement solution: {0}")]
    MalformedSolution(String),

    /// The solution places a different number of gates than requested.
    #[error("Solver placed {found} two-qubit gates, program has {expected}")]
    SolutionMismatch { expected: usize, found: usize },

    /// A gate references a qubit with no position record in its layer.
    #[error("Qubit {qubit} has no position record in layer {layer}")]
    MissingQubitRecord { qubit: QubitId, layer: usize },

    /// Duplicate resolution did not converge.
    #[error("Coordinate collisions unresolved after {iterations} passes")]
    UnresolvedCollision { iterations: usize },

    /// Scheduled circuit breaks program order or drops gates.
    #[error("Schedule violation at gate #{gate}: {detail}")]
    ScheduleViolation { gate: u32, detail: String },

    /// Coordinates exceed the device's addressable area (strict mode only).
    #[error("Qubit {qubit} coordinate sum {sum} exceeds device capacity {limit}")]
    CapacityExceeded { qubit: QubitId, sum: i64, limit: i64 },

    /// Widening a logical id (or the qubit count) leaves the id space.
    #[error("Qubit id {id} does not fit the encoded id space")]
    IdOverflow { id: u32 },

    /// Two logical qubits map onto the same physical id block.
    #[error("Physical qubit id {id} assigned twice")]
    QubitIdCollision { id: QubitId },

    /// No gate stream available for scheduling.
    #[error("Missing gate stream for scheduling")]
    MissingGateStream,

    /// The circuit has no layer to work from.
    #[error("Circuit has no layers")]
    EmptyCircuit,

    /// The circuit is not at the stage a pass expects.
    #[error("Pass '{pass}' cannot run on a {stage} circuit")]
    WrongStage { pass: String, stage: String },

    /// Pass execution failed.
    #[error("Pass '{name}' failed: {reason}")]
    PassFailed { name: String, reason: String },

    /// Invalid pass configuration.
    #[error("Invalid pass configuration: {0}")]
    InvalidConfiguration(String),
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
