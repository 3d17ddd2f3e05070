//! Tweezer Circuit Intermediate Representation
//!
//! This crate provides the data model shared by every stage of the Tweezer
//! neutral-atom compilation pipeline.
//!
//! # Overview
//!
//! A program enters as a [`GateStream`]: a totally ordered list of gates whose
//! order encodes causality. An external placement solver assigns the
//! two-qubit gates to time layers and computes atom coordinates; the result,
//! and every artifact derived from it, is a [`LayeredCircuit`]: a list of
//! [`Layer`]s, each holding the atom geometry ([`QubitRecord`]) and the gates
//! ([`GateInLayer`]) executed while the atoms stand still.
//!
//! # Core Components
//!
//! - **Qubits**: [`QubitId`], with positions in [`QubitRecord`] whose row
//!   coordinates are [`Coordinate`]s (computational or readout zone)
//! - **Gates**: [`GateKind`] (`rx`, `ry`, `rz`, `cz`, measure) and program
//!   [`Gate`]s with angles stored as multiples of π
//! - **Streams**: [`GateStream`] with a builder API
//! - **Layers**: [`Layer`], [`GateInLayer`], [`GateId`]
//! - **Artifacts**: [`LayeredCircuit`] tagged with a [`CircuitStage`]
//! - **Ingestion**: [`qobj`] reads the transpiler's assembled output
//!
//! # Example: Building a Gate Stream
//!
//! ```rust
//! use tweezer_ir::{GateStream, QubitId};
//!
//! let mut stream = GateStream::new();
//! stream.ry(0.5, QubitId(0)).unwrap();
//! stream.cz(QubitId(0), QubitId(1)).unwrap();
//! stream.measure(QubitId(1)).unwrap();
//!
//! assert_eq!(stream.len(), 3);
//! assert_eq!(stream.entangling_pairs(), vec![[QubitId(0), QubitId(1)]]);
//! ```
//!
//! # Example: Loading a Solver Artifact
//!
//! ```rust
//! use tweezer_ir::{CircuitStage, LayeredCircuit};
//!
//! let json = r#"{"n_q": 2, "layers": [{
//!     "qubits": [{"id": 0, "x": 0, "y": 0, "c": 0, "r": 0},
//!                {"id": 1, "x": 0, "y": 0, "c": 1, "r": 0}],
//!     "gates": [{"id": 0, "q0": 0, "q1": 1}]
//! }]}"#;
//!
//! let solution = LayeredCircuit::from_json(json).unwrap();
//! assert_eq!(solution.stage(), CircuitStage::Placement);
//! assert_eq!(solution.num_gates(), 1);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod layer;
pub mod qobj;
pub mod qubit;
pub mod stream;

pub use circuit::{CircuitStage, LayeredCircuit};
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateId, GateKind};
pub use layer::{GateInLayer, Layer};
pub use qobj::{Qobj, parse_qobj};
pub use qubit::{Coordinate, QubitId, QubitRecord};
pub use stream::GateStream;
