//! Tweezer Compilation Framework
//!
//! This crate turns a placement solution for a neutral-atom array into an
//! executable, optionally fault-tolerant, layered circuit. It keeps a
//! pass-based architecture: each stage is a [`Pass`] run by a
//! [`PassManager`] and sharing data through a [`PropertySet`].
//!
//! # Overview
//!
//! The compilation process takes the solver's layers through:
//! 1. **Scheduling**: Map compact solver indices back to program gates and
//!    place each single-qubit gate in the earliest layer allowed
//! 2. **Verification**: Check that every gate survived in program order
//! 3. **Duplicate resolution**: Give every logical qubit a unique site
//! 4. **Steane encoding**: Prepend the layers preparing 14-atom logical
//!    qubits and widen the program layers to the encoded grid
//! 5. **Capacity check**: Compare coordinates against the device's
//!    addressable area
//!
//! # Architecture
//!
//! ```text
//! Placement solution (compact two-qubit indices)
//!       │
//!       ▼
//! ┌─────────────┐
//! │ PassManager │ ◄── PropertySet (gate stream, device, stats)
//! └─────────────┘
//!       │
//!       ├── LayerScheduler
//!       ├── ScheduleVerification
//!       ├── ResolveDuplicates
//!       ├── SteaneEncoding
//!       └── CapacityCheck
//!       │
//!       ▼
//! Scheduled or encoded circuit
//! ```
//!
//! # Example: Scheduling a Solver Artifact
//!
//! ```rust
//! use tweezer_compile::{PassManagerBuilder, SteaneConfig};
//! use tweezer_ir::{CircuitStage, GateStream, LayeredCircuit, QubitId};
//!
//! let mut stream = GateStream::new();
//! stream.ry(0.5, QubitId(0)).unwrap();
//! stream.cz(QubitId(0), QubitId(1)).unwrap();
//!
//! let mut circuit = LayeredCircuit::from_json(r#"{"n_q": 2, "layers": [{
//!     "qubits": [{"id": 0, "x": 0, "y": 0, "c": 0, "r": 0},
//!                {"id": 1, "x": 0, "y": 0, "c": 1, "r": 0}],
//!     "gates": [{"id": 0, "q0": 0, "q1": 1}]
//! }]}"#).unwrap();
//!
//! let (pm, mut props) = PassManagerBuilder::new()
//!     .with_gate_stream(stream)
//!     .with_steane(SteaneConfig::default())
//!     .build();
//! pm.run(&mut circuit, &mut props).unwrap();
//!
//! assert_eq!(circuit.stage(), CircuitStage::Encoded);
//! assert_eq!(circuit.n_q, 28);
//! ```
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to create custom compilation passes:
//!
//! ```rust
//! use tweezer_compile::{Pass, PassKind, CompileResult, PropertySet};
//! use tweezer_ir::LayeredCircuit;
//!
//! struct CountLayers;
//!
//! impl Pass for CountLayers {
//!     fn name(&self) -> &str { "count_layers" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, circuit: &mut LayeredCircuit, props: &mut PropertySet) -> CompileResult<()> {
//!         props.insert(circuit.num_layers());
//!         Ok(())
//!     }
//! }
//! ```

pub mod error;
pub mod manager;
pub mod pass;
pub mod placement;
pub mod property;

// Built-in passes
pub mod passes;

pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use pass::{Pass, PassKind};
pub use passes::{
    CapacityCheck, CapacityMode, CapacityReport, CollisionPolicy, LayerScheduler,
    ResolveDuplicates, ResolvedPlacement, ResolverConfig, RotationLayer, ScheduleStats,
    ScheduleVerification, SchedulerConfig, SingleGateOrder, SteaneConfig, SteaneEncoding,
    VerificationResult,
};
pub use placement::{PlacementRequest, PlacementSolver, RecordedSolver};
pub use property::{DeviceSpec, PropertySet};
