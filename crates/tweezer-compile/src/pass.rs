//! The unit of work run by the pass manager.

use tweezer_ir::LayeredCircuit;

use crate::error::CompileResult;
use crate::property::PropertySet;

/// Whether a pass rewrites the circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Analysis pass that reads but does not modify the circuit.
    Analysis,
    /// Transformation pass that replaces the circuit with a new artifact.
    Transformation,
}

/// One stage of the pipeline, operating on a layered circuit.
///
/// Passes that only apply at a particular [`tweezer_ir::CircuitStage`]
/// check it in [`Pass::should_run`], so a pipeline can be rerun on a
/// partially compiled artifact.
pub trait Pass: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Whether the pass rewrites the circuit or only inspects it.
    fn kind(&self) -> PassKind;

    /// Run the pass on the given circuit.
    ///
    /// For analysis passes, this should not modify the circuit but may
    /// write to the `PropertySet`.
    ///
    /// Transformation passes build the next stage's artifact and swap it in;
    /// on error the circuit is left untouched.
    fn run(&self, circuit: &mut LayeredCircuit, properties: &mut PropertySet)
    -> CompileResult<()>;

    /// Whether the pass applies to the circuit in its current state.
    fn should_run(&self, _circuit: &LayeredCircuit, _properties: &PropertySet) -> bool {
        true
    }
}
