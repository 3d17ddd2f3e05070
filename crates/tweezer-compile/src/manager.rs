//! Pass manager for orchestrating compilation.

use tracing::{debug, info, instrument};

use tweezer_ir::{GateStream, LayeredCircuit};

use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::{
    CapacityCheck, CapacityMode, LayerScheduler, ResolveDuplicates, ResolverConfig,
    ScheduleVerification, SchedulerConfig, SingleGateOrder, SteaneConfig, SteaneEncoding,
};
use crate::property::{DeviceSpec, PropertySet};

/// Manages and executes a sequence of compilation passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Run all passes on the given circuit.
    #[instrument(skip(self, circuit, properties))]
    pub fn run(
        &self,
        circuit: &mut LayeredCircuit,
        properties: &mut PropertySet,
    ) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} layers",
            self.passes.len(),
            circuit.num_layers()
        );

        for pass in &self.passes {
            if pass.should_run(circuit, properties) {
                debug!("Running pass: {}", pass.name());
                pass.run(circuit, properties)?;
                debug!(
                    "Pass {} completed, layers: {}, gates: {}",
                    pass.name(),
                    circuit.num_layers(),
                    circuit.num_gates()
                );
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, final layers: {}, gates: {}, qubits: {}",
            circuit.num_layers(),
            circuit.num_gates(),
            circuit.n_q
        );

        Ok(())
    }

    /// Get the names of the passes, in execution order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the standard scheduling and encoding pipeline.
pub struct PassManagerBuilder {
    scheduler: SchedulerConfig,
    resolver: ResolverConfig,
    /// Encoding settings; `None` stops after scheduling.
    steane: Option<SteaneConfig>,
    verify: bool,
    properties: PropertySet,
}

impl PassManagerBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            scheduler: SchedulerConfig::default(),
            resolver: ResolverConfig::default(),
            steane: None,
            verify: true,
            properties: PropertySet::new(),
        }
    }

    /// Set the program to schedule.
    #[must_use]
    pub fn with_gate_stream(mut self, stream: GateStream) -> Self {
        self.properties.gate_stream = Some(stream);
        self
    }

    /// Set the target device.
    #[must_use]
    pub fn with_device(mut self, device: DeviceSpec) -> Self {
        self.properties.device = device;
        self
    }

    /// Set the scheduler configuration.
    #[must_use]
    pub fn with_scheduler(mut self, config: SchedulerConfig) -> Self {
        self.scheduler = config;
        self
    }

    /// Set the duplicate resolver configuration.
    #[must_use]
    pub fn with_resolver(mut self, config: ResolverConfig) -> Self {
        self.resolver = config;
        self
    }

    /// Enable Steane encoding with the given configuration.
    #[must_use]
    pub fn with_steane(mut self, config: SteaneConfig) -> Self {
        self.steane = Some(config);
        self
    }

    /// Enable or disable the schedule verification pass (on by default).
    #[must_use]
    pub fn with_verification(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Set the properties directly.
    #[must_use]
    pub fn with_properties(mut self, properties: PropertySet) -> Self {
        self.properties = properties;
        self
    }

    /// Build the pass manager and return it with the properties.
    pub fn build(self) -> (PassManager, PropertySet) {
        let mut pm = PassManager::new();

        pm.add_pass(LayerScheduler::from_config(self.scheduler));

        // Prepend reverses same-qubit singles within a layer, which the
        // verifier reports as a reordering.
        if self.verify && self.scheduler.single_gate_order == SingleGateOrder::ProgramOrder {
            pm.add_pass(ScheduleVerification);
        }

        let capacity_mode = match &self.steane {
            Some(steane) => {
                pm.add_pass(ResolveDuplicates::new(self.resolver));
                pm.add_pass(SteaneEncoding::new(*steane));
                steane.capacity_mode
            }
            None => CapacityMode::Warn,
        };

        // Final check; skipped when the encoder already reported.
        pm.add_pass(CapacityCheck::new(capacity_mode));

        (pm, self.properties)
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
