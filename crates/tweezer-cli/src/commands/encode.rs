//! Encode command implementation.

use anyhow::Result;
use console::style;

use tweezer_compile::{
    CapacityCheck, CapacityMode, CapacityReport, PassManager, PropertySet, ResolveDuplicates,
    RotationLayer, SteaneConfig, SteaneEncoding,
};
use tweezer_ir::CircuitStage;

use super::common::{default_output, describe_steane, load_circuit, save_circuit};
use crate::config::Config;

/// Command-line overrides for the encoder.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    pub strict_capacity: bool,
    pub co_schedule_rotations: bool,
    pub readout: bool,
}

impl EncodeOptions {
    /// Apply the flags on top of the configured encoder settings.
    pub fn apply(self, mut config: SteaneConfig) -> SteaneConfig {
        if self.strict_capacity {
            config.capacity_mode = CapacityMode::Strict;
        }
        if self.co_schedule_rotations {
            config.rotation_layer = RotationLayer::CoScheduled;
        }
        if self.readout {
            config.readout_stage = true;
        }
        config
    }
}

/// Execute the encode command.
pub async fn execute(
    input: &str,
    output: Option<&str>,
    options: EncodeOptions,
    config: &Config,
) -> Result<()> {
    let steane = options.apply(config.steane);

    println!(
        "{} Encoding {} ({})",
        style("→").cyan().bold(),
        style(input).green(),
        style(describe_steane(&steane)).yellow()
    );

    let mut circuit = load_circuit(input, CircuitStage::Scheduled)?;
    println!(
        "  Loaded: {} qubits, {} layers, {} gates",
        circuit.n_q,
        circuit.num_layers(),
        circuit.num_gates()
    );

    let mut pm = PassManager::new();
    pm.add_pass(ResolveDuplicates::new(config.resolver));
    pm.add_pass(SteaneEncoding::new(steane));
    pm.add_pass(CapacityCheck::new(steane.capacity_mode));

    let mut props = PropertySet::new().with_device(config.device);
    pm.run(&mut circuit, &mut props)?;

    println!("{} Encoding complete", style("✓").green().bold());
    println!(
        "  Result: {} physical qubits, {} layers, {} synthesized gates",
        circuit.n_q,
        circuit.num_layers(),
        circuit.num_synthesized_gates()
    );
    if let Some(report) = props.get::<CapacityReport>() {
        print_capacity(report, config.device.capacity);
    }

    let output_path = output.map_or_else(|| default_output(input, "encoded"), String::from);
    save_circuit(&circuit, &output_path)?;
    println!("  Output: {}", style(&output_path).green());

    Ok(())
}

pub(crate) fn print_capacity(report: &CapacityReport, limit: i64) {
    if report.within_capacity() {
        println!("  Capacity: max sum {} of {limit}", report.max_sum);
    } else {
        println!(
            "  {} {} record(s) over capacity (max sum {} of {limit})",
            style("!").yellow().bold(),
            report.violations.len(),
            report.max_sum
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_override_config() {
        let options = EncodeOptions {
            strict_capacity: true,
            co_schedule_rotations: true,
            readout: false,
        };
        let config = options.apply(SteaneConfig::default());
        assert_eq!(config.capacity_mode, CapacityMode::Strict);
        assert_eq!(config.rotation_layer, RotationLayer::CoScheduled);
        assert!(!config.readout_stage);
    }

    #[test]
    fn test_unset_flags_keep_config() {
        let base = SteaneConfig {
            readout_stage: true,
            ..SteaneConfig::default()
        };
        assert_eq!(EncodeOptions::default().apply(base), base);
    }
}
