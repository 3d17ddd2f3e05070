//! Schedule command implementation.

use anyhow::{Context, Result};
use console::style;

use tweezer_compile::{
    PassManagerBuilder, PlacementRequest, PlacementSolver, RecordedSolver, ScheduleStats,
};

use super::common::{default_output, load_gate_stream, read_input, save_circuit};
use crate::config::Config;

/// Execute the schedule command.
pub async fn execute(
    gates: &str,
    solution: &str,
    output: Option<&str>,
    config: &Config,
) -> Result<()> {
    println!(
        "{} Scheduling {} onto {}",
        style("→").cyan().bold(),
        style(gates).green(),
        style(solution).yellow()
    );

    let stream = load_gate_stream(gates)?;
    let solver = RecordedSolver::from_json(&read_input(solution)?)
        .with_context(|| format!("Invalid solver output: {solution}"))?;

    let request = PlacementRequest::from_stream("", &stream);
    let mut circuit = solver.solve(&request.pairs, request.n_q)?;
    println!(
        "  Loaded: {} gates, {} solver layers",
        stream.len(),
        circuit.num_layers()
    );

    let (pm, mut props) = PassManagerBuilder::new()
        .with_gate_stream(stream)
        .with_device(config.device)
        .with_scheduler(config.scheduler)
        .with_resolver(config.resolver)
        .build();

    println!(
        "  Running {} passes ({:?})",
        pm.len(),
        config.scheduler.single_gate_order
    );
    pm.run(&mut circuit, &mut props)?;

    println!("{} Scheduling complete", style("✓").green().bold());
    if let Some(stats) = props.get::<ScheduleStats>() {
        print_stats(stats);
    }

    let output_path = output.map_or_else(|| default_output(gates, "scheduled"), String::from);
    save_circuit(&circuit, &output_path)?;
    println!("  Output: {}", style(&output_path).green());

    Ok(())
}

pub(crate) fn print_stats(stats: &ScheduleStats) {
    println!(
        "  Result: {} layers, {} single-qubit and {} two-qubit gates{}",
        stats.layers,
        stats.single_qubit_gates,
        stats.two_qubit_gates,
        if stats.overflow_layer {
            " (overflow layer appended)"
        } else {
            ""
        }
    );
}
