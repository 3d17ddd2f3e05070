//! Compile command implementation.

use anyhow::{Context, Result};
use console::style;

use tweezer_compile::{
    CapacityReport, PassManagerBuilder, PlacementRequest, PlacementSolver, RecordedSolver,
    ScheduleStats,
};

use super::common::{circuit_name, default_output, load_qobj, read_input, save_circuit};
use super::encode::print_capacity;
use super::schedule::print_stats;
use crate::config::Config;

/// Execute the compile command.
pub async fn execute(
    input: &str,
    solution: &str,
    steane: bool,
    output: Option<&str>,
    config: &Config,
) -> Result<()> {
    println!(
        "{} Compiling {} with solution {}",
        style("→").cyan().bold(),
        style(input).green(),
        style(solution).yellow()
    );

    let stream = load_qobj(input)?;
    let request = PlacementRequest::from_stream(circuit_name(input), &stream);
    println!(
        "  Loaded: {} gates on {} qubits, {} two-qubit",
        stream.len(),
        request.n_q,
        request.len()
    );

    let solver = RecordedSolver::from_json(&read_input(solution)?)
        .with_context(|| format!("Invalid solver output: {solution}"))?;
    let mut circuit = solver.solve(&request.pairs, request.n_q)?;
    circuit.name = request.name;

    let mut builder = PassManagerBuilder::new()
        .with_gate_stream(stream)
        .with_device(config.device)
        .with_scheduler(config.scheduler)
        .with_resolver(config.resolver);
    if steane {
        builder = builder.with_steane(config.steane);
    }
    let (pm, mut props) = builder.build();

    println!("  Running {} passes: {}", pm.len(), pm.pass_names().join(", "));
    pm.run(&mut circuit, &mut props)?;

    println!("{} Compilation complete", style("✓").green().bold());
    if let Some(stats) = props.get::<ScheduleStats>() {
        print_stats(stats);
    }
    if steane {
        println!(
            "  Encoded: {} physical qubits, {} layers",
            circuit.n_q,
            circuit.num_layers()
        );
    }
    if let Some(report) = props.get::<CapacityReport>() {
        print_capacity(report, config.device.capacity);
    }

    let suffix = if steane { "encoded" } else { "scheduled" };
    let output_path = output.map_or_else(|| default_output(input, suffix), String::from);
    save_circuit(&circuit, &output_path)?;
    println!("  Output: {}", style(&output_path).green());

    Ok(())
}
