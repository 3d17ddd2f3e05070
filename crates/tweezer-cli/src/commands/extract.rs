//! Extract command implementation.

use anyhow::Result;
use console::style;

use tweezer_compile::PlacementRequest;

use super::common::{circuit_name, load_qobj, save_json};

/// Execute the extract command.
pub async fn execute(input: &str, gates: &str, program: &str) -> Result<()> {
    println!(
        "{} Extracting gate stream from {}",
        style("→").cyan().bold(),
        style(input).green()
    );

    let stream = load_qobj(input)?;
    let request = PlacementRequest::from_stream(circuit_name(input), &stream);

    println!(
        "  Loaded: {} gates on {} qubits, {} two-qubit",
        stream.len(),
        stream.num_qubits(),
        request.len()
    );

    save_json(&stream, gates)?;
    save_json(&request, program)?;

    println!("{} Extraction complete", style("✓").green().bold());
    println!("  Gates:   {}", style(gates).green());
    println!("  Program: {}", style(program).green());

    Ok(())
}
