//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use tweezer_compile::{CapacityMode, SteaneConfig};
use tweezer_ir::{CircuitStage, GateStream, LayeredCircuit, parse_qobj};

/// Read a file, failing early with a readable message when it is missing.
pub fn read_input(path: &str) -> Result<String> {
    if !Path::new(path).exists() {
        anyhow::bail!("File not found: {path}");
    }

    fs::read_to_string(path).with_context(|| format!("Failed to read file: {path}"))
}

/// Load the transpiler's assembled qobj as a gate stream.
pub fn load_qobj(path: &str) -> Result<GateStream> {
    let source = read_input(path)?;
    parse_qobj(&source).with_context(|| format!("Failed to parse qobj: {path}"))
}

/// Load a gate stream written by `extract`.
pub fn load_gate_stream(path: &str) -> Result<GateStream> {
    let source = read_input(path)?;
    serde_json::from_str(&source).with_context(|| format!("Invalid gate stream: {path}"))
}

/// Load a layered circuit and tag it with the stage it is known to be in.
///
/// The stage is not persisted, so the caller states what the file holds.
pub fn load_circuit(path: &str, stage: CircuitStage) -> Result<LayeredCircuit> {
    let source = read_input(path)?;
    let circuit = LayeredCircuit::from_json(&source)
        .with_context(|| format!("Invalid layered circuit: {path}"))?;
    Ok(circuit.with_stage(stage))
}

/// Write a layered circuit as JSON.
pub fn save_circuit(circuit: &LayeredCircuit, path: &str) -> Result<()> {
    let json = circuit.to_json().context("Failed to serialize circuit")?;
    fs::write(path, json).with_context(|| format!("Failed to write file: {path}"))
}

/// Write any serializable value as pretty JSON.
pub fn save_json<T: serde::Serialize>(value: &T, path: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    fs::write(path, json).with_context(|| format!("Failed to write file: {path}"))
}

/// `<stem>_<suffix>.json` next to `input`.
pub fn default_output(input: &str, suffix: &str) -> String {
    let path = Path::new(input);
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let name = format!("{stem}_{suffix}.json");
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.join(name).to_string_lossy().into_owned(),
        _ => name,
    }
}

/// Circuit name taken from the input file stem.
pub fn circuit_name(input: &str) -> String {
    Path::new(input)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Describe the encoder settings for progress output.
pub fn describe_steane(config: &SteaneConfig) -> String {
    let capacity = match config.capacity_mode {
        CapacityMode::Warn => "warn",
        CapacityMode::Strict => "strict",
    };
    format!(
        "rotations {:?}, capacity {capacity}, readout {}",
        config.rotation_layer,
        if config.readout_stage { "on" } else { "off" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output() {
        assert_eq!(default_output("bell.json", "scheduled"), "bell_scheduled.json");
        assert_eq!(
            default_output("runs/bell.json", "encoded"),
            Path::new("runs")
                .join("bell_encoded.json")
                .to_string_lossy()
                .into_owned()
        );
    }

    #[test]
    fn test_circuit_name() {
        assert_eq!(circuit_name("out/ghz.qobj.json"), "ghz.qobj");
        assert_eq!(circuit_name("bell.json"), "bell");
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_input("/nonexistent/gates.json").unwrap_err();
        assert!(err.to_string().contains("File not found"));
    }

    #[test]
    fn test_circuit_round_trip_sets_stage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("c.json");
        let path = path.to_str().unwrap();

        let circuit = LayeredCircuit::new("c", 3);
        save_circuit(&circuit, path).unwrap();

        let loaded = load_circuit(path, CircuitStage::Scheduled).unwrap();
        assert_eq!(loaded.n_q, 3);
        assert_eq!(loaded.stage(), CircuitStage::Scheduled);
    }

    #[test]
    fn test_describe_steane() {
        let text = describe_steane(&SteaneConfig::default());
        assert!(text.contains("capacity warn"));
        assert!(text.contains("readout off"));
    }
}
