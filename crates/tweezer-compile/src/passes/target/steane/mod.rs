//! Steane [[7,1,3]] layout synthesis.
//!
//! Expands every logical qubit of a scheduled circuit into a data block and
//! an ancilla block of seven atoms each, and prepends the layers that
//! prepare the encoded state. The original layers follow, rescaled to the
//! padded grid and the widened id space.

pub mod template;

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use tweezer_ir::{
    CircuitStage, Coordinate, GateInLayer, GateKind, Layer, LayeredCircuit, QubitId, QubitRecord,
};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::{DeviceSpec, PropertySet};

use super::capacity::{CapacityMode, CapacityReport, check_capacity};
use super::duplicates::{ResolvedPlacement, ResolverConfig, resolve_duplicates};
use template::{
    BLOCK_ENTANGLERS, BLOCK_SIZE, BLOCKS, ENCODED_WIDTH, HADAMARD_ROLES, HALF_TURN,
    QUARTER_TURN, READOUT_ORIGIN, READOUT_SHIFT, READOUT_SOURCE_LAYER, SYNTHESIS_LAYERS, offset,
    slot,
};

/// Synthesis layer that carries the Hadamard rotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationLayer {
    /// Their own layer (layer 3), after the last intra-block CZs.
    #[default]
    Dedicated,
    /// Together with the last intra-block CZs in layer 2; layer 3 stays
    /// empty.
    CoScheduled,
}

impl RotationLayer {
    fn index(self) -> usize {
        match self {
            RotationLayer::Dedicated => 3,
            RotationLayer::CoScheduled => 2,
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SteaneConfig {
    pub rotation_layer: RotationLayer,
    pub capacity_mode: CapacityMode,
    /// Append a layer moving the ancilla blocks to the readout zone.
    pub readout_stage: bool,
}

/// Encode `circuit` with the Steane template, using `base` as the
/// collision-free position of every logical qubit.
///
/// `base` is usually the resolved first layer of `circuit`. Its coordinates
/// are padded with the device map before the template offsets are applied,
/// and the padded records are checked against the device capacity.
pub fn encode(
    circuit: &LayeredCircuit,
    base: &[QubitRecord],
    device: &DeviceSpec,
    config: &SteaneConfig,
) -> CompileResult<(LayeredCircuit, CapacityReport)> {
    if circuit.stage() == CircuitStage::Encoded {
        return Err(CompileError::WrongStage {
            pass: "steane_encoding".into(),
            stage: "encoded".into(),
        });
    }
    if base.is_empty() {
        return Err(CompileError::EmptyCircuit);
    }
    device.validate()?;

    let padded: Vec<QubitRecord> = base
        .iter()
        .map(|r| r.clone().map_coordinates(|v| device.pad(v)))
        .collect();
    let report = check_capacity(&padded, device, config.capacity_mode)?;

    let n_q = circuit
        .n_q
        .checked_mul(ENCODED_WIDTH)
        .ok_or(CompileError::IdOverflow { id: circuit.n_q })?;

    let starts = padded
        .iter()
        .map(|r| widen(r.id))
        .collect::<CompileResult<Vec<_>>>()?;
    let mut seen = FxHashSet::default();
    for &start in &starts {
        if !seen.insert(start) {
            return Err(CompileError::QubitIdCollision { id: start });
        }
    }

    let mut layers: Vec<Layer> = (0..SYNTHESIS_LAYERS)
        .map(|layer| Layer {
            qubits: padded
                .iter()
                .zip(&starts)
                .flat_map(|(r, &start)| block_records(r, start, layer))
                .collect(),
            gates: starts
                .iter()
                .flat_map(|&start| synthesis_gates(start, layer, config))
                .collect(),
        })
        .collect();

    if config.readout_stage {
        let source = &layers[READOUT_SOURCE_LAYER];
        let last = &layers[SYNTHESIS_LAYERS - 1];
        let qubits = last
            .qubits
            .iter()
            .zip(&source.qubits)
            .map(|(settled, staged)| {
                if is_ancilla(settled.id) {
                    to_readout(staged)
                } else {
                    settled.clone()
                }
            })
            .collect();
        layers.push(Layer::with_qubits(qubits));
    }

    let synthesized = layers.len();
    for layer in &circuit.layers {
        layers.push(widen_layer(layer, device)?);
    }

    let mut encoded = LayeredCircuit::new(circuit.name.clone(), n_q);
    encoded.no_transfer = circuit.no_transfer;
    encoded.layers = layers;
    encoded.set_stage(CircuitStage::Encoded);

    info!(
        "Steane encoding: {} logical qubits, {} synthesis layers, {} layers total",
        padded.len(),
        synthesized,
        encoded.num_layers()
    );

    Ok((encoded, report))
}

/// The 14 records of one logical qubit in a synthesis layer.
fn block_records(
    logical: &QubitRecord,
    start: QubitId,
    layer: usize,
) -> impl Iterator<Item = QubitRecord> + '_ {
    let start = start.0;
    (0..BLOCKS).flat_map(move |block| {
        (0..BLOCK_SIZE).map(move |role| {
            let o = offset(layer, block, role);
            QubitRecord {
                id: QubitId(start + slot(block, role)),
                x: logical.x + o.dx,
                y: logical.y.offset(o.dy),
                c: logical.c + o.dc,
                r: logical.r.offset(o.dr),
                a: logical.a,
            }
        })
    })
}

fn synthesis_gates(start: QubitId, layer: usize, config: &SteaneConfig) -> Vec<GateInLayer> {
    let q = |block: u32, role: u32| QubitId(start.0 + slot(block, role));
    let mut gates = vec![];

    if layer == 0 {
        for block in 0..BLOCKS {
            for role in 0..BLOCK_SIZE {
                gates.push(GateInLayer::synthesized_rotation(
                    GateKind::Ry,
                    q(block, role),
                    QUARTER_TURN,
                ));
            }
        }
    }

    if let Some(pairs) = BLOCK_ENTANGLERS.get(layer) {
        for block in 0..BLOCKS {
            for &(a, b) in pairs {
                gates.push(GateInLayer::synthesized_entangle(q(block, a), q(block, b)));
            }
        }
    }

    if layer == config.rotation_layer.index() {
        for block in 0..BLOCKS {
            for &role in &HADAMARD_ROLES {
                gates.push(GateInLayer::synthesized_rotation(
                    GateKind::Ry,
                    q(block, role),
                    QUARTER_TURN,
                ));
                gates.push(GateInLayer::synthesized_rotation(
                    GateKind::Rx,
                    q(block, role),
                    HALF_TURN,
                ));
            }
        }
    }

    if layer == SYNTHESIS_LAYERS - 1 {
        for role in 0..BLOCK_SIZE {
            gates.push(GateInLayer::synthesized_entangle(q(0, role), q(1, role)));
        }
    }

    gates
}

fn is_ancilla(id: QubitId) -> bool {
    id.0 % ENCODED_WIDTH >= BLOCK_SIZE
}

fn to_readout(record: &QubitRecord) -> QubitRecord {
    QubitRecord {
        id: record.id,
        x: record.x + READOUT_SHIFT,
        y: Coordinate::Readout(READOUT_ORIGIN - record.y.value()),
        c: record.c + READOUT_SHIFT,
        r: Coordinate::Readout(READOUT_ORIGIN - record.r.value()),
        a: record.a,
    }
}

/// First physical id of a logical qubit's 14-wide block.
fn widen(q: QubitId) -> CompileResult<QubitId> {
    q.block_start(ENCODED_WIDTH)
        .ok_or(CompileError::IdOverflow { id: q.0 })
}

/// Pad coordinates and widen ids of one original layer.
fn widen_layer(layer: &Layer, device: &DeviceSpec) -> CompileResult<Layer> {
    let qubits = layer
        .qubits
        .iter()
        .map(|r| {
            Ok(QubitRecord {
                id: widen(r.id)?,
                ..r.clone().map_coordinates(|v| device.pad(v))
            })
        })
        .collect::<CompileResult<_>>()?;
    let gates = layer
        .gates
        .iter()
        .map(|g| {
            Ok(GateInLayer {
                q0: widen(g.q0)?,
                q1: g.q1.map(widen).transpose()?,
                ..g.clone()
            })
        })
        .collect::<CompileResult<_>>()?;
    Ok(Layer { qubits, gates })
}

/// Transformation pass that applies the Steane encoding.
///
/// Uses the [`ResolvedPlacement`] left by the duplicate resolver when one is
/// present and otherwise resolves the first layer with default settings.
/// Stores the [`CapacityReport`] of the padded base.
#[derive(Debug, Clone, Default)]
pub struct SteaneEncoding {
    config: SteaneConfig,
}

impl SteaneEncoding {
    /// Create a new encoding pass.
    pub fn new(config: SteaneConfig) -> Self {
        Self { config }
    }
}

impl Pass for SteaneEncoding {
    fn name(&self) -> &'static str {
        "steane_encoding"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut LayeredCircuit, properties: &mut PropertySet) -> CompileResult<()> {
        let base = match properties.remove::<ResolvedPlacement>() {
            Some(ResolvedPlacement(records)) => records,
            None => {
                let first = circuit.first_layer().ok_or(CompileError::EmptyCircuit)?;
                resolve_duplicates(&first.qubits, &ResolverConfig::default())?
            }
        };

        let (encoded, report) = encode(circuit, &base, &properties.device, &self.config)?;
        debug!(
            "Encoded {} layers into {} ({} synthesized gates)",
            circuit.num_layers(),
            encoded.num_layers(),
            encoded.num_synthesized_gates()
        );

        *circuit = encoded;
        properties.insert(report);
        Ok(())
    }

    fn should_run(&self, circuit: &LayeredCircuit, _properties: &PropertySet) -> bool {
        circuit.stage() != CircuitStage::Encoded
    }
}
