//! Layer scheduling: interleave single-qubit gates into the solver's layers.
//!
//! The placement solver only sees two-qubit gates, numbered compactly in the
//! order they appear in the program. Scheduling maps those compact indices
//! back to program ids and then drops every single-qubit gate into the
//! earliest layer that follows the last layer touching its qubit. Gates that
//! fall past the last solver layer share one extra layer that keeps the final
//! geometry.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tweezer_ir::{CircuitStage, Gate, GateInLayer, GateStream, Layer, LayeredCircuit, QubitId};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// Where single-qubit gates go inside the layer they are assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingleGateOrder {
    /// Ahead of the layer's two-qubit gates, in program order.
    #[default]
    ProgramOrder,
    /// Each gate inserted at the front, so later gates come first.
    Prepend,
}

impl std::str::FromStr for SingleGateOrder {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "program" | "program_order" => Ok(Self::ProgramOrder),
            "prepend" => Ok(Self::Prepend),
            other => Err(CompileError::InvalidConfiguration(format!(
                "unknown single-gate order '{other}'"
            ))),
        }
    }
}

/// Scheduler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Intra-layer placement of single-qubit gates.
    pub single_gate_order: SingleGateOrder,
}

/// Summary of a scheduling run, stored in the `PropertySet`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ScheduleStats {
    /// Layers in the scheduled circuit, overflow included.
    pub layers: usize,
    /// Single-qubit gates placed.
    pub single_qubit_gates: usize,
    /// Two-qubit gates placed by the solver.
    pub two_qubit_gates: usize,
    /// Whether an overflow layer was appended.
    pub overflow_layer: bool,
}

/// Merge the program's single-qubit gates into a placement solution.
///
/// The returned circuit carries every gate of `stream` exactly once, with
/// program ids, and is tagged [`CircuitStage::Scheduled`].
pub fn schedule(
    stream: &GateStream,
    solution: &LayeredCircuit,
    order: SingleGateOrder,
) -> CompileResult<(LayeredCircuit, ScheduleStats)> {
    let mut scheduled = LayeredCircuit::new(solution.name.clone(), solution.n_q);
    scheduled.no_transfer = solution.no_transfer;
    scheduled.set_stage(CircuitStage::Scheduled);

    if stream.is_empty() {
        return Ok((scheduled, ScheduleStats::default()));
    }

    // Compact solver index -> program id.
    let id_mapping: Vec<&Gate> = stream.two_qubit_gates().collect();

    let mut layers = solution.layers.clone();
    let mut double_layers: FxHashMap<u32, usize> = FxHashMap::default();

    for (layer_idx, layer) in layers.iter_mut().enumerate() {
        for placed in &mut layer.gates {
            let index = placed.id.program().ok_or_else(|| {
                CompileError::MalformedSolution(format!(
                    "layer {layer_idx} holds a gate without a two-qubit index"
                ))
            })?;
            let gate = id_mapping
                .get(index as usize)
                .copied()
                .ok_or(CompileError::MissingIdMapping { index })?;

            check_operands(gate, placed)?;

            if double_layers.insert(gate.id, layer_idx).is_some() {
                return Err(CompileError::DuplicatePlacement { index });
            }

            *placed = GateInLayer {
                q0: placed.q0,
                q1: placed.q1,
                ..GateInLayer::from_gate(gate)
            };
        }
    }

    if let Some(gate) = id_mapping
        .iter()
        .find(|g| !double_layers.contains_key(&g.id))
    {
        return Err(CompileError::UnplacedGate { id: gate.id });
    }

    let num_layers = layers.len();
    let mut last_seen: FxHashMap<QubitId, usize> = FxHashMap::default();
    let mut singles_in_layer = vec![0_usize; num_layers];
    let mut overflow: Vec<GateInLayer> = vec![];
    let mut single_qubit_gates = 0;

    for gate in stream.gates() {
        if let Some(q1) = gate.q1 {
            let layer = double_layers[&gate.id];
            for q in [gate.q0, q1] {
                let seen = last_seen.entry(q).or_insert(layer);
                *seen = (*seen).max(layer);
            }
            continue;
        }

        single_qubit_gates += 1;
        let target = last_seen.get(&gate.q0).map_or(0, |l| l + 1);
        let placed = GateInLayer::from_gate(gate);

        if target < num_layers {
            let layer = &mut layers[target];
            if layer.record(gate.q0).is_none() {
                return Err(CompileError::MissingQubitRecord {
                    qubit: gate.q0,
                    layer: target,
                });
            }
            match order {
                SingleGateOrder::ProgramOrder => {
                    layer.gates.insert(singles_in_layer[target], placed);
                    singles_in_layer[target] += 1;
                }
                SingleGateOrder::Prepend => layer.gates.insert(0, placed),
            }
        } else {
            overflow.push(placed);
        }
    }

    let overflow_layer = !overflow.is_empty();
    if overflow_layer {
        let geometry = layers.last().ok_or(CompileError::EmptyCircuit)?;
        if let Some(gate) = overflow.iter().find(|g| geometry.record(g.q0).is_none()) {
            return Err(CompileError::MissingQubitRecord {
                qubit: gate.q0,
                layer: num_layers,
            });
        }
        debug!(
            "Appending overflow layer with {} single-qubit gates",
            overflow.len()
        );
        layers.push(Layer {
            qubits: geometry.qubits.clone(),
            gates: overflow,
        });
    }

    scheduled.n_q = scheduled.n_q.max(stream.num_qubits());
    scheduled.layers = layers;

    let stats = ScheduleStats {
        layers: scheduled.num_layers(),
        single_qubit_gates,
        two_qubit_gates: id_mapping.len(),
        overflow_layer,
    };

    Ok((scheduled, stats))
}

/// The solver may list the pair in either order.
fn check_operands(gate: &Gate, placed: &GateInLayer) -> CompileResult<()> {
    let expected = [gate.q0, gate.q1.unwrap_or(gate.q0)];
    let found = [placed.q0, placed.q1.unwrap_or(placed.q0)];
    let same = expected == found || expected == [found[1], found[0]];
    if same && placed.q1.is_some() {
        Ok(())
    } else {
        Err(CompileError::OperandMismatch {
            id: gate.id,
            expected,
            found,
        })
    }
}

/// Transformation pass that turns a placement solution into a scheduled
/// circuit.
///
/// Reads the gate stream from the `PropertySet` and stores a
/// [`ScheduleStats`] summary there.
#[derive(Debug, Clone, Default)]
pub struct LayerScheduler {
    order: SingleGateOrder,
}

impl LayerScheduler {
    /// Create a scheduler with the given intra-layer order.
    pub fn new(order: SingleGateOrder) -> Self {
        Self { order }
    }

    /// Create a scheduler from its configuration section.
    pub fn from_config(config: SchedulerConfig) -> Self {
        Self::new(config.single_gate_order)
    }

    /// The configured intra-layer order.
    pub fn order(&self) -> SingleGateOrder {
        self.order
    }
}

impl Pass for LayerScheduler {
    fn name(&self) -> &'static str {
        "layer_scheduler"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, circuit: &mut LayeredCircuit, properties: &mut PropertySet) -> CompileResult<()> {
        let stream = properties
            .gate_stream
            .as_ref()
            .ok_or(CompileError::MissingGateStream)?;

        let (scheduled, stats) = schedule(stream, circuit, self.order)?;
        debug!(
            "Scheduled {} single-qubit and {} two-qubit gates into {} layers",
            stats.single_qubit_gates, stats.two_qubit_gates, stats.layers
        );

        *circuit = scheduled;
        properties.insert(stats);
        Ok(())
    }

    fn should_run(&self, circuit: &LayeredCircuit, _properties: &PropertySet) -> bool {
        circuit.stage() == CircuitStage::Placement
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tweezer_ir::{GateId, GateKind, QubitRecord};

    fn records(n: u32) -> Vec<QubitRecord> {
        (0..n)
            .map(|i| QubitRecord::new(i, i64::from(i), 0, 0, 0))
            .collect()
    }

    fn solver_layer(n: u32, pairs: &[(u32, u32, u32)]) -> Layer {
        Layer {
            qubits: records(n),
            gates: pairs
                .iter()
                .map(|&(idx, a, b)| GateInLayer {
                    id: GateId::Program(idx),
                    q0: QubitId(a),
                    q1: Some(QubitId(b)),
                    op: None,
                    angle: 0.0,
                })
                .collect(),
        }
    }

    fn solution(layers: Vec<Layer>, n_q: u32) -> LayeredCircuit {
        let mut c = LayeredCircuit::new("t", n_q);
        c.layers = layers;
        c
    }

    #[test]
    fn test_single_before_cz_lands_in_layer_zero() {
        let mut stream = GateStream::new();
        stream.rx(0.5, QubitId(0)).unwrap();
        stream.cz(QubitId(0), QubitId(1)).unwrap();

        let sol = solution(vec![solver_layer(2, &[(0, 0, 1)])], 2);
        let (out, stats) = schedule(&stream, &sol, SingleGateOrder::ProgramOrder).unwrap();

        assert_eq!(out.num_layers(), 1);
        let gates = &out.layers[0].gates;
        assert_eq!(gates[0].id, GateId::Program(0));
        assert_eq!(gates[0].op, Some(GateKind::Rx));
        assert_eq!(gates[0].angle, 0.5);
        assert_eq!(gates[1].id, GateId::Program(1));
        assert_eq!(gates[1].op, Some(GateKind::Cz));
        assert!(!stats.overflow_layer);
        assert_eq!(out.stage(), CircuitStage::Scheduled);
    }

    #[test]
    fn test_single_after_last_layer_overflows() {
        let mut stream = GateStream::new();
        stream.cz(QubitId(0), QubitId(1)).unwrap();
        stream.rx(0.5, QubitId(0)).unwrap();

        let sol = solution(vec![solver_layer(2, &[(0, 0, 1)])], 2);
        let (out, stats) = schedule(&stream, &sol, SingleGateOrder::ProgramOrder).unwrap();

        assert_eq!(out.num_layers(), 2);
        assert!(stats.overflow_layer);
        assert_eq!(out.layers[1].qubits, out.layers[0].qubits);
        assert_eq!(out.layers[1].gates.len(), 1);
        assert_eq!(out.layers[1].gates[0].id, GateId::Program(1));
    }

    #[test]
    fn test_consecutive_singles_share_a_layer() {
        let mut stream = GateStream::new();
        stream.cz(QubitId(0), QubitId(1)).unwrap();
        stream.rx(0.5, QubitId(0)).unwrap();
        stream.ry(0.5, QubitId(0)).unwrap();
        stream.cz(QubitId(0), QubitId(1)).unwrap();

        let sol = solution(
            vec![solver_layer(2, &[(0, 0, 1)]), solver_layer(2, &[(1, 0, 1)])],
            2,
        );
        let (out, stats) = schedule(&stream, &sol, SingleGateOrder::ProgramOrder).unwrap();

        assert!(!stats.overflow_layer);
        let ids: Vec<_> = out.layers[1].gates.iter().map(|g| g.id).collect();
        assert_eq!(
            ids,
            vec![GateId::Program(1), GateId::Program(2), GateId::Program(3)]
        );
    }

    #[test]
    fn test_compact_ids_are_remapped() {
        let mut stream = GateStream::new();
        stream.cz(QubitId(0), QubitId(1)).unwrap();
        stream.ry(1.0, QubitId(2)).unwrap();
        stream.cz(QubitId(1), QubitId(2)).unwrap();

        let sol = solution(
            vec![solver_layer(3, &[(0, 0, 1)]), solver_layer(3, &[(1, 1, 2)])],
            3,
        );
        let (out, _) = schedule(&stream, &sol, SingleGateOrder::ProgramOrder).unwrap();

        let placed: Vec<_> = out.program_gate_layers().collect();
        assert!(placed.contains(&(0, 0)));
        assert!(placed.contains(&(1, 2)));
        // q2 untouched before gate #1, so it goes to layer 0.
        assert!(placed.contains(&(0, 1)));
    }

    #[test]
    fn test_prepend_reverses_singles() {
        let mut stream = GateStream::new();
        stream.rx(0.1, QubitId(0)).unwrap();
        stream.rx(0.2, QubitId(1)).unwrap();
        stream.cz(QubitId(0), QubitId(1)).unwrap();

        let sol = solution(vec![solver_layer(2, &[(0, 0, 1)])], 2);

        let (ordered, _) = schedule(&stream, &sol, SingleGateOrder::ProgramOrder).unwrap();
        let ids: Vec<_> = ordered.layers[0].gates.iter().map(|g| g.id).collect();
        assert_eq!(
            ids,
            vec![GateId::Program(0), GateId::Program(1), GateId::Program(2)]
        );

        let (prepended, _) = schedule(&stream, &sol, SingleGateOrder::Prepend).unwrap();
        let ids: Vec<_> = prepended.layers[0].gates.iter().map(|g| g.id).collect();
        assert_eq!(
            ids,
            vec![GateId::Program(1), GateId::Program(0), GateId::Program(2)]
        );
    }

    #[test]
    fn test_empty_stream_gives_empty_circuit() {
        let sol = solution(vec![solver_layer(2, &[])], 2);
        let (out, stats) = schedule(&GateStream::new(), &sol, SingleGateOrder::default()).unwrap();
        assert!(out.is_empty());
        assert_eq!(stats, ScheduleStats::default());
    }

    #[test]
    fn test_unknown_compact_index() {
        let mut stream = GateStream::new();
        stream.cz(QubitId(0), QubitId(1)).unwrap();
        let sol = solution(vec![solver_layer(2, &[(5, 0, 1)])], 2);
        let err = schedule(&stream, &sol, SingleGateOrder::default()).unwrap_err();
        assert!(matches!(err, CompileError::MissingIdMapping { index: 5 }));
    }

    #[test]
    fn test_duplicate_and_missing_placement() {
        let mut stream = GateStream::new();
        stream.cz(QubitId(0), QubitId(1)).unwrap();
        stream.cz(QubitId(0), QubitId(1)).unwrap();

        let twice = solution(
            vec![solver_layer(2, &[(0, 0, 1)]), solver_layer(2, &[(0, 0, 1)])],
            2,
        );
        assert!(matches!(
            schedule(&stream, &twice, SingleGateOrder::default()),
            Err(CompileError::DuplicatePlacement { index: 0 })
        ));

        let short = solution(vec![solver_layer(2, &[(0, 1, 0)])], 2);
        assert!(matches!(
            schedule(&stream, &short, SingleGateOrder::default()),
            Err(CompileError::UnplacedGate { id: 1 })
        ));
    }

    #[test]
    fn test_operand_mismatch() {
        let mut stream = GateStream::new();
        stream.cz(QubitId(0), QubitId(1)).unwrap();
        let sol = solution(vec![solver_layer(3, &[(0, 0, 2)])], 3);
        assert!(matches!(
            schedule(&stream, &sol, SingleGateOrder::default()),
            Err(CompileError::OperandMismatch { id: 0, .. })
        ));
    }

    #[test]
    fn test_single_without_record() {
        let mut stream = GateStream::new();
        stream.cz(QubitId(0), QubitId(1)).unwrap();
        stream.rx(0.5, QubitId(4)).unwrap();
        let sol = solution(vec![solver_layer(2, &[(0, 0, 1)])], 2);
        assert!(matches!(
            schedule(&stream, &sol, SingleGateOrder::default()),
            Err(CompileError::MissingQubitRecord { layer: 0, .. })
        ));
    }

    #[test]
    fn test_scheduler_pass() {
        let mut stream = GateStream::new();
        stream.cz(QubitId(0), QubitId(1)).unwrap();
        stream.measure(QubitId(0)).unwrap();

        let mut props = PropertySet::new().with_gate_stream(stream);
        let mut circuit = solution(vec![solver_layer(2, &[(0, 0, 1)])], 2);

        let pass = LayerScheduler::default();
        assert!(pass.should_run(&circuit, &props));
        pass.run(&mut circuit, &mut props).unwrap();

        assert!(!pass.should_run(&circuit, &props));
        assert_eq!(props.get::<ScheduleStats>().map(|s| s.layers), Some(2));
    }

    #[test]
    fn test_scheduler_pass_requires_stream() {
        let mut props = PropertySet::new();
        let mut circuit = solution(vec![solver_layer(2, &[])], 2);
        assert!(matches!(
            LayerScheduler::default().run(&mut circuit, &mut props),
            Err(CompileError::MissingGateStream)
        ));
    }

    #[test]
    fn test_order_from_str() {
        assert_eq!(
            "prepend".parse::<SingleGateOrder>().unwrap(),
            SingleGateOrder::Prepend
        );
        assert_eq!(
            "program".parse::<SingleGateOrder>().unwrap(),
            SingleGateOrder::ProgramOrder
        );
        assert!("random".parse::<SingleGateOrder>().is_err());
    }
}
