//! Coordinate collision resolution for the initial placement.
//!
//! The solver may put two atoms on the same `(x, y)` site, which is fine for
//! a bare interaction but not once each logical qubit grows into a 14-atom
//! block. Resolution nudges colliding records along `x` until every site is
//! unique.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tweezer_ir::{CircuitStage, LayeredCircuit, QubitRecord};

use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};
use crate::property::PropertySet;

/// How a colliding record is moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Increment `x` only.
    #[default]
    BumpX,
    /// Increment both `x` and `y`.
    BumpXy,
}

/// Duplicate resolver settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    pub policy: CollisionPolicy,
    /// Upper bound on full scans before giving up.
    pub max_iterations: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            policy: CollisionPolicy::BumpX,
            max_iterations: 10_000,
        }
    }
}

/// Collision-free layer-0 records, stored in the `PropertySet` for the
/// encoder.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedPlacement(pub Vec<QubitRecord>);

/// Return a copy of `records` with no two records on the same `(x, y)`.
///
/// Records are scanned in ascending `c` order (stable); the first record
/// seen on a site keeps it and later ones are bumped. The scan repeats until
/// a pass moves nothing. The output keeps the input order, and `c`, `r` and
/// ids are never touched.
pub fn resolve_duplicates(
    records: &[QubitRecord],
    config: &ResolverConfig,
) -> CompileResult<Vec<QubitRecord>> {
    let mut resolved = records.to_vec();

    let mut scan_order: Vec<usize> = (0..resolved.len()).collect();
    scan_order.sort_by_key(|&i| resolved[i].c);

    let mut seen = FxHashSet::default();
    for iteration in 0..config.max_iterations {
        seen.clear();
        let mut moved = 0;

        for &i in &scan_order {
            let record = &mut resolved[i];
            if seen.insert(record.position()) {
                continue;
            }
            record.x += 1;
            if config.policy == CollisionPolicy::BumpXy {
                record.y = record.y.offset(1);
            }
            moved += 1;
        }

        if moved == 0 {
            debug!(
                "Coordinates unique after {} scan(s) over {} records",
                iteration + 1,
                resolved.len()
            );
            return Ok(resolved);
        }
    }

    Err(CompileError::UnresolvedCollision {
        iterations: config.max_iterations,
    })
}

/// Analysis pass that resolves collisions in the first layer of a scheduled
/// circuit and stores the result as [`ResolvedPlacement`].
///
/// The circuit itself is left untouched.
#[derive(Debug, Clone, Default)]
pub struct ResolveDuplicates {
    config: ResolverConfig,
}

impl ResolveDuplicates {
    /// Create a new resolver pass.
    pub fn new(config: ResolverConfig) -> Self {
        Self { config }
    }
}

impl Pass for ResolveDuplicates {
    fn name(&self) -> &'static str {
        "resolve_duplicates"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, circuit: &mut LayeredCircuit, properties: &mut PropertySet) -> CompileResult<()> {
        let first = circuit.first_layer().ok_or(CompileError::EmptyCircuit)?;
        let resolved = resolve_duplicates(&first.qubits, &self.config)?;
        properties.insert(ResolvedPlacement(resolved));
        Ok(())
    }

    fn should_run(&self, circuit: &LayeredCircuit, _properties: &PropertySet) -> bool {
        circuit.stage() == CircuitStage::Scheduled
    }
}
