//! Gate kinds and program gates.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::qubit::QubitId;

/// Operations understood by the neutral-atom backend.
///
/// Rotation angles are carried separately as multiples of π.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Rotation around X.
    #[serde(rename = "rx")]
    Rx,
    /// Rotation around Y.
    #[serde(rename = "ry")]
    Ry,
    /// Rotation around Z.
    #[serde(rename = "rz")]
    Rz,
    /// Controlled-phase entangling interaction.
    #[serde(rename = "cz")]
    Cz,
    /// Measurement pseudo-op.
    #[serde(rename = "m", alias = "measure")]
    Measure,
}

impl GateKind {
    /// Get the name of this gate as it appears in artifacts.
    #[inline]
    pub fn name(self) -> &'static str {
        match self {
            GateKind::Rx => "rx",
            GateKind::Ry => "ry",
            GateKind::Rz => "rz",
            GateKind::Cz => "cz",
            GateKind::Measure => "m",
        }
    }

    /// Parse a transpiler gate name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "rx" => Some(GateKind::Rx),
            "ry" => Some(GateKind::Ry),
            "rz" => Some(GateKind::Rz),
            "cz" => Some(GateKind::Cz),
            "m" | "measure" => Some(GateKind::Measure),
            _ => None,
        }
    }

    /// Number of qubit operands.
    #[inline]
    pub fn num_qubits(self) -> u32 {
        if self.is_entangling() { 2 } else { 1 }
    }

    /// Whether this is a two-qubit entangling gate.
    #[inline]
    pub fn is_entangling(self) -> bool {
        matches!(self, GateKind::Cz)
    }

    /// Whether this is a single-qubit rotation.
    #[inline]
    pub fn is_rotation(self) -> bool {
        matches!(self, GateKind::Rx | GateKind::Ry | GateKind::Rz)
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A gate of the causally ordered program stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gate {
    /// Position of the gate in the program; stable across all stages.
    pub id: u32,
    /// First (or only) operand.
    pub q0: QubitId,
    /// Second operand; `-1` in artifacts for single-qubit operations.
    #[serde(with = "operand")]
    pub q1: Option<QubitId>,
    /// Operation kind.
    pub kind: GateKind,
    /// Rotation angle as a multiple of π (0 for non-rotations).
    #[serde(default)]
    pub angle: f64,
}

impl Gate {
    /// Create a single-qubit gate.
    pub fn single(id: u32, kind: GateKind, qubit: QubitId, angle: f64) -> IrResult<Self> {
        let gate = Self {
            id,
            q0: qubit,
            q1: None,
            kind,
            angle,
        };
        gate.validate()?;
        Ok(gate)
    }

    /// Create an entangling gate.
    pub fn entangle(id: u32, q0: QubitId, q1: QubitId) -> IrResult<Self> {
        let gate = Self {
            id,
            q0,
            q1: Some(q1),
            kind: GateKind::Cz,
            angle: 0.0,
        };
        gate.validate()?;
        Ok(gate)
    }

    /// Whether this gate acts on two qubits.
    #[inline]
    pub fn is_two_qubit(&self) -> bool {
        self.q1.is_some()
    }

    /// Iterate over the operands.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        std::iter::once(self.q0).chain(self.q1)
    }

    /// Check that the operand count matches the gate kind.
    pub fn validate(&self) -> IrResult<()> {
        let got = 1 + u32::from(self.q1.is_some());
        let expected = self.kind.num_qubits();
        if got != expected {
            return Err(IrError::QubitCountMismatch {
                gate_name: self.kind.name().to_string(),
                expected,
                got,
            });
        }
        if self.q1 == Some(self.q0) {
            return Err(IrError::DuplicateQubit {
                qubit: self.q0,
                gate_name: self.kind.name().to_string(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.q1 {
            Some(q1) => write!(f, "#{} {} {}, {}", self.id, self.kind, self.q0, q1),
            None if self.kind.is_rotation() => {
                write!(f, "#{} {}({}π) {}", self.id, self.kind, self.angle, self.q0)
            }
            None => write!(f, "#{} {} {}", self.id, self.kind, self.q0),
        }
    }
}

/// Identity of a gate placed in a layer.
///
/// Program gates keep their stream id; gates generated by the Steane
/// synthesizer have no program counterpart and serialize as `"S"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateId {
    /// Gate from the program stream (or, in raw solver output, a compact
    /// two-qubit index).
    Program(u32),
    /// Gate generated by the encoding synthesizer.
    Synthesis,
}

impl GateId {
    /// The numeric id, if this gate comes from the program.
    #[inline]
    pub fn program(self) -> Option<u32> {
        match self {
            GateId::Program(id) => Some(id),
            GateId::Synthesis => None,
        }
    }
}

impl fmt::Display for GateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GateId::Program(id) => write!(f, "#{id}"),
            GateId::Synthesis => f.write_str("S"),
        }
    }
}

const SYNTHESIS_TAG: &str = "S";

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum GateIdRepr {
    Program(u32),
    Tag(String),
}

impl Serialize for GateId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            GateId::Program(id) => GateIdRepr::Program(id),
            GateId::Synthesis => GateIdRepr::Tag(SYNTHESIS_TAG.to_string()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for GateId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match GateIdRepr::deserialize(deserializer)? {
            GateIdRepr::Program(id) => Ok(GateId::Program(id)),
            GateIdRepr::Tag(tag) if tag == SYNTHESIS_TAG => Ok(GateId::Synthesis),
            GateIdRepr::Tag(tag) => Err(serde::de::Error::custom(format!(
                "unknown gate id tag '{tag}'"
            ))),
        }
    }
}

/// Serde adapter for the optional second operand, written as `-1` when absent.
pub(crate) mod operand {
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::qubit::QubitId;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(q: &Option<QubitId>, serializer: S) -> Result<S::Ok, S::Error> {
        match q {
            Some(q) => serializer.serialize_u32(q.0),
            None => serializer.serialize_i64(-1),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<QubitId>, D::Error> {
        let raw = i64::deserialize(deserializer)?;
        match raw {
            -1 => Ok(None),
            v => u32::try_from(v)
                .map(|v| Some(QubitId(v)))
                .map_err(|_| serde::de::Error::custom(format!("invalid operand id {v}"))),
        }
    }
}
