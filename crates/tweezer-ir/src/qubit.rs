//! Qubit identifiers and trap position records.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Unique identifier for a qubit (logical before encoding, physical after).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QubitId(pub u32);

impl QubitId {
    /// The first id of the contiguous block reserved for this qubit when every
    /// logical qubit is widened to `block` physical qubits.
    ///
    /// Returns `None` when the block does not fit in the id space.
    #[inline]
    pub fn block_start(self, block: u32) -> Option<QubitId> {
        let start = self.0.checked_mul(block)?;
        start.checked_add(block.saturating_sub(1))?;
        Some(QubitId(start))
    }
}

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

/// A coordinate that is either inside the computational trap array or in the
/// readout zone.
///
/// Serialized as a bare integer for [`Coordinate::Physical`] and as
/// `{"R": n}` for [`Coordinate::Readout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Coordinate {
    /// Position in the computational zone.
    Physical(i64),
    /// Position in the readout zone.
    Readout(i64),
}

impl Coordinate {
    /// The raw numeric value, regardless of zone.
    #[inline]
    pub fn value(self) -> i64 {
        match self {
            Coordinate::Physical(v) | Coordinate::Readout(v) => v,
        }
    }

    /// Whether this coordinate lies in the readout zone.
    #[inline]
    pub fn is_readout(self) -> bool {
        matches!(self, Coordinate::Readout(_))
    }

    /// Apply `f` to the value, keeping the zone.
    #[must_use]
    pub fn map(self, f: impl FnOnce(i64) -> i64) -> Self {
        match self {
            Coordinate::Physical(v) => Coordinate::Physical(f(v)),
            Coordinate::Readout(v) => Coordinate::Readout(f(v)),
        }
    }

    /// Shift the value by `delta`, keeping the zone.
    #[must_use]
    pub fn offset(self, delta: i64) -> Self {
        self.map(|v| v + delta)
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Coordinate::Physical(0)
    }
}

impl From<i64> for Coordinate {
    fn from(v: i64) -> Self {
        Coordinate::Physical(v)
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coordinate::Physical(v) => write!(f, "{v}"),
            Coordinate::Readout(v) => write!(f, "R{v}"),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CoordinateRepr {
    Physical(i64),
    Readout {
        #[serde(rename = "R")]
        r: i64,
    },
}

impl Serialize for Coordinate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Coordinate::Physical(v) => CoordinateRepr::Physical(v),
            Coordinate::Readout(r) => CoordinateRepr::Readout { r },
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Coordinate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match CoordinateRepr::deserialize(deserializer)? {
            CoordinateRepr::Physical(v) => Coordinate::Physical(v),
            CoordinateRepr::Readout { r } => Coordinate::Readout(r),
        })
    }
}

/// Where one atom sits during one layer.
///
/// `(x, y)` is the trap coordinate, `(c, r)` the column/row of the steerable
/// control grid holding the atom.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QubitRecord {
    /// Qubit this record describes.
    pub id: QubitId,
    /// Trap column coordinate.
    pub x: i64,
    /// Trap row coordinate.
    pub y: Coordinate,
    /// Control-grid column index.
    pub c: i64,
    /// Control-grid row index.
    pub r: Coordinate,
    /// Array flag reported by the placement solver (1 = steerable array).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub a: Option<u8>,
}

impl QubitRecord {
    /// Create a record in the computational zone.
    pub fn new(id: impl Into<QubitId>, x: i64, y: i64, c: i64, r: i64) -> Self {
        Self {
            id: id.into(),
            x,
            y: Coordinate::Physical(y),
            c,
            r: Coordinate::Physical(r),
            a: None,
        }
    }

    /// Trap position used for collision detection.
    #[inline]
    pub fn position(&self) -> (i64, Coordinate) {
        (self.x, self.y)
    }

    /// Sum of all four coordinate fields, checked against the device's
    /// addressable-area budget.
    #[inline]
    pub fn coordinate_sum(&self) -> i64 {
        self.x + self.y.value() + self.c + self.r.value()
    }

    /// Apply `f` to every coordinate field.
    #[must_use]
    pub fn map_coordinates(mut self, f: impl Fn(i64) -> i64) -> Self {
        self.x = f(self.x);
        self.y = self.y.map(&f);
        self.c = f(self.c);
        self.r = self.r.map(&f);
        self
    }
}

impl fmt::Display for QubitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ ({}, {}) grid ({}, {})",
            self.id, self.x, self.y, self.c, self.r
        )
    }
}
