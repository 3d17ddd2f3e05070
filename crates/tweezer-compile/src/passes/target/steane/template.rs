//! Fixed geometry and gate tables of the Steane encoding circuit.
//!
//! Every logical qubit becomes two blocks of seven atoms: block 0 holds the
//! encoded data, block 1 the ancilla. An atom is identified by its `block`
//! and its `role` (0..7) inside the block, and sits at a fixed offset from
//! its logical qubit's padded position in each synthesis layer.
//!
//! Atoms that share a site in a layer are the ones that interact there.
//! In layers 0 to 3 the ancilla block runs two rows below the data block;
//! in layer 4 both blocks share rows so data role `i` meets ancilla role `i`.

/// Atoms per block.
pub const BLOCK_SIZE: u32 = 7;

/// Blocks per logical qubit.
pub const BLOCKS: u32 = 2;

/// Physical qubits per logical qubit.
pub const ENCODED_WIDTH: u32 = BLOCK_SIZE * BLOCKS;

/// Layers prepended by the encoder (readout stage excluded).
pub const SYNTHESIS_LAYERS: usize = 5;

/// Layer the readout stage copies its ancilla positions from.
pub const READOUT_SOURCE_LAYER: usize = 2;

/// Readout-zone rows are mirrored around this value.
pub const READOUT_ORIGIN: i64 = 75;

/// Column shift of an ancilla moved to the readout zone.
pub const READOUT_SHIFT: i64 = -1;

/// Quarter turn, in multiples of π.
pub const QUARTER_TURN: f64 = 0.5;

/// Half turn, in multiples of π.
pub const HALF_TURN: f64 = 1.0;

/// Displacement of one atom from its logical qubit's padded position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Offset {
    pub dx: i64,
    pub dy: i64,
    pub dc: i64,
    pub dr: i64,
}

impl Offset {
    const ZERO: Offset = Offset {
        dx: 0,
        dy: 0,
        dc: 0,
        dr: 0,
    };
}

const ROLE_DX: [[i64; BLOCK_SIZE as usize]; SYNTHESIS_LAYERS] = [
    [-3, -4, -3, -4, -4, -4, -3],
    [-2, -2, -2, -3, -2, -3, -3],
    [-1, -2, -1, -4, -2, -4, -3],
    [-1, -2, -1, -4, -2, -4, -3],
    [-1, -2, -1, -4, -2, -4, -3],
];

const ROLE_DY: [[i64; BLOCK_SIZE as usize]; SYNTHESIS_LAYERS] = [
    [0, -1, -1, -1, 0, 0, 0],
    [0, -1, -1, -1, 0, 0, 0],
    [0; BLOCK_SIZE as usize],
    [0; BLOCK_SIZE as usize],
    [0; BLOCK_SIZE as usize],
];

const BLOCK_DY: [[i64; BLOCKS as usize]; SYNTHESIS_LAYERS] =
    [[0, -2], [0, -2], [0, -2], [0, -2], [-2, -2]];

/// Offsets indexed by `[layer][block][role]`.
///
/// The control grid moves with the trap, so `dc == dx` and `dr == dy`.
pub const OFFSETS: [[[Offset; BLOCK_SIZE as usize]; BLOCKS as usize]; SYNTHESIS_LAYERS] =
    build_offsets();

const fn build_offsets() -> [[[Offset; BLOCK_SIZE as usize]; BLOCKS as usize]; SYNTHESIS_LAYERS]
{
    let mut table = [[[Offset::ZERO; BLOCK_SIZE as usize]; BLOCKS as usize]; SYNTHESIS_LAYERS];
    let mut layer = 0;
    while layer < SYNTHESIS_LAYERS {
        let mut block = 0;
        while block < BLOCKS as usize {
            let mut role = 0;
            while role < BLOCK_SIZE as usize {
                let dx = ROLE_DX[layer][role];
                let dy = ROLE_DY[layer][role] + BLOCK_DY[layer][block];
                table[layer][block][role] = Offset {
                    dx,
                    dy,
                    dc: dx,
                    dr: dy,
                };
                role += 1;
            }
            block += 1;
        }
        layer += 1;
    }
    table
}

/// Sites spanned by one logical qubit along either axis, readout stage
/// included.
///
/// Cells narrower than this let atoms of neighbouring logical qubits share
/// a site, and a shared site means an interaction.
pub const CELL_WIDTH: i64 = cell_width();

const fn cell_width() -> i64 {
    let (mut min_x, mut max_x) = (i64::MAX, i64::MIN);
    let (mut min_y, mut max_y) = (i64::MAX, i64::MIN);
    let mut layer = 0;
    while layer < SYNTHESIS_LAYERS {
        let mut block = 0;
        while block < BLOCKS as usize {
            let mut role = 0;
            while role < BLOCK_SIZE as usize {
                let o = OFFSETS[layer][block][role];
                let mut low_x = o.dx;
                if layer == READOUT_SOURCE_LAYER && block == 1 {
                    low_x += READOUT_SHIFT;
                }
                if low_x < min_x {
                    min_x = low_x;
                }
                if o.dx > max_x {
                    max_x = o.dx;
                }
                if o.dy < min_y {
                    min_y = o.dy;
                }
                if o.dy > max_y {
                    max_y = o.dy;
                }
                role += 1;
            }
            block += 1;
        }
        layer += 1;
    }
    let x = max_x - min_x + 1;
    let y = max_y - min_y + 1;
    if x > y { x } else { y }
}

/// Intra-block CZ pairs `(role, role)` for layers 0, 1 and 2.
pub const BLOCK_ENTANGLERS: [[(u32, u32); 3]; 3] = [
    [(0, 6), (1, 3), (4, 5)],
    [(0, 4), (1, 2), (5, 6)],
    [(0, 2), (1, 4), (3, 5)],
];

/// Roles that receive a Hadamard after the entangling layers.
pub const HADAMARD_ROLES: [u32; 4] = [2, 3, 4, 6];

/// Offset of one atom in a synthesis layer.
#[inline]
pub fn offset(layer: usize, block: u32, role: u32) -> Offset {
    OFFSETS[layer][block as usize][role as usize]
}

/// Index of an atom inside its logical qubit's 14-wide id block.
#[inline]
pub const fn slot(block: u32, role: u32) -> u32 {
    block * BLOCK_SIZE + role
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashMap;

    fn sites(layer: usize) -> FxHashMap<(i64, i64), Vec<u32>> {
        let mut sites: FxHashMap<(i64, i64), Vec<u32>> = FxHashMap::default();
        for block in 0..BLOCKS {
            for role in 0..BLOCK_SIZE {
                let o = offset(layer, block, role);
                sites.entry((o.dx, o.dy)).or_default().push(slot(block, role));
            }
        }
        sites
    }

    #[test]
    fn test_cell_width() {
        // Columns -5..=-1 once ancillas shift to the readout column.
        assert_eq!(CELL_WIDTH, 5);
        assert!(crate::property::DeviceSpec::aquila().padding_scale >= CELL_WIDTH);
    }

    #[test]
    fn test_entangled_pairs_share_a_site() {
        for (layer, pairs) in BLOCK_ENTANGLERS.iter().enumerate() {
            for block in 0..BLOCKS {
                for &(a, b) in pairs {
                    assert_eq!(
                        offset(layer, block, a),
                        offset(layer, block, b),
                        "layer {layer} block {block} pair ({a}, {b})"
                    );
                }
            }
        }
    }

    #[test]
    fn test_no_site_holds_more_than_a_pair() {
        for layer in 0..SYNTHESIS_LAYERS {
            assert!(sites(layer).values().all(|atoms| atoms.len() <= 2));
        }
    }

    #[test]
    fn test_blocks_meet_in_final_layer() {
        for role in 0..BLOCK_SIZE {
            assert_eq!(offset(4, 0, role), offset(4, 1, role));
        }
        assert_eq!(sites(4).len(), BLOCK_SIZE as usize);
    }

    #[test]
    fn test_blocks_apart_before_final_layer() {
        for layer in 0..4 {
            let data: Vec<_> = (0..BLOCK_SIZE).map(|r| offset(layer, 0, r)).collect();
            for role in 0..BLOCK_SIZE {
                assert!(!data.contains(&offset(layer, 1, role)));
            }
        }
    }

    #[test]
    fn test_rotation_layer_keeps_positions() {
        assert_eq!(OFFSETS[2], OFFSETS[3]);
    }

    #[test]
    fn test_offsets_stay_inside_cell() {
        for layer in OFFSETS {
            for block in layer {
                for o in block {
                    assert!((-4..=-1).contains(&o.dx));
                    assert!((-3..=0).contains(&o.dy));
                    assert_eq!((o.dc, o.dr), (o.dx, o.dy));
                }
            }
        }
    }
}
