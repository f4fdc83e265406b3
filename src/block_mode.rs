//! Decoding of the 11-bit ASTC block mode field.

use crate::quant::QuantMethod;
use crate::{BLOCK_MAX_WEIGHTS, BLOCK_MAX_WEIGHT_BITS, BLOCK_MIN_WEIGHT_BITS};

/// Weight grid parameters encoded by a block mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockModeParams {
    pub x_weights: u32,
    pub y_weights: u32,
    pub is_dual_plane: bool,
    pub quant_mode: QuantMethod,
    pub weight_bits: u32,
}

impl BlockModeParams {
    /// Number of stored weights, counting both planes.
    pub fn weight_count(&self) -> u32 {
        self.x_weights * self.y_weights * (self.is_dual_plane as u32 + 1)
    }
}

/// Decodes a 2D block mode. Returns `None` for reserved encodings and for
/// grids whose weights do not fit into a block.
///
/// Only the low 11 bits of `block_mode` are considered.
pub fn decode_block_mode_2d(block_mode: u16) -> Option<BlockModeParams> {
    let m = block_mode as u32 & 0x7FF;

    let mut base_quant_mode = (m >> 4) & 1;
    let mut h = (m >> 9) & 1;
    let mut d = (m >> 10) & 1;
    let a = (m >> 5) & 0x3;

    let (x_weights, y_weights);

    if m & 3 != 0 {
        base_quant_mode |= (m & 3) << 1;
        let b = (m >> 7) & 3;
        match (m >> 2) & 3 {
            0 => {
                x_weights = b + 4;
                y_weights = a + 2;
            }
            1 => {
                x_weights = b + 8;
                y_weights = a + 2;
            }
            2 => {
                x_weights = a + 2;
                y_weights = b + 8;
            }
            _ => {
                let b = b & 1;
                if m & 0x100 != 0 {
                    x_weights = b + 2;
                    y_weights = a + 2;
                } else {
                    x_weights = a + 2;
                    y_weights = b + 6;
                }
            }
        }
    } else {
        base_quant_mode |= ((m >> 2) & 3) << 1;
        if (m >> 2) & 3 == 0 {
            return None;
        }

        let b = (m >> 9) & 3;
        match (m >> 7) & 3 {
            0 => {
                x_weights = 12;
                y_weights = a + 2;
            }
            1 => {
                x_weights = a + 2;
                y_weights = 12;
            }
            2 => {
                x_weights = a + 6;
                y_weights = b + 6;
                d = 0;
                h = 0;
            }
            _ => match a {
                0 => {
                    x_weights = 6;
                    y_weights = 10;
                }
                1 => {
                    x_weights = 10;
                    y_weights = 6;
                }
                _ => return None,
            },
        }
    }

    let weight_count = x_weights * y_weights * (d + 1);
    let quant_mode = QuantMethod::from_index((base_quant_mode - 2) + 6 * h)?;
    let weight_bits = quant_mode.ise_bitcount(weight_count);

    let valid = weight_count <= BLOCK_MAX_WEIGHTS as u32
        && (BLOCK_MIN_WEIGHT_BITS..=BLOCK_MAX_WEIGHT_BITS).contains(&weight_bits);

    valid.then_some(BlockModeParams {
        x_weights,
        y_weights,
        is_dual_plane: d != 0,
        quant_mode,
        weight_bits,
    })
}
