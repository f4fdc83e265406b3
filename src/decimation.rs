//! Weight grid decimation: which weights contribute to each texel, and how much.
//!
//! Weights of a grid smaller than the block are bilinearly interpolated to
//! the texels in 1/16 steps. For every weight grid in use the tables are
//! stored twice, texel-major and weight-major, in two packed arrays shared by
//! all grids of a block size.

use crate::quant::QuantMethod;
use crate::{BLOCK_MAX_WEIGHTS, BLOCK_MAX_WEIGHT_BITS, BLOCK_MIN_WEIGHT_BITS, WEIGHTS_TEXEL_SUM};

/// Weight quantization levels usable for weights, QUANT_2 to QUANT_32.
const WEIGHT_PRECISIONS: usize = QuantMethod::Quant32 as usize + 1;

/// Angular search steps for each weight quantization level.
pub const STEPS_FOR_QUANT_LEVEL: [u32; WEIGHT_PRECISIONS] =
    [2, 3, 4, 5, 6, 8, 10, 12, 16, 20, 24, 32];

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TexelToWeight {
    pub weight_index: u32,
    pub contribution: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeightToTexel {
    pub texel_index: u32,
    pub contribution: f32,
}

/// Interpolation entries of all decimation modes of one block size.
#[derive(Clone, Debug, Default)]
pub struct PackedDecimationData {
    pub texel_to_weight: Vec<TexelToWeight>,
    pub weight_to_texel: Vec<WeightToTexel>,
}

/// Per weight grid layout and offsets into [`PackedDecimationData`].
#[derive(Clone, Debug, PartialEq)]
pub struct DecimationInfo {
    pub texel_count: u32,
    pub weight_count: u32,
    pub weight_x: u32,
    pub weight_y: u32,

    pub max_quant_level: u32,
    pub max_angular_steps: u32,
    pub max_quant_steps: u32,

    pub texel_weight_count: Vec<u32>,
    pub texel_weights_offset: Vec<u32>,
    pub weight_texel_count: Vec<u32>,
    pub weight_texels_offset: Vec<u32>,
}

impl DecimationInfo {
    /// Weights interpolated into `texel`.
    pub fn texel_weights<'a>(&self, packed: &'a PackedDecimationData, texel: usize) -> &'a [TexelToWeight] {
        let start = self.texel_weights_offset[texel] as usize;
        let count = self.texel_weight_count[texel] as usize;
        &packed.texel_to_weight[start..start + count]
    }

    /// Texels `weight` contributes to.
    pub fn weight_texels<'a>(&self, packed: &'a PackedDecimationData, weight: usize) -> &'a [WeightToTexel] {
        let start = self.weight_texels_offset[weight] as usize;
        let count = self.weight_texel_count[weight] as usize;
        &packed.weight_to_texel[start..start + count]
    }

    /// Sizes the angular search from the highest usable precision, limited by
    /// `angular_limit` and `weight_limit` (itself never above QUANT_32).
    pub(crate) fn set_angular_limits(
        &mut self,
        maxprec: QuantMethod,
        angular_limit: QuantMethod,
        weight_limit: QuantMethod,
    ) {
        let precision = maxprec.min(angular_limit).min(weight_limit.min(QuantMethod::Quant32));
        let steps = STEPS_FOR_QUANT_LEVEL[precision.index()];
        self.max_quant_level = precision as u32;
        self.max_angular_steps = steps;
        self.max_quant_steps = steps;
    }
}

/// Weight precision limits and usage of one weight grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecimationMode {
    /// Highest single plane precision that fits, if any.
    pub maxprec_1plane: Option<QuantMethod>,
    /// Highest dual plane precision that fits, if any.
    pub maxprec_2planes: Option<QuantMethod>,
    /// Bit `q` is set when an active single plane block mode uses quantization `q`.
    pub refprec_1plane: u32,
    /// Bit `q` is set when an active dual plane block mode uses quantization `q`.
    pub refprec_2planes: u32,
}

impl DecimationMode {
    pub(crate) fn new(weight_count: u32) -> Self {
        let (maxprec_1plane, maxprec_2planes) = max_weight_precision(weight_count);
        DecimationMode {
            maxprec_1plane,
            maxprec_2planes,
            refprec_1plane: 0,
            refprec_2planes: 0,
        }
    }

    pub(crate) fn add_reference(&mut self, quant: QuantMethod, is_dual_plane: bool) {
        if is_dual_plane {
            self.refprec_2planes |= 1 << quant as u32;
        } else {
            self.refprec_1plane |= 1 << quant as u32;
        }
    }
}

/// Highest weight quantization whose encoded size fits the weight bit budget,
/// for a single plane and for two planes.
pub fn max_weight_precision(weight_count: u32) -> (Option<QuantMethod>, Option<QuantMethod>) {
    let try_2planes = 2 * weight_count <= BLOCK_MAX_WEIGHTS as u32;
    let fits = |bits| (BLOCK_MIN_WEIGHT_BITS..=BLOCK_MAX_WEIGHT_BITS).contains(&bits);

    let mut maxprec_1plane = None;
    let mut maxprec_2planes = None;
    for quant in &QuantMethod::ALL[..WEIGHT_PRECISIONS] {
        if fits(quant.ise_bitcount(weight_count)) {
            maxprec_1plane = Some(*quant);
        }
        if try_2planes && fits(quant.ise_bitcount(2 * weight_count)) {
            maxprec_2planes = Some(*quant);
        }
    }
    (maxprec_1plane, maxprec_2planes)
}

/// Computes the interpolation of a `x_weights` by `y_weights` grid onto a
/// `x_texels` by `y_texels` block and appends it to `packed`.
///
/// Both texel dimensions must be at least 2.
pub fn init_decimation_info(
    x_texels: u32,
    y_texels: u32,
    x_weights: u32,
    y_weights: u32,
    packed: &mut PackedDecimationData,
) -> DecimationInfo {
    let texels_per_block = (x_texels * y_texels) as usize;
    let weights_per_block = (x_weights * y_weights) as usize;

    // Pass 1: per texel and per weight entry lists
    let mut weights_of_texel: Vec<Vec<(u32, u32)>> = vec![Vec::with_capacity(4); texels_per_block];
    let mut texels_of_weight: Vec<Vec<(u32, u32)>> = vec![Vec::new(); weights_per_block];

    let x_scale = (1024 + x_texels / 2) / (x_texels - 1);
    let y_scale = (1024 + y_texels / 2) / (y_texels - 1);

    for y in 0..y_texels {
        for x in 0..x_texels {
            let texel = y * x_texels + x;

            let x_weight = (x_scale * x * (x_weights - 1) + 32) >> 6;
            let y_weight = (y_scale * y * (y_weights - 1) + 32) >> 6;
            let x_weight_frac = x_weight & 0xF;
            let y_weight_frac = y_weight & 0xF;
            let x_weight_int = x_weight >> 4;
            let y_weight_int = y_weight >> 4;

            let q0 = x_weight_int + y_weight_int * x_weights;
            let qweight = [q0, q0 + 1, q0 + x_weights, q0 + x_weights + 1];

            let prod = x_weight_frac * y_weight_frac;
            let w3 = (prod + 8) >> 4;
            let weight = [
                16 + w3 - x_weight_frac - y_weight_frac,
                x_weight_frac - w3,
                y_weight_frac - w3,
                w3,
            ];

            for (&q, &w) in qweight.iter().zip(weight.iter()).filter(|(_, w)| **w != 0) {
                weights_of_texel[texel as usize].push((q, w));
                texels_of_weight[q as usize].push((texel, w));
            }
        }
    }

    // Pass 2: pack both views
    let mut texel_weight_count = Vec::with_capacity(texels_per_block);
    let mut texel_weights_offset = Vec::with_capacity(texels_per_block);
    for entries in &weights_of_texel {
        texel_weights_offset.push(packed.texel_to_weight.len() as u32);
        texel_weight_count.push(entries.len() as u32);
        packed
            .texel_to_weight
            .extend(entries.iter().map(|&(weight_index, w)| TexelToWeight {
                weight_index,
                contribution: w as f32 / WEIGHTS_TEXEL_SUM,
            }));
    }

    let mut weight_texel_count = Vec::with_capacity(weights_per_block);
    let mut weight_texels_offset = Vec::with_capacity(weights_per_block);
    for entries in &texels_of_weight {
        weight_texels_offset.push(packed.weight_to_texel.len() as u32);
        weight_texel_count.push(entries.len() as u32);
        packed
            .weight_to_texel
            .extend(entries.iter().map(|&(texel_index, w)| WeightToTexel {
                texel_index,
                contribution: w as f32 / WEIGHTS_TEXEL_SUM,
            }));
    }

    DecimationInfo {
        texel_count: texels_per_block as u32,
        weight_count: weights_per_block as u32,
        weight_x: x_weights,
        weight_y: y_weights,
        max_quant_level: 0,
        max_angular_steps: 0,
        max_quant_steps: 0,
        texel_weight_count,
        texel_weights_offset,
        weight_texel_count,
        weight_texels_offset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_resolution_grid_is_identity() {
        let mut packed = PackedDecimationData::default();
        let info = init_decimation_info(4, 4, 4, 4, &mut packed);
        for texel in 0..16 {
            let weights = info.texel_weights(&packed, texel);
            assert_eq!(weights, [TexelToWeight { weight_index: texel as u32, contribution: 1.0 }]);
        }
        assert_eq!(packed.texel_to_weight.len(), 16);
        assert_eq!(packed.weight_to_texel.len(), 16);
    }

    #[test]
    fn test_contributions_sum_to_one() {
        let mut packed = PackedDecimationData::default();
        let grids = [(2, 2), (3, 5), (5, 4), (8, 8), (6, 10), (12, 5)];
        let infos: Vec<_> = grids
            .iter()
            .map(|&(x, y)| init_decimation_info(12, 10, x.min(12), y.min(10), &mut packed))
            .collect();

        for info in &infos {
            for texel in 0..info.texel_count as usize {
                let entries = info.texel_weights(&packed, texel);
                assert!(!entries.is_empty() && entries.len() <= 4);
                let sum: f32 = entries.iter().map(|e| e.contribution).sum();
                assert!((sum - 1.0).abs() < 1e-6, "texel {} sums to {}", texel, sum);
                assert!(entries.iter().all(|e| e.weight_index < info.weight_count));
            }
        }
    }

    #[test]
    fn test_both_views_agree() {
        let mut packed = PackedDecimationData::default();
        // A grid before the one under test, so offsets are non-zero
        init_decimation_info(6, 6, 2, 2, &mut packed);
        let first_len = packed.texel_to_weight.len();
        let info = init_decimation_info(6, 6, 4, 3, &mut packed);

        let mut forward = Vec::new();
        for texel in 0..info.texel_count {
            for e in info.texel_weights(&packed, texel as usize) {
                forward.push((texel, e.weight_index, e.contribution.to_bits()));
            }
        }
        let mut backward = Vec::new();
        for weight in 0..info.weight_count {
            for e in info.weight_texels(&packed, weight as usize) {
                backward.push((e.texel_index, weight, e.contribution.to_bits()));
            }
        }
        forward.sort_unstable();
        backward.sort_unstable();
        assert_eq!(forward, backward);
        assert_eq!(info.texel_weights_offset[0] as usize, first_len);
        assert!(first_len > 36);
    }

    #[test]
    fn test_max_weight_precision() {
        // 16 weights take 80 bits at QUANT_32, two planes fill 96 bits at QUANT_8
        assert_eq!(max_weight_precision(16), (Some(QuantMethod::Quant32), Some(QuantMethod::Quant8)));
        // 64 weights only fit at one bit per weight, and never in two planes
        assert_eq!(max_weight_precision(64), (Some(QuantMethod::Quant2), None));
        // 4 weights only reach the minimum weight bits with two planes
        assert_eq!(max_weight_precision(4), (None, Some(QuantMethod::Quant32)));
    }

    #[test]
    fn test_angular_limits() {
        let mut packed = PackedDecimationData::default();
        let mut info = init_decimation_info(4, 4, 4, 4, &mut packed);
        info.set_angular_limits(QuantMethod::Quant32, QuantMethod::Quant12, QuantMethod::Quant32);
        assert_eq!(info.max_quant_level, QuantMethod::Quant12 as u32);
        assert_eq!(info.max_angular_steps, 12);
        assert_eq!(info.max_quant_steps, 12);

        info.set_angular_limits(QuantMethod::Quant5, QuantMethod::Quant12, QuantMethod::Quant32);
        assert_eq!(info.max_angular_steps, 5);
    }
}
