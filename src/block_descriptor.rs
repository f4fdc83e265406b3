//! Compiled block modes and weight grids of one block size.

use log::debug;

use crate::block_mode::decode_block_mode_2d;
use crate::config::{ChannelWeights, EncoderConfig};
use crate::decimation::{
    init_decimation_info, DecimationInfo, DecimationMode, PackedDecimationData, TexelToWeight,
    WeightToTexel,
};
use crate::quant::QuantMethod;
use crate::{Error, Result, BLOCK_MAX_TEXELS, WEIGHTS_MAX_BLOCK_MODES, WEIGHTS_MAX_DECIMATION_MODES};

/// Largest supported block dimension.
pub const BLOCK_MAX_DIM: u32 = 12;

// Weight grids are looked up with y * 16 + x
const DECIMATION_KEY_STRIDE: usize = 16;
const DECIMATION_KEYS: usize = (BLOCK_MAX_DIM as usize + 1) * DECIMATION_KEY_STRIDE;

// Bits left for everything else when weights use the whole budget
const DUAL_PLANE_SPARE_BITS: u32 = 109;
const SINGLE_PLANE_SPARE_BITS: u32 = 111;

/// A block mode that is legal for the compiled block size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockMode {
    /// The 11-bit block mode field.
    pub mode_index: u16,
    /// Index into the decimation modes of the block size.
    pub decimation_mode: usize,
    pub quant_mode: QuantMethod,
    pub weight_bits: u32,
    pub is_dual_plane: bool,
}

/// Values shared by every block of an image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UniformVariables {
    pub xdim: u32,
    pub ydim: u32,
    pub texel_count: u32,
    pub decimation_mode_count: u32,
    pub block_mode_count: u32,
    pub quant_limit: u32,
    pub partition_count: u32,
    pub tune_candidate_limit: u32,
    pub channel_weights: ChannelWeights,
}

/// Decimation modes and block modes the search stage should try.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrialModes {
    /// Decimation mode indices, in ascending order.
    pub decimation_modes: Vec<u32>,
    pub block_modes: Vec<BlockModeLookup>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockModeLookup {
    /// Index into [`BlockSizeDescriptor::block_modes`].
    pub block_mode: u32,
    /// Index into [`TrialModes::decimation_modes`].
    pub decimation_trial: u32,
}

/// Everything about a block size that does not depend on image content.
///
/// Built once per block size and shared read-only afterwards.
#[derive(Clone, Debug)]
pub struct BlockSizeDescriptor {
    config: EncoderConfig,
    uniform: UniformVariables,

    decimation_modes: Vec<DecimationMode>,
    decimation_info: Vec<DecimationInfo>,
    packed: PackedDecimationData,

    block_modes: Vec<BlockMode>,
    block_mode_index: Box<[Option<u16>; WEIGHTS_MAX_BLOCK_MODES]>,
}

impl BlockSizeDescriptor {
    pub fn new(xdim: u32, ydim: u32) -> Result<Self> {
        Self::with_config(xdim, ydim, EncoderConfig::default())
    }

    pub fn with_config(xdim: u32, ydim: u32, config: EncoderConfig) -> Result<Self> {
        let supported = 2..=BLOCK_MAX_DIM;
        if !supported.contains(&xdim) || !supported.contains(&ydim) {
            return Err(Error::UnsupportedBlockSize { x: xdim, y: ydim });
        }
        debug_assert!((xdim * ydim) as usize <= BLOCK_MAX_TEXELS);

        let mut decimation_mode_index = [None::<usize>; DECIMATION_KEYS];
        let mut decimation_modes = Vec::new();
        let mut decimation_info = Vec::new();
        let mut packed = PackedDecimationData::default();
        let mut block_modes = Vec::new();
        let mut block_mode_index = Box::new([None; WEIGHTS_MAX_BLOCK_MODES]);

        for code in 0..WEIGHTS_MAX_BLOCK_MODES as u16 {
            let Some(params) = decode_block_mode_2d(code) else {
                continue;
            };
            if params.x_weights > xdim || params.y_weights > ydim {
                continue;
            }

            let spare_bits = if params.is_dual_plane {
                DUAL_PLANE_SPARE_BITS
            } else {
                SINGLE_PLANE_SPARE_BITS
            };
            if params.weight_bits >= spare_bits {
                continue;
            }

            let key = params.y_weights as usize * DECIMATION_KEY_STRIDE + params.x_weights as usize;
            let decimation_mode = match decimation_mode_index[key] {
                Some(index) => index,
                None => {
                    let (mode, info) = construct_dt_entry(
                        xdim,
                        ydim,
                        params.x_weights,
                        params.y_weights,
                        &config,
                        &mut packed,
                    )?;
                    decimation_modes.push(mode);
                    decimation_info.push(info);
                    decimation_mode_index[key] = Some(decimation_modes.len() - 1);
                    decimation_modes.len() - 1
                }
            };

            decimation_modes[decimation_mode].add_reference(params.quant_mode, params.is_dual_plane);

            block_mode_index[code as usize] = Some(block_modes.len() as u16);
            block_modes.push(BlockMode {
                mode_index: code,
                decimation_mode,
                quant_mode: params.quant_mode,
                weight_bits: params.weight_bits,
                is_dual_plane: params.is_dual_plane,
            });
        }

        if decimation_modes.len() > WEIGHTS_MAX_DECIMATION_MODES {
            return Err(Error::invariant(format!(
                "{} decimation modes exceed the table size",
                decimation_modes.len()
            )));
        }

        debug!(
            "Compiled {}x{} blocks: {} block modes, {} decimation modes, {} interpolation entries",
            xdim,
            ydim,
            block_modes.len(),
            decimation_modes.len(),
            packed.texel_to_weight.len()
        );

        let uniform = UniformVariables {
            xdim,
            ydim,
            texel_count: xdim * ydim,
            decimation_mode_count: decimation_modes.len() as u32,
            block_mode_count: block_modes.len() as u32,
            quant_limit: config.weight_quant_limit as u32,
            partition_count: 1,
            tune_candidate_limit: config.trial_candidate_limit,
            channel_weights: config.channel_weights,
        };

        Ok(BlockSizeDescriptor {
            config,
            uniform,
            decimation_modes,
            decimation_info,
            packed,
            block_modes,
            block_mode_index,
        })
    }

    pub fn config(&self) -> &EncoderConfig {
        &self.config
    }

    pub fn uniform_variables(&self) -> &UniformVariables {
        &self.uniform
    }

    pub fn xdim(&self) -> u32 {
        self.uniform.xdim
    }

    pub fn ydim(&self) -> u32 {
        self.uniform.ydim
    }

    pub fn texel_count(&self) -> usize {
        self.uniform.texel_count as usize
    }

    pub fn block_modes(&self) -> &[BlockMode] {
        &self.block_modes
    }

    /// Position in [`Self::block_modes`] of the 11-bit mode `code`, or `None`
    /// if the mode is not legal for this block size.
    pub fn block_mode_packed_index(&self, code: u16) -> Option<usize> {
        self.block_mode_index
            .get(code as usize)
            .copied()
            .flatten()
            .map(usize::from)
    }

    pub fn block_mode(&self, code: u16) -> Option<&BlockMode> {
        self.block_mode_packed_index(code).map(|i| &self.block_modes[i])
    }

    pub(crate) fn block_mode_index_table(&self) -> &[Option<u16>; WEIGHTS_MAX_BLOCK_MODES] {
        &self.block_mode_index
    }

    pub fn decimation_modes(&self) -> &[DecimationMode] {
        &self.decimation_modes
    }

    pub fn decimation_info(&self) -> &[DecimationInfo] {
        &self.decimation_info
    }

    pub fn packed_decimation_data(&self) -> &PackedDecimationData {
        &self.packed
    }

    /// Weights interpolated into `texel` by decimation mode `decimation_mode`.
    pub fn texel_weights(&self, decimation_mode: usize, texel: usize) -> &[TexelToWeight] {
        self.decimation_info[decimation_mode].texel_weights(&self.packed, texel)
    }

    /// Texels weight `weight` of decimation mode `decimation_mode` contributes to.
    pub fn weight_texels(&self, decimation_mode: usize, weight: usize) -> &[WeightToTexel] {
        self.decimation_info[decimation_mode].weight_texels(&self.packed, weight)
    }

    /// Picks the single plane block modes whose weight grid is used at a
    /// precision up to the configured weight quant limit.
    pub fn trial_modes(&self) -> TrialModes {
        let max_weight_quant = self.config.weight_quant_limit.min(QuantMethod::Quant32);
        let mask = (1u32 << (max_weight_quant as u32 + 1)) - 1;

        let mut remap = vec![None; self.decimation_modes.len()];
        let mut decimation_modes = Vec::new();
        for (i, mode) in self.decimation_modes.iter().enumerate() {
            if mode.refprec_1plane & mask == 0 {
                continue;
            }
            remap[i] = Some(decimation_modes.len() as u32);
            decimation_modes.push(i as u32);
        }

        let block_modes = self
            .block_modes
            .iter()
            .enumerate()
            .filter(|(_, bm)| !bm.is_dual_plane)
            .filter_map(|(i, bm)| {
                remap[bm.decimation_mode].map(|decimation_trial| BlockModeLookup {
                    block_mode: i as u32,
                    decimation_trial,
                })
            })
            .collect::<Vec<_>>();

        debug!(
            "Trial modes: {} of {} decimation modes, {} of {} block modes",
            decimation_modes.len(),
            self.decimation_modes.len(),
            block_modes.len(),
            self.block_modes.len()
        );

        TrialModes {
            decimation_modes,
            block_modes,
        }
    }
}

fn construct_dt_entry(
    x_texels: u32,
    y_texels: u32,
    x_weights: u32,
    y_weights: u32,
    config: &EncoderConfig,
    packed: &mut PackedDecimationData,
) -> Result<(DecimationMode, DecimationInfo)> {
    let mode = DecimationMode::new(x_weights * y_weights);

    // Grids too small for a single plane are sized by their dual plane precision
    let maxprec = mode
        .maxprec_1plane
        .or(mode.maxprec_2planes)
        .ok_or(Error::NoWeightPrecision {
            x_weights,
            y_weights,
        })?;

    let mut info = init_decimation_info(x_texels, y_texels, x_weights, y_weights, packed);
    info.set_angular_limits(maxprec, config.angular_quant_limit, config.weight_quant_limit);

    Ok((mode, info))
}
