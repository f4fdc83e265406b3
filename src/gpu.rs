//! Little-endian records consumed by the compute stage.
//!
//! Every record is a sequence of 32-bit words padded to a multiple of 16
//! bytes. Fixed-size tables have unused slots zeroed unless noted otherwise.

use byteorder::{ByteOrder, LE};

use crate::angular::AngularTables;
use crate::block_descriptor::{BlockMode, BlockSizeDescriptor, TrialModes, UniformVariables};
use crate::decimation::{DecimationInfo, DecimationMode};
use crate::{BLOCK_MAX_TEXELS, BLOCK_MAX_WEIGHTS, WEIGHTS_MAX_BLOCK_MODES, WEIGHTS_MAX_DECIMATION_MODES};

pub const UNIFORM_RECORD_SIZE: usize = 48;
pub const BLOCK_MODE_RECORD_SIZE: usize = 32;
pub const DECIMATION_MODE_RECORD_SIZE: usize = 16;
pub const DECIMATION_INFO_RECORD_SIZE: usize = DECIMATION_INFO_WORDS * 4;
pub const MAP_RECORD_SIZE: usize = 16;
pub const TRIAL_RECORD_SIZE: usize = 16;

/// Block mode index entry of a mode that is not legal for the block size.
pub const BAD_BLOCK_MODE: u32 = 0xFFFF;

/// Stored in place of a missing weight precision, read as -1 by the compute stage.
const NO_PRECISION: u32 = u32::MAX;

const DECIMATION_INFO_WORDS: usize = 8 + 2 * BLOCK_MAX_TEXELS + 2 * BLOCK_MAX_WEIGHTS;

/// All tables of a block size, ready for upload.
#[derive(Clone, Debug, PartialEq)]
pub struct GpuTables {
    pub uniforms: Vec<u8>,
    pub block_modes: Vec<u8>,
    pub block_mode_index: Vec<u8>,
    pub decimation_modes: Vec<u8>,
    pub decimation_info: Vec<u8>,
    pub texel_to_weight: Vec<u8>,
    pub weight_to_texel: Vec<u8>,
    pub valid_decimation_modes: Vec<u8>,
    pub valid_block_modes: Vec<u8>,
    pub sin_table: Vec<u8>,
    pub cos_table: Vec<u8>,
}

impl GpuTables {
    pub fn new(bsd: &BlockSizeDescriptor, trials: &TrialModes, angular: &AngularTables) -> Self {
        GpuTables {
            uniforms: uniform_record(bsd.uniform_variables()),
            block_modes: block_mode_records(bsd),
            block_mode_index: block_mode_index_records(bsd),
            decimation_modes: decimation_mode_records(bsd),
            decimation_info: decimation_info_records(bsd),
            texel_to_weight: texel_to_weight_records(bsd),
            weight_to_texel: weight_to_texel_records(bsd),
            valid_decimation_modes: valid_decimation_mode_records(trials),
            valid_block_modes: valid_block_mode_records(trials),
            sin_table: f32_table(&angular.sin),
            cos_table: f32_table(&angular.cos),
        }
    }
}

/// Writes `records` into a buffer of `slots` records, zero filling the rest.
fn pack_words<const N: usize>(records: impl IntoIterator<Item = [u32; N]>, slots: usize) -> Vec<u8> {
    let mut out = vec![0u8; slots * N * 4];
    for (chunk, words) in out.chunks_exact_mut(N * 4).zip(records) {
        LE::write_u32_into(&words, chunk);
    }
    out
}

fn f32_table(values: &[f32]) -> Vec<u8> {
    let mut out = vec![0u8; values.len() * 4];
    LE::write_f32_into(values, &mut out);
    out
}

pub fn uniform_record(uniform: &UniformVariables) -> Vec<u8> {
    let w = uniform.channel_weights;
    let words = [
        uniform.xdim,
        uniform.ydim,
        uniform.texel_count,
        uniform.decimation_mode_count,
        uniform.block_mode_count,
        uniform.quant_limit,
        uniform.partition_count,
        uniform.tune_candidate_limit,
        w[0].to_bits(),
        w[1].to_bits(),
        w[2].to_bits(),
        w[3].to_bits(),
    ];
    pack_words([words], 1)
}

fn block_mode_words(bm: &BlockMode) -> [u32; BLOCK_MODE_RECORD_SIZE / 4] {
    [
        bm.mode_index as u32,
        bm.decimation_mode as u32,
        bm.quant_mode as u32,
        bm.weight_bits,
        bm.is_dual_plane as u32,
        0,
        0,
        0,
    ]
}

/// Legal block modes in mode order, in `WEIGHTS_MAX_BLOCK_MODES` slots.
pub fn block_mode_records(bsd: &BlockSizeDescriptor) -> Vec<u8> {
    pack_words(bsd.block_modes().iter().map(block_mode_words), WEIGHTS_MAX_BLOCK_MODES)
}

/// For each 11-bit mode, its position in the block mode records.
pub fn block_mode_index_records(bsd: &BlockSizeDescriptor) -> Vec<u8> {
    let words: Vec<u32> = bsd
        .block_mode_index_table()
        .iter()
        .map(|index| index.map_or(BAD_BLOCK_MODE, u32::from))
        .collect();
    let mut out = vec![0u8; words.len() * 4];
    LE::write_u32_into(&words, &mut out);
    out
}

fn decimation_mode_words(dm: &DecimationMode) -> [u32; DECIMATION_MODE_RECORD_SIZE / 4] {
    [
        dm.maxprec_1plane.map_or(NO_PRECISION, |q| q as u32),
        dm.maxprec_2planes.map_or(NO_PRECISION, |q| q as u32),
        dm.refprec_1plane,
        dm.refprec_2planes,
    ]
}

/// Decimation modes in `WEIGHTS_MAX_DECIMATION_MODES` slots. Unused slots
/// carry no precision and no references.
pub fn decimation_mode_records(bsd: &BlockSizeDescriptor) -> Vec<u8> {
    let unused = DecimationMode {
        maxprec_1plane: None,
        maxprec_2planes: None,
        refprec_1plane: 0,
        refprec_2planes: 0,
    };
    let records = bsd
        .decimation_modes()
        .iter()
        .chain(std::iter::repeat(&unused))
        .take(WEIGHTS_MAX_DECIMATION_MODES)
        .map(decimation_mode_words);
    pack_words(records, WEIGHTS_MAX_DECIMATION_MODES)
}

fn decimation_info_words(info: &DecimationInfo) -> [u32; DECIMATION_INFO_WORDS] {
    let mut words = [0u32; DECIMATION_INFO_WORDS];
    words[..8].copy_from_slice(&[
        info.texel_count,
        info.weight_count,
        info.weight_x,
        info.weight_y,
        info.max_quant_level,
        info.max_angular_steps,
        info.max_quant_steps,
        0,
    ]);

    let (texel_counts, rest) = words[8..].split_at_mut(BLOCK_MAX_TEXELS);
    let (texel_offsets, rest) = rest.split_at_mut(BLOCK_MAX_TEXELS);
    let (weight_counts, weight_offsets) = rest.split_at_mut(BLOCK_MAX_WEIGHTS);

    texel_counts[..info.texel_weight_count.len()].copy_from_slice(&info.texel_weight_count);
    texel_offsets[..info.texel_weights_offset.len()].copy_from_slice(&info.texel_weights_offset);
    weight_counts[..info.weight_texel_count.len()].copy_from_slice(&info.weight_texel_count);
    weight_offsets[..info.weight_texels_offset.len()].copy_from_slice(&info.weight_texels_offset);
    words
}

/// Decimation infos in `WEIGHTS_MAX_DECIMATION_MODES` slots.
pub fn decimation_info_records(bsd: &BlockSizeDescriptor) -> Vec<u8> {
    pack_words(
        bsd.decimation_info().iter().map(decimation_info_words),
        WEIGHTS_MAX_DECIMATION_MODES,
    )
}

pub fn texel_to_weight_records(bsd: &BlockSizeDescriptor) -> Vec<u8> {
    let entries = &bsd.packed_decimation_data().texel_to_weight;
    let records = entries
        .iter()
        .map(|e| [e.weight_index, e.contribution.to_bits(), 0, 0]);
    pack_words(records, entries.len())
}

pub fn weight_to_texel_records(bsd: &BlockSizeDescriptor) -> Vec<u8> {
    let entries = &bsd.packed_decimation_data().weight_to_texel;
    let records = entries
        .iter()
        .map(|e| [e.texel_index, e.contribution.to_bits(), 0, 0]);
    pack_words(records, entries.len())
}

/// Decimation modes to try, one word each.
pub fn valid_decimation_mode_records(trials: &TrialModes) -> Vec<u8> {
    pack_words(trials.decimation_modes.iter().map(|&dm| [dm]), trials.decimation_modes.len())
}

pub fn valid_block_mode_records(trials: &TrialModes) -> Vec<u8> {
    let records = trials
        .block_modes
        .iter()
        .map(|lookup| [lookup.block_mode, lookup.decimation_trial, 0, 0]);
    pack_words(records, trials.block_modes.len())
}

/// One record per (block, decimation mode to try), block-major.
pub fn decimation_mode_trial_records(trials: &TrialModes, block_count: usize) -> Vec<u8> {
    let records = (0..block_count as u32).flat_map(|block| {
        trials
            .decimation_modes
            .iter()
            .map(move |&dm| [block, dm, 0, 0])
    });
    pack_words(records, block_count * trials.decimation_modes.len())
}

/// One record per (block, block mode to try), block-major. The last word
/// before padding is the index of the matching decimation mode trial record.
pub fn block_mode_trial_records(trials: &TrialModes, block_count: usize) -> Vec<u8> {
    let dm_trials = trials.decimation_modes.len() as u32;
    let records = (0..block_count as u32).flat_map(|block| {
        trials.block_modes.iter().map(move |lookup| {
            [
                block,
                lookup.block_mode,
                block * dm_trials + lookup.decimation_trial,
                0,
            ]
        })
    });
    pack_words(records, block_count * trials.block_modes.len())
}
