//! Fully decided block encodings and their 128-bit physical layout.

use log::debug;

use crate::bitwriter::{BitWrite, BitWriterLsb, BitWriterLsbReversed};
use crate::block_descriptor::BlockSizeDescriptor;
use crate::ise::{encode_ise, encode_ise_with};
use crate::partition_select::BlockPartitionings;
use crate::quant::QuantMethod;
use crate::scramble::{color_scramble_table, weight_scramble_table};
use crate::{
    Error, Result, ASTC_BLOCK_SIZE, BLOCK_MAX_PARTITIONS, BLOCK_MAX_WEIGHTS, BLOCK_MAX_WEIGHTS_2PLANE,
    PARTITION_INDEX_BITS,
};

/// Index of the first second-plane weight in [`SymbolicBlock::quantized_weights`].
pub const WEIGHTS_PLANE2_OFFSET: usize = BLOCK_MAX_WEIGHTS_2PLANE;

/// Largest stored weight, representing 1.0.
pub const WEIGHT_MAX: u8 = 64;

const COLOR_VALUES_PER_PARTITION: usize = 8;

const BLOCK_BITS: usize = ASTC_BLOCK_SIZE * 8;
const MODE_BITS: usize = 11;
const PARTITION_COUNT_BITS: usize = 2;
const FORMAT_BITS: usize = 4;
const FORMAT_CLASS_BITS: usize = 6;
const PLANE2_COMPONENT_BITS: usize = 2;

const SINGLE_PARTITION_COLOR_OFFSET: usize = MODE_BITS + PARTITION_COUNT_BITS + FORMAT_BITS;
const MULTI_PARTITION_COLOR_OFFSET: usize =
    MODE_BITS + PARTITION_COUNT_BITS + PARTITION_INDEX_BITS as usize + FORMAT_CLASS_BITS;

/// A block encoding chosen by the search, before bit packing.
#[derive(Clone, Debug, PartialEq)]
pub struct SymbolicBlock {
    /// The 11-bit block mode.
    pub block_mode: u16,
    pub partition_count: u32,
    /// Partition seed, ignored for a single partition.
    pub partition_index: u32,
    /// Colour endpoint format of each partition.
    pub partition_formats: [u8; BLOCK_MAX_PARTITIONS],
    /// Colour endpoint quantization, QUANT_6 or above.
    pub quant_mode: QuantMethod,
    /// Colour component driven by the second weight plane.
    pub plane2_component: u8,
    /// Unquantized endpoint values, [`COLOR_VALUES_PER_PARTITION`] per partition.
    pub packed_color_values: [u8; BLOCK_MAX_PARTITIONS * COLOR_VALUES_PER_PARTITION],
    /// Weights in 0..=64. The second plane starts at [`WEIGHTS_PLANE2_OFFSET`].
    pub quantized_weights: [u8; BLOCK_MAX_WEIGHTS],
    /// Encoding error, lower is better.
    pub errorval: f32,
}

impl Default for SymbolicBlock {
    fn default() -> Self {
        SymbolicBlock {
            block_mode: 0,
            partition_count: 1,
            partition_index: 0,
            partition_formats: [0; BLOCK_MAX_PARTITIONS],
            quant_mode: QuantMethod::Quant256,
            plane2_component: 0,
            packed_color_values: [0; BLOCK_MAX_PARTITIONS * COLOR_VALUES_PER_PARTITION],
            quantized_weights: [0; BLOCK_MAX_WEIGHTS],
            errorval: f32::MAX,
        }
    }
}

impl SymbolicBlock {
    pub fn formats(&self) -> &[u8] {
        &self.partition_formats[..self.partition_count as usize]
    }

    /// All partitions share one endpoint format.
    pub fn formats_matched(&self) -> bool {
        self.formats().windows(2).all(|w| w[0] == w[1])
    }
}

/// Number of colour values stored for an endpoint format.
fn color_value_count(format: u8) -> usize {
    2 * (format as usize >> 2) + 2
}

/// Maps a weight in 0..=64 to the nearest of `levels` quantized values.
fn quantize_weight(weight: u8, levels: u32) -> Result<usize> {
    if weight > WEIGHT_MAX {
        return Err(Error::invariant(format!("weight {} above {}", weight, WEIGHT_MAX)));
    }
    let scaled = (weight as f32 / WEIGHT_MAX as f32) * (levels - 1) as f32;
    Ok((scaled + 0.5) as usize)
}

/// Format field of a multi-partition block whose formats differ: the lowest
/// format class, a class offset bit per partition, then two low bits per
/// partition.
fn encode_mixed_formats(formats: &[u8]) -> Result<u32> {
    let low_class = match formats.iter().map(|f| f >> 2).min().unwrap_or(0) {
        3 => 2,
        class => class,
    };
    let high_class = formats.iter().map(|f| f >> 2).max().unwrap_or(0);
    if high_class - low_class > 1 {
        return Err(Error::invariant(format!(
            "endpoint formats {:?} span more than two adjacent classes",
            formats
        )));
    }

    let mut encoded = low_class as u32 + 1;
    let mut bitpos = 2;
    for &format in formats {
        encoded |= (((format >> 2) - low_class) as u32) << bitpos;
        bitpos += 1;
    }
    for &format in formats {
        encoded |= ((format & 3) as u32) << bitpos;
        bitpos += 2;
    }
    Ok(encoded)
}

/// Packs a symbolic block into its 16-byte physical form.
///
/// Weights fill the block from the top bit downwards. The mode, partition and
/// format fields come first from bit 0, followed by the colour values. The
/// high part of a mixed format field and the second plane component sit just
/// below the weights.
pub fn symbolic_to_physical(bsd: &BlockSizeDescriptor, scb: &SymbolicBlock) -> Result<[u8; ASTC_BLOCK_SIZE]> {
    let bm = bsd.block_mode(scb.block_mode).ok_or_else(|| {
        Error::invariant(format!(
            "block mode {} is not legal for {}x{} blocks",
            scb.block_mode,
            bsd.xdim(),
            bsd.ydim()
        ))
    })?;

    let partition_count = scb.partition_count;
    if !(1..=BLOCK_MAX_PARTITIONS as u32).contains(&partition_count) {
        return Err(Error::UnsupportedPartitionCount(partition_count));
    }
    if scb.formats().iter().any(|&f| f >> FORMAT_BITS != 0) {
        return Err(Error::invariant(format!("bad endpoint formats {:?}", scb.formats())));
    }

    let color_table = color_scramble_table(scb.quant_mode).ok_or_else(|| {
        Error::invariant(format!("colour quantization {:?} below QUANT_6", scb.quant_mode))
    })?;
    let weight_table = weight_scramble_table(bm.quant_mode).ok_or_else(|| {
        Error::invariant(format!("weight quantization {:?} above QUANT_32", bm.quant_mode))
    })?;

    let weight_count = bsd.decimation_info()[bm.decimation_mode].weight_count as usize;
    let levels = bm.quant_mode.levels();

    let mut weights = Vec::with_capacity(BLOCK_MAX_WEIGHTS);
    for i in 0..weight_count {
        weights.push(weight_table[quantize_weight(scb.quantized_weights[i], levels)?]);
        if bm.is_dual_plane {
            let plane2 = scb.quantized_weights[i + WEIGHTS_PLANE2_OFFSET];
            weights.push(weight_table[quantize_weight(plane2, levels)?]);
        }
    }

    let mut block = [0u8; ASTC_BLOCK_SIZE];

    // Weights are stored bit-reversed from the end of the block
    let bits_for_weights = encode_ise_with(bm.quant_mode, &weights, &mut BitWriterLsbReversed::new(&mut block))?;
    let mut below_weights_pos = BLOCK_BITS - bits_for_weights;

    let mut high_formats = None;
    let mut writer = BitWriterLsb::new(&mut block);
    writer.write_u16(MODE_BITS, scb.block_mode);
    writer.write_u32(PARTITION_COUNT_BITS, partition_count - 1);

    if partition_count > 1 {
        if scb.partition_index >> PARTITION_INDEX_BITS != 0 {
            return Err(Error::invariant(format!(
                "partition index {} does not fit in {} bits",
                scb.partition_index, PARTITION_INDEX_BITS
            )));
        }
        writer.write_u32(6, scb.partition_index);
        writer.write_u32(PARTITION_INDEX_BITS as usize - 6, scb.partition_index >> 6);

        if scb.formats_matched() {
            writer.write_u8(FORMAT_CLASS_BITS, scb.partition_formats[0] << 2);
        } else {
            let encoded = encode_mixed_formats(scb.formats())?;
            let high_size = 3 * partition_count as usize - 4;
            below_weights_pos -= high_size;
            writer.write_u32(FORMAT_CLASS_BITS, encoded);
            high_formats = Some((high_size, encoded >> FORMAT_CLASS_BITS));
        }
    } else {
        writer.write_u8(FORMAT_BITS, scb.partition_formats[0]);
    }

    if let Some((size, bits)) = high_formats {
        BitWriterLsb::at(&mut block, below_weights_pos).write_u32(size, bits);
    }

    if bm.is_dual_plane {
        if scb.plane2_component >> PLANE2_COMPONENT_BITS != 0 {
            return Err(Error::invariant(format!(
                "plane 2 component {} out of range",
                scb.plane2_component
            )));
        }
        below_weights_pos -= PLANE2_COMPONENT_BITS;
        BitWriterLsb::at(&mut block, below_weights_pos).write_u8(PLANE2_COMPONENT_BITS, scb.plane2_component);
    }

    let mut color_values = Vec::with_capacity(BLOCK_MAX_PARTITIONS * COLOR_VALUES_PER_PARTITION);
    for (p, &format) in scb.formats().iter().enumerate() {
        let count = color_value_count(format);
        if count > COLOR_VALUES_PER_PARTITION {
            return Err(Error::invariant(format!("format {} needs {} colour values", format, count)));
        }
        let start = p * COLOR_VALUES_PER_PARTITION;
        color_values.extend(
            scb.packed_color_values[start..start + count]
                .iter()
                .map(|&v| color_table[v as usize]),
        );
    }

    let color_offset = if partition_count == 1 {
        SINGLE_PARTITION_COLOR_OFFSET
    } else {
        MULTI_PARTITION_COLOR_OFFSET
    };
    let color_bits = scb.quant_mode.ise_bitcount(color_values.len() as u32) as usize;
    if color_offset + color_bits > below_weights_pos {
        return Err(Error::invariant(format!(
            "{} colour bits at {} run into field at {}",
            color_bits, color_offset, below_weights_pos
        )));
    }

    encode_ise(scb.quant_mode, &color_values, &mut block, color_offset)?;

    Ok(block)
}

/// Keeps, per block, the lowest error encoding among `results`, where
/// `results` holds one encoding per candidate of `partitionings`.
pub fn merge_best_candidates(
    best: &mut [Option<SymbolicBlock>],
    partitionings: &BlockPartitionings,
    results: &[SymbolicBlock],
) -> Result<()> {
    if results.len() != partitionings.candidates.len() || best.len() != partitionings.offsets.len() {
        return Err(Error::invariant(format!(
            "{} results for {} candidates of {} blocks, {} blocks tracked",
            results.len(),
            partitionings.candidates.len(),
            partitionings.offsets.len(),
            best.len()
        )));
    }

    for (block_index, slot) in best.iter_mut().enumerate() {
        let start = partitionings.offsets[block_index];
        let end = start + partitionings.block_candidates(block_index).len();
        let Some(candidate) = results[start..end]
            .iter()
            .reduce(|a, b| if b.errorval < a.errorval { b } else { a })
        else {
            continue;
        };

        if slot.as_ref().map_or(true, |current| candidate.errorval < current.errorval) {
            *slot = Some(candidate.clone());
        }
    }

    Ok(())
}

/// Packs the chosen encoding of every block, in block order.
pub fn pack_blocks(bsd: &BlockSizeDescriptor, blocks: &[Option<SymbolicBlock>]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(blocks.len() * ASTC_BLOCK_SIZE);
    for (i, block) in blocks.iter().enumerate() {
        let scb = block
            .as_ref()
            .ok_or_else(|| Error::invariant(format!("block {} has no encoding", i)))?;
        out.extend_from_slice(&symbolic_to_physical(bsd, scb)?);
    }
    debug!("Packed {} blocks", blocks.len());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitreader::BitReaderLsb;
    use crate::ise::decode_ise;
    use crate::partition_select::PartitionCandidate;

    fn reversed(block: &[u8; ASTC_BLOCK_SIZE]) -> [u8; ASTC_BLOCK_SIZE] {
        let mut out = [0; ASTC_BLOCK_SIZE];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = block[ASTC_BLOCK_SIZE - 1 - i].reverse_bits();
        }
        out
    }

    fn read(block: &[u8], pos: usize, count: usize) -> u32 {
        BitReaderLsb::at(block, pos).read(count)
    }

    #[test]
    fn test_single_partition_mode_42() {
        let bsd = BlockSizeDescriptor::new(8, 8).unwrap();
        let scb = SymbolicBlock {
            block_mode: 42,
            quant_mode: QuantMethod::Quant8,
            packed_color_values: {
                let mut v = [0; 32];
                v[1] = 255;
                v
            },
            quantized_weights: [32; BLOCK_MAX_WEIGHTS],
            ..SymbolicBlock::default()
        };

        let block = symbolic_to_physical(&bsd, &scb).unwrap();
        assert_eq!(read(&block, 0, 11), 42);
        assert_eq!(read(&block, 11, 2), 0);
        assert_eq!(read(&block, 13, 4), 0);
        assert_eq!(decode_ise(QuantMethod::Quant8, 2, &block, 17), [0, 7]);

        // 3x8 grid of QUANT_4 weights, 32/64 rounds to 2
        assert_eq!(decode_ise(QuantMethod::Quant4, 24, &reversed(&block), 0), [2; 24]);

        // Nothing between the colour values and the weights
        assert_eq!(read(&block, 23, 32), 0);
        assert_eq!(read(&block, 55, 128 - 48 - 55), 0);
    }

    #[test]
    fn test_weights_are_scrambled() {
        let bsd = BlockSizeDescriptor::new(6, 6).unwrap();
        let bm = *bsd
            .block_modes()
            .iter()
            .find(|bm| bm.quant_mode == QuantMethod::Quant6 && !bm.is_dual_plane)
            .unwrap();
        let weight_count = bsd.decimation_info()[bm.decimation_mode].weight_count as usize;

        let mut weights = [0; BLOCK_MAX_WEIGHTS];
        for (i, w) in weights.iter_mut().take(weight_count).enumerate() {
            *w = [0, 13, 26, 38, 51, 64][i % 6];
        }
        let scb = SymbolicBlock {
            block_mode: bm.mode_index,
            quant_mode: QuantMethod::Quant12,
            quantized_weights: weights,
            ..SymbolicBlock::default()
        };

        let block = symbolic_to_physical(&bsd, &scb).unwrap();
        let stored = decode_ise(QuantMethod::Quant6, weight_count, &reversed(&block), 0);
        let expected: Vec<u8> = (0..weight_count).map(|i| [0, 2, 4, 5, 3, 1][i % 6]).collect();
        assert_eq!(stored, expected);
    }

    #[test]
    fn test_matched_multi_partition_formats() {
        let bsd = BlockSizeDescriptor::new(8, 8).unwrap();
        let scb = SymbolicBlock {
            block_mode: 42,
            partition_count: 3,
            partition_index: 0b11_0110_1001,
            partition_formats: [8, 8, 8, 0],
            quant_mode: QuantMethod::Quant6,
            ..SymbolicBlock::default()
        };

        let block = symbolic_to_physical(&bsd, &scb).unwrap();
        assert_eq!(read(&block, 11, 2), 2);
        assert_eq!(read(&block, 13, 10), 0b11_0110_1001);
        assert_eq!(read(&block, 23, 6), 8 << 2 & 0x3F);
        // Format 8 stores 6 values per partition
        assert_eq!(decode_ise(QuantMethod::Quant6, 18, &block, 29), [0; 18]);
    }

    #[test]
    fn test_mixed_multi_partition_formats() {
        assert_eq!(encode_mixed_formats(&[4, 8]).unwrap(), 0b10_10);
        // Lowest class 3 is stored as class 2
        assert_eq!(encode_mixed_formats(&[12, 13, 15, 14]).unwrap(), 0b10_11_01_00_1_1_1_1_11);
        assert!(encode_mixed_formats(&[0, 8]).is_err());
        assert!(encode_mixed_formats(&[15, 4, 5]).is_err());

        let bsd = BlockSizeDescriptor::new(8, 8).unwrap();
        let scb = SymbolicBlock {
            block_mode: 42,
            partition_count: 3,
            partition_index: 5,
            partition_formats: [4, 9, 6, 0],
            quant_mode: QuantMethod::Quant6,
            ..SymbolicBlock::default()
        };

        let encoded = encode_mixed_formats(scb.formats()).unwrap();
        assert_eq!(encoded, 0b10_01_00_0_1_0_10);

        let block = symbolic_to_physical(&bsd, &scb).unwrap();
        assert_eq!(read(&block, 13, 10), 5);
        assert_eq!(read(&block, 23, 6), encoded & 0x3F);
        // 5 high bits directly below the 48 weight bits
        assert_eq!(read(&block, 128 - 48 - 5, 5), encoded >> 6);
        assert_eq!(decode_ise(QuantMethod::Quant6, 14, &block, 29), [0; 14]);
    }

    #[test]
    fn test_dual_plane_component() {
        let bsd = BlockSizeDescriptor::new(4, 4).unwrap();
        let bm = *bsd.block_modes().iter().find(|bm| bm.is_dual_plane).unwrap();
        let bits_for_weights = bm.weight_bits as usize;

        let mut weights = [0; BLOCK_MAX_WEIGHTS];
        weights[WEIGHTS_PLANE2_OFFSET] = 64;
        let scb = SymbolicBlock {
            block_mode: bm.mode_index,
            quant_mode: QuantMethod::Quant6,
            plane2_component: 3,
            quantized_weights: weights,
            ..SymbolicBlock::default()
        };

        let block = symbolic_to_physical(&bsd, &scb).unwrap();
        assert_eq!(read(&block, 128 - bits_for_weights - 2, 2), 3);

        let stored = decode_ise(bm.quant_mode, 2, &reversed(&block), 0);
        let top = weight_scramble_table(bm.quant_mode).unwrap()[bm.quant_mode.levels() as usize - 1];
        assert_eq!(stored, [0, top]);
    }

    #[test]
    fn test_invalid_blocks() {
        let bsd = BlockSizeDescriptor::new(4, 4).unwrap();
        let valid = SymbolicBlock {
            block_mode: bsd.block_modes()[0].mode_index,
            ..SymbolicBlock::default()
        };
        assert!(symbolic_to_physical(&bsd, &valid).is_ok());

        let cases = [
            SymbolicBlock { block_mode: 42, ..valid.clone() },
            SymbolicBlock { quant_mode: QuantMethod::Quant5, ..valid.clone() },
            SymbolicBlock { partition_formats: [16, 0, 0, 0], ..valid.clone() },
            SymbolicBlock { partition_count: 2, partition_index: 1024, ..valid.clone() },
            // Classes 0 and 2 cannot share one class offset bit
            SymbolicBlock { partition_count: 2, partition_index: 5, partition_formats: [0, 8, 0, 0], ..valid.clone() },
            SymbolicBlock {
                quantized_weights: [65; BLOCK_MAX_WEIGHTS],
                ..valid.clone()
            },
            // Thirty-two 8-bit values do not fit next to the weights
            SymbolicBlock { partition_count: 4, partition_formats: [15; 4], ..valid.clone() },
        ];
        for scb in &cases {
            assert!(
                matches!(symbolic_to_physical(&bsd, scb), Err(Error::InvariantViolated(_))),
                "{:?}",
                scb
            );
        }

        assert!(matches!(
            symbolic_to_physical(&bsd, &SymbolicBlock { partition_count: 0, ..valid }),
            Err(Error::UnsupportedPartitionCount(0))
        ));
    }

    #[test]
    fn test_merge_best_candidates() {
        let candidate = |block_index| PartitionCandidate {
            block_index,
            partition_count: 2,
            partition_index: 0,
        };
        let partitionings = BlockPartitionings {
            offsets: vec![0, 2, 2],
            candidates: vec![candidate(0), candidate(0), candidate(2)],
        };
        let result = |errorval, partition_index| SymbolicBlock {
            errorval,
            partition_index,
            ..SymbolicBlock::default()
        };

        let mut best = vec![None, None, Some(result(1.0, 7))];
        let results = [result(5.0, 1), result(3.0, 2), result(2.0, 3)];
        merge_best_candidates(&mut best, &partitionings, &results).unwrap();

        assert_eq!(best[0].as_ref().unwrap().partition_index, 2);
        assert!(best[1].is_none());
        assert_eq!(best[2].as_ref().unwrap().partition_index, 7);

        assert!(merge_best_candidates(&mut best, &partitionings, &results[..2]).is_err());
    }

    #[test]
    fn test_pack_blocks() {
        let bsd = BlockSizeDescriptor::new(4, 4).unwrap();
        let scb = SymbolicBlock {
            block_mode: bsd.block_modes()[0].mode_index,
            ..SymbolicBlock::default()
        };
        let packed = pack_blocks(&bsd, &[Some(scb.clone()), Some(scb)]).unwrap();
        assert_eq!(packed.len(), 32);
        assert_eq!(packed[..16], packed[16..]);
        assert!(pack_blocks(&bsd, &[None]).is_err());
    }
}
