//! Bounded integer sequence encoding (BISE).
//!
//! Values are split into low plain bits and a high trit or quint. Five trits
//! are packed into one 8-bit cluster, three quints into one 7-bit cluster, and
//! the cluster bits are interleaved with the plain bits of each value.

use crate::bitreader::BitReaderLsb;
use crate::bitwriter::{BitWrite, BitWriterLsb};
use crate::quant::QuantMethod;
use crate::{Error, Result};

/// Bit count returned for quantization indices outside of the known range.
/// Large enough that any caller comparing against a block budget rejects it.
pub const ISE_BITCOUNT_OVERFLOW: u32 = 1024;

const TRIT_BLOCK_SIZE: usize = 5;
const QUINT_BLOCK_SIZE: usize = 3;

// Bits of the packed cluster following each value, and where they come from
const TRIT_CLUSTER_BITS: [usize; TRIT_BLOCK_SIZE] = [2, 2, 1, 2, 1];
const TRIT_CLUSTER_SHIFT: [u32; TRIT_BLOCK_SIZE] = [0, 2, 4, 5, 7];
const QUINT_CLUSTER_BITS: [usize; QUINT_BLOCK_SIZE] = [3, 2, 2];
const QUINT_CLUSTER_SHIFT: [u32; QUINT_BLOCK_SIZE] = [0, 3, 5];

/// Number of bits needed to store `count` values at quantization `quant_index`.
///
/// The index is deliberately untyped: it may come from a corrupt block, in
/// which case [`ISE_BITCOUNT_OVERFLOW`] is returned instead of an error.
pub fn ise_sequence_bitcount(count: u32, quant_index: u32) -> u32 {
    let Some(&(scale, divisor_class)) = ISE_SIZES.get(quant_index as usize) else {
        return ISE_BITCOUNT_OVERFLOW;
    };
    let divisor = (divisor_class << 1) + 1;
    match scale.checked_mul(count).and_then(|bits| bits.checked_add(divisor - 1)) {
        Some(bits) => bits / divisor,
        None => ISE_BITCOUNT_OVERFLOW,
    }
}

/// Encodes `values` at `quant` into `out`, starting at `bit_offset`.
///
/// Returns the number of bits written, which always equals
/// [`ise_sequence_bitcount`] for the sequence length.
pub fn encode_ise(quant: QuantMethod, values: &[u8], out: &mut [u8], bit_offset: usize) -> Result<usize> {
    let writer = &mut BitWriterLsb::at(out, bit_offset);
    encode_ise_with(quant, values, writer)
}

pub(crate) fn encode_ise_with<W: BitWrite>(quant: QuantMethod, values: &[u8], writer: &mut W) -> Result<usize> {
    let levels = quant.levels();
    if let Some(v) = values.iter().find(|&&v| v as u32 >= levels) {
        return Err(Error::invariant(format!(
            "value {} out of range for {} levels",
            v, levels
        )));
    }

    let counts = quant.bise_counts();
    let bits = counts.bits as usize;
    let low_mask = crate::mask!(bits as u32);

    if counts.trits > 0 {
        for chunk in values.chunks(TRIT_BLOCK_SIZE) {
            // Missing values of a partial block count as zero
            let lut_id = chunk.iter().rev().fold(0, |acc, &v| acc * 3 + (v >> bits) as usize);
            let t = TRIT_ENCODE_LUT[lut_id] as u32;
            for (i, &v) in chunk.iter().enumerate() {
                writer.write_u32(bits, v as u32 & low_mask);
                writer.write_u32(TRIT_CLUSTER_BITS[i], t >> TRIT_CLUSTER_SHIFT[i]);
            }
        }
    } else if counts.quints > 0 {
        for chunk in values.chunks(QUINT_BLOCK_SIZE) {
            let lut_id = chunk.iter().rev().fold(0, |acc, &v| acc * 5 + (v >> bits) as usize);
            let q = QUINT_ENCODE_LUT[lut_id] as u32;
            for (i, &v) in chunk.iter().enumerate() {
                writer.write_u32(bits, v as u32 & low_mask);
                writer.write_u32(QUINT_CLUSTER_BITS[i], q >> QUINT_CLUSTER_SHIFT[i]);
            }
        }
    } else {
        for &v in values {
            writer.write_u32(bits, v as u32);
        }
    }

    Ok(quant.ise_bitcount(values.len() as u32) as usize)
}

/// Decodes `count` values at `quant` from `input`, starting at `bit_offset`.
/// Bits beyond the end of `input` read as zero.
pub fn decode_ise(quant: QuantMethod, count: usize, input: &[u8], bit_offset: usize) -> Vec<u8> {
    let reader = &mut BitReaderLsb::at(input, bit_offset);
    let counts = quant.bise_counts();
    let bits = counts.bits as usize;
    let mut values = Vec::with_capacity(count);

    if counts.trits > 0 {
        while values.len() < count {
            let block_len = (count - values.len()).min(TRIT_BLOCK_SIZE);
            let mut low = [0u8; TRIT_BLOCK_SIZE];
            let mut t = 0u32;
            for i in 0..block_len {
                low[i] = reader.read_u8(bits);
                t |= reader.read(TRIT_CLUSTER_BITS[i]) << TRIT_CLUSTER_SHIFT[i];
            }
            let trits = decode_trit_block(t as u8);
            values.extend((0..block_len).map(|i| trits[i] << bits | low[i]));
        }
    } else if counts.quints > 0 {
        while values.len() < count {
            let block_len = (count - values.len()).min(QUINT_BLOCK_SIZE);
            let mut low = [0u8; QUINT_BLOCK_SIZE];
            let mut q = 0u32;
            for i in 0..block_len {
                low[i] = reader.read_u8(bits);
                q |= reader.read(QUINT_CLUSTER_BITS[i]) << QUINT_CLUSTER_SHIFT[i];
            }
            let quints = decode_quint_block(q as u8);
            values.extend((0..block_len).map(|i| quints[i] << bits | low[i]));
        }
    } else {
        values.extend((0..count).map(|_| reader.read_u8(bits)));
    }

    values
}

fn decode_trit_block(t: u8) -> [u8; TRIT_BLOCK_SIZE] {
    let (t2, t1, t0, t3, t4);
    let c;
    if (t >> 2) & 0b111 == 0b111 {
        c = ((t >> 5) & 0b111) << 2 | (t & 0b11);
        t4 = 2;
        t3 = 2;
    } else {
        c = t & 0b1_1111;
        if (t >> 5) & 0b11 == 0b11 {
            t4 = 2;
            t3 = (t >> 7) & 1;
        } else {
            t4 = (t >> 7) & 1;
            t3 = (t >> 5) & 0b11;
        }
    }
    if c & 0b11 == 0b11 {
        t2 = 2;
        t1 = (c >> 4) & 1;
        t0 = ((c >> 2) & 0b10) | ((c >> 2) & (!c >> 3) & 1);
    } else if (c >> 2) & 0b11 == 0b11 {
        t2 = 2;
        t1 = 2;
        t0 = c & 0b11;
    } else {
        t2 = (c >> 4) & 1;
        t1 = (c >> 2) & 0b11;
        t0 = (c & 0b10) | (c & (!c >> 1) & 1);
    }
    [t0, t1, t2, t3, t4]
}

fn decode_quint_block(q: u8) -> [u8; QUINT_BLOCK_SIZE] {
    let (q0, q1, q2);
    if (q >> 1) & 0b11 == 0b11 && (q >> 5) & 0b11 == 0 {
        q2 = (q & 1) << 2 | ((q >> 4) & !q & 1) << 1 | ((q >> 3) & !q & 1);
        q1 = 4;
        q0 = 4;
    } else {
        let c;
        if (q >> 1) & 0b11 == 0b11 {
            q2 = 4;
            c = (q & 0b1_1000) | (((!q >> 5) & 0b11) << 1) | (q & 1);
        } else {
            q2 = (q >> 5) & 0b11;
            c = q & 0b1_1111;
        }
        if c & 0b111 == 0b101 {
            q1 = 4;
            q0 = (c >> 3) & 0b11;
        } else {
            q1 = (c >> 3) & 0b11;
            q0 = c & 0b111;
        }
    }
    [q0, q1, q2]
}

/// Per quantization level: (bits per value scale, divisor class). The sequence
/// size is `ceil(scale * count / (2 * class + 1))`.
#[rustfmt::skip]
static ISE_SIZES: [(u32, u32); 21] = [
    (1, 0),  // QUANT_2
    (8, 2),  // QUANT_3
    (2, 0),  // QUANT_4
    (7, 1),  // QUANT_5
    (13, 2), // QUANT_6
    (3, 0),  // QUANT_8
    (10, 1), // QUANT_10
    (18, 2), // QUANT_12
    (4, 0),  // QUANT_16
    (13, 1), // QUANT_20
    (23, 2), // QUANT_24
    (5, 0),  // QUANT_32
    (16, 1), // QUANT_40
    (28, 2), // QUANT_48
    (6, 0),  // QUANT_64
    (19, 1), // QUANT_80
    (33, 2), // QUANT_96
    (7, 0),  // QUANT_128
    (22, 1), // QUANT_160
    (38, 2), // QUANT_192
    (8, 0),  // QUANT_256
];

// Indexed by t4*81 + t3*27 + t2*9 + t1*3 + t0
static TRIT_ENCODE_LUT: [u8; 243] = [
    0x00, 0x01, 0x02, 0x04, 0x05, 0x06, 0x08, 0x09, 0x0A, 0x10, 0x11, 0x12, 0x14, 0x15, 0x16, 0x18,
    0x19, 0x1A, 0x03, 0x07, 0x0F, 0x13, 0x17, 0x1B, 0x0C, 0x0D, 0x0E, 0x20, 0x21, 0x22, 0x24, 0x25,
    0x26, 0x28, 0x29, 0x2A, 0x30, 0x31, 0x32, 0x34, 0x35, 0x36, 0x38, 0x39, 0x3A, 0x23, 0x27, 0x2F,
    0x33, 0x37, 0x3B, 0x2C, 0x2D, 0x2E, 0x40, 0x41, 0x42, 0x44, 0x45, 0x46, 0x48, 0x49, 0x4A, 0x50,
    0x51, 0x52, 0x54, 0x55, 0x56, 0x58, 0x59, 0x5A, 0x43, 0x47, 0x4F, 0x53, 0x57, 0x5B, 0x4C, 0x4D,
    0x4E, 0x80, 0x81, 0x82, 0x84, 0x85, 0x86, 0x88, 0x89, 0x8A, 0x90, 0x91, 0x92, 0x94, 0x95, 0x96,
    0x98, 0x99, 0x9A, 0x83, 0x87, 0x8F, 0x93, 0x97, 0x9B, 0x8C, 0x8D, 0x8E, 0xA0, 0xA1, 0xA2, 0xA4,
    0xA5, 0xA6, 0xA8, 0xA9, 0xAA, 0xB0, 0xB1, 0xB2, 0xB4, 0xB5, 0xB6, 0xB8, 0xB9, 0xBA, 0xA3, 0xA7,
    0xAF, 0xB3, 0xB7, 0xBB, 0xAC, 0xAD, 0xAE, 0xC0, 0xC1, 0xC2, 0xC4, 0xC5, 0xC6, 0xC8, 0xC9, 0xCA,
    0xD0, 0xD1, 0xD2, 0xD4, 0xD5, 0xD6, 0xD8, 0xD9, 0xDA, 0xC3, 0xC7, 0xCF, 0xD3, 0xD7, 0xDB, 0xCC,
    0xCD, 0xCE, 0x60, 0x61, 0x62, 0x64, 0x65, 0x66, 0x68, 0x69, 0x6A, 0x70, 0x71, 0x72, 0x74, 0x75,
    0x76, 0x78, 0x79, 0x7A, 0x63, 0x67, 0x6F, 0x73, 0x77, 0x7B, 0x6C, 0x6D, 0x6E, 0xE0, 0xE1, 0xE2,
    0xE4, 0xE5, 0xE6, 0xE8, 0xE9, 0xEA, 0xF0, 0xF1, 0xF2, 0xF4, 0xF5, 0xF6, 0xF8, 0xF9, 0xFA, 0xE3,
    0xE7, 0xEF, 0xF3, 0xF7, 0xFB, 0xEC, 0xED, 0xEE, 0x1C, 0x1D, 0x1E, 0x3C, 0x3D, 0x3E, 0x5C, 0x5D,
    0x5E, 0x9C, 0x9D, 0x9E, 0xBC, 0xBD, 0xBE, 0xDC, 0xDD, 0xDE, 0x1F, 0x3F, 0x7F, 0x9F, 0xBF, 0xFF,
    0xFC, 0xFD, 0xFE,
];

// Indexed by q2*25 + q1*5 + q0
static QUINT_ENCODE_LUT: [u8; 125] = [
    0x00, 0x01, 0x02, 0x03, 0x04, 0x08, 0x09, 0x0A, 0x0B, 0x0C, 0x10, 0x11, 0x12, 0x13, 0x14, 0x18,
    0x19, 0x1A, 0x1B, 0x1C, 0x05, 0x0D, 0x15, 0x1D, 0x06, 0x20, 0x21, 0x22, 0x23, 0x24, 0x28, 0x29,
    0x2A, 0x2B, 0x2C, 0x30, 0x31, 0x32, 0x33, 0x34, 0x38, 0x39, 0x3A, 0x3B, 0x3C, 0x25, 0x2D, 0x35,
    0x3D, 0x0E, 0x40, 0x41, 0x42, 0x43, 0x44, 0x48, 0x49, 0x4A, 0x4B, 0x4C, 0x50, 0x51, 0x52, 0x53,
    0x54, 0x58, 0x59, 0x5A, 0x5B, 0x5C, 0x45, 0x4D, 0x55, 0x5D, 0x16, 0x60, 0x61, 0x62, 0x63, 0x64,
    0x68, 0x69, 0x6A, 0x6B, 0x6C, 0x70, 0x71, 0x72, 0x73, 0x74, 0x78, 0x79, 0x7A, 0x7B, 0x7C, 0x65,
    0x6D, 0x75, 0x7D, 0x1E, 0x66, 0x67, 0x46, 0x47, 0x26, 0x6E, 0x6F, 0x4E, 0x4F, 0x2E, 0x76, 0x77,
    0x56, 0x57, 0x36, 0x7E, 0x7F, 0x5E, 0x5F, 0x3E, 0x27, 0x2F, 0x37, 0x3F, 0x1F,
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_quint_block() {
        let mut out = [0u8; 4];
        let bits = encode_ise(QuantMethod::Quant5, &[0, 1, 2, 3, 4], &mut out, 0).unwrap();
        assert_eq!(bits, 12);
        assert_eq!(out, [0xC8, 0x0E, 0x00, 0x00]);
        assert_eq!(decode_ise(QuantMethod::Quant5, 5, &out, 0), [0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_bitcount_examples() {
        // 5 trits fit into 8 bits, 3 quints into 7 bits
        assert_eq!(ise_sequence_bitcount(5, QuantMethod::Quant3 as u32), 8);
        assert_eq!(ise_sequence_bitcount(3, QuantMethod::Quant5 as u32), 7);
        assert_eq!(ise_sequence_bitcount(16, QuantMethod::Quant4 as u32), 32);
        assert_eq!(ise_sequence_bitcount(64, QuantMethod::Quant2 as u32), 64);
        assert_eq!(ise_sequence_bitcount(0, QuantMethod::Quant256 as u32), 0);
    }

    #[test]
    fn test_bitcount_out_of_range_level() {
        assert_eq!(ise_sequence_bitcount(1, 21), ISE_BITCOUNT_OVERFLOW);
        assert_eq!(ise_sequence_bitcount(16, u32::MAX), ISE_BITCOUNT_OVERFLOW);
        assert_eq!(ise_sequence_bitcount(u32::MAX, QuantMethod::Quant256 as u32), ISE_BITCOUNT_OVERFLOW);
        assert_eq!(ise_sequence_bitcount(u32::MAX / 3, QuantMethod::Quant3 as u32), ISE_BITCOUNT_OVERFLOW);
    }

    #[test]
    fn test_round_trip_all_levels() {
        for quant in QuantMethod::ALL {
            let levels = quant.levels();
            for count in 1..=64usize {
                let values: Vec<u8> = (0..count)
                    .map(|i| ((i as u32 * 7 + count as u32 * 3) % levels) as u8)
                    .collect();
                let mut out = [0u8; 80];
                let written = encode_ise(quant, &values, &mut out, 3).unwrap();
                assert_eq!(written as u32, ise_sequence_bitcount(count as u32, quant as u32));
                assert_eq!(decode_ise(quant, count, &out, 3), values, "{:?} x{}", quant, count);
            }
        }
    }

    #[test]
    fn test_encode_stops_at_bitcount() {
        for quant in QuantMethod::ALL {
            let count = 7;
            let values = vec![(quant.levels() - 1) as u8; count];
            let mut out = [0u8; 16];
            let written = encode_ise(quant, &values, &mut out, 0).unwrap();
            let total: u32 = out.iter().map(|b| b.count_ones()).sum();
            let highest = out
                .iter()
                .enumerate()
                .rev()
                .find(|(_, b)| **b != 0)
                .map(|(i, b)| i * 8 + 8 - b.leading_zeros() as usize)
                .unwrap_or(0);
            assert!(total > 0);
            assert!(highest <= written, "{:?}: bit {} past {}", quant, highest, written);
        }
    }

    #[test]
    fn test_all_trit_and_quint_blocks_decode() {
        for id in 0..243 {
            let expected = [id % 3, id / 3 % 3, id / 9 % 3, id / 27 % 3, id / 81];
            let decoded = decode_trit_block(TRIT_ENCODE_LUT[id]);
            assert_eq!(decoded.map(usize::from), expected);
        }
        for id in 0..125 {
            let expected = [id % 5, id / 5 % 5, id / 25];
            let decoded = decode_quint_block(QUINT_ENCODE_LUT[id]);
            assert_eq!(decoded.map(usize::from), expected);
        }
    }

    #[test]
    fn test_value_out_of_range() {
        let mut out = [0u8; 4];
        let result = encode_ise(QuantMethod::Quant6, &[1, 6], &mut out, 0);
        assert!(matches!(result, Err(Error::InvariantViolated(_))));
        assert_eq!(out, [0; 4]);
    }
}
