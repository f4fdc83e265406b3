use crate::mask;

/// Sink for LSB-first bit fields, implemented by both block writers so the
/// integer sequence encoder can target either end of a block.
pub(crate) trait BitWrite {
    fn write_u32(&mut self, count: usize, v: u32);

    fn write_u8(&mut self, count: usize, v: u8) {
        assert!(count <= 8);
        self.write_u32(count, v as u32)
    }
}

/// Writes `count` bits of `v` at `bit_pos`, replacing whatever was stored there.
/// Bits that fall outside of `bytes` are dropped.
fn write_bits_at(bytes: &mut [u8], bit_pos: usize, count: usize, v: u32) {
    if count == 0 {
        return;
    }

    let bit = bit_pos % 8;
    let value = ((v & mask!(count as u32)) as u64) << bit;
    let keep = !(mask!(count as u64) << bit);

    let first = bit_pos / 8;
    let byte_count = (bit + count + 7) / 8;

    for i in 0..byte_count {
        if let Some(byte_val) = bytes.get_mut(first + i) {
            let shift = 8 * i as u32;
            *byte_val = (*byte_val & (keep >> shift) as u8) | (value >> shift) as u8;
        }
    }
}

pub struct BitWriterLsb<'a> {
    bytes: &'a mut [u8],
    bit_pos: usize,
}

impl<'a> BitWriterLsb<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        Self::at(bytes, 0)
    }

    pub fn at(bytes: &'a mut [u8], bit_pos: usize) -> Self {
        Self { bytes, bit_pos }
    }

    pub fn write_u16(&mut self, count: usize, v: u16) {
        assert!(count <= 16);
        self.write_u32(count, v as u32)
    }
}

impl BitWrite for BitWriterLsb<'_> {
    fn write_u32(&mut self, count: usize, v: u32) {
        assert!(count <= 32);
        write_bits_at(self.bytes, self.bit_pos, count, v);
        self.bit_pos += count;
    }
}

/// LSB bit writer which fill the output from the last bit of the last byte.
/// The output is the same as from the normal LSB bit writer, but the bits in
/// the whole output buffer are reversed.
pub struct BitWriterLsbReversed<'a> {
    bytes: &'a mut [u8],
    bit_pos: usize,
}

impl<'a> BitWriterLsbReversed<'a> {
    pub fn new(bytes: &'a mut [u8]) -> Self {
        let bit_pos = bytes.len() * 8;
        Self { bytes, bit_pos }
    }
}

impl BitWrite for BitWriterLsbReversed<'_> {
    fn write_u32(&mut self, count: usize, v: u32) {
        assert!(count <= 32);
        if count == 0 {
            return;
        }

        let v = (v & mask!(count as u32))
            .reverse_bits()
            .wrapping_shr(32 - count as u32);

        self.bit_pos = self.bit_pos.wrapping_sub(count);
        write_bits_at(self.bytes, self.bit_pos, count, v);
    }
}
