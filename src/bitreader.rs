pub struct BitReaderLsb<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> BitReaderLsb<'a> {
    pub fn at(bytes: &'a [u8], pos: usize) -> Self {
        Self { bytes, pos }
    }

    pub fn read_u8(&mut self, count: usize) -> u8 {
        assert!(count <= 8);
        self.read(count) as u8
    }

    pub fn read(&mut self, count: usize) -> u32 {
        assert!(count <= 32);
        if count == 0 {
            return 0;
        }

        let mut byte = self.pos / 8;
        let bit = self.pos % 8;
        let mut result: u64 = 0;
        let mut read = 0;

        while read < bit + count {
            let byte_val = self.bytes.get(byte).copied().unwrap_or(0);
            result |= (byte_val as u64) << read;
            read += 8;
            byte += 1;
        }

        self.pos += count;
        ((result >> bit) & crate::mask!(count as u64)) as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_unaligned_fields() {
        let bytes = [0b1010_1100, 0b0101_0011, 0xFF];
        let mut reader = BitReaderLsb::at(&bytes, 2);
        assert_eq!(reader.read(3), 0b011);
        assert_eq!(reader.read(5), 0b11101);
        assert_eq!(reader.read_u8(8), 0b1101_0100);
        // Reads past the end yield zeros
        assert_eq!(reader.read(12), 0b11_1111);
    }
}
