//! The `.astc` file container: a 16-byte header followed by the physical blocks.

use std::io::Write;

use byteorder::{ByteOrder, LE};

use crate::{Error, Result, ASTC_BLOCK_SIZE};

pub const MAGIC: u32 = 0x5CA1_AB13;

const MAX_DIMENSION: u32 = (1 << 24) - 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AstcHeader {
    pub block_x: u8,
    pub block_y: u8,
    pub block_z: u8,
    /// Image size in texels, 24 bits each.
    pub dim_x: u32,
    pub dim_y: u32,
    pub dim_z: u32,
}

impl AstcHeader {
    pub const FILE_SIZE: usize = 16;

    /// Header of a 2D image.
    pub fn new_2d(block_x: u8, block_y: u8, width: u32, height: u32) -> Self {
        AstcHeader {
            block_x,
            block_y,
            block_z: 1,
            dim_x: width,
            dim_y: height,
            dim_z: 1,
        }
    }

    /// Number of blocks along each axis.
    pub fn block_counts(&self) -> [u32; 3] {
        let count = |dim: u32, block: u8| dim.div_ceil((block as u32).max(1));
        [
            count(self.dim_x, self.block_x),
            count(self.dim_y, self.block_y),
            count(self.dim_z, self.block_z),
        ]
    }

    pub fn to_bytes(&self) -> Result<[u8; Self::FILE_SIZE]> {
        if [self.dim_x, self.dim_y, self.dim_z].iter().any(|&d| d > MAX_DIMENSION) {
            return Err(Error::InvalidContainer("image dimension does not fit in 24 bits"));
        }

        let mut buf = [0u8; Self::FILE_SIZE];
        LE::write_u32(&mut buf[0..], MAGIC);
        buf[4] = self.block_x;
        buf[5] = self.block_y;
        buf[6] = self.block_z;
        LE::write_u24(&mut buf[7..], self.dim_x);
        LE::write_u24(&mut buf[10..], self.dim_y);
        LE::write_u24(&mut buf[13..], self.dim_z);
        Ok(buf)
    }

    pub fn from_bytes(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::FILE_SIZE {
            return Err(Error::InvalidContainer("header is shorter than 16 bytes"));
        }
        if LE::read_u32(&buf[0..]) != MAGIC {
            return Err(Error::InvalidContainer("bad magic"));
        }
        Ok(Self {
            block_x: buf[4],
            block_y: buf[5],
            block_z: buf[6],
            dim_x: LE::read_u24(&buf[7..]),
            dim_y: LE::read_u24(&buf[10..]),
            dim_z: LE::read_u24(&buf[13..]),
        })
    }
}

/// Writes the header followed by the packed blocks. Returns the number of
/// bytes written.
pub fn write_astc_file<W: Write>(writer: &mut W, header: &AstcHeader, blocks: &[u8]) -> Result<usize> {
    let [x, y, z] = header.block_counts();
    let expected = x as usize * y as usize * z as usize * ASTC_BLOCK_SIZE;
    if blocks.len() != expected {
        return Err(Error::ImageSizeMismatch {
            expected,
            actual: blocks.len(),
        });
    }

    writer.write_all(&header.to_bytes()?)?;
    writer.write_all(blocks)?;
    writer.flush()?;
    Ok(AstcHeader::FILE_SIZE + blocks.len())
}

/// Splits a container into its header and block data.
pub fn read_astc_file(bytes: &[u8]) -> Result<(AstcHeader, &[u8])> {
    let header = AstcHeader::from_bytes(bytes)?;
    let [x, y, z] = header.block_counts();
    let size = x as usize * y as usize * z as usize * ASTC_BLOCK_SIZE;
    let data = bytes
        .get(AstcHeader::FILE_SIZE..AstcHeader::FILE_SIZE + size)
        .ok_or(Error::InvalidContainer("block data is truncated"))?;
    Ok((header, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_layout() {
        let header = AstcHeader::new_2d(6, 5, 0x01_0203, 37);
        let bytes = header.to_bytes().unwrap();
        assert_eq!(
            bytes,
            [0x13, 0xAB, 0xA1, 0x5C, 6, 5, 1, 0x03, 0x02, 0x01, 37, 0, 0, 1, 0, 0]
        );
        assert_eq!(AstcHeader::from_bytes(&bytes).unwrap(), header);
        assert_eq!(header.block_counts(), [11009, 8, 1]);
    }

    #[test]
    fn test_invalid_headers() {
        let mut bytes = AstcHeader::new_2d(4, 4, 4, 4).to_bytes().unwrap();
        assert!(matches!(AstcHeader::from_bytes(&bytes[..15]), Err(Error::InvalidContainer(_))));
        bytes[0] = 0;
        assert!(matches!(AstcHeader::from_bytes(&bytes), Err(Error::InvalidContainer(_))));
        assert!(AstcHeader::new_2d(4, 4, 1 << 24, 4).to_bytes().is_err());
    }

    #[test]
    fn test_write_and_read_file() {
        let header = AstcHeader::new_2d(4, 4, 5, 4);
        let blocks: Vec<u8> = (0..32).collect();

        let mut out = Vec::new();
        assert_eq!(write_astc_file(&mut out, &header, &blocks).unwrap(), 48);
        assert_eq!(out.len(), 48);

        let (read_header, data) = read_astc_file(&out).unwrap();
        assert_eq!(read_header, header);
        assert_eq!(data, &blocks[..]);

        assert!(read_astc_file(&out[..40]).is_err());
        assert!(write_astc_file(&mut out, &header, &blocks[..16]).is_err());
    }
}
