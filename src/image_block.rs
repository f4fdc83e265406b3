use crate::color::ColorF32;
use crate::{Error, Result};

/// Texels of one block footprint of the source image.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBlock {
    /// Block column in the image.
    pub xpos: u32,
    /// Block row in the image.
    pub ypos: u32,
    /// Row-major texels.
    pub texels: Vec<ColorF32>,
    pub data_min: ColorF32,
    pub data_max: ColorF32,
    /// R, G and B are equal in every texel.
    pub grayscale: bool,
    /// Alpha is the same in every texel.
    pub constant_alpha: bool,
}

impl ImageBlock {
    pub fn new(xpos: u32, ypos: u32, texels: Vec<ColorF32>) -> Self {
        let mut data_min = ColorF32([f32::MAX; 4]);
        let mut data_max = ColorF32([f32::MIN; 4]);
        for texel in &texels {
            for c in 0..4 {
                data_min[c] = data_min[c].min(texel[c]);
                data_max[c] = data_max[c].max(texel[c]);
            }
        }

        let grayscale = texels.iter().all(|t| t[0] == t[1] && t[0] == t[2]);
        let constant_alpha = data_min[3] == data_max[3];

        ImageBlock {
            xpos,
            ypos,
            texels,
            data_min,
            data_max,
            grayscale,
            constant_alpha,
        }
    }

    pub fn texel_count(&self) -> usize {
        self.texels.len()
    }

    pub fn uses_alpha(&self) -> bool {
        !self.constant_alpha
    }
}

/// Splits a tightly packed RGBA8 image into blocks, row by row. Blocks that
/// extend past the right or bottom edge repeat the last column or row.
pub fn split_image_into_blocks(
    rgba: &[u8],
    width: u32,
    height: u32,
    block_width: u32,
    block_height: u32,
) -> Result<Vec<ImageBlock>> {
    if block_width == 0 || block_height == 0 {
        return Err(Error::UnsupportedBlockSize {
            x: block_width,
            y: block_height,
        });
    }

    let expected = width as usize * height as usize * 4;
    if rgba.len() != expected {
        return Err(Error::ImageSizeMismatch {
            expected,
            actual: rgba.len(),
        });
    }
    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }

    let blocks_x = (width + block_width - 1) / block_width;
    let blocks_y = (height + block_height - 1) / block_height;

    let mut blocks = Vec::with_capacity((blocks_x * blocks_y) as usize);
    for by in 0..blocks_y {
        for bx in 0..blocks_x {
            let mut texels = Vec::with_capacity((block_width * block_height) as usize);
            for dy in 0..block_height {
                let y = (by * block_height + dy).min(height - 1);
                for dx in 0..block_width {
                    let x = (bx * block_width + dx).min(width - 1);
                    let offset = (y as usize * width as usize + x as usize) * 4;
                    let mut rgba_texel = [0u8; 4];
                    rgba_texel.copy_from_slice(&rgba[offset..offset + 4]);
                    texels.push(ColorF32::from_unorm8(rgba_texel));
                }
            }
            blocks.push(ImageBlock::new(bx, by, texels));
        }
    }

    Ok(blocks)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> Vec<u8> {
        (0..width * height)
            .flat_map(|i| [i as u8, i as u8, (i * 2) as u8, 255])
            .collect()
    }

    #[test]
    fn test_split_with_edge_clamping() {
        let rgba = gradient(5, 3);
        let blocks = split_image_into_blocks(&rgba, 5, 3, 4, 4).unwrap();
        assert_eq!(blocks.len(), 2);

        let right = &blocks[1];
        assert_eq!((right.xpos, right.ypos), (1, 0));
        assert_eq!(right.texel_count(), 16);
        // Column 4 repeated across the block
        assert_eq!(right.texels[0], right.texels[3]);
        assert_eq!(right.texels[0], ColorF32::from_unorm8([4, 4, 8, 255]));
        // Row 2 repeated below the image
        assert_eq!(right.texels[15], ColorF32::from_unorm8([14, 14, 28, 255]));
        assert_eq!(right.texels[11], right.texels[15]);
    }

    #[test]
    fn test_block_statistics() {
        let rgba = gradient(4, 4);
        let block = &split_image_into_blocks(&rgba, 4, 4, 4, 4).unwrap()[0];
        assert!(block.constant_alpha);
        assert!(!block.uses_alpha());
        assert!(!block.grayscale);
        assert_eq!(block.data_min, ColorF32::from_unorm8([0, 0, 0, 255]));
        assert_eq!(block.data_max, ColorF32::from_unorm8([15, 15, 30, 255]));

        let gray = ImageBlock::new(0, 0, vec![ColorF32::new(1.0, 1.0, 1.0, 0.0), ColorF32::new(2.0, 2.0, 2.0, 5.0)]);
        assert!(gray.grayscale);
        assert!(gray.uses_alpha());
    }

    #[test]
    fn test_size_mismatch() {
        assert!(matches!(
            split_image_into_blocks(&[0; 15], 2, 2, 4, 4),
            Err(Error::ImageSizeMismatch {
                expected: 16,
                actual: 15
            })
        ));
        assert!(split_image_into_blocks(&[], 0, 0, 4, 4).unwrap().is_empty());
    }
}
