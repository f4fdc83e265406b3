//! Per-partition colour averages, principal directions and line fit errors.

use crate::color::ColorF32;
use crate::config::ChannelWeights;
use crate::image_block::ImageBlock;
use crate::partition::PartitionInfo;
use crate::BLOCK_MAX_PARTITIONS;

const MIN_LINE_LENGTH: f32 = 1e-7;

/// Channels taking part in the fit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Channels {
    Rgb = 3,
    Rgba = 4,
}

impl Channels {
    pub(crate) fn count(self) -> usize {
        self as usize
    }

    pub(crate) fn dot(self, a: ColorF32, b: ColorF32) -> f32 {
        match self {
            Channels::Rgb => a.dot3(b),
            Channels::Rgba => a.dot(b),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct PartitionMetrics {
    pub avg: ColorF32,
    pub dir: ColorF32,
}

/// A line `amod + t * bs` where `amod` is the offset perpendicular to `bs`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct ProcessedLine {
    pub amod: ColorF32,
    pub bs: ColorF32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct LineErrors {
    pub uncor_error: f32,
    pub samec_error: f32,
    /// Extent of each partition's texels along the uncorrelated line.
    pub line_lengths: [f32; BLOCK_MAX_PARTITIONS],
}

fn partition_averages(pi: &PartitionInfo, blk: &ImageBlock) -> [ColorF32; BLOCK_MAX_PARTITIONS] {
    let mut sums = [ColorF32::ZERO; BLOCK_MAX_PARTITIONS];
    for (texel, &partition) in blk.texels.iter().zip(&pi.partition_of_texel) {
        sums[partition as usize] += *texel;
    }

    let mut averages = [ColorF32::ZERO; BLOCK_MAX_PARTITIONS];
    for p in 0..pi.partition_count as usize {
        let count = pi.partition_texel_count[p] as f32;
        averages[p] = ColorF32(sums[p].0.map(|c| c / count));
    }
    averages
}

/// Average colour and dominant direction of each partition.
///
/// The direction is the largest of the per-axis sums of the offsets that are
/// positive along that axis. Alpha is ignored entirely for [`Channels::Rgb`].
pub(crate) fn compute_avgs_and_dirs(
    pi: &PartitionInfo,
    blk: &ImageBlock,
    channels: Channels,
) -> [PartitionMetrics; BLOCK_MAX_PARTITIONS] {
    let averages = partition_averages(pi, blk);
    let mut metrics = [PartitionMetrics::default(); BLOCK_MAX_PARTITIONS];

    for p in 0..pi.partition_count as usize {
        let avg = averages[p];
        let mut sums = [ColorF32::ZERO; 4];

        for &texel in pi.texels(p) {
            let datum = blk.texels[texel as usize] - avg;
            for (axis, sum) in sums.iter_mut().enumerate().take(channels.count()) {
                if datum[axis] > 0.0 {
                    *sum += datum;
                }
            }
        }

        let mut best = sums[0];
        let mut best_sum = channels.dot(best, best);
        for &sum in &sums[1..channels.count()] {
            let prod = channels.dot(sum, sum);
            if prod > best_sum {
                best_sum = prod;
                best = sum;
            }
        }

        metrics[p] = PartitionMetrics {
            avg,
            dir: match channels {
                Channels::Rgb => best.without_alpha(),
                Channels::Rgba => best,
            },
        };
    }

    metrics
}

/// Squared distance of every texel to its partition's uncorrelated and
/// same-chrominance lines.
pub(crate) fn compute_error_squared(
    pi: &PartitionInfo,
    blk: &ImageBlock,
    uncor_lines: &[ProcessedLine],
    samec_lines: &[ProcessedLine],
    weights: &ChannelWeights,
    channels: Channels,
) -> LineErrors {
    let n = channels.count();
    let mut errors = LineErrors::default();

    for p in 0..pi.partition_count as usize {
        let uncor = uncor_lines[p];
        let samec = samec_lines[p];

        let mut lo = 1e10f32;
        let mut hi = -1e10f32;

        for &texel in pi.texels(p) {
            let px = blk.texels[texel as usize];

            let uncor_param = channels.dot(px, uncor.bs);
            lo = lo.min(uncor_param);
            hi = hi.max(uncor_param);

            let samec_param = channels.dot(px, samec.bs);

            for c in 0..n {
                let uncor_dist = (uncor.amod[c] - px[c]) + uncor_param * uncor.bs[c];
                errors.uncor_error += weights[c] * uncor_dist * uncor_dist;

                let samec_dist = samec_param * samec.bs[c] - px[c];
                errors.samec_error += weights[c] * samec_dist * samec_dist;
            }
        }

        errors.line_lengths[p] = (hi - lo).max(MIN_LINE_LENGTH);
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_descriptor::BlockSizeDescriptor;
    use crate::partition::PartitionTables;

    fn two_color_block() -> (PartitionTables, ImageBlock) {
        let bsd = BlockSizeDescriptor::new(4, 4).unwrap();
        let tables = PartitionTables::new(&bsd);
        let pi = &tables.partitionings(2).unwrap()[0];
        let texels = pi
            .partition_of_texel
            .iter()
            .map(|&p| {
                if p == 0 {
                    ColorF32::new(1000.0, 2000.0, 3000.0, 65536.0)
                } else {
                    ColorF32::new(40000.0, 30000.0, 20000.0, 65536.0)
                }
            })
            .collect();
        (tables, ImageBlock::new(0, 0, texels))
    }

    #[test]
    fn test_averages_of_flat_partitions() {
        let (tables, blk) = two_color_block();
        let pi = &tables.partitionings(2).unwrap()[0];
        let metrics = compute_avgs_and_dirs(pi, &blk, Channels::Rgba);
        assert_eq!(metrics[0].avg, ColorF32::new(1000.0, 2000.0, 3000.0, 65536.0));
        assert_eq!(metrics[1].avg, ColorF32::new(40000.0, 30000.0, 20000.0, 65536.0));
        assert_eq!(metrics[0].dir, ColorF32::ZERO);
    }

    #[test]
    fn test_direction_follows_gradient() {
        let texels = (0..16)
            .map(|i| ColorF32::new(i as f32 * 100.0, i as f32 * 50.0, 0.0, 7.0))
            .collect();
        let blk = ImageBlock::new(0, 0, texels);
        let bsd = BlockSizeDescriptor::new(4, 4).unwrap();
        let tables = PartitionTables::new(&bsd);
        let pi = &tables.partitionings(1).unwrap()[0];

        let metrics = compute_avgs_and_dirs(pi, &blk, Channels::Rgb);
        let dir = metrics[0].dir.normalized();
        assert!((dir[0] - 2.0 / 5f32.sqrt()).abs() < 1e-5);
        assert!((dir[1] - 1.0 / 5f32.sqrt()).abs() < 1e-5);
        assert_eq!(dir[3], 0.0);

        // Texels lie on the line through the average
        let line = ProcessedLine {
            amod: metrics[0].avg.without_alpha() - dir * metrics[0].avg.dot3(dir),
            bs: dir,
        };
        let errors = compute_error_squared(pi, &blk, &[line], &[line], &[1.0; 4], Channels::Rgb);
        assert!(errors.uncor_error < 1.0);
        assert!((errors.line_lengths[0] - 750.0 * 5f32.sqrt()).abs() < 0.5);
    }

    #[test]
    fn test_degenerate_line_length() {
        let (tables, blk) = two_color_block();
        let pi = &tables.partitionings(2).unwrap()[0];
        let line = ProcessedLine::default();
        let errors = compute_error_squared(pi, &blk, &[line; 2], &[line; 2], &[1.0; 4], Channels::Rgba);
        assert_eq!(errors.line_lengths[0], MIN_LINE_LENGTH);
        assert_eq!(errors.line_lengths[1], MIN_LINE_LENGTH);
        assert!(errors.samec_error > 0.0);
    }
}
