//! Ranks partitionings for a block: k-means clustering orders the partition
//! table by bit mismatch, then the closest partitionings are scored with two
//! line-fit error models.

use log::trace;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

use crate::averages::{compute_avgs_and_dirs, compute_error_squared, Channels, ProcessedLine};
use crate::color::ColorF32;
use crate::config::{ChannelWeights, EncoderConfig};
use crate::image_block::ImageBlock;
use crate::partition::PartitionTables;
use crate::{Error, Result, BLOCK_MAX_PARTITIONINGS, BLOCK_MAX_PARTITIONS};

const KMEANS_ITERATIONS: usize = 3;

// 145897 from random.org
const KMEANS_FIRST_SAMPLE: usize = 145_897;

// Weighted-random center selection, also from random.org. Each partition
// count uses its own run of three cutoffs.
const CLUSTER_CUTOFFS: [f32; 9] = [
    0.626220, 0.932770, 0.275454, //
    0.318558, 0.240113, 0.009190, //
    0.347661, 0.731960, 0.156391,
];

const ERROR_CALC_DEFAULT: f32 = 1e30;

/// Picks the initial cluster centers: a fixed texel first, then texels drawn
/// with probability proportional to their distance from the nearest center.
fn kmeans_init(texels: &[ColorF32], partition_count: usize, weights: &ChannelWeights) -> Vec<ColorF32> {
    let texel_count = texels.len();
    let mut centers = Vec::with_capacity(partition_count);

    let mut center = texels[KMEANS_FIRST_SAMPLE % texel_count];
    centers.push(center);

    let mut distances: Vec<f32> = texels.iter().map(|t| t.weighted_distance(center, weights)).collect();
    let mut distance_sum: f32 = distances.iter().sum();

    let mut cutoff_index = 3 * (partition_count - 2);
    loop {
        let distance_cutoff = distance_sum * CLUSTER_CUTOFFS[cutoff_index];
        cutoff_index += 1;

        let mut summa = 0.0;
        let mut sample = 0;
        while sample < texel_count {
            summa += distances[sample];
            if summa >= distance_cutoff {
                break;
            }
            sample += 1;
        }

        center = texels[sample.min(texel_count - 1)];
        centers.push(center);
        if centers.len() >= partition_count {
            break;
        }

        distance_sum = 0.0;
        for (distance, texel) in distances.iter_mut().zip(texels) {
            *distance = distance.min(texel.weighted_distance(center, weights));
            distance_sum += *distance;
        }
    }

    centers
}

/// Assigns every texel to its nearest center, then moves texel `i` into
/// cluster `i` for every cluster left empty.
fn kmeans_assign(texels: &[ColorF32], centers: &[ColorF32], weights: &ChannelWeights, partition_of_texel: &mut [u8]) {
    let mut counts = [0u32; BLOCK_MAX_PARTITIONS];

    for (texel, partition) in texels.iter().zip(partition_of_texel.iter_mut()) {
        let mut best_distance = f32::MAX;
        let mut best = 0;
        for (j, center) in centers.iter().enumerate() {
            let distance = texel.weighted_distance(*center, weights);
            if distance < best_distance {
                best_distance = distance;
                best = j;
            }
        }
        *partition = best as u8;
        counts[best] += 1;
    }

    loop {
        let mut repaired = false;
        for i in 0..centers.len() {
            if counts[i] == 0 {
                repaired = true;
                counts[partition_of_texel[i] as usize] -= 1;
                counts[i] += 1;
                partition_of_texel[i] = i as u8;
            }
        }
        if !repaired {
            break;
        }
    }
}

fn kmeans_update(texels: &[ColorF32], partition_count: usize, partition_of_texel: &[u8]) -> Vec<ColorF32> {
    let mut sums = vec![ColorF32::ZERO; partition_count];
    let mut counts = vec![0u32; partition_count];
    for (texel, &partition) in texels.iter().zip(partition_of_texel) {
        sums[partition as usize] += *texel;
        counts[partition as usize] += 1;
    }

    sums.iter()
        .zip(&counts)
        .map(|(&sum, &count)| {
            if count == 0 {
                ColorF32::ZERO
            } else {
                sum * (1.0 / count as f32)
            }
        })
        .collect()
}

/// Clusters the block's texels into `partition_count` groups with three
/// rounds of k-means. Every cluster ends up with at least one texel.
pub fn kmeans_partition(block: &ImageBlock, partition_count: u32, weights: &ChannelWeights) -> Result<Vec<u8>> {
    if !(2..=BLOCK_MAX_PARTITIONS as u32).contains(&partition_count) {
        return Err(Error::UnsupportedPartitionCount(partition_count));
    }
    let partition_count = partition_count as usize;
    if block.texel_count() < partition_count {
        return Err(Error::invariant(format!(
            "{} texels cannot form {} partitions",
            block.texel_count(),
            partition_count
        )));
    }

    let mut partition_of_texel = vec![0u8; block.texel_count()];
    let centers = kmeans_init(&block.texels, partition_count, weights);
    kmeans_assign(&block.texels, &centers, weights, &mut partition_of_texel);

    for _ in 1..KMEANS_ITERATIONS {
        let centers = kmeans_update(&block.texels, partition_count, &partition_of_texel);
        kmeans_assign(&block.texels, &centers, weights, &mut partition_of_texel);
    }

    Ok(partition_of_texel)
}

/// Number of texels assigned differently by two partitionings, under the
/// best matching of partition labels. Each argument holds one coverage
/// bitmap per partition.
pub fn partition_mismatch(a: &[u64], b: &[u64]) -> u32 {
    let n = a.len().min(b.len());
    let mut cost = [[0u32; BLOCK_MAX_PARTITIONS]; BLOCK_MAX_PARTITIONS];
    for i in 0..n {
        for j in 0..n {
            cost[i][j] = (a[i] ^ b[j]).count_ones();
        }
    }

    // A misplaced texel is counted in both partitions it differs in
    min_assignment(&cost, n, 0, 0) / 2
}

fn min_assignment(cost: &[[u32; BLOCK_MAX_PARTITIONS]; BLOCK_MAX_PARTITIONS], n: usize, row: usize, used: u32) -> u32 {
    if row == n {
        return 0;
    }
    (0..n)
        .filter(|&col| used & (1 << col) == 0)
        .map(|col| cost[row][col] + min_assignment(cost, n, row + 1, used | (1 << col)))
        .min()
        .unwrap_or(0)
}

/// Stable counting sort of table positions by mismatch count.
pub fn partition_ordering_by_mismatch(mismatch_counts: &[u32]) -> Vec<u16> {
    let buckets = mismatch_counts.iter().max().map_or(0, |&max| max as usize + 1);
    let mut histogram = vec![0usize; buckets];
    for &count in mismatch_counts {
        histogram[count as usize] += 1;
    }

    let mut sum = 0;
    for bucket in histogram.iter_mut() {
        let count = *bucket;
        *bucket = sum;
        sum += count;
    }

    let mut ordering = vec![0u16; mismatch_counts.len()];
    for (i, &count) in mismatch_counts.iter().enumerate() {
        let slot = &mut histogram[count as usize];
        ordering[*slot] = i as u16;
        *slot += 1;
    }
    ordering
}

/// Table positions of the `partition_count` partitionings, closest to the
/// block's k-means clustering first.
pub fn kmeans_partition_ordering(
    tables: &PartitionTables,
    block: &ImageBlock,
    partition_count: u32,
    weights: &ChannelWeights,
) -> Result<Vec<u16>> {
    let partition_of_texel = kmeans_partition(block, partition_count, weights)?;

    let mut bitmaps = [0u64; BLOCK_MAX_PARTITIONS];
    for (i, &texel) in tables.kmeans_texels().iter().enumerate() {
        bitmaps[partition_of_texel[texel as usize] as usize] |= 1 << i;
    }

    let n = partition_count as usize;
    let mismatch_counts: Vec<u32> = tables
        .partitionings(partition_count)?
        .iter()
        .map(|pi| partition_mismatch(&bitmaps[..n], &pi.coverage_bitmaps[..n]))
        .collect();

    Ok(partition_ordering_by_mismatch(&mismatch_counts))
}

/// Sorted list of the best `N` results, worst last.
struct BestResults {
    errors: Vec<f32>,
    partitions: Vec<Option<usize>>,
}

impl BestResults {
    fn new(len: usize) -> Self {
        BestResults {
            errors: vec![ERROR_CALC_DEFAULT; len],
            partitions: vec![None; len],
        }
    }

    fn insert(&mut self, error: f32, partition: usize) {
        let Some(&worst) = self.errors.last() else {
            return;
        };
        if error >= worst {
            return;
        }
        if let Some(i) = self.errors.iter().position(|&e| error <= e) {
            self.errors.pop();
            self.partitions.pop();
            self.errors.insert(i, error);
            self.partitions.insert(i, Some(partition));
        }
    }
}

fn weight_imprecision_estimate(texel_count: usize) -> f32 {
    let estimate: f32 = match texel_count {
        0..=20 => 0.03,
        21..=31 => 0.04,
        32..=41 => 0.05,
        _ => 0.055,
    };
    estimate * estimate
}

/// Seeds of the partitionings most likely to encode `block` well, at most
/// [`EncoderConfig::partition_candidates`] of them.
///
/// The `partition_search_limit` partitionings closest to the k-means
/// clustering are scored against an uncorrelated-chrominance line model and
/// a same-chrominance line model. The best of each model are interleaved.
pub fn find_best_partition_candidates(
    tables: &PartitionTables,
    block: &ImageBlock,
    partition_count: u32,
    config: &EncoderConfig,
) -> Result<Vec<u32>> {
    if block.texel_count() != tables.texel_count() {
        return Err(Error::invariant(format!(
            "block has {} texels, partition tables are for {}",
            block.texel_count(),
            tables.texel_count()
        )));
    }

    let weights = &config.channel_weights;
    let imprecision = weight_imprecision_estimate(tables.texel_count());

    let sequence = kmeans_partition_ordering(tables, block, partition_count, weights)?;
    let partitionings = tables.partitionings(partition_count)?;
    let search_limit = (config.partition_search_limit as usize).min(sequence.len());
    let requested = config.candidate_limit().min(search_limit);

    let channels = if block.uses_alpha() { Channels::Rgba } else { Channels::Rgb };
    let n = partition_count as usize;

    let mut uncor_best = BestResults::new(requested);
    let mut samec_best = BestResults::new(requested);

    for &packed in &sequence[..search_limit] {
        let pi = &partitionings[packed as usize];
        let metrics = compute_avgs_and_dirs(pi, block, channels);

        let mut uncor_lines = [ProcessedLine::default(); BLOCK_MAX_PARTITIONS];
        let mut samec_lines = [ProcessedLine::default(); BLOCK_MAX_PARTITIONS];
        for p in 0..n {
            let (avg, dir) = match channels {
                Channels::Rgba => (metrics[p].avg, metrics[p].dir),
                Channels::Rgb => (metrics[p].avg.without_alpha(), metrics[p].dir.without_alpha()),
            };
            let uncor_b = dir.normalized();
            let samec_b = avg.normalized();

            uncor_lines[p] = ProcessedLine {
                amod: metrics[p].avg - uncor_b * channels.dot(metrics[p].avg, uncor_b),
                bs: uncor_b,
            };
            samec_lines[p] = ProcessedLine {
                amod: ColorF32::ZERO,
                bs: samec_b,
            };
        }

        let mut errors = compute_error_squared(pi, block, &uncor_lines[..n], &samec_lines[..n], weights, channels);

        // Weight quantization error: the full line scaled by the imprecision
        // estimate, squared, for every texel of the partition
        for p in 0..n {
            let error_weight = pi.partition_texel_count[p] as f32 * imprecision;
            let uncor_vector = uncor_lines[p].bs * errors.line_lengths[p];
            let samec_vector = samec_lines[p].bs * errors.line_lengths[p];
            errors.uncor_error += channels.dot(uncor_vector, uncor_vector) * error_weight;
            errors.samec_error += channels.dot(samec_vector, samec_vector) * error_weight;
        }

        uncor_best.insert(errors.uncor_error, packed as usize);
        samec_best.insert(errors.samec_error, packed as usize);
    }

    let interleaved = uncor_best
        .partitions
        .iter()
        .zip(&samec_best.partitions)
        .flat_map(|(&uncor, &samec)| [uncor, samec])
        .flatten()
        .map(|packed| partitionings[packed].partition_index);

    let mut emitted = [false; BLOCK_MAX_PARTITIONINGS];
    let mut candidates = Vec::with_capacity(requested);
    for partition_index in interleaved {
        if candidates.len() == requested {
            break;
        }
        if !std::mem::replace(&mut emitted[partition_index as usize], true) {
            candidates.push(partition_index);
        }
    }

    trace!(
        "Block ({}, {}): {} partition candidates {:?} from {} of {} partitionings",
        block.xpos,
        block.ypos,
        partition_count,
        candidates,
        search_limit,
        partitionings.len()
    );

    Ok(candidates)
}

/// One partitioning to try for one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartitionCandidate {
    pub block_index: usize,
    pub partition_count: u32,
    pub partition_index: u32,
}

/// Partition candidates of a run of blocks, grouped by block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockPartitionings {
    /// Index of each block's first candidate. Blocks without candidates
    /// share the offset of the next block.
    pub offsets: Vec<usize>,
    pub candidates: Vec<PartitionCandidate>,
}

impl BlockPartitionings {
    /// Candidates of block `block_index`.
    pub fn block_candidates(&self, block_index: usize) -> &[PartitionCandidate] {
        let start = self.offsets[block_index];
        let end = self.offsets.get(block_index + 1).copied().unwrap_or(self.candidates.len());
        &self.candidates[start..end]
    }
}

/// Runs the candidate search over every block. A single partition yields one
/// candidate per block.
pub fn generate_block_partitionings(
    tables: &PartitionTables,
    blocks: &[ImageBlock],
    partition_count: u32,
    config: &EncoderConfig,
) -> Result<BlockPartitionings> {
    let search = |block: &ImageBlock| -> Result<Vec<u32>> {
        if partition_count == 1 {
            Ok(vec![0])
        } else {
            find_best_partition_candidates(tables, block, partition_count, config)
        }
    };

    #[cfg(feature = "rayon")]
    let per_block = blocks.par_iter().map(search).collect::<Result<Vec<_>>>()?;
    #[cfg(not(feature = "rayon"))]
    let per_block = blocks.iter().map(search).collect::<Result<Vec<_>>>()?;

    let mut result = BlockPartitionings::default();
    for (block_index, seeds) in per_block.into_iter().enumerate() {
        result.offsets.push(result.candidates.len());
        result.candidates.extend(seeds.into_iter().map(|partition_index| PartitionCandidate {
            block_index,
            partition_count,
            partition_index,
        }));
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block_descriptor::BlockSizeDescriptor;
    use crate::config::CHANNEL_WEIGHTS_UNIFORM;
    use rstest::rstest;

    fn tables(x: u32, y: u32) -> PartitionTables {
        PartitionTables::new(&BlockSizeDescriptor::new(x, y).unwrap())
    }

    fn block_from_partitioning(partition_of_texel: &[u8], colors: &[ColorF32]) -> ImageBlock {
        let texels = partition_of_texel.iter().map(|&p| colors[p as usize]).collect();
        ImageBlock::new(0, 0, texels)
    }

    const COLORS: [ColorF32; 4] = [
        ColorF32::new(60000.0, 1000.0, 1000.0, 65536.0),
        ColorF32::new(1000.0, 60000.0, 1000.0, 65536.0),
        ColorF32::new(1000.0, 1000.0, 60000.0, 65536.0),
        ColorF32::new(30000.0, 30000.0, 30000.0, 65536.0),
    ];

    #[test]
    fn test_mismatch_symmetry() {
        let a = [0b1100_1010u64, 0b0011_0101];
        let b = [0b1111_0000u64, 0b0000_1111];
        assert_eq!(partition_mismatch(&a, &a), 0);
        assert_eq!(partition_mismatch(&a, &b), partition_mismatch(&b, &a));
        assert_eq!(partition_mismatch(&a, &b), 4);
        // Label swap does not count
        assert_eq!(partition_mismatch(&a, &[a[1], a[0]]), 0);

        let c = [0b0011u64, 0b1100, 0b11_0000, 0b1100_0000];
        let d = [0b1100_0000u64, 0b0011, 0b1100, 0b01_0000 | 0b10_0000];
        assert_eq!(partition_mismatch(&c, &d), 0);
        let e = [0b0111u64, 0b1000, 0b11_0000, 0b1100_0000];
        assert_eq!(partition_mismatch(&c, &e), 1);
        assert_eq!(partition_mismatch(&e, &c), 1);
    }

    #[test]
    fn test_ordering_is_stable_counting_sort() {
        let ordering = partition_ordering_by_mismatch(&[3, 0, 2, 0, 3, 1]);
        assert_eq!(ordering, [1, 3, 5, 2, 0, 4]);
        assert!(partition_ordering_by_mismatch(&[]).is_empty());
    }

    #[rstest]
    #[case(2)]
    #[case(3)]
    #[case(4)]
    fn test_kmeans_never_leaves_a_cluster_empty(#[case] partition_count: u32) {
        // Flat blocks put every texel in the first cluster before repair
        let flat = ImageBlock::new(0, 0, vec![ColorF32::new(5.0, 5.0, 5.0, 5.0); 16]);
        let gradient = ImageBlock::new(
            0,
            0,
            (0..36).map(|i| ColorF32::new(i as f32 * 1000.0, 0.0, 0.0, 65536.0)).collect(),
        );
        for block in [flat, gradient] {
            let assignment = kmeans_partition(&block, partition_count, &CHANNEL_WEIGHTS_UNIFORM).unwrap();
            for p in 0..partition_count as u8 {
                assert!(assignment.contains(&p));
            }
        }
    }

    #[test]
    fn test_kmeans_rejects_partition_counts() {
        let block = ImageBlock::new(0, 0, vec![ColorF32::ZERO; 16]);
        assert!(matches!(
            kmeans_partition(&block, 1, &CHANNEL_WEIGHTS_UNIFORM),
            Err(Error::UnsupportedPartitionCount(1))
        ));
        assert!(matches!(
            kmeans_partition(&block, 5, &CHANNEL_WEIGHTS_UNIFORM),
            Err(Error::UnsupportedPartitionCount(5))
        ));
    }

    #[rstest]
    #[case(4, 4, 2)]
    #[case(4, 4, 3)]
    #[case(6, 6, 2)]
    #[case(8, 8, 4)]
    fn test_finds_generating_partitioning(#[case] x: u32, #[case] y: u32, #[case] partition_count: u32) {
        let tables = tables(x, y);
        let partitionings = tables.partitionings(partition_count).unwrap();
        let source = &partitionings[partitionings.len() / 2];
        let block = block_from_partitioning(&source.partition_of_texel, &COLORS);

        let ordering = kmeans_partition_ordering(&tables, &block, partition_count, &CHANNEL_WEIGHTS_UNIFORM).unwrap();
        assert_eq!(ordering.len(), partitionings.len());
        assert_eq!(partitionings[ordering[0] as usize].partition_index, source.partition_index);

        let candidates =
            find_best_partition_candidates(&tables, &block, partition_count, &EncoderConfig::default()).unwrap();
        assert_eq!(candidates[0], source.partition_index);
        assert!(candidates.len() <= 2);
    }

    #[test]
    fn test_candidates_are_unique_and_limited() {
        let tables = tables(5, 5);
        let block = ImageBlock::new(
            0,
            0,
            (0..25)
                .map(|i| ColorF32::new((i * 2000) as f32, ((i * 7) % 25) as f32 * 2500.0, 100.0, 65536.0))
                .collect(),
        );

        let config = EncoderConfig::default();
        let candidates = find_best_partition_candidates(&tables, &block, 3, &config).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_ne!(candidates[0], candidates[1]);

        let single = EncoderConfig {
            partition_candidates: 1,
            ..config
        };
        let best = find_best_partition_candidates(&tables, &block, 3, &single).unwrap();
        assert_eq!(best.len(), 1);
        assert!(candidates.contains(&best[0]));

        let none = EncoderConfig {
            partition_search_limit: 0,
            ..config
        };
        assert!(find_best_partition_candidates(&tables, &block, 3, &none).unwrap().is_empty());
    }

    #[test]
    fn test_block_size_mismatch() {
        let tables = tables(4, 4);
        let block = ImageBlock::new(0, 0, vec![ColorF32::ZERO; 25]);
        assert!(matches!(
            find_best_partition_candidates(&tables, &block, 2, &EncoderConfig::default()),
            Err(Error::InvariantViolated(_))
        ));
    }

    #[test]
    fn test_generate_block_partitionings() {
        let tables = tables(4, 4);
        let partitionings = tables.partitionings(2).unwrap();
        let blocks: Vec<_> = partitionings[..3]
            .iter()
            .map(|pi| block_from_partitioning(&pi.partition_of_texel, &COLORS))
            .collect();

        let config = EncoderConfig::default();
        let result = generate_block_partitionings(&tables, &blocks, 2, &config).unwrap();
        assert_eq!(result.offsets.len(), 3);
        for (i, pi) in partitionings[..3].iter().enumerate() {
            let candidates = result.block_candidates(i);
            assert!(!candidates.is_empty());
            assert_eq!(candidates[0].partition_index, pi.partition_index);
            assert!(candidates.iter().all(|c| c.block_index == i && c.partition_count == 2));
        }

        let single = generate_block_partitionings(&tables, &blocks, 1, &config).unwrap();
        assert_eq!(single.offsets, [0, 1, 2]);
        assert_eq!(single.block_candidates(2)[0].partition_index, 0);
    }
}
