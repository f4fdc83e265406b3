//! Partition assignments of the 1024 ASTC partition seeds.

use std::collections::HashSet;

use log::debug;

use crate::block_descriptor::BlockSizeDescriptor;
use crate::{Error, Result, BLOCK_MAX_KMEANS_TEXELS, BLOCK_MAX_PARTITIONINGS, BLOCK_MAX_PARTITIONS};

// Blocks below this texel count use doubled coordinates
const SMALL_BLOCK_TEXELS: usize = 31;

const KMEANS_RNG_SEED: [u64; 2] = [0xfaf9_e171_cea1_ec6b, 0xf1b3_18cc_06af_5d71];

/// Texel assignment of one partitioning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartitionInfo {
    pub partition_count: u32,
    /// The 10-bit seed stored in the block.
    pub partition_index: u32,
    pub partition_texel_count: [u32; BLOCK_MAX_PARTITIONS],
    pub partition_of_texel: Vec<u8>,
    pub texels_of_partition: [Vec<u8>; BLOCK_MAX_PARTITIONS],
    /// Bit `i` of bitmap `p` is set when k-means texel `i` is in partition `p`.
    pub coverage_bitmaps: [u64; BLOCK_MAX_PARTITIONS],
}

impl PartitionInfo {
    fn new(partition_count: u32, partition_index: u32, partition_of_texel: Vec<u8>, kmeans_texels: &[u8]) -> Self {
        let mut partition_texel_count = [0; BLOCK_MAX_PARTITIONS];
        let mut texels_of_partition: [Vec<u8>; BLOCK_MAX_PARTITIONS] = Default::default();
        for (texel, &partition) in partition_of_texel.iter().enumerate() {
            partition_texel_count[partition as usize] += 1;
            texels_of_partition[partition as usize].push(texel as u8);
        }

        let mut coverage_bitmaps = [0; BLOCK_MAX_PARTITIONS];
        for (i, &texel) in kmeans_texels.iter().enumerate() {
            coverage_bitmaps[partition_of_texel[texel as usize] as usize] |= 1u64 << i;
        }

        PartitionInfo {
            partition_count,
            partition_index,
            partition_texel_count,
            partition_of_texel,
            texels_of_partition,
            coverage_bitmaps,
        }
    }

    pub fn texels(&self, partition: usize) -> &[u8] {
        &self.texels_of_partition[partition]
    }

    /// Every partition has at least one texel.
    fn is_complete(&self) -> bool {
        self.partition_texel_count[..self.partition_count as usize]
            .iter()
            .all(|&count| count > 0)
    }

    /// Labels relabelled in order of first appearance, so that partitionings
    /// differing only by label permutation compare equal.
    fn canonical(&self) -> Vec<u8> {
        let mut mapping = [None; BLOCK_MAX_PARTITIONS];
        let mut next = 0;
        self.partition_of_texel
            .iter()
            .map(|&p| {
                *mapping[p as usize].get_or_insert_with(|| {
                    next += 1;
                    next - 1
                })
            })
            .collect()
    }
}

/// Deduplicated partitionings for 1 to 4 partitions of one block size.
#[derive(Clone, Debug)]
pub struct PartitionTables {
    texel_count: usize,
    kmeans_texels: Vec<u8>,
    single: PartitionInfo,
    partitionings: [Vec<PartitionInfo>; BLOCK_MAX_PARTITIONS - 1],
    packed_index: [Box<[Option<u16>; BLOCK_MAX_PARTITIONINGS]>; BLOCK_MAX_PARTITIONS - 1],
}

impl PartitionTables {
    pub fn new(bsd: &BlockSizeDescriptor) -> Self {
        let texel_count = bsd.texel_count();
        let kmeans_texels = kmeans_texels(texel_count);
        let small_block = texel_count < SMALL_BLOCK_TEXELS;

        let single = PartitionInfo::new(1, 0, vec![0; texel_count], &kmeans_texels);

        let mut partitionings: [Vec<PartitionInfo>; 3] = Default::default();
        let mut packed_index: [Box<[Option<u16>; BLOCK_MAX_PARTITIONINGS]>; 3] =
            std::array::from_fn(|_| Box::new([None; BLOCK_MAX_PARTITIONINGS]));

        for partition_count in 2..=BLOCK_MAX_PARTITIONS as u32 {
            let slot = partition_count as usize - 2;
            let mut seen = HashSet::new();

            for seed in 0..BLOCK_MAX_PARTITIONINGS as u32 {
                let partition_of_texel = (0..bsd.ydim())
                    .flat_map(|y| (0..bsd.xdim()).map(move |x| (x, y)))
                    .map(|(x, y)| select_partition(seed, x, y, 0, partition_count, small_block))
                    .collect();
                let info = PartitionInfo::new(partition_count, seed, partition_of_texel, &kmeans_texels);

                if !info.is_complete() || !seen.insert(info.canonical()) {
                    continue;
                }

                packed_index[slot][seed as usize] = Some(partitionings[slot].len() as u16);
                partitionings[slot].push(info);
            }
        }

        debug!(
            "Partition tables for {}x{} blocks: {}/{}/{} partitionings for 2/3/4 partitions",
            bsd.xdim(),
            bsd.ydim(),
            partitionings[0].len(),
            partitionings[1].len(),
            partitionings[2].len()
        );

        PartitionTables {
            texel_count,
            kmeans_texels,
            single,
            partitionings,
            packed_index,
        }
    }

    pub fn texel_count(&self) -> usize {
        self.texel_count
    }

    /// Texels sampled for k-means, at most [`BLOCK_MAX_KMEANS_TEXELS`].
    pub fn kmeans_texels(&self) -> &[u8] {
        &self.kmeans_texels
    }

    /// Kept partitionings in seed order.
    pub fn partitionings(&self, partition_count: u32) -> Result<&[PartitionInfo]> {
        match partition_count {
            1 => Ok(std::slice::from_ref(&self.single)),
            2..=4 => Ok(&self.partitionings[partition_count as usize - 2]),
            _ => Err(Error::UnsupportedPartitionCount(partition_count)),
        }
    }

    /// Position of `partition_index` in [`Self::partitionings`].
    pub fn packed_index(&self, partition_count: u32, partition_index: u32) -> Option<usize> {
        match partition_count {
            1 => (partition_index == 0).then_some(0),
            2..=4 => self.packed_index[partition_count as usize - 2]
                .get(partition_index as usize)
                .copied()
                .flatten()
                .map(usize::from),
            _ => None,
        }
    }

    pub fn partition_info(&self, partition_count: u32, partition_index: u32) -> Result<&PartitionInfo> {
        let partitionings = self.partitionings(partition_count)?;
        self.packed_index(partition_count, partition_index)
            .map(|i| &partitionings[i])
            .ok_or_else(|| {
                Error::invariant(format!(
                    "partition index {} is not in the {} partition table",
                    partition_index, partition_count
                ))
            })
    }
}

fn hash52(mut v: u32) -> u32 {
    v ^= v >> 15;
    // (2^4 + 1) * (2^7 + 1) * (2^17 - 1)
    v = v.wrapping_mul(0xEEDE_0891);
    v ^= v >> 5;
    v = v.wrapping_add(v << 16);
    v ^= v >> 7;
    v ^= v >> 3;
    v ^= v << 6;
    v ^= v >> 17;
    v
}

/// Partition of the texel at `(x, y, z)` for the given seed, as defined by
/// the ASTC partition hash.
pub fn select_partition(seed: u32, x: u32, y: u32, z: u32, partition_count: u32, small_block: bool) -> u8 {
    let (x, y, z) = if small_block { (x << 1, y << 1, z << 1) } else { (x, y, z) };

    let seed = seed + (partition_count - 1) * 1024;
    let rnum = hash52(seed);

    let mut seeds = [
        rnum,
        rnum >> 4,
        rnum >> 8,
        rnum >> 12,
        rnum >> 16,
        rnum >> 20,
        rnum >> 24,
        rnum >> 28,
        rnum >> 18,
        rnum >> 22,
        rnum >> 26,
        (rnum >> 30) | (rnum << 2),
    ]
    .map(|s| (s & 0xF) * (s & 0xF));

    let (sh1, sh2) = if seed & 1 != 0 {
        (if seed & 2 != 0 { 4 } else { 5 }, if partition_count == 3 { 6 } else { 5 })
    } else {
        (if partition_count == 3 { 6 } else { 5 }, if seed & 2 != 0 { 4 } else { 5 })
    };
    let sh3 = if seed & 0x10 != 0 { sh1 } else { sh2 };

    for (i, s) in seeds.iter_mut().enumerate() {
        *s >>= match i {
            0..=7 if i % 2 == 0 => sh1,
            0..=7 => sh2,
            _ => sh3,
        };
    }

    let saw = |a: u32, b: u32, c: u32, r: u32| (a * x + b * y + c * z + r) & 0x3F;
    let a = saw(seeds[0], seeds[1], seeds[10], rnum >> 14);
    let mut b = saw(seeds[2], seeds[3], seeds[11], rnum >> 10);
    let mut c = saw(seeds[4], seeds[5], seeds[8], rnum >> 6);
    let mut d = saw(seeds[6], seeds[7], seeds[9], rnum >> 2);

    if partition_count <= 3 {
        d = 0;
    }
    if partition_count <= 2 {
        c = 0;
    }
    if partition_count <= 1 {
        b = 0;
    }

    if a >= b && a >= c && a >= d {
        0
    } else if b >= c && b >= d {
        1
    } else if c >= d {
        2
    } else {
        3
    }
}

/// xoroshiro128+
struct Rng([u64; 2]);

impl Rng {
    fn next(&mut self) -> u64 {
        let [s0, mut s1] = self.0;
        let result = s0.wrapping_add(s1);
        s1 ^= s0;
        self.0 = [s0.rotate_left(24) ^ s1 ^ (s1 << 16), s1.rotate_left(37)];
        result
    }
}

fn kmeans_texels(texel_count: usize) -> Vec<u8> {
    if texel_count <= BLOCK_MAX_KMEANS_TEXELS {
        return (0..texel_count as u8).collect();
    }

    let mut rng = Rng(KMEANS_RNG_SEED);
    let mut seen = [false; crate::BLOCK_MAX_TEXELS];
    let mut texels = Vec::with_capacity(BLOCK_MAX_KMEANS_TEXELS);
    while texels.len() < BLOCK_MAX_KMEANS_TEXELS {
        // Only the low byte of each draw is used
        let texel = (rng.next() as u8) as usize % texel_count;
        if !seen[texel] {
            seen[texel] = true;
            texels.push(texel as u8);
        }
    }
    texels
}
