#![warn(clippy::all)]

//! CPU-side metadata, search and serialization for a GPU ASTC compressor.
//!
//! The crate compiles the legal block modes and weight-grid decimation tables
//! for a block footprint, ranks partitionings for a block of texels, encodes
//! bounded integer sequences (BISE) and packs fully decided symbolic blocks
//! into 16-byte ASTC physical blocks. The per-block endpoint and weight search
//! runs elsewhere and consumes the tables produced here.

mod averages;
mod bitreader;
mod bitwriter;
mod error;

pub mod angular;
pub mod block_descriptor;
pub mod block_mode;
pub mod color;
pub mod config;
pub mod container;
pub mod decimation;
pub mod gpu;
pub mod image_block;
pub mod ise;
pub mod partition;
pub mod partition_select;
pub mod quant;
pub mod scramble;
pub mod symbolic;

pub use angular::AngularTables;
pub use block_descriptor::{BlockMode, BlockSizeDescriptor, TrialModes, UniformVariables};
pub use color::ColorF32;
pub use config::EncoderConfig;
pub use container::{write_astc_file, AstcHeader};
pub use error::Error;
pub use gpu::GpuTables;
pub use image_block::{split_image_into_blocks, ImageBlock};
pub use ise::{decode_ise, encode_ise, ise_sequence_bitcount};
pub use partition::{select_partition, PartitionInfo, PartitionTables};
pub use partition_select::{
    find_best_partition_candidates, generate_block_partitionings, partition_mismatch, BlockPartitionings,
};
pub use quant::QuantMethod;
pub use symbolic::{pack_blocks, symbolic_to_physical, SymbolicBlock};

pub type Result<T> = std::result::Result<T, Error>;

pub const BLOCK_MAX_TEXELS: usize = 144;
pub const BLOCK_MAX_COMPONENTS: usize = 4;
pub const BLOCK_MAX_PARTITIONS: usize = 4;
pub const BLOCK_MAX_PARTITIONINGS: usize = 1024;
pub const BLOCK_MAX_WEIGHTS: usize = 64;
pub const BLOCK_MAX_WEIGHTS_2PLANE: usize = BLOCK_MAX_WEIGHTS / 2;
pub const BLOCK_MIN_WEIGHT_BITS: u32 = 24;
pub const BLOCK_MAX_WEIGHT_BITS: u32 = 96;
pub const BLOCK_MAX_KMEANS_TEXELS: usize = 64;
pub const PARTITION_INDEX_BITS: u32 = 10;
pub const WEIGHTS_MAX_BLOCK_MODES: usize = 2048;
pub const WEIGHTS_MAX_DECIMATION_MODES: usize = 87;
pub const WEIGHTS_TEXEL_SUM: f32 = 16.0;
pub const TUNE_MAX_PARTITIONING_CANDIDATES: usize = 2;
pub const TUNE_MAX_TRIAL_CANDIDATES: u32 = 8;

/// Size of one physical ASTC block in bytes.
pub const ASTC_BLOCK_SIZE: usize = 16;

#[doc(hidden)]
#[macro_export]
macro_rules! mask {
    ($size:expr) => {
        !(!($size ^ $size)).checked_shl($size as u32).unwrap_or(0)
    }
}
