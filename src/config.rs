use crate::quant::QuantMethod;
use crate::{TUNE_MAX_PARTITIONING_CANDIDATES, TUNE_MAX_TRIAL_CANDIDATES};

/// Relative importance of the R, G, B and A channels in error estimates.
pub type ChannelWeights = [f32; 4];

pub const CHANNEL_WEIGHTS_UNIFORM: ChannelWeights = [1.0, 1.0, 1.0, 1.0];

/// Tunables shared by table compilation, partition selection and the
/// external search stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EncoderConfig {
    /// Weigh the error of each colour channel (defaults to uniform weights)
    pub channel_weights: ChannelWeights,

    /// How many partitionings, ordered by k-means mismatch, are scored exactly
    pub partition_search_limit: u32,

    /// How many partitionings are returned per block and partition count.
    /// Capped at [`TUNE_MAX_PARTITIONING_CANDIDATES`].
    pub partition_candidates: usize,

    /// Highest weight quantization tried by the search stage
    pub weight_quant_limit: QuantMethod,

    /// Highest weight quantization used to size the angular search
    pub angular_quant_limit: QuantMethod,

    /// Candidate encodings refined per block
    pub trial_candidate_limit: u32,
}

impl EncoderConfig {
    pub(crate) fn candidate_limit(&self) -> usize {
        self.partition_candidates.min(TUNE_MAX_PARTITIONING_CANDIDATES)
    }
}

impl Default for EncoderConfig {
    fn default() -> Self {
        EncoderConfig {
            channel_weights: CHANNEL_WEIGHTS_UNIFORM,
            partition_search_limit: 18,
            partition_candidates: TUNE_MAX_PARTITIONING_CANDIDATES,
            weight_quant_limit: QuantMethod::Quant32,
            angular_quant_limit: QuantMethod::Quant12,
            trial_candidate_limit: TUNE_MAX_TRIAL_CANDIDATES,
        }
    }
}
