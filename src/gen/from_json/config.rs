//! Wrapper module for the config structure, rooted at [`ParsedConfig`]

use crate::float::Float;
use glam::Vec3;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParsedConfig {
    pub params: GrowthConfig,

    /// Seed for the pseudorandom stream
    ///
    /// If present, the run is reproducible; if absent, the stream is seeded
    /// from OS entropy. A `--seed` given on the command line wins over this.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Growth parameters as they appear in a model file
///
/// This is the caller-facing form: angles are in degrees and the growth
/// direction does not need to be unit length. [`GrowthParams`] is the
/// normalized form the generator actually runs on.
///
/// [`GrowthParams`]: crate::gen::GrowthParams
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GrowthConfig {
    /// Maximum recursion depth. Beware: together with
    /// `max_branch_attempts` this forms a combinatorial budget -- the
    /// worst-case beam count grows as `max_branch_attempts ^ iterations`.
    pub iterations: usize,

    /// Length of the trunk segment, in model units
    pub initial_length: Float,

    /// The angle (in degrees) that child branches are rotated away from
    /// their parent
    pub branching_angle: Float,

    /// Maximum divergence from the growth direction, in degrees
    ///
    /// Reserved for divergence clamping; accepted and stored but not yet
    /// applied by the growth algorithm.
    pub max_divergence_angle: Float,

    /// Probability (in 0..=1) that any single branch attempt produces a
    /// child
    pub branch_probability: Float,

    /// Number of candidate children considered per node
    pub max_branch_attempts: usize,

    /// Fractional jitter applied to branch lengths
    pub length_randomness: Float,

    /// Fractional jitter for branch rotations
    ///
    /// Accepted and stored but not yet applied by the growth algorithm.
    pub rotation_randomness: Float,

    /// Fractional jitter applied to the branching angle
    pub divergence_randomness: Float,

    /// The ratio (in 0..=1) of decrease in length and radius per recursion
    /// depth
    pub reduction_factor: Float,

    /// Direction the trunk grows in; normalized before use
    pub growth_direction: Vec3,

    /// Whether terminal nodes emit a spherical leaf marker
    #[serde(default = "default_true")]
    pub include_leaves: bool,

    /// When true, growth is structured: the branch probability is forced to
    /// 1 and every randomness factor to 0, producing a fully deterministic
    /// tree regardless of the values supplied above
    #[serde(default = "default_true")]
    pub structured: bool,
}

fn default_true() -> bool {
    true
}
