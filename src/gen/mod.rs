//! Tools for generating [`Skeleton`]s
//!
//! [`Skeleton`]: crate::Skeleton

use crate::Float;
use glam::Vec3;

pub mod fractal;
pub mod from_json;

pub use fractal::FractalTree;
pub use from_json::{GrowthConfig, ParsedConfig};

/// Validated, immutable growth parameters
///
/// Produced from a [`GrowthConfig`] exactly once per generation request:
/// angles arrive in degrees and are stored in radians, the growth direction
/// is normalized, and -- when structured growth is requested -- the branch
/// probability and every randomness factor are overridden so that the tree
/// is fully deterministic. Nothing mutates a `GrowthParams` after
/// construction, so the structured-mode invariant holds for its lifetime.
///
/// The constructor performs no range validation; that is the job of the
/// model loader (see [`from_json`]). Callers constructing parameters in code
/// are responsible for supplying sane values.
#[derive(Debug, Clone, PartialEq)]
pub struct GrowthParams {
    /// Maximum recursion depth
    iterations: usize,
    /// Length of the trunk segment
    initial_length: Float,
    /// Branching angle, in radians
    branching_angle: Float,
    /// Maximum divergence from the growth direction, in radians (reserved)
    max_divergence_angle: Float,
    /// Per-attempt chance that a child branch is actually produced
    branch_probability: Float,
    /// Candidate children considered per node
    max_branch_attempts: usize,
    /// Fractional jitter on branch lengths
    length_randomness: Float,
    /// Fractional jitter reserved for branch rotations (not yet applied)
    rotation_randomness: Float,
    /// Fractional jitter on the branching angle
    divergence_randomness: Float,
    /// Per-depth decay factor for lengths and radii
    reduction_factor: Float,
    /// Unit direction the trunk grows in
    growth_direction: Vec3,
    /// Whether terminal nodes emit a spherical leaf marker
    include_leaves: bool,
    /// Whether growth is structured (fully deterministic)
    structured: bool,
}

impl GrowthParams {
    /// Normalizes a [`GrowthConfig`] into the immutable form used by the
    /// generator
    ///
    /// ## Panics
    ///
    /// This function panics if `config.growth_direction` is the zero vector.
    /// The model loader rejects such configs before they get here.
    pub fn new(config: &GrowthConfig) -> Self {
        let growth_direction = config
            .growth_direction
            .try_normalize()
            .expect("growth direction must be a non-zero vector");

        let mut params = GrowthParams {
            iterations: config.iterations,
            initial_length: config.initial_length,
            branching_angle: config.branching_angle.to_radians(),
            max_divergence_angle: config.max_divergence_angle.to_radians(),
            branch_probability: config.branch_probability,
            max_branch_attempts: config.max_branch_attempts,
            length_randomness: config.length_randomness,
            rotation_randomness: config.rotation_randomness,
            divergence_randomness: config.divergence_randomness,
            reduction_factor: config.reduction_factor,
            growth_direction,
            include_leaves: config.include_leaves,
            structured: config.structured,
        };

        // Structured growth must not depend on the pseudorandom stream, no
        // matter what the caller supplied.
        if params.structured {
            params.branch_probability = 1.0;
            params.length_randomness = 0.0;
            params.rotation_randomness = 0.0;
            params.divergence_randomness = 0.0;
        }

        params
    }

    /// Returns the unit direction the trunk grows in
    pub fn growth_direction(&self) -> Vec3 {
        self.growth_direction
    }
}

/// Returns the worst-case number of beams a generation run may emit, i.e.
/// `Σ_{d=0}^{iterations} max_branch_attempts^d`
///
/// The recursion engine performs no internal cap, so `iterations` and
/// `max_branch_attempts` form a joint combinatorial budget that callers must
/// bound *before* invoking the generator. The sum saturates at `u64::MAX`
/// instead of overflowing.
pub fn worst_case_beams(iterations: usize, max_branch_attempts: usize) -> u64 {
    let mut total: u64 = 0;
    let mut level: u64 = 1;

    for _ in 0..=iterations {
        total = total.saturating_add(level);
        level = level.saturating_mul(max_branch_attempts as u64);
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::float;

    fn base_config() -> GrowthConfig {
        GrowthConfig {
            iterations: 4,
            initial_length: 25.0,
            branching_angle: 30.0,
            max_divergence_angle: 45.0,
            branch_probability: 0.75,
            max_branch_attempts: 6,
            length_randomness: 0.25,
            rotation_randomness: 0.5,
            divergence_randomness: 0.2,
            reduction_factor: 0.75,
            growth_direction: Vec3::Z,
            include_leaves: true,
            structured: false,
        }
    }

    #[test]
    fn structured_mode_overrides_probability_and_jitter() {
        let mut config = base_config();
        config.structured = true;

        let params = GrowthParams::new(&config);

        assert_eq!(params.branch_probability, 1.0);
        assert_eq!(params.length_randomness, 0.0);
        assert_eq!(params.rotation_randomness, 0.0);
        assert_eq!(params.divergence_randomness, 0.0);
    }

    #[test]
    fn unstructured_mode_keeps_caller_values() {
        let params = GrowthParams::new(&base_config());

        assert_eq!(params.branch_probability, 0.75);
        assert_eq!(params.length_randomness, 0.25);
        assert_eq!(params.rotation_randomness, 0.5);
        assert_eq!(params.divergence_randomness, 0.2);
    }

    #[test]
    fn angles_are_converted_to_radians() {
        let params = GrowthParams::new(&base_config());

        assert!((params.branching_angle - float::PI / 6.0).abs() < 1e-6);
        assert!((params.max_divergence_angle - float::PI / 4.0).abs() < 1e-6);
    }

    #[test]
    fn growth_direction_is_normalized() {
        let mut config = base_config();
        config.growth_direction = Vec3::new(0.0, 0.0, 4.0);

        let params = GrowthParams::new(&config);

        assert_eq!(params.growth_direction(), Vec3::Z);
    }

    #[test]
    fn worst_case_beams_sums_every_level() {
        // A single trunk beam, regardless of how many attempts per node.
        assert_eq!(worst_case_beams(0, 9), 1);
        // 1 + 3
        assert_eq!(worst_case_beams(1, 3), 4);
        // 1 + 3 + 9
        assert_eq!(worst_case_beams(2, 3), 13);
        // 1 + 6 + 36 + ... + 6^5
        assert_eq!(worst_case_beams(5, 6), 9331);
    }

    #[test]
    fn worst_case_beams_saturates_instead_of_overflowing() {
        assert_eq!(worst_case_beams(1000, 1000), u64::MAX);
    }
}
