//! The recursive fractal tree generator

use crate::gen::GrowthParams;
use crate::{float, vec_utils, Beam, Float, Leaf, Skeleton};
use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Ratio of the trunk's base radius to the initial branch length
const TRUNK_RADIUS_RATIO: Float = 0.1;

/// Generator for branching fractal tree skeletons
///
/// A `FractalTree` is just its [`GrowthParams`] plus the rotation axis shared
/// by all branches in structured mode. Each call to [`grow`] owns a private
/// pseudorandom stream and an output [`Skeleton`]; the generator keeps no
/// state between calls, so independent trees can be grown concurrently from
/// the same `FractalTree` as long as each invocation gets its own seed.
///
/// [`grow`]: Self::grow
#[derive(Debug, Clone)]
pub struct FractalTree {
    params: GrowthParams,

    /// Rotation axis used by every branch in structured mode
    ///
    /// Computed once, orthogonal to the global growth direction, so that
    /// sibling branches fan out around a common frame.
    structured_axis: Vec3,
}

impl FractalTree {
    /// Creates a generator for the given parameters
    pub fn new(params: GrowthParams) -> Self {
        let structured_axis = vec_utils::orthogonal(params.growth_direction);

        FractalTree {
            params,
            structured_axis,
        }
    }

    /// Grows a full skeleton, starting from the origin
    ///
    /// With `Some(seed)` the run is reproducible: the same parameters and
    /// seed always produce the same skeleton. Without a seed the stream is
    /// initialized from OS entropy. Structured-mode output does not depend
    /// on the stream at all, so there the seed makes no difference.
    ///
    /// The recursion performs no internal cap on the number of beams; check
    /// [`worst_case_beams`] against a sensible ceiling before calling this
    /// with untrusted parameters.
    ///
    /// [`worst_case_beams`]: crate::gen::worst_case_beams
    pub fn grow(&self, seed: Option<u64>) -> Skeleton {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut skeleton = Skeleton::new();

        let trunk_end = self.params.growth_direction * self.params.initial_length;
        let trunk_radius = self.params.initial_length * TRUNK_RADIUS_RATIO;

        self.add_branch(&mut skeleton, &mut rng, Vec3::ZERO, trunk_end, trunk_radius, 0);

        skeleton
    }

    /// Emits the beam for one node and recurses into its children
    ///
    /// `start`, `end` and `radius` describe the segment that the parent call
    /// decided on; each call emits exactly one beam. The order of draws from
    /// `rng` is fixed (length jitter, then per attempt: probability, axis
    /// sample, divergence jitter) -- it is part of the seeded
    /// reproducibility contract.
    fn add_branch(
        &self,
        skeleton: &mut Skeleton,
        rng: &mut StdRng,
        start: Vec3,
        end: Vec3,
        radius: Float,
        depth: usize,
    ) {
        let params = &self.params;

        // Lengths and radii decay with the same per-depth growth factor.
        let growth_factor = params.reduction_factor.powi(depth as i32);
        let end_radius = radius * growth_factor;

        skeleton.push_beam(Beam {
            start,
            start_radius: radius,
            end,
            end_radius,
        });

        if depth >= params.iterations {
            if params.include_leaves {
                skeleton.push_leaf(Leaf {
                    pos: end,
                    radius: end_radius,
                });
            }
            return;
        }

        // Length template for the children, jittered around the nominal
        // per-depth decay. The draw is uniform on [-0.5, 0.5).
        let length = params.initial_length
            * growth_factor
            * (1.0 + params.length_randomness * (rng.gen::<Float>() - 0.5));

        let direction = (end - start)
            .try_normalize()
            .expect("branch segment must have non-zero length");
        let base_direction = direction * length;

        for attempt in 0..params.max_branch_attempts {
            // A rejected attempt still consumes its index, so the angular
            // slots of any later attempts stay where they were laid out.
            if rng.gen::<Float>() >= params.branch_probability {
                continue;
            }

            let rotation_axis = match params.structured {
                true => self.structured_axis,
                false => vec_utils::random_orthogonal(params.growth_direction, rng),
            };

            // Evenly spaced azimuth slot for this attempt.
            let spacing_angle =
                attempt as Float * 2.0 * float::PI / params.max_branch_attempts as Float;

            let branching_angle = params.branching_angle
                * (1.0 + params.divergence_randomness * (rng.gen::<Float>() - 0.5));

            // Two composed rotations: spread away from the parent about the
            // resolved axis first, then distribute around the parent's own
            // axis.
            let spread = Quat::from_axis_angle(rotation_axis, branching_angle);
            let spacing = Quat::from_axis_angle(direction, spacing_angle);
            let branch_direction = spacing * (spread * base_direction);

            self.add_branch(
                skeleton,
                rng,
                end,
                end + branch_direction,
                end_radius,
                depth + 1,
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen::{worst_case_beams, GrowthConfig};

    const TOLERANCE: Float = 1e-4;

    /// A deterministic baseline; individual tests override what they need
    fn structured_config() -> GrowthConfig {
        GrowthConfig {
            iterations: 1,
            initial_length: 10.0,
            branching_angle: 30.0,
            max_divergence_angle: 45.0,
            branch_probability: 1.0,
            max_branch_attempts: 3,
            length_randomness: 0.0,
            rotation_randomness: 0.0,
            divergence_randomness: 0.0,
            reduction_factor: 0.5,
            growth_direction: Vec3::X,
            include_leaves: true,
            structured: true,
        }
    }

    fn random_config() -> GrowthConfig {
        GrowthConfig {
            iterations: 4,
            branch_probability: 0.6,
            length_randomness: 0.25,
            rotation_randomness: 0.5,
            divergence_randomness: 0.2,
            reduction_factor: 0.75,
            structured: false,
            ..structured_config()
        }
    }

    fn grow(config: &GrowthConfig, seed: u64) -> Skeleton {
        FractalTree::new(GrowthParams::new(config)).grow(Some(seed))
    }

    fn assert_vec3_close(actual: Vec3, expected: Vec3) {
        assert!(
            (actual - expected).length() < TOLERANCE,
            "expected {:?} to be close to {:?}",
            actual,
            expected
        );
    }

    #[test]
    fn zero_iterations_emits_only_the_trunk() {
        let mut config = structured_config();
        config.iterations = 0;
        config.max_branch_attempts = 5;

        let skeleton = grow(&config, 0);

        assert_eq!(skeleton.count_beams(), 1);
        let trunk = skeleton.beams()[0];
        assert_eq!(trunk.start, Vec3::ZERO);
        assert_vec3_close(trunk.end, Vec3::new(10.0, 0.0, 0.0));
        // Trunk radius is a tenth of the initial length, and the growth
        // factor at depth 0 is 1, so the trunk does not taper.
        assert!((trunk.start_radius - 1.0).abs() < TOLERANCE);
        assert!((trunk.end_radius - 1.0).abs() < TOLERANCE);

        // One leaf, capping the trunk's end.
        assert_eq!(skeleton.count_leaves(), 1);
        assert_vec3_close(skeleton.leaves()[0].pos, trunk.end);
    }

    #[test]
    fn zero_iterations_without_leaves() {
        let mut config = structured_config();
        config.iterations = 0;
        config.include_leaves = false;

        let skeleton = grow(&config, 0);

        assert_eq!(skeleton.count_beams(), 1);
        assert_eq!(skeleton.count_leaves(), 0);
    }

    #[test]
    fn structured_output_does_not_depend_on_the_seed() {
        // Non-zero jitter in the config; construction overrides it.
        let mut config = structured_config();
        config.iterations = 3;
        config.length_randomness = 0.25;
        config.divergence_randomness = 0.2;
        config.branch_probability = 0.5;

        let a = grow(&config, 1);
        let b = grow(&config, 2);
        let c = grow(&config, 1);

        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn seeded_random_growth_is_reproducible() {
        let config = random_config();

        assert_eq!(grow(&config, 42), grow(&config, 42));
        assert_ne!(grow(&config, 42), grow(&config, 43));
    }

    #[test]
    fn three_structured_children_spread_evenly() {
        // iterations = 1, 3 attempts, probability 1, growing along +X:
        // one trunk beam plus exactly three children starting at its end,
        // 120 degrees apart around the trunk axis.
        let config = structured_config();
        let skeleton = grow(&config, 0);

        assert_eq!(skeleton.count_beams(), 4);

        let trunk = skeleton.beams()[0];
        assert_eq!(trunk.start, Vec3::ZERO);
        assert_vec3_close(trunk.end, Vec3::new(10.0, 0.0, 0.0));

        let children = &skeleton.beams()[1..];
        let directions: Vec<Vec3> = children
            .iter()
            .map(|beam| {
                assert_vec3_close(beam.start, trunk.end);
                beam.end - beam.start
            })
            .collect();

        for dir in &directions {
            // Children keep the full depth-0 length and sit at the
            // branching angle off the trunk axis.
            assert!((dir.length() - 10.0).abs() < TOLERANCE);
            let angle = dir.normalize().dot(Vec3::X).acos();
            assert!((angle - (30.0 as Float).to_radians()).abs() < TOLERANCE);
        }

        // The first child is rotated by exactly the branching angle about
        // the fixed structured axis (the Z axis, for growth along +X).
        assert_vec3_close(
            directions[0],
            Vec3::new(
                10.0 * (30.0 as Float).to_radians().cos(),
                10.0 * (30.0 as Float).to_radians().sin(),
                0.0,
            ),
        );

        // Pairwise azimuth separation around the trunk axis is 120 degrees:
        // project onto the YZ plane and compare normalized directions.
        let azimuths: Vec<Vec3> = directions
            .iter()
            .map(|d| Vec3::new(0.0, d.y, d.z).normalize())
            .collect();
        for i in 0..azimuths.len() {
            for j in (i + 1)..azimuths.len() {
                let cos = azimuths[i].dot(azimuths[j]);
                assert!(
                    (cos - (-0.5)).abs() < TOLERANCE,
                    "children {} and {} are not 120 degrees apart (cos = {})",
                    i,
                    j,
                    cos
                );
            }
        }

        // Each child terminates at depth 1 and caps itself with a leaf.
        assert_eq!(skeleton.count_leaves(), 3);
    }

    #[test]
    fn zero_probability_keeps_only_the_trunk() {
        let mut config = random_config();
        config.iterations = 5;
        config.max_branch_attempts = 6;
        config.branch_probability = 0.0;

        let skeleton = grow(&config, 7);

        assert_eq!(skeleton.count_beams(), 1);
        // The trunk is not a terminal node (depth 0 < 5), so no leaf marker
        // is emitted even though every attempt was rejected.
        assert_eq!(skeleton.count_leaves(), 0);
    }

    #[test]
    fn beam_count_stays_within_the_combinatorial_bound() {
        let config = random_config();
        let bound = worst_case_beams(config.iterations, config.max_branch_attempts);

        for seed in 0..8 {
            let skeleton = grow(&config, seed);
            assert!(skeleton.count_beams() as u64 <= bound);
        }
    }

    #[test]
    fn radii_never_increase_along_a_beam() {
        let config = random_config();
        let skeleton = grow(&config, 11);

        for beam in skeleton.beams() {
            assert!(
                beam.end_radius <= beam.start_radius + TOLERANCE,
                "beam tapers the wrong way: {:?}",
                beam
            );
        }
    }

    #[test]
    fn children_continue_from_their_parents_end() {
        // Structured two-level tree with two attempts: depth-first emission
        // order is trunk, first child, its children, second child, its
        // children.
        let mut config = structured_config();
        config.iterations = 2;
        config.max_branch_attempts = 2;

        let skeleton = grow(&config, 0);
        let beams = skeleton.beams();

        assert_eq!(beams.len(), 7);

        let trunk = beams[0];
        for &child in [&beams[1], &beams[4]] {
            assert_vec3_close(child.start, trunk.end);
            assert!((child.start_radius - trunk.end_radius).abs() < TOLERANCE);
        }
        for &grandchild in [&beams[2], &beams[3]] {
            assert_vec3_close(grandchild.start, beams[1].end);
            assert!((grandchild.start_radius - beams[1].end_radius).abs() < TOLERANCE);
        }
    }

    #[test]
    fn growth_direction_is_normalized_before_use() {
        let mut config = structured_config();
        config.iterations = 0;
        config.growth_direction = Vec3::new(0.0, 0.0, 2.0);

        let skeleton = grow(&config, 0);

        // A non-unit direction must not stretch the trunk.
        assert_vec3_close(skeleton.beams()[0].end, Vec3::new(0.0, 0.0, 10.0));
    }
}
