//! A handful of helper functions for working with direction vectors

use crate::Float;
use glam::Vec3;
use rand::Rng;

/// Squared-length tolerance below which a vector is treated as degenerate
///
/// Also used as the tolerance on individual components when picking a trial
/// axis in [`orthogonal`].
const DEGENERATE_EPSILON: Float = 1e-6;

/// Returns a unit vector orthogonal to `direction`
///
/// The result is deterministic: the same input always produces the same
/// orthogonal vector, which is what keeps structured-mode growth fully
/// reproducible.
///
/// The trial axis is the X axis when the X component of `direction` is within
/// tolerance of zero, and the Y axis otherwise. If the cross product with the
/// trial axis is degenerate (the trial happened to be parallel to
/// `direction`), we retry once with the Z axis.
///
/// ## Panics
///
/// This function panics if `direction` is the zero vector. Callers are
/// expected to pass a non-zero direction; a zero vector has no orthogonal.
pub fn orthogonal(direction: Vec3) -> Vec3 {
    let trial = match direction.x.abs() < DEGENERATE_EPSILON {
        true => Vec3::X,
        false => Vec3::Y,
    };

    let mut ortho = direction.cross(trial);

    if ortho.length_squared() < DEGENERATE_EPSILON {
        ortho = direction.cross(Vec3::Z);
    }

    ortho
        .try_normalize()
        .expect("cannot produce a vector orthogonal to the zero vector")
}

/// Returns a random unit vector orthogonal to `direction`
///
/// The axis is produced by crossing `direction` with a randomly sampled
/// vector `(1, u₁, u₂)` where `u₁, u₂` are uniform on `[0, 1)`. Exactly two
/// values are drawn from `rng` on every call. If the sample happens to be
/// parallel to `direction`, we fall back to the deterministic [`orthogonal`]
/// resolver.
///
/// ## Panics
///
/// Like [`orthogonal`], this function panics if `direction` is the zero
/// vector.
pub fn random_orthogonal(direction: Vec3, rng: &mut impl Rng) -> Vec3 {
    let sample = Vec3::new(1.0, rng.gen::<Float>(), rng.gen::<Float>());

    let ortho = direction.cross(sample);

    if ortho.length_squared() < DEGENERATE_EPSILON {
        return orthogonal(direction);
    }

    ortho.normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const TOLERANCE: Float = 1e-5;

    fn assert_unit_and_orthogonal(direction: Vec3, result: Vec3) {
        assert!(
            result.dot(direction).abs() < TOLERANCE,
            "expected {:?} to be orthogonal to {:?}",
            result,
            direction
        );
        assert!(
            (result.length() - 1.0).abs() < TOLERANCE,
            "expected {:?} to be unit length",
            result
        );
    }

    #[test]
    fn orthogonal_to_coordinate_axes() {
        for direction in [Vec3::X, Vec3::Y, Vec3::Z, -Vec3::X, -Vec3::Y, -Vec3::Z] {
            assert_unit_and_orthogonal(direction, orthogonal(direction));
        }
    }

    #[test]
    fn orthogonal_to_oblique_direction() {
        // Not aligned with any axis, not unit length.
        let direction = Vec3::new(0.3, -1.2, 2.4);
        assert_unit_and_orthogonal(direction, orthogonal(direction));
    }

    #[test]
    fn orthogonal_is_deterministic() {
        let direction = Vec3::new(0.0, 0.0, 1.0);
        assert_eq!(orthogonal(direction), orthogonal(direction));
    }

    #[test]
    fn random_orthogonal_is_orthogonal() {
        let mut rng = StdRng::seed_from_u64(7);
        let direction = Vec3::new(1.0, 0.5, -0.25);

        for _ in 0..32 {
            assert_unit_and_orthogonal(direction, random_orthogonal(direction, &mut rng));
        }
    }
}
