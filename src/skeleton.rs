//! Wrapper module for [`Skeleton`]

use crate::{Beam, Float, Leaf};
use glam::Vec3;
use serde::Serialize;

/// The flat output of a generation run
///
/// A `Skeleton` is an ordered collection of [`Beam`]s (tapered cylindrical
/// segments) plus the [`Leaf`] markers emitted at terminal nodes. It holds no
/// parent/child links -- the tree structure only ever exists implicitly in
/// the recursion that produced it. Ownership passes to whatever consumes the
/// skeleton (CSV/JSON export, the PNG preview, or an external solid-geometry
/// engine); the generator keeps no reference after returning it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Skeleton {
    beams: Vec<Beam>,
    leaves: Vec<Leaf>,
}

impl Skeleton {
    /// Creates an empty skeleton, ready to be grown into
    pub(crate) fn new() -> Self {
        Skeleton {
            beams: Vec::new(),
            leaves: Vec::new(),
        }
    }

    /// Appends a beam. Emission order is part of the output contract, so
    /// beams are only ever pushed, never reordered.
    pub(crate) fn push_beam(&mut self, beam: Beam) {
        self.beams.push(beam);
    }

    /// Appends a terminal leaf marker
    pub(crate) fn push_leaf(&mut self, leaf: Leaf) {
        self.leaves.push(leaf);
    }

    /// Returns the emitted beams, in emission order
    pub fn beams(&self) -> &[Beam] {
        &self.beams
    }

    /// Returns the emitted leaf markers, in emission order
    pub fn leaves(&self) -> &[Leaf] {
        &self.leaves
    }

    /// Returns the total number of beams in the skeleton
    pub fn count_beams(&self) -> usize {
        self.beams.len()
    }

    /// Returns the number of terminal leaf markers in the skeleton
    pub fn count_leaves(&self) -> usize {
        self.leaves.len()
    }

    /// Returns the axis-aligned bounding box of the skeleton as
    /// `(min corner, max corner)`, inflated by the radius at each endpoint so
    /// that the full solid would fit inside
    ///
    /// Returns `None` for an empty skeleton.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let mut corners: Option<(Vec3, Vec3)> = None;

        let mut include = |pos: Vec3, radius: Float| {
            let pad = Vec3::splat(radius);
            corners = match corners {
                None => Some((pos - pad, pos + pad)),
                Some((lo, hi)) => Some((lo.min(pos - pad), hi.max(pos + pad))),
            };
        };

        for beam in &self.beams {
            include(beam.start, beam.start_radius);
            include(beam.end, beam.end_radius);
        }

        for leaf in &self.leaves {
            include(leaf.pos, leaf.radius);
        }

        corners
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_skeleton_has_no_bounds() {
        let skeleton = Skeleton::new();
        assert_eq!(skeleton.count_beams(), 0);
        assert_eq!(skeleton.count_leaves(), 0);
        assert_eq!(skeleton.bounds(), None);
    }

    #[test]
    fn bounds_are_inflated_by_radius() {
        let mut skeleton = Skeleton::new();
        skeleton.push_beam(Beam {
            start: Vec3::ZERO,
            start_radius: 1.0,
            end: Vec3::new(10.0, 0.0, 0.0),
            end_radius: 0.5,
        });
        skeleton.push_leaf(Leaf {
            pos: Vec3::new(10.0, 4.0, 0.0),
            radius: 2.0,
        });

        let (lo, hi) = skeleton.bounds().unwrap();

        // Left edge comes from the beam start, padded by its radius.
        assert_eq!(lo, Vec3::new(-1.0, -1.0, -1.0));
        // Right and top edges come from the leaf sphere.
        assert_eq!(hi, Vec3::new(12.0, 6.0, 2.0));
    }
}
