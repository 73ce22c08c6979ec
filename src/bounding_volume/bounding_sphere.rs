//! Bounding sphere.

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use na;

/// A Bounding Sphere.
///
/// During nearest-point searches on an
/// [`AabbTree`](crate::partitioning::AabbTree), a bounding sphere centered at
/// the query point and passing through the current best candidate bounds the
/// region that may still contain a better answer: any subtree whose AABB lies
/// entirely outside of the sphere can be pruned.
#[derive(Debug, PartialEq, Copy, Clone)]
pub struct BoundingSphere {
    /// The center of this bounding sphere.
    pub center: Point<Real>,
    /// The radius of this bounding sphere.
    pub radius: Real,
}

impl BoundingSphere {
    /// Creates a new bounding sphere.
    pub fn new(center: Point<Real>, radius: Real) -> BoundingSphere {
        BoundingSphere { center, radius }
    }

    /// Creates the sphere centered at `center` with `point` on its boundary.
    pub fn containing(center: Point<Real>, point: &Point<Real>) -> BoundingSphere {
        BoundingSphere::new(center, na::distance(&center, point))
    }

    /// The bounding sphere center.
    #[inline]
    pub fn center(&self) -> &Point<Real> {
        &self.center
    }

    /// The bounding sphere radius.
    #[inline]
    pub fn radius(&self) -> Real {
        self.radius
    }

    /// Does this sphere intersect the given AABB?
    #[inline]
    pub fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        aabb.distance_to_local_point_squared(&self.center) <= self.radius * self.radius
    }
}
