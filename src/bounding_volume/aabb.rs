//! Axis Aligned Bounding Box.

use crate::bounding_volume::BoundingVolume;
use crate::math::{Point, Real, Vector};
use na;
use num::Bounded;

/// An Axis Aligned Bounding Box.
///
/// An AABB is the simplest bounding volume, defined by its minimum and
/// maximum corners. Its edges are always parallel to the coordinate axes,
/// which makes intersection and inclusion tests very cheap. It is the
/// bounding volume stored on every node of an
/// [`AabbTree`](crate::partitioning::AabbTree).
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with the smallest coordinates of this AABB.
    pub mins: Point<Real>,
    /// The point with the greatest coordinates of this AABB.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB.
    ///
    /// `mins` must be componentwise smaller than or equal to `maxs`.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with `mins` components all set to `Real::MAX` and
    /// `maxs` components all set to `-Real::MAX`.
    ///
    /// This is often used as the initial values of some AABB merging algorithms
    /// (including the tree construction): merging it with any other AABB yields
    /// that other AABB.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::max_value()).into(),
            Vector::repeat(-Real::max_value()).into(),
        )
    }

    /// Creates a new AABB from its center and its half extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates a new AABB that tightly encloses a set of points.
    pub fn from_points<I>(pts: I) -> Self
    where
        I: IntoIterator<Item = Point<Real>>,
    {
        let mut result = Self::new_invalid();

        for pt in pts {
            result.mins = result.mins.inf(&pt);
            result.maxs = result.maxs.sup(&pt);
        }

        result
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        let half: Real = na::convert::<f64, Real>(0.5);
        (self.maxs - self.mins) * half
    }

    /// The extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// Does this AABB contain the given point?
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        na::partial_le(&self.mins, point) && na::partial_ge(&self.maxs, point)
    }

    /// The point of this AABB closest to the given point.
    ///
    /// Returns `point` itself if it is inside of this AABB.
    #[inline]
    pub fn project_local_point(&self, point: &Point<Real>) -> Point<Real> {
        point.sup(&self.mins).inf(&self.maxs)
    }

    /// The squared distance between the given point and this AABB.
    ///
    /// Returns `0.0` if the point is inside of this AABB.
    #[inline]
    pub fn distance_to_local_point_squared(&self, point: &Point<Real>) -> Real {
        let mins_pt = self.mins - point;
        let pt_maxs = point - self.maxs;
        mins_pt.sup(&pt_maxs).sup(&na::zero()).norm_squared()
    }
}

impl BoundingVolume for Aabb {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.center()
    }

    #[inline]
    fn intersects(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }

    #[inline]
    fn contains(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.mins) && na::partial_ge(&self.maxs, &other.maxs)
    }

    #[inline]
    fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    #[inline]
    fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }
}
