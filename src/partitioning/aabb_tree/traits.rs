use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};

/// Geometric capabilities a primitive must expose to be indexed by an
/// [`AabbTree`](crate::partitioning::AabbTree).
///
/// The tree itself never computes geometry: every primitive-dependent
/// operation is delegated to this trait, which makes the tree usable with
/// segments, triangles, or any other primitive kind without change.
pub trait TreePrimitive {
    /// The axis-aligned bounding box of this primitive.
    fn aabb(&self) -> Aabb;

    /// A point guaranteed to lie on this primitive.
    ///
    /// Reference points seed the nearest-point search and populate the
    /// default hint index.
    fn reference_point(&self) -> Point<Real>;

    /// Refines the current best candidate of a nearest-point search.
    ///
    /// Returns the point of this primitive closest to `query` if it is closer
    /// to `query` than `best`, and `best` unchanged otherwise.
    fn closest_point(&self, query: &Point<Real>, best: &Point<Real>) -> Point<Real>;
}

/// Intersection predicates between one query object type and the indexed
/// primitives.
///
/// Implement this for each query type (ray, box, plane, …) that must be
/// testable against primitives of type `P`.
pub trait TreeQuery<P> {
    /// The intersection object computed against a single primitive.
    type Intersection;

    /// Does this query intersect the given bounding box?
    fn intersects_aabb(&self, aabb: &Aabb) -> bool;

    /// Does this query intersect the given primitive?
    fn intersects_primitive(&self, primitive: &P) -> bool;

    /// Computes the intersection between this query and the given primitive,
    /// if there is one.
    fn intersection(&self, primitive: &P) -> Option<Self::Intersection>;
}
