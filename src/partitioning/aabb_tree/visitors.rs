//! The traversal visitors backing the tree's query surface.
//!
//! Each visitor is a small state machine over the [`TreeVisitor`] contract;
//! all geometric tests are delegated to the [`TreeQuery`] and
//! [`TreePrimitive`] predicates, so the visitors themselves are pure
//! orchestration and work for any primitive kind.

use super::traits::{TreePrimitive, TreeQuery};
use crate::bounding_volume::{Aabb, BoundingSphere};
use crate::math::{Point, Real};
use crate::partitioning::visitor::TreeVisitor;

/// Stops at the first primitive found to intersect the query.
///
/// Backs both the existence test and the "any intersected primitive" query.
pub struct AnyPrimitiveVisitor {
    found: Option<u32>,
}

impl AnyPrimitiveVisitor {
    /// Creates a visitor with no result recorded yet.
    pub fn new() -> Self {
        Self { found: None }
    }

    /// The id of the intersecting primitive found, if any.
    pub fn result(&self) -> Option<u32> {
        self.found
    }
}

impl Default for AnyPrimitiveVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q, P> TreeVisitor<Q, P> for AnyPrimitiveVisitor
where
    Q: TreeQuery<P>,
{
    fn search_further(&self) -> bool {
        self.found.is_none()
    }

    fn admissible(&self, query: &Q, aabb: &Aabb) -> bool {
        query.intersects_aabb(aabb)
    }

    fn visit(&mut self, query: &Q, id: u32, primitive: &P) {
        if self.found.is_none() && query.intersects_primitive(primitive) {
            self.found = Some(id);
        }
    }
}

/// Stops at the first intersection object that can be computed.
pub struct AnyIntersectionVisitor<R> {
    found: Option<(R, u32)>,
}

impl<R> AnyIntersectionVisitor<R> {
    /// Creates a visitor with no result recorded yet.
    pub fn new() -> Self {
        Self { found: None }
    }

    /// The computed intersection and the id of the intersected primitive,
    /// if any.
    pub fn into_result(self) -> Option<(R, u32)> {
        self.found
    }
}

impl<R> Default for AnyIntersectionVisitor<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q, P> TreeVisitor<Q, P> for AnyIntersectionVisitor<Q::Intersection>
where
    Q: TreeQuery<P>,
{
    fn search_further(&self) -> bool {
        self.found.is_none()
    }

    fn admissible(&self, query: &Q, aabb: &Aabb) -> bool {
        query.intersects_aabb(aabb)
    }

    fn visit(&mut self, query: &Q, id: u32, primitive: &P) {
        if self.found.is_none() {
            if let Some(intersection) = query.intersection(primitive) {
                self.found = Some((intersection, id));
            }
        }
    }
}

/// Counts the primitives intersecting the query.
pub struct CountingVisitor {
    count: usize,
}

impl CountingVisitor {
    /// Creates a visitor with a zeroed counter.
    pub fn new() -> Self {
        Self { count: 0 }
    }

    /// The number of intersecting primitives counted.
    pub fn count(&self) -> usize {
        self.count
    }
}

impl Default for CountingVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q, P> TreeVisitor<Q, P> for CountingVisitor
where
    Q: TreeQuery<P>,
{
    fn admissible(&self, query: &Q, aabb: &Aabb) -> bool {
        query.intersects_aabb(aabb)
    }

    fn visit(&mut self, query: &Q, _id: u32, primitive: &P) {
        if query.intersects_primitive(primitive) {
            self.count += 1;
        }
    }
}

/// Collects the ids of every primitive intersecting the query.
pub struct ListPrimitivesVisitor {
    ids: Vec<u32>,
}

impl ListPrimitivesVisitor {
    /// Creates a visitor with an empty output.
    pub fn new() -> Self {
        Self { ids: Vec::new() }
    }

    /// The collected primitive ids, in traversal order.
    pub fn into_ids(self) -> Vec<u32> {
        self.ids
    }
}

impl Default for ListPrimitivesVisitor {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q, P> TreeVisitor<Q, P> for ListPrimitivesVisitor
where
    Q: TreeQuery<P>,
{
    fn admissible(&self, query: &Q, aabb: &Aabb) -> bool {
        query.intersects_aabb(aabb)
    }

    fn visit(&mut self, query: &Q, id: u32, primitive: &P) {
        if query.intersects_primitive(primitive) {
            self.ids.push(id);
        }
    }
}

/// Collects every computable intersection object, paired with the id of the
/// intersected primitive.
pub struct ListIntersectionsVisitor<R> {
    intersections: Vec<(R, u32)>,
}

impl<R> ListIntersectionsVisitor<R> {
    /// Creates a visitor with an empty output.
    pub fn new() -> Self {
        Self {
            intersections: Vec::new(),
        }
    }

    /// The collected intersections, in traversal order.
    pub fn into_intersections(self) -> Vec<(R, u32)> {
        self.intersections
    }
}

impl<R> Default for ListIntersectionsVisitor<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Q, P> TreeVisitor<Q, P> for ListIntersectionsVisitor<Q::Intersection>
where
    Q: TreeQuery<P>,
{
    fn admissible(&self, query: &Q, aabb: &Aabb) -> bool {
        query.intersects_aabb(aabb)
    }

    fn visit(&mut self, query: &Q, id: u32, primitive: &P) {
        if let Some(intersection) = query.intersection(primitive) {
            self.intersections.push((intersection, id));
        }
    }
}

/// Branch-and-bound nearest-point search.
///
/// The visitor maintains the best candidate point found so far and a
/// bounding sphere centered at the query passing through that candidate.
/// Subtrees whose AABB does not intersect the sphere cannot contain a closer
/// point and are pruned; every improvement shrinks the sphere, tightening
/// the bound for the rest of the walk. The search never stops early: pruning
/// happens through admissibility alone.
pub struct NearestVisitor {
    best_point: Point<Real>,
    best_primitive: u32,
    sphere: BoundingSphere,
}

impl NearestVisitor {
    /// Creates a visitor seeded with a starting guess.
    ///
    /// `hint` must lie on the primitive with id `hint_primitive` so that the
    /// reported primitive stays consistent with the reported point even when
    /// no visited primitive improves on the guess.
    pub fn new(query: &Point<Real>, hint: Point<Real>, hint_primitive: u32) -> Self {
        Self {
            best_point: hint,
            best_primitive: hint_primitive,
            sphere: BoundingSphere::containing(*query, &hint),
        }
    }

    /// The closest point found.
    pub fn best_point(&self) -> Point<Real> {
        self.best_point
    }

    /// The id of the primitive the closest point lies on.
    pub fn best_primitive(&self) -> u32 {
        self.best_primitive
    }
}

impl<P: TreePrimitive> TreeVisitor<Point<Real>, P> for NearestVisitor {
    fn admissible(&self, _query: &Point<Real>, aabb: &Aabb) -> bool {
        self.sphere.intersects_aabb(aabb)
    }

    fn visit(&mut self, query: &Point<Real>, id: u32, primitive: &P) {
        let candidate = primitive.closest_point(query, &self.best_point);

        if candidate != self.best_point {
            self.best_point = candidate;
            self.best_primitive = id;
            self.sphere = BoundingSphere::containing(*query, &self.best_point);
        }
    }
}
