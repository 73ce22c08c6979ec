use std::collections::TryReserveError;

use log::debug;
use na;

use super::hint::HintIndex;
use super::traits::{TreePrimitive, TreeQuery};
use super::visitors::{
    AnyIntersectionVisitor, AnyPrimitiveVisitor, CountingVisitor, ListIntersectionsVisitor,
    ListPrimitivesVisitor, NearestVisitor,
};
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};

/// Error indicating that the construction of an [`AabbTree`] failed.
///
/// Construction failures are recoverable: the tree is left empty and a later
/// [`AabbTree::rebuild`] may be attempted.
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    /// The storage backing the tree nodes or the primitive store could not be
    /// allocated.
    #[error("failed to reserve storage for {requested} elements of the AABB tree")]
    Allocation {
        /// The number of elements whose storage could not be reserved.
        requested: usize,
        /// The underlying reservation error.
        #[source]
        source: TryReserveError,
    },
}

/// Error indicating that a query was issued against an [`AabbTree`] in a
/// state that cannot answer it.
///
/// These are usage errors, not data errors: they signal a broken caller
/// precondition rather than a property of the indexed geometry.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum QueryError {
    /// A query was issued against an empty tree.
    #[error("query issued against an empty AABB tree")]
    EmptyTree,
}

/// One indexed primitive together with its precomputed bounding data.
///
/// The bounding box and reference point are computed once at insertion so
/// that construction and traversal never re-derive them from the geometry.
pub(super) struct PrimitiveEntry<P> {
    pub geometry: P,
    pub aabb: Aabb,
    pub reference_point: Point<Real>,
}

/// Reference to one child of an internal tree node.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum NodeChild {
    /// Index of an internal node in the node array.
    Node(u32),
    /// Index of a primitive in the primitive store (a leaf).
    Primitive(u32),
}

/// An internal node: the bounding box of its whole subtree plus two children.
pub(super) struct TreeNode {
    pub aabb: Aabb,
    pub left: NodeChild,
    pub right: NodeChild,
}

/// A static bounding-volume hierarchy over a set of geometric primitives.
///
/// The tree is built once from a set of primitives and answers intersection
/// and distance queries without scanning every primitive. Primitives are
/// identified by their position (`u32`) in the primitive store; identities
/// are stable until the next [`AabbTree::rebuild`] or [`AabbTree::clear`].
///
/// All geometric predicates are delegated to the [`TreePrimitive`] and
/// [`TreeQuery`] implementations supplied by the caller.
pub struct AabbTree<P> {
    pub(super) primitives: Vec<PrimitiveEntry<P>>,
    // Exactly `primitives.len() - 1` internal nodes, with the root at
    // index 0. Empty when the tree holds fewer than two primitives.
    pub(super) nodes: Vec<TreeNode>,
    hint_index: Option<HintIndex>,
}

impl<P> Default for AabbTree<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> AabbTree<P> {
    /// An empty tree.
    ///
    /// Every query on an empty tree fails with [`QueryError::EmptyTree`].
    pub fn new() -> Self {
        Self {
            primitives: Vec::new(),
            nodes: Vec::new(),
            hint_index: None,
        }
    }

    /// Empties this tree, dropping the primitive store, the nodes, and the
    /// hint index.
    pub fn clear(&mut self) {
        self.primitives.clear();
        self.nodes.clear();
        self.hint_index = None;
    }

    /// The number of indexed primitives.
    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    /// Does this tree contain no primitive?
    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    /// The bounding box of everything contained by this tree, or `None` if
    /// the tree is empty.
    pub fn bbox(&self) -> Option<Aabb> {
        if self.primitives.is_empty() {
            None
        } else if self.nodes.is_empty() {
            Some(self.primitives[0].aabb)
        } else {
            Some(self.nodes[0].aabb)
        }
    }

    /// The depth of this tree: `0` when empty, `1` for a single primitive,
    /// and the length of the longest root-to-leaf path otherwise.
    pub fn depth(&self) -> u32 {
        if self.primitives.is_empty() {
            0
        } else if self.nodes.is_empty() {
            1
        } else {
            self.child_depth(NodeChild::Node(0))
        }
    }

    fn child_depth(&self, child: NodeChild) -> u32 {
        match child {
            NodeChild::Primitive(_) => 1,
            NodeChild::Node(id) => {
                let node = &self.nodes[id as usize];
                1 + self.child_depth(node.left).max(self.child_depth(node.right))
            }
        }
    }

    /// The primitive stored at position `id`, if any.
    ///
    /// Positions are the identifiers returned by the enumeration and
    /// nearest-primitive queries.
    pub fn primitive(&self, id: u32) -> Option<&P> {
        self.primitives.get(id as usize).map(|entry| &entry.geometry)
    }

    /// Has a hint index been built for this tree?
    pub fn has_hint_index(&self) -> bool {
        self.hint_index.is_some()
    }

    /// Drops the hint index, if any.
    ///
    /// Subsequent distance queries fall back to an arbitrary reference point
    /// as their starting guess until a new hint index is built.
    pub fn clear_hint_index(&mut self) {
        self.hint_index = None;
    }

    /// Builds the hint index from a caller-supplied set of seed points.
    ///
    /// Each point must lie on the primitive whose id it is paired with. The
    /// previous hint index, if any, is dropped first.
    pub fn build_hint_index_with_points(
        &mut self,
        points: impl IntoIterator<Item = (Point<Real>, u32)>,
    ) -> Result<(), QueryError> {
        if self.is_empty() {
            return Err(QueryError::EmptyTree);
        }

        let index = HintIndex::from_points(points);
        debug!(
            "built hint index over {} caller-supplied seed points",
            index.len()
        );
        self.hint_index = Some(index);
        Ok(())
    }

    /// Checks if any indexed primitive intersects `query`.
    pub fn intersects<Q: TreeQuery<P>>(&self, query: &Q) -> Result<bool, QueryError> {
        let mut visitor = AnyPrimitiveVisitor::new();
        self.traverse(query, &mut visitor)?;
        Ok(visitor.result().is_some())
    }

    /// The number of primitives intersecting `query`.
    pub fn count_intersected_primitives<Q: TreeQuery<P>>(
        &self,
        query: &Q,
    ) -> Result<usize, QueryError> {
        let mut visitor = CountingVisitor::new();
        self.traverse(query, &mut visitor)?;
        Ok(visitor.count())
    }

    /// The ids of all primitives intersecting `query`, in traversal order.
    pub fn intersected_primitives<Q: TreeQuery<P>>(
        &self,
        query: &Q,
    ) -> Result<Vec<u32>, QueryError> {
        let mut visitor = ListPrimitivesVisitor::new();
        self.traverse(query, &mut visitor)?;
        Ok(visitor.into_ids())
    }

    /// All intersection objects between `query` and the indexed primitives,
    /// each paired with the id of the intersected primitive.
    pub fn intersections<Q: TreeQuery<P>>(
        &self,
        query: &Q,
    ) -> Result<Vec<(Q::Intersection, u32)>, QueryError> {
        let mut visitor = ListIntersectionsVisitor::new();
        self.traverse(query, &mut visitor)?;
        Ok(visitor.into_intersections())
    }

    /// The id of one primitive intersecting `query`, if any.
    ///
    /// "One" is whichever intersecting primitive the fixed left-then-right
    /// traversal order reaches first, not the closest one.
    pub fn any_intersected_primitive<Q: TreeQuery<P>>(
        &self,
        query: &Q,
    ) -> Result<Option<u32>, QueryError> {
        let mut visitor = AnyPrimitiveVisitor::new();
        self.traverse(query, &mut visitor)?;
        Ok(visitor.result())
    }

    /// One intersection object between `query` and an indexed primitive,
    /// paired with the primitive's id, if any.
    ///
    /// As with [`AabbTree::any_intersected_primitive`], "one" is
    /// traversal-order dependent.
    pub fn any_intersection<Q: TreeQuery<P>>(
        &self,
        query: &Q,
    ) -> Result<Option<(Q::Intersection, u32)>, QueryError> {
        let mut visitor = AnyIntersectionVisitor::new();
        self.traverse(query, &mut visitor)?;
        Ok(visitor.into_result())
    }
}

impl<P: TreePrimitive> AabbTree<P> {
    /// Builds a tree indexing the given primitives.
    ///
    /// Primitive ids are assigned by the construction and returned by the
    /// enumeration and nearest-primitive queries.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Allocation`] if the node or primitive storage
    /// could not be allocated. The resulting tree would be empty.
    pub fn from_primitives(
        primitives: impl IntoIterator<Item = P>,
    ) -> Result<Self, BuildError> {
        let mut result = Self::new();
        result.build_into(primitives)?;
        Ok(result)
    }

    /// Empties this tree, then rebuilds it over the given primitives.
    ///
    /// All previously returned primitive ids are invalidated, and the hint
    /// index, if any, is dropped.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::Allocation`] if the new storage could not be
    /// allocated; the tree is left empty in that case, never partially
    /// built.
    pub fn rebuild(&mut self, primitives: impl IntoIterator<Item = P>) -> Result<(), BuildError> {
        self.clear();
        self.build_into(primitives)
    }

    /// Builds the hint index from the indexed primitives' own reference
    /// points.
    ///
    /// This is equivalent to calling
    /// [`AabbTree::build_hint_index_with_points`] with every primitive's
    /// reference point paired with its id.
    pub fn build_hint_index(&mut self) -> Result<(), QueryError> {
        if self.is_empty() {
            return Err(QueryError::EmptyTree);
        }

        let index = HintIndex::from_points(
            self.primitives
                .iter()
                .enumerate()
                .map(|(id, entry)| (entry.reference_point, id as u32)),
        );
        debug!("built hint index over {} reference points", index.len());
        self.hint_index = Some(index);
        Ok(())
    }

    /// A plausible starting guess for a nearest-point search from `query`:
    /// a nearby point lying on an indexed primitive, paired with that
    /// primitive's id.
    ///
    /// Delegates to the hint index when one has been built, and falls back
    /// to the first primitive's reference point otherwise. The quality of
    /// the hint only affects how much of the tree the search visits, never
    /// the final answer.
    pub fn best_hint(&self, query: &Point<Real>) -> Result<(Point<Real>, u32), QueryError> {
        if self.is_empty() {
            return Err(QueryError::EmptyTree);
        }

        if let Some(hint) = self.hint_index.as_ref().and_then(|index| index.nearest(query)) {
            Ok(hint)
        } else {
            Ok((self.primitives[0].reference_point, 0))
        }
    }

    /// The point on the indexed primitives closest to `query`.
    pub fn closest_point(&self, query: &Point<Real>) -> Result<Point<Real>, QueryError> {
        let (hint, hint_id) = self.best_hint(query)?;
        Ok(self.nearest(query, hint, hint_id)?.best_point())
    }

    /// The point on the indexed primitives closest to `query`, starting the
    /// search from the caller-supplied `hint`.
    ///
    /// `hint` must lie on one of the indexed primitives.
    pub fn closest_point_with_hint(
        &self,
        query: &Point<Real>,
        hint: &Point<Real>,
    ) -> Result<Point<Real>, QueryError> {
        Ok(self.nearest(query, *hint, 0)?.best_point())
    }

    /// The id of the primitive closest to `query`.
    pub fn closest_primitive(&self, query: &Point<Real>) -> Result<u32, QueryError> {
        let (hint, hint_id) = self.best_hint(query)?;
        Ok(self.nearest(query, hint, hint_id)?.best_primitive())
    }

    /// The id of the primitive closest to `query`, starting the search from
    /// the caller-supplied `hint`.
    ///
    /// `hint` must lie on one of the indexed primitives. The search does not
    /// know which one: if no indexed primitive improves on `hint` (that is,
    /// `hint` already is the exact closest point), the reported id falls back
    /// to primitive `0`, which `hint` may not lie on. Use
    /// [`AabbTree::closest_primitive`] with a hint index built when a
    /// consistent id is needed in that case.
    pub fn closest_primitive_with_hint(
        &self,
        query: &Point<Real>,
        hint: &Point<Real>,
    ) -> Result<u32, QueryError> {
        Ok(self.nearest(query, *hint, 0)?.best_primitive())
    }

    /// The point on the indexed primitives closest to `query`, paired with
    /// the id of the primitive it lies on.
    pub fn closest_point_and_primitive(
        &self,
        query: &Point<Real>,
    ) -> Result<(Point<Real>, u32), QueryError> {
        let (hint, hint_id) = self.best_hint(query)?;
        let visitor = self.nearest(query, hint, hint_id)?;
        Ok((visitor.best_point(), visitor.best_primitive()))
    }

    /// Same as [`AabbTree::closest_point_and_primitive`] with a
    /// caller-supplied starting guess.
    ///
    /// `hint` must lie on one of the indexed primitives. As with
    /// [`AabbTree::closest_primitive_with_hint`], when no indexed primitive
    /// improves on `hint` the reported point is `hint` itself and the
    /// reported id falls back to primitive `0`, which `hint` may not lie on.
    pub fn closest_point_and_primitive_with_hint(
        &self,
        query: &Point<Real>,
        hint: &Point<Real>,
    ) -> Result<(Point<Real>, u32), QueryError> {
        let visitor = self.nearest(query, *hint, 0)?;
        Ok((visitor.best_point(), visitor.best_primitive()))
    }

    /// The squared distance between `query` and the closest indexed
    /// primitive.
    pub fn squared_distance(&self, query: &Point<Real>) -> Result<Real, QueryError> {
        let closest = self.closest_point(query)?;
        Ok(na::distance_squared(query, &closest))
    }

    /// Same as [`AabbTree::squared_distance`] with a caller-supplied
    /// starting guess.
    pub fn squared_distance_with_hint(
        &self,
        query: &Point<Real>,
        hint: &Point<Real>,
    ) -> Result<Real, QueryError> {
        let closest = self.closest_point_with_hint(query, hint)?;
        Ok(na::distance_squared(query, &closest))
    }

    fn nearest(
        &self,
        query: &Point<Real>,
        hint: Point<Real>,
        hint_id: u32,
    ) -> Result<NearestVisitor, QueryError> {
        let mut visitor = NearestVisitor::new(query, hint, hint_id);
        self.traverse(query, &mut visitor)?;
        Ok(visitor)
    }
}
