use crate::bounding_volume::Aabb;

/// Trait implemented by visitors driving the depth-first traversal of an
/// [`AabbTree`](crate::partitioning::AabbTree).
///
/// A traversal pairs a query object of type `Q` with a visitor. The visitor
/// decides which subtrees may contain a match ([`TreeVisitor::admissible`]),
/// accumulates results from the leaf primitives it reaches
/// ([`TreeVisitor::visit`]), and may stop the whole walk early
/// ([`TreeVisitor::search_further`]).
pub trait TreeVisitor<Q, P> {
    /// Global early-stop signal, checked before each subtree is descended into.
    ///
    /// Once this returns `false`, no further node or primitive is visited.
    fn search_further(&self) -> bool {
        true
    }

    /// May the subtree bounded by `aabb` contain a match for `query`?
    ///
    /// Subtrees for which this returns `false` are pruned entirely.
    fn admissible(&self, query: &Q, aabb: &Aabb) -> bool;

    /// Called once per leaf primitive reached by the traversal.
    ///
    /// `id` is the primitive's position in the tree's primitive store.
    fn visit(&mut self, query: &Q, id: u32, primitive: &P);
}
