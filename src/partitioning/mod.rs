//! Spatial partitioning tools.

pub use self::aabb_tree::{
    AabbTree, AnyIntersectionVisitor, AnyPrimitiveVisitor, BuildError, CountingVisitor, HintIndex,
    ListIntersectionsVisitor, ListPrimitivesVisitor, NearestVisitor, QueryError, TreePrimitive,
    TreeQuery,
};
pub use self::visitor::TreeVisitor;

pub mod aabb_tree;
mod visitor;
