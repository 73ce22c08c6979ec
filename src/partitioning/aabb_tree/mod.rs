//! A static binary AABB tree over user-supplied geometric primitives.

pub use self::hint::HintIndex;
pub use self::traits::{TreePrimitive, TreeQuery};
pub use self::tree::{AabbTree, BuildError, QueryError};
pub use self::visitors::{
    AnyIntersectionVisitor, AnyPrimitiveVisitor, CountingVisitor, ListIntersectionsVisitor,
    ListPrimitivesVisitor, NearestVisitor,
};

mod build;
mod hint;
mod traits;
mod traversal;
mod tree;
mod visitors;

#[cfg(test)]
mod aabb_tree_tests;
