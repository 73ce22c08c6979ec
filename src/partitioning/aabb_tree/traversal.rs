use smallvec::SmallVec;

use super::tree::{AabbTree, NodeChild, QueryError};
use crate::partitioning::visitor::TreeVisitor;

// Enough for a depth-first walk of a balanced binary tree over more
// than 2^32 primitives.
const TRAVERSAL_STACK_SIZE: usize = 32;

impl<P> AabbTree<P> {
    /// Walks this tree depth-first, letting `visitor` prune subtrees and
    /// collect results from the leaf primitives it reaches.
    ///
    /// Children are processed left-then-right, so which of several
    /// equally-good results an early-stopping visitor reports is fixed by
    /// this order. Leaf primitives are visited without a bounding-box test:
    /// their parent's admissibility check already gated them.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::EmptyTree`] if the tree contains no primitive.
    pub fn traverse<Q, V: TreeVisitor<Q, P>>(
        &self,
        query: &Q,
        visitor: &mut V,
    ) -> Result<(), QueryError> {
        if self.primitives.is_empty() {
            return Err(QueryError::EmptyTree);
        }

        if self.nodes.is_empty() {
            // Single-primitive tree: the lone primitive acts as the root.
            if visitor.search_further() {
                visitor.visit(query, 0, &self.primitives[0].geometry);
            }
            return Ok(());
        }

        let mut stack: SmallVec<[u32; TRAVERSAL_STACK_SIZE]> = SmallVec::new();
        let mut curr = 0u32;

        'walk: loop {
            let node = &self.nodes[curr as usize];
            let mut next = None;

            for child in [node.left, node.right] {
                if !visitor.search_further() {
                    break 'walk;
                }

                match child {
                    NodeChild::Primitive(id) => {
                        visitor.visit(query, id, &self.primitives[id as usize].geometry);
                    }
                    NodeChild::Node(id) => {
                        if visitor.admissible(query, &self.nodes[id as usize].aabb) {
                            if next.is_none() {
                                next = Some(id);
                            } else {
                                stack.push(id);
                            }
                        }
                    }
                }
            }

            match next.or_else(|| stack.pop()) {
                Some(id) => curr = id,
                None => break,
            }
        }

        Ok(())
    }
}
