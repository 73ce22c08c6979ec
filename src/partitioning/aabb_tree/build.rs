use log::debug;

use super::traits::TreePrimitive;
use super::tree::{AabbTree, BuildError, NodeChild, PrimitiveEntry, TreeNode};
use crate::bounding_volume::{Aabb, BoundingVolume};

impl<P: TreePrimitive> AabbTree<P> {
    /// Fills an empty tree with the given primitives.
    ///
    /// Storage for the primitive entries and the internal nodes is reserved
    /// fallibly; on reservation failure the tree is left untouched (empty).
    pub(super) fn build_into(
        &mut self,
        primitives: impl IntoIterator<Item = P>,
    ) -> Result<(), BuildError> {
        debug_assert!(self.is_empty(), "build_into requires an empty tree");

        let primitives = primitives.into_iter();
        let mut entries: Vec<PrimitiveEntry<P>> = Vec::new();
        try_reserve(&mut entries, primitives.size_hint().0)?;

        for geometry in primitives {
            if entries.len() == entries.capacity() {
                // The size hint undershot; grow fallibly as well.
                try_reserve(&mut entries, 1)?;
            }

            entries.push(PrimitiveEntry {
                aabb: geometry.aabb(),
                reference_point: geometry.reference_point(),
                geometry,
            });
        }

        let mut nodes: Vec<TreeNode> = Vec::new();

        if entries.len() > 1 {
            try_reserve(&mut nodes, entries.len() - 1)?;

            // The median splits permute this permutation, never the store
            // itself, so a primitive's id is its insertion position.
            let mut indices: Vec<u32> = Vec::new();
            try_reserve(&mut indices, entries.len())?;
            indices.extend(0..entries.len() as u32);

            let _ = expand(&mut nodes, &entries, &mut indices);
        }

        debug!(
            "built AABB tree over {} primitives ({} internal nodes)",
            entries.len(),
            nodes.len()
        );

        self.primitives = entries;
        self.nodes = nodes;
        Ok(())
    }
}

fn try_reserve<T>(buffer: &mut Vec<T>, additional: usize) -> Result<(), BuildError> {
    buffer
        .try_reserve(additional)
        .map_err(|source| BuildError::Allocation {
            requested: additional,
            source,
        })
}

/// Recursively partitions `indices` (a sub-range of the id permutation) and
/// records the internal nodes covering it.
///
/// The sub-range is split at the median of the primitives' box centers along
/// the axis of greatest extent of the sub-range's merged bounding box, so
/// both halves are always non-empty and the recursion depth stays
/// logarithmic. Nodes are pushed parent-first, which places the root at
/// index 0.
fn expand<P>(
    nodes: &mut Vec<TreeNode>,
    entries: &[PrimitiveEntry<P>],
    indices: &mut [u32],
) -> NodeChild {
    if let [id] = *indices {
        return NodeChild::Primitive(id);
    }

    let aabb = indices.iter().fold(Aabb::new_invalid(), |merged, id| {
        merged.merged(&entries[*id as usize].aabb)
    });
    let axis = aabb.extents().imax();
    let mid = indices.len() / 2;
    let _ = indices.select_nth_unstable_by(mid, |a, b| {
        entries[*a as usize].aabb.center()[axis]
            .total_cmp(&entries[*b as usize].aabb.center()[axis])
    });

    let id = nodes.len();
    // Children are patched in once both subtrees are expanded.
    nodes.push(TreeNode {
        aabb,
        left: NodeChild::Primitive(u32::MAX),
        right: NodeChild::Primitive(u32::MAX),
    });

    let (left_indices, right_indices) = indices.split_at_mut(mid);
    let left = expand(nodes, entries, left_indices);
    let right = expand(nodes, entries, right_indices);

    let node = &mut nodes[id];
    node.left = left;
    node.right = right;
    NodeChild::Node(id as u32)
}
