use na;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::tree::NodeChild;
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real, Vector};
use crate::partitioning::{AabbTree, QueryError, TreePrimitive, TreeQuery};

#[derive(Clone, Debug)]
struct Block(Aabb);

impl TreePrimitive for Block {
    fn aabb(&self) -> Aabb {
        self.0
    }

    fn reference_point(&self) -> Point<Real> {
        self.0.center()
    }

    fn closest_point(&self, query: &Point<Real>, best: &Point<Real>) -> Point<Real> {
        let candidate = self.0.project_local_point(query);
        if na::distance_squared(query, &candidate) < na::distance_squared(query, best) {
            candidate
        } else {
            *best
        }
    }
}

struct BlockQuery(Aabb);

impl TreeQuery<Block> for BlockQuery {
    type Intersection = Aabb;

    fn intersects_aabb(&self, aabb: &Aabb) -> bool {
        self.0.intersects(aabb)
    }

    fn intersects_primitive(&self, primitive: &Block) -> bool {
        self.0.intersects(&primitive.0)
    }

    fn intersection(&self, primitive: &Block) -> Option<Aabb> {
        self.0.intersects(&primitive.0).then(|| {
            Aabb::new(
                self.0.mins.sup(&primitive.0.mins),
                self.0.maxs.inf(&primitive.0.maxs),
            )
        })
    }
}

fn random_block(rng: &mut StdRng) -> Block {
    let center = Point::new(
        rng.gen_range(-10.0..10.0),
        rng.gen_range(-10.0..10.0),
        rng.gen_range(-10.0..10.0),
    );
    let half_extents = Vector::new(
        rng.gen_range(0.1..1.0),
        rng.gen_range(0.1..1.0),
        rng.gen_range(0.1..1.0),
    );
    Block(Aabb::from_half_extents(center, half_extents))
}

fn check_subtree(
    tree: &AabbTree<Block>,
    child: NodeChild,
    parent_aabb: Option<&Aabb>,
    seen: &mut [bool],
) {
    match child {
        NodeChild::Primitive(id) => {
            let entry = &tree.primitives[id as usize];
            if let Some(parent) = parent_aabb {
                assert!(
                    parent.contains(&entry.aabb),
                    "leaf {} escapes its parent's box",
                    id
                );
            }
            assert!(!seen[id as usize], "primitive {} appears in two leaves", id);
            seen[id as usize] = true;
        }
        NodeChild::Node(id) => {
            let node = &tree.nodes[id as usize];
            if let Some(parent) = parent_aabb {
                assert!(
                    parent.contains(&node.aabb),
                    "node {} escapes its parent's box",
                    id
                );
            }
            check_subtree(tree, node.left, Some(&node.aabb), seen);
            check_subtree(tree, node.right, Some(&node.aabb), seen);
        }
    }
}

fn assert_well_formed(tree: &AabbTree<Block>) {
    let n = tree.len();

    if n <= 1 {
        assert!(tree.nodes.is_empty(), "degenerate trees store no node");
        return;
    }

    assert_eq!(tree.nodes.len(), n - 1, "wrong internal node count");

    let mut seen = vec![false; n];
    check_subtree(tree, NodeChild::Node(0), None, &mut seen);
    assert!(
        seen.iter().all(|found| *found),
        "some primitive is missing from the leaves"
    );
}

#[test]
fn build_satisfies_containment_and_partition_invariants() {
    let mut rng = StdRng::seed_from_u64(42);

    for len in 1..=100 {
        let blocks: Vec<_> = (0..len).map(|_| random_block(&mut rng)).collect();
        let tree = AabbTree::from_primitives(blocks).unwrap();

        assert_eq!(tree.len(), len);
        assert_well_formed(&tree);
    }
}

#[test]
fn depth_is_logarithmic() {
    let mut rng = StdRng::seed_from_u64(7);

    for len in [2usize, 3, 4, 5, 31, 32, 33, 200] {
        let blocks: Vec<_> = (0..len).map(|_| random_block(&mut rng)).collect();
        let tree = AabbTree::from_primitives(blocks).unwrap();

        // A median split is balanced: ceil(log2(len)) + 1 levels.
        let bound = len.next_power_of_two().trailing_zeros() + 1;
        assert!(
            tree.depth() <= bound,
            "tree over {} primitives has depth {} > {}",
            len,
            tree.depth(),
            bound
        );
    }
}

#[test]
fn empty_tree_rejects_every_query() {
    let tree: AabbTree<Block> = AabbTree::from_primitives(std::iter::empty()).unwrap();

    assert!(tree.is_empty());
    assert_eq!(tree.len(), 0);
    assert_eq!(tree.bbox(), None);
    assert_eq!(tree.depth(), 0);

    let query = BlockQuery(Aabb::from_half_extents(Point::origin(), Vector::repeat(1.0)));
    assert_eq!(tree.intersects(&query), Err(QueryError::EmptyTree));
    assert_eq!(
        tree.count_intersected_primitives(&query),
        Err(QueryError::EmptyTree)
    );
    assert_eq!(
        tree.closest_point(&Point::origin()),
        Err(QueryError::EmptyTree)
    );
    assert_eq!(tree.best_hint(&Point::origin()), Err(QueryError::EmptyTree));

    let mut tree = tree;
    assert_eq!(tree.build_hint_index(), Err(QueryError::EmptyTree));
}

#[test]
fn single_primitive_tree_degenerates_correctly() {
    let block = Block(Aabb::from_half_extents(Point::origin(), Vector::repeat(1.0)));
    let tree = AabbTree::from_primitives([block.clone()]).unwrap();

    assert_eq!(tree.len(), 1);
    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.bbox(), Some(block.0));

    let hit = BlockQuery(Aabb::from_half_extents(
        Point::new(0.5, 0.0, 0.0),
        Vector::repeat(1.0),
    ));
    let miss = BlockQuery(Aabb::from_half_extents(
        Point::new(5.0, 0.0, 0.0),
        Vector::repeat(1.0),
    ));
    assert_eq!(tree.intersects(&hit), Ok(true));
    assert_eq!(tree.intersects(&miss), Ok(false));
    assert_eq!(tree.count_intersected_primitives(&hit), Ok(1));
    assert_eq!(tree.intersected_primitives(&hit), Ok(vec![0]));

    let query = Point::new(3.0, 0.0, 0.0);
    assert_eq!(tree.closest_point(&query), Ok(Point::new(1.0, 0.0, 0.0)));
    assert_eq!(tree.closest_primitive(&query), Ok(0));
    assert_eq!(tree.squared_distance(&query), Ok(4.0));
}

#[test]
fn enumeration_queries_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(1234);
    let blocks: Vec<_> = (0..200).map(|_| random_block(&mut rng)).collect();
    let tree = AabbTree::from_primitives(blocks.clone()).unwrap();

    for _ in 0..50 {
        let query = BlockQuery(random_block(&mut rng).0);

        let mut expected: Vec<u32> = blocks
            .iter()
            .enumerate()
            .filter(|(_, block)| query.intersects_primitive(block))
            .map(|(id, _)| id as u32)
            .collect();

        let mut ids = tree.intersected_primitives(&query).unwrap();
        ids.sort_unstable();
        expected.sort_unstable();

        assert_eq!(ids, expected);
        assert_eq!(
            tree.count_intersected_primitives(&query).unwrap(),
            expected.len()
        );
        assert_eq!(tree.intersects(&query).unwrap(), !expected.is_empty());
        assert_eq!(
            tree.any_intersected_primitive(&query)
                .unwrap()
                .map(|id| expected.contains(&id)),
            (!expected.is_empty()).then_some(true)
        );
        assert_eq!(tree.intersections(&query).unwrap().len(), expected.len());
    }
}

#[test]
fn primitive_ids_are_insertion_positions() {
    let mut rng = StdRng::seed_from_u64(2121);
    let blocks: Vec<_> = (0..200).map(|_| random_block(&mut rng)).collect();
    let tree = AabbTree::from_primitives(blocks.clone()).unwrap();

    for (id, block) in blocks.iter().enumerate() {
        // The store keeps insertion order even though the median splits
        // permute the leaves.
        assert_eq!(
            tree.primitive(id as u32).map(|prim| prim.aabb()),
            Some(block.aabb())
        );

        // A query box equal to the primitive's own box must report its id.
        let ids = tree.intersected_primitives(&BlockQuery(block.0)).unwrap();
        assert!(
            ids.contains(&(id as u32)),
            "primitive {} reported under another id",
            id
        );
    }
}

#[test]
fn rebuild_preserves_answers_and_drops_the_hint_index() {
    let mut rng = StdRng::seed_from_u64(99);
    let blocks: Vec<_> = (0..64).map(|_| random_block(&mut rng)).collect();

    let mut tree = AabbTree::from_primitives(blocks.clone()).unwrap();
    tree.build_hint_index().unwrap();
    assert!(tree.has_hint_index());

    let queries: Vec<_> = (0..20).map(|_| random_block(&mut rng).0).collect();
    let points: Vec<_> = (0..20)
        .map(|_| {
            Point::new(
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
                rng.gen_range(-15.0..15.0),
            )
        })
        .collect();

    let bbox_before = tree.bbox();
    let counts_before: Vec<_> = queries
        .iter()
        .map(|q| tree.count_intersected_primitives(&BlockQuery(*q)).unwrap())
        .collect();
    let distances_before: Vec<_> = points
        .iter()
        .map(|p| tree.squared_distance(p).unwrap())
        .collect();

    tree.rebuild(blocks).unwrap();

    assert!(!tree.has_hint_index(), "rebuild must drop the hint index");
    assert_eq!(tree.bbox(), bbox_before);

    let counts_after: Vec<_> = queries
        .iter()
        .map(|q| tree.count_intersected_primitives(&BlockQuery(*q)).unwrap())
        .collect();
    let distances_after: Vec<_> = points
        .iter()
        .map(|p| tree.squared_distance(p).unwrap())
        .collect();

    assert_eq!(counts_before, counts_after);
    assert_eq!(distances_before, distances_after);
}

#[test]
fn clear_empties_the_tree() {
    let mut rng = StdRng::seed_from_u64(3);
    let blocks: Vec<_> = (0..16).map(|_| random_block(&mut rng)).collect();

    let mut tree = AabbTree::from_primitives(blocks).unwrap();
    tree.build_hint_index().unwrap();

    tree.clear();

    assert!(tree.is_empty());
    assert!(!tree.has_hint_index());
    assert_eq!(tree.bbox(), None);
    assert_eq!(
        tree.closest_point(&Point::origin()),
        Err(QueryError::EmptyTree)
    );
}
