use rstar::primitives::GeomWithData;
use rstar::RTree;

use crate::math::{Point, Real};

type HintPoint = GeomWithData<[Real; 3], u32>;

/// Nearest-neighbor index over seed points, used to bootstrap the
/// branch-and-bound distance queries of an
/// [`AabbTree`](crate::partitioning::AabbTree) with a good starting guess.
///
/// The index pairs each seed point with the id of the primitive it lies on.
/// Any correct nearest-neighbor structure satisfies this role; this one is
/// an R*-tree.
pub struct HintIndex {
    points: RTree<HintPoint>,
}

impl HintIndex {
    /// Builds the index from `(point, primitive id)` pairs.
    pub fn from_points(points: impl IntoIterator<Item = (Point<Real>, u32)>) -> Self {
        let points = points
            .into_iter()
            .map(|(point, id)| GeomWithData::new([point.x, point.y, point.z], id))
            .collect();
        Self {
            points: RTree::bulk_load(points),
        }
    }

    /// The number of indexed seed points.
    pub fn len(&self) -> usize {
        self.points.size()
    }

    /// Does this index contain no seed point?
    pub fn is_empty(&self) -> bool {
        self.points.size() == 0
    }

    /// The seed point nearest to `query`, with the id of the primitive it
    /// lies on. `None` if the index is empty.
    pub fn nearest(&self, query: &Point<Real>) -> Option<(Point<Real>, u32)> {
        self.points
            .nearest_neighbor(&[query.x, query.y, query.z])
            .map(|seed| {
                let [x, y, z] = *seed.geom();
                (Point::new(x, y, z), seed.data)
            })
    }
}
