/*!
aabb3d
========

**aabb3d** is a static bounding-volume hierarchy (a binary AABB tree) over
3-dimensional geometric primitives, written with the Rust programming
language.

The tree indexes an immutable set of primitives once, and then answers
intersection queries (existence, counting, enumeration) as well as
nearest-point and nearest-primitive queries without scanning every
primitive. The geometric predicates themselves are supplied by the caller
through the [`partitioning::TreePrimitive`] and [`partitioning::TreeQuery`]
traits, so the same tree works for segments, triangles, or any other
primitive kind.

# Example

```rust
use aabb3d::bounding_volume::Aabb;
use aabb3d::math::{Point, Real};
use aabb3d::na;
use aabb3d::partitioning::{AabbTree, TreePrimitive};

// Index plain points: the simplest possible primitive.
#[derive(Clone)]
struct Site(Point<Real>);

impl TreePrimitive for Site {
    fn aabb(&self) -> Aabb {
        Aabb::new(self.0, self.0)
    }

    fn reference_point(&self) -> Point<Real> {
        self.0
    }

    fn closest_point(&self, query: &Point<Real>, best: &Point<Real>) -> Point<Real> {
        if na::distance_squared(query, &self.0) < na::distance_squared(query, best) {
            self.0
        } else {
            *best
        }
    }
}

let sites = vec![
    Site(Point::new(0.0, 0.0, 0.0)),
    Site(Point::new(10.0, 0.0, 0.0)),
    Site(Point::new(0.0, 10.0, 0.0)),
];

let tree = AabbTree::from_primitives(sites).unwrap();
let (point, primitive) = tree
    .closest_point_and_primitive(&Point::new(9.0, 1.0, 0.0))
    .unwrap();
assert_eq!(point, Point::new(10.0, 0.0, 0.0));
assert_eq!(primitive, 1);
```
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![deny(unused_qualifications)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(missing_copy_implementations)]

extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod partitioning;

/// Linear algebra type aliases.
pub mod math {
    /// The scalar type used throughout this crate.
    pub type Real = f64;

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use na::Point3 as Point;

    /// The vector type.
    pub use na::Vector3 as Vector;
}
