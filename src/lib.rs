/*!
lbvh3d
========

**lbvh3d** builds linear bounding-volume hierarchies (LBVH) over sets of
axis-aligned bounding boxes and answers overlap and nearest-neighbor queries on
them. Trees are built from scratch in parallel (Morton-code sorting followed by
a Karras radix-tree construction) and are immutable once built, so any number
of queries can run concurrently on the same snapshot.

```
# #[cfg(all(feature = "dim3", feature = "f32"))] {
use lbvh3d::bounding_volume::Aabb;
use lbvh3d::partitioning::Lbvh;
use nalgebra::Point3;

let aabbs = [
    Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)),
    Aabb::new(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0)),
    Aabb::new(Point3::new(2.0, 2.0, 2.0), Point3::new(2.0, 2.0, 2.0)),
];
let bvh = Lbvh::build(&aabbs).unwrap();

assert_eq!(bvh.query_nearest(&Point3::new(2.0, 2.0, 2.0), 1), vec![(2, 0.0)]);
assert_eq!(bvh.query_overlap(&aabbs[0]), vec![0]);
# }
```
*/

#![deny(non_camel_case_types)]
#![deny(unused_parens)]
#![deny(non_upper_case_globals)]
#![deny(unused_results)]
#![warn(missing_docs)]
#![warn(unused_imports)]
#![allow(clippy::module_inception)]
#![allow(clippy::manual_range_contains)] // This usually makes it way more verbose that it could be.

#[cfg(not(feature = "dim3"))]
std::compile_error!("Only 3D trees are supported: the `dim3` feature must be enabled.");
#[cfg(all(feature = "f32", feature = "f64"))]
std::compile_error!("The `f32` and `f64` features are mutually exclusive.");

#[cfg_attr(test, macro_use)]
extern crate approx;
extern crate num_traits as num;

pub extern crate nalgebra as na;

pub mod bounding_volume;
pub mod partitioning;
pub mod utils;

mod real {
    /// The scalar type used throughout this crate.
    #[cfg(feature = "f64")]
    pub use f64 as Real;

    /// The scalar type used throughout this crate.
    #[cfg(feature = "f32")]
    pub use f32 as Real;
}

/// Compilation flags dependent aliases for mathematical types.
pub mod math {
    pub use super::real::*;
    pub use na::{Point3, Vector3};

    /// The dimension of the space.
    pub const DIM: usize = 3;

    /// The point type.
    pub use Point3 as Point;

    /// The vector type.
    pub use Vector3 as Vector;
}
