use super::{Lbvh, LbvhNode};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real};

impl Lbvh {
    /// Iterates through all the primitives whose AABB intersects `aabb`.
    ///
    /// AABBs touching on their boundary are considered intersecting. Each primitive is yielded at
    /// most once, in no particular order.
    pub fn intersect_aabb<'a>(&'a self, aabb: &'a Aabb) -> impl Iterator<Item = u32> + 'a {
        self.leaves(|node: &LbvhNode| node.aabb().intersects(aabb))
    }

    /// Iterates through all the primitives whose AABB contains `point`.
    pub fn intersect_point<'a>(&'a self, point: &'a Point<Real>) -> impl Iterator<Item = u32> + 'a {
        self.leaves(|node: &LbvhNode| node.aabb().contains_local_point(point))
    }

    /// The indices of all the primitives whose AABB intersects `aabb`, in no particular order.
    ///
    /// # Example
    ///
    /// ```
    /// # #[cfg(all(feature = "dim3", feature = "f32"))] {
    /// use lbvh3d::bounding_volume::Aabb;
    /// use lbvh3d::partitioning::Lbvh;
    /// use nalgebra::Point3;
    ///
    /// let aabbs = [
    ///     Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)),
    ///     Aabb::new(Point3::new(5.0, 5.0, 5.0), Point3::new(6.0, 6.0, 6.0)),
    ///     Aabb::new(Point3::new(1.0, 1.0, 1.0), Point3::new(2.0, 2.0, 2.0)),
    /// ];
    /// let bvh = Lbvh::build(&aabbs).unwrap();
    ///
    /// let mut hits = bvh.query_overlap(&aabbs[0]);
    /// hits.sort();
    /// assert_eq!(hits, vec![0, 2]);
    /// # }
    /// ```
    pub fn query_overlap(&self, aabb: &Aabb) -> Vec<u32> {
        let mut result = vec![];
        self.query_overlap_into(aabb, &mut result);
        result
    }

    /// Appends to `out` the indices of all the primitives whose AABB intersects `aabb`.
    ///
    /// `out` isn’t cleared first.
    pub fn query_overlap_into(&self, aabb: &Aabb, out: &mut Vec<u32>) {
        out.extend(self.intersect_aabb(aabb));
    }

    /// Writes to `out` the indices of the primitives whose AABB intersects `aabb`, stopping
    /// once `out` is full.
    ///
    /// Returns the total number of intersecting primitives, which may be larger than
    /// `out.len()`. In that case only the first `out.len()` results found were written and the
    /// query can be run again with a larger buffer.
    pub fn query_overlap_bounded(&self, aabb: &Aabb, out: &mut [u32]) -> usize {
        let mut count = 0;

        for primitive in self.intersect_aabb(aabb) {
            if let Some(slot) = out.get_mut(count) {
                *slot = primitive;
            }
            count += 1;
        }

        count
    }
}
