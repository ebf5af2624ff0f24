use super::{Lbvh, LbvhNode};
use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use ordered_float::OrderedFloat;
use std::collections::BinaryHeap;

/// The `k` best candidates found so far, with the worst one on top.
struct Candidates {
    k: usize,
    heap: BinaryHeap<(OrderedFloat<Real>, u32)>,
}

impl Candidates {
    fn new(k: usize) -> Self {
        Self {
            k,
            heap: BinaryHeap::with_capacity(k),
        }
    }

    /// The squared distance a subtree must beat to contain a better candidate, or `None` while
    /// fewer than `k` candidates were found.
    #[inline]
    fn worst(&self) -> Option<Real> {
        if self.heap.len() == self.k {
            self.heap.peek().map(|(dist, _)| dist.0)
        } else {
            None
        }
    }

    #[inline]
    fn offer(&mut self, dist: Real, primitive: u32) {
        let candidate = (OrderedFloat(dist), primitive);

        if self.heap.len() < self.k {
            self.heap.push(candidate);
        } else if let Some(mut worst) = self.heap.peek_mut() {
            if candidate < *worst {
                *worst = candidate;
            }
        }
    }

    fn into_sorted_vec(self) -> Vec<(u32, Real)> {
        self.heap
            .into_sorted_vec()
            .into_iter()
            .map(|(dist, primitive)| (primitive, dist.0))
            .collect()
    }
}

impl Lbvh {
    /// The `k` primitives whose AABBs are the closest to `point`.
    ///
    /// Returns up to `k` pairs `(primitive, squared_distance)` where `squared_distance` is the
    /// squared distance between `point` and the primitive’s AABB (zero if `point` is inside of
    /// it). The pairs are sorted by increasing distance, then by primitive index. The result
    /// contains `min(k, self.len())` elements and is empty if `k == 0`.
    ///
    /// When several primitives are at the same distance as the `k`-th result, which ones are
    /// kept depends only on the tree, so it is the same for identical inputs.
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
    ///     Aabb::new(Point3::new(3.0, 0.0, 0.0), Point3::new(4.0, 1.0, 1.0)),
    /// ];
    /// let bvh = Lbvh::build(&aabbs).unwrap();
    ///
    /// let nearest = bvh.query_nearest(&Point3::new(2.0, 0.5, 0.5), 2);
    /// assert_eq!(nearest, vec![(0, 1.0), (2, 1.0)]);
    /// # }
    /// ```
    pub fn query_nearest(&self, point: &Point<Real>, k: usize) -> Vec<(u32, Real)> {
        self.nearest_search(point, k, true, |_, aabb| aabb.mindist(point))
    }

    /// The `k` primitives closest to `point`, according to a custom distance.
    ///
    /// `leaf_distance(primitive)` must return the exact squared distance between `point` and the
    /// primitive. It must never be smaller than the squared distance between `point` and the
    /// primitive’s AABB, otherwise closer primitives might be missed.
    ///
    /// The result follows the same rules as [`Lbvh::query_nearest`], with distances as returned
    /// by `leaf_distance`.
    pub fn query_nearest_with(
        &self,
        point: &Point<Real>,
        k: usize,
        leaf_distance: impl Fn(u32) -> Real,
    ) -> Vec<(u32, Real)> {
        // A primitive doesn’t necessarily touch the faces of its AABB, so the MINMAXDIST bound
        // only holds with box distances.
        self.nearest_search(point, k, false, |primitive, _| leaf_distance(primitive))
    }

    /// The primitive whose AABB is the closest to `point`, with its squared distance.
    ///
    /// This is `None` only if the tree is empty.
    pub fn nearest(&self, point: &Point<Real>) -> Option<(u32, Real)> {
        self.query_nearest(point, 1).first().copied()
    }

    fn nearest_search(
        &self,
        point: &Point<Real>,
        k: usize,
        use_minmaxdist: bool,
        leaf_distance: impl Fn(u32, &Aabb) -> Real,
    ) -> Vec<(u32, Real)> {
        let Some(root) = self.root() else {
            return vec![];
        };
        if k == 0 {
            return vec![];
        }

        let k = k.min(self.len());
        let mut candidates = Candidates::new(k);
        // Upper bound of the nearest distance, from the MINMAXDIST of the visited nodes.
        let mut provisional = Real::MAX;
        let tighten = use_minmaxdist && k == 1;

        let mut stack = Self::traversal_stack::<(u32, Real)>();
        stack.push((0, root.aabb().mindist(point)));

        while let Some((id, mindist)) = stack.pop() {
            if candidates.worst().is_some_and(|worst| mindist >= worst) {
                continue;
            }
            // Strict comparison: the primitive achieving the bound is exactly at `provisional`.
            if tighten && mindist > provisional {
                continue;
            }

            match &self.nodes[id as usize] {
                LbvhNode::Leaf {
                    aabb, primitive, ..
                } => {
                    let dist = leaf_distance(*primitive, aabb);
                    candidates.offer(dist, *primitive);
                }
                LbvhNode::Internal { left, right, .. } => {
                    let left_aabb = self.nodes[*left as usize].aabb();
                    let right_aabb = self.nodes[*right as usize].aabb();

                    if tighten {
                        provisional = provisional
                            .min(left_aabb.minmaxdist(point))
                            .min(right_aabb.minmaxdist(point));
                    }

                    let mut near = (*left, left_aabb.mindist(point));
                    let mut far = (*right, right_aabb.mindist(point));
                    if far.1 < near.1 {
                        std::mem::swap(&mut near, &mut far);
                    }

                    // The nearest child is pushed last so it is popped first.
                    stack.push(far);
                    stack.push(near);
                }
            }
        }

        candidates.into_sorted_vec()
    }
}
