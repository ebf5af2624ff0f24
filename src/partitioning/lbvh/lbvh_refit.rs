use super::lbvh_morton::MortonKey;
use super::LbvhNode;
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real, DIM};
use crate::utils::parallel;
use std::sync::atomic::{AtomicU32, Ordering};

#[cfg(feature = "f32")]
type AtomicReal = std::sync::atomic::AtomicU32;
#[cfg(feature = "f64")]
type AtomicReal = std::sync::atomic::AtomicU64;

static_assertions::assert_eq_size!(AtomicReal, Real);

/// An AABB that can be written by one thread and read by another.
///
/// Each coordinate is stored as the bits of a `Real` in a relaxed atomic. Loads and stores are
/// not synchronized by themselves: a store must be published to the reader through some other
/// release/acquire pair (here, the arrival counters of the bottom-up propagation).
#[derive(Default)]
pub(super) struct AtomicAabb {
    mins: [AtomicReal; DIM],
    maxs: [AtomicReal; DIM],
}

impl AtomicAabb {
    #[inline]
    pub fn store(&self, aabb: &Aabb) {
        for i in 0..DIM {
            self.mins[i].store(aabb.mins[i].to_bits(), Ordering::Relaxed);
            self.maxs[i].store(aabb.maxs[i].to_bits(), Ordering::Relaxed);
        }
    }

    #[inline]
    pub fn load(&self) -> Aabb {
        let mins = Point::<Real>::from(std::array::from_fn(|i| {
            Real::from_bits(self.mins[i].load(Ordering::Relaxed))
        }));
        let maxs = Point::<Real>::from(std::array::from_fn(|i| {
            Real::from_bits(self.maxs[i].load(Ordering::Relaxed))
        }));
        Aabb::new(mins, maxs)
    }
}

/// The buffers read and written by the bottom-up propagation of the AABBs.
pub(super) struct RefitContext<'a> {
    /// The primitive AABBs given to the build.
    pub aabbs: &'a [Aabb],
    /// The primitive keys, sorted in Morton order.
    pub keys: &'a [MortonKey],
    /// The children of each internal node.
    pub children: &'a [[u32; 2]],
    /// The parent of each node (internal and leaf).
    pub parents: &'a [AtomicU32],
    /// One arrival counter per internal node, all initialized to zero.
    pub arrivals: &'a [AtomicU32],
    /// The AABB of each internal node, written by the propagation.
    pub internal_aabbs: &'a [AtomicAabb],
}

impl RefitContext<'_> {
    #[inline]
    fn num_internal_nodes(&self) -> usize {
        self.children.len()
    }

    /// The AABB of the node `id`.
    ///
    /// For internal nodes, this must only be called after the node's AABB was published.
    #[inline]
    fn node_aabb(&self, id: u32) -> Aabb {
        let id = id as usize;
        if id < self.num_internal_nodes() {
            self.internal_aabbs[id].load()
        } else {
            let primitive = self.keys[id - self.num_internal_nodes()].primitive;
            self.aabbs[primitive as usize]
        }
    }

    /// Computes the AABB of every internal node, bottom-up.
    ///
    /// One worker starts at each leaf and climbs toward the root. At each internal node the
    /// worker increments the node's arrival counter: the first worker to arrive stops there,
    /// and the second one (which knows both children are complete) merges the children's
    /// AABBs into the node before continuing with the parent. Each internal node is thus
    /// merged exactly once, after both of its children.
    pub fn propagate(&self) {
        let num_internal = self.num_internal_nodes();

        parallel::par_for_each(self.keys.len(), |sorted_pos| {
            let leaf_id = num_internal + sorted_pos;
            let mut curr = self.parents[leaf_id].load(Ordering::Relaxed);

            while curr != LbvhNode::NO_PARENT {
                let id = curr as usize;

                // The release half publishes the AABB of the child we come from (written at
                // the previous iteration) and the acquire half makes the sibling’s AABB
                // visible if we are the second to arrive.
                if self.arrivals[id].fetch_add(1, Ordering::AcqRel) == 0 {
                    return;
                }

                let [left, right] = self.children[id];
                let aabb = self.node_aabb(left).merged(&self.node_aabb(right));
                self.internal_aabbs[id].store(&aabb);
                curr = self.parents[id].load(Ordering::Relaxed);
            }
        });
    }
}
