use super::lbvh_morton::{self, MortonKey};
use super::lbvh_refit::{AtomicAabb, RefitContext};
use super::{Lbvh, LbvhBuildError, LbvhNode, LbvhWorkspace, MAX_PRIMITIVES};
use crate::bounding_volume::Aabb;
use crate::utils::parallel;
use std::sync::atomic::{AtomicU32, Ordering};

/// Clears `buffer` and makes room for `len` elements, without aborting on allocation failure.
fn reset_buffer<T>(
    buffer: &mut Vec<T>,
    len: usize,
    name: &'static str,
) -> Result<(), LbvhBuildError> {
    buffer.clear();
    buffer
        .try_reserve_exact(len)
        .map_err(|_| LbvhBuildError::AllocationFailed { buffer: name, len })
}

/// The length of the common prefix of the keys `i` and `j`, or `-1` if `j` is out of bounds.
#[inline(always)]
fn delta(keys: &[MortonKey], i: usize, j: isize) -> i64 {
    if j < 0 || j >= keys.len() as isize {
        -1
    } else {
        keys[i].common_prefix_len(&keys[j as usize]) as i64
    }
}

/// The range of sorted keys covered by the internal node `i`, as `(first, last)`.
fn determine_range(keys: &[MortonKey], i: usize) -> (usize, usize) {
    if i == 0 {
        return (0, keys.len() - 1);
    }

    let ii = i as isize;
    let l_delta = delta(keys, i, ii - 1);
    let r_delta = delta(keys, i, ii + 1);

    // Keys are unique, so the two deltas always differ.
    let (d, delta_min) = if r_delta > l_delta {
        (1, l_delta)
    } else {
        (-1, r_delta)
    };

    let mut l_max: isize = 2;
    while delta(keys, i, ii + l_max * d) > delta_min {
        l_max <<= 1;
    }

    let mut l = 0;
    let mut t = l_max >> 1;
    while t > 0 {
        if delta(keys, i, ii + (l + t) * d) > delta_min {
            l += t;
        }
        t >>= 1;
    }

    let j = (ii + l * d) as usize;
    if d < 0 {
        (j, i)
    } else {
        (i, j)
    }
}

/// The position `gamma` in `first..last` such that the keys `first..=gamma` and
/// `gamma + 1..=last` are the two halves of the range split at its highest differing bit.
fn find_split(keys: &[MortonKey], first: usize, last: usize) -> usize {
    let first_key = &keys[first];
    let common_prefix = first_key.common_prefix_len(&keys[last]);

    let mut split = first;
    let mut stride = last - first;

    loop {
        stride = (stride + 1) >> 1;
        let new_split = split + stride;

        if new_split < last && first_key.common_prefix_len(&keys[new_split]) > common_prefix {
            split = new_split;
        }

        if stride <= 1 {
            break;
        }
    }

    split
}

impl Lbvh {
    /// Builds a tree over the given primitive AABBs.
    ///
    /// The `i`-th element of `aabbs` is the primitive with index `i`, which is what the queries
    /// report. The AABBs must have finite coordinates: NaN or infinite values don’t cause
    /// undefined behavior but the resulting tree is unspecified.
    ///
    /// Building from an empty slice succeeds and yields an empty tree.
    pub fn build(aabbs: &[Aabb]) -> Result<Self, LbvhBuildError> {
        Self::build_with_workspace(aabbs, &mut LbvhWorkspace::default())
    }

    /// Builds a tree over the AABBs yielded by `aabbs`, indexed in iteration order.
    #[allow(clippy::should_implement_trait)] // This is fallible, so it can’t be `FromIterator`.
    pub fn from_iter(aabbs: impl IntoIterator<Item = Aabb>) -> Result<Self, LbvhBuildError> {
        let aabbs: Vec<_> = aabbs.into_iter().collect();
        Self::build(&aabbs)
    }

    /// Builds a tree over the given primitive AABBs, reusing the buffers of `workspace`.
    ///
    /// This is equivalent to [`Lbvh::build`], but keeping the same workspace from one build to
    /// the next avoids reallocating all the temporary buffers every time.
    pub fn build_with_workspace(
        aabbs: &[Aabb],
        workspace: &mut LbvhWorkspace,
    ) -> Result<Self, LbvhBuildError> {
        let num_primitives = aabbs.len();

        if num_primitives > MAX_PRIMITIVES {
            log::warn!(
                "LBVH build rejected: {} primitives exceed the maximum of {}.",
                num_primitives,
                MAX_PRIMITIVES
            );
            return Err(LbvhBuildError::TooManyPrimitives {
                count: num_primitives,
                max: MAX_PRIMITIVES,
            });
        }

        if num_primitives == 0 {
            log::debug!("built an empty LBVH.");
            return Ok(Self::new());
        }

        let num_internal = num_primitives - 1;
        let num_nodes = num_internal + num_primitives;

        Self::reset_workspace(workspace, num_primitives)?;

        let scene = lbvh_morton::scene_aabb(aabbs);
        log::trace!("LBVH scene AABB: {:?}.", scene);

        lbvh_morton::compute_keys(aabbs, &scene, &mut workspace.keys);
        parallel::par_sort_unstable(&mut workspace.keys);
        log::trace!("sorted {} Morton keys.", num_primitives);

        if num_primitives > 1 {
            let keys = &workspace.keys;
            let parents = &workspace.parents;
            parallel::par_for_each_mut(&mut workspace.children, |i, children| {
                let (first, last) = determine_range(keys, i);
                let gamma = find_split(keys, first, last);

                let left = if gamma == first {
                    num_internal + gamma
                } else {
                    gamma
                };
                let right = if gamma + 1 == last {
                    num_internal + gamma + 1
                } else {
                    gamma + 1
                };

                *children = [left as u32, right as u32];
                parents[left].store(i as u32, Ordering::Relaxed);
                parents[right].store(i as u32, Ordering::Relaxed);
            });
            log::trace!("built the topology of {} internal nodes.", num_internal);
        }

        let refit = RefitContext {
            aabbs,
            keys: &workspace.keys,
            children: &workspace.children,
            parents: &workspace.parents,
            arrivals: &workspace.arrivals,
            internal_aabbs: &workspace.internal_aabbs,
        };
        refit.propagate();
        log::trace!("propagated the AABBs of {} internal nodes.", num_internal);

        let mut result = Self::new();
        reset_buffer(&mut result.nodes, num_nodes, "nodes")?;
        reset_buffer(&mut result.sorted_primitives, num_primitives, "sorted primitives")?;

        let LbvhWorkspace {
            keys,
            children,
            parents,
            internal_aabbs,
            ..
        } = &*workspace;
        parallel::par_extend(&mut result.nodes, num_nodes, |id| {
            let parent = parents[id].load(Ordering::Relaxed);
            if id < num_internal {
                let [left, right] = children[id];
                LbvhNode::Internal {
                    aabb: internal_aabbs[id].load(),
                    parent,
                    left,
                    right,
                }
            } else {
                let primitive = keys[id - num_internal].primitive;
                LbvhNode::Leaf {
                    aabb: aabbs[primitive as usize],
                    parent,
                    primitive,
                }
            }
        });
        parallel::par_extend(&mut result.sorted_primitives, num_primitives, |i| {
            keys[i].primitive
        });

        log::debug!(
            "built an LBVH with {} primitives and {} internal nodes, scene AABB: {:?}.",
            num_primitives,
            num_internal,
            scene
        );

        Ok(result)
    }

    fn reset_workspace(
        workspace: &mut LbvhWorkspace,
        num_primitives: usize,
    ) -> Result<(), LbvhBuildError> {
        let num_internal = num_primitives - 1;
        let num_nodes = num_internal + num_primitives;

        reset_buffer(&mut workspace.keys, num_primitives, "keys")?;
        reset_buffer(&mut workspace.children, num_internal, "children")?;
        reset_buffer(&mut workspace.parents, num_nodes, "parents")?;
        reset_buffer(&mut workspace.arrivals, num_internal, "arrival counters")?;
        reset_buffer(&mut workspace.internal_aabbs, num_internal, "internal AABBs")?;

        workspace.children.resize(num_internal, [0; 2]);
        parallel::par_extend(&mut workspace.parents, num_nodes, |_| {
            AtomicU32::new(LbvhNode::NO_PARENT)
        });
        parallel::par_extend(&mut workspace.arrivals, num_internal, |_| {
            AtomicU32::new(0)
        });
        parallel::par_extend(&mut workspace.internal_aabbs, num_internal, |_| {
            AtomicAabb::default()
        });

        Ok(())
    }
}
