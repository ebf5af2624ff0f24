use super::{Lbvh, LbvhNode};
use crate::bounding_volume::BoundingVolume;

impl Lbvh {
    /// Counts the number of leaves that can be reached from the node with id `id`.
    ///
    /// This is mostly a utility for debugging.
    pub fn reachable_leaf_count(&self, id: u32) -> u32 {
        match self.node(id) {
            None => 0,
            Some(LbvhNode::Leaf { .. }) => 1,
            Some(LbvhNode::Internal { left, right, .. }) => {
                self.reachable_leaf_count(*left) + self.reachable_leaf_count(*right)
            }
        }
    }

    /// Panics if the tree isn’t well-formed.
    ///
    /// The tree is well-formed if:
    /// - it has `2n - 1` nodes for `n` primitives, internal nodes first,
    /// - every node except the root is the child of exactly one internal node, and its parent
    ///   link points back to that node,
    /// - every primitive is referenced by exactly one leaf, consistently with
    ///   [`Lbvh::sorted_primitives`],
    /// - the AABB of every internal node is exactly the union of the AABBs of its children.
    pub fn assert_well_formed(&self) {
        let num_primitives = self.len();

        if num_primitives == 0 {
            assert!(self.nodes.is_empty());
            return;
        }

        let num_internal = self.num_internal_nodes();
        assert_eq!(self.nodes.len(), 2 * num_primitives - 1);
        assert_eq!(self.nodes[0].parent(), None, "the root must not have a parent");

        let mut seen_nodes = vec![false; self.nodes.len()];
        let mut seen_primitives = vec![false; num_primitives];
        seen_nodes[0] = true;

        for (id, node) in self.nodes.iter().enumerate() {
            debug_assert!(
                node.aabb().mins.iter().all(|x| x.is_finite())
                    && node.aabb().maxs.iter().all(|x| x.is_finite()),
                "node {} has a non-finite AABB: {:?}",
                id,
                node.aabb()
            );

            match node {
                LbvhNode::Leaf { primitive, .. } => {
                    assert!(id >= num_internal, "leaf {} is in the internal range", id);
                    assert_eq!(self.sorted_primitives[id - num_internal], *primitive);
                    let seen = &mut seen_primitives[*primitive as usize];
                    assert!(!*seen, "primitive {} is in multiple leaves", primitive);
                    *seen = true;
                }
                LbvhNode::Internal {
                    aabb, left, right, ..
                } => {
                    assert!(id < num_internal, "internal node {} is in the leaf range", id);

                    for child in [*left, *right] {
                        let seen = &mut seen_nodes[child as usize];
                        assert!(!*seen, "node {} has multiple parents", child);
                        *seen = true;
                        assert_eq!(self.nodes[child as usize].parent(), Some(id as u32));
                    }

                    let left_aabb = self.nodes[*left as usize].aabb();
                    let right_aabb = self.nodes[*right as usize].aabb();
                    assert_eq!(*aabb, left_aabb.merged(right_aabb));
                }
            }
        }

        assert!(seen_nodes.iter().all(|seen| *seen));
        assert!(seen_primitives.iter().all(|seen| *seen));
        assert_eq!(self.reachable_leaf_count(0), num_primitives as u32);
    }
}
