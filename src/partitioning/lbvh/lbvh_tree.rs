use super::lbvh_morton::MortonKey;
use super::lbvh_refit::AtomicAabb;
use crate::bounding_volume::Aabb;
use std::sync::atomic::AtomicU32;

/// The maximum number of primitives a single [`Lbvh`] can index.
///
/// A tree with `n` primitives has `2n - 1` nodes addressed by `u32` ids, and the id
/// [`LbvhNode::NO_PARENT`] is reserved.
pub const MAX_PRIMITIVES: usize = (u32::MAX / 2) as usize;

/// A node (leaf or internal) of an [`Lbvh`].
///
/// Nodes reference each other through their ids, i.e., their index in [`Lbvh::nodes`].
/// Internal nodes always occupy the ids `0..n - 1` and leaves the ids `n - 1..2n - 1`, where
/// `n` is the number of primitives of the tree.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LbvhNode {
    /// A leaf, bounding a single primitive.
    Leaf {
        /// The AABB of the primitive.
        aabb: Aabb,
        /// The id of the parent node, or [`LbvhNode::NO_PARENT`] if this leaf is the root.
        parent: u32,
        /// The index of the primitive in the slice given at construction time.
        primitive: u32,
    },
    /// An internal node with exactly two children.
    Internal {
        /// The union of the AABBs of all the primitives of this node's subtree.
        aabb: Aabb,
        /// The id of the parent node, or [`LbvhNode::NO_PARENT`] if this node is the root.
        parent: u32,
        /// The id of the left child.
        left: u32,
        /// The id of the right child.
        right: u32,
    },
}

impl LbvhNode {
    /// The parent id of the root node.
    pub const NO_PARENT: u32 = u32::MAX;

    /// The AABB of this node.
    #[inline(always)]
    pub fn aabb(&self) -> &Aabb {
        match self {
            Self::Leaf { aabb, .. } | Self::Internal { aabb, .. } => aabb,
        }
    }

    /// The id of this node's parent, or `None` if this is the root.
    #[inline(always)]
    pub fn parent(&self) -> Option<u32> {
        let parent = match self {
            Self::Leaf { parent, .. } | Self::Internal { parent, .. } => *parent,
        };
        (parent != Self::NO_PARENT).then_some(parent)
    }

    /// Is this node a leaf?
    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// The primitive index of this node if it is a leaf.
    #[inline(always)]
    pub fn leaf_data(&self) -> Option<u32> {
        match self {
            Self::Leaf { primitive, .. } => Some(*primitive),
            Self::Internal { .. } => None,
        }
    }

    /// The ids of the left and right children of this node if it is an internal node.
    #[inline(always)]
    pub fn children(&self) -> Option<[u32; 2]> {
        match self {
            Self::Leaf { .. } => None,
            Self::Internal { left, right, .. } => Some([*left, *right]),
        }
    }
}

/// Workspace data for building trees.
///
/// This is all temporary data that can be freed at any time without affecting results.
/// The main reason to reuse the same instance of this over time (e.g. once per simulation
/// step) is to lower costs of internal allocations.
#[derive(Default)]
pub struct LbvhWorkspace {
    pub(super) keys: Vec<MortonKey>,
    pub(super) children: Vec<[u32; 2]>,
    pub(super) parents: Vec<AtomicU32>,
    pub(super) arrivals: Vec<AtomicU32>,
    pub(super) internal_aabbs: Vec<AtomicAabb>,
}

impl LbvhWorkspace {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Frees all the memory held by this workspace.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A linear bounding-volume hierarchy over a set of AABBs.
///
/// The tree is built in one go from a slice of AABBs (see [`Lbvh::build`]) and is immutable
/// afterward. When the primitives move, a new tree is built from scratch and replaces this
/// one; see [`SharedLbvh`](super::SharedLbvh) for publishing new trees while queries are still
/// running on the old ones.
///
/// All queries take `&self`, so any number of them can run concurrently on the same tree.
#[derive(Clone, Debug, Default)]
pub struct Lbvh {
    pub(super) nodes: Vec<LbvhNode>,
    // Maps a leaf's position in Morton order to its primitive index.
    pub(super) sorted_primitives: Vec<u32>,
}

static_assertions::assert_impl_all!(Lbvh: Send, Sync);

impl Lbvh {
    /// An empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// The number of primitives (i.e. leaves) of this tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.sorted_primitives.len()
    }

    /// Does this tree not contain any leaf?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The number of internal nodes of this tree.
    ///
    /// This is `len() - 1`, or zero for an empty tree.
    #[inline]
    pub fn num_internal_nodes(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// All the nodes of this tree, indexed by node id.
    #[inline]
    pub fn nodes(&self) -> &[LbvhNode] {
        &self.nodes
    }

    /// The node with the given id.
    #[inline]
    pub fn node(&self, id: u32) -> Option<&LbvhNode> {
        self.nodes.get(id as usize)
    }

    /// The root of this tree, if it isn't empty.
    ///
    /// The root always has the id `0`. If the tree contains a single primitive, the root is
    /// its leaf.
    #[inline]
    pub fn root(&self) -> Option<&LbvhNode> {
        self.nodes.first()
    }

    /// The AABB bounding everything contained by this tree.
    ///
    /// Returns [`Aabb::new_invalid`] if the tree is empty.
    pub fn root_aabb(&self) -> Aabb {
        self.root()
            .map(|root| *root.aabb())
            .unwrap_or_else(Aabb::new_invalid)
    }

    /// The primitive indices sorted along the Morton curve.
    ///
    /// The `i`-th element is the primitive of the `i`-th leaf, i.e., of the node with id
    /// `num_internal_nodes() + i`.
    #[inline]
    pub fn sorted_primitives(&self) -> &[u32] {
        &self.sorted_primitives
    }

    /// The AABB the primitive `primitive` was given at construction time.
    ///
    /// This is a linear search over the leaves.
    pub fn leaf_aabb(&self, primitive: u32) -> Option<&Aabb> {
        let pos = self.sorted_primitives.iter().position(|p| *p == primitive)?;
        Some(self.nodes[self.leaf_id(pos) as usize].aabb())
    }

    /// The node id of the leaf at position `sorted_pos` in Morton order.
    #[inline(always)]
    pub(super) fn leaf_id(&self, sorted_pos: usize) -> u32 {
        (self.num_internal_nodes() + sorted_pos) as u32
    }
}
