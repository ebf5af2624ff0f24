use super::{Lbvh, LbvhNode};
use smallvec::SmallVec;

const TRAVERSAL_STACK_SIZE: usize = 32;

/// An iterator through the primitives of the leaves of an [`Lbvh`] satisfying a predicate.
///
/// Created by [`Lbvh::leaves`].
pub struct Leaves<'a, Check: Fn(&LbvhNode) -> bool> {
    tree: &'a Lbvh,
    stack: SmallVec<[&'a LbvhNode; TRAVERSAL_STACK_SIZE]>,
    check: Check,
}

impl<'a, Check: Fn(&LbvhNode) -> bool> Leaves<'a, Check> {
    fn new(tree: &'a Lbvh, check: Check) -> Leaves<'a, Check> {
        let mut stack = SmallVec::default();

        if let Some(root) = tree.root() {
            if check(root) {
                stack.push(root);
            }
        }

        Leaves { tree, stack, check }
    }
}

impl<Check: Fn(&LbvhNode) -> bool> Iterator for Leaves<'_, Check> {
    type Item = u32;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.stack.pop()?;

            let Some([left, right]) = node.children() else {
                return node.leaf_data();
            };

            let left = &self.tree.nodes[left as usize];
            let right = &self.tree.nodes[right as usize];

            // Push the right child first so the left subtree is visited first.
            if (self.check)(right) {
                self.stack.push(right);
            }
            if (self.check)(left) {
                self.stack.push(left);
            }
        }
    }
}

/// Controls the execution flow of [`Lbvh::traverse`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TraversalAction {
    /// The traversal will continue on the children of the tested node.
    Continue,
    /// The traversal will skip all descendants of the tested node.
    Prune,
    /// The traversal will exit immediately.
    EarlyExit,
}

impl Lbvh {
    #[inline(always)]
    pub(super) fn traversal_stack<T>() -> SmallVec<[T; TRAVERSAL_STACK_SIZE]> {
        Default::default()
    }

    /// Iterates through the primitives of the leaves, in depth-first order.
    ///
    /// The `check_node` closure is called on every traversed node, including the root. If it
    /// returns `false` then the node and all its descendants won’t be iterated on. This is useful
    /// for pruning whole sub-trees based on a geometric predicate on the node’s AABB.
    ///
    /// See also [`Lbvh::traverse`] which takes an [`FnMut`] closure instead of an [`Fn`].
    pub fn leaves<F: Fn(&LbvhNode) -> bool>(&self, check_node: F) -> Leaves<'_, F> {
        Leaves::new(self, check_node)
    }

    /// Traverses the tree in depth-first order with full control over the traversal.
    ///
    /// `check_node` is called on every visited node (internal nodes and leaves, starting with the
    /// root) and decides what happens next:
    /// - [`TraversalAction::Continue`]: visit this node’s children (left first), if any.
    /// - [`TraversalAction::Prune`]: skip this node’s subtree.
    /// - [`TraversalAction::EarlyExit`]: stop the traversal immediately.
    ///
    /// # Example
    ///
    /// ```
    /// # #[cfg(all(feature = "dim3", feature = "f32"))] {
    /// use lbvh3d::bounding_volume::{Aabb, BoundingVolume};
    /// use lbvh3d::partitioning::{Lbvh, TraversalAction};
    /// use nalgebra::Point3;
    ///
    /// let aabbs = [
    ///     Aabb::new(Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 1.0, 1.0)),
    ///     Aabb::new(Point3::new(5.0, 0.0, 0.0), Point3::new(6.0, 1.0, 1.0)),
    ///     Aabb::new(Point3::new(10.0, 0.0, 0.0), Point3::new(11.0, 1.0, 1.0)),
    /// ];
    /// let bvh = Lbvh::build(&aabbs).unwrap();
    ///
    /// let region = Aabb::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(7.0, 2.0, 2.0));
    /// let mut count = 0;
    /// bvh.traverse(|node| {
    ///     if !node.aabb().intersects(&region) {
    ///         return TraversalAction::Prune;
    ///     }
    ///     if node.is_leaf() {
    ///         count += 1;
    ///     }
    ///     TraversalAction::Continue
    /// });
    ///
    /// assert_eq!(count, 2);
    /// # }
    /// ```
    pub fn traverse(&self, mut check_node: impl FnMut(&LbvhNode) -> TraversalAction) {
        let mut stack = Self::traversal_stack();

        if !self.is_empty() {
            stack.push(0u32);
        }

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id as usize];

            match check_node(node) {
                TraversalAction::Continue => {
                    if let Some([left, right]) = node.children() {
                        stack.push(right);
                        stack.push(left);
                    }
                }
                TraversalAction::Prune => {}
                TraversalAction::EarlyExit => return,
            }
        }
    }
}
