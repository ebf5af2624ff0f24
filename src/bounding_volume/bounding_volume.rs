//! The operations a hierarchy needs from its node volumes.

use crate::math::{Point, Real};

/// Operations on the volumes stored at the nodes of a bounding-volume hierarchy.
///
/// The construction of a tree only needs [`merged`](Self::merged) (an internal node bounds the
/// union of its children) and [`center`](Self::center) (primitives are ordered by the position
/// of their center). Overlap queries descend into the nodes whose volume
/// [`intersects`](Self::intersects) the query.
///
/// `merged` must be associative and commutative, so the volume of a node doesn’t depend on the
/// order in which its descendants are combined.
pub trait BoundingVolume {
    /// The point used to place this volume along the space-filling curve.
    fn center(&self) -> Point<Real>;

    /// Do `self` and `other` share at least one point?
    fn intersects(&self, other: &Self) -> bool;

    /// Is `other` entirely inside of `self`?
    fn contains(&self, other: &Self) -> bool;

    /// Grows `self` in-place so it also bounds `other`.
    fn merge(&mut self, other: &Self);

    /// The smallest volume bounding both `self` and `other`.
    fn merged(&self, other: &Self) -> Self;
}
