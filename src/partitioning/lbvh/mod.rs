//! A linear bounding-volume hierarchy built from Morton-sorted primitives.

pub use lbvh_error::LbvhBuildError;
pub use lbvh_morton::MortonKey;
pub use lbvh_shared::SharedLbvh;
pub use lbvh_traverse::{Leaves, TraversalAction};
pub use lbvh_tree::{Lbvh, LbvhNode, LbvhWorkspace, MAX_PRIMITIVES};

mod lbvh_build;
mod lbvh_error;
mod lbvh_morton;
mod lbvh_nearest;
mod lbvh_queries;
mod lbvh_refit;
mod lbvh_shared;
mod lbvh_traverse;
mod lbvh_tree;
mod lbvh_validation;
