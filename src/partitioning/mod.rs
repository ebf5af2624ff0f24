//! Spatial partitioning tools.

pub use self::lbvh::{
    Lbvh, LbvhBuildError, LbvhNode, LbvhWorkspace, MortonKey, SharedLbvh, TraversalAction,
};

pub mod lbvh;
