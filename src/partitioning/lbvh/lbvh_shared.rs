use super::{Lbvh, LbvhBuildError, LbvhWorkspace};
use crate::bounding_volume::Aabb;
use std::sync::{Arc, PoisonError, RwLock};

/// An [`Lbvh`] that can be replaced while other threads are querying it.
///
/// Readers take a [`snapshot`](Self::snapshot), i.e. a reference-counted handle to the current
/// tree, and query it without holding any lock. Writers build a new tree on the side and
/// [`publish`](Self::publish) it: the swap only holds the lock for the duration of a pointer
/// exchange, and queries running on older snapshots keep seeing the tree they started with.
#[derive(Debug, Default)]
pub struct SharedLbvh {
    current: RwLock<Arc<Lbvh>>,
}

impl SharedLbvh {
    /// Wraps `lbvh` so it can be shared and replaced.
    pub fn new(lbvh: Lbvh) -> Self {
        Self {
            current: RwLock::new(Arc::new(lbvh)),
        }
    }

    /// The tree published last.
    pub fn snapshot(&self) -> Arc<Lbvh> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replaces the current tree by `lbvh`, and returns the snapshot it replaced.
    pub fn publish(&self, lbvh: Lbvh) -> Arc<Lbvh> {
        let new = Arc::new(lbvh);
        let mut current = self
            .current
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        std::mem::replace(&mut *current, new)
    }

    /// Builds a tree over `aabbs` and publishes it.
    ///
    /// The build happens before taking the lock, so concurrent [`snapshot`](Self::snapshot)s
    /// are never blocked by it. If the build fails, the current tree is left untouched.
    /// Returns the snapshot that was replaced.
    pub fn rebuild(
        &self,
        aabbs: &[Aabb],
        workspace: &mut LbvhWorkspace,
    ) -> Result<Arc<Lbvh>, LbvhBuildError> {
        let lbvh = Lbvh::build_with_workspace(aabbs, workspace)?;
        Ok(self.publish(lbvh))
    }
}

impl From<Lbvh> for SharedLbvh {
    fn from(lbvh: Lbvh) -> Self {
        Self::new(lbvh)
    }
}
