#[cfg(doc)]
use super::Lbvh;

/// Errors that can occur while building an [`Lbvh`].
///
/// A failed build never yields a partially-built tree: either the whole hierarchy is
/// constructed, or one of these errors is returned and nothing else is produced. Builds are
/// deterministic, so retrying with the same input fails the same way.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum LbvhBuildError {
    /// The tree would need more nodes than can be addressed by `u32` node ids.
    #[error("cannot build a tree with {count} primitives: at most {max} primitives are supported.")]
    TooManyPrimitives {
        /// The number of primitives given to the build.
        count: usize,
        /// The maximum number of primitives supported.
        max: usize,
    },
    /// One of the buffers needed by the build could not be allocated.
    #[error("failed to allocate {len} elements for the {buffer} buffer.")]
    AllocationFailed {
        /// The name of the buffer that could not be allocated.
        buffer: &'static str,
        /// The number of elements requested.
        len: usize,
    },
}
