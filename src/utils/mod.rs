//! Various unsorted geometrical and logical operators.

pub use self::morton::{
    morton_encode_u32, morton_encode_u64, morton_encode_unorm, MortonCode, MORTON_BITS_PER_AXIS,
};

pub mod morton;
pub(crate) mod parallel;
