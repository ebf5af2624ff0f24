//! Morton encoding of 3D vectors.

// The 64-bit bit-spreading is from https://github.com/DGriffin91/obvhs/tree/main/src/ploc/morton.rs
// MIT/Apache 2 license.

use crate::math::{Real, Vector};

/// The integer type of a Morton code.
///
/// Single-precision builds use 32-bit codes while double-precision builds use 64-bit codes
/// so the quantization grid follows the precision of the coordinates.
#[cfg(feature = "f32")]
pub type MortonCode = u32;
/// The integer type of a Morton code.
///
/// Single-precision builds use 32-bit codes while double-precision builds use 64-bit codes
/// so the quantization grid follows the precision of the coordinates.
#[cfg(feature = "f64")]
pub type MortonCode = u64;

/// The number of quantization bits per axis of a [`MortonCode`].
#[cfg(feature = "f32")]
pub const MORTON_BITS_PER_AXIS: u32 = 10;
/// The number of quantization bits per axis of a [`MortonCode`].
#[cfg(feature = "f64")]
pub const MORTON_BITS_PER_AXIS: u32 = 21;

//---------------------------------------------------
// --- 10 bit resolution per channel morton curve ---
//---------------------------------------------------

#[inline]
fn split_by_3_u32(a: u32) -> u32 {
    let mut x = a & 0x3ff; // we only look at the first 10 bits
    x = (x | x << 16) & 0x030000ff;
    x = (x | x << 8) & 0x0300f00f;
    x = (x | x << 4) & 0x030c30c3;
    x = (x | x << 2) & 0x09249249;
    x
}

/// Encode x,y,z position into a u32 morton value.
///
/// Input should be in `0..1024` (only the lowest 10 bits of each value are used).
#[inline]
pub fn morton_encode_u32(x: u32, y: u32, z: u32) -> u32 {
    split_by_3_u32(x) | split_by_3_u32(y) << 1 | split_by_3_u32(z) << 2
}

//---------------------------------------------------
// --- 21 bit resolution per channel morton curve ---
//---------------------------------------------------

#[inline]
fn split_by_3_u64(a: u32) -> u64 {
    let mut x = a as u64 & 0x1fffff; // we only look at the first 21 bits
    x = (x | x << 32) & 0x1f00000000ffff;
    x = (x | x << 16) & 0x1f0000ff0000ff;
    x = (x | x << 8) & 0x100f00f00f00f00f;
    x = (x | x << 4) & 0x10c30c30c30c30c3;
    x = (x | x << 2) & 0x1249249249249249;
    x
}

/// Encode x,y,z position into a u64 morton value.
///
/// Input should be in `0..2u32.pow(21)` (only the lowest 21 bits of each value are used).
#[inline]
pub fn morton_encode_u64(x: u32, y: u32, z: u32) -> u64 {
    split_by_3_u64(x) | split_by_3_u64(y) << 1 | split_by_3_u64(z) << 2
}

/// Quantizes a coordinate in `[0, 1]` to [`MORTON_BITS_PER_AXIS`] bits.
///
/// Values outside of `[0, 1]` are clamped. NaN maps to zero.
#[inline]
fn quantize_unorm(x: Real) -> u32 {
    let cells = (1u32 << MORTON_BITS_PER_AXIS) as Real;
    // NOTE: 1.0 must land in the last cell instead of overflowing the bit range.
    (x * cells).max(0.0).min(cells - 1.0) as u32
}

/// Encode a 3D position into a Morton code.
///
/// Each component of `p` should be in `0.0..=1.0`, i.e., `p` should already be normalized
/// relative to the domain being encoded.
#[inline]
pub fn morton_encode_unorm(p: Vector<Real>) -> MortonCode {
    let x = quantize_unorm(p.x);
    let y = quantize_unorm(p.y);
    let z = quantize_unorm(p.z);

    #[cfg(feature = "f32")]
    return morton_encode_u32(x, y, z);
    #[cfg(feature = "f64")]
    return morton_encode_u64(x, y, z);
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn interleaves_axes_from_lowest_bit() {
        assert_eq!(morton_encode_u32(1, 0, 0), 0b001);
        assert_eq!(morton_encode_u32(0, 1, 0), 0b010);
        assert_eq!(morton_encode_u32(0, 0, 1), 0b100);
        assert_eq!(morton_encode_u32(2, 0, 0), 0b001_000);
        assert_eq!(morton_encode_u32(3, 3, 3), 0b111_111);
        assert_eq!(morton_encode_u32(1023, 1023, 1023), (1 << 30) - 1);

        assert_eq!(morton_encode_u64(1, 0, 0), 0b001);
        assert_eq!(morton_encode_u64(0, 0, 2), 0b100_000);
        let max = (1 << 21) - 1;
        assert_eq!(morton_encode_u64(max, max, max), (1 << 63) - 1);
    }

    #[test]
    fn unorm_extremes_stay_in_range() {
        let all_bits = (1 as MortonCode).wrapping_shl(3 * MORTON_BITS_PER_AXIS) - 1;
        assert_eq!(morton_encode_unorm(Vector::zeros()), 0);
        assert_eq!(morton_encode_unorm(Vector::repeat(1.0)), all_bits);
        assert_eq!(morton_encode_unorm(Vector::repeat(2.0)), all_bits);
        assert_eq!(morton_encode_unorm(Vector::repeat(-1.0)), 0);
    }

    #[test]
    fn codes_follow_the_z_curve() {
        // Along a single axis the code increases monotonically.
        let mut prev = 0;
        for i in 1..100 {
            let code = morton_encode_unorm(Vector::new(i as Real / 100.0, 0.0, 0.0));
            assert!(code >= prev);
            prev = code;
        }

        // The lower octant comes before the upper one.
        let lower = morton_encode_unorm(Vector::repeat(0.49));
        let upper = morton_encode_unorm(Vector::repeat(0.51));
        assert!(lower < upper);
    }
}
