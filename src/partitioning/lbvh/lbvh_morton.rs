use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Real, Vector};
use crate::utils::morton::{self, MortonCode};
use crate::utils::parallel;

/// The sort key of a primitive: its Morton code paired with its index.
///
/// Keys are ordered by code first, then by primitive index. Because primitive indices are
/// unique, this is a strict total order even when several primitives share the same code.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MortonKey {
    /// The Morton code of the primitive's centroid.
    pub code: MortonCode,
    /// The index of the primitive.
    pub primitive: u32,
}

impl MortonKey {
    /// The number of bits of the code part of the key.
    pub const CODE_BITS: u32 = MortonCode::BITS;

    /// The length of the common binary prefix of `self` and `other`.
    ///
    /// The key is seen as the concatenation of the code and of the primitive index, so
    /// keys with equal codes still have a common prefix shorter than
    /// `CODE_BITS + u32::BITS` unless they are equal.
    #[inline(always)]
    pub fn common_prefix_len(&self, other: &Self) -> u32 {
        if self.code != other.code {
            (self.code ^ other.code).leading_zeros()
        } else {
            Self::CODE_BITS + (self.primitive ^ other.primitive).leading_zeros()
        }
    }

    /// Computes the key of a primitive with the given AABB.
    ///
    /// The AABB's centroid is normalized relative to `scene`, i.e. the AABB bounding every
    /// primitive. `inv_extents` is the per-axis inverse of `scene`'s extents (zero for flat
    /// axes).
    #[inline]
    pub fn new(aabb: &Aabb, primitive: u32, scene: &Aabb, inv_extents: &Vector<Real>) -> Self {
        let normalized = (aabb.center() - scene.mins).component_mul(inv_extents);
        Self {
            code: morton::morton_encode_unorm(normalized),
            primitive,
        }
    }
}

/// The AABB bounding every element of `aabbs`.
pub(super) fn scene_aabb(aabbs: &[Aabb]) -> Aabb {
    parallel::par_map_reduce(
        aabbs.len(),
        Aabb::new_invalid,
        |i| aabbs[i],
        |a, b| a.merged(&b),
    )
}

/// Per-axis inverse of the extents of `scene`, with zero for flat axes.
///
/// Flat axes map every centroid to the first cell instead of dividing by zero.
pub(super) fn inv_extents(scene: &Aabb) -> Vector<Real> {
    scene
        .extents()
        .map(|e| if e > 0.0 { 1.0 / e } else { 0.0 })
}

/// Appends the Morton keys of all the `aabbs` to `out`, in primitive order.
pub(super) fn compute_keys(aabbs: &[Aabb], scene: &Aabb, out: &mut Vec<MortonKey>) {
    let inv_extents = inv_extents(scene);
    parallel::par_extend(out, aabbs.len(), |i| {
        MortonKey::new(&aabbs[i], i as u32, scene, &inv_extents)
    });
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::math::Point;

    #[test]
    fn duplicate_codes_are_ordered_by_primitive() {
        let a = MortonKey {
            code: 5,
            primitive: 3,
        };
        let b = MortonKey {
            code: 5,
            primitive: 1,
        };
        let c = MortonKey {
            code: 4,
            primitive: 10,
        };
        let mut keys = [a, b, c];
        keys.sort_unstable();
        assert_eq!(keys, [c, b, a]);

        // 3 ^ 1 == 0b10, so the keys share all the code bits plus 30 index bits.
        assert_eq!(a.common_prefix_len(&b), MortonKey::CODE_BITS + 30);
        // 5 ^ 4 == 0b1.
        assert_eq!(a.common_prefix_len(&c), MortonKey::CODE_BITS - 1);
    }

    #[test]
    fn scene_and_keys() {
        let aabbs = [
            Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 0.0)),
            Aabb::new(Point::new(3.0, 3.0, 0.0), Point::new(4.0, 4.0, 0.0)),
        ];
        let scene = scene_aabb(&aabbs);
        assert_eq!(
            scene,
            Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(4.0, 4.0, 0.0))
        );
        assert_eq!(inv_extents(&scene), Vector::new(0.25, 0.25, 0.0));

        let mut keys = vec![];
        compute_keys(&aabbs, &scene, &mut keys);
        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].primitive, 0);
        assert_eq!(keys[1].primitive, 1);
        assert!(keys[0].code < keys[1].code);
        assert!(scene_aabb(&[]) == Aabb::new_invalid());
    }
}
