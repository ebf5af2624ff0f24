//! Axis Aligned Bounding Box.

use crate::bounding_volume::BoundingVolume;
use crate::math::{Point, Real, Vector, DIM};
use approx::{AbsDiffEq, RelativeEq};
use num::Bounded;

/// An Axis-Aligned Bounding Box (AABB).
///
/// An AABB is defined by its minimum and maximum corners. Its edges are always parallel to the
/// coordinate axes, making overlap tests, merges and distance bounds very cheap.
///
/// # Structure
///
/// - **mins**: The point with the smallest coordinates on each axis (the "lower" corner)
/// - **maxs**: The point with the largest coordinates on each axis (the "upper" corner)
/// - **Invariant**: `mins.x ≤ maxs.x`, `mins.y ≤ maxs.y` and `mins.z ≤ maxs.z`
///
/// A degenerate AABB with `mins == maxs` is a valid box representing a single point.
///
/// All the methods of this type are pure functions of their arguments: they can be called
/// from a sequential loop as well as from many threads at once.
///
/// # Non-finite coordinates
///
/// AABBs with NaN or infinite coordinates are outside of the contract of this crate. No
/// method detects them and the results of queries involving them are unspecified.
///
/// # Example
///
/// ```rust
/// # #[cfg(all(feature = "dim3", feature = "f32"))] {
/// use lbvh3d::bounding_volume::Aabb;
/// use nalgebra::Point3;
///
/// let aabb = Aabb::new(Point3::new(-0.5, -0.5, -0.5), Point3::new(0.5, 0.5, 0.5));
///
/// assert!(aabb.contains_local_point(&Point3::origin()));
/// assert_eq!(aabb.center(), Point3::origin());
/// assert_eq!(aabb.mindist(&Point3::new(2.5, 0.0, 0.0)), 4.0);
/// # }
/// ```
#[cfg_attr(feature = "bytemuck", derive(bytemuck::Pod, bytemuck::Zeroable))]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with minimum coordinates.
    pub mins: Point<Real>,
    /// The point with maximum coordinates.
    pub maxs: Point<Real>,
}

impl Aabb {
    /// Creates a new AABB from its minimum and maximum corners.
    ///
    /// Each component of `mins` should be ≤ the corresponding component of `maxs`.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with inverted bounds.
    ///
    /// The resulting AABB has `mins` set to maximum values and `maxs` set to
    /// minimum values. It is the identity element of [`BoundingVolume::merged`]:
    /// merging it with any box yields that box.
    ///
    /// ```rust
    /// # #[cfg(all(feature = "dim3", feature = "f32"))] {
    /// use lbvh3d::bounding_volume::{Aabb, BoundingVolume};
    /// use nalgebra::Point3;
    ///
    /// let aabb = Aabb::new(Point3::new(1.0, 2.0, 3.0), Point3::new(4.0, 5.0, 6.0));
    /// assert_eq!(Aabb::new_invalid().merged(&aabb), aabb);
    /// # }
    /// ```
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::max_value()).into(),
            Vector::repeat(-Real::max_value()).into(),
        )
    }

    /// Creates a new AABB from its center and half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates a new AABB that tightly encloses a set of points.
    ///
    /// Returns [`Aabb::new_invalid`] if the iterator is empty.
    pub fn from_points<I>(pts: I) -> Self
    where
        I: IntoIterator<Item = Point<Real>>,
    {
        pts.into_iter().fold(Self::new_invalid(), |mut aabb, pt| {
            aabb.take_point(pt);
            aabb
        })
    }

    /// Is this AABB well-formed, i.e., is `mins <= maxs` on every axis?
    ///
    /// This is `false` for [`Aabb::new_invalid`] and for boxes with NaN coordinates.
    #[inline]
    pub fn is_valid(&self) -> bool {
        na::partial_le(&self.mins, &self.maxs)
    }

    /// The center of this AABB, i.e., the midpoint of `mins` and `maxs`.
    ///
    /// This is the centroid used for computing the Morton code of a primitive.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half-extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        (self.maxs - self.mins) * 0.5
    }

    /// The extents of this AABB.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// Enlarges this AABB so it also contains the point `pt`.
    #[inline]
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.inf(&pt);
        self.maxs = self.maxs.sup(&pt);
    }

    /// Does this AABB contain the given point (boundary included)?
    #[inline]
    pub fn contains_local_point(&self, point: &Point<Real>) -> bool {
        for i in 0..DIM {
            if point[i] < self.mins[i] || point[i] > self.maxs[i] {
                return false;
            }
        }

        true
    }

    /// Squared distance between `point` and the closest point of this AABB.
    ///
    /// This is exactly zero if, and only if, `point` lies inside or on the boundary of
    /// `self`. Because every primitive contained by a BVH node lies inside of the node's
    /// AABB, this is a lower bound of the squared distance between `point` and any primitive
    /// of the node's subtree.
    #[inline]
    pub fn mindist(&self, point: &Point<Real>) -> Real {
        let mut result: Real = 0.0;

        for i in 0..DIM {
            let closest = point[i].max(self.mins[i]).min(self.maxs[i]);
            let delta = closest - point[i];
            result += delta * delta;
        }

        result
    }

    /// The `MINMAXDIST` metric from "Nearest Neighbor Queries" (Roussopoulos, Kelley,
    /// Vincent, 1995), squared.
    ///
    /// If this AABB is the tight bound of a set of objects (i.e. each of its faces touches at
    /// least one object) then at least one of these objects is at a squared distance smaller
    /// than or equal to the returned value. This is an upper bound of the nearest-neighbor
    /// distance of the node's subtree, and is always greater than or equal to [`Self::mindist`].
    #[inline]
    pub fn minmaxdist(&self, point: &Point<Real>) -> Real {
        let mut near: [Real; DIM] = [0.0; DIM];
        let mut far: [Real; DIM] = [0.0; DIM];

        for i in 0..DIM {
            let to_mins = (self.mins[i] - point[i]) * (self.mins[i] - point[i]);
            let to_maxs = (self.maxs[i] - point[i]) * (self.maxs[i] - point[i]);

            if to_maxs < to_mins {
                near[i] = to_maxs;
                far[i] = to_mins;
            } else {
                near[i] = to_mins;
                far[i] = to_maxs;
            }
        }

        // NOTE: keep the sums in axis order so that each candidate is, term by term, larger
        //       than the corresponding term of `mindist`.
        let dx = near[0] + far[1] + far[2];
        let dy = far[0] + near[1] + far[2];
        let dz = far[0] + far[1] + near[2];
        dx.min(dy.min(dz))
    }
}

impl BoundingVolume for Aabb {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.center()
    }

    /// Returns `false` if the two boxes are separated along at least one axis.
    ///
    /// Boxes that only touch each other are considered intersecting.
    #[inline]
    fn intersects(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }

    #[inline]
    fn contains(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.mins) && na::partial_ge(&self.maxs, &other.maxs)
    }

    #[inline]
    fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    #[inline]
    fn merged(&self, other: &Aabb) -> Aabb {
        Aabb {
            mins: self.mins.inf(&other.mins),
            maxs: self.maxs.sup(&other.maxs),
        }
    }
}

impl AbsDiffEq for Aabb {
    type Epsilon = Real;

    #[inline]
    fn default_epsilon() -> Self::Epsilon {
        Real::default_epsilon()
    }

    #[inline]
    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.mins.abs_diff_eq(&other.mins, epsilon) && self.maxs.abs_diff_eq(&other.maxs, epsilon)
    }
}

impl RelativeEq for Aabb {
    #[inline]
    fn default_max_relative() -> Self::Epsilon {
        Real::default_max_relative()
    }

    #[inline]
    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.mins.relative_eq(&other.mins, epsilon, max_relative)
            && self.maxs.relative_eq(&other.maxs, epsilon, max_relative)
    }
}
