use lbvh3d::bounding_volume::Aabb;
use nalgebra::{Point3, Vector3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub fn rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn random_point(rng: &mut impl Rng, range: f32) -> Point3<f32> {
    Point3::new(
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
        rng.gen_range(-range..range),
    )
}

/// Random boxes in `[-100, 100]³`, from points to slabs a few units wide.
pub fn random_aabbs(rng: &mut impl Rng, len: usize) -> Vec<Aabb> {
    (0..len)
        .map(|_| {
            let center = random_point(rng, 100.0);
            let half_extents = Vector3::new(
                rng.gen_range(0.0..3.0),
                rng.gen_range(0.0..3.0),
                rng.gen_range(0.0..3.0),
            );
            Aabb::from_half_extents(center, half_extents)
        })
        .collect()
}
