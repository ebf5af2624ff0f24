use crate::common;
use lbvh3d::bounding_volume::{Aabb, BoundingVolume};
use lbvh3d::partitioning::{Lbvh, LbvhWorkspace};
use nalgebra::Vector3;
use rand::Rng;

#[test]
fn overlap_matches_brute_force() {
    let mut rng = common::rng(10);

    for len in [0, 1, 2, 13, 256, 5_000] {
        let aabbs = common::random_aabbs(&mut rng, len);
        let bvh = Lbvh::build(&aabbs).unwrap();

        for _ in 0..50 {
            let half_extents = Vector3::repeat(rng.gen_range(0.0..30.0));
            let query =
                Aabb::from_half_extents(common::random_point(&mut rng, 110.0), half_extents);

            let mut result = bvh.query_overlap(&query);
            result.sort_unstable();
            let expected: Vec<_> = (0..len as u32)
                .filter(|i| aabbs[*i as usize].intersects(&query))
                .collect();
            assert_eq!(result, expected);
        }

        // The whole scene.
        let mut all = bvh.query_overlap(&bvh.root_aabb());
        all.sort_unstable();
        assert_eq!(all, (0..len as u32).collect::<Vec<_>>());
    }
}

#[test]
fn bounded_overlap_reports_truncation() {
    let mut rng = common::rng(11);
    let aabbs = common::random_aabbs(&mut rng, 1_000);
    let bvh = Lbvh::build(&aabbs).unwrap();
    let query = bvh.root_aabb();

    let mut small = vec![0; 10];
    assert_eq!(bvh.query_overlap_bounded(&query, &mut small), 1_000);

    let mut large = vec![u32::MAX; 1_500];
    assert_eq!(bvh.query_overlap_bounded(&query, &mut large), 1_000);
    assert!(large[1_000..].iter().all(|i| *i == u32::MAX));

    let mut found = large[..1_000].to_vec();
    found.sort_unstable();
    assert_eq!(found, (0..1_000).collect::<Vec<_>>());
    // The truncated run returns a prefix of the same traversal.
    assert_eq!(&small[..], &large[..10]);
}

#[test]
fn rebuilds_track_moving_primitives() {
    let mut rng = common::rng(12);
    let mut aabbs = common::random_aabbs(&mut rng, 2_000);
    let mut workspace = LbvhWorkspace::new();

    for _ in 0..10 {
        for aabb in &mut aabbs {
            let shift = common::random_point(&mut rng, 2.0).coords;
            aabb.mins += shift;
            aabb.maxs += shift;
        }

        let bvh = Lbvh::build_with_workspace(&aabbs, &mut workspace).unwrap();
        bvh.assert_well_formed();

        let expected = aabbs
            .iter()
            .fold(Aabb::new_invalid(), |acc, aabb| acc.merged(aabb));
        assert_eq!(bvh.root_aabb(), expected);

        let probe = rng.gen_range(0..aabbs.len());
        assert!(bvh.query_overlap(&aabbs[probe]).contains(&(probe as u32)));
    }
}
