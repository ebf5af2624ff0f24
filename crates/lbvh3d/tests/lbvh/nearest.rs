use crate::common;
use lbvh3d::bounding_volume::Aabb;
use lbvh3d::partitioning::Lbvh;
use nalgebra::Point3;

fn brute_force_knn(aabbs: &[Aabb], point: &Point3<f32>) -> Vec<(u32, f32)> {
    let mut result: Vec<_> = aabbs
        .iter()
        .enumerate()
        .map(|(i, aabb)| (i as u32, aabb.mindist(point)))
        .collect();
    result.sort_by(|a, b| (a.1, a.0).partial_cmp(&(b.1, b.0)).unwrap());
    result
}

#[test]
fn nearest_matches_brute_force() {
    let mut rng = common::rng(0);

    for len in [1, 2, 5, 31, 100, 1_000, 10_000] {
        let aabbs = common::random_aabbs(&mut rng, len);
        let bvh = Lbvh::build(&aabbs).unwrap();
        bvh.assert_well_formed();

        for _ in 0..100 {
            // Some query points are outside of the scene.
            let point = common::random_point(&mut rng, 150.0);
            let expected = brute_force_knn(&aabbs, &point);
            let result = bvh.query_nearest(&point, 1);

            assert_eq!(result.len(), 1);
            approx::assert_relative_eq!(result[0].1, expected[0].1);
            assert_eq!(result[0].1, aabbs[result[0].0 as usize].mindist(&point));
        }
    }
}

#[test]
fn k_nearest_are_sorted_and_unique() {
    let mut rng = common::rng(1);

    for len in [1, 7, 64, 500, 3_000] {
        let aabbs = common::random_aabbs(&mut rng, len);
        let bvh = Lbvh::build(&aabbs).unwrap();

        for k in [0, 1, 2, 8, 33, 1_000, 5_000] {
            let point = common::random_point(&mut rng, 120.0);
            let result = bvh.query_nearest(&point, k);
            let expected = brute_force_knn(&aabbs, &point);

            assert_eq!(result.len(), k.min(len));

            let mut indices: Vec<_> = result.iter().map(|(i, _)| *i).collect();
            indices.sort_unstable();
            indices.dedup();
            assert_eq!(indices.len(), result.len(), "duplicate results");

            for (found, expected) in result.iter().zip(expected.iter()) {
                assert_eq!(found.1, expected.1);
            }
            assert!(result.windows(2).all(|w| w[0].1 <= w[1].1));
        }
    }
}

#[test]
fn nearest_with_point_primitives() {
    // Each primitive is a point, bounded by a degenerate box.
    let mut rng = common::rng(2);
    let points: Vec<_> = (0..2_000)
        .map(|_| common::random_point(&mut rng, 50.0))
        .collect();
    let bvh = Lbvh::from_iter(points.iter().map(|p| Aabb::new(*p, *p))).unwrap();

    for _ in 0..50 {
        let query = common::random_point(&mut rng, 60.0);
        let result = bvh.query_nearest_with(&query, 5, |i| {
            nalgebra::distance_squared(&points[i as usize], &query)
        });

        let mut expected: Vec<_> = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i as u32, nalgebra::distance_squared(p, &query)))
            .collect();
        expected.sort_by(|a, b| (a.1, a.0).partial_cmp(&(b.1, b.0)).unwrap());
        expected.truncate(5);

        assert_eq!(result, expected);
        assert_eq!(bvh.nearest(&query).map(|(i, _)| i), Some(expected[0].0));
    }
}
