use crate::common;
use lbvh3d::bounding_volume::BoundingVolume;
use lbvh3d::partitioning::{Lbvh, LbvhWorkspace, SharedLbvh};
use std::sync::atomic::{AtomicBool, Ordering};

#[test]
fn concurrent_queries_agree_with_sequential_ones() {
    let mut rng = common::rng(20);
    let aabbs = common::random_aabbs(&mut rng, 4_000);
    let bvh = Lbvh::build(&aabbs).unwrap();
    let points: Vec<_> = (0..200)
        .map(|_| common::random_point(&mut rng, 100.0))
        .collect();
    let expected: Vec<_> = points.iter().map(|p| bvh.query_nearest(p, 4)).collect();

    std::thread::scope(|s| {
        for _ in 0..8 {
            s.spawn(|| {
                for (point, expected) in points.iter().zip(expected.iter()) {
                    assert_eq!(&bvh.query_nearest(point, 4), expected);
                    let (nearest, _) = bvh.nearest(point).unwrap();
                    assert!(bvh
                        .query_overlap(&aabbs[nearest as usize])
                        .contains(&nearest));
                }
            });
        }
    });
}

#[test]
fn snapshots_survive_publication() {
    let mut rng = common::rng(21);
    let scenes: Vec<_> = (1..=20)
        .map(|i| common::random_aabbs(&mut rng, i * 50))
        .collect();
    let shared = SharedLbvh::new(Lbvh::build(&scenes[0]).unwrap());
    let done = AtomicBool::new(false);

    std::thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                while !done.load(Ordering::Acquire) {
                    let snapshot = shared.snapshot();
                    // Every published tree is a complete build of one of the scenes.
                    let scene = &scenes[snapshot.len() / 50 - 1];
                    let mut all = snapshot.query_overlap(&snapshot.root_aabb());
                    all.sort_unstable();
                    assert_eq!(all.len(), scene.len());
                    let root = scene.iter().fold(scene[0], |acc, aabb| acc.merged(aabb));
                    assert_eq!(snapshot.root_aabb(), root);
                }
            });
        }

        let mut workspace = LbvhWorkspace::new();
        for scene in &scenes[1..] {
            let previous = shared.rebuild(scene, &mut workspace).unwrap();
            assert!(previous.len() < scene.len());
        }
        done.store(true, Ordering::Release);
    });

    assert_eq!(shared.snapshot().len(), 1_000);
}
