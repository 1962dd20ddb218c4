//! Comparison tests between OrganizedNeighborSearch and brute-force search

#[cfg(test)]
mod tests {
    use crate::{CameraModel, ExhaustiveSearch, OrganizedCloud, OrganizedNeighborSearch, Point3};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::HashSet;

    // Typical reciprocal focal length of a structured-light depth sensor.
    const INV_FOCAL: f64 = 0.0018;

    /// Cloud as seen by a centred pinhole sensor, with uniform random depth per pixel.
    fn sensor_cloud<R: Rng>(
        rng: &mut R,
        width: usize,
        height: usize,
        min_depth: f64,
        max_depth: f64,
    ) -> OrganizedCloud {
        let center_x = (width >> 1) as f64;
        let center_y = (height >> 1) as f64;
        let mut points = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let z = rng.random_range(min_depth..max_depth);
                let x = (col as f64 - center_x) * INV_FOCAL * z;
                let y = (row as f64 - center_y) * INV_FOCAL * z;
                points.push(Point3::new(x, y, z));
            }
        }
        OrganizedCloud::new(width, height, points)
    }

    /// K smallest (index, squared distance) pairs, nearest first, by full scan.
    fn brute_force_knn(cloud: &OrganizedCloud, query: &Point3, k: usize) -> Vec<(usize, f64)> {
        let mut all: Vec<(usize, f64)> = cloud
            .points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_finite())
            .map(|(i, p)| (i, p.sqr_distance(query)))
            .collect();
        let by_distance =
            |a: &(usize, f64), b: &(usize, f64)| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0));
        if all.len() > k {
            let _ = all.select_nth_unstable_by(k, by_distance);
            all.truncate(k);
        }
        all.sort_by(by_distance);
        all
    }

    fn brute_force_radius(cloud: &OrganizedCloud, query: &Point3, radius: f64) -> HashSet<usize> {
        let radius_sq = radius * radius;
        cloud
            .points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_finite() && p.sqr_distance(query) <= radius_sq)
            .map(|(i, _)| i)
            .collect()
    }

    fn assert_knn_matches(
        search: &OrganizedNeighborSearch<'_>,
        cloud: &OrganizedCloud,
        query: &Point3,
        k: usize,
    ) {
        let result = search.nearest_k_search(query, k).unwrap();
        let expected = brute_force_knn(cloud, query, k);

        assert_eq!(
            result.len(),
            expected.len(),
            "result size differs for k={} query={:?}",
            k,
            query
        );
        for (i, (&(idx, dist), (got_idx, got_dist))) in expected
            .iter()
            .zip(result.indices.iter().zip(&result.sqr_distances))
            .enumerate()
        {
            assert_eq!(*got_idx, idx, "index {} differs for k={} query={:?}", i, k, query);
            assert!(
                (got_dist - dist).abs() <= 1e-4,
                "distance {} differs: {} vs {}",
                i,
                got_dist,
                dist
            );
        }
    }

    // ============================================================================
    // SENSOR-SIZED SCENARIOS
    // ============================================================================

    #[test]
    fn test_nearest_k_matches_brute_force_vga() {
        let mut rng = StdRng::seed_from_u64(0x5eed_0001);

        for _ in 0..500 {
            let k = rng.random_range(1..=10);
            let cloud = sensor_cloud(&mut rng, 640, 480, 20.0, 35.0);
            let query = cloud.points[rng.random_range(0..cloud.len())];

            // The engine borrows the cloud, so each frame gets its own.
            let mut search = OrganizedNeighborSearch::new(INV_FOCAL).unwrap();
            search.set_input_cloud(&cloud).unwrap();
            assert_knn_matches(&search, &cloud, &query, k);
        }
    }

    #[test]
    fn test_radius_matches_brute_force_vga() {
        let mut rng = StdRng::seed_from_u64(0x5eed_0002);

        for _ in 0..10 {
            let cloud = sensor_cloud(&mut rng, 640, 480, 5.0, 10.0);
            let query = cloud.points[rng.random_range(0..cloud.len())];
            let radius = rng.random_range(0.0..=1.0);

            let mut search = OrganizedNeighborSearch::new(INV_FOCAL).unwrap();
            search.set_input_cloud(&cloud).unwrap();
            let result = search.radius_search(&query, radius, None).unwrap();
            let expected = brute_force_radius(&cloud, &query, radius);

            let found: HashSet<usize> = result.indices.iter().copied().collect();
            assert_eq!(found.len(), result.len(), "duplicate indices in radius result");
            assert_eq!(found, expected, "radius {} result set differs", radius);

            let limited = search.radius_search(&query, radius, Some(5)).unwrap();
            assert!(limited.len() <= 5, "max_nn=5 returned {}", limited.len());
            for n in limited.iter() {
                assert!(expected.contains(&n.index), "{} outside radius", n.index);
            }
        }
    }

    #[test]
    fn test_pruning_visits_few_cells() {
        let mut rng = StdRng::seed_from_u64(0x5eed_0003);
        let cloud = sensor_cloud(&mut rng, 640, 480, 20.0, 35.0);
        let mut search = OrganizedNeighborSearch::new(INV_FOCAL).unwrap();
        search.set_input_cloud(&cloud).unwrap();

        let trials = 50;
        let mut visited = 0;
        for _ in 0..trials {
            let query = cloud.points[rng.random_range(0..cloud.len())];
            let (_, stats) = search.nearest_k_search_with_stats(&query, 10).unwrap();
            visited += stats.visited_cells;
        }
        assert!(
            visited / trials < cloud.len() / 50,
            "average {} cells visited of {}",
            visited / trials,
            cloud.len()
        );
    }

    // ============================================================================
    // QUERIES NOT TAKEN FROM THE CLOUD
    // ============================================================================

    #[test]
    fn test_off_cloud_queries_match_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x5eed_0004);
        let cloud = sensor_cloud(&mut rng, 64, 48, 1.0, 3.0);
        let mut search = OrganizedNeighborSearch::new(INV_FOCAL).unwrap();
        search.set_input_cloud(&cloud).unwrap();

        for _ in 0..200 {
            // Some of these project outside the grid and get clamped.
            let z = rng.random_range(0.5..4.0);
            let x = rng.random_range(-0.1..0.1);
            let y = rng.random_range(-0.08..0.08);
            let query = Point3::new(x, y, z);
            let k = rng.random_range(1..=20);
            assert_knn_matches(&search, &cloud, &query, k);

            let radius = rng.random_range(0.0..0.3);
            let found: HashSet<usize> = search
                .radius_search(&query, radius, None)
                .unwrap()
                .indices
                .into_iter()
                .collect();
            assert_eq!(found, brute_force_radius(&cloud, &query, radius));
        }
    }

    #[test]
    fn test_invalid_pixels_are_skipped() {
        let mut rng = StdRng::seed_from_u64(0x5eed_0005);
        let mut cloud = sensor_cloud(&mut rng, 80, 60, 2.0, 6.0);
        for p in cloud.points.iter_mut() {
            if rng.random_bool(0.3) {
                *p = Point3::invalid();
            }
        }
        let mut search = OrganizedNeighborSearch::new(INV_FOCAL).unwrap();
        search.set_input_cloud(&cloud).unwrap();

        let valid: Vec<usize> = cloud.valid_points().map(|(i, _)| i).collect();
        for _ in 0..100 {
            let query = cloud.points[valid[rng.random_range(0..valid.len())]];
            let k = rng.random_range(1..=15);
            assert_knn_matches(&search, &cloud, &query, k);

            let radius = rng.random_range(0.0..0.5);
            let result = search.radius_search(&query, radius, None).unwrap();
            assert!(result.indices.iter().all(|&i| cloud.points[i].is_finite()));
            let found: HashSet<usize> = result.indices.into_iter().collect();
            assert_eq!(found, brute_force_radius(&cloud, &query, radius));
        }
    }

    #[test]
    fn test_k_larger_than_valid_points() {
        let mut rng = StdRng::seed_from_u64(0x5eed_0006);
        let mut cloud = sensor_cloud(&mut rng, 7, 5, 1.0, 2.0);
        cloud.points[3] = Point3::invalid();
        cloud.points[17] = Point3::invalid();
        let mut search = OrganizedNeighborSearch::new(INV_FOCAL).unwrap();
        search.set_input_cloud(&cloud).unwrap();

        let query = cloud.points[0];
        let result = search.nearest_k_search(&query, 100).unwrap();
        assert_eq!(result.len(), 33, "all valid points should be returned");
        assert_knn_matches(&search, &cloud, &query, 100);
    }

    // ============================================================================
    // CAMERA VARIANTS
    // ============================================================================

    #[test]
    fn test_off_centre_principal_point() {
        let mut rng = StdRng::seed_from_u64(0x5eed_0007);
        let (width, height) = (50, 30);
        let camera = CameraModel::new(0.004, 12.25, 21.5).unwrap();
        let mut points = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                let z = rng.random_range(1.0..2.0);
                // Jitter within the pixel keeps every point projecting to its own cell.
                let u = col as f64 + rng.random_range(-0.45..0.45) - camera.center_x();
                let v = row as f64 + rng.random_range(-0.45..0.45) - camera.center_y();
                points.push(Point3::new(u * 0.004 * z, v * 0.004 * z, z));
            }
        }
        let cloud = OrganizedCloud::new(width, height, points);
        let mut search = OrganizedNeighborSearch::with_camera(camera);
        search.set_input_cloud(&cloud).unwrap();

        for _ in 0..100 {
            let query = cloud.points[rng.random_range(0..cloud.len())];
            assert_knn_matches(&search, &cloud, &query, rng.random_range(1..=12));
        }
    }

    #[test]
    fn test_estimated_camera_matches_brute_force() {
        let mut rng = StdRng::seed_from_u64(0x5eed_0008);
        let cloud = sensor_cloud(&mut rng, 160, 120, 3.0, 8.0);
        let mut search = OrganizedNeighborSearch::with_estimated_camera();
        search.set_input_cloud(&cloud).unwrap();

        let camera = search.camera().unwrap();
        assert!((camera.inv_focal_length() - INV_FOCAL).abs() < 1e-9);

        for _ in 0..100 {
            let query = cloud.points[rng.random_range(0..cloud.len())];
            assert_knn_matches(&search, &cloud, &query, rng.random_range(1..=10));
        }
    }

    // ============================================================================
    // EXHAUSTIVE REFERENCE
    // ============================================================================

    #[test]
    fn test_exhaustive_agrees_with_sorted_scan() {
        let mut rng = StdRng::seed_from_u64(0x5eed_0009);
        let cloud = sensor_cloud(&mut rng, 40, 30, 1.0, 5.0);
        let exhaustive = ExhaustiveSearch::new(&cloud).unwrap();

        for _ in 0..50 {
            let query = Point3::new(
                rng.random_range(-0.2..0.2),
                rng.random_range(-0.2..0.2),
                rng.random_range(0.5..6.0),
            );
            let k = rng.random_range(1..=30);
            let result = exhaustive.nearest_k_search(&query, k).unwrap();
            let expected = brute_force_knn(&cloud, &query, k);
            let got: Vec<(usize, f64)> = result.iter().map(|n| (n.index, n.sqr_distance)).collect();
            assert_eq!(got, expected);

            let radius = rng.random_range(0.0..1.0);
            let found: HashSet<usize> = exhaustive
                .radius_search(&query, radius, None)
                .unwrap()
                .indices
                .into_iter()
                .collect();
            assert_eq!(found, brute_force_radius(&cloud, &query, radius));
        }
    }
}
