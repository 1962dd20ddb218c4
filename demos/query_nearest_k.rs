//! Find the K nearest points to a query in an organized cloud.
//!
//! The cloud is a flat 5x5 wall one unit in front of a sensor whose pixels are
//! 0.1 apart at that depth. Results are sorted by distance (closest first).

use organized_search::prelude::*;

/// 5x5 wall at z = 1 seen through pixels 0.1 apart.
fn wall() -> OrganizedCloud {
    let f = 0.1;
    let mut points = Vec::new();
    for row in 0..5 {
        for col in 0..5 {
            points.push(Point3::new((col as f64 - 2.0) * f, (row as f64 - 2.0) * f, 1.0));
        }
    }
    OrganizedCloud::new(5, 5, points)
}

fn main() {
    let cloud = wall();
    let mut search = OrganizedNeighborSearch::new(0.1).expect("valid focal length");
    search.set_input_cloud(&cloud).expect("organized cloud");

    println!("=== Nearest K Example ===\n");

    // Query 1: the centre point itself
    println!("Query 1: 1 nearest point to the centre pixel (index 12):");
    let result = search.nearest_k_search_at(12, 1).expect("valid query");
    println!("  Result: {:?}", result.indices);
    assert_eq!(result.indices, vec![12], "The point itself should be nearest");
    println!("  ✓ Correct!\n");

    // Query 2: the centre and its four direct neighbors
    println!("Query 2: 5 nearest points to the centre pixel:");
    let result = search.nearest_k_search_at(12, 5).expect("valid query");
    println!("  Result: {:?}", result.indices);
    println!("  Squared distances: {:?}", result.sqr_distances);
    let mut ring: Vec<usize> = result.indices[1..].to_vec();
    ring.sort_unstable();
    assert_eq!(ring, vec![7, 11, 13, 17], "Direct neighbors follow the centre");
    println!("  ✓ Correct!\n");

    // Query 3: a point hovering in front of the wall
    println!("Query 3: 3 nearest points to (0.14, -0.05, 0.9):");
    let query = Point3::new(0.14, -0.05, 0.9);
    let (result, stats) = search
        .nearest_k_search_with_stats(&query, 3)
        .expect("valid query");
    println!("  Result: {:?}", result.indices);
    println!("  Visited {} cells in {} rings", stats.visited_cells, stats.rings);
    let expected = ExhaustiveSearch::new(&cloud)
        .expect("organized cloud")
        .nearest_k_search(&query, 3)
        .expect("valid query");
    assert_eq!(result.indices, expected.indices, "Matches the exhaustive scan");
    println!("  ✓ Matches exhaustive search!\n");

    // Query 4: more points than exist
    println!("Query 4: 100 nearest points (only 25 exist):");
    let result = search.nearest_k_search_at(0, 100).expect("valid query");
    println!("  Result count: {}", result.len());
    assert_eq!(result.len(), 25, "Should return all available points");
    println!("  ✓ Correct!");
}
