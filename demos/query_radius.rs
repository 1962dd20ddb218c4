//! Find every point within a radius of a query in an organized cloud.
//!
//! Radius results come in no particular order; `max_nn` caps how many are returned.

use organized_search::prelude::*;

fn main() {
    // 7x7 wall at z = 2 seen through pixels 0.05 apart.
    let f = 0.025;
    let mut points = Vec::new();
    for row in 0..7 {
        for col in 0..7 {
            let z = 2.0;
            points.push(Point3::new((col as f64 - 3.0) * f * z, (row as f64 - 3.0) * f * z, z));
        }
    }
    let cloud = OrganizedCloud::new(7, 7, points);

    let mut search = OrganizedNeighborSearch::new(f).expect("valid focal length");
    search.set_input_cloud(&cloud).expect("organized cloud");

    println!("=== Radius Search Example ===\n");

    // Query 1: centre pixel, radius just above one pixel spacing
    println!("Query 1: points within 0.06 of the centre (index 24):");
    let result = search.radius_search_at(24, 0.06, None).expect("valid query");
    let mut found = result.indices.clone();
    found.sort_unstable();
    println!("  Found {} points: {:?}", found.len(), found);
    assert_eq!(found, vec![17, 23, 24, 25, 31], "Centre and its direct neighbors");
    println!("  ✓ Correct!\n");

    // Query 2: same radius, capped at 2 results
    println!("Query 2: same query with max_nn = 2:");
    let result = search.radius_search_at(24, 0.06, Some(2)).expect("valid query");
    println!("  Found {} points: {:?}", result.len(), result.indices);
    assert!(result.len() <= 2, "At most 2 results");
    println!("  ✓ Correct!\n");

    // Query 3: zero radius only returns coincident points
    println!("Query 3: radius 0 around index 10:");
    let result = search.radius_search_at(10, 0.0, None).expect("valid query");
    println!("  Found: {:?}", result.indices);
    assert_eq!(result.indices, vec![10], "Only the point itself");
    println!("  ✓ Correct!\n");

    // Query 4: a query behind the sensor is rejected
    println!("Query 4: query with negative depth:");
    let err = search
        .radius_search(&Point3::new(0.0, 0.0, -1.0), 1.0, None)
        .unwrap_err();
    println!("  Error: {}", err);
    assert_eq!(err, SearchError::InvalidQueryPoint);
    println!("  ✓ Rejected!");
}
