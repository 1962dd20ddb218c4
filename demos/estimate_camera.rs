//! Estimate the camera model from an organized cloud instead of configuring it.
//!
//! The reciprocal focal length is recovered from the points themselves, which is
//! handy when a frame arrives without its sensor intrinsics.

use organized_search::prelude::*;

fn main() {
    let f = 0.0018;
    let (width, height) = (64, 48);
    let mut points = Vec::with_capacity(width * height);
    for row in 0..height {
        for col in 0..width {
            // Slanted floor: depth grows towards the bottom of the frame.
            let z = 3.0 + 0.05 * row as f64;
            let x = (col as f64 - 32.0) * f * z;
            let y = (row as f64 - 24.0) * f * z;
            points.push(Point3::new(x, y, z));
        }
    }
    let cloud = OrganizedCloud::new(width, height, points);

    let mut search = OrganizedNeighborSearch::with_estimated_camera();
    search.set_input_cloud(&cloud).expect("cloud with usable points");

    let camera = search.camera().expect("bound cloud");
    println!("=== Camera Estimation Example ===\n");
    println!("  Estimated reciprocal focal length: {:.6}", camera.inv_focal_length());
    println!("  Principal point: ({}, {})", camera.center_x(), camera.center_y());
    assert!((camera.inv_focal_length() - f).abs() < 1e-9, "Focal length recovered");
    println!("  ✓ Correct!\n");

    let result = search.nearest_k_search_at(cloud.index_of(10, 10), 4).expect("valid query");
    println!("  4 nearest to pixel (10, 10): {:?}", result.indices);
    assert_eq!(result.indices[0], cloud.index_of(10, 10), "The point itself comes first");
    println!("  ✓ Correct!");
}
