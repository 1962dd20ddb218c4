//! # Organized Search - neighbor queries on depth-sensor point clouds
//!
//! A Rust library answering K-nearest-neighbor and radius queries on *organized*
//! point clouds: clouds stored as a row-major pixel grid, as produced by depth
//! sensors with a pinhole camera model.
//!
//! ## Features
//!
//! - **No index to build**: the pixel grid already is the spatial structure
//! - **Exact results**: pruning is conservative, output matches an exhaustive scan
//! - **K-nearest and radius queries**, by point or by cloud index
//! - **Shared queries**: queries only take `&self` and can run from many threads
//!
//! ## Quick Start
//!
//! ```rust
//! use organized_search::prelude::*;
//!
//! // A 4x4 grid seen by a sensor with reciprocal focal length 0.01, flat at z = 1.
//! let f = 0.01;
//! let mut points = Vec::new();
//! for row in 0..4 {
//!     for col in 0..4 {
//!         let x = (col as f64 - 2.0) * f;
//!         let y = (row as f64 - 2.0) * f;
//!         points.push(Point3::new(x, y, 1.0));
//!     }
//! }
//! let cloud = OrganizedCloud::new(4, 4, points);
//!
//! let mut search = OrganizedNeighborSearch::new(f).unwrap();
//! search.set_input_cloud(&cloud).unwrap();
//!
//! // Nearest point to the centre pixel's point is the point itself.
//! let query = cloud.points[cloud.index_of(2, 2)];
//! let nearest = search.nearest_k_search(&query, 1).unwrap();
//! assert_eq!(nearest.indices, vec![cloud.index_of(2, 2)]);
//!
//! // The four direct neighbors are 0.01 away.
//! let within = search.radius_search(&query, 0.0105, None).unwrap();
//! assert_eq!(within.len(), 5);
//! ```
//!
//! ## How It Works
//!
//! The query point is projected into the pixel grid with the camera model. Cells
//! are then visited in square rings of growing radius around that pixel. After
//! each ring, every unvisited pixel lies beyond one side of the visited square,
//! and every point seen through such a pixel lies behind a plane through the
//! sensor origin. The query's distance to the nearest of those planes bounds the
//! distance to every unvisited point; once it exceeds the current K-th best
//! distance (or the search radius) the search stops.

mod cloud;
mod error;
mod exhaustive;
mod projection;
mod results;
mod search;
mod window;

pub mod prelude;

#[cfg(test)]
mod comparison_tests;

pub use cloud::{OrganizedCloud, Point3};
pub use error::{Result, SearchError};
pub use exhaustive::ExhaustiveSearch;
pub use projection::CameraModel;
pub use results::{KnnResultSet, Neighbor, NeighborResults, RadiusResultSet, ResultSet};
pub use search::{OrganizedNeighborSearch, QueryStats};
pub use window::{RingBound, RingWindow};
