//! Prelude module for convenient imports
//!
//! This module re-exports the most commonly used types from the crate.
//! Users can import everything they need with:
//!
//! ```
//! use organized_search::prelude::*;
//! ```

pub use crate::{
    CameraModel, ExhaustiveSearch, Neighbor, NeighborResults, OrganizedCloud,
    OrganizedNeighborSearch, Point3, QueryStats, ResultSet, SearchError,
};
