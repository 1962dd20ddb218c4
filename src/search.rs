//! Neighbor search over an organized cloud.
//!
//! The engine projects the query into the pixel grid, visits the grid in rings
//! around the projected cell and stops as soon as the ring bound proves that no
//! unvisited point can change the result. No index is built: binding a cloud is
//! O(1) with a fixed camera model.

use crate::cloud::{OrganizedCloud, Point3};
use crate::error::{Result, SearchError};
use crate::projection::{CameraModel, validate_focal};
use crate::results::{KnnResultSet, Neighbor, NeighborResults, RadiusResultSet, ResultSet};
use crate::window::{RingBound, RingWindow};

/// Where the engine takes its camera model from when a cloud is bound.
#[derive(Clone, Copy, Debug, PartialEq)]
enum CameraSource {
    /// Given focal length, principal point at the centre of each bound cloud.
    Centered(f64),
    /// Fully specified model used for every cloud.
    Fixed(CameraModel),
    /// Estimated from each bound cloud.
    Estimated,
}

/// Work done by a single query.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryStats {
    /// Rings visited, the seed cell counting as the first ring.
    pub rings: usize,
    /// In-grid cells visited, invalid pixels included.
    pub visited_cells: usize,
}

/// K-nearest-neighbor and radius search over an organized point cloud.
///
/// The engine borrows the cloud; queries take `&self` and may run concurrently
/// from several threads. Rebinding takes `&mut self`.
///
/// Results match an exhaustive scan for clouds in which every valid point lies in
/// front of the sensor and projects, under the engine's camera model, to its own
/// cell.
///
/// # Examples
/// ```
/// use organized_search::prelude::*;
///
/// let f = 0.0018;
/// let (width, height) = (8, 6);
/// let mut points = Vec::new();
/// for row in 0..height {
///     for col in 0..width {
///         let z = 2.0 + 0.1 * (row + col) as f64;
///         let x = (col as f64 - (width / 2) as f64) * f * z;
///         let y = (row as f64 - (height / 2) as f64) * f * z;
///         points.push(Point3::new(x, y, z));
///     }
/// }
/// let cloud = OrganizedCloud::new(width, height, points);
///
/// let mut search = OrganizedNeighborSearch::new(f).unwrap();
/// search.set_input_cloud(&cloud).unwrap();
///
/// let query = cloud.points[cloud.index_of(2, 3)];
/// let nearest = search.nearest_k_search(&query, 3).unwrap();
/// assert_eq!(nearest.indices[0], cloud.index_of(2, 3));
/// assert_eq!(nearest.len(), 3);
/// ```
#[derive(Clone, Debug)]
pub struct OrganizedNeighborSearch<'a> {
    source: CameraSource,
    input: Option<(&'a OrganizedCloud, CameraModel)>,
}

impl<'a> OrganizedNeighborSearch<'a> {
    /// Creates an engine for a sensor with reciprocal focal length
    /// `inv_focal_length`; the principal point is the centre of each bound cloud.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] if the focal length is not finite
    /// and positive.
    pub fn new(inv_focal_length: f64) -> Result<Self> {
        validate_focal(inv_focal_length)?;
        Ok(OrganizedNeighborSearch {
            source: CameraSource::Centered(inv_focal_length),
            input: None,
        })
    }

    /// Creates an engine using `camera` for every bound cloud.
    pub fn with_camera(camera: CameraModel) -> Self {
        OrganizedNeighborSearch {
            source: CameraSource::Fixed(camera),
            input: None,
        }
    }

    /// Creates an engine that estimates the camera model from each bound cloud
    /// with [`CameraModel::estimate`].
    pub fn with_estimated_camera() -> Self {
        OrganizedNeighborSearch {
            source: CameraSource::Estimated,
            input: None,
        }
    }

    /// Binds `cloud` for subsequent queries, replacing any previous binding.
    ///
    /// On error the previous binding is kept.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidCloud`] if `width * height` differs from the
    /// number of points, and [`SearchError::CameraEstimation`] if the engine
    /// estimates its camera and the cloud has no usable point.
    pub fn set_input_cloud(&mut self, cloud: &'a OrganizedCloud) -> Result<()> {
        if !cloud.is_organized() {
            return Err(SearchError::InvalidCloud {
                width: cloud.width,
                height: cloud.height,
                points: cloud.len(),
            });
        }
        let camera = match self.source {
            CameraSource::Centered(f) => CameraModel::centered(f, cloud.width, cloud.height)?,
            CameraSource::Fixed(camera) => camera,
            CameraSource::Estimated => CameraModel::estimate(cloud)?,
        };
        self.input = Some((cloud, camera));
        Ok(())
    }

    /// The bound cloud, if any.
    #[inline]
    pub fn input_cloud(&self) -> Option<&'a OrganizedCloud> {
        self.input.map(|(cloud, _)| cloud)
    }

    /// Camera model in effect for the bound cloud, if any.
    #[inline]
    pub fn camera(&self) -> Option<CameraModel> {
        self.input.map(|(_, camera)| camera)
    }

    /// Finds the `k` points nearest to `query`, nearest first.
    ///
    /// Returns all valid points if the cloud holds fewer than `k`.
    ///
    /// # Errors
    /// [`SearchError::MissingCloud`] before a cloud is bound,
    /// [`SearchError::InvalidParameter`] for `k == 0` and
    /// [`SearchError::InvalidQueryPoint`] for a query that cannot be projected.
    pub fn nearest_k_search(&self, query: &Point3, k: usize) -> Result<NeighborResults> {
        self.nearest_k_search_with_stats(query, k)
            .map(|(results, _)| results)
    }

    /// [`nearest_k_search`](Self::nearest_k_search) that also reports the work done.
    ///
    /// # Errors
    /// Same as [`nearest_k_search`](Self::nearest_k_search).
    pub fn nearest_k_search_with_stats(
        &self,
        query: &Point3,
        k: usize,
    ) -> Result<(NeighborResults, QueryStats)> {
        let (cloud, camera) = self.bound()?;
        if k == 0 {
            return Err(SearchError::InvalidParameter("k must be at least 1"));
        }
        let mut results = KnnResultSet::new(k.min(cloud.len()));
        let stats = expand(cloud, camera, query, &mut results)?;
        Ok((results.finalize(), stats))
    }

    /// Nearest-neighbor search around the cloud point at `index`.
    ///
    /// # Errors
    /// As [`nearest_k_search`](Self::nearest_k_search), plus
    /// [`SearchError::InvalidParameter`] for an out-of-range index and
    /// [`SearchError::InvalidQueryPoint`] for an invalid pixel.
    pub fn nearest_k_search_at(&self, index: usize, k: usize) -> Result<NeighborResults> {
        let query = self.point_at(index)?;
        self.nearest_k_search(&query, k)
    }

    /// Finds every point within `radius` of `query`, at most `max_nn` of them when
    /// given. The order of the output is unspecified.
    ///
    /// When more than `max_nn` points qualify, which of them are returned is
    /// unspecified.
    ///
    /// # Errors
    /// [`SearchError::MissingCloud`] before a cloud is bound,
    /// [`SearchError::InvalidParameter`] for a negative or NaN radius and
    /// [`SearchError::InvalidQueryPoint`] for a query that cannot be projected.
    pub fn radius_search(
        &self,
        query: &Point3,
        radius: f64,
        max_nn: Option<usize>,
    ) -> Result<NeighborResults> {
        self.radius_search_with_stats(query, radius, max_nn)
            .map(|(results, _)| results)
    }

    /// [`radius_search`](Self::radius_search) that also reports the work done.
    ///
    /// # Errors
    /// Same as [`radius_search`](Self::radius_search).
    pub fn radius_search_with_stats(
        &self,
        query: &Point3,
        radius: f64,
        max_nn: Option<usize>,
    ) -> Result<(NeighborResults, QueryStats)> {
        let (cloud, camera) = self.bound()?;
        if radius.is_nan() || radius < 0.0 {
            return Err(SearchError::InvalidParameter("radius must be non-negative"));
        }
        let mut results = RadiusResultSet::new(radius, max_nn);
        let stats = expand(cloud, camera, query, &mut results)?;
        Ok((results.finalize(), stats))
    }

    /// Radius search around the cloud point at `index`.
    ///
    /// # Errors
    /// As [`radius_search`](Self::radius_search), plus
    /// [`SearchError::InvalidParameter`] for an out-of-range index and
    /// [`SearchError::InvalidQueryPoint`] for an invalid pixel.
    pub fn radius_search_at(
        &self,
        index: usize,
        radius: f64,
        max_nn: Option<usize>,
    ) -> Result<NeighborResults> {
        let query = self.point_at(index)?;
        self.radius_search(&query, radius, max_nn)
    }

    fn bound(&self) -> Result<(&'a OrganizedCloud, CameraModel)> {
        self.input.ok_or(SearchError::MissingCloud)
    }

    fn point_at(&self, index: usize) -> Result<Point3> {
        let (cloud, _) = self.bound()?;
        cloud
            .points
            .get(index)
            .copied()
            .ok_or(SearchError::InvalidParameter("point index out of range"))
    }
}

/// Visits rings around the query's cell, feeding valid points to `results`,
/// until the grid is covered or the ring bound exceeds the worst accepted
/// distance.
fn expand<R: ResultSet>(
    cloud: &OrganizedCloud,
    camera: CameraModel,
    query: &Point3,
    results: &mut R,
) -> Result<QueryStats> {
    let bound = RingBound::new(camera, query)?;
    let mut stats = QueryStats::default();
    if cloud.is_empty() || results.is_saturated() {
        return Ok(stats);
    }

    let (seed_row, seed_col) = camera.project(query, cloud.width, cloud.height)?;
    let window = RingWindow::new(seed_row, seed_col, cloud.width, cloud.height);

    let mut ring = 0;
    loop {
        window.for_each_cell(ring, |row, col| {
            stats.visited_cells += 1;
            let index = cloud.index_of(row, col);
            let p = &cloud.points[index];
            if p.is_finite() {
                results.insert(Neighbor::new(index, p.sqr_distance(query)));
            }
        });
        stats.rings += 1;

        if window.covers_grid(ring) || results.is_saturated() {
            break;
        }
        if bound.beyond_ring_sq(&window, ring) > results.worst_sqr_distance() {
            break;
        }
        ring += 1;
    }

    Ok(stats)
}
