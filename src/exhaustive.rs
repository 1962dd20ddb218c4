//! Exhaustive (linear scan) search over an organized cloud.
//!
//! This is the reference against which [`OrganizedNeighborSearch`] is checked,
//! and the fallback for clouds that do not follow the pinhole model. It uses the
//! same result sets, so outputs share ordering and tie-breaking conventions.
//!
//! [`OrganizedNeighborSearch`]: crate::OrganizedNeighborSearch

use crate::cloud::{OrganizedCloud, Point3};
use crate::error::{Result, SearchError};
use crate::results::{KnnResultSet, Neighbor, NeighborResults, RadiusResultSet, ResultSet};

/// Linear scan over every valid point of a cloud.
#[derive(Clone, Copy, Debug)]
pub struct ExhaustiveSearch<'a> {
    cloud: &'a OrganizedCloud,
}

impl<'a> ExhaustiveSearch<'a> {
    /// Creates a scanner over `cloud`.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidCloud`] if `width * height` differs from the
    /// number of points.
    pub fn new(cloud: &'a OrganizedCloud) -> Result<Self> {
        if !cloud.is_organized() {
            return Err(SearchError::InvalidCloud {
                width: cloud.width,
                height: cloud.height,
                points: cloud.len(),
            });
        }
        Ok(ExhaustiveSearch { cloud })
    }

    /// The scanned cloud.
    #[inline]
    pub fn cloud(&self) -> &'a OrganizedCloud {
        self.cloud
    }

    /// The `k` points nearest to `query`, nearest first.
    ///
    /// # Errors
    /// [`SearchError::InvalidParameter`] for `k == 0`,
    /// [`SearchError::InvalidQueryPoint`] for a non-finite query.
    pub fn nearest_k_search(&self, query: &Point3, k: usize) -> Result<NeighborResults> {
        if k == 0 {
            return Err(SearchError::InvalidParameter("k must be at least 1"));
        }
        check_query(query)?;
        let mut results = KnnResultSet::new(k);
        self.scan(query, &mut results);
        Ok(results.finalize())
    }

    /// Every point within `radius` of `query`, in index order, truncated to the
    /// first `max_nn` when given.
    ///
    /// # Errors
    /// [`SearchError::InvalidParameter`] for a negative or NaN radius,
    /// [`SearchError::InvalidQueryPoint`] for a non-finite query.
    pub fn radius_search(
        &self,
        query: &Point3,
        radius: f64,
        max_nn: Option<usize>,
    ) -> Result<NeighborResults> {
        if radius.is_nan() || radius < 0.0 {
            return Err(SearchError::InvalidParameter("radius must be non-negative"));
        }
        check_query(query)?;
        let mut results = RadiusResultSet::new(radius, max_nn);
        self.scan(query, &mut results);
        Ok(results.finalize())
    }

    fn scan<R: ResultSet>(&self, query: &Point3, results: &mut R) {
        for (index, p) in self.cloud.valid_points() {
            if results.is_saturated() {
                break;
            }
            results.insert(Neighbor::new(index, p.sqr_distance(query)));
        }
    }
}

fn check_query(query: &Point3) -> Result<()> {
    if query.is_finite() {
        Ok(())
    } else {
        Err(SearchError::InvalidQueryPoint)
    }
}
