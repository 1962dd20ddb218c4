//! Error types for organized neighbor search.

use std::fmt;

/// Errors reported by cloud binding, camera setup and queries.
///
/// Every error is detected before any output is produced.
#[derive(Clone, Debug, PartialEq)]
#[non_exhaustive]
pub enum SearchError {
    /// The cloud's point count does not match `width * height`.
    InvalidCloud {
        /// Declared grid width.
        width: usize,
        /// Declared grid height.
        height: usize,
        /// Number of points actually stored.
        points: usize,
    },

    /// The camera model could not be estimated because no valid point lies off
    /// the centre row and column.
    CameraEstimation,

    /// The query point has a non-finite coordinate or non-positive depth.
    InvalidQueryPoint,

    /// A query or camera parameter is out of range.
    InvalidParameter(&'static str),

    /// A query was issued before a cloud was bound.
    MissingCloud,
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::InvalidCloud {
                width,
                height,
                points,
            } => {
                write!(
                    f,
                    "invalid cloud: {}x{} grid but {} points",
                    width, height, points
                )
            }
            SearchError::CameraEstimation => {
                write!(f, "invalid cloud: no point usable for focal length estimation")
            }
            SearchError::InvalidQueryPoint => {
                write!(f, "invalid query point: non-finite coordinate or non-positive depth")
            }
            SearchError::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
            SearchError::MissingCloud => write!(f, "no input cloud bound"),
        }
    }
}

impl std::error::Error for SearchError {}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SearchError>;
