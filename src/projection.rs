//! Pinhole projection between sensor coordinates and grid cells.
//!
//! A depth sensor with reciprocal focal length `f` and principal point
//! `(center_x, center_y)` stores the point seen through pixel `(row, col)` so that
//!
//! ```text
//! x = (col - center_x) * f * z
//! y = (row - center_y) * f * z
//! ```
//!
//! Projection inverts this relation and rounds to the nearest cell.

use crate::cloud::{OrganizedCloud, Point3};
use crate::error::{Result, SearchError};

/// Checks that a reciprocal focal length is finite and positive.
pub(crate) fn validate_focal(inv_focal_length: f64) -> Result<()> {
    if inv_focal_length.is_finite() && inv_focal_length > 0.0 {
        Ok(())
    } else {
        Err(SearchError::InvalidParameter(
            "reciprocal focal length must be finite and positive",
        ))
    }
}

/// Pinhole camera model of the sensor that produced an organized cloud.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraModel {
    inv_focal_length: f64,
    center_x: f64,
    center_y: f64,
}

impl CameraModel {
    /// Creates a camera model from a reciprocal focal length and principal point.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidParameter`] if the focal length is not finite
    /// and positive, or the principal point is not finite.
    pub fn new(inv_focal_length: f64, center_x: f64, center_y: f64) -> Result<Self> {
        validate_focal(inv_focal_length)?;
        if !(center_x.is_finite() && center_y.is_finite()) {
            return Err(SearchError::InvalidParameter("principal point must be finite"));
        }
        Ok(CameraModel {
            inv_focal_length,
            center_x,
            center_y,
        })
    }

    /// Creates a camera model whose principal point is the grid centre
    /// `(width >> 1, height >> 1)`.
    ///
    /// # Errors
    /// Same as [`CameraModel::new`].
    pub fn centered(inv_focal_length: f64, width: usize, height: usize) -> Result<Self> {
        Self::new(
            inv_focal_length,
            (width >> 1) as f64,
            (height >> 1) as f64,
        )
    }

    /// Estimates the reciprocal focal length of a cloud, assuming a centred
    /// principal point.
    ///
    /// Every valid point in front of the sensor that is off the centre column
    /// contributes `x / (z * (col - center_x))`, and likewise for rows; the
    /// estimate is the mean of all contributions.
    ///
    /// # Errors
    /// Returns [`SearchError::CameraEstimation`] if no point contributes or the
    /// estimate is not a usable focal length.
    pub fn estimate(cloud: &OrganizedCloud) -> Result<Self> {
        let center_x = (cloud.width >> 1) as f64;
        let center_y = (cloud.height >> 1) as f64;

        let mut sum = 0.0;
        let mut count = 0usize;
        for (idx, p) in cloud.valid_points() {
            if p.z <= 0.0 {
                continue;
            }
            let col = (idx % cloud.width) as f64;
            let row = (idx / cloud.width) as f64;
            if col != center_x {
                sum += p.x / (p.z * (col - center_x));
                count += 1;
            }
            if row != center_y {
                sum += p.y / (p.z * (row - center_y));
                count += 1;
            }
        }

        if count == 0 {
            return Err(SearchError::CameraEstimation);
        }
        Self::new(sum / count as f64, center_x, center_y)
            .map_err(|_| SearchError::CameraEstimation)
    }

    /// Reciprocal focal length (angular size of one pixel).
    #[inline]
    pub fn inv_focal_length(&self) -> f64 {
        self.inv_focal_length
    }

    /// Principal point column.
    #[inline]
    pub fn center_x(&self) -> f64 {
        self.center_x
    }

    /// Principal point row.
    #[inline]
    pub fn center_y(&self) -> f64 {
        self.center_y
    }

    /// Continuous, unclamped pixel coordinates `(row, col)` of a point.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidQueryPoint`] for non-finite coordinates or
    /// depth `<= 0`.
    pub fn pixel_coords(&self, point: &Point3) -> Result<(f64, f64)> {
        if !point.is_finite() || point.z <= 0.0 {
            return Err(SearchError::InvalidQueryPoint);
        }
        let scale = point.z * self.inv_focal_length;
        let col = point.x / scale + self.center_x;
        let row = point.y / scale + self.center_y;
        Ok((row, col))
    }

    /// Nearest grid cell `(row, col)` of a point, clamped to a `width` x `height`
    /// grid.
    ///
    /// # Errors
    /// Same as [`CameraModel::pixel_coords`], and
    /// [`SearchError::InvalidParameter`] for an empty grid.
    pub fn project(&self, point: &Point3, width: usize, height: usize) -> Result<(usize, usize)> {
        if width == 0 || height == 0 {
            return Err(SearchError::InvalidParameter("cannot project into an empty grid"));
        }
        let (row, col) = self.pixel_coords(point)?;
        Ok((clamp_to_cell(row, height), clamp_to_cell(col, width)))
    }

    /// Slope `x / z` of the plane through the sensor origin that contains the
    /// continuous pixel column `col`.
    #[inline]
    pub(crate) fn col_slope(&self, col: f64) -> f64 {
        (col - self.center_x) * self.inv_focal_length
    }

    /// Row counterpart of [`CameraModel::col_slope`].
    #[inline]
    pub(crate) fn row_slope(&self, row: f64) -> f64 {
        (row - self.center_y) * self.inv_focal_length
    }
}

/// Rounds a continuous pixel coordinate and clamps it into `[0, extent)`.
#[inline]
fn clamp_to_cell(v: f64, extent: usize) -> usize {
    let max = (extent - 1) as f64;
    let clamped = v.round().clamp(0.0, max);
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is clamped to [0, extent - 1] before the cast"
    )]
    let cell = clamped as usize;
    cell
}
