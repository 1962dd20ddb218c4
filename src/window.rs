//! Ring-by-ring expansion of a search window over the pixel grid.
//!
//! Ring `r` around a seed cell is the boundary of the `(2r + 1) x (2r + 1)` square
//! centred on the seed. Rings are clipped to the grid; cells outside are never
//! produced. Together the rings `0..=r` cover exactly the clipped square of radius
//! `r`, and every grid cell belongs to exactly one ring.
//!
//! [`RingBound`] turns the pinhole model into a pruning rule: after ring `r` is
//! visited, every unvisited cell lies beyond one of the square's four sides. All
//! points seen through those cells are on the far side of a plane through the
//! sensor origin, and the query's distance to that plane bounds their distance.

use crate::cloud::Point3;
use crate::error::Result;
use crate::projection::CameraModel;

/// Offset, in pixels, of a side's bounding plane inside the first unvisited
/// column or row. A point whose projection rounds to its own cell is never more
/// than half a pixel away from the cell centre.
const EDGE_INSET: f64 = 0.5;

/// Relative shrink applied to every bound to absorb floating-point error.
const BOUND_SLACK: f64 = 1e-9;

/// Concentric square rings around a seed cell, clipped to a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RingWindow {
    width: usize,
    height: usize,
    seed_row: usize,
    seed_col: usize,
}

impl RingWindow {
    /// Creates a window centred on `(seed_row, seed_col)` of a `width` x `height`
    /// grid. The seed must lie inside the grid unless the grid is empty, in which
    /// case the window has no cells.
    pub fn new(seed_row: usize, seed_col: usize, width: usize, height: usize) -> Self {
        debug_assert!(
            width == 0 || height == 0 || (seed_row < height && seed_col < width),
            "seed ({}, {}) outside {}x{} grid",
            seed_row,
            seed_col,
            width,
            height
        );
        RingWindow {
            width,
            height,
            seed_row,
            seed_col,
        }
    }

    /// Returns true if the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Seed cell as `(row, col)`.
    #[inline]
    pub fn seed(&self) -> (usize, usize) {
        (self.seed_row, self.seed_col)
    }

    /// Returns true once the square of radius `ring` reaches every grid edge.
    #[inline]
    pub fn covers_grid(&self, ring: usize) -> bool {
        ring >= self.seed_col
            && ring >= self.seed_row
            && self.seed_col + ring + 1 >= self.width
            && self.seed_row + ring + 1 >= self.height
    }

    /// Smallest ring whose square covers the whole grid; 0 for an empty grid.
    pub fn last_ring(&self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let cols = self.seed_col.max(self.width - 1 - self.seed_col);
        let rows = self.seed_row.max(self.height - 1 - self.seed_row);
        cols.max(rows)
    }

    /// Calls `visit(row, col)` for every in-grid cell of ring `ring`.
    ///
    /// Cells are produced row by row: the top edge, the two side columns, then the
    /// bottom edge.
    pub fn for_each_cell<F>(&self, ring: usize, mut visit: F)
    where
        F: FnMut(usize, usize),
    {
        if self.is_empty() {
            return;
        }
        if ring == 0 {
            visit(self.seed_row, self.seed_col);
            return;
        }

        let col_lo = self.seed_col.saturating_sub(ring);
        let col_hi = (self.seed_col + ring).min(self.width - 1);

        // Top edge, corners included.
        if let Some(top) = self.seed_row.checked_sub(ring) {
            for col in col_lo..=col_hi {
                visit(top, col);
            }
        }

        // Side columns without the corners.
        let row_lo = self.seed_row.saturating_sub(ring - 1);
        let row_hi = (self.seed_row + ring - 1).min(self.height - 1);
        let left = self.seed_col.checked_sub(ring);
        let right = Some(self.seed_col + ring).filter(|&c| c < self.width);
        for row in row_lo..=row_hi {
            if let Some(col) = left {
                visit(row, col);
            }
            if let Some(col) = right {
                visit(row, col);
            }
        }

        // Bottom edge, corners included.
        let bottom = self.seed_row + ring;
        if bottom < self.height {
            for col in col_lo..=col_hi {
                visit(bottom, col);
            }
        }
    }

    /// Number of in-grid cells in ring `ring`.
    pub fn ring_len(&self, ring: usize) -> usize {
        let mut n = 0;
        self.for_each_cell(ring, |_, _| n += 1);
        n
    }
}

/// Lower bound on the distance from a query to points beyond a ring.
///
/// The bound holds for every point that lies in front of the sensor and whose
/// projection rounds to its own cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RingBound {
    camera: CameraModel,
    row: f64,
    col: f64,
    depth: f64,
}

impl RingBound {
    /// Prepares the bound for `query`.
    ///
    /// # Errors
    /// Returns [`SearchError::InvalidQueryPoint`](crate::SearchError::InvalidQueryPoint)
    /// if the query cannot be projected.
    pub fn new(camera: CameraModel, query: &Point3) -> Result<Self> {
        let (row, col) = camera.pixel_coords(query)?;
        Ok(RingBound {
            camera,
            row,
            col,
            depth: query.z,
        })
    }

    /// Conservative squared distance from the query to any point stored outside
    /// the square of radius `ring` of `window`.
    ///
    /// Returns `f64::INFINITY` when the square covers the whole grid.
    pub fn beyond_ring_sq(&self, window: &RingWindow, ring: usize) -> f64 {
        let (seed_row, seed_col) = window.seed();
        let mut best = f64::INFINITY;

        if seed_col + ring + 1 < window.width {
            let edge = (seed_col + ring + 1) as f64 - EDGE_INSET;
            let d = self.plane_distance(edge - self.col, self.camera.col_slope(edge));
            best = best.min(d);
        }
        if ring < seed_col {
            let edge = (seed_col - ring - 1) as f64 + EDGE_INSET;
            let d = self.plane_distance(self.col - edge, self.camera.col_slope(edge));
            best = best.min(d);
        }
        if seed_row + ring + 1 < window.height {
            let edge = (seed_row + ring + 1) as f64 - EDGE_INSET;
            let d = self.plane_distance(edge - self.row, self.camera.row_slope(edge));
            best = best.min(d);
        }
        if ring < seed_row {
            let edge = (seed_row - ring - 1) as f64 + EDGE_INSET;
            let d = self.plane_distance(self.row - edge, self.camera.row_slope(edge));
            best = best.min(d);
        }

        best * best
    }

    /// Distance from the query to the plane `coord = slope * z`, given the query's
    /// pixel offset `delta` towards that plane.
    #[inline]
    fn plane_distance(&self, delta: f64, slope: f64) -> f64 {
        if delta <= 0.0 {
            return 0.0;
        }
        let d = delta * self.camera.inv_focal_length() * self.depth / (1.0 + slope * slope).sqrt();
        if d.is_finite() {
            d * (1.0 - BOUND_SLACK)
        } else {
            0.0
        }
    }
}
