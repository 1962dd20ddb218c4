//! Per-query result accumulators.
//!
//! A result set is created for one query, fed every visited point, and consumed by
//! [`ResultSet::finalize`]. Distances are squared Euclidean throughout.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A candidate neighbor: point index and squared distance to the query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    /// Flat index of the point in the cloud.
    pub index: usize,
    /// Squared Euclidean distance to the query.
    pub sqr_distance: f64,
}

impl Neighbor {
    /// Creates a candidate.
    #[inline]
    pub const fn new(index: usize, sqr_distance: f64) -> Self {
        Neighbor {
            index,
            sqr_distance,
        }
    }
}

impl Eq for Neighbor {}

impl PartialOrd for Neighbor {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Distance first, lower index first on ties.
impl Ord for Neighbor {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.sqr_distance
            .total_cmp(&other.sqr_distance)
            .then(self.index.cmp(&other.index))
    }
}

/// Output of a query: parallel sequences of indices and squared distances.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NeighborResults {
    /// Point indices.
    pub indices: Vec<usize>,
    /// Squared distances, `sqr_distances[i]` belongs to `indices[i]`.
    pub sqr_distances: Vec<f64>,
}

impl NeighborResults {
    /// Number of neighbors found.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns true if no neighbor was found.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Iterator over the neighbors as [`Neighbor`] values.
    pub fn iter(&self) -> impl Iterator<Item = Neighbor> + '_ {
        self.indices
            .iter()
            .zip(&self.sqr_distances)
            .map(|(&index, &sqr_distance)| Neighbor::new(index, sqr_distance))
    }
}

impl FromIterator<Neighbor> for NeighborResults {
    fn from_iter<I: IntoIterator<Item = Neighbor>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let (lower, _) = iter.size_hint();
        let mut out = NeighborResults {
            indices: Vec::with_capacity(lower),
            sqr_distances: Vec::with_capacity(lower),
        };
        for n in iter {
            out.indices.push(n.index);
            out.sqr_distances.push(n.sqr_distance);
        }
        out
    }
}

/// Accumulates candidates during a query.
pub trait ResultSet {
    /// Offers a candidate to the set.
    fn insert(&mut self, candidate: Neighbor);

    /// Largest squared distance a new candidate may have and still change the
    /// result. Expansion may stop once every remaining point is farther.
    fn worst_sqr_distance(&self) -> f64;

    /// Returns true if no further candidate can change the result.
    fn is_saturated(&self) -> bool {
        false
    }

    /// Number of candidates held.
    fn len(&self) -> usize;

    /// Returns true if no candidate is held.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Consumes the set and produces the query output.
    fn finalize(self) -> NeighborResults;
}

/// Bounded max-heap keeping the `k` nearest candidates seen so far.
#[derive(Clone, Debug)]
pub struct KnnResultSet {
    k: usize,
    heap: BinaryHeap<Neighbor>,
}

impl KnnResultSet {
    /// Creates an empty set with capacity `k`.
    pub fn new(k: usize) -> Self {
        KnnResultSet {
            k,
            heap: BinaryHeap::with_capacity(k.min(1024)),
        }
    }

    /// Capacity of the set.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.k
    }

    /// Returns true once `k` candidates are held.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.heap.len() >= self.k
    }
}

impl ResultSet for KnnResultSet {
    fn insert(&mut self, candidate: Neighbor) {
        if !self.is_full() {
            self.heap.push(candidate);
            return;
        }
        // Replace the current worst only when strictly closer.
        if let Some(mut worst) = self.heap.peek_mut() {
            if candidate.sqr_distance < worst.sqr_distance {
                *worst = candidate;
            }
        }
    }

    fn worst_sqr_distance(&self) -> f64 {
        if self.is_full() {
            self.heap.peek().map_or(f64::INFINITY, |n| n.sqr_distance)
        } else {
            f64::INFINITY
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.heap.len()
    }

    /// Nearest first; equal distances ordered by index.
    fn finalize(self) -> NeighborResults {
        self.heap.into_sorted_vec().into_iter().collect()
    }
}

/// Candidates within a radius, optionally capped in number.
#[derive(Clone, Debug)]
pub struct RadiusResultSet {
    radius_sq: f64,
    max_nn: Option<usize>,
    entries: Vec<Neighbor>,
}

impl RadiusResultSet {
    /// Creates an empty set accepting distances up to `radius`, holding at most
    /// `max_nn` entries when given.
    pub fn new(radius: f64, max_nn: Option<usize>) -> Self {
        RadiusResultSet {
            radius_sq: radius * radius,
            max_nn,
            entries: Vec::new(),
        }
    }

    /// Squared search radius.
    #[inline]
    pub fn radius_sq(&self) -> f64 {
        self.radius_sq
    }
}

impl ResultSet for RadiusResultSet {
    fn insert(&mut self, candidate: Neighbor) {
        if candidate.sqr_distance <= self.radius_sq && !self.is_saturated() {
            self.entries.push(candidate);
        }
    }

    #[inline]
    fn worst_sqr_distance(&self) -> f64 {
        self.radius_sq
    }

    #[inline]
    fn is_saturated(&self) -> bool {
        self.max_nn.is_some_and(|cap| self.entries.len() >= cap)
    }

    #[inline]
    fn len(&self) -> usize {
        self.entries.len()
    }

    /// Entries in the order they were accepted.
    fn finalize(self) -> NeighborResults {
        self.entries.into_iter().collect()
    }
}
