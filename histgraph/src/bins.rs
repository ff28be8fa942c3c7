use superslice::Ext as _;

use std::cmp::Ordering;
use std::ops::Range;

use crate::PlotError;

/// Ascending bin edges. `n` edges describe `n - 1` bins, each half-open
/// except the last, which also includes the final edge.
#[derive(Clone, Debug, PartialEq)]
pub struct Bins {
    edges: Vec<f64>,
}

impl Bins {
    pub fn new(edges: Vec<f64>) -> Result<Self, PlotError> {
        if edges.len() < 2 {
            return Err(PlotError::InvalidBins(format!(
                "need at least two edges, got {}",
                edges.len()
            )));
        }

        if let Some(edge) = edges.iter().find(|e| !e.is_finite()) {
            return Err(PlotError::InvalidBins(format!("edge {} is not finite", edge)));
        }

        if let Some(pair) = edges.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(PlotError::InvalidBins(format!(
                "edges must be strictly increasing ({} is followed by {})",
                pair[0], pair[1]
            )));
        }

        Ok(Self { edges })
    }

    /// Unit-wide bins with integer edges `start..end`.
    pub fn integer(start: i64, end: i64) -> Result<Self, PlotError> {
        Self::new((start..end).map(|edge| edge as f64).collect())
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn first(&self) -> f64 {
        self.edges[0]
    }

    pub fn last(&self) -> f64 {
        self.edges[self.edges.len() - 1]
    }

    pub fn width(&self, bin: usize) -> f64 {
        self.edges[bin + 1] - self.edges[bin]
    }

    pub fn ranges(&self) -> impl Iterator<Item = Range<f64>> + '_ {
        self.edges.windows(2).map(|pair| pair[0]..pair[1])
    }

    /// Index of the bin holding `value`, if it lies within the edges.
    pub fn find(&self, value: f64) -> Option<usize> {
        if !value.is_finite() || value < self.first() || value > self.last() {
            return None;
        }

        if value == self.last() {
            return Some(self.len() - 1);
        }

        let upper = self
            .edges
            .upper_bound_by(|edge| edge.partial_cmp(&value).unwrap_or(Ordering::Less));

        Some(upper - 1)
    }
}

impl Default for Bins {
    fn default() -> Self {
        Self {
            edges: (0..1000).map(|edge| edge as f64).collect(),
        }
    }
}
