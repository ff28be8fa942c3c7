use crate::Bins;

/// Per-bin counts of a dataset, along with how many values missed every bin.
#[derive(Clone, Debug)]
pub struct Histogram {
    bins: Bins,
    counts: Vec<u64>,
    outside: u64,
}

impl Histogram {
    pub fn count(bins: &Bins, values: &[f64]) -> Self {
        let mut counts = vec![0; bins.len()];
        let mut outside = 0;

        for value in values {
            match bins.find(*value) {
                Some(bin) => counts[bin] += 1,
                None => outside += 1,
            }
        }

        Self {
            bins: bins.clone(),
            counts,
            outside,
        }
    }

    pub fn bins(&self) -> &Bins {
        &self.bins
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    /// Values which fell below the first or above the last edge.
    pub fn outside(&self) -> u64 {
        self.outside
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// Bar heights normalised so that their total area is one. All zero when
    /// no value landed in a bin.
    pub fn density(&self) -> Vec<f64> {
        let total = self.total();
        if total == 0 {
            return vec![0.0; self.counts.len()];
        }

        self.counts
            .iter()
            .enumerate()
            .map(|(bin, count)| *count as f64 / (total as f64 * self.bins.width(bin)))
            .collect()
    }

    pub fn heights(&self, density: bool) -> Vec<f64> {
        if density {
            self.density()
        } else {
            self.counts.iter().map(|count| *count as f64).collect()
        }
    }
}
