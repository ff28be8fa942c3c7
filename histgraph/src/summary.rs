/// Moments and extremes of a dataset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// population standard deviation
    pub stddev: f64,
    pub min: f64,
    pub max: f64,
}

fn mean(data: impl Iterator<Item = f64>, n: usize) -> f64 {
    data.sum::<f64>() / n as f64
}

impl Summary {
    pub fn of(data: &[f64]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        let n = data.len();
        let mu = mean(data.iter().copied(), n);
        let variance = mean(data.iter().map(|x| (x - mu).powi(2)), n);

        Some(Self {
            count: n,
            mean: mu,
            stddev: variance.sqrt(),
            min: data.iter().copied().fold(f64::INFINITY, f64::min),
            max: data.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty() {
        assert_eq!(Summary::of(&[]), None);
    }

    #[test]
    fn moments() {
        let summary = Summary::of(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(summary.count, 8);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.stddev, 2.0);
        assert_eq!(summary.min, 2.0);
        assert_eq!(summary.max, 9.0);
    }
}
