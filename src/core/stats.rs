//! core/stats.rs — Bivariate sample statistics.
//!
//! Single-pass (Welford) accumulation of means, variances and covariance for
//! one paired (X, Y) sample. The 2×2 covariance matrix is carried as three
//! scalars (var_x, var_y, cov_xy); symmetry makes the fourth entry redundant.

use super::StatsError;

/// Online accumulator for one paired sample.
///
/// Updates are numerically stable:
/// ```text
/// δ = x − μₙ₋₁
/// μₙ = μₙ₋₁ + δ/n
/// M2ₙ = M2ₙ₋₁ + δ·(x − μₙ)
/// ```
/// with the cross term accumulated as δx·(y − μyₙ).
#[derive(Debug, Clone, Default)]
pub struct BivariateAccumulator {
    n: usize,
    mean_x: f64,
    mean_y: f64,
    m2_x: f64,
    m2_y: f64,
    c_xy: f64,
}

impl BivariateAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one (x, y) observation into the running moments.
    pub fn update(&mut self, x: f64, y: f64) {
        self.n += 1;
        let n = self.n as f64;

        let dx = x - self.mean_x;
        let dy = y - self.mean_y;

        self.mean_x += dx / n;
        self.mean_y += dy / n;

        self.m2_x += dx * (x - self.mean_x);
        self.m2_y += dy * (y - self.mean_y);
        self.c_xy += dx * (y - self.mean_y);
    }

    /// Number of observations folded in so far.
    #[inline]
    pub fn count(&self) -> usize {
        self.n
    }

    /// Unbiased estimates (n−1 denominator). `None` below two observations.
    pub fn finalize(&self) -> Option<BivariateStats> {
        if self.n < 2 {
            return None;
        }
        let denom = (self.n - 1) as f64;
        Some(BivariateStats {
            n: self.n,
            mean_x: self.mean_x,
            mean_y: self.mean_y,
            var_x: self.m2_x / denom,
            var_y: self.m2_y / denom,
            cov_xy: self.c_xy / denom,
        })
    }
}

/// Summary of one paired sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BivariateStats {
    pub n: usize,
    pub mean_x: f64,
    pub mean_y: f64,
    pub var_x: f64,
    pub var_y: f64,
    pub cov_xy: f64,
}

impl BivariateStats {
    /// Accumulate a full sample pair. Lengths must match and at least two
    /// observations are required.
    pub fn from_samples(xs: &[f64], ys: &[f64]) -> Result<Self, StatsError> {
        if xs.len() != ys.len() {
            return Err(StatsError::MismatchedLengths {
                x: xs.len(),
                y: ys.len(),
            });
        }
        let mut acc = BivariateAccumulator::new();
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            acc.update(x, y);
        }
        acc.finalize()
            .ok_or(StatsError::TooFewSamples { n: xs.len() })
    }

    #[inline]
    pub fn sd_x(&self) -> f64 {
        self.var_x.sqrt()
    }

    #[inline]
    pub fn sd_y(&self) -> f64 {
        self.var_y.sqrt()
    }

    /// Pearson correlation, cov/(σx·σy). Non-finite when a variance is zero.
    pub fn pearson(&self) -> f64 {
        self.cov_xy / (self.var_x * self.var_y).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pass(xs: &[f64], ys: &[f64]) -> (f64, f64, f64, f64, f64) {
        let n = xs.len() as f64;
        let mean_x = xs.iter().sum::<f64>() / n;
        let mean_y = ys.iter().sum::<f64>() / n;
        let mut var_x = 0.0;
        let mut var_y = 0.0;
        let mut cov = 0.0;
        for (&x, &y) in xs.iter().zip(ys.iter()) {
            var_x += (x - mean_x) * (x - mean_x);
            var_y += (y - mean_y) * (y - mean_y);
            cov += (x - mean_x) * (y - mean_y);
        }
        let denom = n - 1.0;
        (mean_x, mean_y, var_x / denom, var_y / denom, cov / denom)
    }

    #[test]
    fn welford_matches_two_pass() {
        let xs: Vec<f64> = (0..200).map(|i| (i as f64 * 0.37).sin() * 4.0 + 1.5).collect();
        let ys: Vec<f64> = (0..200).map(|i| (i as f64 * 0.81).cos() * 2.0 - 0.7).collect();

        let stats = BivariateStats::from_samples(&xs, &ys).unwrap();
        let (mean_x, mean_y, var_x, var_y, cov) = two_pass(&xs, &ys);

        assert!((stats.mean_x - mean_x).abs() < 1e-10);
        assert!((stats.mean_y - mean_y).abs() < 1e-10);
        assert!((stats.var_x - var_x).abs() < 1e-10);
        assert!((stats.var_y - var_y).abs() < 1e-10);
        assert!((stats.cov_xy - cov).abs() < 1e-10);
    }

    #[test]
    fn covariance_is_symmetric_in_arguments() {
        let xs = [1.0, 2.5, -0.5, 4.0, 3.25];
        let ys = [0.5, 1.5, 2.0, -1.0, 0.25];

        let a = BivariateStats::from_samples(&xs, &ys).unwrap();
        let b = BivariateStats::from_samples(&ys, &xs).unwrap();

        assert!((a.cov_xy - b.cov_xy).abs() < 1e-12);
        assert!((a.var_x - b.var_y).abs() < 1e-12);
        assert!((a.pearson() - b.pearson()).abs() < 1e-12);
    }

    #[test]
    fn perfect_correlation_has_unit_pearson() {
        let xs = [1.0, 2.0, 3.0, 4.0, 5.0];
        let stats = BivariateStats::from_samples(&xs, &xs).unwrap();

        assert!((stats.pearson() - 1.0).abs() < 1e-12);
        assert!((stats.var_x - 2.5).abs() < 1e-12);
        assert!((stats.mean_x - 3.0).abs() < 1e-12);
    }

    #[test]
    fn anticorrelated_sample_has_negative_unit_pearson() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let ys = [4.0, 3.0, 2.0, 1.0];
        let stats = BivariateStats::from_samples(&xs, &ys).unwrap();

        assert!((stats.pearson() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn mismatched_lengths_are_rejected() {
        let err = BivariateStats::from_samples(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(err, StatsError::MismatchedLengths { x: 3, y: 2 });
    }

    #[test]
    fn short_samples_are_rejected() {
        let err = BivariateStats::from_samples(&[1.0], &[2.0]).unwrap_err();
        assert_eq!(err, StatsError::TooFewSamples { n: 1 });

        let err = BivariateStats::from_samples(&[], &[]).unwrap_err();
        assert_eq!(err, StatsError::TooFewSamples { n: 0 });
    }

    #[test]
    fn degenerate_variance_gives_non_finite_pearson() {
        let xs = [2.0, 2.0, 2.0, 2.0];
        let ys = [1.0, 2.0, 3.0, 4.0];
        let stats = BivariateStats::from_samples(&xs, &ys).unwrap();

        assert_eq!(stats.var_x, 0.0);
        assert!(!stats.pearson().is_finite());
    }
}
