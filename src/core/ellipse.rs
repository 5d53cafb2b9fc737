//! core/ellipse.rs — Covariance confidence ellipse.
//!
//! Shape from correlation, extent from spread: the base radii come from the
//! 2D-only eigenvalue shortcut rx = sqrt(1+ρ), ry = sqrt(1−ρ), and the base
//! ellipse is then rotated 45°, scaled per axis by σ·n_std, and translated to
//! the sample mean. The shortcut is specific to 2×2 covariance matrices; a
//! higher-dimensional variant would need a real eigendecomposition.

use super::stats::BivariateStats;
use super::StatsError;

/// 2D affine map, row-major 2×3:
/// `x' = a·x + b·y + tx`, `y' = c·x + d·y + ty`.
///
/// Builder methods post-compose, so
/// `Affine2::identity().rotate_deg(45.0).scale(sx, sy).translate(tx, ty)`
/// rotates first, then scales, then translates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Affine2 {
    m: [f64; 6],
}

impl Affine2 {
    pub fn identity() -> Self {
        Self {
            m: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
        }
    }

    /// Follow this map with a counter-clockwise rotation in degrees.
    pub fn rotate_deg(self, deg: f64) -> Self {
        let (s, c) = deg.to_radians().sin_cos();
        self.then(&[c, -s, 0.0, s, c, 0.0])
    }

    /// Follow this map with an anisotropic scale about the origin.
    pub fn scale(self, sx: f64, sy: f64) -> Self {
        self.then(&[sx, 0.0, 0.0, 0.0, sy, 0.0])
    }

    /// Follow this map with a translation.
    pub fn translate(self, tx: f64, ty: f64) -> Self {
        self.then(&[1.0, 0.0, tx, 0.0, 1.0, ty])
    }

    fn then(self, op: &[f64; 6]) -> Self {
        let [a, b, tx, c, d, ty] = self.m;
        let [oa, ob, otx, oc, od, oty] = *op;
        Self {
            m: [
                oa * a + ob * c,
                oa * b + ob * d,
                oa * tx + ob * ty + otx,
                oc * a + od * c,
                oc * b + od * d,
                oc * tx + od * ty + oty,
            ],
        }
    }

    #[inline]
    pub fn apply(&self, x: f64, y: f64) -> (f64, f64) {
        let [a, b, tx, c, d, ty] = self.m;
        (a * x + b * y + tx, c * x + d * y + ty)
    }
}

/// Confidence region of one paired sample at `n_std` standard deviations.
#[derive(Debug, Clone, Copy)]
pub struct ConfidenceEllipse {
    /// Base radius along x before the transform, sqrt(1+ρ).
    pub radius_x: f64,
    /// Base radius along y before the transform, sqrt(1−ρ).
    pub radius_y: f64,
    /// σx · n_std.
    pub scale_x: f64,
    /// σy · n_std.
    pub scale_y: f64,
    /// Sample means.
    pub center: (f64, f64),
    /// Pearson correlation of the sample.
    pub pearson: f64,
}

impl ConfidenceEllipse {
    pub const DEFAULT_N_STD: f64 = 3.0;

    /// Build the ellipse for a sample pair. Fails when the samples differ in
    /// length or hold fewer than two observations.
    pub fn from_samples(xs: &[f64], ys: &[f64], n_std: f64) -> Result<Self, StatsError> {
        Ok(Self::from_stats(&BivariateStats::from_samples(xs, ys)?, n_std))
    }

    pub fn from_stats(stats: &BivariateStats, n_std: f64) -> Self {
        let pearson = stats.pearson();
        // Keep fp noise at |ρ|≈1 out of the sqrt.
        let r = pearson.clamp(-1.0, 1.0);
        Self {
            radius_x: (1.0 + r).sqrt(),
            radius_y: (1.0 - r).sqrt(),
            scale_x: stats.sd_x() * n_std,
            scale_y: stats.sd_y() * n_std,
            center: (stats.mean_x, stats.mean_y),
            pearson,
        }
    }

    /// Width of the base ellipse, before the transform.
    #[inline]
    pub fn width(&self) -> f64 {
        2.0 * self.radius_x
    }

    /// Height of the base ellipse, before the transform.
    #[inline]
    pub fn height(&self) -> f64 {
        2.0 * self.radius_y
    }

    /// Rotate 45°, scale per axis, translate to the sample mean. The renderer
    /// composes this with its own data-coordinate mapping.
    pub fn transform(&self) -> Affine2 {
        Affine2::identity()
            .rotate_deg(45.0)
            .scale(self.scale_x, self.scale_y)
            .translate(self.center.0, self.center.1)
    }

    /// Closed boundary polyline in data coordinates. The first and last
    /// points coincide.
    pub fn outline(&self, segments: usize) -> Vec<(f64, f64)> {
        assert!(segments >= 3, "ellipse outline needs at least 3 segments");
        let transform = self.transform();
        (0..=segments)
            .map(|i| {
                let t = std::f64::consts::TAU * (i % segments) as f64 / segments as f64;
                transform.apply(self.radius_x * t.cos(), self.radius_y * t.sin())
            })
            .collect()
    }
}
