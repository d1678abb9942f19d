//! Standard numeric test functions. None of them need external data.

use super::Objective;
use std::f64::consts::PI;

/// Sphere function: f(x) = Σxᵢ²
///
/// Unimodal, convex, separable. Optimum 0 at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sphere;

impl Objective for Sphere {
    fn name(&self) -> &str {
        "sphere"
    }

    fn evaluate(&self, agent: &[f64]) -> f64 {
        agent.iter().map(|x| x * x).sum()
    }
}

/// Schwefel 2.22: f(x) = Σ|xᵢ| + |Πxᵢ|. Optimum 0 at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct SumAbsProduct;

impl Objective for SumAbsProduct {
    fn name(&self) -> &str {
        "sum_abs_product"
    }

    fn evaluate(&self, agent: &[f64]) -> f64 {
        let (sum, product) = agent
            .iter()
            .fold((0.0_f64, 1.0_f64), |(s, p), x| (s + x.abs(), p * x));
        sum.abs() + product.abs()
    }
}

/// Schwefel 1.2: f(x) = Σᵢ(Σⱼ≤ᵢ xⱼ)². Optimum 0 at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct CumulativeSum;

impl Objective for CumulativeSum {
    fn name(&self) -> &str {
        "cumulative_sum"
    }

    fn evaluate(&self, agent: &[f64]) -> f64 {
        agent
            .iter()
            .scan(0.0_f64, |prefix, x| {
                *prefix += x;
                Some(*prefix * *prefix)
            })
            .sum()
    }
}

/// Rastrigin: f(x) = 10n + Σ(xᵢ² − 10cos(2πxᵢ))
///
/// Highly multimodal. Optimum 0 at the origin.
#[derive(Debug, Clone, Copy, Default)]
pub struct Rastrigin;

impl Objective for Rastrigin {
    fn name(&self) -> &str {
        "rastrigin"
    }

    fn evaluate(&self, agent: &[f64]) -> f64 {
        let a = 10.0;
        a * agent.len() as f64
            + agent
                .iter()
                .map(|x| x * x - a * (2.0 * PI * x).cos())
                .sum::<f64>()
    }
}

/// Booth: f(1, 3) = 0
#[derive(Debug, Clone, Copy, Default)]
pub struct Booth;

impl Objective for Booth {
    fn name(&self) -> &str {
        "booth"
    }

    fn evaluate(&self, agent: &[f64]) -> f64 {
        let (x, y) = (agent[0], agent[1]);
        (x + 2.0 * y - 7.0).powi(2) + (2.0 * x + y - 5.0).powi(2)
    }

    fn required_dimension(&self) -> Option<usize> {
        Some(2)
    }
}

/// Beale: f(3, 0.5) = 0
#[derive(Debug, Clone, Copy, Default)]
pub struct Beale;

impl Objective for Beale {
    fn name(&self) -> &str {
        "beale"
    }

    fn evaluate(&self, agent: &[f64]) -> f64 {
        let (x, y) = (agent[0], agent[1]);
        (1.5 - x + x * y).powi(2)
            + (2.25 - x + x * y.powi(2)).powi(2)
            + (2.625 - x + x * y.powi(3)).powi(2)
    }

    fn required_dimension(&self) -> Option<usize> {
        Some(2)
    }
}

/// Matyas: f(0, 0) = 0
#[derive(Debug, Clone, Copy, Default)]
pub struct Matyas;

impl Objective for Matyas {
    fn name(&self) -> &str {
        "matyas"
    }

    fn evaluate(&self, agent: &[f64]) -> f64 {
        let (x, y) = (agent[0], agent[1]);
        0.26 * (x * x + y * y) - 0.48 * x * y
    }

    fn required_dimension(&self) -> Option<usize> {
        Some(2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_optima() {
        let origin = vec![0.0; 10];
        assert_eq!(Sphere.evaluate(&origin), 0.0);
        assert_eq!(SumAbsProduct.evaluate(&origin), 0.0);
        assert_eq!(CumulativeSum.evaluate(&origin), 0.0);
        assert!(Rastrigin.evaluate(&origin).abs() < EPS);
        assert!(Booth.evaluate(&[1.0, 3.0]).abs() < EPS);
        assert!(Beale.evaluate(&[3.0, 0.5]).abs() < EPS);
        assert!(Matyas.evaluate(&[0.0, 0.0]).abs() < EPS);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(Sphere.evaluate(&[1.0, -2.0, 3.0]), 14.0);
        // |1 + 2 + 3| + |1 * -2 * 3|
        assert_eq!(SumAbsProduct.evaluate(&[1.0, -2.0, 3.0]), 12.0);
        // 1² + (1 - 2)² + (1 - 2 + 3)²
        assert_eq!(CumulativeSum.evaluate(&[1.0, -2.0, 3.0]), 6.0);
        // cos(2π) = 1 at integer points
        assert!((Rastrigin.evaluate(&[1.0, 1.0]) - 2.0).abs() < EPS);
    }

    #[test]
    fn test_sphere_is_non_negative() {
        let agent = [-9.5, 0.1, 3.3, -0.0];
        assert!(Sphere.evaluate(&agent) >= 0.0);
    }
}
