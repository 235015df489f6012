//! Standard-normal distribution primitives shared by every pricing routine.
//!
//! One CDF approximation serves the whole crate; the pricer and the
//! implied-vol solver must agree on `N(x)` or the Newton iteration converges
//! against a slightly different price than the one reported.

/// Standard-normal probability density `exp(-x^2/2) / sqrt(2*pi)`.
pub fn normal_pdf(x: f64) -> f64 {
    const INV_SQRT_2PI: f64 = 0.398_942_280_401_432_7;
    INV_SQRT_2PI * (-0.5 * x * x).exp()
}

/// Standard-normal cumulative distribution `P(Z <= x)`.
///
/// Abramowitz & Stegun 7.1.26 rational approximation, absolute error below
/// 7.5e-8 over the real line. Defined for all real `x`; no error path.
pub fn normal_cdf(x: f64) -> f64 {
    // Abramowitz & Stegun 7.1.26
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.231_641_9 * z);
    let poly = t
        * (0.319_381_530
            + t * (-0.356_563_782
                + t * (1.781_477_937 + t * (-1.821_255_978 + t * 1.330_274_429))));
    let approx = 1.0 - normal_pdf(z) * poly;
    if x >= 0.0 { approx } else { 1.0 - approx }
}

/// `sqrt(2*pi)`, exposed for callers that need the raw normalization factor.
pub const SQRT_2PI: f64 = 2.506_628_274_631_000_7;

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn normal_pdf_and_cdf_sanity() {
        assert_relative_eq!(normal_pdf(0.0), 0.398_942_280_401_432_7, epsilon = 1e-12);
        assert_relative_eq!(normal_pdf(0.0), 1.0 / SQRT_2PI, epsilon = 1e-12);
        assert_relative_eq!(normal_cdf(0.0), 0.5, epsilon = 1e-7);
        assert_relative_eq!(normal_cdf(1.0), 0.841_344_746, epsilon = 2e-7);
        assert_relative_eq!(normal_cdf(-1.0), 1.0 - normal_cdf(1.0), epsilon = 1e-12);
        assert_relative_eq!(normal_cdf(1.96), 0.975_002_105, epsilon = 2e-7);
    }

    #[test]
    fn normal_cdf_tails_saturate() {
        assert!(normal_cdf(10.0) > 1.0 - 1e-12);
        assert!(normal_cdf(-10.0) < 1e-12);
        assert!(normal_cdf(f64::INFINITY) <= 1.0);
    }

    #[test]
    fn normal_cdf_is_monotonic_on_a_grid() {
        let mut prev = normal_cdf(-6.0);
        let mut x = -6.0;
        while x <= 6.0 {
            let cur = normal_cdf(x);
            assert!(cur + 1e-9 >= prev, "cdf decreased at x={x}");
            prev = cur;
            x += 0.05;
        }
    }

    #[test]
    fn pdf_is_derivative_of_cdf() {
        let h = 1e-5;
        for &x in &[-2.0, -0.5, 0.0, 0.7, 1.3, 2.4] {
            let fd = (normal_cdf(x + h) - normal_cdf(x - h)) / (2.0 * h);
            assert_relative_eq!(fd, normal_pdf(x), epsilon = 1e-5);
        }
    }
}
