use crate::math::curve::curve::Curve;
use crate::math::curve::nonparametriccurve::naturalcubicspline::CubicCoefficients;
use crate::math::round::clamp_to_channel;

/// 單一通道在一個區間上的三次多項式，建立後不可變。
///
/// 不檢查 x 是否在區間內，區間由擁有它的 `ColorCurve` 負責。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplineSegment {
    coefs: CubicCoefficients
}

impl SplineSegment {
    pub fn new(coefs: CubicCoefficients) -> SplineSegment {
        SplineSegment { coefs }
    }

    /// 展開點 x_j
    pub fn knot(&self) -> f64 {
        self.coefs.x_j()
    }

    pub fn coefficients(&self) -> &CubicCoefficients {
        &self.coefs
    }

    /// 求值後取整並夾在 [0, 255]。
    pub fn evaluate(&self, x: f64) -> u8 {
        clamp_to_channel(self.coefs.value(x))
    }
}

impl From<CubicCoefficients> for SplineSegment {
    fn from(coefs: CubicCoefficients) -> SplineSegment {
        SplineSegment::new(coefs)
    }
}

impl Curve for SplineSegment {
    fn value(&self, x: f64) -> f64 {
        self.coefs.value(x)
    }

    fn derivative(&self, x: f64) -> f64 {
        self.coefs.derivative(x)
    }

    fn second_derivative(&self, x: f64) -> f64 {
        self.coefs.second_derivative(x)
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn segment(a: f64, b: f64, c: f64, d: f64, x_j: f64) -> SplineSegment {
        SplineSegment::new(CubicCoefficients::new(a, b, c, d, x_j))
    }

    #[test]
    fn test_value_expands_around_knot() {
        let s = segment(10.0, 2.0, 3.0, 4.0, 0.5);
        assert_relative_eq!(s.value(0.5), 10.0);
        // 10 + 2*1 + 3*1 + 4*1
        assert_relative_eq!(s.value(1.5), 19.0);
        assert_relative_eq!(s.derivative(1.5), 2.0 + 6.0 + 12.0);
        assert_relative_eq!(s.second_derivative(1.5), 6.0 + 24.0);
        assert_relative_eq!(s.knot(), 0.5);
    }

    #[test]
    fn test_coefficients_are_exposed_unchanged() {
        let s = SplineSegment::from(CubicCoefficients::new(243.0, 51.5, -12.25, 3.0, 0.25));
        let coefs = s.coefficients();
        assert_eq!(coefs.a(), 243.0);
        assert_eq!(coefs.b(), 51.5);
        assert_eq!(coefs.c(), -12.25);
        assert_eq!(coefs.d(), 3.0);
        assert_eq!(coefs.x_j(), s.knot());
        assert_eq!(s.evaluate(0.25), 243);
    }

    #[test]
    fn test_evaluate_rounds_to_nearest() {
        assert_eq!(segment(100.4, 0.0, 0.0, 0.0, 0.0).evaluate(0.3), 100);
        assert_eq!(segment(100.6, 0.0, 0.0, 0.0, 0.0).evaluate(0.3), 101);
        assert_eq!(segment(0.0, 254.9999999, 0.0, 0.0, 0.0).evaluate(1.0), 255);
    }

    #[test]
    fn test_evaluate_clamps_for_any_input() {
        let s = segment(128.0, 0.0, 0.0, 1000.0, 0.0);
        assert_eq!(s.evaluate(1.0), 255);
        assert_eq!(s.evaluate(-1.0), 0);
        assert_eq!(s.evaluate(1e9), 255);
        assert_eq!(s.evaluate(-1e9), 0);
        assert_eq!(s.evaluate(f64::INFINITY), 255);
        assert_eq!(s.evaluate(f64::NEG_INFINITY), 0);
        assert_eq!(s.evaluate(f64::NAN), 0);
    }
}
