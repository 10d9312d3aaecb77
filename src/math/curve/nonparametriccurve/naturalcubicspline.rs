use tracing::trace;

use crate::math::curve::curve::Curve;
use crate::math::curve::nonparametriccurve::nonparametriccurve::{
    NonparametricCurve,
    ParametrizedPoint
};
use crate::math::curve::splineerror::SplineError;

// ─────────────────────────────────────────────
// CubicCoefficients
// ─────────────────────────────────────────────

/// 單一區間的三次多項式係數：
///   S_j(x) = a + b*(x-x_j) + c*(x-x_j)^2 + d*(x-x_j)^3
///
/// `x_j` 為推導係數時使用的節點（區間左端），`S_j(x_j) = a`。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CubicCoefficients {
    a: f64,
    b: f64,
    c: f64,
    d: f64,
    x_j: f64
}

impl CubicCoefficients {
    pub fn new(a: f64, b: f64, c: f64, d: f64, x_j: f64) -> CubicCoefficients {
        CubicCoefficients { a, b, c, d, x_j }
    }

    pub fn a(&self) -> f64 {
        self.a
    }

    pub fn b(&self) -> f64 {
        self.b
    }

    pub fn c(&self) -> f64 {
        self.c
    }

    pub fn d(&self) -> f64 {
        self.d
    }

    pub fn x_j(&self) -> f64 {
        self.x_j
    }

    fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite() && self.d.is_finite()
    }

    /// Horner 形式求值，不檢查 x 是否落在區間內。
    pub fn value(&self, x: f64) -> f64 {
        let x_diff = x - self.x_j;
        let mut result = self.d;
        for beta in [self.c, self.b, self.a] {
            result = f64::mul_add(result, x_diff, beta);
        }
        result
    }

    pub fn derivative(&self, x: f64) -> f64 {
        let x_diff = x - self.x_j;
        f64::mul_add(f64::mul_add(3.0 * self.d, x_diff, 2.0 * self.c), x_diff, self.b)
    }

    pub fn second_derivative(&self, x: f64) -> f64 {
        f64::mul_add(6.0 * self.d, x - self.x_j, 2.0 * self.c)
    }
}

// ─────────────────────────────────────────────
// 擬合
// ─────────────────────────────────────────────

fn validate_points(points: &[ParametrizedPoint]) -> Result<(), SplineError> {
    if points.len() < 3 {
        return Err(SplineError::InsufficientPoints(points.len()));
    }
    for (i, pt) in points.iter().enumerate() {
        if !pt.parameter().is_finite() {
            return Err(SplineError::NonIncreasingKnots(i));
        }
        if !pt.value().is_finite() {
            return Err(SplineError::NumericalInstability(
                format!("non-finite value at index {}", i)
            ));
        }
        if i > 0 && pt.parameter() <= points[i - 1].parameter() {
            return Err(SplineError::NonIncreasingKnots(i));
        }
    }
    Ok(())
}

/// Natural cubic spline：端點二階導數為 0。
///
/// 以三對角系統的前向消去／回代求出各節點的 c_j，再推出 b_j、d_j。
/// 回傳 N-1 組係數，由左至右排列，第 j 段以 x_j = p_j 為展開點。
///
/// 內部方程式的右手項：
///   α_i = 3/h_i*(a_{i+1}-a_i) - 3/h_{i-1}*(a_i-a_{i-1})
pub fn fit_natural_cubic(points: &[ParametrizedPoint]) -> Result<Vec<CubicCoefficients>, SplineError> {
    validate_points(points)?;

    let n = points.len();
    let p: Vec<f64> = points.iter().map(|pt| pt.parameter()).collect();
    let a: Vec<f64> = points.iter().map(|pt| pt.value()).collect();
    let h: Vec<f64> = (0..(n - 1)).map(|i| p[i + 1] - p[i]).collect();

    let mut alpha = vec![0.0_f64; n];
    for i in 1..(n - 1) {
        alpha[i] = (3.0 / h[i]) * (a[i + 1] - a[i]) - (3.0 / h[i - 1]) * (a[i] - a[i - 1]);
    }

    let mut l = vec![0.0_f64; n];
    let mut mu = vec![0.0_f64; n];
    let mut z = vec![0.0_f64; n];
    l[0] = 1.0;
    for i in 1..(n - 1) {
        l[i] = 2.0 * (p[i + 1] - p[i - 1]) - h[i - 1] * mu[i - 1];
        if !l[i].is_finite() || l[i] <= 0.0 {
            return Err(SplineError::NumericalInstability(
                format!("pivot l[{}] = {}", i, l[i])
            ));
        }
        mu[i] = h[i] / l[i];
        z[i] = (alpha[i] - h[i - 1] * z[i - 1]) / l[i];
        trace!(i, l = l[i], mu = mu[i], z = z[i], "natural cubic forward sweep");
    }
    l[n - 1] = 1.0;
    z[n - 1] = 0.0;

    let mut b = vec![0.0_f64; n - 1];
    let mut c = vec![0.0_f64; n];
    let mut d = vec![0.0_f64; n - 1];
    c[n - 1] = 0.0;
    for j in (0..(n - 1)).rev() {
        c[j] = z[j] - mu[j] * c[j + 1];
        b[j] = (a[j + 1] - a[j]) / h[j] - h[j] * (c[j + 1] + 2.0 * c[j]) / 3.0;
        d[j] = (c[j + 1] - c[j]) / (3.0 * h[j]);
    }

    let coef_list: Vec<CubicCoefficients> = (0..(n - 1))
        .map(|j| CubicCoefficients::new(a[j], b[j], c[j], d[j], p[j]))
        .collect();

    if let Some(j) = coef_list.iter().position(|coefs| !coefs.is_finite()) {
        return Err(SplineError::NumericalInstability(
            format!("non-finite coefficients in segment {}", j)
        ));
    }
    Ok(coef_list)
}

// ─────────────────────────────────────────────
// NaturalCubicSpline
// ─────────────────────────────────────────────

/// 擬合完成的實數值樣條，超出 [min_x, max_x] 時以端點區間外插。
#[derive(Clone, Debug)]
pub struct NaturalCubicSpline {
    max_x: f64,
    segment_list: Vec<CubicCoefficients>
}

impl NaturalCubicSpline {
    pub fn new(points: &[ParametrizedPoint]) -> Result<NaturalCubicSpline, SplineError> {
        let segment_list = fit_natural_cubic(points)?;
        let max_x = points[points.len() - 1].parameter();
        Ok(NaturalCubicSpline { max_x, segment_list })
    }

    pub fn segments(&self) -> &[CubicCoefficients] {
        &self.segment_list
    }

    fn find_segment(&self, x: f64) -> usize {
        if x <= self.min_x() {
            0
        } else if x >= self.max_x {
            self.segment_list.len() - 1
        } else {
            self.segment_list
                .partition_point(|s| s.x_j <= x)
                .saturating_sub(1)
        }
    }
}

impl NonparametricCurve for NaturalCubicSpline {
    fn knots(&self) -> Vec<ParametrizedPoint> {
        let mut pts: Vec<ParametrizedPoint> = self
            .segment_list
            .iter()
            .map(|s| ParametrizedPoint::new(s.x_j, s.a))
            .collect();
        if let Some(last) = self.segment_list.last() {
            pts.push(ParametrizedPoint::new(self.max_x, last.value(self.max_x)));
        }
        pts
    }

    fn min_x(&self) -> f64 {
        self.segment_list[0].x_j
    }

    fn max_x(&self) -> f64 {
        self.max_x
    }
}

impl Curve for NaturalCubicSpline {
    fn value(&self, x: f64) -> f64 {
        self.segment_list[self.find_segment(x)].value(x)
    }

    fn derivative(&self, x: f64) -> f64 {
        self.segment_list[self.find_segment(x)].derivative(x)
    }

    fn second_derivative(&self, x: f64) -> f64 {
        self.segment_list[self.find_segment(x)].second_derivative(x)
    }
}
