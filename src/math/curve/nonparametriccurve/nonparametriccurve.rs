/// 參數化的一維點 (p, v)：p 為參數座標，v 為該處的通道值。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParametrizedPoint {
    parameter: f64,
    value: f64
}

impl ParametrizedPoint {
    pub fn new(parameter: f64, value: f64) -> ParametrizedPoint {
        ParametrizedPoint { parameter, value }
    }

    pub fn parameter(&self) -> f64 {
        self.parameter
    }

    pub fn value(&self) -> f64 {
        self.value
    }
}

/// 由節點直接決定形狀的曲線（內插類）。
pub trait NonparametricCurve {
    fn knots(&self) -> Vec<ParametrizedPoint>;

    fn min_x(&self) -> f64;

    fn max_x(&self) -> f64;
}
