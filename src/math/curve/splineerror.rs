use thiserror::Error;

/// 樣條擬合失敗的原因。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SplineError {
    /// 至少需要 3 個點才有內部方程式。
    #[error("natural cubic spline needs at least 3 points, got {0}")]
    InsufficientPoints(usize),

    /// 參數座標必須嚴格遞增且為有限值。
    #[error("knot parameters must be finite and strictly increasing (at index {0})")]
    NonIncreasingKnots(usize),

    /// 三對角系統的主元為 0 或係數出現 NaN/Inf。
    #[error("numerical instability while solving spline system: {0}")]
    NumericalInstability(String),
}
