use thiserror::Error;

use crate::math::curve::splineerror::SplineError;

/// 建立曲線、正規化輸入、求值與色彩空間轉換的錯誤。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MappingError {
    #[error("at least 3 control points are required to build a colour curve, got {0}")]
    InsufficientControlPoints(usize),

    /// 參數不在 [0, 1]（或為 NaN），通常代表上游正規化有問題。
    #[error("parameter {0} is outside the curve domain [0, 1]")]
    ParameterOutOfDomain(f64),

    #[error("numerical instability: {0}")]
    NumericalInstability(String),

    #[error("input grid is empty")]
    EmptyInput,

    #[error("input cannot be normalised: {0}")]
    DegenerateInput(String),

    #[error("unsupported input data type '{0}', expected 'scalar' or 'vector'")]
    UnsupportedDataType(String),

    #[error("unrecognised output colour space '{0}'")]
    UnrecognisedColorSpace(String),

    #[error("no colour curve has been generated")]
    CurveNotGenerated,
}

impl From<SplineError> for MappingError {
    fn from(error: SplineError) -> MappingError {
        match error {
            SplineError::InsufficientPoints(n) => MappingError::InsufficientControlPoints(n),
            SplineError::NonIncreasingKnots(i) => MappingError::NumericalInstability(
                format!("knot parameters not strictly increasing at index {}", i)
            ),
            SplineError::NumericalInstability(message) => MappingError::NumericalInstability(message),
        }
    }
}
