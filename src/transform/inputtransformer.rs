use std::str::FromStr;

use nalgebra::{
    DMatrix,
    DVector
};

use crate::color::mappingerror::MappingError;

/// 輸入資料種類
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataType {
    Scalar,
    Vector
}

impl FromStr for DataType {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<DataType, MappingError> {
        match s.to_ascii_lowercase().as_str() {
            "scalar" => Ok(DataType::Scalar),
            "vector" => Ok(DataType::Vector),
            _ => Err(MappingError::UnsupportedDataType(s.to_owned()))
        }
    }
}

/// 待映射的網格資料：每格一個純量，或每格一個任意維度的向量。
#[derive(Clone, Debug, PartialEq)]
pub enum InputData {
    Scalar(DMatrix<f64>),
    Vector(DMatrix<DVector<f64>>)
}

impl InputData {
    pub fn data_type(&self) -> DataType {
        match self {
            InputData::Scalar(_) => DataType::Scalar,
            InputData::Vector(_) => DataType::Vector
        }
    }

    pub fn shape(&self) -> (usize, usize) {
        match self {
            InputData::Scalar(grid) => grid.shape(),
            InputData::Vector(grid) => grid.shape()
        }
    }
}

/// 將原始資料轉成 [0, 1] 參數空間。
///
/// - 純量：最小值為負時整體平移 |min|，再除以最大值。
/// - 向量：取每格的歐氏長度，再除以最大長度。
pub struct InputTransformer;

impl InputTransformer {
    pub fn convert(data: &InputData) -> Result<DMatrix<f64>, MappingError> {
        match data {
            InputData::Scalar(grid) => Self::scalar_to_parameter_space(grid),
            InputData::Vector(grid) => Self::vector_to_parameter_space(grid)
        }
    }

    pub fn scalar_to_parameter_space(grid: &DMatrix<f64>) -> Result<DMatrix<f64>, MappingError> {
        Self::check_grid(grid)?;
        let min = grid.min();
        let shifted = if min < 0.0 {
            grid.add_scalar(min.abs())
        } else {
            grid.clone()
        };
        Self::divide_by_max(shifted)
    }

    pub fn vector_to_parameter_space(grid: &DMatrix<DVector<f64>>) -> Result<DMatrix<f64>, MappingError> {
        let magnitudes = Self::magnitude_matrix(grid);
        Self::check_grid(&magnitudes)?;
        Self::divide_by_max(magnitudes)
    }

    pub fn magnitude_matrix(grid: &DMatrix<DVector<f64>>) -> DMatrix<f64> {
        grid.map(|v| v.norm())
    }

    fn check_grid(grid: &DMatrix<f64>) -> Result<(), MappingError> {
        if grid.is_empty() {
            return Err(MappingError::EmptyInput);
        }
        if let Some(x) = grid.iter().find(|x| !x.is_finite()) {
            return Err(MappingError::DegenerateInput(format!("non-finite value {}", x)));
        }
        Ok(())
    }

    fn divide_by_max(grid: DMatrix<f64>) -> Result<DMatrix<f64>, MappingError> {
        let max = grid.max();
        if max <= 0.0 {
            return Err(MappingError::DegenerateInput(
                format!("maximum {} after shifting must be positive", max)
            ));
        }
        Ok(grid / max)
    }
}
