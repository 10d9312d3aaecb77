use std::sync::Arc;

use nalgebra::DMatrix;
use rayon::prelude::*;
use tracing::debug;

use crate::color::colorcurve::ColorCurve;
use crate::color::controlpoint::{
    ControlPoint,
    Rgb
};
use crate::color::curvebuilder::CurveBuilder;
use crate::color::mappingerror::MappingError;
use crate::transform::inputtransformer::{
    InputData,
    InputTransformer
};
use crate::transform::outputtransformer::{
    ColorSpace,
    ColorTriple,
    OutputTransformer
};

/// 正規化 → 曲線求值 → 色彩空間轉換。
///
/// 曲線以 `Arc` 持有；`generate_map` 會整個替換，先前取得的 `curve()` 仍可繼續使用。
#[derive(Clone, Debug, Default)]
pub struct ColorMapper {
    curve: Option<Arc<ColorCurve>>
}

impl ColorMapper {
    pub fn new() -> ColorMapper {
        ColorMapper { curve: None }
    }

    pub fn from_curve(curve: Arc<ColorCurve>) -> ColorMapper {
        ColorMapper { curve: Some(curve) }
    }

    pub fn generate_map(&mut self, colours: &[ControlPoint]) -> Result<(), MappingError> {
        let curve = CurveBuilder::build(colours)?;
        self.curve = Some(Arc::new(curve));
        Ok(())
    }

    pub fn curve(&self) -> Option<Arc<ColorCurve>> {
        self.curve.clone()
    }

    fn require_curve(&self) -> Result<&ColorCurve, MappingError> {
        self.curve.as_deref().ok_or(MappingError::CurveNotGenerated)
    }

    /// 逐格求值（rayon 平行），任何一格失敗即中止整批並回傳該錯誤。
    pub fn map_parameters(&self, parameters: &DMatrix<f64>) -> Result<DMatrix<Rgb>, MappingError> {
        let curve = self.require_curve()?;
        let pixels: Vec<Rgb> = parameters
            .as_slice()
            .par_iter()
            .map(|&parameter| curve.evaluate(parameter))
            .collect::<Result<Vec<Rgb>, MappingError>>()?;
        Ok(DMatrix::from_vec(parameters.nrows(), parameters.ncols(), pixels))
    }

    pub fn map_rgb(&self, data: &InputData) -> Result<DMatrix<Rgb>, MappingError> {
        self.require_curve()?;
        let (nrows, ncols) = data.shape();
        debug!(nrows, ncols, data_type = ?data.data_type(), "mapping grid");
        let parameters = InputTransformer::convert(data)?;
        self.map_parameters(&parameters)
    }

    pub fn map(&self,
               data: &InputData,
               output_space: ColorSpace,
               raw_output: bool) -> Result<DMatrix<ColorTriple>, MappingError> {
        let pixels = self.map_rgb(data)?;
        Ok(OutputTransformer::process(&pixels, output_space, raw_output))
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::dmatrix;

    use super::*;

    fn sample_colours() -> Vec<Rgb> {
        vec![
            Rgb::new(243, 30, 104),
            Rgb::new(252, 39, 47),
            Rgb::new(249, 171, 60),
            Rgb::new(255, 229, 119),
            Rgb::new(255, 255, 255),
        ]
    }

    #[test]
    fn test_mapping_before_generation_fails() {
        let mapper = ColorMapper::new();
        let data = InputData::Scalar(dmatrix![1.0, 2.0]);
        assert_eq!(mapper.map_rgb(&data), Err(MappingError::CurveNotGenerated));
    }

    #[test]
    fn test_generate_map_rejects_two_colours() {
        let mut mapper = ColorMapper::new();
        let result = mapper.generate_map(&[Rgb::new(0, 0, 0), Rgb::new(128, 128, 128)]);
        assert_eq!(result, Err(MappingError::InsufficientControlPoints(2)));
        assert!(mapper.curve().is_none());
    }

    #[test]
    fn test_scalar_grid_hits_control_points() {
        let mut mapper = ColorMapper::new();
        mapper.generate_map(&sample_colours()).unwrap();
        let data = InputData::Scalar(dmatrix![-4.0, 0.0; 4.0, 12.0]);
        let pixels = mapper.map_rgb(&data).unwrap();
        assert_eq!(pixels[(0, 0)], Rgb::new(243, 30, 104));
        assert_eq!(pixels[(0, 1)], Rgb::new(252, 39, 47));
        assert_eq!(pixels[(1, 0)], Rgb::new(249, 171, 60));
        assert_eq!(pixels[(1, 1)], Rgb::new(255, 255, 255));
    }

    #[test]
    fn test_out_of_domain_parameter_aborts_batch() {
        let mut mapper = ColorMapper::new();
        mapper.generate_map(&sample_colours()).unwrap();
        let result = mapper.map_parameters(&dmatrix![0.0, 0.5, 1.5]);
        assert_eq!(result, Err(MappingError::ParameterOutOfDomain(1.5)));
    }

    #[test]
    fn test_regenerating_keeps_previous_curve_alive() {
        let mut mapper = ColorMapper::new();
        mapper.generate_map(&sample_colours()).unwrap();
        let old_curve = mapper.curve().unwrap();
        mapper.generate_map(&[Rgb::new(0, 0, 0), Rgb::new(0, 0, 0), Rgb::new(9, 9, 9)]).unwrap();
        assert_eq!(old_curve.evaluate(1.0).unwrap(), Rgb::new(255, 255, 255));
        assert_eq!(mapper.curve().unwrap().evaluate(1.0).unwrap(), Rgb::new(9, 9, 9));
    }

    #[test]
    fn test_map_into_scaled_hsv() {
        let mapper = ColorMapper::from_curve(Arc::new(CurveBuilder::build(&sample_colours()).unwrap()));
        let output = mapper
            .map(&InputData::Scalar(dmatrix![0.0, 1.0]), ColorSpace::Hsv, false)
            .unwrap();
        // (255, 255, 255)：S = 0, V = 100%
        let white = output[(0, 1)];
        assert_eq!(white, [0.0, 0.0, 1.0]);
        assert!(output[(0, 0)].iter().all(|v| (0.0..=1.0).contains(v)));
    }
}
