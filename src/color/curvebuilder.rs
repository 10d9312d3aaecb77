use tracing::debug;

use crate::color::colorcurve::{
    ColorCurve,
    CurvePiece,
    DomainRange
};
use crate::color::controlpoint::ControlPoint;
use crate::color::mappingerror::MappingError;
use crate::color::splinesegment::SplineSegment;
use crate::math::curve::nonparametriccurve::naturalcubicspline::fit_natural_cubic;
use crate::math::curve::nonparametriccurve::nonparametriccurve::ParametrizedPoint;

const MIN_CONTROL_POINTS: usize = 3;

/// 由控制點建立 `ColorCurve`：三個通道各自擬合 natural cubic spline，
/// 共用同一組參數節點 p_i = i / (N-1)。
pub struct CurveBuilder;

impl CurveBuilder {
    pub fn build(control_points: &[ControlPoint]) -> Result<ColorCurve, MappingError> {
        let n = control_points.len();
        if n < MIN_CONTROL_POINTS {
            return Err(MappingError::InsufficientControlPoints(n));
        }

        let knots = Self::parameter_knots(n);
        let red = Self::fit_channel(&knots, control_points, |cp| cp.r)?;
        let green = Self::fit_channel(&knots, control_points, |cp| cp.g)?;
        let blue = Self::fit_channel(&knots, control_points, |cp| cp.b)?;
        debug_assert!(red.len() == n - 1 && green.len() == n - 1 && blue.len() == n - 1);

        let pieces: Vec<CurvePiece> = red
            .into_iter()
            .zip(green)
            .zip(blue)
            .enumerate()
            .map(|(i, ((r, g), b))| {
                CurvePiece::new(DomainRange::new(knots[i], knots[i + 1]), r, g, b)
            })
            .collect();

        debug!(control_points = n, ranges = pieces.len(), "colour curve built");
        Ok(ColorCurve::from_pieces(pieces))
    }

    /// 均勻分布於 [0, 1] 的 N 個參數節點，首尾恰為 0 與 1。
    pub fn parameter_knots(n: usize) -> Vec<f64> {
        match n {
            0 => Vec::new(),
            1 => vec![0.0],
            _ => {
                let last = (n - 1) as f64;
                (0..n).map(|i| i as f64 / last).collect()
            }
        }
    }

    fn fit_channel(knots: &[f64],
                   control_points: &[ControlPoint],
                   channel: fn(&ControlPoint) -> u8) -> Result<Vec<SplineSegment>, MappingError> {
        let points: Vec<ParametrizedPoint> = knots
            .iter()
            .zip(control_points)
            .map(|(&p, cp)| ParametrizedPoint::new(p, f64::from(channel(cp))))
            .collect();
        let coef_list = fit_natural_cubic(&points)?;
        Ok(coef_list.into_iter().map(SplineSegment::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::controlpoint::Rgb;

    #[test]
    fn test_parameter_knots_are_evenly_spaced() {
        assert_eq!(CurveBuilder::parameter_knots(5), vec![0.0, 0.25, 0.5, 0.75, 1.0]);
        assert_eq!(CurveBuilder::parameter_knots(3), vec![0.0, 0.5, 1.0]);
        let knots = CurveBuilder::parameter_knots(7);
        for (i, knot) in knots.iter().enumerate() {
            assert_eq!(*knot, i as f64 / 6.0);
        }
        assert_eq!(knots[6], 1.0);
    }

    #[test]
    fn test_too_few_control_points() {
        let err = CurveBuilder::build(&[Rgb::new(0, 0, 0), Rgb::new(128, 128, 128)]).unwrap_err();
        assert_eq!(err, MappingError::InsufficientControlPoints(2));
        assert_eq!(CurveBuilder::build(&[]).unwrap_err(), MappingError::InsufficientControlPoints(0));
    }

    #[test]
    fn test_interpolates_every_control_point() {
        let control_points = [
            Rgb::new(12, 200, 7),
            Rgb::new(90, 14, 255),
            Rgb::new(255, 0, 128),
            Rgb::new(3, 77, 66),
            Rgb::new(180, 180, 1),
            Rgb::new(40, 250, 99),
        ];
        let curve = CurveBuilder::build(&control_points).unwrap();
        assert_eq!(curve.len(), control_points.len() - 1);
        for (knot, cp) in CurveBuilder::parameter_knots(control_points.len()).iter().zip(&control_points) {
            assert_eq!(curve.evaluate(*knot).unwrap(), *cp);
        }
    }

    #[test]
    fn test_channels_share_knots() {
        let curve = CurveBuilder::build(&[
            Rgb::new(0, 10, 20),
            Rgb::new(30, 40, 50),
            Rgb::new(60, 70, 80),
        ]).unwrap();
        for (i, piece) in curve.pieces().iter().enumerate() {
            let expected = i as f64 / 2.0;
            assert_eq!(piece.red().knot(), expected);
            assert_eq!(piece.green().knot(), expected);
            assert_eq!(piece.blue().knot(), expected);
            assert_eq!(piece.range().lo(), expected);
        }
    }

    #[test]
    fn test_collinear_control_points_give_linear_gradient() {
        let curve = CurveBuilder::build(&[
            Rgb::new(0, 0, 0),
            Rgb::new(100, 100, 100),
            Rgb::new(200, 200, 200),
        ]).unwrap();
        assert_eq!(curve.evaluate(0.25).unwrap(), Rgb::new(50, 50, 50));
        assert_eq!(curve.evaluate(0.9).unwrap(), Rgb::new(180, 180, 180));
    }
}
