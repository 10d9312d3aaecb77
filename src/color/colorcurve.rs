use crate::color::controlpoint::Rgb;
use crate::color::mappingerror::MappingError;
use crate::color::splinesegment::SplineSegment;

/// 閉區間 [lo, hi]，相鄰區間共用端點。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DomainRange {
    lo: f64,
    hi: f64
}

impl DomainRange {
    pub fn new(lo: f64, hi: f64) -> DomainRange {
        DomainRange { lo, hi }
    }

    pub fn lo(&self) -> f64 {
        self.lo
    }

    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// NaN 永遠不在任何區間內
    pub fn contains(&self, x: f64) -> bool {
        self.lo <= x && x <= self.hi
    }
}

/// 一個區間及其上 R、G、B 三個通道的多項式。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvePiece {
    range: DomainRange,
    red: SplineSegment,
    green: SplineSegment,
    blue: SplineSegment
}

impl CurvePiece {
    pub fn new(range: DomainRange,
               red: SplineSegment,
               green: SplineSegment,
               blue: SplineSegment) -> CurvePiece {
        CurvePiece { range, red, green, blue }
    }

    pub fn range(&self) -> &DomainRange {
        &self.range
    }

    pub fn red(&self) -> &SplineSegment {
        &self.red
    }

    pub fn green(&self) -> &SplineSegment {
        &self.green
    }

    pub fn blue(&self) -> &SplineSegment {
        &self.blue
    }

    pub fn evaluate(&self, parameter: f64) -> Rgb {
        Rgb::new(
            self.red.evaluate(parameter),
            self.green.evaluate(parameter),
            self.blue.evaluate(parameter)
        )
    }
}

/// 由控制點擬合出的顏色曲線，將 [0, 1] 映射到 RGB。
///
/// 建立後不可變，可透過 `Arc` 在多執行緒間共用；重新產生曲線時整個替換，
/// 持有舊 `Arc` 的求值不受影響。
#[derive(Clone, Debug, PartialEq)]
pub struct ColorCurve {
    pieces: Vec<CurvePiece>
}

impl ColorCurve {
    /// 區間須由左至右排列且首尾相接，由 `CurveBuilder` 保證。
    pub(crate) fn from_pieces(pieces: Vec<CurvePiece>) -> ColorCurve {
        debug_assert!(
            pieces.windows(2).all(|w| w[0].range.hi == w[1].range.lo),
            "curve ranges must be contiguous"
        );
        ColorCurve { pieces }
    }

    pub fn pieces(&self) -> &[CurvePiece] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn ranges(&self) -> Vec<DomainRange> {
        self.pieces.iter().map(|piece| piece.range).collect()
    }

    /// 所有節點：第一個區間的左端，接著每個區間的右端。
    pub fn knots(&self) -> Vec<f64> {
        let mut knots: Vec<f64> = self.pieces.first()
            .map(|piece| vec![piece.range.lo])
            .unwrap_or_default();
        knots.extend(self.pieces.iter().map(|piece| piece.range.hi));
        knots
    }

    /// 由左至右找第一個包含 `parameter` 的區間；共用端點歸前一個區間。
    pub fn locate(&self, parameter: f64) -> Option<usize> {
        self.pieces
            .iter()
            .position(|piece| piece.range.contains(parameter))
    }

    pub fn evaluate(&self, parameter: f64) -> Result<Rgb, MappingError> {
        self.locate(parameter)
            .map(|i| self.pieces[i].evaluate(parameter))
            .ok_or(MappingError::ParameterOutOfDomain(parameter))
    }
}
