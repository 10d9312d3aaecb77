use std::fmt;
use std::str::FromStr;

use nalgebra::{
    DMatrix,
    Matrix3,
    Vector3
};
use rayon::prelude::*;

use crate::color::controlpoint::Rgb;
use crate::color::mappingerror::MappingError;

/// 轉換後的三個通道值，意義依色彩空間而定。
pub type ColorTriple = [f64; 3];

/// 輸出色彩空間。每批資料只分派一次，不在逐格求值時判斷。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColorSpace {
    Rgb,
    Bgr,
    /// H 以度表示，S、V 以百分比表示
    Hsv,
    /// H 以度表示，L、S 以百分比表示
    Hls,
    /// ITU-R BT.601 studio swing，輸出順序為 (Y, Cb, Cr)
    YCbCr
}

// BT.601：以 [0, 1] 的 R'G'B' 計算，再加上 (16, 128, 128) 偏移
const YCBCR_OFFSET: [f64; 3] = [16.0, 128.0, 128.0];

fn ycbcr_matrix() -> Matrix3<f64> {
    Matrix3::new(
         65.481, 128.553,  24.966,
        -37.797, -74.203, 112.0,
        112.0,   -93.786, -18.214,
    )
}

impl ColorSpace {
    pub const ALL: [ColorSpace; 5] = [
        ColorSpace::Rgb,
        ColorSpace::Bgr,
        ColorSpace::Hsv,
        ColorSpace::Hls,
        ColorSpace::YCbCr
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColorSpace::Rgb => "rgb",
            ColorSpace::Bgr => "bgr",
            ColorSpace::Hsv => "hsv",
            ColorSpace::Hls => "hls",
            ColorSpace::YCbCr => "ycbcr"
        }
    }

    /// 各通道的固定值域 (min, max)。
    pub fn channel_ranges(&self) -> [(f64, f64); 3] {
        match self {
            ColorSpace::Rgb | ColorSpace::Bgr => [(0.0, 255.0); 3],
            ColorSpace::Hsv | ColorSpace::Hls => [(0.0, 360.0), (0.0, 100.0), (0.0, 100.0)],
            ColorSpace::YCbCr => [(16.0, 235.0), (16.0, 240.0), (16.0, 240.0)]
        }
    }

    pub fn convert(&self, rgb: Rgb) -> ColorTriple {
        let (r, g, b) = (f64::from(rgb.r), f64::from(rgb.g), f64::from(rgb.b));
        match self {
            ColorSpace::Rgb => [r, g, b],
            ColorSpace::Bgr => [b, g, r],
            ColorSpace::Hsv => rgb_to_hsv(r / 255.0, g / 255.0, b / 255.0),
            ColorSpace::Hls => rgb_to_hls(r / 255.0, g / 255.0, b / 255.0),
            ColorSpace::YCbCr => rgb_to_ycbcr(r / 255.0, g / 255.0, b / 255.0)
        }
    }

    /// 依 `channel_ranges` 線性縮放到 [0, 1]，浮點誤差造成的溢出會被夾回。
    pub fn scale(&self, triple: ColorTriple) -> ColorTriple {
        let ranges = self.channel_ranges();
        let mut scaled = triple;
        for (value, (lo, hi)) in scaled.iter_mut().zip(ranges) {
            *value = ((*value - lo) / (hi - lo)).clamp(0.0, 1.0);
        }
        scaled
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for ColorSpace {
    type Err = MappingError;

    fn from_str(s: &str) -> Result<ColorSpace, MappingError> {
        let lowered = s.to_ascii_lowercase();
        ColorSpace::ALL
            .into_iter()
            .find(|space| space.name() == lowered)
            .ok_or_else(|| MappingError::UnrecognisedColorSpace(s.to_owned()))
    }
}

fn hue_degrees(r: f64, g: f64, b: f64, max: f64, delta: f64) -> f64 {
    if delta == 0.0 {
        return 0.0;
    }
    let sector = if max == r {
        ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        (b - r) / delta + 2.0
    } else {
        (r - g) / delta + 4.0
    };
    60.0 * sector
}

fn rgb_to_hsv(r: f64, g: f64, b: f64) -> ColorTriple {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let s = if max == 0.0 { 0.0 } else { delta / max };
    [hue_degrees(r, g, b, max, delta), s * 100.0, max * 100.0]
}

fn rgb_to_hls(r: f64, g: f64, b: f64) -> ColorTriple {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let delta = max - min;
    let l = (max + min) / 2.0;
    let s = if delta == 0.0 { 0.0 } else { delta / (1.0 - (2.0 * l - 1.0).abs()) };
    [hue_degrees(r, g, b, max, delta), l * 100.0, s * 100.0]
}

fn rgb_to_ycbcr(r: f64, g: f64, b: f64) -> ColorTriple {
    let ycbcr = ycbcr_matrix() * Vector3::new(r, g, b) + Vector3::from(YCBCR_OFFSET);
    [ycbcr.x, ycbcr.y, ycbcr.z]
}

/// 將 RGB 網格轉到指定色彩空間；`raw` 為 false 時再縮放到 [0, 1]。
pub struct OutputTransformer;

impl OutputTransformer {
    pub fn process(pixels: &DMatrix<Rgb>, space: ColorSpace, raw: bool) -> DMatrix<ColorTriple> {
        let converted: Vec<ColorTriple> = pixels
            .as_slice()
            .par_iter()
            .map(|&rgb| {
                let triple = space.convert(rgb);
                if raw { triple } else { space.scale(triple) }
            })
            .collect();
        DMatrix::from_vec(pixels.nrows(), pixels.ncols(), converted)
    }
}
