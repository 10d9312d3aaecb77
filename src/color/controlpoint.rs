use serde::{
    Deserialize,
    Serialize
};

/// 8-bit RGB 三元組，各通道值域 [0, 255] 由型別保證。
///
/// JSON 形式為 `[r, g, b]`。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[u8; 3]", into = "[u8; 3]")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Rgb {
        Rgb { r, g, b }
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(channels: [u8; 3]) -> Rgb {
        Rgb::new(channels[0], channels[1], channels[2])
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Rgb {
        Rgb::new(r, g, b)
    }
}

impl From<Rgb> for [u8; 3] {
    fn from(rgb: Rgb) -> [u8; 3] {
        rgb.channels()
    }
}

/// 使用者指定的錨點顏色，曲線必須精確通過。
pub type ControlPoint = Rgb;
