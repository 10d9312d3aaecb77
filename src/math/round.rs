/// 將實數取整（恰為 .5 時取偶數）後夾在 8-bit 通道範圍 [0, 255] 內。
///
/// NaN 視為 0；正負無限大分別夾到 255 與 0。
pub fn clamp_to_channel(x: f64) -> u8 {
    if x.is_nan() {
        return 0;
    }
    let rounded = x.round_ties_even();
    if rounded <= 0.0 {
        0
    } else if rounded >= 255.0 {
        255
    } else {
        rounded as u8
    }
}
