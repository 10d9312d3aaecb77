/// 實數值曲線：給定參數 x 回傳函數值與一、二階導數。
pub trait Curve {
    fn value(&self, x: f64) -> f64;

    fn derivative(&self, x: f64) -> f64;

    fn second_derivative(&self, x: f64) -> f64;
}
