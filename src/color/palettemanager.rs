use std::sync::Arc;

use serde::Deserialize;

use crate::color::colorcurve::ColorCurve;
use crate::color::controlpoint::ControlPoint;
use crate::color::curvebuilder::CurveBuilder;
use crate::manager::manager::Manager;
use crate::manager::managererror::ManagerError;

#[derive(Deserialize)]
struct PaletteJsonProp {
    name: String,
    control_points: Vec<ControlPoint>
}

fn get_palette_from_json(json_value: serde_json::Value) -> Result<(String, Arc<ColorCurve>), ManagerError> {
    let json_prop: PaletteJsonProp = ManagerError::from_json_or_json_parse_error(json_value)?;
    let curve = CurveBuilder::build(&json_prop.control_points)
        .map_err(|source| ManagerError::BuildError { name: json_prop.name.clone(), source })?;
    Ok((json_prop.name, Arc::new(curve)))
}

/// 具名調色盤：每個 JSON 調色盤在載入時即建成 `ColorCurve`。
pub struct PaletteManager;

impl PaletteManager {
    pub fn new() -> Manager<Arc<ColorCurve>> {
        Manager::new(get_palette_from_json)
    }
}
