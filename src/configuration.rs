use std::cell::{
    RefCell,
    RefMut
};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::color::colorcurve::ColorCurve;
use crate::color::palettemanager::PaletteManager;
use crate::manager::manager::{
    IManager,
    Manager
};
use crate::manager::managererror::ManagerError;
use crate::transform::inputtransformer::DataType;
use crate::transform::outputtransformer::ColorSpace;

#[derive(Deserialize)]
struct MappingSettingsJsonProp {
    #[serde(default = "default_data_type")]
    data_type: String,
    #[serde(default = "default_output_space")]
    output_space: String,
    #[serde(default = "default_raw_output")]
    raw_output: bool
}

fn default_data_type() -> String {
    "scalar".to_owned()
}

fn default_output_space() -> String {
    "rgb".to_owned()
}

fn default_raw_output() -> bool {
    true
}

#[derive(Deserialize)]
struct ConfigurationJsonProp {
    palettes: Vec<serde_json::Value>,
    mapping: Option<MappingSettingsJsonProp>
}

/// 映射時的輸入種類與輸出格式。
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MappingSettings {
    pub data_type: DataType,
    pub output_space: ColorSpace,
    pub raw_output: bool
}

impl Default for MappingSettings {
    fn default() -> MappingSettings {
        MappingSettings {
            data_type: DataType::Scalar,
            output_space: ColorSpace::Rgb,
            raw_output: true
        }
    }
}

impl MappingSettings {
    fn from_json_prop(json_prop: MappingSettingsJsonProp) -> Result<MappingSettings, ManagerError> {
        let invalid = |source| ManagerError::BuildError { name: "mapping".to_owned(), source };
        Ok(MappingSettings {
            data_type: json_prop.data_type.parse().map_err(invalid)?,
            output_space: json_prop.output_space.parse().map_err(invalid)?,
            raw_output: json_prop.raw_output
        })
    }
}

pub struct Configuration {
    palette_manager_cell: RefCell<Manager<Arc<ColorCurve>>>,
    mapping_settings_cell: RefCell<MappingSettings>
}

impl Configuration {
    pub fn new() -> Configuration {
        Configuration {
            palette_manager_cell: RefCell::new(PaletteManager::new()),
            mapping_settings_cell: RefCell::new(MappingSettings::default())
        }
    }

    pub fn palette_manager(&self) -> RefMut<'_, Manager<Arc<ColorCurve>>> {
        self.palette_manager_cell.borrow_mut()
    }

    pub fn mapping_settings(&self) -> MappingSettings {
        *self.mapping_settings_cell.borrow()
    }

    pub fn from_reader<P: AsRef<Path>>(&self, file_path: P) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_prop: ConfigurationJsonProp = serde_json::from_reader(reader)?;
        // 全部解析成功後才寫入，失敗時設定維持原狀
        let settings = json_prop.mapping
            .map(MappingSettings::from_json_prop)
            .transpose()?;
        let palette_manager = self.palette_manager();
        let palettes = json_prop.palettes
            .into_iter()
            .map(|j| palette_manager.obj_from_json(j))
            .collect::<Result<Vec<_>, ManagerError>>()?;
        palette_manager.insert_named_objs(palettes);
        if let Some(settings) = settings {
            *self.mapping_settings_cell.borrow_mut() = settings;
        }
        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Configuration {
        Configuration::new()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::color::controlpoint::Rgb;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_palettes_and_settings() {
        let file = write_config(r#"{
            "palettes": [
                { "name": "sunset", "control_points": [[243, 30, 104], [252, 39, 47], [249, 171, 60], [255, 229, 119], [255, 255, 255]] },
                { "name": "grey", "control_points": [[0, 0, 0], [128, 128, 128], [255, 255, 255]] }
            ],
            "mapping": { "data_type": "vector", "output_space": "hsv", "raw_output": false }
        }"#);
        let config = Configuration::new();
        config.from_reader(file.path()).unwrap();

        let sunset = config.palette_manager().get("sunset").unwrap();
        assert_eq!(sunset.evaluate(0.5).unwrap(), Rgb::new(249, 171, 60));
        assert_eq!(config.palette_manager().names(), vec!["grey".to_owned(), "sunset".to_owned()]);
        assert_eq!(config.mapping_settings(), MappingSettings {
            data_type: DataType::Vector,
            output_space: ColorSpace::Hsv,
            raw_output: false
        });
    }

    #[test]
    fn test_mapping_defaults() {
        let file = write_config(r#"{ "palettes": [], "mapping": {} }"#);
        let config = Configuration::new();
        config.from_reader(file.path()).unwrap();
        assert_eq!(config.mapping_settings(), MappingSettings::default());
    }

    #[test]
    fn test_unknown_output_space() {
        let file = write_config(r#"{ "palettes": [], "mapping": { "output_space": "lab" } }"#);
        let config = Configuration::new();
        assert!(matches!(config.from_reader(file.path()), Err(ManagerError::BuildError { .. })));
    }

    #[test]
    fn test_bad_palette_leaves_configuration_untouched() {
        let file = write_config(r#"{
            "palettes": [
                { "name": "ok", "control_points": [[0, 0, 0], [128, 128, 128], [255, 255, 255]] },
                { "name": "single", "control_points": [[1, 2, 3]] }
            ],
            "mapping": { "output_space": "hsv" }
        }"#);
        let config = Configuration::new();
        assert!(matches!(config.from_reader(file.path()), Err(ManagerError::BuildError { .. })));
        assert!(config.palette_manager().names().is_empty());
        assert_eq!(config.mapping_settings(), MappingSettings::default());
    }

    #[test]
    fn test_bad_mapping_registers_no_palettes() {
        let file = write_config(r#"{
            "palettes": [
                { "name": "ok", "control_points": [[0, 0, 0], [128, 128, 128], [255, 255, 255]] }
            ],
            "mapping": { "data_type": "tensor" }
        }"#);
        let config = Configuration::new();
        assert!(config.from_reader(file.path()).is_err());
        assert!(config.palette_manager().names().is_empty());
    }

    #[test]
    fn test_missing_file() {
        let config = Configuration::new();
        assert!(matches!(
            config.from_reader("/definitely/not/here.json"),
            Err(ManagerError::IOError(_))
        ));
    }
}
