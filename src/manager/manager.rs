use std::cell::{
    RefCell,
    RefMut
};
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use tracing::debug;

use super::managererror::ManagerError;

/// 以名稱索引的物件表，物件由 JSON 建立。
///
/// 批次載入時先全部建好再寫入，任何一筆失敗則表維持原狀。
pub trait IManager<V> where
    V: Clone {
    fn map(&self) -> RefMut<'_, HashMap<String, V>>;

    /// 由 JSON 建出 (名稱, 物件)，不寫入表中。
    fn obj_from_json(&self, json_value: serde_json::Value) -> Result<(String, V), ManagerError>;

    fn get(&self, name: &str) -> Result<V, ManagerError> {
        let map = self.map();
        map.get(name).map_or(
            Err(ManagerError::map_elem_not_found(name)),
            |elem| Ok(elem.clone())
        )
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.map().keys().cloned().collect();
        names.sort();
        names
    }

    fn insert_named_objs(&self, named_objs: Vec<(String, V)>) {
        let mut map = self.map();
        for (name, v) in named_objs {
            debug!(name = name.as_str(), "registered object");
            map.insert(name, v);
        }
    }

    fn insert_obj_from_json(&self, json_value: serde_json::Value) -> Result<(), ManagerError> {
        let named_obj = self.obj_from_json(json_value)?;
        self.insert_named_objs(vec![named_obj]);
        Ok(())
    }

    fn insert_obj_from_json_vec(&self, json_vec: &[serde_json::Value]) -> Result<(), ManagerError> {
        let named_objs = json_vec
            .iter()
            .map(|j| self.obj_from_json(j.clone()))
            .collect::<Result<Vec<(String, V)>, ManagerError>>()?;
        self.insert_named_objs(named_objs);
        Ok(())
    }

    /// 檔案內容可以是單一物件或物件陣列。
    fn from_reader<P: AsRef<Path>>(&self, file_path: P) -> Result<(), ManagerError> {
        let file = File::open(file_path)?;
        let reader = BufReader::new(file);
        let json_value: serde_json::Value = serde_json::from_reader(reader)?;
        if json_value.is_array() {
            let json_array: Vec<serde_json::Value> = ManagerError::from_json_or_json_parse_error(json_value)?;
            self.insert_obj_from_json_vec(&json_array)
        } else {
            self.insert_obj_from_json(json_value)
        }
    }
}

pub struct Manager<V> {
    map_cell: RefCell<HashMap<String, V>>,
    get_obj_from_json: fn(serde_json::Value) -> Result<(String, V), ManagerError>
}

impl<V> Manager<V> where
    V: Clone {
    /// `get_obj_from_json` 回傳 (名稱, 物件)
    pub fn new(get_obj_from_json: fn(serde_json::Value) -> Result<(String, V), ManagerError>) -> Manager<V> {
        Manager { map_cell: RefCell::new(HashMap::new()), get_obj_from_json }
    }
}

impl<V> IManager<V> for Manager<V> where
    V: Clone {
    fn map(&self) -> RefMut<'_, HashMap<String, V>> {
        self.map_cell.borrow_mut()
    }

    fn obj_from_json(&self, json_value: serde_json::Value) -> Result<(String, V), ManagerError> {
        (self.get_obj_from_json)(json_value)
    }
}
