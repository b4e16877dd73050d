use std::{
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{append_desktop_log, DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH};

pub const KEY_ALWAYS_ON_TOP: &str = "alwaysOnTop";
pub const KEY_ANIMATIONS_ENABLED: &str = "animationsEnabled";
pub const KEY_OPEN_AT_STARTUP: &str = "openAtStartup";
pub const KEY_LANGUAGE: &str = "language";
pub const KEY_WINDOW_POSITION: &str = "windowPosition";
pub const KEY_WINDOW_SIZE: &str = "windowSize";

pub trait SettingsStore: Send + Sync {
    fn get(&self, key: &str) -> Option<Value>;
    fn set(&self, key: &str, value: Value) -> Result<(), String>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowPosition {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSize {
    pub width: u32,
    pub height: u32,
}

impl WindowSize {
    pub const DEFAULT: WindowSize = WindowSize {
        width: DEFAULT_WINDOW_WIDTH,
        height: DEFAULT_WINDOW_HEIGHT,
    };
}

// JSON object on disk, rewritten in full on every `set`.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: Mutex<Map<String, Value>>,
}

impl JsonFileStore {
    pub fn open(path: PathBuf) -> Self {
        let values = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(Value::Object(map)) => map,
                Ok(_) => {
                    append_desktop_log(&format!(
                        "settings file {} has non-object root; starting from defaults",
                        path.display()
                    ));
                    Map::new()
                }
                Err(error) => {
                    append_desktop_log(&format!(
                        "failed to parse settings file {}: {}. starting from defaults",
                        path.display(),
                        error
                    ));
                    Map::new()
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Map::new(),
            Err(error) => {
                append_desktop_log(&format!(
                    "failed to read settings file {}: {}. starting from defaults",
                    path.display(),
                    error
                ));
                Map::new()
            }
        };

        Self {
            path,
            values: Mutex::new(values),
        }
    }

    fn persist(&self, values: &Map<String, Value>) -> Result<(), String> {
        if let Some(parent_dir) = self.path.parent() {
            fs::create_dir_all(parent_dir).map_err(|error| {
                format!(
                    "Failed to create settings directory {}: {}",
                    parent_dir.display(),
                    error
                )
            })?;
        }

        let serialized = serde_json::to_string_pretty(values)
            .map_err(|error| format!("Failed to serialize settings: {error}"))?;
        fs::write(&self.path, serialized).map_err(|error| {
            format!(
                "Failed to write settings file {}: {}",
                self.path.display(),
                error
            )
        })
    }
}

impl SettingsStore for JsonFileStore {
    fn get(&self, key: &str) -> Option<Value> {
        self.values
            .lock()
            .ok()
            .and_then(|values| values.get(key).cloned())
    }

    fn set(&self, key: &str, value: Value) -> Result<(), String> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| "Settings lock poisoned.".to_string())?;
        values.insert(key.to_string(), value);
        self.persist(&values)
    }
}

#[derive(Clone)]
pub struct ShellSettings {
    store: Arc<dyn SettingsStore>,
}

impl ShellSettings {
    pub fn new(store: Arc<dyn SettingsStore>) -> Self {
        Self { store }
    }

    fn read<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        match self.store.get(key) {
            Some(Value::Null) | None => default,
            Some(value) => serde_json::from_value(value).unwrap_or(default),
        }
    }

    fn write<T: Serialize>(&self, key: &str, value: &T) -> Result<(), String> {
        let value = serde_json::to_value(value)
            .map_err(|error| format!("Failed to encode setting {key}: {error}"))?;
        self.store.set(key, value)
    }

    pub fn always_on_top(&self) -> bool {
        self.read(KEY_ALWAYS_ON_TOP, true)
    }

    pub fn set_always_on_top(&self, enabled: bool) -> Result<(), String> {
        self.write(KEY_ALWAYS_ON_TOP, &enabled)
    }

    pub fn animations_enabled(&self) -> bool {
        self.read(KEY_ANIMATIONS_ENABLED, false)
    }

    pub fn set_animations_enabled(&self, enabled: bool) -> Result<(), String> {
        self.write(KEY_ANIMATIONS_ENABLED, &enabled)
    }

    pub fn open_at_startup(&self) -> bool {
        self.read(KEY_OPEN_AT_STARTUP, true)
    }

    pub fn set_open_at_startup(&self, enabled: bool) -> Result<(), String> {
        self.write(KEY_OPEN_AT_STARTUP, &enabled)
    }

    pub fn language(&self) -> Option<String> {
        self.read::<Option<String>>(KEY_LANGUAGE, None)
            .filter(|language| !language.trim().is_empty())
    }

    pub fn set_language(&self, language: &str) -> Result<(), String> {
        self.write(KEY_LANGUAGE, &language)
    }

    pub fn window_position(&self) -> WindowPosition {
        self.read(KEY_WINDOW_POSITION, WindowPosition::default())
    }

    pub fn set_window_position(&self, position: WindowPosition) -> Result<(), String> {
        self.write(KEY_WINDOW_POSITION, &position)
    }

    pub fn window_size(&self) -> WindowSize {
        self.read(KEY_WINDOW_SIZE, WindowSize::DEFAULT)
    }

    pub fn set_window_size(&self, size: WindowSize) -> Result<(), String> {
        self.write(KEY_WINDOW_SIZE, &size)
    }
}
