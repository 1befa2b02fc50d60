use std::{
    collections::BTreeMap,
    error::Error as StdError,
    fmt::{Display, Formatter},
    fs, io,
    path::{Path, PathBuf},
};

use log::{error, info};
use serde::{Deserialize, Serialize};

/// Scalar values the world property store accepts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Boolean(bool),
    Number(f64),
    String(String),
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

/// World-scoped key/value persistence. Setting `None` removes the key.
pub trait WorldStorage {
    fn get_property(&self, key: &str) -> Option<&PropertyValue>;

    fn set_property(&mut self, key: &str, value: Option<PropertyValue>);
}

impl<S: WorldStorage + ?Sized> WorldStorage for Box<S> {
    fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        (**self).get_property(key)
    }

    fn set_property(&mut self, key: &str, value: Option<PropertyValue>) {
        (**self).set_property(key, value)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    properties: BTreeMap<String, PropertyValue>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }
}

impl WorldStorage for MemoryStorage {
    fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    fn set_property(&mut self, key: &str, value: Option<PropertyValue>) {
        match value {
            Some(value) => {
                self.properties.insert(key.to_string(), value);
            }
            None => {
                self.properties.remove(key);
            }
        }
    }
}

#[derive(Debug)]
pub enum StorageError {
    Io(io::Error),
    Malformed(serde_json::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "world storage could not be accessed: {}", e),
            StorageError::Malformed(e) => write!(f, "world storage is malformed: {}", e),
        }
    }
}

impl StdError for StorageError {}

impl From<io::Error> for StorageError {
    fn from(e: io::Error) -> Self {
        StorageError::Io(e)
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(e: serde_json::Error) -> Self {
        StorageError::Malformed(e)
    }
}

#[derive(Default, Serialize, Deserialize)]
struct WorldData {
    #[serde(default)]
    properties: BTreeMap<String, PropertyValue>,
}

/// Property store persisted as a JSON document, rewritten on every change.
#[derive(Debug)]
pub struct JsonFileStorage {
    path: PathBuf,
    properties: BTreeMap<String, PropertyValue>,
}

impl JsonFileStorage {
    /// Loads the world file, starting empty when it does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();

        let properties = match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str::<WorldData>(&content)?.properties,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                info!("No world storage at {}, starting fresh", path.display());

                BTreeMap::new()
            }
            Err(e) => return Err(e.into()),
        };

        info!("Loaded {} world properties from {}", properties.len(), path.display());

        Ok(Self { path, properties })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StorageError> {
        let data = WorldData { properties: self.properties.clone() };
        let json = serde_json::to_string_pretty(&data)?;

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, json)?;
        fs::rename(&staging, &self.path)?;

        Ok(())
    }
}

impl WorldStorage for JsonFileStorage {
    fn get_property(&self, key: &str) -> Option<&PropertyValue> {
        self.properties.get(key)
    }

    fn set_property(&mut self, key: &str, value: Option<PropertyValue>) {
        match value {
            Some(value) => {
                self.properties.insert(key.to_string(), value);
            }
            None => {
                self.properties.remove(key);
            }
        }

        // Losing the save file is not recoverable from inside the world.
        if let Err(e) = self.flush() {
            error!("Could not persist world storage to {}: {}", self.path.display(), e);

            panic!("{}", e);
        }
    }
}
