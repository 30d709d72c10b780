use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Durable key/value attributes belonging to a single entity.
///
/// Values handed out by `get_mut` are edited in place; `flush` makes those
/// edits durable.
pub trait AttributeStorage {
    fn has(&self, key: &str) -> bool;
    fn add(&mut self, key: &str, value: Value) -> Result<()>;
    fn get(&self, key: &str) -> Option<&Value>;
    fn get_mut(&mut self, key: &str) -> Option<&mut Value>;
    fn flush(&mut self) -> Result<()>;
}

/// Attributes that live only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryAttributes {
    data: HashMap<String, Value>,
}

impl MemoryAttributes {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AttributeStorage for MemoryAttributes {
    fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    fn add(&mut self, key: &str, value: Value) -> Result<()> {
        self.data.insert(key.to_string(), value);
        Ok(())
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Attributes stored as one JSON object in a file.
#[derive(Debug)]
pub struct JsonFileAttributes {
    path: PathBuf,
    data: Map<String, Value>,
}

impl JsonFileAttributes {
    /// Loads the attribute file at `path`, starting empty if it doesn't exist.
    pub fn open<P>(path: P) -> Result<Self>
    where
        P: Into<PathBuf>,
    {
        let path = path.into();
        let data = if path.exists() {
            read_attribute_file(&path)?
        } else {
            tracing::warn!(?path, "attribute file doesn't exist, starting empty");
            Map::new()
        };
        Ok(JsonFileAttributes { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl AttributeStorage for JsonFileAttributes {
    fn has(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    fn add(&mut self, key: &str, value: Value) -> Result<()> {
        self.data.insert(key.to_string(), value);
        self.flush()
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.data.get_mut(key)
    }

    fn flush(&mut self) -> Result<()> {
        write_attribute_file(&self.data, &self.path)
    }
}

fn read_attribute_file(path: &Path) -> Result<Map<String, Value>> {
    let data = std::fs::read(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    match serde_json::from_slice(&data)? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

fn write_attribute_file(data: &Map<String, Value>, path: &Path) -> Result<()> {
    let encoded = serde_json::to_vec_pretty(data)?;

    // Write next to the target, then rename over it
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    std::fs::write(&tmp, encoded).map_err(|source| Error::Io {
        path: tmp.clone(),
        source,
    })?;
    std::fs::rename(&tmp, path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(?path, "flushed attributes");
    Ok(())
}
