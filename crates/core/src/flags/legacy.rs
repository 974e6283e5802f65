//! Legacy flag globals.
//!
//! Before the capture module existed each flag was a loose ambient value read by name. These are
//! kept as an owned set of untyped values and coerced to booleans on read.

use super::{FlagName, FlagSnapshot};
use crate::{CoreError, CoreResult};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

/// Boolean coercion for an ambient value.
///
/// `null`, `false`, zero and the empty string are false. Everything else, including empty arrays
/// and objects, is true.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Owned set of legacy ambient values, keyed by flag wire name.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegacyGlobals {
    values: BTreeMap<String, Value>,
}

impl LegacyGlobals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load globals from a YAML mapping of name to value.
    ///
    /// A missing file means no globals are set. Names outside the known flag set are kept but
    /// never read.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::FileRead`] if the file exists but cannot be read, or
    /// [`CoreError::YamlDeserialization`] if it is not a mapping.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("no legacy flags file at {}", path.display());
                return Ok(Self::new());
            }
            Err(source) => {
                return Err(CoreError::FileRead {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };

        if contents.trim().is_empty() {
            return Ok(Self::new());
        }

        let values: BTreeMap<String, Value> =
            serde_yaml::from_str(&contents).map_err(CoreError::YamlDeserialization)?;
        Ok(Self { values })
    }

    pub fn set(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    pub fn raw(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    /// Coerced value of a single flag. Absent names read as `false`.
    pub fn read(&self, flag: FlagName) -> bool {
        self.raw(flag.as_str()).map(truthy).unwrap_or(false)
    }

    /// A snapshot holding exactly the known flag names.
    pub fn snapshot(&self) -> FlagSnapshot {
        FlagSnapshot::from_map(
            FlagName::ALL
                .into_iter()
                .map(|flag| (flag.as_str().to_string(), self.read(flag)))
                .collect(),
        )
    }
}
