//! The parsed configuration document.
//!
//! Menu documents reach the runtime as an ordered, case-insensitive
//! string-keyed tree. `Section` preserves declaration order (slot groups,
//! requirement ids and list children all depend on it) and looks keys up
//! without regard to ASCII case, so `Menu-Settings` and `menu-settings` name
//! the same entry.

use serde::Serialize;

use crate::error::{MenuError, MenuResult};

/// A single value inside a configuration `Section`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    List(Vec<ConfigValue>),
    Section(Section),
}

impl ConfigValue {
    /// Return the nested section, if this value is one.
    pub fn as_section(&self) -> Option<&Section> {
        match self {
            ConfigValue::Section(section) => Some(section),
            _ => None,
        }
    }

    /// Render a scalar as text. Lists and sections have no text form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            ConfigValue::Text(s) => Some(s.clone()),
            ConfigValue::Integer(i) => Some(i.to_string()),
            ConfigValue::Float(f) => Some(f.to_string()),
            ConfigValue::Boolean(b) => Some(b.to_string()),
            ConfigValue::List(_) | ConfigValue::Section(_) => None,
        }
    }

    /// Interpret the value as a number, parsing text if needed.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ConfigValue::Integer(i) => Some(*i as f64),
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Text(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Interpret the value as a boolean. Text is `true` only when it reads
    /// "true" in any case; every other scalar string is `false`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            ConfigValue::Text(s) => Some(s.trim().eq_ignore_ascii_case("true")),
            _ => None,
        }
    }

    /// Flatten the value into a list of trimmed strings.
    ///
    /// A scalar becomes a one-element list; nested sections are skipped.
    pub fn to_string_list(&self) -> Vec<String> {
        match self {
            ConfigValue::List(items) => items
                .iter()
                .filter_map(ConfigValue::to_text)
                .map(|s| s.trim().to_string())
                .collect(),
            ConfigValue::Section(_) => Vec::new(),
            scalar => scalar
                .to_text()
                .map(|s| vec![s.trim().to_string()])
                .unwrap_or_default(),
        }
    }
}

impl From<toml::Value> for ConfigValue {
    fn from(value: toml::Value) -> Self {
        match value {
            toml::Value::String(s) => ConfigValue::Text(s),
            toml::Value::Integer(i) => ConfigValue::Integer(i),
            toml::Value::Float(f) => ConfigValue::Float(f),
            toml::Value::Boolean(b) => ConfigValue::Boolean(b),
            toml::Value::Datetime(dt) => ConfigValue::Text(dt.to_string()),
            toml::Value::Array(items) => {
                ConfigValue::List(items.into_iter().map(ConfigValue::from).collect())
            }
            toml::Value::Table(table) => ConfigValue::Section(Section::from(table)),
        }
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        ConfigValue::Text(value.to_string())
    }
}

impl From<i64> for ConfigValue {
    fn from(value: i64) -> Self {
        ConfigValue::Integer(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        ConfigValue::Boolean(value)
    }
}

impl From<Vec<&str>> for ConfigValue {
    fn from(value: Vec<&str>) -> Self {
        ConfigValue::List(value.into_iter().map(ConfigValue::from).collect())
    }
}

impl From<Section> for ConfigValue {
    fn from(value: Section) -> Self {
        ConfigValue::Section(value)
    }
}

/// An ordered, case-insensitive mapping of keys to `ConfigValue`s.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Section {
    entries: Vec<(String, ConfigValue)>,
}

impl Section {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document into a `Section`, keeping table order.
    ///
    /// Returns `MenuError::ConfigError` if the text is not valid TOML.
    pub fn from_toml_str(s: &str) -> MenuResult<Self> {
        let table: toml::Table = toml::from_str(s).map_err(|e| MenuError::ConfigError {
            reason: format!("failed to parse menu TOML: {}", e),
        })?;
        Ok(Section::from(table))
    }

    /// Look up `key` ignoring ASCII case.
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
    }

    /// Look up a nested section by key.
    pub fn section(&self, key: &str) -> Option<&Section> {
        self.get(key).and_then(ConfigValue::as_section)
    }

    /// Insert or replace `key`. A replaced entry keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<ConfigValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(&key)) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style `insert`.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<ConfigValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Iterate entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<toml::Table> for Section {
    fn from(table: toml::Table) -> Self {
        let mut section = Section::new();
        for (key, value) in table {
            section.insert(key, ConfigValue::from(value));
        }
        section
    }
}

impl FromIterator<(String, ConfigValue)> for Section {
    fn from_iter<T: IntoIterator<Item = (String, ConfigValue)>>(iter: T) -> Self {
        let mut section = Section::new();
        for (key, value) in iter {
            section.insert(key, value);
        }
        section
    }
}
