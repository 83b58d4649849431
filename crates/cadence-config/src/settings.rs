//! Plugin-wide settings that are not automatable parameters.
//!
//! Settings are free-form key/value pairs (UI theme, oversampling choice,
//! last-used folder, ...). They follow the parameter model loosely: a list of
//! [`SettingDescriptor`]s seeds the defaults, values can be read and written
//! by key, and the whole map round-trips through a TOML document so hosts
//! can store it with their session.
//!
//! # TOML Format
//!
//! ```toml
//! [settings]
//! oversampling = 2
//! show_tooltips = true
//! theme = "dark"
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::listeners::{ListenerId, ListenerList, SettingListener};

/// Default identifier of the settings document.
pub const DEFAULT_SETTINGS_IDENTIFIER: &str = "settings";

/// A setting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    /// Flag.
    Bool(bool),
    /// Whole number.
    Int(i64),
    /// Real number.
    Float(f64),
    /// Text.
    Text(String),
}

impl SettingValue {
    /// The flag, if this is a [`SettingValue::Bool`].
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SettingValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The number, if this is a [`SettingValue::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            SettingValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The number, if this is a [`SettingValue::Float`] or [`SettingValue::Int`].
    pub fn as_float(&self) -> Option<f64> {
        match self {
            SettingValue::Float(f) => Some(*f),
            SettingValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// The text, if this is a [`SettingValue::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            SettingValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Int(i) => write!(f, "{i}"),
            SettingValue::Float(x) => write!(f, "{x}"),
            SettingValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Int(value)
    }
}

impl From<i32> for SettingValue {
    fn from(value: i32) -> Self {
        SettingValue::Int(i64::from(value))
    }
}

impl From<f64> for SettingValue {
    fn from(value: f64) -> Self {
        SettingValue::Float(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Text(value.to_string())
    }
}

impl From<String> for SettingValue {
    fn from(value: String) -> Self {
        SettingValue::Text(value)
    }
}

/// Definition of one setting and its default.
#[derive(Debug, Clone, PartialEq)]
pub struct SettingDescriptor {
    /// Setting key.
    pub id: String,
    /// Value used until something else is set.
    pub default: SettingValue,
}

impl SettingDescriptor {
    /// New descriptor.
    pub fn new(id: impl Into<String>, default: impl Into<SettingValue>) -> Self {
        Self {
            id: id.into(),
            default: default.into(),
        }
    }
}

/// Key/value settings store with change notification.
///
/// Listeners get one call per key whose value actually changed. Keys that
/// have no descriptor are accepted.
pub struct SettingManager {
    descriptors: Vec<SettingDescriptor>,
    identifier: String,
    values: BTreeMap<String, SettingValue>,
    listeners: ListenerList<dyn SettingListener>,
}

impl SettingManager {
    /// Store seeded with the descriptors' defaults, using the `settings`
    /// document identifier.
    pub fn new(descriptors: Vec<SettingDescriptor>) -> Self {
        Self::with_identifier(descriptors, DEFAULT_SETTINGS_IDENTIFIER)
    }

    /// Store seeded with defaults and a custom document identifier.
    pub fn with_identifier(descriptors: Vec<SettingDescriptor>, identifier: impl Into<String>) -> Self {
        let values = descriptors
            .iter()
            .map(|d| (d.id.clone(), d.default.clone()))
            .collect();
        Self {
            descriptors,
            identifier: identifier.into(),
            values,
            listeners: ListenerList::new(),
        }
    }

    /// Document identifier.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// The descriptors this store was built from.
    pub fn descriptors(&self) -> &[SettingDescriptor] {
        &self.descriptors
    }

    /// Current value of `key`.
    pub fn get(&self, key: &str) -> Option<&SettingValue> {
        self.values.get(key)
    }

    /// Iterates all settings in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SettingValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Sets `key` to `value`.
    ///
    /// Returns `true` and notifies listeners if the stored value changed.
    pub fn set(&mut self, key: &str, value: impl Into<SettingValue>) -> bool {
        let value = value.into();
        if self.values.get(key) == Some(&value) {
            return false;
        }
        self.values.insert(key.to_string(), value.clone());
        self.notify(key, &value);
        true
    }

    /// Serializes every setting as a table named after the identifier.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let mut doc = BTreeMap::new();
        doc.insert(self.identifier.as_str(), &self.values);
        Ok(toml::to_string_pretty(&doc)?)
    }

    /// Replaces every setting with the contents of `doc`.
    ///
    /// The document must contain a table named after the identifier;
    /// otherwise nothing changes. On success listeners are notified once
    /// per key of the new map, in key order.
    pub fn from_toml(&mut self, doc: &str) -> Result<(), ConfigError> {
        let mut tables: BTreeMap<String, BTreeMap<String, SettingValue>> = toml::from_str(doc)?;
        let Some(values) = tables.remove(&self.identifier) else {
            return Err(ConfigError::StateKindMismatch {
                expected: self.identifier.clone(),
                found: tables.into_keys().next().unwrap_or_default(),
            });
        };

        self.values = values;
        tracing::debug!(count = self.values.len(), "settings replaced");
        for (key, value) in &self.values {
            self.listeners.call(|l| l.setting_changed(key, value));
        }
        Ok(())
    }

    /// Registers a listener.
    pub fn add_listener(&mut self, listener: Arc<dyn SettingListener>) -> ListenerId {
        self.listeners.add(listener)
    }

    /// Unregisters a listener. Returns `false` if it was not registered.
    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    fn notify(&self, key: &str, value: &SettingValue) {
        self.listeners.call(|l| l.setting_changed(key, value));
    }
}

impl fmt::Debug for SettingManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SettingManager")
            .field("identifier", &self.identifier)
            .field("values", &self.values)
            .field("listeners", &self.listeners)
            .finish()
    }
}
