//! Typed per-source configuration keys.
//!
//! Adapters declare the tunable parts of their behavior (domain mirrors, user
//! agent, preferred image server, ...) as [`ConfigKey`] constants carrying a
//! default value and optionally a closed set of presets for UIs. Values live
//! in an external [`ConfigStore`] keyed by `(source id, key name)`; the runtime
//! only reads them back through [`SourceConfig`].
//!
//! # Examples
//!
//! ```rust
//! use std::sync::Arc;
//! use shiori::config::{ConfigKey, MemoryConfigStore, SourceConfig};
//!
//! let domain = ConfigKey::domain(&["example.org", "example.net"]);
//! let config = SourceConfig::new("example", Arc::new(MemoryConfigStore::new()));
//!
//! assert_eq!(config.get(&domain), "example.org");
//! config.set(&domain, "example.net".to_string()).unwrap();
//! assert_eq!(config.get(&domain), "example.net");
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;

use crate::error::Result;

pub const KEY_DOMAIN: &str = "domain";
pub const KEY_USER_AGENT: &str = "user_agent";
pub const KEY_SHOW_SUSPICIOUS: &str = "show_suspicious";
pub const KEY_SPLIT_TRANSLATIONS: &str = "split_translations";
pub const KEY_IMAGE_SERVER: &str = "img_server";
pub const KEY_DISABLE_UPDATES: &str = "no_update";
pub const KEY_CLOUDFLARE: &str = "intercept_cloudflare";

/// One selectable value of a key, with an optional display label.
#[derive(Debug, Clone, PartialEq)]
pub struct Preset<T> {
    pub value: T,
    pub label: Option<String>,
}

impl<T> Preset<T> {
    pub fn new(value: T, label: Option<&str>) -> Self {
        Self {
            value,
            label: label.map(str::to_string),
        }
    }
}

/// A typed configuration key with its default value.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigKey<T> {
    pub name: &'static str,
    pub default: T,
    pub presets: Vec<Preset<T>>,
}

impl<T> ConfigKey<T> {
    pub fn new(name: &'static str, default: T) -> Self {
        Self {
            name,
            default,
            presets: Vec::new(),
        }
    }

    pub fn with_presets(mut self, presets: Vec<Preset<T>>) -> Self {
        self.presets = presets;
        self
    }
}

impl<T: Serialize> ConfigKey<T> {
    /// Type-erased description of this key.
    pub fn describe(&self) -> AnyConfigKey {
        AnyConfigKey {
            name: self.name,
            default: to_value(&self.default),
            presets: self
                .presets
                .iter()
                .map(|preset| (to_value(&preset.value), preset.label.clone()))
                .collect(),
        }
    }
}

impl ConfigKey<String> {
    /// Mirror domains of a site; the first one is the default.
    pub fn domain(mirrors: &[&str]) -> Self {
        let default = mirrors.first().copied().unwrap_or_default().to_string();
        ConfigKey::new(KEY_DOMAIN, default).with_presets(
            mirrors
                .iter()
                .map(|mirror| Preset::new(mirror.to_string(), None))
                .collect(),
        )
    }

    pub fn user_agent(default: impl Into<String>) -> Self {
        ConfigKey::new(KEY_USER_AGENT, default.into())
    }
}

impl ConfigKey<bool> {
    pub fn show_suspicious_content(default: bool) -> Self {
        ConfigKey::new(KEY_SHOW_SUSPICIOUS, default)
    }

    pub fn split_by_translations(default: bool) -> Self {
        ConfigKey::new(KEY_SPLIT_TRANSLATIONS, default)
    }

    pub fn disable_update_checking(default: bool) -> Self {
        ConfigKey::new(KEY_DISABLE_UPDATES, default)
    }

    pub fn intercept_cloudflare(default: bool) -> Self {
        ConfigKey::new(KEY_CLOUDFLARE, default)
    }
}

impl ConfigKey<Option<String>> {
    /// Image server selection; `None` means "let the source decide".
    pub fn preferred_image_server(
        presets: Vec<Preset<Option<String>>>,
        default: Option<String>,
    ) -> Self {
        ConfigKey::new(KEY_IMAGE_SERVER, default).with_presets(presets)
    }
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

/// A configuration key with its value type erased to JSON.
///
/// Used when enumerating the keys a source recognizes, see
/// [`Source::on_create_config`](crate::Source::on_create_config).
#[derive(Debug, Clone, PartialEq)]
pub struct AnyConfigKey {
    pub name: &'static str,
    pub default: Value,
    pub presets: Vec<(Value, Option<String>)>,
}

/// Persistence boundary for configuration values.
pub trait ConfigStore: Send + Sync {
    fn get(&self, source_id: &str, key: &str) -> Option<Value>;
    fn set(&self, source_id: &str, key: &str, value: Value);
}

/// In-memory [`ConfigStore`].
///
/// An empty store answers every lookup with the key's default.
#[derive(Debug, Default)]
pub struct MemoryConfigStore {
    values: RwLock<HashMap<(String, String), Value>>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, source_id: &str, key: &str) -> Option<Value> {
        self.values
            .read()
            .get(&(source_id.to_string(), key.to_string()))
            .cloned()
    }

    fn set(&self, source_id: &str, key: &str, value: Value) {
        self.values
            .write()
            .insert((source_id.to_string(), key.to_string()), value);
    }
}

/// The configuration of one source, backed by a shared store.
#[derive(Clone)]
pub struct SourceConfig {
    source_id: String,
    store: Arc<dyn ConfigStore>,
}

impl std::fmt::Debug for SourceConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceConfig")
            .field("source_id", &self.source_id)
            .finish_non_exhaustive()
    }
}

impl SourceConfig {
    pub fn new(source_id: impl Into<String>, store: Arc<dyn ConfigStore>) -> Self {
        Self {
            source_id: source_id.into(),
            store,
        }
    }

    /// Reads a value, falling back to the key default when it is unset or
    /// does not deserialize into `T`.
    pub fn get<T>(&self, key: &ConfigKey<T>) -> T
    where
        T: DeserializeOwned + Clone,
    {
        let Some(value) = self.store.get(&self.source_id, key.name) else {
            return key.default.clone();
        };
        match serde_json::from_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(
                    source = %self.source_id,
                    key = key.name,
                    error = %e,
                    "ignoring malformed config value"
                );
                key.default.clone()
            }
        }
    }

    pub fn set<T: Serialize>(&self, key: &ConfigKey<T>, value: T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.store.set(&self.source_id, key.name, value);
        Ok(())
    }
}
