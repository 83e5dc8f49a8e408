//! Static registry of the components a [`Builder`](crate::Builder) can declare by name.

use serde::de::DeserializeOwned;
use stowage_backend::{BoxStore, Transformer, TransformerConfig};

use crate::{ConfigError, Expires, ExpiresConfig, Lock, Logger, LoggerConfig, Settings};

/// Proxies known by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProxyKind {
    Expires,
    Transformer,
    Lock,
    Logger,
}

/// Terminal adapters known by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdapterKind {
    Memory,
    Null,
    File,
}

const PROXIES: &[(&str, ProxyKind)] = &[
    ("Expires", ProxyKind::Expires),
    ("Transformer", ProxyKind::Transformer),
    ("Lock", ProxyKind::Lock),
    ("Logger", ProxyKind::Logger),
];

const ADAPTERS: &[(&str, AdapterKind)] = &[
    ("Memory", AdapterKind::Memory),
    ("Null", AdapterKind::Null),
    ("File", AdapterKind::File),
];

/// Adapters of the wider ecosystem that this build does not ship.
const FOREIGN_ADAPTERS: &[&str] = &[
    "ActiveRecord",
    "Cassandra",
    "Couch",
    "DataMapper",
    "Memcached",
    "MemcachedDalli",
    "MemcachedNative",
    "PStore",
    "Redis",
    "Riak",
    "Sequel",
    "YAML",
];

pub(crate) fn settings_into<T: DeserializeOwned>(
    component: &str,
    settings: &Settings,
) -> Result<T, ConfigError> {
    serde_json::from_value(serde_json::Value::Object(settings.clone())).map_err(|source| {
        ConfigError::InvalidSettings {
            component: component.to_owned(),
            source,
        }
    })
}

impl ProxyKind {
    pub fn lookup(name: &str) -> Option<Self> {
        PROXIES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, kind)| *kind)
    }

    pub fn name(&self) -> &'static str {
        match self {
            ProxyKind::Expires => "Expires",
            ProxyKind::Transformer => "Transformer",
            ProxyKind::Lock => "Lock",
            ProxyKind::Logger => "Logger",
        }
    }

    /// Wraps `inner` in this proxy, configured from `settings`.
    pub(crate) fn wrap(&self, inner: BoxStore, settings: &Settings) -> Result<BoxStore, ConfigError> {
        let name = self.name();
        Ok(match self {
            ProxyKind::Expires => {
                let config: ExpiresConfig = settings_into(name, settings)?;
                Box::new(Expires::new(inner, config.default_expiry()))
            }
            ProxyKind::Transformer => {
                let config: TransformerConfig = settings_into(name, settings)?;
                let transformer = Transformer::new(inner, &config).map_err(|source| {
                    ConfigError::InvalidPipeline {
                        component: name.to_owned(),
                        source,
                    }
                })?;
                Box::new(transformer)
            }
            ProxyKind::Lock => Box::new(Lock::new(inner)),
            ProxyKind::Logger => {
                let config: LoggerConfig = settings_into(name, settings)?;
                Box::new(Logger::new(inner, config))
            }
        })
    }
}

impl AdapterKind {
    /// Resolves an adapter name.
    ///
    /// Known adapters that are not compiled in, including the ones this
    /// project does not ship at all, yield [`ConfigError::BackendNotAvailable`].
    pub fn lookup(name: &str) -> Result<Self, ConfigError> {
        if let Some((_, kind)) = ADAPTERS.iter().find(|(known, _)| *known == name) {
            return if kind.is_available() {
                Ok(*kind)
            } else {
                Err(ConfigError::BackendNotAvailable(name.to_owned()))
            };
        }
        if FOREIGN_ADAPTERS.contains(&name) {
            return Err(ConfigError::BackendNotAvailable(name.to_owned()));
        }
        Err(ConfigError::UnknownComponent(name.to_owned()))
    }

    pub fn name(&self) -> &'static str {
        match self {
            AdapterKind::Memory => "Memory",
            AdapterKind::Null => "Null",
            AdapterKind::File => "File",
        }
    }

    pub fn is_available(&self) -> bool {
        match self {
            AdapterKind::Memory | AdapterKind::Null => cfg!(feature = "memory"),
            AdapterKind::File => cfg!(feature = "file"),
        }
    }

    /// Opens the adapter configured from `settings`.
    pub(crate) async fn open(&self, settings: &Settings) -> Result<BoxStore, ConfigError> {
        let name = self.name();
        match self {
            #[cfg(feature = "memory")]
            AdapterKind::Memory => {
                let config: stowage_memory::MemoryConfig = settings_into(name, settings)?;
                Ok(Box::new(config.into_store()))
            }
            #[cfg(feature = "memory")]
            AdapterKind::Null => Ok(Box::new(stowage_memory::NullStore)),
            #[cfg(feature = "file")]
            AdapterKind::File => {
                let config: stowage_file::FileConfig = settings_into(name, settings)?;
                let store = config
                    .into_store()
                    .await
                    .map_err(|error| ConfigError::Adapter {
                        component: name.to_owned(),
                        source: error.into(),
                    })?;
                Ok(Box::new(store))
            }
            #[allow(unreachable_patterns)]
            _ => {
                let _ = settings;
                Err(ConfigError::BackendNotAvailable(name.to_owned()))
            }
        }
    }
}
