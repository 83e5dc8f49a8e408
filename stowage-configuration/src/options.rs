use serde::{Deserialize, Deserializer};
use stowage::{Settings, Step};

/// Accepts either a boolean switch or a concrete value.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum FlagOr<T> {
    Flag(bool),
    Value(T),
}

/// The `expires` option: `false`, `true` or a default time to live in seconds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "FlagOr<u64>")]
pub enum ExpiresSetting {
    #[default]
    Disabled,
    /// Expiry support without a default time to live.
    Enabled,
    Seconds(u64),
}

impl From<FlagOr<u64>> for ExpiresSetting {
    fn from(value: FlagOr<u64>) -> Self {
        match value {
            FlagOr::Flag(false) => ExpiresSetting::Disabled,
            FlagOr::Flag(true) => ExpiresSetting::Enabled,
            FlagOr::Value(secs) => ExpiresSetting::Seconds(secs),
        }
    }
}

/// The `logger` option: a switch or the logger's own settings.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "FlagOr<Settings>")]
pub enum LoggerSetting {
    #[default]
    Disabled,
    Enabled(Settings),
}

impl From<FlagOr<Settings>> for LoggerSetting {
    fn from(value: FlagOr<Settings>) -> Self {
        match value {
            FlagOr::Flag(false) => LoggerSetting::Disabled,
            FlagOr::Flag(true) => LoggerSetting::Enabled(Settings::new()),
            FlagOr::Value(settings) => LoggerSetting::Enabled(settings),
        }
    }
}

/// The `compress` option: a switch (zlib) or the compression step to use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "FlagOr<Step>")]
pub enum CompressSetting {
    #[default]
    Disabled,
    Step(Step),
}

impl CompressSetting {
    pub fn step(&self) -> Option<Step> {
        match self {
            CompressSetting::Disabled => None,
            CompressSetting::Step(step) => Some(*step),
        }
    }
}

impl From<FlagOr<Step>> for CompressSetting {
    fn from(value: FlagOr<Step>) -> Self {
        match value {
            FlagOr::Flag(false) => CompressSetting::Disabled,
            FlagOr::Flag(true) => CompressSetting::Step(Step::Zlib),
            FlagOr::Value(step) => CompressSetting::Step(step),
        }
    }
}

/// Reads a serializer option that was present in the input.
///
/// `null` and `false` select no serializer, `true` the default one.
fn present_serializer<'de, D>(deserializer: D) -> Result<Option<Option<Step>>, D::Error>
where
    D: Deserializer<'de>,
{
    let step = match Option::<FlagOr<Step>>::deserialize(deserializer)? {
        None | Some(FlagOr::Flag(false)) => None,
        Some(FlagOr::Flag(true)) => Some(DEFAULT_SERIALIZER),
        Some(FlagOr::Value(step)) => Some(step),
    };
    Ok(Some(step))
}

/// Serializer used when none is configured.
pub const DEFAULT_SERIALIZER: Step = Step::Bincode;

/// Flat options accepted by [`new`](crate::new).
///
/// Everything this type does not recognize is collected in
/// [`adapter`](Self::adapter) and handed to the terminal adapter.
///
/// ```
/// use stowage_configuration::FacadeOptions;
///
/// let options: FacadeOptions = serde_json::from_value(serde_json::json!({
///     "expires": 60,
///     "serializer": "json",
///     "dir": "/var/cache/app",
/// }))
/// .unwrap();
/// assert_eq!(options.adapter["dir"], "/var/cache/app");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FacadeOptions {
    pub expires: ExpiresSetting,
    /// Serializes every operation with a lock.
    pub threadsafe: bool,
    pub logger: LoggerSetting,
    pub compress: CompressSetting,
    /// Serializer for both keys and values.
    ///
    /// `None` when absent, `Some(None)` when explicitly disabled.
    #[serde(deserialize_with = "present_serializer")]
    pub serializer: Option<Option<Step>>,
    /// Overrides [`serializer`](Self::serializer) for keys.
    #[serde(deserialize_with = "present_serializer")]
    pub key_serializer: Option<Option<Step>>,
    /// Overrides [`serializer`](Self::serializer) for values.
    #[serde(deserialize_with = "present_serializer")]
    pub value_serializer: Option<Option<Step>>,
    pub prefix: Option<String>,
    #[serde(flatten)]
    pub adapter: Settings,
}

impl FacadeOptions {
    pub fn key_serializer(&self) -> Option<Step> {
        self.key_serializer.unwrap_or_else(|| self.serializer())
    }

    pub fn value_serializer(&self) -> Option<Step> {
        self.value_serializer.unwrap_or_else(|| self.serializer())
    }

    fn serializer(&self) -> Option<Step> {
        self.serializer.unwrap_or(Some(DEFAULT_SERIALIZER))
    }
}
