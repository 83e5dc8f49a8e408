//! Derivation of a store stack from a backend name and [`FacadeOptions`].

use serde_json::Value as Json;
use stowage::{BoxStore, Builder, ConfigError, Settings, Step};

use crate::{
    options::{DEFAULT_SERIALIZER, ExpiresSetting, FacadeOptions, LoggerSetting},
    profile::Profile,
};

/// One declaration of a planned stack.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedComponent {
    pub name: String,
    pub settings: Settings,
}

impl PlannedComponent {
    fn new(name: impl Into<String>, settings: Settings) -> Self {
        Self {
            name: name.into(),
            settings,
        }
    }
}

/// A derived stack that has not been built yet.
///
/// The last component is always the adapter; every earlier one is a proxy,
/// outermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct StackPlan {
    components: Vec<PlannedComponent>,
}

impl StackPlan {
    pub fn components(&self) -> &[PlannedComponent] {
        &self.components
    }

    /// Names of the planned components, outermost first.
    pub fn names(&self) -> Vec<&str> {
        self.components
            .iter()
            .map(|component| component.name.as_str())
            .collect()
    }

    /// Settings of the first component called `name`.
    pub fn settings(&self, name: &str) -> Option<&Settings> {
        self.components
            .iter()
            .find(|component| component.name == name)
            .map(|component| &component.settings)
    }

    /// Declares the planned components on a fresh [`Builder`].
    pub fn into_builder(self) -> Result<Builder, ConfigError> {
        let mut builder = Builder::new(Json::Null)?;
        let mut components = self.components;
        let Some(adapter) = components.pop() else {
            return Err(ConfigError::NoDeclarations);
        };
        for proxy in components {
            builder.layer(&proxy.name, Json::Object(proxy.settings))?;
        }
        builder.adapter(&adapter.name, Json::Object(adapter.settings))?;
        Ok(builder)
    }

    pub async fn build(self) -> Result<BoxStore, ConfigError> {
        self.into_builder()?.build().await
    }
}

fn steps(steps: &[Step]) -> Json {
    Json::Array(
        steps
            .iter()
            .map(|step| Json::String(step.name().to_owned()))
            .collect(),
    )
}

/// Derives the stack `new(name, options)` would build.
///
/// Proxies are ordered `Logger`, `Expires`, `Transformer`, `Lock`, followed
/// by the adapter. The transformer is always present: keys are serialized
/// and prefixed before any backend specific step runs.
pub fn plan(name: &str, options: &FacadeOptions) -> StackPlan {
    let profile = Profile::of(name);

    let mut key = options.key_serializer().into_iter().collect::<Vec<_>>();
    key.push(Step::Prefix);
    key.extend_from_slice(profile.key_steps);

    let mut value = options.value_serializer().into_iter().collect::<Vec<_>>();
    value.extend(options.compress.step());
    value.extend_from_slice(profile.value_steps);
    if profile.plain_values && value == [DEFAULT_SERIALIZER] {
        value.clear();
    }

    let mut adapter = options.adapter.clone();
    let mut expires = options.expires;
    if profile.native_expiry {
        if let ExpiresSetting::Seconds(secs) = expires {
            adapter.insert("expires".to_owned(), Json::from(secs));
        }
        expires = ExpiresSetting::Disabled;
    }

    let mut components = Vec::new();
    if let LoggerSetting::Enabled(settings) = &options.logger {
        components.push(PlannedComponent::new("Logger", settings.clone()));
    }
    match expires {
        ExpiresSetting::Disabled => {}
        ExpiresSetting::Enabled => components.push(PlannedComponent::new("Expires", Settings::new())),
        ExpiresSetting::Seconds(secs) => {
            let mut settings = Settings::new();
            settings.insert("expires".to_owned(), Json::from(secs));
            components.push(PlannedComponent::new("Expires", settings));
        }
    }

    let mut transformer = Settings::new();
    transformer.insert("key".to_owned(), steps(&key));
    transformer.insert("value".to_owned(), steps(&value));
    if let Some(prefix) = &options.prefix {
        transformer.insert("prefix".to_owned(), Json::String(prefix.clone()));
    }
    components.push(PlannedComponent::new("Transformer", transformer));

    if options.threadsafe {
        components.push(PlannedComponent::new("Lock", Settings::new()));
    }
    components.push(PlannedComponent::new(profile.adapter(name), adapter));

    let plan = StackPlan { components };
    tracing::debug!(backend = name, components = ?plan.names(), "planned store stack");
    plan
}
