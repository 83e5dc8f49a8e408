//! Assembles declarations into one composed store.

use std::{fmt, future::Future, pin::Pin, sync::Arc};

use stowage_backend::{BoxStore, Cache, Store};

use crate::{
    ConfigError, Settings,
    registry::{AdapterKind, ProxyKind},
};

type ProxyFactory =
    Box<dyn FnOnce(BoxStore, &Settings) -> Result<BoxStore, ConfigError> + Send + 'static>;

type BuildFuture = Pin<Box<dyn Future<Output = Result<BoxStore, ConfigError>> + Send>>;

enum Component {
    Proxy(ProxyKind),
    CustomProxy(ProxyFactory),
    Adapter(AdapterKind),
    Instance(BoxStore),
    Cache { cache: Slot, backend: Slot },
}

impl Component {
    fn is_terminal(&self) -> bool {
        matches!(
            self,
            Component::Adapter(_) | Component::Instance(_) | Component::Cache { .. }
        )
    }
}

struct Declaration {
    name: String,
    component: Component,
    options: Settings,
}

/// Converts declaration options into a settings mapping; `null` means empty.
pub(crate) fn to_settings(options: serde_json::Value) -> Result<Settings, ConfigError> {
    match options {
        serde_json::Value::Object(map) => Ok(map),
        serde_json::Value::Null => Ok(Settings::new()),
        serde_json::Value::Bool(_) => Err(ConfigError::OptionsNotMapping("a boolean")),
        serde_json::Value::Number(_) => Err(ConfigError::OptionsNotMapping("a number")),
        serde_json::Value::String(_) => Err(ConfigError::OptionsNotMapping("a string")),
        serde_json::Value::Array(_) => Err(ConfigError::OptionsNotMapping("an array")),
    }
}

/// Component options layered over the base options; the component wins.
fn merge(base: &Settings, options: &Settings) -> Settings {
    let mut merged = base.clone();
    for (key, value) in options {
        merged.insert(key.clone(), value.clone());
    }
    merged
}

/// Declares a stack of stores and builds it.
///
/// The first declaration is the outermost layer, the last one must be the
/// terminal store (an adapter, a pre-built store or a cache). Building
/// starts at the terminal and wraps every earlier declaration around it in
/// turn, each configured from its own options layered over the builder's.
///
/// ```ignore
/// use serde_json::json;
/// use stowage::Builder;
///
/// let mut builder = Builder::new(json!({}))?;
/// builder
///     .layer("Expires", json!({"expires": 60}))?
///     .layer("Transformer", json!({"key": ["json"], "value": ["json"]}))?
///     .adapter("Memory", json!({}))?;
/// let store = builder.build().await?;
/// ```
pub struct Builder {
    options: Settings,
    declarations: Vec<Declaration>,
}

impl fmt::Debug for Builder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("options", &self.options)
            .field("components", &self.components())
            .finish()
    }
}

impl Builder {
    /// Creates a builder whose `options` are shared by every declaration.
    pub fn new(options: serde_json::Value) -> Result<Self, ConfigError> {
        Ok(Self::with_settings(to_settings(options)?))
    }

    pub(crate) fn with_settings(options: Settings) -> Self {
        Self {
            options,
            declarations: Vec::new(),
        }
    }

    fn declare(
        &mut self,
        name: impl Into<String>,
        component: Component,
        options: Settings,
    ) -> &mut Self {
        self.declarations.push(Declaration {
            name: name.into(),
            component,
            options,
        });
        self
    }

    /// Declares a registered proxy.
    pub fn layer(
        &mut self,
        name: &str,
        options: serde_json::Value,
    ) -> Result<&mut Self, ConfigError> {
        let kind =
            ProxyKind::lookup(name).ok_or_else(|| ConfigError::UnknownComponent(name.to_owned()))?;
        let options = to_settings(options)?;
        Ok(self.declare(name, Component::Proxy(kind), options))
    }

    /// Declares a custom proxy.
    ///
    /// `factory` receives the already built inner store and the merged
    /// settings, and returns the wrapped store.
    pub fn layer_with<F>(
        &mut self,
        name: &str,
        options: serde_json::Value,
        factory: F,
    ) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(BoxStore, &Settings) -> Result<BoxStore, ConfigError> + Send + 'static,
    {
        let options = to_settings(options)?;
        Ok(self.declare(name, Component::CustomProxy(Box::new(factory)), options))
    }

    /// Declares a registered adapter as the terminal store.
    pub fn adapter(
        &mut self,
        name: &str,
        options: serde_json::Value,
    ) -> Result<&mut Self, ConfigError> {
        let kind = AdapterKind::lookup(name)?;
        let options = to_settings(options)?;
        Ok(self.declare(name, Component::Adapter(kind), options))
    }

    /// Declares an already constructed store as the terminal store.
    pub fn adapter_instance(&mut self, store: BoxStore) -> &mut Self {
        let name = store.label().as_str().to_owned();
        self.declare(name, Component::Instance(store), Settings::new())
    }

    /// Declares a two-tier [`Cache`] as the terminal store.
    ///
    /// `configure` fills both slots of the [`CacheBlock`]; nested builders
    /// inherit this builder's options merged with `options`.
    pub fn cache<F>(
        &mut self,
        options: serde_json::Value,
        configure: F,
    ) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut CacheBlock) -> Result<(), ConfigError>,
    {
        let options = to_settings(options)?;
        let mut block = CacheBlock::new(merge(&self.options, &options));
        configure(&mut block)?;
        let (cache, backend) = block.finish()?;
        Ok(self.declare("Cache", Component::Cache { cache, backend }, options))
    }

    /// Names of the declared components, outermost first.
    pub fn components(&self) -> Vec<&str> {
        self.declarations
            .iter()
            .map(|declaration| declaration.name.as_str())
            .collect()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let Some(last) = self.declarations.last() else {
            return Err(ConfigError::NoDeclarations);
        };
        if let Some(position) = self
            .declarations
            .iter()
            .position(|declaration| declaration.component.is_terminal())
        {
            if let Some(next) = self.declarations.get(position + 1) {
                return Err(ConfigError::AdapterNotLast {
                    adapter: self.declarations[position].name.clone(),
                    next: next.name.clone(),
                });
            }
        }
        if !last.component.is_terminal() {
            return Err(ConfigError::MissingAdapter(last.name.clone()));
        }
        Ok(())
    }

    /// Builds the stack, innermost declaration first.
    pub async fn build(self) -> Result<BoxStore, ConfigError> {
        self.assemble(|layer| layer).await
    }

    /// Builds the stack and returns every layer, outermost first.
    ///
    /// The first layer is the composed store [`build`](Self::build) would
    /// return and the last one is the adapter. Inner layers are shared with
    /// the layer wrapping them, so calls made through an inner layer skip
    /// the proxies above it.
    pub async fn build_layers(self) -> Result<Vec<Arc<dyn Store>>, ConfigError> {
        let mut layers: Vec<Arc<dyn Store>> = Vec::new();
        self.assemble(|layer| {
            let layer: Arc<dyn Store> = Arc::from(layer);
            layers.push(layer.clone());
            Box::new(layer)
        })
        .await?;
        layers.reverse();
        Ok(layers)
    }

    async fn assemble<F>(self, mut on_layer: F) -> Result<BoxStore, ConfigError>
    where
        F: FnMut(BoxStore) -> BoxStore + Send,
    {
        self.validate()?;
        let components = self
            .components()
            .into_iter()
            .map(str::to_owned)
            .collect::<Vec<_>>();
        let Builder {
            options,
            mut declarations,
        } = self;

        let Some(terminal) = declarations.pop() else {
            return Err(ConfigError::NoDeclarations);
        };
        let settings = merge(&options, &terminal.options);
        let store = match terminal.component {
            Component::Adapter(kind) => kind.open(&settings).await?,
            Component::Instance(store) => store,
            Component::Cache { cache, backend } => {
                let cache = cache.build().await?;
                let backend = match backend.build().await {
                    Ok(backend) => backend,
                    Err(error) => {
                        if let Err(close) = cache.close().await {
                            tracing::warn!(error = %close, "failed to close cache store after backend build error");
                        }
                        return Err(error);
                    }
                };
                Box::new(Cache::new(cache, backend))
            }
            Component::Proxy(_) | Component::CustomProxy(_) => {
                return Err(ConfigError::MissingAdapter(terminal.name));
            }
        };
        let mut store = on_layer(store);

        for declaration in declarations.into_iter().rev() {
            let settings = merge(&options, &declaration.options);
            store = match declaration.component {
                Component::Proxy(kind) => kind.wrap(store, &settings)?,
                Component::CustomProxy(factory) => factory(store, &settings)?,
                _ => {
                    return Err(ConfigError::AdapterNotLast {
                        adapter: declaration.name,
                        next: components.last().cloned().unwrap_or_default(),
                    });
                }
            };
            store = on_layer(store);
        }

        tracing::debug!(components = ?components, "built store stack");
        Ok(store)
    }
}

enum Slot {
    Store(BoxStore),
    Stack(Builder),
}

impl Slot {
    fn build(self) -> BuildFuture {
        Box::pin(async move {
            match self {
                Slot::Store(store) => Ok(store),
                Slot::Stack(builder) => builder.build().await,
            }
        })
    }
}

/// Configuration block of a [`Builder::cache`] declaration.
///
/// Each slot is filled exactly once, either with a ready store or with a
/// nested stack declared on a fresh [`Builder`].
pub struct CacheBlock {
    options: Settings,
    cache: Option<Slot>,
    backend: Option<Slot>,
}

impl CacheBlock {
    fn new(options: Settings) -> Self {
        Self {
            options,
            cache: None,
            backend: None,
        }
    }

    fn fill(slot: &mut Option<Slot>, name: &'static str, value: Slot) -> Result<(), ConfigError> {
        if slot.is_some() {
            return Err(ConfigError::SlotAlreadySet(name));
        }
        *slot = Some(value);
        Ok(())
    }

    fn nested<F>(&self, configure: F) -> Result<Slot, ConfigError>
    where
        F: FnOnce(&mut Builder) -> Result<(), ConfigError>,
    {
        let mut builder = Builder::with_settings(self.options.clone());
        configure(&mut builder)?;
        Ok(Slot::Stack(builder))
    }

    /// Uses `store` as the fast layer.
    pub fn cache(&mut self, store: BoxStore) -> Result<&mut Self, ConfigError> {
        Self::fill(&mut self.cache, "cache", Slot::Store(store))?;
        Ok(self)
    }

    /// Declares the fast layer as a nested stack.
    pub fn cache_with<F>(&mut self, configure: F) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut Builder) -> Result<(), ConfigError>,
    {
        if self.cache.is_some() {
            return Err(ConfigError::SlotAlreadySet("cache"));
        }
        let slot = self.nested(configure)?;
        Self::fill(&mut self.cache, "cache", slot)?;
        Ok(self)
    }

    /// Uses `store` as the authoritative layer.
    pub fn backend(&mut self, store: BoxStore) -> Result<&mut Self, ConfigError> {
        Self::fill(&mut self.backend, "backend", Slot::Store(store))?;
        Ok(self)
    }

    /// Declares the authoritative layer as a nested stack.
    pub fn backend_with<F>(&mut self, configure: F) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut Builder) -> Result<(), ConfigError>,
    {
        if self.backend.is_some() {
            return Err(ConfigError::SlotAlreadySet("backend"));
        }
        let slot = self.nested(configure)?;
        Self::fill(&mut self.backend, "backend", slot)?;
        Ok(self)
    }

    fn finish(self) -> Result<(Slot, Slot), ConfigError> {
        let cache = self.cache.ok_or(ConfigError::MissingSlot("cache"))?;
        let backend = self.backend.ok_or(ConfigError::MissingSlot("backend"))?;
        Ok((cache, backend))
    }
}

/// Builds a stack declared by `configure` on an option-less [`Builder`].
///
/// ```ignore
/// let store = stowage::build(|b| {
///     b.layer("Expires", json!({}))?.adapter("Memory", json!({}))?;
///     Ok(())
/// })
/// .await?;
/// ```
pub async fn build<F>(configure: F) -> Result<BoxStore, ConfigError>
where
    F: FnOnce(&mut Builder) -> Result<(), ConfigError>,
{
    build_with(serde_json::Value::Null, configure).await
}

/// Like [`build`], with base options shared by every declaration.
pub async fn build_with<F>(options: serde_json::Value, configure: F) -> Result<BoxStore, ConfigError>
where
    F: FnOnce(&mut Builder) -> Result<(), ConfigError>,
{
    let mut builder = Builder::new(options)?;
    configure(&mut builder)?;
    builder.build().await
}
