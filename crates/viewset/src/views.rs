//! The render adapter.
//!
//! [`Views`] owns the configuration and the currently published
//! [`TemplateRegistry`], and turns `(name, data)` pairs into
//! [`Renderable`]s for the host framework.
//!
//! # Lifecycle
//!
//! | State | Meaning |
//! |-------|---------|
//! | [`State::Uncompiled`] | Configured, nothing built yet |
//! | [`State::Compiled`] | A registry has been published |
//!
//! In [`Mode::Production`] the registry is built once by [`Views::init`] and
//! reused. In [`Mode::Development`] every [`Views::instance`] call rebuilds it
//! from disk first, so template edits show up on the next request.
//!
//! # Publishing
//!
//! A rebuild compiles into a fresh registry and only then swaps the shared
//! `Arc` under a write lock. Readers holding the previous registry keep using
//! it; nobody ever sees a half-built one. A failed rebuild publishes nothing.
//!
//! Every build takes a generation number when it starts. When two
//! development rebuilds overlap, a build that finishes after a newer one has
//! been published is dropped, so an older disk snapshot never replaces a
//! newer one.
//!
//! # Example
//!
//! ```rust,no_run
//! use serde_json::json;
//! use viewset::{Mode, RenderConfig, Views};
//!
//! let views = Views::new(RenderConfig::new("app/views"))
//!     .with_mode(Mode::Production)
//!     .init()?;
//!
//! let html = views.instance("users/show", json!({ "name": "Ada" })).render()?;
//! # Ok::<(), viewset::ViewError>(())
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use minijinja::Value;
use serde::Serialize;

use crate::config::{Mode, RenderConfig};
use crate::error::ViewError;
use crate::functions::FunctionTable;
use crate::registry::TemplateRegistry;
use crate::renderable::Renderable;

/// Whether a registry has been published yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Uncompiled,
    Compiled,
}

/// Compiles templates and hands out [`Renderable`]s.
///
/// `Views` is `Send + Sync`; share it across handlers behind an `Arc`.
#[derive(Debug)]
pub struct Views {
    config: RenderConfig,
    functions: FunctionTable,
    mode: Mode,
    next_generation: AtomicU64,
    current: RwLock<Published>,
}

/// The registry readers see, tagged with the build that produced it.
#[derive(Debug)]
struct Published {
    generation: u64,
    registry: Arc<TemplateRegistry>,
}

impl Views {
    /// Creates an uncompiled adapter.
    ///
    /// The mode is taken from the environment (see [`Mode::from_env`]).
    pub fn new(config: RenderConfig) -> Self {
        let empty = TemplateRegistry::empty(config.templates_dir.clone());
        Self {
            config,
            functions: FunctionTable::new(),
            mode: Mode::from_env(),
            next_generation: AtomicU64::new(1),
            current: RwLock::new(Published {
                generation: 0,
                registry: Arc::new(empty),
            }),
        }
    }

    /// Sets the function table installed into every template.
    pub fn with_functions(mut self, functions: FunctionTable) -> Self {
        self.functions = functions;
        self
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Builds and publishes the registry.
    ///
    /// # Errors
    ///
    /// Any walk, read, or parse failure. The adapter stays uncompiled.
    pub fn init(self) -> Result<Self, ViewError> {
        tracing::debug!(mode = ?self.mode, "initializing views");
        self.compile()?;
        Ok(self)
    }

    /// Builds a fresh registry from disk and publishes it.
    ///
    /// Returns the registry published afterwards: the new one, or a newer
    /// one if an overlapping build started later and finished first.
    pub fn compile(&self) -> Result<Arc<TemplateRegistry>, ViewError> {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
        let registry = TemplateRegistry::build(&self.config, &self.functions)?;
        Ok(self.publish(generation, Arc::new(registry)))
    }

    fn publish(&self, generation: u64, registry: Arc<TemplateRegistry>) -> Arc<TemplateRegistry> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        if generation > current.generation {
            *current = Published {
                generation,
                registry,
            };
        } else {
            tracing::debug!(
                generation,
                published = current.generation,
                "dropping stale template build"
            );
        }
        Arc::clone(&current.registry)
    }

    /// Pairs the template `name` with `data`.
    ///
    /// In development mode the registry is rebuilt first; if that fails the
    /// error is logged and the previously published registry is used.
    ///
    /// Lookup never fails. An unknown `name` yields a renderable whose
    /// [`render`](Renderable::render) returns [`ViewError::TemplateNotFound`].
    pub fn instance<T: Serialize>(&self, name: &str, data: T) -> Renderable {
        let registry = if self.mode.is_development() {
            self.compile().unwrap_or_else(|err| {
                tracing::error!(error = %err, "template rebuild failed, keeping previous registry");
                self.registry()
            })
        } else {
            self.registry()
        };

        self.bind(registry, name, data)
    }

    /// Like [`instance`](Self::instance), but a failed development rebuild is
    /// returned instead of logged.
    pub fn try_instance<T: Serialize>(&self, name: &str, data: T) -> Result<Renderable, ViewError> {
        let registry = if self.mode.is_development() {
            self.compile()?
        } else {
            self.registry()
        };

        Ok(self.bind(registry, name, data))
    }

    /// Like [`instance`](Self::instance), wrapped in the configured layout.
    pub fn instance_in_layout<T: Serialize>(&self, name: &str, data: T) -> Renderable {
        self.instance(name, data).with_layout(self.config.layout.clone())
    }

    /// The currently published registry.
    pub fn registry(&self) -> Arc<TemplateRegistry> {
        let current = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&current.registry)
    }

    pub fn state(&self) -> State {
        if self.registry().is_built() {
            State::Compiled
        } else {
            State::Uncompiled
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn functions(&self) -> &FunctionTable {
        &self.functions
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn bind<T: Serialize>(&self, registry: Arc<TemplateRegistry>, name: &str, data: T) -> Renderable {
        if self.config.debug && !registry.contains(name) {
            tracing::debug!(name, "instance requested for unknown template");
        }
        Renderable::new(registry, name, Value::from_serialize(&data))
    }
}
