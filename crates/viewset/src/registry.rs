//! Compiled template registry.
//!
//! A [`TemplateRegistry`] is built in one pass from a template directory:
//!
//! 1. Walk: collect every file whose full dot-suffix is a configured extension
//! 2. Read: load each file's content
//! 3. Compile: parse it under its derived name with the shared
//!    [`FunctionTable`] installed
//!
//! Any failure in any step fails the whole build. A registry is never handed
//! out half-populated, so callers either get every template or an error.
//!
//! Templates share one namespace and can reference each other by name:
//!
//! ```jinja
//! {% include "partials/nav" %}
//! {% extends "layouts/base" %}
//! ```
//!
//! Registries are immutable once built. To pick up changes on disk, build a
//! new one (see [`Views::compile`](crate::Views::compile)).

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

use minijinja::{AutoEscape, Environment, Template, Value};

use crate::config::RenderConfig;
use crate::error::ViewError;
use crate::functions::FunctionTable;
use crate::walk::{walk_template_dir, TemplateFile};

/// Body of the root template that anchors the namespace.
const ROOT_TEMPLATE_BODY: &str = "{# viewset root #}";

/// Named, compiled templates from one directory tree.
pub struct TemplateRegistry {
    env: Environment<'static>,
    names: BTreeSet<String>,
    root: PathBuf,
    built: bool,
}

impl TemplateRegistry {
    /// Creates the registry used before the first build.
    pub(crate) fn empty(root: impl Into<PathBuf>) -> Self {
        Self {
            env: Environment::new(),
            names: BTreeSet::new(),
            root: root.into(),
            built: false,
        }
    }

    /// Walks `config.templates_dir` and compiles every matching file.
    ///
    /// # Errors
    ///
    /// - [`ViewError::Walk`] if the directory cannot be traversed
    /// - [`ViewError::Read`] if a matched file cannot be read
    /// - [`ViewError::Parse`] if any template fails to compile
    pub fn build(config: &RenderConfig, functions: &FunctionTable) -> Result<Self, ViewError> {
        let root = config.templates_dir.as_path();
        tracing::debug!(root = %root.display(), "compiling templates");

        let files = walk_template_dir(root, &config.extensions)?;
        let registry = Self::from_files(root, files, functions, config.debug)?;

        tracing::info!(
            root = %root.display(),
            templates = registry.len(),
            "compiled templates"
        );
        Ok(registry)
    }

    /// Compiles already-discovered files.
    ///
    /// Files are registered in order; when two files derive the same name the
    /// later one replaces the earlier.
    pub fn from_files(
        root: impl AsRef<Path>,
        files: Vec<TemplateFile>,
        functions: &FunctionTable,
        debug: bool,
    ) -> Result<Self, ViewError> {
        let root = root.as_ref();
        let mut env = Environment::new();
        // Names carry no extension, so escaping can't be inferred from them.
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        functions.install(&mut env);

        let root_name = root_template_name(root);
        env.add_template_owned(root_name.clone(), ROOT_TEMPLATE_BODY)
            .map_err(|source| ViewError::Parse {
                name: root_name,
                path: root.to_path_buf(),
                source,
            })?;

        let mut names = BTreeSet::new();
        for file in files {
            let source = std::fs::read_to_string(&file.path).map_err(|source| ViewError::Read {
                path: file.path.clone(),
                source,
            })?;

            if debug {
                tracing::debug!(name = %file.name, path = %file.path.display(), "loaded template");
            } else {
                tracing::trace!(name = %file.name, path = %file.path.display(), "loaded template");
            }

            // Bomb out on the first bad template; no silent partial starts.
            env.add_template_owned(file.name.clone(), source)
                .map_err(|source| ViewError::Parse {
                    name: file.name.clone(),
                    path: file.path.clone(),
                    source,
                })?;
            names.insert(file.name);
        }

        Ok(Self {
            env,
            names,
            root: root.to_path_buf(),
            built: true,
        })
    }

    /// Looks up a compiled template by name.
    pub fn get(&self, name: &str) -> Option<Template<'_, '_>> {
        if !self.names.contains(name) {
            return None;
        }
        self.env.get_template(name).ok()
    }

    /// Returns the body a template was compiled from.
    pub fn source(&self, name: &str) -> Option<String> {
        self.get(name).map(|t| t.source().to_string())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Returns template names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// The directory this registry was built from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// False only for the placeholder registry held before the first build.
    pub fn is_built(&self) -> bool {
        self.built
    }

    /// Renders `name` with `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::TemplateNotFound`] if `name` is not registered and
    /// [`ViewError::Render`] if execution fails.
    pub fn render(&self, name: &str, ctx: Value) -> Result<String, ViewError> {
        let template = self
            .get(name)
            .ok_or_else(|| ViewError::TemplateNotFound(name.to_string()))?;

        template.render(ctx).map_err(|source| ViewError::Render {
            name: name.to_string(),
            source,
        })
    }
}

impl fmt::Debug for TemplateRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateRegistry")
            .field("root", &self.root)
            .field("names", &self.names)
            .field("built", &self.built)
            .finish()
    }
}

fn root_template_name(root: &Path) -> String {
    format!("<root:{}>", root.display())
}
