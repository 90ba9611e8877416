//! # viewset - compiled HTML view registry
//!
//! `viewset` walks a directory of HTML templates, compiles every file whose
//! extension is configured into a single named registry, and hands out
//! [`Renderable`]s that pair a template with data for a web framework to
//! execute.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use serde::Serialize;
//! use viewset::{FunctionTable, Mode, RenderConfig, Views};
//!
//! #[derive(Serialize)]
//! struct User {
//!     name: String,
//! }
//!
//! let views = Views::new(RenderConfig::new("app/views").with_extensions([".html"]))
//!     .with_functions(FunctionTable::new())
//!     .with_mode(Mode::Production)
//!     .init()?;
//!
//! // app/views/users/show.html
//! let page = views.instance("users/show", User { name: "Ada".into() });
//! let html = page.render()?;
//! # Ok::<(), viewset::ViewError>(())
//! ```
//!
//! ## Template Names
//!
//! A template's name is its path under the root, without the extension and
//! with `/` separators: `app/views/partials/nav.html` is `"partials/nav"`.
//! Extensions are matched against the whole dot-suffix of the relative path,
//! so `card.tpl.html` needs `.tpl.html` configured, not `.html`, and files
//! under a dotted directory such as `v1.2/` never match. Files with other
//! extensions are ignored, which lets images and stylesheets live next to
//! templates.
//!
//! ## Failure Model
//!
//! Building is all-or-nothing: the first unreadable entry or template syntax
//! error fails [`Views::init`] and nothing is published. Looking up an
//! unknown name is not an error; the failure shows up when the returned
//! [`Renderable`] is rendered.
//!
//! ## Key Types
//!
//! - [`Views`]: the adapter; builds, publishes, and looks up
//! - [`TemplateRegistry`]: an immutable set of compiled templates
//! - [`Renderable`]: a template bound to data
//! - [`RenderConfig`] and [`Mode`]: configuration and lifecycle policy
//! - [`FunctionTable`]: helper functions shared by every template
//!
//! ## Features
//!
//! - `axum`: implements `IntoResponse` for [`Renderable`]

pub mod config;
pub mod error;
pub mod functions;
pub mod registry;
pub mod renderable;
pub mod views;
pub mod walk;

pub use config::{
    Mode, RenderConfig, DEFAULT_EXTENSIONS, DEFAULT_LAYOUT, DEFAULT_TEMPLATES_DIR, MODE_ENV_VAR,
};
pub use error::ViewError;
pub use functions::{FunctionTable, TemplateFn};
pub use registry::TemplateRegistry;
pub use renderable::{Renderable, CONTENT_TYPE_HTML};
pub use views::{State, Views};
pub use walk::{template_extension, template_name, walk_template_dir, TemplateFile};

// Value and Error types used by FunctionTable entries.
pub use minijinja;
