//! A template name bound to data, ready for the host to execute.
//!
//! [`Renderable`] is what [`Views::instance`](crate::Views::instance) hands
//! back. Looking up a name never fails; if the name is not registered the
//! renderable carries no template and [`Renderable::render`] returns
//! [`ViewError::TemplateNotFound`].
//!
//! # Layouts
//!
//! A renderable can be wrapped in a layout template. The inner template is
//! rendered first; the layout is then rendered with the same data plus two
//! helpers:
//!
//! - `yield()` returns the inner output (not escaped again)
//! - `current()` returns the inner template's name
//!
//! ```jinja
//! <html><body>{{ yield() }}</body></html>
//! ```

use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Arc;

use minijinja::value::ValueKind;
use minijinja::Value;

use crate::error::ViewError;
use crate::registry::TemplateRegistry;

/// Content type of rendered output.
pub const CONTENT_TYPE_HTML: &str = "text/html; charset=UTF-8";

/// A template lookup paired with its data.
#[derive(Debug, Clone)]
pub struct Renderable {
    registry: Arc<TemplateRegistry>,
    name: String,
    data: Value,
    layout: Option<String>,
}

impl Renderable {
    pub(crate) fn new(registry: Arc<TemplateRegistry>, name: impl Into<String>, data: Value) -> Self {
        Self {
            registry,
            name: name.into(),
            data,
            layout: None,
        }
    }

    /// Wraps the output in `layout`.
    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    /// The requested template name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The layout this renderable will be wrapped in, if any.
    pub fn layout(&self) -> Option<&str> {
        self.layout.as_deref()
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Whether the requested name was present in the registry.
    pub fn is_found(&self) -> bool {
        self.registry.contains(&self.name)
    }

    pub fn content_type(&self) -> &'static str {
        CONTENT_TYPE_HTML
    }

    /// Executes the template (and layout, if set).
    ///
    /// # Errors
    ///
    /// - [`ViewError::TemplateNotFound`] if the template or layout is missing
    /// - [`ViewError::Render`] if execution fails
    pub fn render(&self) -> Result<String, ViewError> {
        let inner = self.registry.render(&self.name, self.data.clone())?;

        match &self.layout {
            None => Ok(inner),
            Some(layout) => self.registry.render(layout, self.layout_context(inner)),
        }
    }

    /// Executes the template and writes the output to `w`.
    pub fn render_to<W: Write>(&self, mut w: W) -> Result<(), ViewError> {
        let output = self.render()?;
        w.write_all(output.as_bytes())?;
        Ok(())
    }

    fn layout_context(&self, inner: String) -> Value {
        let mut ctx: BTreeMap<String, Value> = BTreeMap::new();

        if self.data.kind() == ValueKind::Map {
            if let Ok(keys) = self.data.try_iter() {
                for key in keys {
                    if let (Some(k), Ok(v)) = (key.as_str(), self.data.get_item(&key)) {
                        ctx.insert(k.to_string(), v);
                    }
                }
            }
        }

        let name = self.name.clone();
        ctx.insert(
            "yield".to_string(),
            Value::from_function(move || {
                Ok::<_, minijinja::Error>(Value::from_safe_string(inner.clone()))
            }),
        );
        ctx.insert(
            "current".to_string(),
            Value::from_function(move || Ok::<_, minijinja::Error>(Value::from(name.clone()))),
        );

        Value::from(ctx)
    }
}

#[cfg(feature = "axum")]
impl axum::response::IntoResponse for Renderable {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;

        match self.render() {
            Ok(html) => axum::response::Html(html).into_response(),
            Err(err) => {
                tracing::error!(template = %self.name, error = %err, "template render failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionTable;
    use crate::walk::TemplateFile;
    use std::fs;
    use tempfile::TempDir;

    fn registry(templates: &[(&str, &str)]) -> (TempDir, Arc<TemplateRegistry>) {
        let temp = TempDir::new().unwrap();
        let mut files = Vec::new();
        for (name, body) in templates {
            let path = temp.path().join(format!("{name}.html"));
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).unwrap();
            }
            fs::write(&path, body).unwrap();
            files.push(TemplateFile::new(*name, ".html", path));
        }
        let registry =
            TemplateRegistry::from_files(temp.path(), files, &FunctionTable::new(), false).unwrap();
        (temp, Arc::new(registry))
    }

    #[test]
    fn test_render_found() {
        let (_temp, reg) = registry(&[("hello", "Hello {{ who }}")]);
        let r = Renderable::new(reg, "hello", minijinja::context! { who => "world" });

        assert!(r.is_found());
        assert_eq!(r.render().unwrap(), "Hello world");
    }

    #[test]
    fn test_missing_defers_failure_to_render() {
        let (_temp, reg) = registry(&[("hello", "Hello")]);
        let r = Renderable::new(reg, "missing", Value::UNDEFINED);

        assert!(!r.is_found());
        assert_eq!(r.name(), "missing");
        assert!(matches!(r.render(), Err(ViewError::TemplateNotFound(_))));
    }

    #[test]
    fn test_layout_yield_and_current() {
        let (_temp, reg) = registry(&[
            ("profile", "<b>{{ user }}</b>"),
            ("layouts/base", "<main data-view=\"{{ current() }}\">{{ yield() }}</main>{{ user }}"),
        ]);
        let r = Renderable::new(reg, "profile", minijinja::context! { user => "ada" })
            .with_layout("layouts/base");

        assert_eq!(r.layout(), Some("layouts/base"));
        assert_eq!(
            r.render().unwrap(),
            "<main data-view=\"profile\"><b>ada</b></main>ada"
        );
    }

    #[test]
    fn test_missing_layout_is_not_found() {
        let (_temp, reg) = registry(&[("page", "body")]);
        let r = Renderable::new(reg, "page", Value::UNDEFINED).with_layout("layouts/none");

        match r.render() {
            Err(ViewError::TemplateNotFound(name)) => assert_eq!(name, "layouts/none"),
            other => panic!("expected not found, got {other:?}"),
        }
    }

    #[test]
    fn test_layout_with_non_map_data() {
        let (_temp, reg) = registry(&[
            ("page", "inner"),
            ("layouts/base", "[{{ yield() }}|{{ current() }}]"),
        ]);
        let r = Renderable::new(reg, "page", Value::UNDEFINED).with_layout("layouts/base");

        assert_eq!(r.render().unwrap(), "[inner|page]");
    }

    #[test]
    fn test_render_to_writer() {
        let (_temp, reg) = registry(&[("hello", "Hi")]);
        let r = Renderable::new(reg, "hello", Value::UNDEFINED);

        let mut buf = Vec::new();
        r.render_to(&mut buf).unwrap();
        assert_eq!(buf, b"Hi");
        assert_eq!(r.content_type(), "text/html; charset=UTF-8");
    }

    #[cfg(feature = "axum")]
    mod axum_response {
        use super::*;
        use axum::http::{header, StatusCode};
        use axum::response::IntoResponse;

        fn content_type(response: &axum::response::Response) -> Option<&str> {
            response
                .headers()
                .get(header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
        }

        #[test]
        fn test_found_is_html_ok() {
            let (_temp, reg) = registry(&[("hello", "Hello {{ who }}")]);
            let response =
                Renderable::new(reg, "hello", minijinja::context! { who => "world" })
                    .into_response();

            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(content_type(&response), Some("text/html; charset=utf-8"));
        }

        #[test]
        fn test_missing_template_is_server_error() {
            let (_temp, reg) = registry(&[("hello", "Hello")]);
            let response = Renderable::new(reg, "missing", Value::UNDEFINED).into_response();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }

        #[test]
        fn test_missing_layout_is_server_error() {
            let (_temp, reg) = registry(&[("hello", "Hello")]);
            let response = Renderable::new(reg, "hello", Value::UNDEFINED)
                .with_layout("layouts/none")
                .into_response();

            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        }
    }
}
