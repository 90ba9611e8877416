//! The shared function table.
//!
//! Every template in a registry sees the same set of helper functions. Each
//! entry is registered twice with the engine: as a function
//! (`{{ shout(name) }}`) and as a filter (`{{ name | shout }}`), where the
//! piped value becomes the first argument.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use minijinja::value::Rest;
use minijinja::{Environment, Error, Value};

/// A callable available to templates.
pub type TemplateFn = dyn Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static;

/// Named helper functions shared by every template.
///
/// Cloning is cheap; entries are reference counted.
///
/// ```rust
/// use viewset::FunctionTable;
/// use minijinja::Value;
///
/// let functions = FunctionTable::new()
///     .add("shout", |args| {
///         let text = args.first().and_then(|v| v.as_str()).unwrap_or_default();
///         Ok(Value::from(text.to_uppercase()))
///     });
///
/// assert!(functions.contains("shout"));
/// ```
#[derive(Clone, Default)]
pub struct FunctionTable {
    entries: BTreeMap<String, Arc<TemplateFn>>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a function, replacing any previous entry with the same name.
    pub fn add<F>(mut self, name: impl Into<String>, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.insert(name, f);
        self
    }

    pub fn insert<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    {
        self.entries.insert(name.into(), Arc::new(f));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(|s| s.as_str())
    }

    /// Registers every entry with `env` as both a function and a filter.
    pub(crate) fn install(&self, env: &mut Environment<'static>) {
        for (name, f) in &self.entries {
            let call = Arc::clone(f);
            env.add_function(name.clone(), move |args: Rest<Value>| call(&args.0));

            let call = Arc::clone(f);
            env.add_filter(name.clone(), move |value: Value, rest: Rest<Value>| {
                let mut args = Vec::with_capacity(rest.0.len() + 1);
                args.push(value);
                args.extend(rest.0);
                call(&args)
            });
        }
    }
}

impl fmt::Debug for FunctionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionTable")
            .field("names", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shout() -> FunctionTable {
        FunctionTable::new().add("shout", |args| {
            let text = args.first().and_then(|v| v.as_str()).unwrap_or_default();
            Ok(Value::from(text.to_uppercase()))
        })
    }

    #[test]
    fn test_add_and_names() {
        let table = shout().add("twice", |args| Ok(args.first().cloned().unwrap_or_default()));
        assert_eq!(table.len(), 2);
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["shout", "twice"]);
    }

    #[test]
    fn test_installed_as_function() {
        let mut env = Environment::new();
        shout().install(&mut env);
        let out = env.render_str("{{ shout(name) }}", minijinja::context! { name => "hi" });
        assert_eq!(out.unwrap(), "HI");
    }

    #[test]
    fn test_installed_as_filter() {
        let mut env = Environment::new();
        shout().install(&mut env);
        let out = env.render_str("{{ name | shout }}", minijinja::context! { name => "hi" });
        assert_eq!(out.unwrap(), "HI");
    }

    #[test]
    fn test_filter_receives_extra_args() {
        let table = FunctionTable::new().add("join2", |args| {
            let parts: Vec<String> = args.iter().map(|v| v.to_string()).collect();
            Ok(Value::from(parts.join("-")))
        });
        let mut env = Environment::new();
        table.install(&mut env);
        let out = env.render_str("{{ 'a' | join2('b', 'c') }}", ());
        assert_eq!(out.unwrap(), "a-b-c");
    }

    #[test]
    fn test_debug_lists_names() {
        assert!(format!("{:?}", shout()).contains("shout"));
    }
}
