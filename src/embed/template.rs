//! Template types for typed variable injection.

use regex::{Captures, Regex};
use std::marker::PhantomData;
use std::sync::LazyLock;

/// Trait for template variable sets
pub trait TemplateVars {
    /// Value of the `__NAME__` placeholder, `None` to leave it untouched.
    fn lookup(&self, name: &str) -> Option<String>;

    fn apply(&self, content: &str) -> String {
        substitute(content, |name| self.lookup(name))
    }
}

/// Template with typed variable injection
#[derive(Debug, Clone, Copy)]
pub struct Template<V> {
    content: &'static str,
    _marker: PhantomData<V>,
}

impl<V> Template<V> {
    pub const fn new(content: &'static str) -> Self {
        Self {
            content,
            _marker: PhantomData,
        }
    }
}

impl<V: TemplateVars> Template<V> {
    pub fn render(&self, vars: &V) -> String {
        vars.apply(self.content)
    }
}

/// Replace every `__NAME__` placeholder in one pass.
///
/// Substituted values are never scanned again, so user text containing
/// placeholder-like words is kept verbatim.
fn substitute(content: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    static RE_PLACEHOLDER: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"__([A-Z][A-Z_]*?)__").unwrap());

    RE_PLACEHOLDER
        .replace_all(content, |caps: &Captures<'_>| {
            lookup(&caps[1]).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Greeting<'a> {
        name: &'a str,
    }

    impl TemplateVars for Greeting<'_> {
        fn lookup(&self, name: &str) -> Option<String> {
            match name {
                "NAME" => Some(self.name.to_string()),
                "PLACE" => Some("world".to_string()),
                _ => None,
            }
        }
    }

    const GREETING: Template<Greeting<'static>> = Template::new("Hello __NAME__ of __PLACE__, __OTHER__");

    #[test]
    fn test_render_replaces_known_placeholders() {
        assert_eq!(
            GREETING.render(&Greeting { name: "Ana" }),
            "Hello Ana of world, __OTHER__"
        );
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let html = GREETING.render(&Greeting { name: "__PLACE__" });
        assert_eq!(html, "Hello __PLACE__ of world, __OTHER__");
    }

    #[test]
    fn test_multi_word_placeholder() {
        let out = substitute("a __HEADER_STYLE__ b", |name| {
            (name == "HEADER_STYLE").then(|| "x".to_string())
        });
        assert_eq!(out, "a x b");
    }
}
