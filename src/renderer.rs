//! Template renderer for templated files.
//! Placeholders are written as `{{ .name }}` and resolved against the flat
//! mapping of param names to values. Rendering is strict: a placeholder that
//! names an unknown param is an error.
//! Only `{{ }}` is live: block and comment tags are moved to delimiters that
//! do not occur in text files, so `{%` and `{#` are copied through as text.
use crate::error::{Error, Result};
use minijinja::syntax::SyntaxConfig;
use minijinja::{Environment, UndefinedBehavior};
use regex::Regex;

/// Trait for template rendering engines.
pub trait TemplateRenderer {
    /// Renders a template string with the given context.
    ///
    /// # Arguments
    /// * `template` - Template string to render
    /// * `context` - Context variables for rendering
    ///
    /// # Returns
    /// * `Result<String>` - Rendered template string
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String>;
}

/// MiniJinja-based template rendering engine.
pub struct MiniJinjaRenderer {
    /// MiniJinja environment instance
    env: Environment<'static>,
    /// Matches the leading dot of `{{ .name }}` style references
    dot_reference: Regex,
}

impl MiniJinjaRenderer {
    /// Creates a new renderer with strict undefined handling.
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_syntax(
            SyntaxConfig::builder()
                .block_delimiters("\u{1}%", "%\u{1}")
                .comment_delimiters("\u{1}#", "#\u{1}")
                .build()
                .expect("placeholder-only syntax is valid"),
        );
        let dot_reference = Regex::new(r"\{\{(-?)\s*\.([A-Za-z_][A-Za-z0-9_]*)")
            .expect("dot reference pattern is valid");
        Self { env, dot_reference }
    }

    /// Rewrites `{{ .name }}` into `{{ name }}`.
    fn normalize<'a>(&self, template: &'a str) -> std::borrow::Cow<'a, str> {
        self.dot_reference.replace_all(template, "{{${1} ${2}")
    }
}

impl Default for MiniJinjaRenderer {
    fn default() -> Self {
        MiniJinjaRenderer::new()
    }
}

impl TemplateRenderer for MiniJinjaRenderer {
    fn render(&self, template: &str, context: &serde_json::Value) -> Result<String> {
        let source = self.normalize(template);
        self.env
            .render_str(&source, context)
            .map_err(|e| Error::TemplateError { path: "<inline>".into(), reason: e.to_string() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_dot_references() {
        let renderer = MiniJinjaRenderer::new();
        assert_eq!(renderer.normalize("{{.name}}"), "{{ name}}");
        assert_eq!(renderer.normalize("{{ .name }}"), "{{ name }}");
        assert_eq!(renderer.normalize("{{- .name -}}"), "{{- name -}}");
        assert_eq!(renderer.normalize("{{ name }}"), "{{ name }}");
    }

    #[test]
    fn test_block_and_comment_tags_are_text() {
        let renderer = MiniJinjaRenderer::new();
        let context = serde_json::json!({ "name": "acme" });
        let out = renderer
            .render("{{ .name }} ${#args[@]} {% raw %} {# x", &context)
            .unwrap();
        assert_eq!(out, "acme ${#args[@]} {% raw %} {# x");
    }
}
