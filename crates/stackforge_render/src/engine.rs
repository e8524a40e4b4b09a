//! Placeholder substitution engine.

use std::collections::HashMap;

use regex::Regex;

/// Pattern matched by the engine and by the post-render validator. Dotted
/// delimiters such as Helm's `{{ .Values.x }}` are deliberately outside this
/// grammar, so emitted chart sources are never mistaken for unrendered
/// placeholders.
pub const PLACEHOLDER_PATTERN: &str = r"\{\{([a-zA-Z_][a-zA-Z0-9_]*)\}\}";

/// Template engine replacing `{{variable}}` placeholders.
pub struct TemplateEngine {
    variable_pattern: Regex,
}

impl Default for TemplateEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine {
    /// Create a new template engine.
    pub fn new() -> Self {
        Self {
            variable_pattern: Regex::new(PLACEHOLDER_PATTERN).unwrap(),
        }
    }

    /// Render a template body. Placeholders without a matching variable are
    /// left intact for the render validator to flag.
    pub fn render(&self, template: &str, variables: &HashMap<String, String>) -> String {
        self.variable_pattern
            .replace_all(template, |caps: &regex::Captures| {
                let name = &caps[1];
                variables
                    .get(name)
                    .cloned()
                    .unwrap_or_else(|| format!("{{{{{}}}}}", name))
            })
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_render_substitutes() {
        let engine = TemplateEngine::new();
        let out = engine.render(
            "name = \"{{project_name}}-{{environment}}\"",
            &vars(&[("project_name", "acme-api"), ("environment", "staging")]),
        );
        assert_eq!(out, "name = \"acme-api-staging\"");
    }

    #[test]
    fn test_missing_variable_left_intact() {
        let engine = TemplateEngine::new();
        let out = engine.render("value = {{missing}}", &vars(&[]));
        assert_eq!(out, "value = {{missing}}");
    }

    #[test]
    fn test_helm_delimiters_untouched() {
        let engine = TemplateEngine::new();
        let chart = "image: {{ .Values.image.repository }}";
        assert_eq!(engine.render(chart, &vars(&[])), chart);
    }
}
