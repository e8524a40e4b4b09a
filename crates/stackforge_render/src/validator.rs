//! Post-render validation.

use regex::Regex;
use tracing::debug;

use crate::engine::PLACEHOLDER_PATTERN;
use crate::files::{GeneratedFile, ValidationReport};

/// Diagnostic checks over a rendered file set. Never mutates files; always
/// run after rendering, never before.
pub struct RenderValidator {
    placeholder_pattern: Regex,
}

impl Default for RenderValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderValidator {
    /// Create a new render validator.
    pub fn new() -> Self {
        Self {
            placeholder_pattern: Regex::new(PLACEHOLDER_PATTERN).unwrap(),
        }
    }

    /// Check every file: empty content is an error, a leftover placeholder
    /// (a context field missing during render) is a warning.
    pub fn validate(&self, files: &[GeneratedFile]) -> ValidationReport {
        let mut errors = Vec::new();
        let mut warnings = Vec::new();
        let mut invalid_files = 0;

        for file in files {
            if file.content.trim().is_empty() {
                invalid_files += 1;
                errors.push(format!("Generated file '{}' is empty", file.path));
                continue;
            }

            if let Some(found) = self.placeholder_pattern.find(&file.content) {
                warnings.push(format!(
                    "Generated file '{}' contains an unresolved placeholder: {}",
                    file.path,
                    found.as_str()
                ));
            }
        }

        debug!(
            total = files.len(),
            invalid = invalid_files,
            warnings = warnings.len(),
            "Validated rendered files"
        );

        ValidationReport {
            valid: errors.is_empty(),
            total_files: files.len(),
            valid_files: files.len() - invalid_files,
            invalid_files,
            errors,
            warnings,
        }
    }
}
