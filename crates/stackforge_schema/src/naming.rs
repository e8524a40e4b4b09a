//! Naming conventions shared by every renderer.
//!
//! All transforms are total and idempotent: applying a transform to its own
//! output returns the output unchanged. Renderers rely on this when a value
//! may already have been converted upstream.

/// Convert to kebab-case: lowercase, runs of non-alphanumerics collapse to a
/// single `-`, no leading or trailing `-`.
pub fn kebab_case(input: &str) -> String {
    separator_case(input, '-')
}

/// Convert to snake_case with the same collapsing rules as [`kebab_case`].
pub fn snake_case(input: &str) -> String {
    separator_case(input, '_')
}

/// Convert to SCREAMING_SNAKE_CASE.
pub fn screaming_snake_case(input: &str) -> String {
    snake_case(input).to_uppercase()
}

/// Convert to PascalCase: split on `-`, `_` and whitespace, capitalize the
/// first letter of each segment.
pub fn pascal_case(input: &str) -> String {
    input
        .split(|c: char| c == '-' || c == '_' || c.is_whitespace())
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                None => String::new(),
                // Tail is kept as-is so the transform is idempotent.
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

/// Strip every character outside `[a-zA-Z0-9-_]`.
pub fn sanitize(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

fn separator_case(input: &str, separator: char) -> String {
    let lower = input.to_lowercase();
    let mut out = String::with_capacity(lower.len());
    let mut pending_separator = false;

    for c in lower.chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_separator && !out.is_empty() {
                out.push(separator);
            }
            pending_separator = false;
            out.push(c);
        } else {
            pending_separator = true;
        }
    }

    out
}
