//! Minimal HTML template rendering
//!
//! Pages are embedded at compile time and rendered by literal
//! `{{placeholder}}` substitution. Values interpolated from user or
//! upstream data must be escaped first.

/// Substitute `{{key}}` placeholders in an embedded template.
pub fn render(template: &str, substitutions: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in substitutions {
        out = out.replace(&format!("{{{{{key}}}}}"), value);
    }
    out
}

/// Escape text for interpolation into HTML content or attribute values.
pub fn html_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
