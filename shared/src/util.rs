//! Small shared helpers

use chrono::Utc;

/// Current UTC time as an RFC 3339 string, for created_at/updated_at columns
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

/// Derive a URL-safe slug from a display name
///
/// Lowercases, maps runs of non-alphanumeric characters to single hyphens,
/// and trims leading/trailing hyphens. Returns "item" for names with no
/// alphanumeric content so the result is never empty.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut last_hyphen = true;
    for ch in name.chars() {
        if ch.is_alphanumeric() {
            slug.extend(ch.to_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    if slug.is_empty() {
        slug.push_str("item");
    }
    slug
}
