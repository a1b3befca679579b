//! Shared JSON Pointer helpers (RFC 6901).
//!
//! Paths built here address nodes of a `serde_json::Value` directly through
//! [`Value::pointer`](serde_json::Value::pointer) / `pointer_mut`, so the
//! document root is the empty string rather than `#`.

use std::borrow::Cow;

/// Escape a single path segment per RFC 6901.
///
/// - `~` → `~0`
/// - `/` → `~1`
///
/// Returns `Cow::Borrowed` when no escaping is needed (the common case).
pub fn escape_pointer_segment(segment: &str) -> Cow<'_, str> {
    if segment.contains('~') || segment.contains('/') {
        Cow::Owned(segment.replace('~', "~0").replace('/', "~1"))
    } else {
        Cow::Borrowed(segment)
    }
}

/// Build a JSON Pointer by appending escaped segments to a parent pointer.
///
/// # Example
/// ```
/// use schemagen_core::build_path;
/// assert_eq!(build_path("", &["properties", "a/b"]), "/properties/a~1b");
/// assert_eq!(build_path("/$defs/Foo", &["items"]), "/$defs/Foo/items");
/// ```
pub fn build_path(parent: &str, segments: &[&str]) -> String {
    let mut path = parent.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&escape_pointer_segment(segment));
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_escape_no_special() {
        let result = escape_pointer_segment("foo");
        assert!(matches!(result, Cow::Borrowed(_)));
        assert_eq!(result, "foo");
    }

    #[test]
    fn test_escape_both() {
        assert_eq!(escape_pointer_segment("a/b~c"), "a~1b~0c");
    }

    #[test]
    fn test_build_path_root() {
        assert_eq!(build_path("", &[]), "");
    }

    #[test]
    fn test_build_path_resolves_with_pointer() {
        let doc = json!({
            "properties": { "a/b": { "items": { "type": "string" } } }
        });
        let path = build_path("", &["properties", "a/b", "items"]);
        assert_eq!(doc.pointer(&path), Some(&json!({ "type": "string" })));
    }
}
