//! Legal Values Table: the partial whitelist consulted on every write.
//!
//! The table mirrors the nested profile shape.  A key-path with an entry must
//! receive one of the listed strings; a key-path without an entry accepts any
//! value.  Validation is opt-in per path, not an exhaustive schema.

use serde_json::Value;

/// One node of the table: either an allow-list or a nested sub-table.
#[derive(Debug, Clone, Copy)]
pub enum LegalValues {
    /// The value must be one of these strings.
    OneOf(&'static [&'static str]),
    /// Further entries keyed by the next path segment.
    Nested(&'static [(&'static str, LegalValues)]),
}

static LEGAL_VALUES: [(&str, LegalValues); 3] = [
    (
        "theme",
        LegalValues::OneOf(&["system", "reverse-system", "light", "dark"]),
    ),
    (
        "style",
        LegalValues::OneOf(&["default", "minimal", "standalone", "electron", "puter"]),
    ),
    (
        "appOptions",
        LegalValues::Nested(&[
            ("ioLayout", LegalValues::OneOf(&["row", "column", "tabbed"])),
            (
                "assistantLayout",
                LegalValues::OneOf(&["side", "bottom", "hidden"]),
            ),
        ]),
    ),
];

/// Returns the allow-list registered for `key_path`, if any.
///
/// Paths that stop at a nested node (e.g. `appOptions`) or run past an
/// allow-list (e.g. `theme.x`) have no entry.
pub fn legal_values(key_path: &str) -> Option<&'static [&'static str]> {
    let mut table: &'static [(&'static str, LegalValues)] = &LEGAL_VALUES;
    let mut segments = key_path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let (_, node) = table.iter().find(|(name, _)| *name == segment)?;
        match (node, segments.peek()) {
            (LegalValues::OneOf(allowed), None) => return Some(*allowed),
            (LegalValues::Nested(inner), Some(_)) => table = *inner,
            _ => return None,
        }
    }
    None
}

/// Returns `true` if `value` may be written at `key_path`.
pub fn is_legal(key_path: &str, value: &Value) -> bool {
    match legal_values(key_path) {
        None => true,
        Some(allowed) => value
            .as_str()
            .map(|s| allowed.contains(&s))
            .unwrap_or(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_theme_allow_list() {
        assert_eq!(
            legal_values("theme"),
            Some(&["system", "reverse-system", "light", "dark"][..])
        );
    }

    #[test]
    fn test_nested_app_option_entry_is_found() {
        assert_eq!(
            legal_values("appOptions.ioLayout"),
            Some(&["row", "column", "tabbed"][..])
        );
    }

    #[test]
    fn test_paths_without_entry_have_no_allow_list() {
        assert_eq!(legal_values("styleOptions.showLogo"), None);
        assert_eq!(legal_values("appOptions.showConsole"), None);
        assert_eq!(legal_values("appOptions"), None);
        assert_eq!(legal_values("theme.dark"), None);
        assert_eq!(legal_values(""), None);
    }

    #[test]
    fn test_is_legal_rejects_values_outside_allow_list() {
        assert!(is_legal("theme", &json!("dark")));
        assert!(!is_legal("theme", &json!("sepia")));
        // Non-string values never match a string allow-list.
        assert!(!is_legal("style", &json!(true)));
    }

    #[test]
    fn test_is_legal_accepts_anything_for_unlisted_paths() {
        assert!(is_legal("styleOptions.showLogo", &json!("maybe")));
        assert!(is_legal("editor.fontSize", &json!(14)));
    }
}
