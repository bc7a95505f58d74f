//! Charset name resolution.
//!
//! Servers and documents declare charsets with every spelling imaginable.
//! [`resolve_encoding`] first asks the WHATWG registry in `encoding_rs`, then a
//! fixed alias table for spellings the registry rejects. An unknown name is a
//! normal outcome and resolves to `None`; callers decode as UTF-8 in that case.

use encoding_rs::{Encoding, UTF_8};

/// Aliases the WHATWG registry does not know, keyed by their normalized form
/// (lowercase, `_` and spaces turned into `-`), mapped to a registry label.
const FALLBACK_CHARSETS: &[(&str, &str)] = &[
    ("windows1250", "windows-1250"),
    ("win1250", "windows-1250"),
    ("win-1250", "windows-1250"),
    ("cp-1250", "windows-1250"),
    ("windows1251", "windows-1251"),
    ("win1251", "windows-1251"),
    ("win-1251", "windows-1251"),
    ("cp-1251", "windows-1251"),
    ("windows1252", "windows-1252"),
    ("win1252", "windows-1252"),
    ("win-1252", "windows-1252"),
    ("cp-1252", "windows-1252"),
    ("windows1253", "windows-1253"),
    ("win1253", "windows-1253"),
    ("win-1253", "windows-1253"),
    ("cp-1253", "windows-1253"),
    ("windows1254", "windows-1254"),
    ("win1254", "windows-1254"),
    ("win-1254", "windows-1254"),
    ("cp-1254", "windows-1254"),
    ("windows1255", "windows-1255"),
    ("win1255", "windows-1255"),
    ("win-1255", "windows-1255"),
    ("cp-1255", "windows-1255"),
    ("windows1256", "windows-1256"),
    ("win1256", "windows-1256"),
    ("win-1256", "windows-1256"),
    ("cp-1256", "windows-1256"),
    ("windows1257", "windows-1257"),
    ("win1257", "windows-1257"),
    ("win-1257", "windows-1257"),
    ("cp-1257", "windows-1257"),
    ("windows1258", "windows-1258"),
    ("win1258", "windows-1258"),
    ("win-1258", "windows-1258"),
    ("cp-1258", "windows-1258"),
    ("iso-88591", "iso-8859-1"),
    ("iso8859-1-1987", "iso-8859-1"),
    ("latin-1", "iso-8859-1"),
    ("iso-88592", "iso-8859-2"),
    ("latin-2", "iso-8859-2"),
    ("iso-88593", "iso-8859-3"),
    ("latin-3", "iso-8859-3"),
    ("iso-88594", "iso-8859-4"),
    ("latin-4", "iso-8859-4"),
    ("iso-88595", "iso-8859-5"),
    ("cyrillic-iso", "iso-8859-5"),
    ("iso-88596", "iso-8859-6"),
    ("iso-88597", "iso-8859-7"),
    ("iso-88598", "iso-8859-8"),
    ("iso-88599", "iso-8859-9"),
    ("latin-5", "iso-8859-9"),
    ("iso-885913", "iso-8859-13"),
    ("latin7", "iso-8859-13"),
    ("latin-7", "iso-8859-13"),
    ("iso-885915", "iso-8859-15"),
    ("latin9", "iso-8859-15"),
    ("latin-9", "iso-8859-15"),
];

/// Resolves a charset name to an encoding.
///
/// Returns `None` for missing, empty or unknown names; never fails.
///
/// # Example
///
/// ```rust
/// use folio_core::resolve_encoding;
///
/// assert_eq!(resolve_encoding(Some("windows-1250")).map(|e| e.name()), Some("windows-1250"));
/// assert_eq!(resolve_encoding(Some("Win_1250")).map(|e| e.name()), Some("windows-1250"));
/// assert!(resolve_encoding(Some("klingon-8")).is_none());
/// assert!(resolve_encoding(None).is_none());
/// ```
pub fn resolve_encoding(name: Option<&str>) -> Option<&'static Encoding> {
    let name = name?.trim().trim_matches(['"', '\'']);
    if name.is_empty() {
        return None;
    }

    if let Some(encoding) = Encoding::for_label(name.as_bytes()) {
        return Some(encoding);
    }

    let normalized: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c == '_' || c == ' ' { '-' } else { c })
        .collect();

    FALLBACK_CHARSETS
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .and_then(|(_, label)| Encoding::for_label(label.as_bytes()))
        .or_else(|| Encoding::for_label(normalized.as_bytes()))
}

/// Decodes bytes with `encoding`, or UTF-8 when none was resolved.
///
/// A byte order mark wins over the requested encoding. Malformed sequences are
/// replaced rather than rejected.
pub fn decode_bytes(bytes: &[u8], encoding: Option<&'static Encoding>) -> String {
    let (text, _, _) = encoding.unwrap_or(UTF_8).decode(bytes);
    text.into_owned()
}

/// Pulls the `charset` parameter out of a `Content-Type` header value.
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type
        .split(';')
        .skip(1)
        .filter_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(['"', '\'']).to_string())
        })
        .find(|value| !value.is_empty())
}
