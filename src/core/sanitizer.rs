//! Cleans raw entry names so they are safe to create on disk.

use regex::Regex;
use std::sync::LazyLock;

/// Parenthesized annotations such as `(generated)`, first `(` to last `)`.
static ANNOTATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(.*\)").expect("annotation pattern is valid"));

/// Characters that are not allowed in file names on common platforms.
static ILLEGAL_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"[<>:"/\\|?*]"#).expect("illegal character pattern is valid"));

/// Returns a filesystem-safe version of `name`, or an empty string when
/// nothing usable is left.
///
/// Annotations are removed first, then everything from the first `#`,
/// then surrounding whitespace. Remaining illegal characters become `_`.
/// The directory marker must already be stripped by the caller.
pub fn sanitize_name(name: &str) -> String {
    let without_annotation = ANNOTATION.replace_all(name, "");
    let without_comment = match without_annotation.find('#') {
        Some(idx) => &without_annotation[..idx],
        None => &without_annotation[..],
    };
    ILLEGAL_CHARS
        .replace_all(without_comment.trim(), "_")
        .into_owned()
}
