//! Address-bar input normalization.

use std::borrow::Cow;

/// Scheme prepended to input that does not already carry a web scheme.
pub const DEFAULT_SCHEME_PREFIX: &str = "https://";

const WEB_SCHEME_PREFIXES: [&str; 2] = ["http://", "https://"];

/// Check whether `input` starts with `http://` or `https://`, ignoring ASCII
/// case.
pub fn has_web_scheme(input: &str) -> bool {
    WEB_SCHEME_PREFIXES.iter().any(|prefix| {
        input
            .get(..prefix.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
    })
}

/// Turn raw address-bar text into a committable URL.
///
/// Surrounding whitespace is trimmed. Input without a web scheme gets
/// `https://` prepended; input that has one is returned with its scheme
/// untouched (case included). Nothing else is validated, so an empty input
/// becomes `https://` and malformed hosts are left for the viewport to fail
/// on. Returns the trimmed input unchanged (zero-alloc) when it already has a
/// scheme.
pub fn normalize_address(raw: &str) -> Cow<'_, str> {
    let trimmed = raw.trim();
    if has_web_scheme(trimmed) {
        Cow::Borrowed(trimmed)
    } else {
        Cow::Owned(format!("{DEFAULT_SCHEME_PREFIX}{trimmed}"))
    }
}
