use std::borrow::Cow;

const HTTP: &str = "http://";
const HTTPS: &str = "https://";

/// Makes sure `url` carries an explicit `http://` or `https://` scheme.
///
/// Anything else, including an empty string or another scheme, gets
/// `http://` prepended. The prefix match is case-sensitive.
///
/// ```
/// use snaplink_core::ensure_scheme;
///
/// assert_eq!(ensure_scheme("example.com/page"), "http://example.com/page");
/// assert_eq!(ensure_scheme("https://example.com"), "https://example.com");
/// ```
pub fn ensure_scheme(url: &str) -> Cow<'_, str> {
    if url.starts_with(HTTP) || url.starts_with(HTTPS) {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("{HTTP}{url}"))
    }
}
