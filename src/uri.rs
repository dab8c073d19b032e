//! Thin wrapper over [`url::Url`] for replacing a URI's query string with a
//! registry-serialized one, used by [`crate::instance::Instance::make_uri`].

use crate::error::Error;

/// Return a copy of `base` with its query string replaced by `query`
/// (already `name=value&...`-joined, not re-encoded).
pub fn with_query(base: &url::Url, query: &str) -> Result<url::Url, Error> {
    let mut out = base.clone();
    if query.is_empty() {
        out.set_query(None);
    } else {
        out.set_query(Some(query));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replaces_existing_query() {
        let base = url::Url::parse("https://example.com/path?old=1").unwrap();
        let replaced = with_query(&base, "new=2&new=3").unwrap();
        assert_eq!(replaced.as_str(), "https://example.com/path?new=2&new=3");
    }

    #[test]
    fn empty_query_is_dropped() {
        let base = url::Url::parse("https://example.com/path?old=1").unwrap();
        let replaced = with_query(&base, "").unwrap();
        assert_eq!(replaced.as_str(), "https://example.com/path");
    }
}
