//! Optional percent-encoding helpers, behind the `percent-encode` feature.
//! [`Instance::as_string`](crate::instance::Instance::as_string) never
//! percent-encodes on its own (callers may already have plain atoms destined
//! for a header or a non-URI context); encode explicitly with [`encode`]
//! when building an actual URI by hand instead of via
//! [`Instance::make_uri`](crate::instance::Instance::make_uri).

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Leaves `-_.~` unescaped in addition to alphanumerics, matching the
/// `encodeURIComponent` convention most query-string consumers expect.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub fn encode(atom: &str) -> String {
    utf8_percent_encode(atom, QUERY_COMPONENT).to_string()
}
