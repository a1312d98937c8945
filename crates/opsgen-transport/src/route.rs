//! Operation endpoint URLs and wire query flags

use crate::CodecError;
use std::fmt;
use url::Url;

/// Presence-only query parameters that select subscription semantics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryFlag {
    /// Answer a subscription with exactly one response
    SubscribeOnce,
    /// Stream re-evaluated query results as data changes
    Live,
}

impl QueryFlag {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueryFlag::SubscribeOnce => "wg_subscribe_once",
            QueryFlag::Live => "wg_live",
        }
    }
}

impl fmt::Display for QueryFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Build `<base>/operations/<name>[?flag&flag]`
///
/// Any path on the base URL is kept, and each `/`-separated part of the
/// operation name becomes its own path segment.
pub fn operation_url(base: &Url, operation: &str, flags: &[QueryFlag]) -> Result<Url, CodecError> {
    let mut url = base.clone();
    {
        let mut segments = url
            .path_segments_mut()
            .map_err(|_| CodecError::InvalidUrl(format!("base URL cannot carry a path: {base}")))?;
        segments.pop_if_empty().push("operations");
        segments.extend(operation.split('/').filter(|s| !s.is_empty()));
    }

    if flags.is_empty() {
        url.set_query(None);
    } else {
        let query: Vec<&str> = flags.iter().map(QueryFlag::as_str).collect();
        url.set_query(Some(&query.join("&")));
    }
    url.set_fragment(None);
    Ok(url)
}
