//! Dispatcher utilities
//!
//! URL construction, query encoding, attribute whitelisting and auth headers.

use std::collections::BTreeMap;

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::{Map, Value};

/// Query parameters passed through to the API unchanged
pub type Filters = BTreeMap<String, String>;

/// Build the URL of a collection, object, or object sub-resource.
///
/// The `/{api_root}/{namespace}` prefix is only emitted for a non-empty
/// namespace. `id` and `extra` are appended when present. Caller-supplied
/// segments are percent-encoded so they cannot add path or query parts.
pub fn resource_url(
    api_server: &str,
    namespace: Option<&str>,
    api_root: &str,
    collection: &str,
    id: Option<&str>,
    extra: Option<&str>,
) -> String {
    let mut url = api_server.trim_end_matches('/').to_string();

    if let Some(ns) = namespace.filter(|ns| !ns.is_empty()) {
        url.push('/');
        url.push_str(api_root);
        url.push('/');
        url.push_str(&urlencoding::encode(ns));
    }

    url.push('/');
    url.push_str(collection);

    if let Some(id) = id {
        url.push('/');
        url.push_str(&urlencoding::encode(id));
    }

    if let Some(extra) = extra.filter(|e| !e.is_empty()) {
        url.push('/');
        url.push_str(&urlencoding::encode(extra));
    }

    url
}

/// Percent-encode filters as a query string (no leading `?`)
pub fn encode_query(filters: &Filters) -> String {
    filters
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Append filters to a URL; no `?` is added when there are none
pub fn with_query(url: String, filters: &Filters) -> String {
    if filters.is_empty() {
        url
    } else {
        format!("{}?{}", url, encode_query(filters))
    }
}

/// Keep only whitelisted attributes
pub fn sanitize_attributes(attrs: &[&str], data: &Map<String, Value>) -> Map<String, Value> {
    attrs
        .iter()
        .filter_map(|attr| data.get(*attr).map(|v| (attr.to_string(), v.clone())))
        .collect()
}

/// `Authorization` header value: the token is the Basic username, password empty
pub fn basic_auth_header(token: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{}:", token)))
}

/// Random UUID used as the OAuth `state` parameter
pub fn generate_state_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
