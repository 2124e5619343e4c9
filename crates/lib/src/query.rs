//! Location search-string parsing (`?resizeId=abc&dev=true`).

/// Look up `name` in a location search string.
///
/// A leading `?` is ignored. Only `key=value` pairs with exactly one `=` are
/// considered; the first match wins. Values are percent-decoded when valid.
pub fn query_param(search: &str, name: &str) -> Option<String> {
    let search = search.strip_prefix('?').unwrap_or(search);
    search.split('&').find_map(|pair| {
        let parts: Vec<&str> = pair.split('=').collect();
        if parts.len() != 2 || parts[0] != name {
            return None;
        }
        let value = urlencoding::decode(parts[1])
            .map(|v| v.into_owned())
            .unwrap_or_else(|_| parts[1].to_string());
        Some(value)
    })
}

/// True if `name` is present with a truthy value (`true`, `1`, `yes`).
pub fn query_flag(search: &str, name: &str) -> bool {
    query_param(search, name)
        .map(|v| matches!(v.trim().to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}
