//! Target URL construction.
//!
//! # Design Decisions
//! - Exactly one slash is trimmed on each side of the join
//! - The query string is appended verbatim, never re-encoded

/// Strip the gateway's mount prefix from an inbound path.
///
/// Paths outside the mount are returned unchanged.
pub fn strip_mount_prefix<'a>(path: &'a str, mount_path: &str) -> &'a str {
    path.strip_prefix(mount_path).unwrap_or(path)
}

/// Join `base`, `suffix` and `raw_query` into the backend URL.
pub fn resolve_target_url(base: &str, suffix: &str, raw_query: &str) -> String {
    let base = base.strip_suffix('/').unwrap_or(base);
    let suffix = suffix.strip_prefix('/').unwrap_or(suffix);

    let mut url = if suffix.is_empty() {
        base.to_string()
    } else {
        format!("{base}/{suffix}")
    };

    if !raw_query.is_empty() {
        url.push('?');
        url.push_str(raw_query);
    }
    url
}
