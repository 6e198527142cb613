/// Path utilities for validation and normalization
///
/// All functions are **pure**: given same input, always produce same output with no side effects.
use std::borrow::Cow;

pub mod hierarchy;
pub mod name;

pub use hierarchy::PathHierarchy;
pub use name::{normalize_page_path, normalize_segment_path, NameRule, NormalizedPath};

/// Validates if a request path is in canonical form
///
/// # Rules
///
/// - Must start with `/`
/// - Must not contain `//` or `\`
/// - Must not end with `/` (except root `/`)
/// - Must not be empty
///
/// # Examples
///
/// ```
/// use rhtmx_content_router::path::is_valid_path;
///
/// assert!(is_valid_path("/"));
/// assert!(is_valid_path("/blog"));
/// assert!(is_valid_path("/de-DE/blog/page-2"));
///
/// assert!(!is_valid_path(""));
/// assert!(!is_valid_path("blog"));
/// assert!(!is_valid_path("/blog/"));
/// assert!(!is_valid_path("/blog//posts"));
/// assert!(!is_valid_path("/blog\\posts"));
/// ```
pub fn is_valid_path(path: &str) -> bool {
    if path.is_empty() || !path.starts_with('/') {
        return false;
    }

    if path.contains("//") || path.contains('\\') {
        return false;
    }

    path == "/" || !path.ends_with('/')
}

/// Normalize a request path to canonical form
///
/// Returns `Cow::Borrowed` when the input is already canonical.
///
/// - Missing leading slash: `blog` → `/blog`
/// - Trailing slashes: `/blog/` → `/blog`
/// - Double slashes: `/blog//posts` → `/blog/posts`
/// - Backslashes: `\blog\posts` → `/blog/posts`
/// - Empty input: `` → `/`
///
/// # Examples
///
/// ```
/// use rhtmx_content_router::path::normalize_path;
/// use std::borrow::Cow;
///
/// assert!(matches!(normalize_path("/blog"), Cow::Borrowed("/blog")));
/// assert_eq!(normalize_path("blog/"), "/blog");
/// assert_eq!(normalize_path("//de-DE//blog"), "/de-DE/blog");
/// assert_eq!(normalize_path(""), "/");
/// ```
pub fn normalize_path(path: &str) -> Cow<'_, str> {
    if is_valid_path(path) {
        return Cow::Borrowed(path);
    }

    let normalized = path
        .replace('\\', "/")
        .split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    if normalized.is_empty() {
        Cow::Borrowed("/")
    } else {
        Cow::Owned(format!("/{}", normalized))
    }
}

/// Splits a normalized path into its non-empty segments
///
/// ```
/// use rhtmx_content_router::path::segments;
///
/// assert_eq!(segments("/blog/posts"), vec!["blog", "posts"]);
/// assert!(segments("/").is_empty());
/// ```
pub fn segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Joins segments back into a normalized path (`/` for none)
pub fn join_segments<S: AsRef<str>>(parts: &[S]) -> String {
    if parts.is_empty() {
        return "/".to_string();
    }

    parts.iter().fold(String::new(), |mut acc, part| {
        acc.push('/');
        acc.push_str(part.as_ref());
        acc
    })
}

/// Checks whether `prefix` is a segment-wise prefix of `path`
///
/// Unlike `str::starts_with`, `/blog` is not a prefix of `/blogroll`.
/// Comparison is ASCII case-insensitive.
///
/// ```
/// use rhtmx_content_router::path::is_segment_prefix;
///
/// assert!(is_segment_prefix("/blog", "/blog/hello-world"));
/// assert!(is_segment_prefix("/Blog", "/blog"));
/// assert!(!is_segment_prefix("/blog", "/blogroll"));
/// ```
pub fn is_segment_prefix(prefix: &str, path: &str) -> bool {
    let prefix_parts = segments(prefix);
    let path_parts = segments(path);

    prefix_parts.len() <= path_parts.len()
        && prefix_parts
            .iter()
            .zip(path_parts.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
}

/// Case-insensitive lookup key for a normalized path
pub(crate) fn path_key(path: &str) -> String {
    normalize_path(path).to_ascii_lowercase()
}
