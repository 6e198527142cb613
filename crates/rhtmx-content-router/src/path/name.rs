/// Segment-name and slug grammars
///
/// Two grammars govern configured names:
///
/// - **Segment name** (`blog`, `release_notes`, `v2-docs`): 3–70 characters,
///   ASCII letters, digits, `-` and `_`, not starting or ending with `-`/`_`.
/// - **Slug** (`hello-world`): 3–70 characters, starts and ends with an ASCII
///   letter, letters/digits/single hyphens only.
///
/// A page path such as `blog/posts/hello-world` validates every part but the
/// last as a segment name and the last as a slug.
use std::fmt;

use crate::error::{ConfigError, NameKind};

/// Minimum length of a segment name or slug
pub const MIN_NAME_LEN: usize = 3;
/// Maximum length of a segment name or slug
pub const MAX_NAME_LEN: usize = 70;

/// The grammar rule a rejected name violated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    Empty,
    EmptyPart,
    TooShort { len: usize },
    TooLong { len: usize },
    ForbiddenCharacter(char),
    ConsecutiveHyphens,
    InvalidStart(char),
    InvalidEnd(char),
}

impl fmt::Display for NameRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameRule::Empty => f.write_str("must not be empty"),
            NameRule::EmptyPart => f.write_str("contains an empty path part"),
            NameRule::TooShort { len } => {
                write!(f, "length {} is below the minimum of {}", len, MIN_NAME_LEN)
            }
            NameRule::TooLong { len } => {
                write!(f, "length {} exceeds the maximum of {}", len, MAX_NAME_LEN)
            }
            NameRule::ForbiddenCharacter(c) => write!(f, "forbidden character '{}'", c),
            NameRule::ConsecutiveHyphens => f.write_str("contains consecutive hyphens"),
            NameRule::InvalidStart(c) => write!(f, "must not start with '{}'", c),
            NameRule::InvalidEnd(c) => write!(f, "must not end with '{}'", c),
        }
    }
}

/// A validated, `/`-joined configuration path and its parts
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedPath {
    /// Joined parts without a leading slash (`blog/posts`), empty for the root
    pub full_path: String,
    /// Individual parts in order
    pub parts: Vec<String>,
}

impl NormalizedPath {
    /// The root path (no parts)
    pub fn root() -> Self {
        Self {
            full_path: String::new(),
            parts: Vec::new(),
        }
    }

    fn from_parts(parts: Vec<String>) -> Self {
        Self {
            full_path: parts.join("/"),
            parts,
        }
    }

    /// Route pattern form with a leading slash (`/blog/posts`, `/` for root)
    pub fn pattern(&self) -> String {
        format!("/{}", self.full_path)
    }

    /// Case-insensitive map key
    pub fn key(&self) -> String {
        self.full_path.to_ascii_lowercase()
    }

    /// Last part, if any
    pub fn leaf(&self) -> Option<&str> {
        self.parts.last().map(String::as_str)
    }

    /// Every proper ancestor, outermost first (`blog`, `blog/posts` for `blog/posts/x`)
    pub fn ancestors(&self) -> impl Iterator<Item = NormalizedPath> + '_ {
        (1..self.parts.len()).map(move |n| Self::from_parts(self.parts[..n].to_vec()))
    }

    pub fn is_root(&self) -> bool {
        self.parts.is_empty()
    }
}

impl fmt::Display for NormalizedPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.full_path)
    }
}

fn invalid(input: &str, kind: NameKind, rule: NameRule) -> ConfigError {
    ConfigError::InvalidName {
        input: input.to_string(),
        kind,
        rule,
    }
}

fn check_length(part: &str) -> Result<(), NameRule> {
    match part.len() {
        0 => Err(NameRule::EmptyPart),
        len if len < MIN_NAME_LEN => Err(NameRule::TooShort { len }),
        len if len > MAX_NAME_LEN => Err(NameRule::TooLong { len }),
        _ => Ok(()),
    }
}

fn segment_rule(part: &str) -> Result<(), NameRule> {
    check_length(part)?;

    if let Some(c) = part
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(NameRule::ForbiddenCharacter(c));
    }

    match (part.chars().next(), part.chars().last()) {
        (Some(c @ ('-' | '_')), _) => Err(NameRule::InvalidStart(c)),
        (_, Some(c @ ('-' | '_'))) => Err(NameRule::InvalidEnd(c)),
        _ => Ok(()),
    }
}

fn slug_rule(part: &str) -> Result<(), NameRule> {
    check_length(part)?;

    if let Some(c) = part
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-'))
    {
        return Err(NameRule::ForbiddenCharacter(c));
    }

    if part.contains("--") {
        return Err(NameRule::ConsecutiveHyphens);
    }

    match (part.chars().next(), part.chars().last()) {
        (Some(c), _) if !c.is_ascii_alphabetic() => Err(NameRule::InvalidStart(c)),
        (_, Some(c)) if !c.is_ascii_alphabetic() => Err(NameRule::InvalidEnd(c)),
        _ => Ok(()),
    }
}

/// Validates a single segment name part
///
/// ```
/// use rhtmx_content_router::path::name::validate_segment_name;
///
/// assert!(validate_segment_name("release_notes").is_ok());
/// assert!(validate_segment_name("_drafts").is_err());
/// assert!(validate_segment_name("ab").is_err());
/// ```
pub fn validate_segment_name(part: &str) -> Result<(), ConfigError> {
    segment_rule(part).map_err(|rule| invalid(part, NameKind::Segment, rule))
}

/// Validates a single slug
///
/// ```
/// use rhtmx_content_router::path::name::validate_slug;
///
/// assert!(validate_slug("hello-world").is_ok());
/// assert!(validate_slug("about_us").is_err());
/// assert!(validate_slug("top-10").is_err());
/// ```
pub fn validate_slug(part: &str) -> Result<(), ConfigError> {
    slug_rule(part).map_err(|rule| invalid(part, NameKind::Slug, rule))
}

fn split_parts(input: &str) -> Vec<&str> {
    input.trim().trim_matches('/').split('/').collect()
}

fn with_parent(parent: Option<&NormalizedPath>, parts: Vec<String>) -> NormalizedPath {
    let mut all = parent.map(|p| p.parts.clone()).unwrap_or_default();
    all.extend(parts);
    NormalizedPath::from_parts(all)
}

/// Normalizes a (possibly multi-part) segment name under an optional parent
///
/// Every `/`-delimited part is validated independently against the
/// segment-name grammar.
///
/// ```
/// use rhtmx_content_router::path::{normalize_segment_path, NormalizedPath};
///
/// let blog = normalize_segment_path("blog", None).unwrap();
/// let posts = normalize_segment_path("/posts/archive/", Some(&blog)).unwrap();
/// assert_eq!(posts.full_path, "blog/posts/archive");
/// assert_eq!(posts.parts, vec!["blog", "posts", "archive"]);
/// ```
pub fn normalize_segment_path(
    name: &str,
    parent: Option<&NormalizedPath>,
) -> Result<NormalizedPath, ConfigError> {
    if name.trim().trim_matches('/').is_empty() {
        return Err(invalid(name, NameKind::Segment, NameRule::Empty));
    }

    let parts = split_parts(name)
        .into_iter()
        .map(|part| {
            segment_rule(part)
                .map(|()| part.to_string())
                .map_err(|rule| invalid(name, NameKind::Segment, rule))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(with_parent(parent, parts))
}

/// Normalizes a page path under an optional parent segment
///
/// The last part is the slug and must satisfy the slug grammar; any
/// preceding parts are segment names.
///
/// ```
/// use rhtmx_content_router::path::normalize_page_path;
///
/// let page = normalize_page_path("guides/getting-started", None).unwrap();
/// assert_eq!(page.full_path, "guides/getting-started");
/// assert_eq!(page.leaf(), Some("getting-started"));
///
/// assert!(normalize_page_path("about_us", None).is_err());
/// ```
pub fn normalize_page_path(
    path: &str,
    parent: Option<&NormalizedPath>,
) -> Result<NormalizedPath, ConfigError> {
    if path.trim().trim_matches('/').is_empty() {
        return Err(invalid(path, NameKind::Slug, NameRule::Empty));
    }

    let raw = split_parts(path);
    let (slug, segments) = match raw.split_last() {
        Some(split) => split,
        None => return Err(invalid(path, NameKind::Slug, NameRule::Empty)),
    };

    let mut parts = segments
        .iter()
        .map(|part| {
            segment_rule(part)
                .map(|()| part.to_string())
                .map_err(|rule| invalid(path, NameKind::Segment, rule))
        })
        .collect::<Result<Vec<_>, _>>()?;

    slug_rule(slug).map_err(|rule| invalid(path, NameKind::Slug, rule))?;
    parts.push(slug.to_string());

    Ok(with_parent(parent, parts))
}
