//! Pagination URL codec
//!
//! Paginated listings address page N > 1 with one trailing path segment,
//! in one of two formats:
//!
//! - **Numeric**: `/posts/2`
//! - **Prefixed**: `/posts/page-2`
//!
//! Page 1 never carries a suffix. All functions are pure.

use serde::{Deserialize, Serialize};

use crate::error::{ArgumentError, ConfigError};

/// Prefix used for [`PaginationFormat::Prefixed`] URLs when none is configured
pub const DEFAULT_PAGE_PREFIX: &str = "page";

/// Smallest allowed page size
pub const MIN_PAGE_SIZE: u32 = 1;
/// Largest allowed page size
pub const MAX_PAGE_SIZE: u32 = 100;

/// How page numbers appear in URLs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PaginationFormat {
    /// `/posts/2`
    #[default]
    Numeric,
    /// `/posts/page-2`
    Prefixed,
}

/// Pagination settings for a listing route
///
/// # Examples
///
/// ```
/// use rhtmx_content_router::pagination::{PaginationSettings, PaginationFormat};
///
/// let settings = PaginationSettings::prefixed(20, "seite").unwrap();
/// assert_eq!(settings.format, PaginationFormat::Prefixed);
/// assert_eq!(settings.prefix(), "seite");
///
/// assert!(PaginationSettings::numeric(0).is_err());
/// assert!(PaginationSettings::prefixed(10, "  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationSettings {
    pub page_size: u32,
    #[serde(default)]
    pub format: PaginationFormat,
    #[serde(default)]
    pub prefix: Option<String>,
}

impl PaginationSettings {
    /// Numeric pagination (`/posts/2`)
    pub fn numeric(page_size: u32) -> Result<Self, ConfigError> {
        let settings = Self {
            page_size,
            format: PaginationFormat::Numeric,
            prefix: None,
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Prefixed pagination (`/posts/{prefix}-2`)
    pub fn prefixed(page_size: u32, prefix: impl Into<String>) -> Result<Self, ConfigError> {
        let settings = Self {
            page_size,
            format: PaginationFormat::Prefixed,
            prefix: Some(prefix.into().trim().to_string()),
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the page size range and the prefix requirement
    ///
    /// A configured prefix may only hold ASCII letters, digits, `-` and `_`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(MIN_PAGE_SIZE..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ConfigError::PageSizeOutOfRange(self.page_size));
        }

        let prefix = self.prefix.as_deref().map(str::trim).unwrap_or("");

        if prefix.is_empty() {
            return match self.format {
                PaginationFormat::Prefixed => Err(ConfigError::BlankPaginationPrefix),
                PaginationFormat::Numeric => Ok(()),
            };
        }

        // The suffix must stay a single path segment to be parsed back
        match prefix
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            Some(character) => Err(ConfigError::InvalidPaginationPrefix {
                prefix: prefix.to_string(),
                character,
            }),
            None => Ok(()),
        }
    }

    /// Effective prefix (falls back to `"page"`)
    pub fn prefix(&self) -> &str {
        self.prefix
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .unwrap_or(DEFAULT_PAGE_PREFIX)
    }
}

/// Builds the URL for `page` of the listing at `base_path`
///
/// # Examples
///
/// ```
/// use rhtmx_content_router::pagination::{generate_page_url, PaginationSettings};
///
/// let numeric = PaginationSettings::numeric(10).unwrap();
/// assert_eq!(generate_page_url("/posts", 1, &numeric).unwrap(), "/posts");
/// assert_eq!(generate_page_url("/posts", 2, &numeric).unwrap(), "/posts/2");
///
/// let prefixed = PaginationSettings::prefixed(10, "page").unwrap();
/// assert_eq!(generate_page_url("/posts", 3, &prefixed).unwrap(), "/posts/page-3");
///
/// assert!(generate_page_url("/posts", 0, &numeric).is_err());
/// ```
pub fn generate_page_url(
    base_path: &str,
    page: u32,
    settings: &PaginationSettings,
) -> Result<String, ArgumentError> {
    match page {
        0 => Err(ArgumentError::InvalidPageNumber(page)),
        1 => Ok(base_path.to_string()),
        n => {
            let base = base_path.trim_end_matches('/');
            Ok(match settings.format {
                PaginationFormat::Numeric => format!("{}/{}", base, n),
                PaginationFormat::Prefixed => format!("{}/{}-{}", base, settings.prefix(), n),
            })
        }
    }
}

/// Parses a numeric page segment (`"2"`)
///
/// Accepts only a plain base-10 integer ≥ 1 without sign, whitespace or
/// leading zeros.
///
/// ```
/// use rhtmx_content_router::pagination::try_parse_numeric;
///
/// assert_eq!(try_parse_numeric("12"), Some(12));
/// assert_eq!(try_parse_numeric("0"), None);
/// assert_eq!(try_parse_numeric("-3"), None);
/// assert_eq!(try_parse_numeric("+3"), None);
/// assert_eq!(try_parse_numeric("03"), None);
/// assert_eq!(try_parse_numeric("3a"), None);
/// ```
pub fn try_parse_numeric(segment: &str) -> Option<u32> {
    let is_plain = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && !segment.starts_with('0');

    if !is_plain {
        return None;
    }

    segment.parse::<u32>().ok().filter(|&n| n >= 1)
}

/// Parses a prefixed page segment (`"page-2"`), prefix matched case-insensitively
///
/// A blank prefix is a caller error.
///
/// ```
/// use rhtmx_content_router::pagination::try_parse_prefixed;
///
/// assert_eq!(try_parse_prefixed("page-3", "page").unwrap(), Some(3));
/// assert_eq!(try_parse_prefixed("PAGE-3", "page").unwrap(), Some(3));
/// assert_eq!(try_parse_prefixed("page-0", "page").unwrap(), None);
/// assert_eq!(try_parse_prefixed("page--3", "page").unwrap(), None);
/// assert_eq!(try_parse_prefixed("seite-3", "page").unwrap(), None);
/// assert!(try_parse_prefixed("page-3", "").is_err());
/// ```
pub fn try_parse_prefixed(segment: &str, prefix: &str) -> Result<Option<u32>, ArgumentError> {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return Err(ArgumentError::Empty("prefix"));
    }

    let parsed = segment
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .and_then(|_| segment.get(prefix.len()..))
        .and_then(|rest| rest.strip_prefix('-'))
        .and_then(try_parse_numeric);

    Ok(parsed)
}

/// Interprets `segment` as a pagination suffix for a route with `settings`
///
/// Only pages ≥ 2 qualify: page 1 is addressed without a suffix.
///
/// ```
/// use rhtmx_content_router::pagination::{parse_page_segment, PaginationSettings};
///
/// let prefixed = PaginationSettings::prefixed(10, "page").unwrap();
/// assert_eq!(parse_page_segment("page-4", &prefixed), Some(4));
/// assert_eq!(parse_page_segment("page-1", &prefixed), None);
/// assert_eq!(parse_page_segment("4", &prefixed), None);
/// ```
pub fn parse_page_segment(segment: &str, settings: &PaginationSettings) -> Option<u32> {
    let page = match settings.format {
        PaginationFormat::Numeric => try_parse_numeric(segment),
        PaginationFormat::Prefixed => try_parse_prefixed(segment, settings.prefix())
            .ok()
            .flatten(),
    };
    page.filter(|&n| n >= 2)
}

/// A page of a listing, as seen by the rendering host
///
/// ```
/// use rhtmx_content_router::pagination::{PageWindow, PaginationSettings};
///
/// let settings = PaginationSettings::numeric(10).unwrap();
/// let window = PageWindow::new(3, &settings).unwrap();
/// assert_eq!(window.offset(), 20);
/// assert_eq!(window.limit(), 10);
/// assert_eq!(window.total_pages(45), 5);
/// assert!(window.has_next(45));
/// assert!(window.has_previous());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageWindow {
    page: u32,
    page_size: u32,
}

impl PageWindow {
    pub fn new(page: u32, settings: &PaginationSettings) -> Result<Self, ArgumentError> {
        if page == 0 {
            return Err(ArgumentError::InvalidPageNumber(page));
        }
        Ok(Self {
            page,
            page_size: settings.page_size,
        })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of items to skip
    pub fn offset(&self) -> usize {
        (self.page as usize).saturating_sub(1) * self.page_size as usize
    }

    /// Number of items on a full page
    pub fn limit(&self) -> usize {
        self.page_size as usize
    }

    /// Page count for `total_items` (an empty listing still has one page)
    pub fn total_pages(&self, total_items: usize) -> u32 {
        let size = self.page_size.max(1) as usize;
        let pages = total_items.div_ceil(size).max(1);
        u32::try_from(pages).unwrap_or(u32::MAX)
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self, total_items: usize) -> bool {
        self.page < self.total_pages(total_items)
    }

    /// Whether the page lies past the end of the listing
    pub fn is_out_of_range(&self, total_items: usize) -> bool {
        self.page > self.total_pages(total_items)
    }
}
