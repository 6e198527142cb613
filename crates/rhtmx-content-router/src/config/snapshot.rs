//! Immutable routing configuration produced by
//! [`RoutingConfigurationBuilder::build`](super::RoutingConfigurationBuilder::build).

use std::collections::BTreeMap;

use super::metadata::MetadataFields;
use crate::canonical::CanonicalPolicy;
use crate::culture::{CultureCatalog, CultureFallbackChain, CultureInfo};
use crate::pagination::PaginationSettings;

/// Culture settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CultureConfigurationSnapshot {
    pub default_culture: CultureInfo,
    pub canonical_policy: CanonicalPolicy,
    /// Deduplicated, sorted by name; always contains `default_culture`
    pub supported_cultures: CultureCatalog,
}

impl CultureConfigurationSnapshot {
    /// Supported culture by case-insensitive name
    pub fn find(&self, name: &str) -> Option<&CultureInfo> {
        self.supported_cultures.find(name)
    }

    pub fn fallback(&self) -> CultureFallbackChain {
        CultureFallbackChain::new(self.default_culture.clone())
    }
}

/// Root node settings
#[derive(Debug, Clone, PartialEq)]
pub struct RootConfigurationSnapshot {
    pub content_type: Option<String>,
    pub index_component: Option<String>,
    pub index_layout: Option<String>,
    pub page_component: Option<String>,
    pub page_layout: Option<String>,
    pub pagination: Option<PaginationSettings>,
    pub metadata: MetadataFields,
    pub cultures: CultureConfigurationSnapshot,
}

/// A configured segment
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentConfigurationSnapshot {
    /// `/`-joined parts without a leading slash (`blog/posts`)
    pub full_path: String,
    pub path_segments: Vec<String>,
    pub content_type: Option<String>,
    pub index_component: Option<String>,
    pub index_layout: Option<String>,
    pub page_component: Option<String>,
    pub page_layout: Option<String>,
    pub pagination: Option<PaginationSettings>,
    pub metadata: MetadataFields,
}

impl SegmentConfigurationSnapshot {
    /// Route pattern (`/blog/posts`)
    pub fn pattern(&self) -> String {
        format!("/{}", self.full_path)
    }

    /// Segment name (last path part)
    pub fn name(&self) -> &str {
        self.path_segments.last().map(String::as_str).unwrap_or("")
    }
}

/// A configured page
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfigurationSnapshot {
    pub full_path: String,
    /// Ordered parts; the last one is the slug
    pub path_segments: Vec<String>,
    pub slug: String,
    pub content_type: Option<String>,
    pub component: Option<String>,
    pub layout: Option<String>,
    pub metadata: MetadataFields,
}

impl PageConfigurationSnapshot {
    pub fn pattern(&self) -> String {
        format!("/{}", self.full_path)
    }

    /// Path of the enclosing segment (empty for a root-level page)
    pub fn segment_path(&self) -> String {
        let n = self.path_segments.len().saturating_sub(1);
        self.path_segments[..n].join("/")
    }
}

/// The complete, immutable routing configuration
///
/// Segment and page maps are keyed by lower-cased full path, so lookups are
/// case-insensitive.
#[derive(Debug, Clone, PartialEq)]
pub struct RoutingConfiguration {
    pub root: RootConfigurationSnapshot,
    pub segments: BTreeMap<String, SegmentConfigurationSnapshot>,
    pub pages: BTreeMap<String, PageConfigurationSnapshot>,
}

fn lookup_key(path: &str) -> String {
    path.trim().trim_matches('/').to_ascii_lowercase()
}

impl RoutingConfiguration {
    pub fn cultures(&self) -> &CultureConfigurationSnapshot {
        &self.root.cultures
    }

    /// Segment by full path (`blog/posts` or `/Blog/Posts/`)
    pub fn segment(&self, path: &str) -> Option<&SegmentConfigurationSnapshot> {
        self.segments.get(&lookup_key(path))
    }

    /// Page by full path
    pub fn page(&self, path: &str) -> Option<&PageConfigurationSnapshot> {
        self.pages.get(&lookup_key(path))
    }

    /// Nearest configured segment strictly enclosing `path`
    pub fn enclosing_segment(&self, path: &str) -> Option<&SegmentConfigurationSnapshot> {
        let key = lookup_key(path);
        let parts: Vec<&str> = key.split('/').filter(|s| !s.is_empty()).collect();

        (1..parts.len())
            .rev()
            .find_map(|n| self.segments.get(&parts[..n].join("/")))
    }

    /// Direct child segments of `path` (root-level segments for `""`)
    pub fn child_segments<'a>(
        &'a self,
        path: &str,
    ) -> impl Iterator<Item = &'a SegmentConfigurationSnapshot> + 'a {
        let depth = lookup_key(path).split('/').filter(|s| !s.is_empty()).count();
        let prefix = lookup_key(path);

        self.segments.iter().filter_map(move |(key, segment)| {
            let is_child = segment.path_segments.len() == depth + 1
                && (prefix.is_empty() || key.starts_with(&format!("{}/", prefix)));
            is_child.then_some(segment)
        })
    }

    /// Pages whose enclosing path is exactly `segment_path`
    pub fn pages_in<'a>(
        &'a self,
        segment_path: &str,
    ) -> impl Iterator<Item = &'a PageConfigurationSnapshot> + 'a {
        let segment_key = lookup_key(segment_path);
        self.pages
            .values()
            .filter(move |page| page.segment_path().to_ascii_lowercase() == segment_key)
    }
}
