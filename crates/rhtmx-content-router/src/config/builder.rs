//! Fluent routing configuration builder
//!
//! The builder owns an arena of node records. Configuration closures receive
//! a handle (`SegmentBuilder`, `PageBuilder`, `RootBuilder`) that borrows the
//! builder and carries the index of the node it configures, so nested
//! `map_segment` / `map_page` calls simply create records under the handle's
//! path.
//!
//! # Example
//!
//! ```
//! use rhtmx_content_router::config::RoutingConfigurationBuilder;
//! use rhtmx_content_router::pagination::PaginationSettings;
//!
//! let mut builder = RoutingConfigurationBuilder::new();
//! builder
//!     .configure_root(|root| {
//!         root.index_component("HomePage")
//!             .default_culture("en-US")?
//!             .supported_cultures(["en-US", "de-DE"])?;
//!         Ok(())
//!     })?
//!     .map_segment("blog", |blog| {
//!         blog.index_component("BlogIndex")
//!             .page_component("BlogPost")
//!             .paginate(PaginationSettings::numeric(10)?)?
//!             .map_page("hello-world", |_| Ok(()))?;
//!         Ok(())
//!     })?;
//!
//! let config = builder.build()?;
//! assert!(config.segment("blog").is_some());
//! assert!(config.page("blog/hello-world").is_some());
//! # Ok::<(), rhtmx_content_router::ConfigError>(())
//! ```

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info};

use super::metadata::{MetadataFields, MetadataType, MetadataValue};
use super::snapshot::{
    CultureConfigurationSnapshot, PageConfigurationSnapshot, RootConfigurationSnapshot,
    RoutingConfiguration, SegmentConfigurationSnapshot,
};
use crate::canonical::CanonicalPolicy;
use crate::culture::{CultureCatalog, CultureInfo};
use crate::error::ConfigError;
use crate::pagination::PaginationSettings;
use crate::path::{normalize_page_path, normalize_segment_path, NormalizedPath};

/// Culture used when none is configured
pub const DEFAULT_CULTURE: &str = "en-US";

/// Settings shared by the root and segment nodes
#[derive(Debug, Clone, Default)]
struct NodeSettings {
    content_type: Option<String>,
    index_component: Option<String>,
    index_layout: Option<String>,
    page_component: Option<String>,
    page_layout: Option<String>,
    pagination: Option<PaginationSettings>,
    metadata: MetadataFields,
}

#[derive(Debug, Clone)]
struct SegmentNode {
    path: NormalizedPath,
    settings: NodeSettings,
}

#[derive(Debug, Clone)]
struct PageNode {
    path: NormalizedPath,
    content_type: Option<String>,
    component: Option<String>,
    layout: Option<String>,
    metadata: MetadataFields,
}

#[derive(Debug, Clone, Default)]
struct CultureSettings {
    default_culture: Option<CultureInfo>,
    supported: Vec<CultureInfo>,
    canonical_policy: CanonicalPolicy,
}

/// Mutable, single-threaded routing configuration builder
#[derive(Debug, Clone, Default)]
pub struct RoutingConfigurationBuilder {
    root: NodeSettings,
    cultures: CultureSettings,
    segments: Vec<SegmentNode>,
    segment_index: HashMap<String, usize>,
    pages: Vec<PageNode>,
    page_index: HashMap<String, usize>,
}

impl RoutingConfigurationBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures root-level settings and cultures
    pub fn configure_root<F>(&mut self, configure: F) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut RootBuilder<'_>) -> Result<(), ConfigError>,
    {
        configure(&mut RootBuilder { builder: self })?;
        Ok(self)
    }

    /// Maps (or re-opens) a segment at the root level
    ///
    /// `name` may span several parts (`"docs/api"`); missing intermediate
    /// segments are created.
    pub fn map_segment<F>(&mut self, name: &str, configure: F) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut SegmentBuilder<'_>) -> Result<(), ConfigError>,
    {
        self.map_segment_under(None, name, configure)?;
        Ok(self)
    }

    /// Maps a page at the root level; the last part of `slug` is the slug
    pub fn map_page<F>(&mut self, slug: &str, configure: F) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut PageBuilder<'_>) -> Result<(), ConfigError>,
    {
        self.map_page_under(None, slug, configure)?;
        Ok(self)
    }

    fn map_segment_under<F>(
        &mut self,
        parent: Option<&NormalizedPath>,
        name: &str,
        configure: F,
    ) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut SegmentBuilder<'_>) -> Result<(), ConfigError>,
    {
        let path = normalize_segment_path(name, parent)?;
        let node = self.ensure_segment(path);
        configure(&mut SegmentBuilder {
            builder: self,
            node,
        })
    }

    fn map_page_under<F>(
        &mut self,
        parent: Option<&NormalizedPath>,
        slug: &str,
        configure: F,
    ) -> Result<(), ConfigError>
    where
        F: FnOnce(&mut PageBuilder<'_>) -> Result<(), ConfigError>,
    {
        let path = normalize_page_path(slug, parent)?;
        let key = path.key();

        if self.page_index.contains_key(&key) {
            return Err(ConfigError::DuplicatePage(path.full_path));
        }

        for ancestor in path.ancestors() {
            self.ensure_segment(ancestor);
        }

        debug!(page = %path, "mapped page");
        let node = self.pages.len();
        self.pages.push(PageNode {
            path,
            content_type: None,
            component: None,
            layout: None,
            metadata: MetadataFields::default(),
        });
        self.page_index.insert(key, node);

        configure(&mut PageBuilder {
            builder: self,
            node,
        })
    }

    /// Looks up or creates the segment at `path`, creating ancestors first
    fn ensure_segment(&mut self, path: NormalizedPath) -> usize {
        for ancestor in path.ancestors() {
            self.insert_segment(ancestor);
        }
        self.insert_segment(path)
    }

    fn insert_segment(&mut self, path: NormalizedPath) -> usize {
        let key = path.key();
        if let Some(&existing) = self.segment_index.get(&key) {
            return existing;
        }

        debug!(segment = %path, "mapped segment");
        let node = self.segments.len();
        self.segments.push(SegmentNode {
            path,
            settings: NodeSettings::default(),
        });
        self.segment_index.insert(key, node);
        node
    }

    fn build_cultures(&self) -> Result<CultureConfigurationSnapshot, ConfigError> {
        let default_culture = match &self.cultures.default_culture {
            Some(culture) => culture.clone(),
            None => CultureInfo::parse(DEFAULT_CULTURE)?,
        };

        let supported_cultures = if self.cultures.supported.is_empty() {
            CultureCatalog::new([default_culture.clone()])
        } else {
            CultureCatalog::new(self.cultures.supported.iter().cloned())
        };

        let default_culture = supported_cultures
            .find(default_culture.name())
            .cloned()
            .ok_or_else(|| ConfigError::DefaultCultureNotSupported(default_culture.name().to_string()))?;

        Ok(CultureConfigurationSnapshot {
            default_culture,
            canonical_policy: self.cultures.canonical_policy,
            supported_cultures,
        })
    }

    /// Snapshots the accumulated state into an immutable configuration
    ///
    /// Treat this as the final call on a builder. Calling it again returns an
    /// equivalent fresh snapshot.
    pub fn build(&self) -> Result<RoutingConfiguration, ConfigError> {
        let cultures = self.build_cultures()?;

        let root = RootConfigurationSnapshot {
            content_type: self.root.content_type.clone(),
            index_component: self.root.index_component.clone(),
            index_layout: self.root.index_layout.clone(),
            page_component: self.root.page_component.clone(),
            page_layout: self.root.page_layout.clone(),
            pagination: self.root.pagination.clone(),
            metadata: self.root.metadata.clone(),
            cultures,
        };

        let segments: BTreeMap<String, SegmentConfigurationSnapshot> = self
            .segments
            .iter()
            .map(|node| {
                let settings = node.settings.clone();
                let snapshot = SegmentConfigurationSnapshot {
                    full_path: node.path.full_path.clone(),
                    path_segments: node.path.parts.clone(),
                    content_type: settings.content_type,
                    index_component: settings.index_component,
                    index_layout: settings.index_layout,
                    page_component: settings.page_component,
                    page_layout: settings.page_layout,
                    pagination: settings.pagination,
                    metadata: settings.metadata,
                };
                (node.path.key(), snapshot)
            })
            .collect();

        let pages: BTreeMap<String, PageConfigurationSnapshot> = self
            .pages
            .iter()
            .map(|node| {
                let snapshot = PageConfigurationSnapshot {
                    full_path: node.path.full_path.clone(),
                    path_segments: node.path.parts.clone(),
                    slug: node.path.leaf().unwrap_or_default().to_string(),
                    content_type: node.content_type.clone(),
                    component: node.component.clone(),
                    layout: node.layout.clone(),
                    metadata: node.metadata.clone(),
                };
                (node.path.key(), snapshot)
            })
            .collect();

        info!(
            segments = segments.len(),
            pages = pages.len(),
            cultures = root.cultures.supported_cultures.len(),
            default_culture = %root.cultures.default_culture,
            "routing configuration built"
        );

        Ok(RoutingConfiguration {
            root,
            segments,
            pages,
        })
    }
}

/// Handle for root-level settings
pub struct RootBuilder<'a> {
    builder: &'a mut RoutingConfigurationBuilder,
}

impl RootBuilder<'_> {
    fn settings(&mut self) -> &mut NodeSettings {
        &mut self.builder.root
    }

    pub fn content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.settings().content_type = Some(content_type.into());
        self
    }

    /// Component rendering `/`
    pub fn index_component(&mut self, component: impl Into<String>) -> &mut Self {
        self.settings().index_component = Some(component.into());
        self
    }

    pub fn index_layout(&mut self, layout: impl Into<String>) -> &mut Self {
        self.settings().index_layout = Some(layout.into());
        self
    }

    /// Default component for pages that neither set one nor inherit one from a segment
    pub fn page_component(&mut self, component: impl Into<String>) -> &mut Self {
        self.settings().page_component = Some(component.into());
        self
    }

    pub fn page_layout(&mut self, layout: impl Into<String>) -> &mut Self {
        self.settings().page_layout = Some(layout.into());
        self
    }

    pub fn paginate(&mut self, settings: PaginationSettings) -> Result<&mut Self, ConfigError> {
        settings.validate()?;
        self.settings().pagination = Some(settings);
        Ok(self)
    }

    pub fn metadata_field(
        &mut self,
        name: &str,
        type_tag: MetadataType,
        default_value: Option<MetadataValue>,
    ) -> Result<&mut Self, ConfigError> {
        self.settings()
            .metadata
            .declare("/", name, type_tag, default_value)?;
        Ok(self)
    }

    /// Sets the default culture from a tag
    pub fn default_culture(&mut self, tag: &str) -> Result<&mut Self, ConfigError> {
        self.builder.cultures.default_culture = Some(CultureInfo::parse(tag)?);
        Ok(self)
    }

    /// Adds supported cultures from tags
    pub fn supported_cultures<I, S>(&mut self, tags: I) -> Result<&mut Self, ConfigError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for tag in tags {
            let culture = CultureInfo::parse(tag.as_ref())?;
            self.builder.cultures.supported.push(culture);
        }
        Ok(self)
    }

    /// Adds an explicit culture descriptor
    pub fn supported_culture(&mut self, culture: CultureInfo) -> &mut Self {
        self.builder.cultures.supported.push(culture);
        self
    }

    pub fn canonical_policy(&mut self, policy: CanonicalPolicy) -> &mut Self {
        self.builder.cultures.canonical_policy = policy;
        self
    }
}

/// Handle scoped to one segment node
pub struct SegmentBuilder<'a> {
    builder: &'a mut RoutingConfigurationBuilder,
    node: usize,
}

impl SegmentBuilder<'_> {
    fn record(&mut self) -> &mut SegmentNode {
        &mut self.builder.segments[self.node]
    }

    /// Normalized path of the segment being configured
    pub fn path(&self) -> &NormalizedPath {
        &self.builder.segments[self.node].path
    }

    pub fn content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.record().settings.content_type = Some(content_type.into());
        self
    }

    /// Component rendering the segment's own listing (`/blog`)
    pub fn index_component(&mut self, component: impl Into<String>) -> &mut Self {
        self.record().settings.index_component = Some(component.into());
        self
    }

    pub fn index_layout(&mut self, layout: impl Into<String>) -> &mut Self {
        self.record().settings.index_layout = Some(layout.into());
        self
    }

    /// Default component for pages inside this segment
    pub fn page_component(&mut self, component: impl Into<String>) -> &mut Self {
        self.record().settings.page_component = Some(component.into());
        self
    }

    pub fn page_layout(&mut self, layout: impl Into<String>) -> &mut Self {
        self.record().settings.page_layout = Some(layout.into());
        self
    }

    pub fn paginate(&mut self, settings: PaginationSettings) -> Result<&mut Self, ConfigError> {
        settings.validate()?;
        self.record().settings.pagination = Some(settings);
        Ok(self)
    }

    pub fn metadata_field(
        &mut self,
        name: &str,
        type_tag: MetadataType,
        default_value: Option<MetadataValue>,
    ) -> Result<&mut Self, ConfigError> {
        let record = self.record();
        let node_path = record.path.pattern();
        record
            .settings
            .metadata
            .declare(&node_path, name, type_tag, default_value)?;
        Ok(self)
    }

    /// Maps a child segment below this one
    pub fn map_segment<F>(&mut self, name: &str, configure: F) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut SegmentBuilder<'_>) -> Result<(), ConfigError>,
    {
        let parent = self.path().clone();
        self.builder
            .map_segment_under(Some(&parent), name, configure)?;
        Ok(self)
    }

    /// Maps a page below this segment
    pub fn map_page<F>(&mut self, slug: &str, configure: F) -> Result<&mut Self, ConfigError>
    where
        F: FnOnce(&mut PageBuilder<'_>) -> Result<(), ConfigError>,
    {
        let parent = self.path().clone();
        self.builder.map_page_under(Some(&parent), slug, configure)?;
        Ok(self)
    }
}

/// Handle scoped to one page node
pub struct PageBuilder<'a> {
    builder: &'a mut RoutingConfigurationBuilder,
    node: usize,
}

impl PageBuilder<'_> {
    fn record(&mut self) -> &mut PageNode {
        &mut self.builder.pages[self.node]
    }

    pub fn path(&self) -> &NormalizedPath {
        &self.builder.pages[self.node].path
    }

    pub fn content_type(&mut self, content_type: impl Into<String>) -> &mut Self {
        self.record().content_type = Some(content_type.into());
        self
    }

    pub fn component(&mut self, component: impl Into<String>) -> &mut Self {
        self.record().component = Some(component.into());
        self
    }

    pub fn layout(&mut self, layout: impl Into<String>) -> &mut Self {
        self.record().layout = Some(layout.into());
        self
    }

    pub fn metadata_field(
        &mut self,
        name: &str,
        type_tag: MetadataType,
        default_value: Option<MetadataValue>,
    ) -> Result<&mut Self, ConfigError> {
        let record = self.record();
        let node_path = record.path.pattern();
        record
            .metadata
            .declare(&node_path, name, type_tag, default_value)?;
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NameKind;
    use crate::pagination::PaginationFormat;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_builder_uses_default_culture() {
        let config = RoutingConfigurationBuilder::new().build().unwrap();
        let cultures = config.cultures();
        assert_eq!(cultures.default_culture.name(), "en-US");
        assert_eq!(cultures.supported_cultures.len(), 1);
        assert_eq!(cultures.canonical_policy, CanonicalPolicy::WithoutPrefix);
        assert!(config.segments.is_empty());
        assert!(config.pages.is_empty());
    }

    #[test]
    fn test_supported_cultures_sorted_and_deduplicated() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder
            .configure_root(|root| {
                root.default_culture("en-US")?
                    .supported_cultures(["fr-FR", "en-US", "de-DE", "EN-us"])?;
                Ok(())
            })
            .unwrap();

        let config = builder.build().unwrap();
        let names: Vec<&str> = config
            .cultures()
            .supported_cultures
            .iter()
            .map(|c| c.name())
            .collect();
        assert_eq!(names, vec!["de-DE", "en-US", "fr-FR"]);
    }

    #[test]
    fn test_default_culture_must_be_supported() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder
            .configure_root(|root| {
                root.default_culture("it-IT")?
                    .supported_cultures(["en-US", "de-DE"])?;
                Ok(())
            })
            .unwrap();

        assert_eq!(
            builder.build(),
            Err(ConfigError::DefaultCultureNotSupported("it-IT".to_string()))
        );
    }

    #[test]
    fn test_nested_segments_form_prefix_tree() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder
            .map_segment("docs", |docs| {
                docs.index_component("DocsIndex")
                    .map_segment("api", |api| {
                        api.index_component("ApiIndex")
                            .map_page("authentication", |p| {
                                p.component("ApiPage");
                                Ok(())
                            })?;
                        Ok(())
                    })?;
                Ok(())
            })
            .unwrap();

        let config = builder.build().unwrap();
        let api = config.segment("docs/api").unwrap();
        assert_eq!(api.path_segments, vec!["docs", "api"]);
        assert!(api.full_path.starts_with("docs/"));

        let page = config.page("docs/api/authentication").unwrap();
        assert_eq!(page.slug, "authentication");
        assert_eq!(page.segment_path(), "docs/api");
        assert_eq!(
            config.enclosing_segment(&page.full_path).map(|s| s.full_path.as_str()),
            Some("docs/api")
        );
    }

    #[test]
    fn test_multi_part_segment_creates_intermediates() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder.map_segment("blog/posts", |_| Ok(())).unwrap();

        let config = builder.build().unwrap();
        assert!(config.segment("blog").is_some());
        assert!(config.segment("blog/posts").is_some());
        assert_eq!(config.child_segments("").count(), 1);
        assert_eq!(config.child_segments("blog").count(), 1);
    }

    #[test]
    fn test_map_segment_reopens_existing_node() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder
            .map_segment("blog", |blog| {
                blog.index_component("BlogIndex");
                Ok(())
            })
            .unwrap()
            .map_segment("Blog", |blog| {
                blog.index_layout("Wide");
                Ok(())
            })
            .unwrap();

        let config = builder.build().unwrap();
        assert_eq!(config.segments.len(), 1);
        let blog = config.segment("BLOG").unwrap();
        assert_eq!(blog.index_component.as_deref(), Some("BlogIndex"));
        assert_eq!(blog.index_layout.as_deref(), Some("Wide"));
    }

    #[test]
    fn test_duplicate_page_is_fatal() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder.map_page("about", |_| Ok(())).unwrap();

        let err = builder.map_page("About", |_| Ok(())).unwrap_err();
        assert_eq!(err, ConfigError::DuplicatePage("About".to_string()));
    }

    #[test]
    fn test_duplicate_page_through_segment_handle() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder.map_page("blog/first-post", |_| Ok(())).unwrap();

        let err = builder
            .map_segment("blog", |blog| {
                blog.map_page("first-post", |_| Ok(()))?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::DuplicatePage(_)));
    }

    #[test]
    fn test_underscore_slug_rejected() {
        let mut builder = RoutingConfigurationBuilder::new();
        let err = builder.map_page("about_us", |_| Ok(())).unwrap_err();
        match err {
            ConfigError::InvalidName { input, kind, .. } => {
                assert_eq!(input, "about_us");
                assert_eq!(kind, NameKind::Slug);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // The same name is a valid segment
        assert!(builder.map_segment("about_us", |_| Ok(())).is_ok());
    }

    #[test]
    fn test_pagination_and_metadata_frozen_into_snapshot() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder
            .map_segment("news", |news| {
                news.paginate(PaginationSettings::prefixed(25, "seite")?)?
                    .metadata_field("featured", MetadataType::Boolean, Some(false.into()))?;
                Ok(())
            })
            .unwrap();

        let config = builder.build().unwrap();
        let news = config.segment("news").unwrap();
        let pagination = news.pagination.as_ref().unwrap();
        assert_eq!(pagination.page_size, 25);
        assert_eq!(pagination.format, PaginationFormat::Prefixed);
        assert_eq!(pagination.prefix(), "seite");
        assert_eq!(
            news.metadata.default_value("featured"),
            Some(&MetadataValue::Boolean(false))
        );
    }

    #[test]
    fn test_date_metadata_on_page() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder
            .map_page("blog/launch", |page| {
                page.metadata_field("published", MetadataType::Date, Some("2024-03-01".into()))?;
                Ok(())
            })
            .unwrap();

        let config = builder.build().unwrap();
        let launch = config.page("blog/launch").unwrap();
        assert_eq!(
            launch.metadata.default_value("published").and_then(MetadataValue::as_date),
            chrono::NaiveDate::from_ymd_opt(2024, 3, 1)
        );

        let err = builder
            .map_page("blog/sequel", |page| {
                page.metadata_field("published", MetadataType::Date, Some("next week".into()))?;
                Ok(())
            })
            .unwrap_err();
        assert!(matches!(err, ConfigError::MetadataTypeMismatch { .. }));
    }

    #[test]
    fn test_duplicate_metadata_field_on_page() {
        let mut builder = RoutingConfigurationBuilder::new();
        let err = builder
            .map_page("contact", |page| {
                page.metadata_field("form", MetadataType::Text, None)?
                    .metadata_field("FORM", MetadataType::Text, None)?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateMetadataField {
                node: "/contact".to_string(),
                field: "FORM".to_string(),
            }
        );
    }

    #[test]
    fn test_invalid_pagination_rejected() {
        let mut builder = RoutingConfigurationBuilder::new();
        let err = builder
            .map_segment("news", |news| {
                news.paginate(PaginationSettings {
                    page_size: 10,
                    format: PaginationFormat::Prefixed,
                    prefix: Some(" ".to_string()),
                })?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err, ConfigError::BlankPaginationPrefix);
    }

    #[test]
    fn test_build_is_repeatable() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder.map_page("about", |_| Ok(())).unwrap();
        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }
}
