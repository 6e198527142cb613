//! Route registry
//!
//! A concurrent table from normalized path pattern to [`RouteDefinition`].
//! It is filled once at startup (usually via
//! [`RouteRegistry::from_configuration`]) and read by every request after
//! that. Keys compare case-insensitively.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::config::{RoutingConfiguration, SegmentConfigurationSnapshot};
use crate::error::{ArgumentError, ConfigError, RegistryError};
use crate::pagination::PaginationSettings;
use crate::path::{normalize_path, path_key, PathHierarchy};

/// What kind of configured node a route renders
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// `/`
    Root,
    /// A segment's own listing (`/blog`)
    SegmentIndex,
    /// A single page (`/blog/hello-world`)
    Page,
}

/// A routable node and the references needed to render it
///
/// `parent` is the pattern of the nearest registered ancestor route, a key
/// into the same registry rather than a pointer.
///
/// # Examples
///
/// ```
/// use rhtmx_content_router::registry::{RouteDefinition, RouteKind};
///
/// let route = RouteDefinition::new("/blog/hello-world", "BlogPost")
///     .with_kind(RouteKind::Page)
///     .with_layout("Article")
///     .with_parent("/blog");
///
/// assert_eq!(route.depth(), 2);
/// assert_eq!(route.parent.as_deref(), Some("/blog"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteDefinition {
    pub pattern: String,
    pub kind: RouteKind,
    pub component: String,
    pub layout: Option<String>,
    pub content_type: Option<String>,
    pub pagination: Option<PaginationSettings>,
    pub parent: Option<String>,
}

impl RouteDefinition {
    /// Creates a page route; the pattern is normalized
    pub fn new(pattern: impl AsRef<str>, component: impl Into<String>) -> Self {
        Self {
            pattern: normalize_path(pattern.as_ref()).into_owned(),
            kind: RouteKind::Page,
            component: component.into(),
            layout: None,
            content_type: None,
            pagination: None,
            parent: None,
        }
    }

    pub fn with_kind(mut self, kind: RouteKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_layout(mut self, layout: impl Into<String>) -> Self {
        self.layout = Some(layout.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn with_pagination(mut self, pagination: PaginationSettings) -> Self {
        self.pagination = Some(pagination);
        self
    }

    pub fn with_parent(mut self, parent: impl AsRef<str>) -> Self {
        self.parent = Some(normalize_path(parent.as_ref()).into_owned());
        self
    }

    /// Number of path segments in the pattern (0 for `/`)
    pub fn depth(&self) -> usize {
        self.pattern.split('/').filter(|s| !s.is_empty()).count()
    }

    pub fn is_paginated(&self) -> bool {
        self.pagination.is_some()
    }
}

/// Concurrent route table
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: DashMap<String, RouteDefinition>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry holding every routable node of `config`
    ///
    /// - `/` when the root has an index component
    /// - one index route per segment with an index component
    /// - one route per page; component, layout and content type fall back
    ///   to the nearest enclosing segment, then the root
    pub fn from_configuration(config: &RoutingConfiguration) -> Result<Self, ConfigError> {
        let registry = Self::new();
        let root = &config.root;

        if let Some(component) = &root.index_component {
            let mut route = RouteDefinition::new("/", component.clone()).with_kind(RouteKind::Root);
            route.layout = root.index_layout.clone();
            route.content_type = root.content_type.clone();
            route.pagination = root.pagination.clone();
            registry.insert(route)?;
        }

        // BTreeMap order puts every segment after its ancestors
        for segment in config.segments.values() {
            let pattern = segment.pattern();
            let Some(component) = &segment.index_component else {
                warn!(segment = %pattern, "segment has no index component; not routable");
                continue;
            };

            let mut route =
                RouteDefinition::new(&pattern, component.clone()).with_kind(RouteKind::SegmentIndex);
            route.layout = segment.index_layout.clone();
            route.content_type = segment
                .content_type
                .clone()
                .or_else(|| root.content_type.clone());
            route.pagination = segment.pagination.clone();
            route.parent = registry.nearest_ancestor(&pattern);
            registry.insert(route)?;
        }

        for page in config.pages.values() {
            let pattern = page.pattern();
            let enclosing: Vec<&SegmentConfigurationSnapshot> = PathHierarchy::ancestors_of(&pattern)
                .filter_map(|ancestor| config.segment(ancestor))
                .collect();

            let component = page
                .component
                .clone()
                .or_else(|| enclosing.iter().find_map(|s| s.page_component.clone()))
                .or_else(|| root.page_component.clone())
                .ok_or_else(|| ConfigError::MissingComponent(pattern.clone()))?;

            let mut route = RouteDefinition::new(&pattern, component).with_kind(RouteKind::Page);
            route.layout = page
                .layout
                .clone()
                .or_else(|| enclosing.iter().find_map(|s| s.page_layout.clone()))
                .or_else(|| root.page_layout.clone());
            route.content_type = page
                .content_type
                .clone()
                .or_else(|| enclosing.iter().find_map(|s| s.content_type.clone()))
                .or_else(|| root.content_type.clone());
            route.parent = registry.nearest_ancestor(&pattern);
            registry.insert(route)?;
        }

        if registry.is_empty() {
            warn!("routing configuration produced no routable nodes");
        }

        Ok(registry)
    }

    /// Registers `definition` under `pattern` if the pattern is free
    ///
    /// `pattern` must name the same path as `definition.pattern`, up to
    /// normalization and case.
    ///
    /// # Examples
    ///
    /// ```
    /// use rhtmx_content_router::registry::{RouteDefinition, RouteRegistry};
    ///
    /// let registry = RouteRegistry::new();
    /// registry.register("/about", RouteDefinition::new("/about", "About")).unwrap();
    ///
    /// assert!(registry.register("/About/", RouteDefinition::new("/about", "Other")).is_err());
    /// assert!(registry.try_get_route("/ABOUT").is_some());
    /// assert!(registry.register("/contact", RouteDefinition::new("/about", "About")).is_err());
    /// ```
    pub fn register(&self, pattern: &str, definition: RouteDefinition) -> Result<(), RegistryError> {
        if pattern.trim().is_empty() {
            return Err(ArgumentError::Empty("pattern").into());
        }
        if definition.component.trim().is_empty() {
            return Err(ArgumentError::Empty("component").into());
        }
        if path_key(pattern) != path_key(&definition.pattern) {
            return Err(ArgumentError::PatternMismatch {
                pattern: normalize_path(pattern).into_owned(),
                declared: definition.pattern,
            }
            .into());
        }

        self.insert_at(pattern, definition)?;
        Ok(())
    }

    fn insert(&self, definition: RouteDefinition) -> Result<(), ConfigError> {
        let pattern = definition.pattern.clone();
        self.insert_at(&pattern, definition)
    }

    fn insert_at(&self, pattern: &str, definition: RouteDefinition) -> Result<(), ConfigError> {
        match self.routes.entry(path_key(pattern)) {
            Entry::Occupied(_) => Err(ConfigError::DuplicateRoute(
                normalize_path(pattern).into_owned(),
            )),
            Entry::Vacant(slot) => {
                debug!(
                    pattern = %definition.pattern,
                    component = %definition.component,
                    kind = ?definition.kind,
                    "registered route"
                );
                slot.insert(definition);
                Ok(())
            }
        }
    }

    /// Looks up a route by pattern; a miss is not an error
    pub fn try_get_route(&self, pattern: &str) -> Option<RouteDefinition> {
        self.routes
            .get(&path_key(pattern))
            .map(|entry| entry.value().clone())
    }

    pub fn contains(&self, pattern: &str) -> bool {
        self.routes.contains_key(&path_key(pattern))
    }

    /// Snapshot of every definition, ordered by pattern
    pub fn get_all(&self) -> Vec<RouteDefinition> {
        let mut routes: Vec<RouteDefinition> =
            self.routes.iter().map(|entry| entry.value().clone()).collect();
        routes.sort_by(|a, b| a.pattern.cmp(&b.pattern));
        routes
    }

    /// Removes every route
    pub fn clear(&self) {
        self.routes.clear();
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Pattern of the nearest registered proper ancestor of `pattern`
    fn nearest_ancestor(&self, pattern: &str) -> Option<String> {
        PathHierarchy::ancestors_of(pattern)
            .find_map(|ancestor| self.try_get_route(ancestor))
            .map(|route| route.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RoutingConfigurationBuilder;
    use pretty_assertions::assert_eq;
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::thread;

    #[test]
    fn test_register_and_lookup() {
        let registry = RouteRegistry::new();
        let route = RouteDefinition::new("/blog", "BlogIndex").with_kind(RouteKind::SegmentIndex);
        registry.register("/blog", route.clone()).unwrap();

        assert_eq!(registry.try_get_route("/blog"), Some(route.clone()));
        assert_eq!(registry.try_get_route("/Blog/"), Some(route));
        assert_eq!(registry.try_get_route("/news"), None);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_duplicate_pattern_fails() {
        let registry = RouteRegistry::new();
        registry
            .register("/blog", RouteDefinition::new("/blog", "A"))
            .unwrap();
        assert_eq!(
            registry.register("/blog", RouteDefinition::new("/blog", "B")),
            Err(RegistryError::Config(ConfigError::DuplicateRoute(
                "/blog".to_string()
            )))
        );
        assert_eq!(registry.try_get_route("/blog").unwrap().component, "A");
    }

    #[test]
    fn test_missing_arguments_fail() {
        let registry = RouteRegistry::new();
        assert_eq!(
            registry.register(" ", RouteDefinition::new("/x", "X")),
            Err(RegistryError::Argument(ArgumentError::Empty("pattern")))
        );
        assert_eq!(
            registry.register("/x", RouteDefinition::new("/x", "")),
            Err(RegistryError::Argument(ArgumentError::Empty("component")))
        );
    }

    #[test]
    fn test_register_rejects_mismatched_definition() {
        let registry = RouteRegistry::new();
        assert_eq!(
            registry.register("/a", RouteDefinition::new("/b", "B")),
            Err(RegistryError::Argument(ArgumentError::PatternMismatch {
                pattern: "/a".to_string(),
                declared: "/b".to_string(),
            }))
        );
        assert!(registry.is_empty());

        // Same path spelled differently is fine
        registry
            .register("//Docs/Api/", RouteDefinition::new("/docs/api", "ApiIndex"))
            .unwrap();
        assert_eq!(registry.try_get_route("/docs/api").unwrap().pattern, "/docs/api");
        assert!(registry
            .get_all()
            .iter()
            .all(|route| registry.try_get_route(&route.pattern).is_some()));
    }

    #[test]
    fn test_get_all_and_clear() {
        let registry = RouteRegistry::new();
        for pattern in ["/c", "/a", "/b"] {
            registry
                .register(pattern, RouteDefinition::new(pattern, "Page"))
                .unwrap();
        }
        let patterns: Vec<String> = registry.get_all().into_iter().map(|r| r.pattern).collect();
        assert_eq!(patterns, vec!["/a", "/b", "/c"]);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_concurrent_registration_is_insert_if_absent() {
        let registry = Arc::new(RouteRegistry::new());
        let handles: Vec<_> = (0..8)
            .map(|n| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    registry
                        .register("/shared", RouteDefinition::new("/shared", format!("C{n}")))
                        .is_ok()
                })
            })
            .collect();

        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(winners, 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_from_configuration_inherits_page_settings() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder
            .configure_root(|root| {
                root.index_component("Home").page_layout("Default");
                Ok(())
            })
            .unwrap()
            .map_segment("blog", |blog| {
                blog.index_component("BlogIndex")
                    .content_type("post")
                    .page_component("BlogPost")
                    .map_page("hello-world", |_| Ok(()))?
                    .map_page("custom", |page| {
                        page.component("Custom").layout("Bare");
                        Ok(())
                    })?;
                Ok(())
            })
            .unwrap();

        let registry = RouteRegistry::from_configuration(&builder.build().unwrap()).unwrap();
        assert_eq!(registry.len(), 4);

        let root = registry.try_get_route("/").unwrap();
        assert_eq!(root.kind, RouteKind::Root);
        assert_eq!(root.parent, None);

        let blog = registry.try_get_route("/blog").unwrap();
        assert_eq!(blog.parent.as_deref(), Some("/"));

        let hello = registry.try_get_route("/blog/hello-world").unwrap();
        assert_eq!(hello.component, "BlogPost");
        assert_eq!(hello.layout.as_deref(), Some("Default"));
        assert_eq!(hello.content_type.as_deref(), Some("post"));
        assert_eq!(hello.parent.as_deref(), Some("/blog"));

        let custom = registry.try_get_route("/blog/custom").unwrap();
        assert_eq!(custom.component, "Custom");
        assert_eq!(custom.layout.as_deref(), Some("Bare"));
    }

    #[test]
    fn test_from_configuration_skips_grouping_segments() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder
            .map_segment("docs", |docs| {
                docs.page_component("DocPage")
                    .map_page("install", |_| Ok(()))?;
                Ok(())
            })
            .unwrap();

        let registry = RouteRegistry::from_configuration(&builder.build().unwrap()).unwrap();
        assert!(registry.try_get_route("/docs").is_none());
        let install = registry.try_get_route("/docs/install").unwrap();
        assert_eq!(install.parent, None);
    }

    #[derive(Clone, Default)]
    struct CapturedLog(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLog {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_unroutable_segment_logged_as_warning() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder
            .map_segment("docs", |docs| {
                docs.page_component("DocPage")
                    .map_page("install", |_| Ok(()))?;
                Ok(())
            })
            .unwrap();
        let config = builder.build().unwrap();

        let log = CapturedLog::default();
        let writer = log.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            RouteRegistry::from_configuration(&config).unwrap();
        });

        let output = String::from_utf8(log.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("WARN"), "{output}");
        assert!(output.contains("segment has no index component"), "{output}");
        assert!(output.contains("/docs"), "{output}");
    }

    #[test]
    fn test_page_without_component_is_fatal() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder.map_page("orphan", |_| Ok(())).unwrap();

        let err = RouteRegistry::from_configuration(&builder.build().unwrap()).unwrap_err();
        assert_eq!(err, ConfigError::MissingComponent("/orphan".to_string()));
    }

    #[test]
    fn test_page_colliding_with_segment_index_is_fatal() {
        let mut builder = RoutingConfigurationBuilder::new();
        builder
            .configure_root(|root| {
                root.page_component("Page");
                Ok(())
            })
            .unwrap()
            .map_segment("news", |news| {
                news.index_component("NewsIndex");
                Ok(())
            })
            .unwrap()
            .map_page("news", |_| Ok(()))
            .unwrap();

        let err = RouteRegistry::from_configuration(&builder.build().unwrap()).unwrap_err();
        assert_eq!(err, ConfigError::DuplicateRoute("/news".to_string()));
    }
}
