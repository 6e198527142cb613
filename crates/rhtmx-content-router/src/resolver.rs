//! Route resolution
//!
//! Turns a raw request path into the route it addresses, the culture it was
//! requested in and the listing page it asks for.
//!
//! Matching order:
//! 1. Normalize the path
//! 2. Strip a leading supported-culture segment (`/de-DE/blog` → `/blog`)
//! 3. Exact match
//! 4. Pagination suffix on a paginated route (`/blog/page-2`)
//! 5. Most specific registered prefix (`/docs/api/intro` → `/docs/api`)
//!
//! A miss is `None`, never an error.

use std::sync::Arc;

use tracing::debug;

use crate::canonical::CanonicalUrlGenerator;
use crate::config::{CultureConfigurationSnapshot, RoutingConfiguration};
use crate::culture::CultureInfo;
use crate::error::{ArgumentError, ConfigError};
use crate::pagination::parse_page_segment;
use crate::path::{join_segments, normalize_path, segments, PathHierarchy};
use crate::registry::{RouteDefinition, RouteRegistry};

/// Outcome of a successful resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoute {
    pub route: RouteDefinition,
    /// Culture from the path prefix, or the default culture
    pub culture: CultureInfo,
    /// Requested listing page (1 when no suffix was present)
    pub page: u32,
    /// Whether the request path carried a culture prefix
    pub culture_prefixed: bool,
    /// Normalized request path with the culture prefix removed
    pub path: String,
}

impl ResolvedRoute {
    /// Whether the route matched through the prefix fallback rather than
    /// exactly or via a page suffix
    pub fn is_prefix_match(&self) -> bool {
        self.page == 1 && !self.route.pattern.eq_ignore_ascii_case(&self.path)
    }
}

/// Read-only resolver over a shared registry
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use rhtmx_content_router::culture::CultureInfo;
/// use rhtmx_content_router::config::CultureConfigurationSnapshot;
/// use rhtmx_content_router::culture::CultureCatalog;
/// use rhtmx_content_router::canonical::CanonicalPolicy;
/// use rhtmx_content_router::pagination::PaginationSettings;
/// use rhtmx_content_router::registry::{RouteDefinition, RouteRegistry};
/// use rhtmx_content_router::resolver::RouteResolver;
///
/// let registry = RouteRegistry::new();
/// let blog = RouteDefinition::new("/blog", "BlogIndex")
///     .with_pagination(PaginationSettings::numeric(10).unwrap());
/// registry.register("/blog", blog).unwrap();
///
/// let cultures = CultureConfigurationSnapshot {
///     default_culture: CultureInfo::parse("en-US").unwrap(),
///     canonical_policy: CanonicalPolicy::WithoutPrefix,
///     supported_cultures: CultureCatalog::from_tags(["en-US", "de-DE"]).unwrap(),
/// };
/// let resolver = RouteResolver::new(Arc::new(registry), cultures);
///
/// let resolved = resolver.resolve("/de-DE/blog/3").unwrap();
/// assert_eq!(resolved.route.pattern, "/blog");
/// assert_eq!(resolved.culture.name(), "de-DE");
/// assert_eq!(resolved.page, 3);
///
/// assert!(resolver.resolve("/nowhere").is_none());
/// ```
#[derive(Debug, Clone)]
pub struct RouteResolver {
    registry: Arc<RouteRegistry>,
    cultures: CultureConfigurationSnapshot,
}

impl RouteResolver {
    pub fn new(registry: Arc<RouteRegistry>, cultures: CultureConfigurationSnapshot) -> Self {
        Self { registry, cultures }
    }

    /// Builds the registry for `config` and a resolver over it
    pub fn from_configuration(config: &RoutingConfiguration) -> Result<Self, ConfigError> {
        let registry = RouteRegistry::from_configuration(config)?;
        Ok(Self::new(Arc::new(registry), config.cultures().clone()))
    }

    pub fn registry(&self) -> &Arc<RouteRegistry> {
        &self.registry
    }

    pub fn cultures(&self) -> &CultureConfigurationSnapshot {
        &self.cultures
    }

    /// Resolves a raw request path
    pub fn resolve(&self, raw_path: &str) -> Option<ResolvedRoute> {
        let normalized = normalize_path(raw_path);
        let (culture, culture_prefixed, path) = self.split_culture(&normalized);

        let resolved = self
            .match_exact(&path)
            .map(|route| (route, 1))
            .or_else(|| self.match_page_suffix(&path))
            .or_else(|| self.match_prefix(&path).map(|route| (route, 1)));

        let Some((route, page)) = resolved else {
            debug!(path = %normalized, "no route matched");
            return None;
        };

        debug!(
            path = %normalized,
            pattern = %route.pattern,
            culture = %culture,
            page,
            "resolved route"
        );

        Some(ResolvedRoute {
            route,
            culture,
            page,
            culture_prefixed,
            path,
        })
    }

    /// Fallback chain for the culture a request resolved to
    pub fn fallback_chain(&self, culture: &CultureInfo) -> Vec<Option<CultureInfo>> {
        self.cultures.fallback().fallback_chain(culture)
    }

    /// Canonical URL of a resolved request
    pub fn canonical_url(&self, resolved: &ResolvedRoute) -> Result<String, ArgumentError> {
        CanonicalUrlGenerator::new(self.cultures.clone()).for_resolved(resolved)
    }

    /// Splits a leading supported-culture segment off `path`
    fn split_culture(&self, path: &str) -> (CultureInfo, bool, String) {
        let parts = segments(path);

        match parts.first().and_then(|first| self.cultures.find(first)) {
            Some(culture) => (culture.clone(), true, join_segments(&parts[1..])),
            None => (self.cultures.default_culture.clone(), false, path.to_string()),
        }
    }

    fn match_exact(&self, path: &str) -> Option<RouteDefinition> {
        self.registry.try_get_route(path)
    }

    /// `/blog/2` or `/blog/page-2` against a paginated `/blog`
    fn match_page_suffix(&self, path: &str) -> Option<(RouteDefinition, u32)> {
        let (base, last) = path.rsplit_once('/')?;
        let base = if base.is_empty() { "/" } else { base };

        let route = self.registry.try_get_route(base)?;
        let settings = route.pagination.as_ref()?;
        let page = parse_page_segment(last, settings)?;
        Some((route, page))
    }

    /// Most specific registered ancestor, excluding `/`
    fn match_prefix(&self, path: &str) -> Option<RouteDefinition> {
        PathHierarchy::ancestors_of(path)
            .take_while(|ancestor| *ancestor != "/")
            .find_map(|ancestor| self.registry.try_get_route(ancestor))
    }
}
