//! # RHTMX Content Router
//!
//! Content routing for sites organised as a tree of segments and pages:
//! - Fluent configuration builder (`blog` → `blog/hello-world`)
//! - Culture prefixes (`/de-DE/blog`) with an ordered fallback chain
//! - Paginated listings (`/blog/2`, `/blog/page-2`)
//! - Most-specific-prefix matching (`/docs/api/auth` → `/docs/api`)
//! - Canonical URLs and `hreflang` alternates
//!
//! ## Lifecycle
//!
//! Configuration is declared once at startup, frozen into an immutable
//! [`RoutingConfiguration`], loaded into a [`RouteRegistry`], and then read
//! concurrently by a [`RouteResolver`] for every request. Resolution misses
//! are `None`; configuration mistakes are [`ConfigError`]s that should abort
//! startup.
//!
//! ## Path Normalization
//!
//! Request paths are forgiving:
//! - Trailing slashes: `/blog/` → `/blog`
//! - Double slashes: `//blog//posts` → `/blog/posts`
//! - Backslashes: `\blog\posts` → `/blog/posts`
//! - Case: `/Blog` matches `/blog`
//!
//! ## Example
//!
//! ```
//! use rhtmx_content_router::config::RoutingConfigurationBuilder;
//! use rhtmx_content_router::pagination::PaginationSettings;
//! use rhtmx_content_router::resolver::RouteResolver;
//!
//! let mut builder = RoutingConfigurationBuilder::new();
//! builder
//!     .configure_root(|root| {
//!         root.index_component("HomePage")
//!             .supported_cultures(["en-US", "de-DE"])?;
//!         Ok(())
//!     })?
//!     .map_segment("blog", |blog| {
//!         blog.index_component("BlogIndex")
//!             .page_component("BlogPost")
//!             .paginate(PaginationSettings::prefixed(10, "page")?)?
//!             .map_page("hello-world", |_| Ok(()))?;
//!         Ok(())
//!     })?;
//!
//! let resolver = RouteResolver::from_configuration(&builder.build()?)?;
//!
//! let post = resolver.resolve("/de-DE/blog/hello-world").unwrap();
//! assert_eq!(post.route.component, "BlogPost");
//! assert_eq!(post.culture.name(), "de-DE");
//!
//! let listing = resolver.resolve("/blog/page-3").unwrap();
//! assert_eq!(listing.route.pattern, "/blog");
//! assert_eq!(listing.page, 3);
//! # Ok::<(), rhtmx_content_router::ConfigError>(())
//! ```

// ============================================================================
// Module Declarations
// ============================================================================

pub mod canonical;
pub mod config;
pub mod content;
pub mod culture;
pub mod error;
pub mod manifest;
pub mod pagination;
pub mod path;
pub mod registry;
pub mod resolver;

// ============================================================================
// Re-exports
// ============================================================================

pub use canonical::{canonical_path, CanonicalPolicy, CanonicalUrlGenerator};
pub use config::{RoutingConfiguration, RoutingConfigurationBuilder};
pub use content::{ContentStore, CultureAwareLocator, Located, MemoryContentStore};
pub use culture::{CultureCatalog, CultureFallbackChain, CultureInfo};
pub use error::{ArgumentError, ConfigError, NameKind, RegistryError};
pub use manifest::RoutingManifest;
pub use pagination::{PageWindow, PaginationFormat, PaginationSettings};
pub use path::{is_valid_path, normalize_path, PathHierarchy};
pub use registry::{RouteDefinition, RouteKind, RouteRegistry};
pub use resolver::{ResolvedRoute, RouteResolver};
