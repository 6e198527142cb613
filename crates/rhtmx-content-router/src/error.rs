/// Error types for configuration and argument validation
///
/// Resolution misses are not errors: the resolver returns `None` for paths
/// it cannot map. Only startup configuration mistakes and caller contract
/// violations surface here.
use thiserror::Error;

use crate::path::name::NameRule;

/// Which grammar a name was validated against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    /// A segment name (`blog`, `release_notes`)
    Segment,
    /// A page slug (`hello-world`)
    Slug,
}

impl std::fmt::Display for NameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NameKind::Segment => f.write_str("segment name"),
            NameKind::Slug => f.write_str("slug"),
        }
    }
}

/// Fatal configuration error raised while building the routing table
///
/// These are expected to abort application startup.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid {kind} '{input}': {rule}")]
    InvalidName {
        input: String,
        kind: NameKind,
        rule: NameRule,
    },

    #[error("page '{0}' is already mapped")]
    DuplicatePage(String),

    #[error("route '{0}' is already registered")]
    DuplicateRoute(String),

    #[error("metadata field '{field}' is declared twice on '{node}'")]
    DuplicateMetadataField { node: String, field: String },

    #[error("metadata field '{field}' expects {expected} but its default is {actual}")]
    MetadataTypeMismatch {
        field: String,
        expected: String,
        actual: String,
    },

    #[error("metadata field name must not be blank (on '{0}')")]
    BlankMetadataField(String),

    #[error("prefixed pagination requires a non-blank prefix")]
    BlankPaginationPrefix,

    #[error("pagination prefix '{prefix}' contains '{character}'; only ASCII letters, digits, '-' and '_' are allowed")]
    InvalidPaginationPrefix { prefix: String, character: char },

    #[error("page size {0} is out of range (1..=100)")]
    PageSizeOutOfRange(u32),

    #[error("invalid culture tag '{0}'")]
    InvalidCulture(String),

    #[error("default culture '{0}' is not among the supported cultures")]
    DefaultCultureNotSupported(String),

    #[error("page '{0}' has no component and none is inherited from its segment or the root")]
    MissingComponent(String),
}

/// Caller contract violation (programmer error)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("page number must be at least 1, got {0}")]
    InvalidPageNumber(u32),

    #[error("argument '{0}' must not be empty")]
    Empty(&'static str),

    #[error("route registered under '{pattern}' declares pattern '{declared}'")]
    PatternMismatch { pattern: String, declared: String },
}

/// Error returned by registry writes: either a duplicate (configuration) or
/// a bad argument (programmer error)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistryError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Argument(#[from] ArgumentError),
}
