//! Routing configuration: the fluent builder and the immutable snapshot it
//! produces.

pub mod builder;
pub mod metadata;
pub mod snapshot;

pub use builder::{
    PageBuilder, RootBuilder, RoutingConfigurationBuilder, SegmentBuilder, DEFAULT_CULTURE,
};
pub use metadata::{MetadataFieldSnapshot, MetadataFields, MetadataType, MetadataValue};
pub use snapshot::{
    CultureConfigurationSnapshot, PageConfigurationSnapshot, RootConfigurationSnapshot,
    RoutingConfiguration, SegmentConfigurationSnapshot,
};
