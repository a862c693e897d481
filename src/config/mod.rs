//! Source configuration for the crawl engine
//!
//! This module provides the `SourceConfig` struct and its type-safe builder
//! for describing a single named crawl target with validation and sensible
//! defaults.

// Sub-modules
pub mod builder;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{Complete, SourceConfigBuilder, WithName, WithUrl};
pub use types::{ArticleSelectors, SourceConfig};
