//! Configuration for the resource viewer
//!
//! A single YAML file plus environment overrides. The collector itself only
//! reads the `viewer` section, and only at construction time.

pub mod loader;
pub mod paths;
pub mod schema;

pub use loader::ConfigLoader;
pub use schema::{Config, OutputConfig, OutputFormat, ViewerConfig};
