//! Shared building blocks of the vectile workspace.
//!
//! - [`io`]: byte-order aware value readers and writers, including the protobuf primitives
//!   needed for the MVT wire format.
//! - [`types`]: the [`Blob`] byte container, [`BoundingBox`] and Web-Mercator [`TileCoord`]s.
//! - [`config`]: the YAML-backed [`PipelineConfig`].

pub mod config;
pub mod io;
pub mod types;

pub use config::PipelineConfig;
pub use types::*;
