//! Mapbox Vector Tile (MVT) assembly and decoding.
//!
//! - [`feature`]: per-feature command stream and tag indices.
//! - [`geometry_type`]: the wire-level geometry type.
//! - [`layer`]: a named layer of [`Feature`](crate::Feature)s with its key/value dictionaries.
//! - [`property_manager`]: interning of keys and values into the dictionaries.
//! - [`tile`]: the top-level container holding the layers.
//! - [`value`]: typed MVT property values.
//!
//! [`Layer`] and [`Tile`] are re-exported for convenience.

mod feature;
mod geometry_type;
mod layer;
mod property_manager;
mod tile;
mod value;

pub use feature::VectorTileFeature;
pub use geometry_type::GeomType;
pub use layer::Layer;
pub use property_manager::PropertyManager;
pub use tile::Tile;
