//! Geometry half of the vectile workspace.
//!
//! A geometry travels through this crate in four steps:
//!
//! 1. [`wkb::decode`] turns Well-Known Binary from a spatial backend into a [`Geometry`]
//!    (or converted from a `geo` crate value).
//! 2. A [`cursor::Cursor`] built for one tile scales it onto the tile grid and clips it to the
//!    buffered tile square, re-orienting polygon rings on the way ([`winding`]).
//! 3. The result is wrapped in a [`Feature`] and appended to a [`vector_tile::Layer`].
//! 4. [`vector_tile::Tile::assemble`] serializes all layers into Mapbox Vector Tile bytes.
//!
//! Failures are reported as `anyhow` errors carrying a [`TileError`].

pub mod cursor;
mod error;
mod geom;
pub mod vector_tile;
pub mod winding;
pub mod wkb;

pub use error::TileError;
pub use geom::*;
