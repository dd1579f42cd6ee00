//! The in-memory geometry model.
//!
//! [`Geometry`] is a closed union over the OGC simple features plus [`GeometryCollection`]. All
//! coordinates are 2D `f64`; the same types carry source coordinates and tile-local coordinates.

mod convert;
mod feature;
mod geometry;
mod properties;
mod types;
mod value;
mod wkt;

pub use feature::*;
pub use geometry::*;
pub use properties::*;
pub use types::*;
pub use value::*;
