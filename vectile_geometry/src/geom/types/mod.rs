// Primitive geometry types. Each one implements `GeometryTrait`; the composite ones also implement
// `CompositeGeometryTrait` over their parts and the single ones `SingleGeometryTrait` to wrap
// themselves into their multi counterpart.

mod coordinates;
mod linestring;
mod macros;
mod multi_linestring;
mod multi_point;
mod multi_polygon;
mod point;
mod polygon;
mod ring;
mod traits;

pub use coordinates::*;
pub use linestring::*;
pub use multi_linestring::*;
pub use multi_point::*;
pub use multi_polygon::*;
pub use point::*;
pub use polygon::*;
pub use ring::*;
pub use traits::*;
