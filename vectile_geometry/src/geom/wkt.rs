//! Well-Known Text rendering, used by `Display` and the describe dump.

use super::{Geometry, GeometryTrait};

impl Geometry {
	/// Renders the geometry as WKT, e.g. `POINT (1 2)` or `MULTIPOLYGON (((0 0, 1 0, 0 1, 0 0)))`.
	///
	/// Geometries without coordinates render as `<TYPE> EMPTY`.
	#[must_use]
	pub fn to_wkt(&self) -> String {
		let (keyword, body) = match self {
			Geometry::Point(g) => ("POINT", g.wkt_body()),
			Geometry::LineString(g) => ("LINESTRING", g.wkt_body()),
			Geometry::Polygon(g) => ("POLYGON", g.wkt_body()),
			Geometry::MultiPoint(g) => ("MULTIPOINT", g.wkt_body()),
			Geometry::MultiLineString(g) => ("MULTILINESTRING", g.wkt_body()),
			Geometry::MultiPolygon(g) => ("MULTIPOLYGON", g.wkt_body()),
			Geometry::Collection(c) => {
				let body = if c.is_empty() {
					String::from("EMPTY")
				} else {
					format!("({})", c.iter().map(Geometry::to_wkt).collect::<Vec<_>>().join(", "))
				};
				("GEOMETRYCOLLECTION", body)
			}
		};
		format!("{keyword} {body}")
	}
}
