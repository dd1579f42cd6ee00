//! Conversions from `geo` crate values, for providers that already hold `geo` geometries.

use super::*;

impl From<geo::Point<f64>> for Geometry {
	fn from(value: geo::Point<f64>) -> Self {
		Geometry::Point(PointGeometry::from(value))
	}
}

impl From<geo::LineString<f64>> for Geometry {
	fn from(value: geo::LineString<f64>) -> Self {
		Geometry::LineString(LineStringGeometry::from(value))
	}
}

impl From<geo::Polygon<f64>> for Geometry {
	fn from(value: geo::Polygon<f64>) -> Self {
		Geometry::Polygon(PolygonGeometry::from(value))
	}
}

impl From<geo::MultiPoint<f64>> for Geometry {
	fn from(value: geo::MultiPoint<f64>) -> Self {
		Geometry::MultiPoint(MultiPointGeometry::from(value))
	}
}

impl From<geo::MultiLineString<f64>> for Geometry {
	fn from(value: geo::MultiLineString<f64>) -> Self {
		Geometry::MultiLineString(MultiLineStringGeometry::from(value))
	}
}

impl From<geo::MultiPolygon<f64>> for Geometry {
	fn from(value: geo::MultiPolygon<f64>) -> Self {
		Geometry::MultiPolygon(MultiPolygonGeometry::from(value))
	}
}

impl From<geo::GeometryCollection<f64>> for Geometry {
	fn from(value: geo::GeometryCollection<f64>) -> Self {
		Geometry::Collection(GeometryCollection(value.into_iter().map(Geometry::from).collect()))
	}
}

/// `Line`, `Rect` and `Triangle` have no WKB counterpart and become a line string or a polygon.
impl From<geo::Geometry<f64>> for Geometry {
	fn from(value: geo::Geometry<f64>) -> Self {
		match value {
			geo::Geometry::Point(g) => Geometry::from(g),
			geo::Geometry::Line(g) => Geometry::from(geo::LineString::from(vec![g.start, g.end])),
			geo::Geometry::LineString(g) => Geometry::from(g),
			geo::Geometry::Polygon(g) => Geometry::from(g),
			geo::Geometry::MultiPoint(g) => Geometry::from(g),
			geo::Geometry::MultiLineString(g) => Geometry::from(g),
			geo::Geometry::MultiPolygon(g) => Geometry::from(g),
			geo::Geometry::GeometryCollection(g) => Geometry::from(g),
			geo::Geometry::Rect(g) => Geometry::from(g.to_polygon()),
			geo::Geometry::Triangle(g) => Geometry::from(g.to_polygon()),
		}
	}
}
