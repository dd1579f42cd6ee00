use super::Cursor;
use crate::{
	Coordinates, Geometry, GeometryCollection, GeometryTrait, LineStringGeometry, MultiLineStringGeometry,
	MultiPolygonGeometry, PolygonGeometry, RingGeometry,
};
use geo::{Euclidean, Length, Simplify};
use log::trace;

/// Paths with at most this many vertices are left as they are.
const MIN_VERTICES: usize = 4;

impl Cursor {
	/// Douglas–Peucker simplification of tile-local `geometry`, using the tolerance set with
	/// [`Cursor::with_simplification`]. Without one the geometry is returned unchanged.
	///
	/// Short paths are kept as they are: lines and rings with at most four vertices, lines
	/// shorter than the tolerance and rings with an area below the squared tolerance. A ring
	/// that collapses to fewer than three distinct vertices is removed, and when that ring is the
	/// exterior the whole polygon goes with it. Points pass through. `None` when nothing is left.
	#[must_use]
	pub fn simplify_geo(&self, geometry: &Geometry) -> Option<Geometry> {
		match self.simplify {
			Some(tolerance) => simplify(geometry, tolerance),
			None => Some(geometry.clone()),
		}
	}
}

fn simplify(geometry: &Geometry, tolerance: f64) -> Option<Geometry> {
	match geometry {
		Geometry::Point(_) | Geometry::MultiPoint(_) => Some(geometry.clone()),
		Geometry::LineString(line) => Some(Geometry::LineString(simplify_line(line, tolerance))),
		Geometry::MultiLineString(multi) => Some(Geometry::MultiLineString(MultiLineStringGeometry(
			multi.0.iter().map(|line| simplify_line(line, tolerance)).collect(),
		))),
		Geometry::Polygon(polygon) => simplify_polygon(polygon, tolerance).map(Geometry::Polygon),
		Geometry::MultiPolygon(multi) => {
			let polygons: Vec<PolygonGeometry> =
				multi.0.iter().filter_map(|polygon| simplify_polygon(polygon, tolerance)).collect();
			(!polygons.is_empty()).then(|| Geometry::MultiPolygon(MultiPolygonGeometry(polygons)))
		}
		Geometry::Collection(collection) => {
			let members: Vec<Geometry> = collection.iter().filter_map(|member| simplify(member, tolerance)).collect();
			(!members.is_empty()).then(|| Geometry::Collection(GeometryCollection(members)))
		}
	}
}

fn to_geo(coords: &[Coordinates]) -> geo::LineString<f64> {
	coords.iter().copied().map(geo::Coord::from).collect()
}

fn simplify_line(line: &LineStringGeometry, tolerance: f64) -> LineStringGeometry {
	if line.0.len() <= MIN_VERTICES {
		return line.clone();
	}
	let path = to_geo(&line.0);
	if Euclidean.length(&path) < tolerance {
		return line.clone();
	}
	LineStringGeometry::from(path.simplify(tolerance))
}

fn simplify_polygon(polygon: &PolygonGeometry, tolerance: f64) -> Option<PolygonGeometry> {
	let mut rings = Vec::with_capacity(polygon.0.len());
	for (index, ring) in polygon.0.iter().enumerate() {
		if ring.area() < tolerance * tolerance || ring.distinct_vertex_count() <= MIN_VERTICES {
			if index == 0 {
				return Some(polygon.clone());
			}
			rings.push(ring.clone());
			continue;
		}

		let mut closed = ring.clone();
		closed.close();
		let simplified = RingGeometry::from(to_geo(&closed.0).simplify(tolerance));
		if simplified.distinct_vertex_count() < 3 {
			if index == 0 {
				trace!("dropping polygon, its exterior ring collapsed during simplification");
				return None;
			}
			trace!("dropping ring {index}, it collapsed during simplification");
			continue;
		}
		rings.push(simplified);
	}
	Some(PolygonGeometry(rings))
}
