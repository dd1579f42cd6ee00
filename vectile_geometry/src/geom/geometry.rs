use super::*;
use std::fmt::{Debug, Display};
use vectile_core::BoundingBox;

/// A heterogeneous, possibly nested list of geometries.
#[derive(Clone, PartialEq, Default)]
pub struct GeometryCollection(pub Vec<Geometry>);

impl GeometryCollection {
	#[must_use]
	pub fn new() -> Self {
		Self(Vec::new())
	}

	pub fn push(&mut self, geometry: Geometry) {
		self.0.push(geometry);
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.0.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn iter(&self) -> std::slice::Iter<'_, Geometry> {
		self.0.iter()
	}
}

impl Debug for GeometryCollection {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

impl From<Vec<Geometry>> for GeometryCollection {
	fn from(geometries: Vec<Geometry>) -> Self {
		Self(geometries)
	}
}

/// Any supported geometry.
///
/// Every consumer matches all variants; `Collection` is recursive.
#[derive(Clone, PartialEq)]
pub enum Geometry {
	Point(PointGeometry),
	LineString(LineStringGeometry),
	Polygon(PolygonGeometry),
	MultiPoint(MultiPointGeometry),
	MultiLineString(MultiLineStringGeometry),
	MultiPolygon(MultiPolygonGeometry),
	Collection(GeometryCollection),
}

impl Geometry {
	pub fn new_point<T>(value: T) -> Self
	where
		PointGeometry: From<T>,
	{
		Self::Point(PointGeometry::from(value))
	}
	pub fn new_line_string<T>(value: T) -> Self
	where
		LineStringGeometry: From<T>,
	{
		Self::LineString(LineStringGeometry::from(value))
	}
	pub fn new_polygon<T>(value: T) -> Self
	where
		PolygonGeometry: From<T>,
	{
		Self::Polygon(PolygonGeometry::from(value))
	}
	pub fn new_multi_point<T>(value: T) -> Self
	where
		MultiPointGeometry: From<T>,
	{
		Self::MultiPoint(MultiPointGeometry::from(value))
	}
	pub fn new_multi_line_string<T>(value: T) -> Self
	where
		MultiLineStringGeometry: From<T>,
	{
		Self::MultiLineString(MultiLineStringGeometry::from(value))
	}
	pub fn new_multi_polygon<T>(value: T) -> Self
	where
		MultiPolygonGeometry: From<T>,
	{
		Self::MultiPolygon(MultiPolygonGeometry::from(value))
	}
	pub fn new_collection(geometries: Vec<Geometry>) -> Self {
		Self::Collection(GeometryCollection(geometries))
	}

	/// OGC type name: `"Point"`, `"MultiPolygon"`, `"GeometryCollection"`, ...
	#[must_use]
	pub fn type_name(&self) -> &'static str {
		match self {
			Geometry::Point(_) => "Point",
			Geometry::LineString(_) => "LineString",
			Geometry::Polygon(_) => "Polygon",
			Geometry::MultiPoint(_) => "MultiPoint",
			Geometry::MultiLineString(_) => "MultiLineString",
			Geometry::MultiPolygon(_) => "MultiPolygon",
			Geometry::Collection(_) => "GeometryCollection",
		}
	}

	/// Total number of vertices, recursing into collections.
	#[must_use]
	pub fn vertex_count(&self) -> usize {
		match self {
			Geometry::Point(g) => g.vertex_count(),
			Geometry::LineString(g) => g.vertex_count(),
			Geometry::Polygon(g) => g.vertex_count(),
			Geometry::MultiPoint(g) => g.vertex_count(),
			Geometry::MultiLineString(g) => g.vertex_count(),
			Geometry::MultiPolygon(g) => g.vertex_count(),
			Geometry::Collection(c) => c.iter().map(Geometry::vertex_count).sum(),
		}
	}

	/// `true` when the geometry holds no coordinates at all.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.vertex_count() == 0
	}

	/// Envelope of every vertex, recursing into collections. Empty geometries give the zero box.
	#[must_use]
	pub fn bbox(&self) -> BoundingBox {
		match self {
			Geometry::Point(g) => g.bbox(),
			Geometry::LineString(g) => g.bbox(),
			Geometry::Polygon(g) => g.bbox(),
			Geometry::MultiPoint(g) => g.bbox(),
			Geometry::MultiLineString(g) => g.bbox(),
			Geometry::MultiPolygon(g) => g.bbox(),
			Geometry::Collection(c) => {
				let mut boxes = c.iter().filter(|g| !g.is_empty()).map(Geometry::bbox);
				match boxes.next() {
					Some(first) => boxes.fold(first, |mut acc, bbox| {
						acc.extend(&bbox);
						acc
					}),
					None => BoundingBox::zero(),
				}
			}
		}
	}

	/// Unsigned area, recursing into collections.
	#[must_use]
	pub fn area(&self) -> f64 {
		match self {
			Geometry::Point(g) => g.area(),
			Geometry::LineString(g) => g.area(),
			Geometry::Polygon(g) => g.area(),
			Geometry::MultiPoint(g) => g.area(),
			Geometry::MultiLineString(g) => g.area(),
			Geometry::MultiPolygon(g) => g.area(),
			Geometry::Collection(c) => c.iter().map(Geometry::area).sum(),
		}
	}

	pub fn verify(&self) -> anyhow::Result<()> {
		match self {
			Geometry::Point(g) => g.verify(),
			Geometry::LineString(g) => g.verify(),
			Geometry::Polygon(g) => g.verify(),
			Geometry::MultiPoint(g) => g.verify(),
			Geometry::MultiLineString(g) => g.verify(),
			Geometry::MultiPolygon(g) => g.verify(),
			Geometry::Collection(c) => c.iter().try_for_each(Geometry::verify),
		}
	}

	/// Returns a copy with `f` applied to every vertex, recursing into collections.
	#[must_use]
	pub fn map_coords(&self, f: &impl Fn(&Coordinates) -> Coordinates) -> Geometry {
		match self {
			Geometry::Point(g) => Geometry::Point(g.map_coords(f)),
			Geometry::LineString(g) => Geometry::LineString(g.map_coords(f)),
			Geometry::Polygon(g) => Geometry::Polygon(g.map_coords(f)),
			Geometry::MultiPoint(g) => Geometry::MultiPoint(g.map_coords(f)),
			Geometry::MultiLineString(g) => Geometry::MultiLineString(g.map_coords(f)),
			Geometry::MultiPolygon(g) => Geometry::MultiPolygon(g.map_coords(f)),
			Geometry::Collection(c) => {
				Geometry::Collection(GeometryCollection(c.iter().map(|g| g.map_coords(f)).collect()))
			}
		}
	}

	/// Promotes single geometries to their multi variant. Multi variants and collections are
	/// returned unchanged.
	#[must_use]
	pub fn into_multi(self) -> Self {
		match self {
			Geometry::Point(g) => Geometry::MultiPoint(g.into_multi()),
			Geometry::LineString(g) => Geometry::MultiLineString(g.into_multi()),
			Geometry::Polygon(g) => Geometry::MultiPolygon(g.into_multi()),
			Geometry::MultiPoint(_) | Geometry::MultiLineString(_) | Geometry::MultiPolygon(_) | Geometry::Collection(_) => {
				self
			}
		}
	}

	#[must_use]
	pub fn is_collection(&self) -> bool {
		matches!(self, Geometry::Collection(_))
	}

	pub fn new_example() -> Self {
		Self::new_multi_polygon(vec![
			vec![
				vec![[0.0, 0.0], [5.0, 0.0], [2.5, 4.0], [0.0, 0.0]],
				vec![[2.0, 1.0], [2.5, 2.0], [3.0, 1.0], [2.0, 1.0]],
			],
			vec![
				vec![[6.0, 0.0], [9.0, 0.0], [9.0, 4.0], [6.0, 4.0], [6.0, 0.0]],
				vec![[7.0, 1.0], [7.0, 3.0], [8.0, 3.0], [8.0, 1.0], [7.0, 1.0]],
			],
		])
	}
}

impl Debug for Geometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let inner: &dyn Debug = match self {
			Geometry::Point(g) => g,
			Geometry::LineString(g) => g,
			Geometry::Polygon(g) => g,
			Geometry::MultiPoint(g) => g,
			Geometry::MultiLineString(g) => g,
			Geometry::MultiPolygon(g) => g,
			Geometry::Collection(g) => g,
		};
		f.debug_tuple(self.type_name()).field(inner).finish()
	}
}

impl Display for Geometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.to_wkt())
	}
}
