use super::*;
use anyhow::{Result, ensure};
use std::fmt::Debug;

/// A polygon: ring 0 is the exterior, every further ring a hole.
#[derive(Clone, PartialEq)]
pub struct PolygonGeometry(pub Vec<RingGeometry>);

impl PolygonGeometry {
	#[must_use]
	pub fn exterior(&self) -> Option<&RingGeometry> {
		self.0.first()
	}

	pub fn holes(&self) -> impl Iterator<Item = &RingGeometry> {
		self.0.iter().skip(1)
	}
}

impl GeometryTrait for PolygonGeometry {
	fn area(&self) -> f64 {
		let exterior = self.exterior().map_or(0.0, GeometryTrait::area);
		exterior - self.holes().map(GeometryTrait::area).sum::<f64>()
	}

	fn verify(&self) -> Result<()> {
		ensure!(!self.0.is_empty(), "Polygon must have at least one ring");
		for ring in &self.0 {
			ring.verify()?;
		}
		Ok(())
	}

	fn iter_coords(&self) -> impl Iterator<Item = &Coordinates> {
		self.0.iter().flat_map(|ring| ring.iter_coords())
	}

	fn map_coords(&self, f: &impl Fn(&Coordinates) -> Coordinates) -> Self {
		PolygonGeometry(self.0.iter().map(|ring| ring.map_coords(f)).collect())
	}

	fn wkt_body(&self) -> String {
		wkt_list(self.0.iter().map(GeometryTrait::wkt_body))
	}
}

impl SingleGeometryTrait<MultiPolygonGeometry> for PolygonGeometry {
	fn into_multi(self) -> MultiPolygonGeometry {
		MultiPolygonGeometry(vec![self])
	}
}

impl CompositeGeometryTrait<RingGeometry> for PolygonGeometry {
	fn new() -> Self {
		Self(Vec::new())
	}
	fn as_vec(&self) -> &Vec<RingGeometry> {
		&self.0
	}
	fn as_mut_vec(&mut self) -> &mut Vec<RingGeometry> {
		&mut self.0
	}
	fn into_inner(self) -> Vec<RingGeometry> {
		self.0
	}
}

impl Debug for PolygonGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(PolygonGeometry, RingGeometry);

impl From<geo::Polygon<f64>> for PolygonGeometry {
	fn from(geometry: geo::Polygon<f64>) -> Self {
		let (exterior, interiors) = geometry.into_inner();
		let mut rings = Vec::with_capacity(interiors.len() + 1);
		rings.push(RingGeometry::from(exterior));
		for interior in interiors {
			rings.push(RingGeometry::from(interior));
		}
		PolygonGeometry(rings)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn square_with_hole() -> PolygonGeometry {
		PolygonGeometry::from(&[
			vec![[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
			vec![[2, 2], [2, 4], [4, 4], [4, 2], [2, 2]],
		])
	}

	#[test]
	fn area_subtracts_holes() {
		assert_eq!(square_with_hole().area(), 96.0);
		assert_eq!(PolygonGeometry::new().area(), 0.0);
	}

	#[test]
	fn exterior_and_holes() {
		let polygon = square_with_hole();
		assert_eq!(polygon.exterior().map(CompositeGeometryTrait::len), Some(5));
		assert_eq!(polygon.holes().count(), 1);
	}

	#[test]
	fn verify() {
		assert!(square_with_hole().verify().is_ok());
		assert!(PolygonGeometry::new().verify().is_err());
	}

	#[test]
	fn wkt_body() {
		let polygon = PolygonGeometry::from(&[[[0, 0], [1, 0], [0, 1], [0, 0]]]);
		assert_eq!(polygon.wkt_body(), "((0 0, 1 0, 0 1, 0 0))");
	}

	#[test]
	fn vertex_count_spans_rings() {
		assert_eq!(square_with_hole().vertex_count(), 10);
	}

	#[test]
	fn from_geo_polygon() {
		let polygon = geo::Polygon::new(
			geo::LineString::from(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 0.0)]),
			vec![geo::LineString::from(vec![(1.0, 1.0), (2.0, 1.0), (2.0, 2.0), (1.0, 1.0)])],
		);
		let converted = PolygonGeometry::from(polygon);
		assert_eq!(converted.len(), 2);
		assert_eq!(converted.0[1].0[1], Coordinates::new(2.0, 1.0));
	}
}
