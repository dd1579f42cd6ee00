use super::{CompositeGeometryTrait, Coordinates, GeometryTrait, wkt_list};
use anyhow::{Result, ensure};
use std::fmt::Debug;

/// A polygon ring.
///
/// Rings are implicitly closed: the closing vertex may be stored or omitted, and consumers that
/// need it (the WKB encoder, winding) add it on the fly.
#[derive(Clone, PartialEq)]
pub struct RingGeometry(pub Vec<Coordinates>);

impl RingGeometry {
	#[must_use]
	pub fn is_closed(&self) -> bool {
		self.0.len() > 1 && self.0.first() == self.0.last()
	}

	/// Appends the first vertex if the ring is not explicitly closed yet.
	pub fn close(&mut self) {
		if let Some(first) = self.0.first().copied()
			&& !self.is_closed()
		{
			self.0.push(first);
		}
	}

	/// Signed shoelace area over the implicitly closed ring.
	///
	/// Positive means clockwise in a Y-down plane (tile space), counter clockwise in a Y-up plane.
	#[must_use]
	pub fn signed_area(&self) -> f64 {
		let mut sum = 0f64;
		if let Some(mut p1) = self.0.last() {
			for p2 in &self.0 {
				sum += p1.x() * p2.y() - p2.x() * p1.y();
				p1 = p2;
			}
		}
		sum / 2.0
	}

	/// Number of distinct vertices, ignoring consecutive repeats and the closing vertex.
	#[must_use]
	pub fn distinct_vertex_count(&self) -> usize {
		let mut count = 0;
		let mut previous: Option<&Coordinates> = None;
		for coord in &self.0 {
			if previous != Some(coord) {
				count += 1;
			}
			previous = Some(coord);
		}
		if count > 1 && self.is_closed() {
			count -= 1;
		}
		count
	}
}

impl GeometryTrait for RingGeometry {
	fn area(&self) -> f64 {
		self.signed_area().abs()
	}

	fn verify(&self) -> Result<()> {
		ensure!(self.0.len() >= 4, "Ring must have at least 4 points");
		ensure!(self.is_closed(), "Ring must be closed");
		Ok(())
	}

	fn iter_coords(&self) -> impl Iterator<Item = &Coordinates> {
		self.0.iter()
	}

	fn map_coords(&self, f: &impl Fn(&Coordinates) -> Coordinates) -> Self {
		RingGeometry(self.0.iter().map(f).collect())
	}

	fn wkt_body(&self) -> String {
		wkt_list(self.0.iter().map(|c| c.to_wkt()))
	}
}

impl CompositeGeometryTrait<Coordinates> for RingGeometry {
	fn new() -> Self {
		Self(Vec::new())
	}
	fn as_vec(&self) -> &Vec<Coordinates> {
		&self.0
	}
	fn as_mut_vec(&mut self) -> &mut Vec<Coordinates> {
		&mut self.0
	}
	fn into_inner(self) -> Vec<Coordinates> {
		self.0
	}
}

impl Debug for RingGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(RingGeometry, Coordinates);

impl From<geo::LineString<f64>> for RingGeometry {
	fn from(geometry: geo::LineString<f64>) -> Self {
		RingGeometry(geometry.into_iter().map(Coordinates::from).collect())
	}
}
