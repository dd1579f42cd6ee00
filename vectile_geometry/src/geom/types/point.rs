use super::{Coordinates, GeometryTrait, MultiPointGeometry, SingleGeometryTrait};
use anyhow::{Result, ensure};
use std::fmt::Debug;

/// A single position.
#[derive(Clone, PartialEq)]
pub struct PointGeometry(pub Coordinates);

impl PointGeometry {
	#[must_use]
	pub fn new(c: Coordinates) -> Self {
		Self(c)
	}

	#[must_use]
	pub fn x(&self) -> f64 {
		self.0.x()
	}

	#[must_use]
	pub fn y(&self) -> f64 {
		self.0.y()
	}

	#[must_use]
	pub fn as_coord(&self) -> &Coordinates {
		&self.0
	}
}

impl GeometryTrait for PointGeometry {
	fn area(&self) -> f64 {
		0.0
	}

	fn verify(&self) -> Result<()> {
		ensure!(self.0.is_finite(), "Point must have finite coordinates");
		Ok(())
	}

	fn iter_coords(&self) -> impl Iterator<Item = &Coordinates> {
		std::iter::once(&self.0)
	}

	fn map_coords(&self, f: &impl Fn(&Coordinates) -> Coordinates) -> Self {
		PointGeometry(f(&self.0))
	}

	fn wkt_body(&self) -> String {
		format!("({})", self.0.to_wkt())
	}
}

impl SingleGeometryTrait<MultiPointGeometry> for PointGeometry {
	fn into_multi(self) -> MultiPointGeometry {
		MultiPointGeometry(vec![self])
	}
}

impl Debug for PointGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		self.0.fmt(f)
	}
}

impl<T> From<T> for PointGeometry
where
	Coordinates: From<T>,
{
	fn from(value: T) -> Self {
		Self(Coordinates::from(value))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::CompositeGeometryTrait;

	#[test]
	fn new_and_accessors() {
		let point = PointGeometry::new(Coordinates::new(1.0, 2.0));
		assert_eq!(point.x(), 1.0);
		assert_eq!(point.y(), 2.0);
		assert_eq!(point.as_coord(), &Coordinates::new(1.0, 2.0));
	}

	#[test]
	fn debug_format() {
		assert_eq!(format!("{:?}", PointGeometry::from(&[1, 2])), "[1.0, 2.0]");
	}

	#[test]
	fn verify_rejects_nan() {
		assert!(PointGeometry::from([0.0, 0.0]).verify().is_ok());
		assert!(PointGeometry::from([f64::NAN, 0.0]).verify().is_err());
	}

	#[test]
	fn bbox_is_degenerate() {
		let bbox = PointGeometry::from([3.0, 7.0]).bbox();
		assert_eq!(bbox.as_array(), [3.0, 7.0, 3.0, 7.0]);
	}

	#[test]
	fn map_coords() {
		let point = PointGeometry::from([3.0, 7.0]).map_coords(&|c| Coordinates::new(c.x() * 2.0, -c.y()));
		assert_eq!(point, PointGeometry::from([6.0, -7.0]));
	}

	#[test]
	fn into_multi() {
		let multi = PointGeometry::from(&[1, 2]).into_multi();
		assert_eq!(multi.len(), 1);
		assert_eq!(multi.as_vec()[0], PointGeometry::from(&[1, 2]));
	}

	#[test]
	fn from_geo_point() {
		assert_eq!(PointGeometry::from(geo::Point::new(4.0, 5.0)), PointGeometry::from([4.0, 5.0]));
	}
}
