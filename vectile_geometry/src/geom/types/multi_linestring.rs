use super::{CompositeGeometryTrait, Coordinates, GeometryTrait, LineStringGeometry, wkt_list};
use anyhow::Result;
use std::fmt::Debug;

#[derive(Clone, PartialEq)]
pub struct MultiLineStringGeometry(pub Vec<LineStringGeometry>);

impl GeometryTrait for MultiLineStringGeometry {
	fn area(&self) -> f64 {
		0.0
	}

	fn verify(&self) -> Result<()> {
		for line in &self.0 {
			line.verify()?;
		}
		Ok(())
	}

	fn iter_coords(&self) -> impl Iterator<Item = &Coordinates> {
		self.0.iter().flat_map(|line| line.iter_coords())
	}

	fn map_coords(&self, f: &impl Fn(&Coordinates) -> Coordinates) -> Self {
		MultiLineStringGeometry(self.0.iter().map(|line| line.map_coords(f)).collect())
	}

	fn wkt_body(&self) -> String {
		wkt_list(self.0.iter().map(GeometryTrait::wkt_body))
	}
}

impl CompositeGeometryTrait<LineStringGeometry> for MultiLineStringGeometry {
	fn new() -> Self {
		Self(Vec::new())
	}
	fn as_vec(&self) -> &Vec<LineStringGeometry> {
		&self.0
	}
	fn as_mut_vec(&mut self) -> &mut Vec<LineStringGeometry> {
		&mut self.0
	}
	fn into_inner(self) -> Vec<LineStringGeometry> {
		self.0
	}
}

impl Debug for MultiLineStringGeometry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_list().entries(&self.0).finish()
	}
}

crate::impl_from_array!(MultiLineStringGeometry, LineStringGeometry);

impl From<geo::MultiLineString<f64>> for MultiLineStringGeometry {
	fn from(geometry: geo::MultiLineString<f64>) -> Self {
		MultiLineStringGeometry(geometry.into_iter().map(LineStringGeometry::from).collect())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn verify_checks_every_line() {
		assert!(MultiLineStringGeometry::from(&[vec![[0, 0], [1, 1]]]).verify().is_ok());
		assert!(
			MultiLineStringGeometry::from(&[vec![[0, 0], [1, 1]], vec![[2, 2]]])
				.verify()
				.is_err()
		);
	}

	#[test]
	fn wkt_body() {
		let multi = MultiLineStringGeometry::from(&[vec![[0, 0], [1, 1]], vec![[2, 2], [3, 3]]]);
		assert_eq!(multi.wkt_body(), "((0 0, 1 1), (2 2, 3 3))");
	}
}
