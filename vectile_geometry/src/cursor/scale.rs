use super::Cursor;
use crate::{Coordinates, Geometry};

impl Cursor {
	/// Maps one source position onto the tile grid, rounding half away from zero.
	///
	/// The Y axis is inverted: the top edge of the box becomes row 0.
	#[must_use]
	pub fn scale_coordinates(&self, c: &Coordinates) -> Coordinates {
		let extent = f64::from(self.extent);
		let x = (c.x() - self.bbox.x_min()) / self.bbox.width() * extent;
		let y = (self.bbox.y_max() - c.y()) / self.bbox.height() * extent;
		Coordinates::new(x.round(), y.round())
	}

	/// Returns a copy of `geometry` with every vertex scaled. The structure is kept as is.
	#[must_use]
	pub fn scale_geo(&self, geometry: &Geometry) -> Geometry {
		geometry.map_coords(&|c| self.scale_coordinates(c))
	}
}
