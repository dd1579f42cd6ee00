//! Per-tile transform from source coordinates into the tile-local grid.
//!
//! A [`Cursor`] holds only the affine map and the clip rectangle, so one cursor can be shared
//! between threads and reused for every geometry of a tile. Geometries always pass through
//! [`Cursor::scale_geo`] first, then the optional [`Cursor::simplify_geo`], and
//! [`Cursor::clip_geo`] last; [`Cursor::transform`] runs all three.

mod clip;
mod scale;
mod simplify;

use crate::Geometry;
use anyhow::{Result, ensure};
use std::fmt::Debug;
use vectile_core::{BoundingBox, PipelineConfig, TileCoord};

#[derive(Clone, Copy, PartialEq)]
pub struct Cursor {
	bbox: BoundingBox,
	extent: u32,
	buffer: u32,
	simplify: Option<f64>,
}

impl Cursor {
	/// Creates a cursor mapping `bbox` onto `[0, extent]²` with `buffer` units of margin.
	pub fn new(bbox: BoundingBox, extent: u32, buffer: u32) -> Result<Cursor> {
		ensure!(
			bbox.as_array().iter().all(|v| v.is_finite()),
			"cursor bounding box must be finite, got {bbox:?}"
		);
		ensure!(
			bbox.width() > 0.0 && bbox.height() > 0.0,
			"cursor bounding box must have a positive width and height, got {bbox:?}"
		);
		ensure!(extent > 0, "cursor extent must be greater than 0");
		Ok(Cursor {
			bbox,
			extent,
			buffer,
			simplify: None,
		})
	}

	/// Cursor for the tile `coord`, in the coordinate system and grid of `config`.
	///
	/// Simplification is switched on when `config` asks for it at `coord.z`.
	pub fn for_tile(coord: &TileCoord, config: &PipelineConfig) -> Result<Cursor> {
		let cursor = Cursor::new(config.tile_bbox(coord)?, config.extent, config.buffer)?;
		Ok(if config.simplifies_at(coord.z) {
			cursor.with_simplification(config.simplify_tolerance)
		} else {
			cursor
		})
	}

	/// Enables simplification in [`Cursor::transform`] with `tolerance` tile-local units. A
	/// tolerance that is not a positive number switches it off.
	#[must_use]
	pub fn with_simplification(mut self, tolerance: f64) -> Cursor {
		self.simplify = (tolerance.is_finite() && tolerance > 0.0).then_some(tolerance);
		self
	}

	/// The simplification tolerance, if simplification is on.
	#[must_use]
	pub fn simplification(&self) -> Option<f64> {
		self.simplify
	}

	#[must_use]
	pub fn bbox(&self) -> &BoundingBox {
		&self.bbox
	}

	#[must_use]
	pub fn extent(&self) -> u32 {
		self.extent
	}

	#[must_use]
	pub fn buffer(&self) -> u32 {
		self.buffer
	}

	/// Corners of the clip rectangle: `[-buffer, -buffer]` and `[extent + buffer, extent + buffer]`.
	#[must_use]
	pub fn min_max(&self) -> ([f64; 2], [f64; 2]) {
		let buffer = f64::from(self.buffer);
		let max = f64::from(self.extent) + buffer;
		([-buffer, -buffer], [max, max])
	}

	/// Scales, simplifies and then clips `geometry`. `None` means nothing of it is left for the
	/// tile.
	pub fn transform(&self, geometry: &Geometry) -> Result<Option<Geometry>> {
		match self.simplify_geo(&self.scale_geo(geometry)) {
			Some(simplified) => self.clip_geo(&simplified),
			None => Ok(None),
		}
	}
}

impl Debug for Cursor {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Cursor")
			.field("bbox", &self.bbox.as_array())
			.field("extent", &self.extent)
			.field("buffer", &self.buffer)
			.field("simplify", &self.simplify)
			.finish()
	}
}
