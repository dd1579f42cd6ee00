//! Web Mercator tile coordinates.
//!
//! A [`TileCoord`] addresses one tile of the XYZ pyramid and knows the envelope it covers, both in
//! EPSG:3857 metres and in EPSG:4326 degrees. The envelope is what a
//! `Cursor` needs to map source coordinates onto the tile grid.
//!
//! ```
//! use vectile_core::TileCoord;
//!
//! let coord: TileCoord = "10/178/411".parse().unwrap();
//! let bbox = coord.bbox_mercator();
//! assert!(bbox.contains_point(-13049156.64, 3914787.60));
//! ```

use crate::BoundingBox;
use anyhow::{Context, Result, bail, ensure};
use std::{
	f64::consts::PI,
	fmt::{self, Debug, Display},
	str::FromStr,
};

/// Half the width of the EPSG:3857 world square, in metres.
pub const WEB_MERCATOR_HALF_SIZE: f64 = 20037508.342789244;

/// Highest supported zoom level.
pub const MAX_ZOOM: u8 = 30;

/// A tile address `z/x/y` with the origin in the north-west corner.
#[derive(Eq, PartialEq, Clone, Hash, Copy)]
pub struct TileCoord {
	pub z: u8,
	pub x: u32,
	pub y: u32,
}

impl TileCoord {
	/// # Errors
	/// Returns an error if `z` > 30 or `x`/`y` do not exist at that zoom level.
	pub fn new(z: u8, x: u32, y: u32) -> Result<TileCoord> {
		ensure!(z <= MAX_ZOOM, "z ({z}) must be <= {MAX_ZOOM}");
		let max = 1u32 << z;
		ensure!(x < max, "x ({x}) out of bounds for zoom level {z}");
		ensure!(y < max, "y ({y}) out of bounds for zoom level {z}");
		Ok(TileCoord { z, x, y })
	}

	/// Finds the tile at zoom `z` containing the WGS84 position `lon`/`lat`.
	///
	/// Latitudes beyond the Mercator limit end up in the first or last row.
	pub fn from_lonlat(lon: f64, lat: f64, z: u8) -> Result<TileCoord> {
		ensure!(z <= MAX_ZOOM, "z ({z}) must be <= {MAX_ZOOM}");
		ensure!((-180.0..=180.0).contains(&lon), "longitude ({lon}) must be within [-180, 180]");
		ensure!((-90.0..=90.0).contains(&lat), "latitude ({lat}) must be within [-90, 90]");

		let zoom = f64::from(1u32 << z);
		let x = zoom * (lon / 360.0 + 0.5);
		let y = zoom * (0.5 - 0.5 * (lat * PI / 360.0 + PI / 4.0).tan().ln() / PI);

		let clamp = |v: f64| v.max(0.0).min(zoom - 1.0).floor();

		TileCoord::new(z, clamp(x) as u32, clamp(y) as u32)
			.with_context(|| format!("Failed to find tile for ({lon}, {lat}) at zoom {z}"))
	}

	/// Longitude/latitude of the north-west corner of tile `x`/`y` at zoom `z`.
	fn corner_lonlat(z: u8, x: u32, y: u32) -> [f64; 2] {
		let zoom = f64::from(1u32 << z);
		[
			(f64::from(x) / zoom - 0.5) * 360.0,
			((PI * (1.0 - 2.0 * f64::from(y) / zoom)).exp().atan() / PI - 0.25) * 360.0,
		]
	}

	/// Longitude/latitude of the north-west corner of this tile.
	#[must_use]
	pub fn to_lonlat(&self) -> [f64; 2] {
		TileCoord::corner_lonlat(self.z, self.x, self.y)
	}

	/// Width of one tile at this zoom level, in metres.
	#[must_use]
	pub fn tile_size_mercator(&self) -> f64 {
		2.0 * WEB_MERCATOR_HALF_SIZE / f64::from(1u32 << self.z)
	}

	/// Envelope of the tile in EPSG:3857.
	#[must_use]
	pub fn bbox_mercator(&self) -> BoundingBox {
		let size = self.tile_size_mercator();
		let x_min = -WEB_MERCATOR_HALF_SIZE + f64::from(self.x) * size;
		let y_max = WEB_MERCATOR_HALF_SIZE - f64::from(self.y) * size;
		BoundingBox {
			min: [x_min, y_max - size],
			max: [x_min + size, y_max],
		}
	}

	/// Envelope of the tile in EPSG:4326.
	#[must_use]
	pub fn bbox_lonlat(&self) -> BoundingBox {
		let [x_min, y_max] = self.to_lonlat();
		let [x_max, y_min] = TileCoord::corner_lonlat(self.z, self.x + 1, self.y + 1);
		BoundingBox {
			min: [x_min, y_min],
			max: [x_max, y_max],
		}
	}

	/// Envelope in the coordinate system identified by `srid`.
	///
	/// # Errors
	/// Only 3857 and 4326 are supported.
	pub fn bbox_for_srid(&self, srid: u32) -> Result<BoundingBox> {
		match srid {
			3857 => Ok(self.bbox_mercator()),
			4326 => Ok(self.bbox_lonlat()),
			_ => bail!("unsupported srid {srid}, expected 3857 or 4326"),
		}
	}

	/// Metres per tile-local unit for a grid of `extent` units.
	#[must_use]
	pub fn resolution(&self, extent: u32) -> f64 {
		self.tile_size_mercator() / f64::from(extent)
	}
}

impl FromStr for TileCoord {
	type Err = anyhow::Error;

	/// Parses `"z/x/y"`.
	fn from_str(text: &str) -> Result<Self> {
		let parts: Vec<&str> = text.trim().split('/').collect();
		ensure!(parts.len() == 3, "tile must be given as z/x/y, got '{text}'");
		let z = parts[0].parse::<u8>().with_context(|| format!("invalid zoom level '{}'", parts[0]))?;
		let x = parts[1].parse::<u32>().with_context(|| format!("invalid x '{}'", parts[1]))?;
		let y = parts[2].parse::<u32>().with_context(|| format!("invalid y '{}'", parts[2]))?;
		TileCoord::new(z, x, y)
	}
}

impl Display for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}/{}", self.z, self.x, self.y)
	}
}

impl Debug for TileCoord {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileCoord({}, [{}, {}])", self.z, self.x, self.y)
	}
}
