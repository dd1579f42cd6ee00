//! Well-Known Binary codec.
//!
//! Every geometry starts with a one-byte order marker (`0` big endian, `1` little endian) and a
//! `u32` type tag. Counts are `u32`, coordinates raw `f64`. Elements of multi geometries and
//! collections are complete geometries with their own marker, so byte orders may be mixed within
//! one value.

mod decode;
mod encode;

pub use decode::decode;
pub use encode::encode;

use crate::TileError;
use anyhow::Result;

pub(crate) const WKB_POINT: u32 = 1;
pub(crate) const WKB_LINE_STRING: u32 = 2;
pub(crate) const WKB_POLYGON: u32 = 3;
pub(crate) const WKB_MULTI_POINT: u32 = 4;
pub(crate) const WKB_MULTI_LINE_STRING: u32 = 5;
pub(crate) const WKB_MULTI_POLYGON: u32 = 6;
pub(crate) const WKB_COLLECTION: u32 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum ByteOrder {
	BigEndian,
	#[default]
	LittleEndian,
}

impl ByteOrder {
	/// Interprets a WKB order marker.
	pub fn from_marker(marker: u8) -> Result<ByteOrder> {
		match marker {
			0 => Ok(ByteOrder::BigEndian),
			1 => Ok(ByteOrder::LittleEndian),
			_ => Err(TileError::decode(format!("invalid byte order marker {marker}"))),
		}
	}

	#[must_use]
	pub fn marker(self) -> u8 {
		match self {
			ByteOrder::BigEndian => 0,
			ByteOrder::LittleEndian => 1,
		}
	}
}
