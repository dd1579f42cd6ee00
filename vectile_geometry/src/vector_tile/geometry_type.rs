use crate::{Geometry, TileError};
use anyhow::Result;
use std::fmt::{self, Display};

/// Wire-level geometry type of an MVT feature.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum GeomType {
	#[default]
	Unknown = 0,
	Point = 1,
	LineString = 2,
	Polygon = 3,
}

impl GeomType {
	#[must_use]
	pub fn as_u64(&self) -> u64 {
		*self as u64
	}
}

impl From<u64> for GeomType {
	fn from(value: u64) -> Self {
		match value {
			1 => GeomType::Point,
			2 => GeomType::LineString,
			3 => GeomType::Polygon,
			_ => GeomType::Unknown,
		}
	}
}

/// Single and multi variants share a type. Collections have none and must be split first.
impl TryFrom<&Geometry> for GeomType {
	type Error = anyhow::Error;

	fn try_from(geometry: &Geometry) -> Result<Self> {
		use Geometry::*;
		match geometry {
			Point(_) | MultiPoint(_) => Ok(GeomType::Point),
			LineString(_) | MultiLineString(_) => Ok(GeomType::LineString),
			Polygon(_) | MultiPolygon(_) => Ok(GeomType::Polygon),
			Collection(_) => Err(collection_error()),
		}
	}
}

pub(crate) fn collection_error() -> anyhow::Error {
	TileError::assembly("a GeometryCollection cannot be written as one feature, split it first")
}

impl Display for GeomType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			GeomType::Unknown => "Unknown",
			GeomType::Point => "Point",
			GeomType::LineString => "LineString",
			GeomType::Polygon => "Polygon",
		})
	}
}
