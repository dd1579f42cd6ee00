use super::*;
use crate::{
	Coordinates, Geometry, GeometryCollection, LineStringGeometry, MultiLineStringGeometry, MultiPointGeometry,
	MultiPolygonGeometry, PointGeometry, PolygonGeometry, RingGeometry,
};
use anyhow::{Context, Result};
use byteorder::{BigEndian, LittleEndian};

/// Nesting limit for multi geometries and collections.
const MAX_DEPTH: usize = 64;

// Smallest encoding of one counted element, used to reject counts that cannot fit.
const SIZE_COORDINATES: usize = 16;
const SIZE_RING: usize = 4;
const SIZE_POINT: usize = 1 + 4 + SIZE_COORDINATES;
const SIZE_COUNTED_GEOMETRY: usize = 1 + 4 + 4;
const SIZE_GEOMETRY: usize = 1 + 4;

/// Decodes one WKB geometry. Bytes after the geometry are ignored.
///
/// # Errors
/// Returns a [`TileError::Decode`] for truncated input, an invalid order marker, an unknown type
/// tag, a multi geometry element of the wrong type, or a count that exceeds the remaining bytes.
pub fn decode(data: &[u8]) -> Result<Geometry> {
	let mut reader = WkbReader::new(data);
	let geometry = reader.read_geometry(0)?;
	if reader.remaining() > 0 {
		log::trace!(
			"ignoring {} trailing bytes after WKB {}",
			reader.remaining(),
			geometry.type_name()
		);
	}
	Ok(geometry)
}

struct WkbReader<'a> {
	data: &'a [u8],
	position: usize,
}

impl<'a> WkbReader<'a> {
	fn new(data: &'a [u8]) -> Self {
		WkbReader { data, position: 0 }
	}

	fn remaining(&self) -> usize {
		self.data.len() - self.position
	}

	fn take(&mut self, length: usize) -> Result<&'a [u8]> {
		if length > self.remaining() {
			return Err(TileError::decode(format!(
				"unexpected end of input at offset {}: need {length} bytes, {} left",
				self.position,
				self.remaining()
			)));
		}
		let slice = &self.data[self.position..self.position + length];
		self.position += length;
		Ok(slice)
	}

	fn read_u8(&mut self) -> Result<u8> {
		Ok(self.take(1)?[0])
	}

	fn read_u32<E: byteorder::ByteOrder>(&mut self) -> Result<u32> {
		Ok(E::read_u32(self.take(4)?))
	}

	fn read_f64<E: byteorder::ByteOrder>(&mut self) -> Result<f64> {
		Ok(E::read_f64(self.take(8)?))
	}

	/// Reads a count and checks that `count` elements of at least `element_size` bytes fit.
	fn read_count<E: byteorder::ByteOrder>(&mut self, element_size: usize, what: &str) -> Result<usize> {
		let count = self.read_u32::<E>()? as usize;
		let needed = count.saturating_mul(element_size);
		if needed > self.remaining() {
			return Err(TileError::decode(format!(
				"{count} {what} need at least {needed} bytes, {} left",
				self.remaining()
			)));
		}
		Ok(count)
	}

	fn read_geometry(&mut self, depth: usize) -> Result<Geometry> {
		if depth > MAX_DEPTH {
			return Err(TileError::decode(format!(
				"geometries nested deeper than {MAX_DEPTH} levels"
			)));
		}
		match ByteOrder::from_marker(self.read_u8()?)? {
			ByteOrder::BigEndian => self.read_body::<BigEndian>(depth),
			ByteOrder::LittleEndian => self.read_body::<LittleEndian>(depth),
		}
	}

	fn read_body<E: byteorder::ByteOrder>(&mut self, depth: usize) -> Result<Geometry> {
		let tag = self.read_u32::<E>()?;
		let geometry = match tag {
			WKB_POINT => Geometry::Point(PointGeometry(self.read_coordinates::<E>()?)),
			WKB_LINE_STRING => Geometry::LineString(LineStringGeometry(self.read_coordinate_list::<E>()?)),
			WKB_POLYGON => Geometry::Polygon(self.read_polygon::<E>()?),
			WKB_MULTI_POINT => Geometry::MultiPoint(MultiPointGeometry(self.read_members::<E, _>(
				depth,
				SIZE_POINT,
				"MultiPoint",
				|g| match g {
					Geometry::Point(p) => Ok(p),
					other => Err(other),
				},
			)?)),
			WKB_MULTI_LINE_STRING => Geometry::MultiLineString(MultiLineStringGeometry(self.read_members::<E, _>(
				depth,
				SIZE_COUNTED_GEOMETRY,
				"MultiLineString",
				|g| match g {
					Geometry::LineString(l) => Ok(l),
					other => Err(other),
				},
			)?)),
			WKB_MULTI_POLYGON => Geometry::MultiPolygon(MultiPolygonGeometry(self.read_members::<E, _>(
				depth,
				SIZE_COUNTED_GEOMETRY,
				"MultiPolygon",
				|g| match g {
					Geometry::Polygon(p) => Ok(p),
					other => Err(other),
				},
			)?)),
			WKB_COLLECTION => Geometry::Collection(GeometryCollection(self.read_members::<E, _>(
				depth,
				SIZE_GEOMETRY,
				"GeometryCollection",
				Ok,
			)?)),
			other => return Err(TileError::decode(format!("unknown geometry type {other}"))),
		};
		Ok(geometry)
	}

	fn read_coordinates<E: byteorder::ByteOrder>(&mut self) -> Result<Coordinates> {
		let x = self.read_f64::<E>()?;
		let y = self.read_f64::<E>()?;
		Ok(Coordinates::new(x, y))
	}

	fn read_coordinate_list<E: byteorder::ByteOrder>(&mut self) -> Result<Vec<Coordinates>> {
		let count = self.read_count::<E>(SIZE_COORDINATES, "points")?;
		(0..count).map(|_| self.read_coordinates::<E>()).collect()
	}

	fn read_polygon<E: byteorder::ByteOrder>(&mut self) -> Result<PolygonGeometry> {
		let count = self.read_count::<E>(SIZE_RING, "rings")?;
		let mut rings = Vec::with_capacity(count);
		for _ in 0..count {
			rings.push(RingGeometry(self.read_coordinate_list::<E>()?));
		}
		Ok(PolygonGeometry(rings))
	}

	/// Reads a count followed by that many complete geometries, each accepted by `extract`.
	fn read_members<E: byteorder::ByteOrder, T>(
		&mut self,
		depth: usize,
		element_size: usize,
		parent: &str,
		extract: impl Fn(Geometry) -> Result<T, Geometry>,
	) -> Result<Vec<T>> {
		let count = self.read_count::<E>(element_size, "elements")?;
		let mut members = Vec::with_capacity(count);
		for index in 0..count {
			let geometry = self
				.read_geometry(depth + 1)
				.with_context(|| format!("while reading element {index} of {parent}"))?;
			match extract(geometry) {
				Ok(member) => members.push(member),
				Err(other) => {
					return Err(TileError::decode(format!(
						"element {index} of {parent} is a {}",
						other.type_name()
					)));
				}
			}
		}
		Ok(members)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use vectile_core::Blob;

	fn hex(text: &str) -> Blob {
		Blob::from_hex(text).unwrap()
	}

	fn decode_error(text: &str) -> String {
		let error = decode(hex(text).as_slice()).unwrap_err();
		match error.downcast_ref::<TileError>() {
			Some(TileError::Decode(msg)) => msg.clone(),
			other => panic!("expected a decode error, got {other:?}: {error:#}"),
		}
	}

	#[rstest]
	#[case::point_le("01 01000000 000000000000f03f 0000000000000040")]
	#[case::point_be("00 00000001 3ff0000000000000 4000000000000000")]
	fn point_in_both_orders(#[case] text: &str) -> Result<()> {
		assert_eq!(decode(hex(text).as_slice())?, Geometry::new_point([1, 2]));
		Ok(())
	}

	#[test]
	fn line_string() -> Result<()> {
		let blob = hex("01 02000000 02000000 0000000000002440 0000000000004440 0000000000004440 0000000000003e40");
		assert_eq!(
			decode(blob.as_slice())?,
			Geometry::new_line_string(vec![[10, 40], [40, 30]])
		);
		Ok(())
	}

	#[test]
	fn open_polygon_ring_stays_open() -> Result<()> {
		let blob = hex(
			"00 00000003 00000001 00000003
			 0000000000000000 0000000000000000
			 4024000000000000 0000000000000000
			 4024000000000000 4024000000000000",
		);
		let geometry = decode(blob.as_slice())?;
		assert_eq!(geometry, Geometry::new_polygon(vec![vec![[0, 0], [10, 0], [10, 10]]]));
		Ok(())
	}

	#[test]
	fn multi_point_with_mixed_orders() -> Result<()> {
		let blob = hex(
			"00 00000004 00000002
			 01 01000000 000000000000f03f 0000000000000040
			 00 00000001 4024000000000000 4034000000000000",
		);
		assert_eq!(
			decode(blob.as_slice())?,
			Geometry::new_multi_point(vec![[1, 2], [10, 20]])
		);
		Ok(())
	}

	#[test]
	fn nested_collection() -> Result<()> {
		let blob = hex(
			"01 07000000 02000000
			 01 01000000 000000000000f03f 0000000000000040
			 01 07000000 00000000",
		);
		assert_eq!(
			decode(blob.as_slice())?,
			Geometry::new_collection(vec![Geometry::new_point([1, 2]), Geometry::new_collection(vec![])])
		);
		Ok(())
	}

	#[test]
	fn trailing_bytes_are_ignored() -> Result<()> {
		let blob = hex("01 01000000 000000000000f03f 0000000000000040 ffff");
		assert_eq!(decode(blob.as_slice())?, Geometry::new_point([1, 2]));
		Ok(())
	}

	#[rstest]
	#[case::empty("", "unexpected end of input at offset 0")]
	#[case::short_point("01 01000000 000000000000f03f", "unexpected end of input at offset 13")]
	#[case::bad_marker("02 01000000", "invalid byte order marker 2")]
	#[case::unknown_tag("01 08000000", "unknown geometry type 8")]
	#[case::huge_count("01 02000000 ffffffff", "4294967295 points need at least")]
	#[case::huge_ring_count("01 03000000 ffffff0f 00000000", "268435455 rings need at least")]
	#[case::huge_collection("01 07000000 10000000 01 07000000 00000000", "16 elements need at least 80 bytes, 9 left")]
	#[case::wrong_element(
		"01 04000000 01000000 01 02000000 01000000 0000000000000000 0000000000000000",
		"element 0 of MultiPoint is a LineString"
	)]
	fn malformed_input(#[case] text: &str, #[case] message: &str) {
		let error = decode_error(text);
		assert!(error.contains(message), "{error}");
	}

	#[test]
	fn nested_errors_keep_their_category() {
		let error = decode(hex("01 05000000 01000000 01 02000000 01000000 00").as_slice()).unwrap_err();
		assert!(matches!(error.downcast_ref::<TileError>(), Some(TileError::Decode(_))));
		assert!(format!("{error:#}").starts_with("while reading element 0 of MultiLineString"));
	}

	#[test]
	fn nesting_limit() {
		let mut geometry = Geometry::new_collection(vec![]);
		for _ in 0..=MAX_DEPTH {
			geometry = Geometry::new_collection(vec![geometry]);
		}
		let blob = crate::wkb::encode(&geometry, ByteOrder::LittleEndian).unwrap();
		let error = decode(blob.as_slice()).unwrap_err();
		assert!(format!("{error:#}").contains("nested deeper than 64 levels"));
	}
}
