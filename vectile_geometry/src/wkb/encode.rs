use super::*;
use crate::{Coordinates, Geometry, PolygonGeometry, RingGeometry};
use anyhow::{Context, Result};
use vectile_core::{
	Blob,
	io::{ValueWriter, ValueWriterBlob},
};

/// Encodes `geometry` as WKB. Nested elements use the same byte order as the root.
///
/// Polygon rings that are stored open get their closing vertex written.
pub fn encode(geometry: &Geometry, order: ByteOrder) -> Result<Blob> {
	match order {
		ByteOrder::BigEndian => {
			let mut writer = ValueWriterBlob::new_be();
			write_geometry(&mut writer, geometry, order)?;
			Ok(writer.into_blob())
		}
		ByteOrder::LittleEndian => {
			let mut writer = ValueWriterBlob::new_le();
			write_geometry(&mut writer, geometry, order)?;
			Ok(writer.into_blob())
		}
	}
}

fn write_geometry<E: byteorder::ByteOrder>(
	writer: &mut impl ValueWriter<E>,
	geometry: &Geometry,
	order: ByteOrder,
) -> Result<()> {
	writer.write_u8(order.marker())?;
	match geometry {
		Geometry::Point(g) => {
			writer.write_u32(WKB_POINT)?;
			write_coordinates(writer, &g.0)?;
		}
		Geometry::LineString(g) => {
			writer.write_u32(WKB_LINE_STRING)?;
			write_count(writer, g.0.len())?;
			for c in &g.0 {
				write_coordinates(writer, c)?;
			}
		}
		Geometry::Polygon(g) => {
			writer.write_u32(WKB_POLYGON)?;
			write_polygon(writer, g)?;
		}
		Geometry::MultiPoint(g) => {
			writer.write_u32(WKB_MULTI_POINT)?;
			write_count(writer, g.0.len())?;
			for point in &g.0 {
				writer.write_u8(order.marker())?;
				writer.write_u32(WKB_POINT)?;
				write_coordinates(writer, &point.0)?;
			}
		}
		Geometry::MultiLineString(g) => {
			writer.write_u32(WKB_MULTI_LINE_STRING)?;
			write_count(writer, g.0.len())?;
			for line in &g.0 {
				writer.write_u8(order.marker())?;
				writer.write_u32(WKB_LINE_STRING)?;
				write_count(writer, line.0.len())?;
				for c in &line.0 {
					write_coordinates(writer, c)?;
				}
			}
		}
		Geometry::MultiPolygon(g) => {
			writer.write_u32(WKB_MULTI_POLYGON)?;
			write_count(writer, g.0.len())?;
			for polygon in &g.0 {
				writer.write_u8(order.marker())?;
				writer.write_u32(WKB_POLYGON)?;
				write_polygon(writer, polygon)?;
			}
		}
		Geometry::Collection(c) => {
			writer.write_u32(WKB_COLLECTION)?;
			write_count(writer, c.len())?;
			for (index, member) in c.iter().enumerate() {
				write_geometry(writer, member, order)
					.with_context(|| format!("while writing element {index} of GeometryCollection"))?;
			}
		}
	}
	Ok(())
}

fn write_polygon<E: byteorder::ByteOrder>(writer: &mut impl ValueWriter<E>, polygon: &PolygonGeometry) -> Result<()> {
	write_count(writer, polygon.0.len())?;
	for ring in &polygon.0 {
		write_ring(writer, ring)?;
	}
	Ok(())
}

fn write_ring<E: byteorder::ByteOrder>(writer: &mut impl ValueWriter<E>, ring: &RingGeometry) -> Result<()> {
	let closing = if ring.is_closed() { None } else { ring.0.first() };
	write_count(writer, ring.0.len() + usize::from(closing.is_some()))?;
	for c in ring.0.iter().chain(closing) {
		write_coordinates(writer, c)?;
	}
	Ok(())
}

fn write_count<E: byteorder::ByteOrder>(writer: &mut impl ValueWriter<E>, count: usize) -> Result<()> {
	let count = u32::try_from(count).with_context(|| format!("count {count} does not fit into a WKB u32"))?;
	writer.write_u32(count)
}

fn write_coordinates<E: byteorder::ByteOrder>(writer: &mut impl ValueWriter<E>, c: &Coordinates) -> Result<()> {
	writer.write_f64(c.x())?;
	writer.write_f64(c.y())
}
