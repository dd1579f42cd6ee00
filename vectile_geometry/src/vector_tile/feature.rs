use super::{
	geometry_type::{GeomType, collection_error},
	property_manager::PropertyManager,
};
use crate::{
	Coordinates, Feature, Geometry, LineStringGeometry, MultiLineStringGeometry, MultiPointGeometry,
	MultiPolygonGeometry, PointGeometry, PolygonGeometry, RingGeometry, TileError, winding::WindingOrder,
};
use anyhow::{Context, Result, bail, ensure};
use byteorder::LE;
use log::trace;
use vectile_core::{
	Blob,
	io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob},
};

const COMMAND_MOVE_TO: u64 = 1;
const COMMAND_LINE_TO: u64 = 2;
const COMMAND_CLOSE_PATH: u64 = 7;

/// One feature in wire form: tag indices into the layer dictionaries and the command stream.
#[derive(Clone, Debug, PartialEq)]
pub struct VectorTileFeature {
	pub id: Option<u64>,
	pub tag_ids: Vec<u32>,
	pub geom_type: GeomType,
	pub geom_data: Blob,
}

impl Default for VectorTileFeature {
	fn default() -> Self {
		VectorTileFeature {
			id: None,
			tag_ids: Vec::new(),
			geom_type: GeomType::Unknown,
			geom_data: Blob::new_empty(),
		}
	}
}

/// A vertex snapped onto the integer tile grid.
type GridPoint = (i64, i64);

/// Writes the MVT command stream, tracking the cursor for delta encoding.
///
/// The `write_*` methods return whether anything was written. Paths are snapped onto the grid
/// first, and a path that collapses there is left out.
struct CommandWriter {
	writer: ValueWriterBlob<LE>,
	x: i64,
	y: i64,
}

impl CommandWriter {
	fn new() -> Self {
		CommandWriter {
			writer: ValueWriterBlob::new_le(),
			x: 0,
			y: 0,
		}
	}

	fn write_command(&mut self, id: u64, count: usize) -> Result<()> {
		self.writer.write_varint(((count as u64) << 3) | id)
	}

	fn write_point(&mut self, (x, y): GridPoint) -> Result<()> {
		self.writer.write_svarint(x - self.x)?;
		self.writer.write_svarint(y - self.y)?;
		self.x = x;
		self.y = y;
		Ok(())
	}

	fn write_path(&mut self, path: &[GridPoint], close: bool) -> Result<()> {
		let Some((first, rest)) = path.split_first() else {
			return Ok(());
		};
		self.write_command(COMMAND_MOVE_TO, 1)?;
		self.write_point(*first)?;
		if !rest.is_empty() {
			self.write_command(COMMAND_LINE_TO, rest.len())?;
			for point in rest {
				self.write_point(*point)?;
			}
		}
		if close {
			self.write_command(COMMAND_CLOSE_PATH, 1)?;
		}
		Ok(())
	}

	fn write_points(&mut self, points: &[PointGeometry]) -> Result<bool> {
		if points.is_empty() {
			return Ok(false);
		}
		self.write_command(COMMAND_MOVE_TO, points.len())?;
		for point in points {
			self.write_point(grid_point(&point.0)?)?;
		}
		Ok(true)
	}

	/// Lines with fewer than two distinct grid points are left out.
	fn write_line(&mut self, line: &LineStringGeometry) -> Result<bool> {
		let path = grid_path(&line.0)?;
		if path.len() < 2 {
			trace!("skipping line, it collapsed to {} grid points", path.len());
			return Ok(false);
		}
		self.write_path(&path, false)?;
		Ok(true)
	}

	/// Rings are written without their closing vertex, exteriors clockwise and holes counter
	/// clockwise. A collapsed hole is left out, a collapsed exterior drops the whole polygon.
	fn write_polygon(&mut self, polygon: &PolygonGeometry) -> Result<bool> {
		let mut rings = Vec::with_capacity(polygon.0.len());
		for (index, ring) in polygon.0.iter().enumerate() {
			match grid_ring(ring, WindingOrder::for_ring_index(index))? {
				Some(path) => rings.push(path),
				None if index == 0 => {
					trace!("skipping polygon, its exterior ring collapsed on the tile grid");
					return Ok(false);
				}
				None => trace!("skipping ring {index}, it collapsed on the tile grid"),
			}
		}
		for path in &rings {
			self.write_path(path, true)?;
		}
		Ok(!rings.is_empty())
	}

	fn into_blob(self) -> Blob {
		self.writer.into_blob()
	}
}

/// Rounds a tile-local value onto the integer grid, rejecting values MVT cannot hold.
fn grid_value(value: f64) -> Result<i64> {
	if !value.is_finite() {
		return Err(TileError::assembly(format!("non-finite coordinate {value}")));
	}
	let value = value.round();
	if value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
		return Err(TileError::assembly(format!(
			"coordinate {value} is outside of the i32 range"
		)));
	}
	Ok(value as i64)
}

fn grid_point(c: &Coordinates) -> Result<GridPoint> {
	Ok((grid_value(c.x())?, grid_value(c.y())?))
}

/// Snaps `coords` onto the grid, merging consecutive vertices that land on the same point.
fn grid_path(coords: &[Coordinates]) -> Result<Vec<GridPoint>> {
	let mut path: Vec<GridPoint> = Vec::with_capacity(coords.len());
	for c in coords {
		let point = grid_point(c)?;
		if path.last() != Some(&point) {
			path.push(point);
		}
	}
	Ok(path)
}

/// Twice the signed area of an open grid ring. Positive is clockwise in tile space.
fn grid_area(path: &[GridPoint]) -> i128 {
	let Some(mut p1) = path.last() else {
		return 0;
	};
	let mut sum = 0i128;
	for p2 in path {
		sum += i128::from(p1.0) * i128::from(p2.1) - i128::from(p2.0) * i128::from(p1.1);
		p1 = p2;
	}
	sum
}

/// Snaps a ring onto the grid as an open path oriented as `want`. `None` when fewer than
/// three distinct vertices or no area remain.
fn grid_ring(ring: &RingGeometry, want: WindingOrder) -> Result<Option<Vec<GridPoint>>> {
	let mut path = grid_path(&ring.0)?;
	while path.len() > 1 && path.first() == path.last() {
		path.pop();
	}
	if path.len() < 3 {
		return Ok(None);
	}
	let area = grid_area(&path);
	if area == 0 {
		return Ok(None);
	}
	if (area > 0) != want.is_clockwise() {
		path[1..].reverse();
	}
	Ok(Some(path))
}

impl VectorTileFeature {
	/// Decodes a `VectorTileFeature` from a protobuf message.
	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<VectorTileFeature> {
		let mut f = VectorTileFeature::default();

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 0) => f.id = Some(reader.read_varint().context("Failed to read feature ID")?),
				(2, 2) => f.tag_ids = reader.read_pbf_packed_uint32().context("Failed to read tag IDs")?,
				(3, 0) => f.geom_type = GeomType::from(reader.read_varint().context("Failed to read geometry type")?),
				(4, 2) => f.geom_data = reader.read_pbf_blob().context("Failed to read geometry data")?,
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(f)
	}

	pub fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		if let Some(id) = self.id {
			writer.write_pbf_key(1, 0).context("Failed to write PBF key for feature ID")?;
			writer.write_varint(id).context("Failed to write feature ID")?;
		}

		if !self.tag_ids.is_empty() {
			writer.write_pbf_key(2, 2).context("Failed to write PBF key for tag IDs")?;
			writer.write_pbf_packed_uint32(&self.tag_ids).context("Failed to write tag IDs")?;
		}

		writer
			.write_pbf_key(3, 0)
			.context("Failed to write PBF key for geometry type")?;
		writer
			.write_varint(self.geom_type.as_u64())
			.context("Failed to write geometry type")?;

		if !self.geom_data.is_empty() {
			writer
				.write_pbf_key(4, 2)
				.context("Failed to write PBF key for geometry data")?;
			writer
				.write_pbf_blob(&self.geom_data)
				.context("Failed to write geometry data")?;
		}

		Ok(writer.into_blob())
	}

	/// Encodes a tile-local geometry.
	///
	/// Returns `None` when nothing is left after snapping onto the tile grid, for example a
	/// polygon whose exterior ring collapsed.
	///
	/// # Errors
	/// A [`TileError::Assembly`] for a collection, a non-finite coordinate or a coordinate that
	/// does not fit into `i32` after rounding.
	pub fn from_geometry(
		id: Option<u64>,
		tag_ids: Vec<u32>,
		geometry: &Geometry,
	) -> Result<Option<VectorTileFeature>> {
		let mut writer = CommandWriter::new();

		let (geom_type, written) = match geometry {
			Geometry::Point(g) => (GeomType::Point, writer.write_points(std::slice::from_ref(g))?),
			Geometry::MultiPoint(g) => (GeomType::Point, writer.write_points(&g.0)?),
			Geometry::LineString(g) => (GeomType::LineString, writer.write_line(g)?),
			Geometry::MultiLineString(g) => {
				let mut written = false;
				for line in &g.0 {
					written |= writer.write_line(line)?;
				}
				(GeomType::LineString, written)
			}
			Geometry::Polygon(g) => (GeomType::Polygon, writer.write_polygon(g)?),
			Geometry::MultiPolygon(g) => {
				let mut written = false;
				for polygon in &g.0 {
					written |= writer.write_polygon(polygon)?;
				}
				(GeomType::Polygon, written)
			}
			Geometry::Collection(_) => return Err(collection_error()),
		};

		if !written {
			return Ok(None);
		}

		Ok(Some(VectorTileFeature {
			id,
			tag_ids,
			geom_type,
			geom_data: writer.into_blob(),
		}))
	}

	/// Decodes the command stream.
	///
	/// A single point, line or polygon decodes to the single variant, several to the multi
	/// variant. Polygon rings are grouped by winding: a clockwise ring starts a new polygon, a
	/// counter clockwise ring is a hole of the current one.
	pub fn to_geometry(&self) -> Result<Geometry> {
		let parts = self.read_parts()?;

		match self.geom_type {
			GeomType::Unknown => bail!("Unknown geometry type"),

			GeomType::Point => {
				let mut points = Vec::with_capacity(parts.len());
				for part in parts {
					ensure!(part.len() == 1, "each MoveTo of a point feature must carry one point");
					points.extend(part.into_iter().map(PointGeometry));
				}
				match points.len() {
					0 => bail!("point feature without points"),
					1 => Ok(Geometry::Point(points.remove(0))),
					_ => Ok(Geometry::MultiPoint(MultiPointGeometry(points))),
				}
			}

			GeomType::LineString => {
				let mut lines = Vec::with_capacity(parts.len());
				for part in parts {
					ensure!(part.len() >= 2, "each line must have at least two points");
					lines.push(LineStringGeometry(part));
				}
				match lines.len() {
					0 => bail!("line feature without lines"),
					1 => Ok(Geometry::LineString(lines.remove(0))),
					_ => Ok(Geometry::MultiLineString(MultiLineStringGeometry(lines))),
				}
			}

			GeomType::Polygon => {
				let mut polygons: Vec<PolygonGeometry> = Vec::new();
				for part in parts {
					let ring = RingGeometry(part);
					ensure!(
						ring.0.len() >= 4 && ring.is_closed(),
						"each ring must be closed and have at least four points (A,B,C,A)"
					);
					let area = ring.signed_area();
					if area > 0.0 {
						polygons.push(PolygonGeometry(vec![ring]));
					} else if area < 0.0 {
						match polygons.last_mut() {
							Some(polygon) => polygon.0.push(ring),
							None => trace!("skipping hole without a preceding exterior ring"),
						}
					} else {
						trace!("skipping ring with zero area");
					}
				}
				match polygons.len() {
					0 => bail!("polygon feature without exterior rings"),
					1 => Ok(Geometry::Polygon(polygons.remove(0))),
					_ => Ok(Geometry::MultiPolygon(MultiPolygonGeometry(polygons))),
				}
			}
		}
	}

	/// Splits the command stream into paths. `MoveTo` starts a path, `ClosePath` repeats its
	/// first vertex.
	fn read_parts(&self) -> Result<Vec<Vec<Coordinates>>> {
		let mut reader = ValueReaderSlice::new_le(self.geom_data.as_slice());

		let mut parts: Vec<Vec<Coordinates>> = Vec::new();
		let mut part: Vec<Coordinates> = Vec::new();
		let mut x = 0i64;
		let mut y = 0i64;

		while reader.has_remaining() {
			let value = reader.read_varint().context("Failed to read varint for geometry command")?;
			let command = value & 0x7;
			let count = value >> 3;

			match command {
				COMMAND_MOVE_TO | COMMAND_LINE_TO => {
					for _ in 0..count {
						if command == COMMAND_MOVE_TO && !part.is_empty() {
							parts.push(std::mem::take(&mut part));
						}
						x += reader.read_svarint().context("Failed to read x coordinate")?;
						y += reader.read_svarint().context("Failed to read y coordinate")?;
						part.push(Coordinates::new(x as f64, y as f64));
					}
				}
				COMMAND_CLOSE_PATH => {
					let Some(first) = part.first().copied() else {
						bail!("ClosePath command found on an empty path");
					};
					part.push(first);
				}
				_ => bail!("Unknown command {command}"),
			}
		}

		if !part.is_empty() {
			parts.push(part);
		}

		Ok(parts)
	}

	/// Converts back into a [`Feature`], resolving tags through `property_manager`.
	pub fn to_feature(&self, property_manager: &PropertyManager) -> Result<Feature> {
		let mut feature = Feature::new(self.to_geometry().context("Failed to decode geometry")?);
		feature.id = self.id;
		feature.properties = property_manager.decode_tag_ids(&self.tag_ids)?;
		Ok(feature)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;

	fn encode(geometry: &Geometry) -> VectorTileFeature {
		VectorTileFeature::from_geometry(None, vec![], geometry)
			.unwrap()
			.expect("feature should not collapse")
	}

	fn commands(geometry: &Geometry) -> Vec<u8> {
		encode(geometry).geom_data.into_vec()
	}

	fn collapses(geometry: &Geometry) -> bool {
		VectorTileFeature::from_geometry(None, vec![], geometry).unwrap().is_none()
	}

	fn assembly_error(geometry: &Geometry) -> String {
		let error = VectorTileFeature::from_geometry(None, vec![], geometry).unwrap_err();
		match error.downcast_ref::<TileError>() {
			Some(TileError::Assembly(msg)) => msg.clone(),
			other => panic!("expected an assembly error, got {other:?}"),
		}
	}

	#[test]
	fn point_command_stream() {
		// MoveTo(1), zigzag(25)=50, zigzag(17)=34
		assert_eq!(commands(&Geometry::new_point([25, 17])), vec![9, 50, 34]);
	}

	#[test]
	fn multi_point_command_stream() {
		// MoveTo(2), (5,7), delta (-2,-5)
		assert_eq!(commands(&Geometry::new_multi_point(vec![[5, 7], [3, 2]])), vec![17, 10, 14, 3, 9]);
	}

	#[test]
	fn line_command_stream() {
		// MoveTo(1) (2,2), LineTo(2) (0,8) (8,0)
		assert_eq!(
			commands(&Geometry::new_line_string(vec![[2, 2], [2, 10], [10, 10]])),
			vec![9, 4, 4, 18, 0, 16, 16, 0]
		);
	}

	#[test]
	fn polygon_command_stream_drops_closing_vertex() {
		// MoveTo(1) (3,6), LineTo(2) (5,6) (-3,-6)... as in the MVT specification example
		assert_eq!(
			commands(&Geometry::new_polygon(vec![vec![[3, 6], [8, 12], [20, 34], [3, 6]]])),
			vec![9, 6, 12, 18, 10, 12, 24, 44, 15]
		);
	}

	#[test]
	fn polygon_rings_are_oriented() -> Result<()> {
		// counter clockwise exterior, clockwise hole
		let geometry = Geometry::new_polygon(vec![
			vec![[0, 0], [0, 10], [10, 10], [10, 0], [0, 0]],
			vec![[2, 2], [4, 2], [4, 4], [2, 4], [2, 2]],
		]);
		let feature = encode(&geometry);
		let Geometry::Polygon(polygon) = feature.to_geometry()? else {
			panic!("polygon expected");
		};
		assert_eq!(polygon.0.len(), 2);
		assert_eq!(WindingOrder::of_ring(&polygon.0[0]), WindingOrder::Clockwise);
		assert_eq!(WindingOrder::of_ring(&polygon.0[1]), WindingOrder::CounterClockwise);
		Ok(())
	}

	#[rstest]
	#[case::point(Geometry::new_point([1, 2]))]
	#[case::multi_point(Geometry::new_multi_point(vec![[2, 3], [4, 5]]))]
	#[case::line_string(Geometry::new_line_string(vec![[0, 1], [0, 3]]))]
	#[case::multi_line_string(Geometry::new_multi_line_string(vec![
		vec![[0, 0], [1, 1], [2, 0]],
		vec![[0, 2], [1, 1], [2, 2]],
	]))]
	#[case::polygon(Geometry::new_polygon(vec![
		vec![[0, 0], [3, 0], [3, 3], [0, 3], [0, 0]],
		vec![[1, 1], [1, 2], [2, 2], [1, 1]],
	]))]
	#[case::multi_polygon(Geometry::new_multi_polygon(vec![
		vec![
			vec![[0, 0], [3, 0], [3, 3], [0, 3], [0, 0]],
			vec![[1, 1], [1, 2], [2, 2], [1, 1]],
		],
		vec![
			vec![[4, 0], [7, 0], [7, 3], [4, 3], [4, 0]],
			vec![[5, 1], [5, 2], [6, 2], [5, 1]],
		],
	]))]
	fn geometry_round_trip(#[case] geometry: Geometry) -> Result<()> {
		let feature = VectorTileFeature::from_geometry(Some(4), vec![0, 1], &geometry)?.unwrap();
		let feature = VectorTileFeature::read(&mut ValueReaderSlice::new_le(feature.to_blob()?.as_slice()))?;
		assert_eq!(feature.id, Some(4));
		assert_eq!(feature.tag_ids, vec![0, 1]);
		assert_eq!(feature.to_geometry()?, geometry);
		Ok(())
	}

	#[test]
	fn coordinates_are_rounded() -> Result<()> {
		let feature = encode(&Geometry::new_point([1.4, 2.5]));
		assert_eq!(feature.to_geometry()?, Geometry::new_point([1, 3]));
		Ok(())
	}

	#[rstest]
	#[case::collection(Geometry::new_collection(vec![Geometry::new_point([1, 2])]), "GeometryCollection")]
	#[case::nan(Geometry::new_point([f64::NAN, 0.0]), "non-finite")]
	#[case::too_large(Geometry::new_line_string(vec![[0.0, 0.0], [3e9, 0.0]]), "outside of the i32 range")]
	#[case::too_small(Geometry::new_point([0.0, -2147483649.0]), "outside of the i32 range")]
	fn unencodable_geometry(#[case] geometry: Geometry, #[case] message: &str) {
		let error = assembly_error(&geometry);
		assert!(error.contains(message), "{error}");
	}

	#[test]
	fn i32_bounds_are_accepted() -> Result<()> {
		let geometry = Geometry::new_line_string(vec![[-2147483648.0, 0.0], [2147483647.0, 0.0]]);
		let feature = encode(&geometry);
		assert_eq!(feature.to_geometry()?, geometry);
		Ok(())
	}

	// ── grid degeneracy ─────────────────────────────────────────────────

	#[rstest]
	#[case::one_point_line(Geometry::new_line_string(vec![[3, 4]]))]
	#[case::line_on_one_grid_point(Geometry::new_line_string(vec![[3.1, 4.0], [2.9, 4.2], [3.0, 3.8]]))]
	#[case::spike_ring(Geometry::new_polygon(vec![vec![[0, 0], [5, 5], [0, 0]]]))]
	#[case::flat_ring(Geometry::new_polygon(vec![vec![[0, 0], [5, 0], [10, 0], [0, 0]]]))]
	#[case::ring_below_grid(Geometry::new_polygon(vec![vec![[0.0, 0.0], [0.3, 0.0], [0.3, 0.3], [0.0, 0.0]]]))]
	#[case::collapsed_exterior_with_hole(Geometry::new_polygon(vec![
		vec![[0, 0], [10, 0], [0, 0]],
		vec![[2, 2], [2, 4], [4, 4], [4, 2], [2, 2]],
	]))]
	#[case::empty_multi_point(Geometry::MultiPoint(MultiPointGeometry(vec![])))]
	fn collapsed_geometry_is_omitted(#[case] geometry: Geometry) {
		assert!(collapses(&geometry));
	}

	#[test]
	fn collapsed_parts_are_skipped() -> Result<()> {
		let lines = Geometry::new_multi_line_string(vec![vec![[7, 7]], vec![[0, 0], [0, 5]]]);
		assert_eq!(encode(&lines).to_geometry()?, Geometry::new_line_string(vec![[0, 0], [0, 5]]));

		let polygon = Geometry::new_polygon(vec![
			vec![[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
			vec![[2, 2], [3, 3], [2, 2]],
		]);
		assert_eq!(
			encode(&polygon).to_geometry()?,
			Geometry::new_polygon(vec![vec![[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]])
		);
		Ok(())
	}

	#[test]
	fn repeated_grid_points_are_merged() {
		// (1,1) and (1.2,0.9) share a grid point, so LineTo carries two vertices
		let line = Geometry::new_line_string(vec![[1.0, 1.0], [1.2, 0.9], [1.0, 4.0], [4.0, 4.0]]);
		assert_eq!(commands(&line), vec![9, 2, 2, 18, 0, 6, 6, 0]);
	}

	#[test]
	fn decoding_rejects_malformed_streams() {
		let feature = |geom_type, data: &[u8]| VectorTileFeature {
			geom_type,
			geom_data: Blob::from(data),
			..VectorTileFeature::default()
		};
		assert!(feature(GeomType::Unknown, &[9, 2, 2]).to_geometry().is_err());
		assert!(feature(GeomType::Point, &[]).to_geometry().is_err());
		assert!(feature(GeomType::Point, &[12]).to_geometry().is_err());
		assert!(feature(GeomType::LineString, &[9, 2, 2]).to_geometry().is_err());
		assert!(feature(GeomType::Polygon, &[15]).to_geometry().is_err());
	}
}
