use super::config::ConfigArgs;
use anyhow::{Context, Result, bail};
use log::info;
use std::{fmt::Write, path::PathBuf};
use vectile_core::{Blob, PipelineConfig, TileCoord};
use vectile_geometry::{
	Geometry, PolygonGeometry,
	cursor::Cursor,
	winding::WindingOrder,
	wkb::{self, ByteOrder},
};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// file containing one WKB geometry
	#[arg(required_unless_present = "hex", conflicts_with = "hex")]
	input_file: Option<PathBuf>,

	/// WKB geometry given as hex string instead of a file, whitespace is ignored
	#[arg(long, value_name = "HEX")]
	hex: Option<String>,

	/// also scale, simplify and clip the geometry to this tile
	#[arg(long, short, value_name = "z/x/y")]
	tile: Option<TileCoord>,

	/// print the re-encoded WKB in big-endian instead of little-endian byte order
	#[arg(long)]
	big_endian: bool,

	#[command(flatten)]
	config: ConfigArgs,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let blob = match (&arguments.input_file, &arguments.hex) {
		(_, Some(hex)) => Blob::from_hex(hex).context("Failed to parse hex input")?,
		(Some(path), None) => Blob::load_from_file(path).with_context(|| format!("Failed to read {path:?}"))?,
		(None, None) => bail!("either an input file or --hex is required"),
	};
	info!("decoding {} bytes of WKB", blob.len());

	let geometry = wkb::decode(blob.as_slice()).context("Failed to decode WKB")?;
	let order = if arguments.big_endian {
		ByteOrder::BigEndian
	} else {
		ByteOrder::LittleEndian
	};

	let config = arguments.config.load()?;
	let tile = arguments.tile.map(|coord| (coord, config));

	print!("{}", describe(&geometry, order, tile.as_ref())?);
	Ok(())
}

/// Renders the text dump of `geometry`, plus the scaled, simplified and clipped result when a tile
/// is given.
pub fn describe(geometry: &Geometry, order: ByteOrder, tile: Option<&(TileCoord, PipelineConfig)>) -> Result<String> {
	let mut text = String::new();

	writeln!(text, "wkt: {}", geometry.to_wkt())?;
	writeln!(text, "type: {}", geometry.type_name())?;
	writeln!(text, "vertices: {}", geometry.vertex_count())?;
	writeln!(text, "bbox: {:?}", geometry.bbox().as_array())?;
	writeln!(text, "wkb ({order:?}): {}", wkb::encode(geometry, order)?.as_hex())?;
	write_windings(&mut text, geometry)?;

	let Some((coord, config)) = tile else {
		return Ok(text);
	};

	let cursor = Cursor::for_tile(coord, config)?;
	let (min, max) = cursor.min_max();
	writeln!(text, "tile: {coord}")?;
	writeln!(text, "clip rectangle: {:?}", [min[0], min[1], max[0], max[1]])?;

	let scaled = cursor.scale_geo(geometry);
	writeln!(text, "scaled: {}", scaled.to_wkt())?;

	let Some(simplified) = cursor.simplify_geo(&scaled) else {
		writeln!(text, "simplified: nothing left")?;
		return Ok(text);
	};
	if let Some(tolerance) = cursor.simplification() {
		writeln!(text, "simplified (tolerance {tolerance}): {}", simplified.to_wkt())?;
	}

	match cursor.clip_geo(&simplified).context("Failed to clip geometry")? {
		Some(clipped) => {
			writeln!(text, "clipped: {}", clipped.to_wkt())?;
			write_windings(&mut text, &clipped)?;
		}
		None => writeln!(text, "clipped: nothing left inside the clip rectangle")?,
	}

	Ok(text)
}

fn write_windings(text: &mut String, geometry: &Geometry) -> Result<()> {
	let mut lines = Vec::new();
	collect_windings(geometry, "", &mut lines);
	for line in lines {
		writeln!(text, "  {line}")?;
	}
	Ok(())
}

fn collect_windings(geometry: &Geometry, prefix: &str, lines: &mut Vec<String>) {
	match geometry {
		Geometry::Polygon(polygon) => push_polygon(polygon, prefix, lines),
		Geometry::MultiPolygon(multi) => {
			for (index, polygon) in multi.0.iter().enumerate() {
				push_polygon(polygon, &format!("{prefix}polygon {index}, "), lines);
			}
		}
		Geometry::Collection(collection) => {
			for (index, member) in collection.iter().enumerate() {
				collect_windings(member, &format!("{prefix}member {index}, "), lines);
			}
		}
		Geometry::Point(_) | Geometry::LineString(_) | Geometry::MultiPoint(_) | Geometry::MultiLineString(_) => {}
	}
}

fn push_polygon(polygon: &PolygonGeometry, prefix: &str, lines: &mut Vec<String>) {
	for (index, ring) in polygon.0.iter().enumerate() {
		lines.push(format!("{prefix}ring {index}: {}", WindingOrder::of_ring(ring)));
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::tests::run_command;
	use pretty_assertions::assert_eq;

	#[test]
	fn describe_point() -> Result<()> {
		let text = describe(&Geometry::new_point([1, 2]), ByteOrder::LittleEndian, None)?;
		assert_eq!(
			text,
			"wkt: POINT (1 2)\n\
			type: Point\n\
			vertices: 1\n\
			bbox: [1.0, 2.0, 1.0, 2.0]\n\
			wkb (LittleEndian): 01 01 00 00 00 00 00 00 00 00 00 f0 3f 00 00 00 00 00 00 00 40\n"
		);
		Ok(())
	}

	#[test]
	fn describe_polygon_windings() -> Result<()> {
		let geometry = Geometry::new_polygon(vec![
			vec![[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]],
			vec![[2, 2], [2, 4], [4, 4], [4, 2], [2, 2]],
		]);
		let text = describe(&geometry, ByteOrder::BigEndian, None)?;
		assert!(text.contains("wkb (BigEndian): 00 00 00 00 03"), "{text}");
		assert!(text.contains("  ring 0: clockwise\n"), "{text}");
		assert!(text.contains("  ring 1: counter clockwise\n"), "{text}");
		Ok(())
	}

	#[test]
	fn describe_with_tile() -> Result<()> {
		let geometry = Geometry::new_point([-13049156.64, 3914787.60]);
		let inside = ("10/178/411".parse()?, PipelineConfig::default());
		let text = describe(&geometry, ByteOrder::LittleEndian, Some(&inside))?;
		assert!(text.contains("tile: 10/178/411\n"), "{text}");
		assert!(text.contains("clip rectangle: [-64.0, -64.0, 4160.0, 4160.0]\n"), "{text}");
		assert!(text.contains("scaled: POINT (2322 3969)\n"), "{text}");
		assert!(text.contains("clipped: POINT (2322 3969)\n"), "{text}");

		assert!(text.contains("simplified (tolerance 1): POINT (2322 3969)\n"), "{text}");

		let outside = ("10/219/411".parse()?, PipelineConfig::default());
		let text = describe(&geometry, ByteOrder::LittleEndian, Some(&outside))?;
		assert!(text.contains("clipped: nothing left inside the clip rectangle\n"), "{text}");
		Ok(())
	}

	#[test]
	fn describe_without_simplification() -> Result<()> {
		let geometry = Geometry::new_point([-13049156.64, 3914787.60]);
		let config = PipelineConfig {
			simplify: false,
			..PipelineConfig::default()
		};
		let text = describe(&geometry, ByteOrder::LittleEndian, Some(&("10/178/411".parse()?, config)))?;
		assert!(!text.contains("simplified"), "{text}");
		assert!(text.contains("clipped: POINT (2322 3969)\n"), "{text}");

		let deep = ("14/2855/6587".parse()?, PipelineConfig::default());
		let text = describe(&geometry, ByteOrder::LittleEndian, Some(&deep))?;
		assert!(!text.contains("simplified"), "{text}");
		Ok(())
	}

	#[test]
	fn run_with_hex() -> Result<()> {
		run_command(vec![
			"vectile",
			"describe",
			"-q",
			"--hex",
			"0101000000000000000000F03F0000000000000040",
		])?;
		Ok(())
	}

	#[test]
	fn run_with_invalid_hex() {
		assert!(run_command(vec!["vectile", "describe", "-q", "--hex", "01010000"]).is_err());
	}
}
