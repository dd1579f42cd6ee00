use super::config::ConfigArgs;
use anyhow::{Context, Result};
use log::{info, warn};
use std::path::PathBuf;
use vectile_core::{Blob, PipelineConfig, TileCoord};
use vectile_geometry::{
	Feature, GeoProperties,
	cursor::Cursor,
	vector_tile::{Layer, Tile},
	wkb,
};

#[derive(clap::Args, Debug)]
#[command(arg_required_else_help = true, disable_version_flag = true)]
pub struct Subcommand {
	/// file containing one WKB geometry
	#[arg()]
	input_file: PathBuf,

	/// where to write the vector tile
	#[arg()]
	output_file: PathBuf,

	/// tile the geometry is scaled and clipped to
	#[arg(long, short, value_name = "z/x/y", required = true)]
	tile: TileCoord,

	/// name of the layer holding the geometry
	#[arg(long, short, default_value = "default")]
	layer: String,

	#[command(flatten)]
	config: ConfigArgs,
}

pub fn run(arguments: &Subcommand) -> Result<()> {
	let config = arguments.config.load()?;
	let input = Blob::load_from_file(&arguments.input_file)
		.with_context(|| format!("Failed to read {:?}", arguments.input_file))?;

	let tile = encode(&input, &arguments.tile, &arguments.layer, &config)?;
	tile
		.save_to_file(&arguments.output_file)
		.with_context(|| format!("Failed to write {:?}", arguments.output_file))?;

	info!("wrote {} bytes to {:?}", tile.len(), arguments.output_file);
	Ok(())
}

/// Runs the whole pipeline for a single geometry: decode, scale, clip, assemble.
///
/// A geometry that lies outside the tile yields a tile with an empty layer.
pub fn encode(input: &Blob, coord: &TileCoord, layer_name: &str, config: &PipelineConfig) -> Result<Blob> {
	let geometry = wkb::decode(input.as_slice()).context("Failed to decode WKB")?;
	info!("decoded a {} with {} vertices", geometry.type_name(), geometry.vertex_count());

	let cursor = Cursor::for_tile(coord, config)?;
	let mut layer = Layer::from_config(layer_name, config);

	match cursor.transform(&geometry)? {
		Some(local) => {
			layer.add_features(Feature::split(local, GeoProperties::new()));
		}
		None => warn!("geometry does not intersect tile {coord}, the layer stays empty"),
	}

	let mut tile = Tile::new();
	tile.add_layer(layer)?;
	tile.assemble()
}
