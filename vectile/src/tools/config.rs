use anyhow::Result;
use log::debug;
use std::path::PathBuf;
use vectile_core::PipelineConfig;

/// Pipeline settings: an optional YAML file, overridden field by field from flags.
#[derive(clap::Args, Debug)]
pub struct ConfigArgs {
	/// YAML file with pipeline settings (extent, buffer, srid, layer_version and the simplification settings)
	#[arg(long, short, value_name = "FILE", display_order = 10)]
	config: Option<PathBuf>,

	/// size of the tile-local grid
	#[arg(long, value_name = "int", display_order = 10)]
	extent: Option<u32>,

	/// margin around the tile that survives clipping, in tile-local units
	#[arg(long, value_name = "int", display_order = 10)]
	buffer: Option<u32>,

	/// coordinate system of the input geometry: 3857 or 4326
	#[arg(long, value_name = "int", display_order = 10)]
	srid: Option<u32>,

	/// MVT layer version
	#[arg(long, value_name = "int", display_order = 10)]
	layer_version: Option<u32>,

	/// keep every vertex, do not simplify lines and polygons
	#[arg(long, display_order = 11)]
	no_simplify: bool,

	/// first zoom level that is not simplified
	#[arg(long, value_name = "int", display_order = 11)]
	max_simplification_zoom: Option<u8>,

	/// simplification tolerance in tile-local units
	#[arg(long, value_name = "float", display_order = 11)]
	simplify_tolerance: Option<f64>,
}

impl ConfigArgs {
	pub fn load(&self) -> Result<PipelineConfig> {
		let mut config = match &self.config {
			Some(path) => PipelineConfig::from_path(path)?,
			None => PipelineConfig::default(),
		};

		if let Some(extent) = self.extent {
			config.extent = extent;
		}
		if let Some(buffer) = self.buffer {
			config.buffer = buffer;
		}
		if let Some(srid) = self.srid {
			config.srid = srid;
		}
		if let Some(layer_version) = self.layer_version {
			config.layer_version = layer_version;
		}
		if self.no_simplify {
			config.simplify = false;
		}
		if let Some(zoom) = self.max_simplification_zoom {
			config.max_simplification_zoom = zoom;
		}
		if let Some(tolerance) = self.simplify_tolerance {
			config.simplify_tolerance = tolerance;
		}

		config.validate()?;
		debug!("{config:?}");
		Ok(config)
	}
}
