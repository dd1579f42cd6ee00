use crate::{BoundingBox, TileCoord};
use anyhow::{Context, Result, ensure};
use log::debug;
use serde::Deserialize;
use std::{
	fs::File,
	io::{BufReader, Read},
	path::Path,
};

/// Settings shared by every stage of the tile pipeline.
///
/// Loaded from YAML; missing fields fall back to their defaults, unknown fields are rejected.
///
/// ```yaml
/// extent: 4096
/// buffer: 64
/// srid: 3857
/// layer_version: 2
/// simplify: true
/// max_simplification_zoom: 14
/// simplify_tolerance: 1.0
/// ```
#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
	/// Size of the tile-local grid.
	pub extent: u32,

	/// Extra margin around the tile, in tile-local units, that survives clipping.
	pub buffer: u32,

	/// Coordinate system of the source geometries (3857 or 4326).
	pub srid: u32,

	/// MVT layer version written into every layer.
	pub layer_version: u32,

	/// Douglas–Peucker simplification of lines and polygons after scaling.
	pub simplify: bool,

	/// First zoom level at which simplification is switched off.
	pub max_simplification_zoom: u8,

	/// Simplification tolerance in tile-local units.
	pub simplify_tolerance: f64,
}

impl Default for PipelineConfig {
	fn default() -> Self {
		PipelineConfig {
			extent: 4096,
			buffer: 64,
			srid: 3857,
			layer_version: 2,
			simplify: true,
			max_simplification_zoom: 14,
			simplify_tolerance: 1.0,
		}
	}
}

impl PipelineConfig {
	pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
		let config: PipelineConfig = serde_yaml_ng::from_reader(reader).context("Failed to parse pipeline config")?;
		config.validate()?;
		Ok(config)
	}

	pub fn from_string(text: &str) -> Result<Self> {
		let config: PipelineConfig = serde_yaml_ng::from_str(text).context("Failed to parse pipeline config")?;
		config.validate()?;
		Ok(config)
	}

	pub fn from_path(path: &Path) -> Result<Self> {
		debug!("loading pipeline config from {path:?}");
		let file = File::open(path).with_context(|| format!("Failed to open config {path:?}"))?;
		PipelineConfig::from_reader(BufReader::new(file)).with_context(|| format!("Failed to load config {path:?}"))
	}

	pub fn validate(&self) -> Result<()> {
		ensure!(self.extent > 0, "extent must be greater than 0");
		ensure!(
			self.srid == 3857 || self.srid == 4326,
			"unsupported srid {}, expected 3857 or 4326",
			self.srid
		);
		ensure!(
			self.layer_version == 1 || self.layer_version == 2,
			"layer_version must be 1 or 2, got {}",
			self.layer_version
		);
		ensure!(
			self.simplify_tolerance.is_finite() && self.simplify_tolerance >= 0.0,
			"simplify_tolerance must be a finite number of at least 0, got {}",
			self.simplify_tolerance
		);
		Ok(())
	}

	/// Whether geometries of a tile at `zoom` get simplified.
	#[must_use]
	pub fn simplifies_at(&self, zoom: u8) -> bool {
		self.simplify && self.simplify_tolerance > 0.0 && zoom < self.max_simplification_zoom
	}

	/// Bounding box of `coord` in the configured coordinate system.
	pub fn tile_bbox(&self, coord: &TileCoord) -> Result<BoundingBox> {
		coord.bbox_for_srid(self.srid)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use pretty_assertions::assert_eq;
	use rstest::rstest;
	use std::io::Write;

	#[test]
	fn parse_empty_config() -> Result<()> {
		assert_eq!(PipelineConfig::from_string("")?, PipelineConfig::default());
		Ok(())
	}

	#[test]
	fn parse_partial_config() -> Result<()> {
		assert_eq!(
			PipelineConfig::from_string("extent: 512\nsrid: 4326\n")?,
			PipelineConfig {
				extent: 512,
				buffer: 64,
				srid: 4326,
				..PipelineConfig::default()
			}
		);
		Ok(())
	}

	#[rstest]
	#[case("extend: 512", "unknown field")]
	#[case("extent: 0", "extent must be greater than 0")]
	#[case("srid: 2056", "unsupported srid 2056")]
	#[case("layer_version: 3", "layer_version must be 1 or 2")]
	#[case("buffer: -1", "Failed to parse")]
	#[case("simplify_tolerance: -0.5", "simplify_tolerance must be")]
	#[case("simplify_tolerance: .nan", "simplify_tolerance must be")]
	fn reject_invalid_config(#[case] yaml: &str, #[case] message: &str) {
		let error = PipelineConfig::from_string(yaml).unwrap_err();
		let text = format!("{error:#}");
		assert!(text.contains(message), "{text}");
	}

	#[test]
	fn parse_from_path() -> Result<()> {
		let mut file = tempfile::NamedTempFile::new()?;
		writeln!(file, "buffer: 128\nlayer_version: 1")?;
		let config = PipelineConfig::from_path(file.path())?;
		assert_eq!(config.buffer, 128);
		assert_eq!(config.layer_version, 1);
		assert_eq!(config.extent, 4096);

		assert!(PipelineConfig::from_path(Path::new("does/not/exist.yml")).is_err());
		Ok(())
	}

	#[test]
	fn simplification_stops_at_max_zoom() -> Result<()> {
		let config = PipelineConfig::from_string("max_simplification_zoom: 10")?;
		assert!(config.simplifies_at(0));
		assert!(config.simplifies_at(9));
		assert!(!config.simplifies_at(10));
		assert!(!config.simplifies_at(18));

		let config = PipelineConfig::from_string("simplify: false")?;
		assert!(!config.simplifies_at(0));

		let config = PipelineConfig::from_string("simplify_tolerance: 0")?;
		assert!(!config.simplifies_at(0));
		Ok(())
	}

	#[test]
	fn tile_bbox_follows_srid() -> Result<()> {
		let coord = TileCoord::new(4, 8, 5)?;
		let config = PipelineConfig {
			srid: 4326,
			..PipelineConfig::default()
		};
		assert_eq!(config.tile_bbox(&coord)?, coord.bbox_lonlat());
		assert_eq!(PipelineConfig::default().tile_bbox(&coord)?, coord.bbox_mercator());
		Ok(())
	}
}
