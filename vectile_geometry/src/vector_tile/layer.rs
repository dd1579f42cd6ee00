//! A single named layer of a vector tile.
//!
//! Features are kept in their high-level form until the tile is assembled; the key and value
//! dictionaries are built fresh by [`Layer::encode`] in first-seen order.
//!
//! Wire format of the MVT `Layer` message:
//!  * field 1: `name` (string)
//!  * field 2: repeated `feature` (embedded message)
//!  * field 3: repeated `keys` (string)
//!  * field 4: repeated `values` (embedded message)
//!  * field 5: `extent` (varint)
//!  * field 15: `version` (varint)

use super::{feature::VectorTileFeature, geometry_type::GeomType, property_manager::PropertyManager, value::GeoValuePBF};
use crate::{Feature, GeoValue, TileError};
use anyhow::{Context, Result, anyhow, bail};
use byteorder::LE;
use log::debug;
use std::collections::HashSet;
use vectile_core::{
	Blob, PipelineConfig,
	io::{ValueReader, ValueWriter, ValueWriterBlob},
};

#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
	pub name: String,
	/// Size of the tile-local grid the geometries were scaled to.
	pub extent: u32,
	pub version: u32,
	/// When set, every non-empty feature must encode to this type.
	pub geom_type: Option<GeomType>,
	features: Vec<Feature>,
	ids: HashSet<u64>,
}

impl Layer {
	#[must_use]
	pub fn new(name: &str, extent: u32, version: u32) -> Layer {
		Layer {
			name: name.to_string(),
			extent,
			version,
			geom_type: None,
			features: Vec::new(),
			ids: HashSet::new(),
		}
	}

	/// A layer with extent 4096 and version 2.
	#[must_use]
	pub fn new_standard(name: &str) -> Layer {
		Layer::new(name, 4096, 2)
	}

	#[must_use]
	pub fn from_config(name: &str, config: &PipelineConfig) -> Layer {
		Layer::new(name, config.extent, config.layer_version)
	}

	#[must_use]
	pub fn with_geom_type(mut self, geom_type: GeomType) -> Layer {
		self.geom_type = Some(geom_type);
		self
	}

	#[must_use]
	pub fn features(&self) -> &[Feature] {
		&self.features
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.features.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.features.is_empty()
	}

	/// Appends `features` in order and returns how many were skipped.
	///
	/// A feature is skipped when its id is already taken by a feature of this layer.
	pub fn add_features(&mut self, features: impl IntoIterator<Item = Feature>) -> usize {
		let mut skipped = 0;
		for feature in features {
			if let Some(id) = feature.id
				&& !self.ids.insert(id)
			{
				debug!("layer \"{}\": skipping feature with duplicate id {id}", self.name);
				skipped += 1;
				continue;
			}
			self.features.push(feature);
		}
		skipped
	}

	/// Removes the features at `indices`. Fails without touching the layer if an index is out of
	/// range.
	pub fn remove_features(&mut self, indices: &[usize]) -> Result<()> {
		let remove: HashSet<usize> = indices.iter().copied().collect();
		if let Some(index) = remove.iter().find(|index| **index >= self.features.len()) {
			bail!(
				"feature index {index} is out of range, layer \"{}\" has {} features",
				self.name,
				self.features.len()
			);
		}

		let mut index = 0;
		self.features.retain(|_| {
			let keep = !remove.contains(&index);
			index += 1;
			keep
		});
		self.ids = self.features.iter().filter_map(|feature| feature.id).collect();
		Ok(())
	}

	/// Serializes the layer into an MVT `Layer` message.
	///
	/// Empty geometries are left out, as are geometries that collapse when snapped onto the
	/// integer grid. Extent and version are always written.
	pub fn encode(&self) -> Result<Blob> {
		let mut property_manager = PropertyManager::new();
		let mut features = Vec::with_capacity(self.features.len());

		for (index, feature) in self.features.iter().enumerate() {
			if feature.geometry.is_empty() {
				debug!(
					"layer \"{}\": omitting feature {index} with an empty {}",
					self.name,
					feature.geometry.type_name()
				);
				continue;
			}

			let Some(mut vt_feature) = VectorTileFeature::from_geometry(feature.id, Vec::new(), &feature.geometry)
				.with_context(|| format!("while encoding feature {index}"))?
			else {
				debug!(
					"layer \"{}\": omitting feature {index}, nothing is left after snapping to the tile grid",
					self.name
				);
				continue;
			};

			if let Some(expected) = self.geom_type
				&& vt_feature.geom_type != expected
			{
				return Err(TileError::assembly(format!(
					"feature {index} is a {}, but layer \"{}\" only holds {expected} features",
					vt_feature.geom_type, self.name
				)));
			}
			vt_feature.tag_ids = property_manager.encode_tag_ids(&feature.properties);
			features.push(vt_feature);
		}

		let mut writer = ValueWriterBlob::new_le();

		writer
			.write_pbf_key(1, 2)
			.context("Failed to write PBF key for layer name")?;
		writer
			.write_pbf_string(&self.name)
			.context("Failed to write layer name")?;

		for feature in &features {
			writer
				.write_pbf_key(2, 2)
				.context("Failed to write PBF key for feature")?;
			writer
				.write_pbf_blob(&feature.to_blob().context("Failed to convert feature to blob")?)
				.context("Failed to write feature blob")?;
		}

		for key in property_manager.iter_key() {
			writer
				.write_pbf_key(3, 2)
				.context("Failed to write PBF key for property key")?;
			writer.write_pbf_string(key).context("Failed to write property key")?;
		}

		for value in property_manager.iter_val() {
			writer
				.write_pbf_key(4, 2)
				.context("Failed to write PBF key for property value")?;
			writer
				.write_pbf_blob(&value.to_blob().context("Failed to convert property value to blob")?)
				.context("Failed to write property value blob")?;
		}

		writer
			.write_pbf_key(5, 0)
			.context("Failed to write PBF key for extent")?;
		writer
			.write_varint(u64::from(self.extent))
			.context("Failed to write extent")?;

		writer
			.write_pbf_key(15, 0)
			.context("Failed to write PBF key for version")?;
		writer
			.write_varint(u64::from(self.version))
			.context("Failed to write version")?;

		Ok(writer.into_blob())
	}

	/// Reads an MVT `Layer` message, resolving every feature back into a [`Feature`].
	///
	/// Absent `extent` and `version` fields fall back to the protocol defaults 4096 and 1.
	pub fn read(reader: &mut dyn ValueReader<'_, LE>) -> Result<Layer> {
		let mut extent = 4096;
		let mut vt_features: Vec<VectorTileFeature> = Vec::new();
		let mut name = None;
		let mut property_manager = PropertyManager::new();
		let mut version = 1;

		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => name = Some(reader.read_pbf_string().context("Failed to read layer name")?),
				(2, 2) => vt_features.push(
					VectorTileFeature::read(
						reader
							.get_pbf_sub_reader()
							.context("Failed to get PBF sub-reader for feature")?
							.as_mut(),
					)
					.context("Failed to read VectorTileFeature")?,
				),
				(3, 2) => {
					property_manager.add_key(reader.read_pbf_string().context("Failed to read property key")?);
				}
				(4, 2) => {
					property_manager.add_val(
						GeoValue::read(
							reader
								.get_pbf_sub_reader()
								.context("Failed to get PBF sub-reader for property value")?
								.as_mut(),
						)
						.context("Failed to read GeoValue")?,
					);
				}
				(5, 0) => extent = u32::try_from(reader.read_varint().context("Failed to read extent")?)?,
				(15, 0) => version = u32::try_from(reader.read_varint().context("Failed to read version")?)?,
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		let name = name.ok_or(anyhow!("Layer name is required"))?;
		let mut layer = Layer::new(&name, extent, version);
		for (index, vt_feature) in vt_features.iter().enumerate() {
			let feature = vt_feature
				.to_feature(&property_manager)
				.with_context(|| format!("Failed to decode feature {index} of layer \"{name}\""))?;
			layer.add_features([feature]);
		}
		Ok(layer)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{GeoProperties, Geometry};
	use pretty_assertions::assert_eq;
	use vectile_core::io::ValueReaderSlice;

	// ========================================================================
	// Test Helpers
	// ========================================================================

	fn point_feature(id: Option<u64>, x: f64, y: f64) -> Feature {
		Feature {
			id,
			geometry: Geometry::new_point([x, y]),
			properties: GeoProperties::default(),
		}
	}

	fn round_trip(layer: &Layer) -> Result<Layer> {
		let blob = layer.encode()?;
		Layer::read(&mut ValueReaderSlice::new_le(blob.as_slice()))
	}

	fn assembly_message(error: &anyhow::Error) -> String {
		match error.downcast_ref::<TileError>() {
			Some(TileError::Assembly(msg)) => msg.clone(),
			other => panic!("expected an assembly error, got {other:?}"),
		}
	}

	// ========================================================================
	// Feature management
	// ========================================================================

	#[test]
	fn duplicate_ids_are_skipped() {
		let mut layer = Layer::new_standard("pois");
		let skipped = layer.add_features([
			point_feature(Some(1), 0.0, 0.0),
			point_feature(None, 1.0, 1.0),
			point_feature(Some(1), 2.0, 2.0),
			point_feature(None, 3.0, 3.0),
			point_feature(Some(2), 4.0, 4.0),
		]);
		assert_eq!(skipped, 1);
		assert_eq!(layer.len(), 4);
		assert_eq!(layer.features()[2].geometry, Geometry::new_point([3, 3]));

		assert_eq!(layer.add_features([point_feature(Some(2), 5.0, 5.0)]), 1);
		assert_eq!(layer.len(), 4);
	}

	#[test]
	fn split_collection_into_features() {
		let geometry = Geometry::new_collection(vec![
			Geometry::new_point([1, 1]),
			Geometry::new_collection(vec![Geometry::new_line_string(vec![[0, 0], [2, 2]])]),
		]);
		let mut layer = Layer::new_standard("mixed");
		assert_eq!(layer.add_features(Feature::split(geometry, GeoProperties::from(vec![("k", "v")]))), 0);
		assert_eq!(layer.len(), 2);
		assert_eq!(layer.features()[1].geometry.type_name(), "LineString");
	}

	#[test]
	fn remove_features_frees_ids() -> Result<()> {
		let mut layer = Layer::new_standard("pois");
		layer.add_features((0..5).map(|i| point_feature(Some(i), i as f64, 0.0)));
		layer.remove_features(&[1, 3, 3])?;
		assert_eq!(
			layer.features().iter().map(|f| f.id).collect::<Vec<_>>(),
			vec![Some(0), Some(2), Some(4)]
		);
		assert_eq!(layer.add_features([point_feature(Some(1), 9.0, 9.0)]), 0);
		Ok(())
	}

	#[test]
	fn remove_features_out_of_range() {
		let mut layer = Layer::new_standard("pois");
		layer.add_features([point_feature(None, 0.0, 0.0)]);
		assert!(layer.remove_features(&[0, 1]).is_err());
		assert_eq!(layer.len(), 1);
	}

	#[test]
	fn from_config() {
		let config = PipelineConfig {
			extent: 512,
			layer_version: 1,
			..PipelineConfig::default()
		};
		let layer = Layer::from_config("roads", &config);
		assert_eq!((layer.name.as_str(), layer.extent, layer.version), ("roads", 512, 1));
	}

	// ========================================================================
	// Encoding
	// ========================================================================

	#[test]
	fn encode_point_layer_bytes() -> Result<()> {
		let mut layer = Layer::new_standard("a");
		let mut feature = point_feature(Some(7), 1.0, 2.0);
		feature.set_property("k".to_string(), "v");
		layer.add_features([feature]);

		assert_eq!(
			layer.encode()?,
			Blob::from(&[
				0x0A, 0x01, b'a', // name
				0x12, 0x0D, 0x08, 0x07, 0x12, 0x02, 0x00, 0x00, 0x18, 0x01, 0x22, 0x03, 0x09, 0x02, 0x04, // feature
				0x1A, 0x01, b'k', // key
				0x22, 0x03, 0x0A, 0x01, b'v', // value
				0x28, 0x80, 0x20, // extent 4096
				0x78, 0x02, // version 2
			])
		);
		Ok(())
	}

	#[test]
	fn extent_and_version_are_always_written() -> Result<()> {
		let layer = Layer::new("empty", 4096, 1);
		let blob = layer.encode()?;
		assert!(blob.as_slice().ends_with(&[0x28, 0x80, 0x20, 0x78, 0x01]));
		Ok(())
	}

	#[test]
	fn null_values_are_not_written() -> Result<()> {
		let mut feature = point_feature(None, 1.0, 1.0);
		feature.set_property("name".to_string(), "x");
		feature.set_property("missing".to_string(), GeoValue::Null);

		let mut layer = Layer::new_standard("pois");
		layer.add_features([feature]);
		let decoded = round_trip(&layer)?;
		assert_eq!(
			decoded.features()[0].properties,
			GeoProperties::from(vec![("name", "x")])
		);
		Ok(())
	}

	#[test]
	fn dictionaries_are_shared() -> Result<()> {
		let mut layer = Layer::new_standard("pois");
		let mut a = point_feature(None, 1.0, 1.0);
		a.set_property("kind".to_string(), "shop");
		let mut b = point_feature(None, 2.0, 2.0);
		b.set_property("kind".to_string(), "shop");
		b.set_property("open".to_string(), true);
		layer.add_features([a, b]);

		let blob = layer.encode()?;
		let text = String::from_utf8_lossy(blob.as_slice());
		assert_eq!(text.matches("kind").count(), 1);
		assert_eq!(text.matches("shop").count(), 1);
		Ok(())
	}

	#[test]
	fn empty_geometries_are_omitted() -> Result<()> {
		let mut layer = Layer::new_standard("lines");
		layer.add_features([
			Feature::new(Geometry::new_line_string(Vec::<[f64; 2]>::new())),
			Feature::new(Geometry::new_line_string(vec![[0, 0], [5, 5]])),
		]);
		let decoded = round_trip(&layer)?;
		assert_eq!(decoded.len(), 1);
		Ok(())
	}

	#[test]
	fn collapsed_geometries_are_omitted() -> Result<()> {
		let mut spike = Feature::new(Geometry::new_polygon(vec![vec![[0, 0], [5, 5], [0, 0]]]));
		spike.set_property("only_on_dropped".to_string(), "x");
		let flat_with_hole = Feature::new(Geometry::new_polygon(vec![
			vec![[0, 0], [10, 0], [20, 0], [0, 0]],
			vec![[2, 2], [2, 4], [4, 4], [4, 2], [2, 2]],
		]));
		let one_point_line = Feature::new(Geometry::new_line_string(vec![[3, 3]]));

		let mut layer = Layer::new_standard("areas");
		layer.add_features([spike, flat_with_hole, one_point_line]);
		let blob = layer.encode()?;
		assert!(!String::from_utf8_lossy(blob.as_slice()).contains("only_on_dropped"));

		let decoded = Layer::read(&mut ValueReaderSlice::new_le(blob.as_slice()))?;
		assert!(decoded.is_empty());
		Ok(())
	}

	#[test]
	fn collapsed_members_keep_the_rest() -> Result<()> {
		let mut layer = Layer::new_standard("lines");
		layer.add_features([Feature::new(Geometry::new_multi_line_string(vec![
			vec![[1, 1]],
			vec![[0, 0], [0, 8]],
		]))]);
		let decoded = round_trip(&layer)?;
		assert_eq!(decoded.len(), 1);
		assert_eq!(
			decoded.features()[0].geometry,
			Geometry::new_line_string(vec![[0, 0], [0, 8]])
		);
		Ok(())
	}

	#[test]
	fn declared_type_mismatch() {
		let mut layer = Layer::new_standard("lines").with_geom_type(GeomType::LineString);
		layer.add_features([
			Feature::new(Geometry::new_line_string(vec![[0, 0], [5, 5]])),
			point_feature(None, 1.0, 1.0),
		]);
		let error = layer.encode().unwrap_err();
		assert_eq!(
			assembly_message(&error),
			"feature 1 is a Point, but layer \"lines\" only holds LineString features"
		);
	}

	#[test]
	fn collection_fails_with_context() {
		let mut layer = Layer::new_standard("mixed");
		layer.add_features([Feature::new(Geometry::new_collection(vec![Geometry::new_point([1, 1])]))]);
		let error = layer.encode().unwrap_err();
		assert!(format!("{error:#}").starts_with("while encoding feature 0: assembly error"));
		assert!(assembly_message(&error).contains("GeometryCollection"));
	}

	// ========================================================================
	// Decoding
	// ========================================================================

	#[test]
	fn round_trip_example_feature() -> Result<()> {
		let mut layer = Layer::new_standard("cities");
		layer.add_features([Feature::new_example()]);
		let decoded = round_trip(&layer)?;

		let mut expected = Feature::new_example();
		expected.geometry = expected
			.geometry
			.map_coords(&|c| crate::Coordinates::new(c.x().round(), c.y().round()));
		let mut expected_layer = Layer::new_standard("cities");
		expected_layer.add_features([expected]);
		assert_eq!(decoded, expected_layer);
		Ok(())
	}

	#[test]
	fn read_defaults_extent_and_version() -> Result<()> {
		let data = [0x0A, 0x05, b'h', b'e', b'l', b'l', b'o'];
		let layer = Layer::read(&mut ValueReaderSlice::new_le(&data))?;
		assert_eq!(layer.name, "hello");
		assert_eq!(layer.extent, 4096);
		assert_eq!(layer.version, 1);
		assert!(layer.is_empty());
		Ok(())
	}

	#[test]
	fn read_requires_name() {
		let data = [0x28, 0x80, 0x20];
		assert!(Layer::read(&mut ValueReaderSlice::new_le(&data)).is_err());
	}
}
