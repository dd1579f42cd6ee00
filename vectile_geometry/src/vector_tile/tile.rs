use super::layer::Layer;
use crate::TileError;
use anyhow::{Context, Result, bail};
use byteorder::ByteOrder;
use vectile_core::{
	Blob,
	io::{ValueReader, ValueReaderSlice, ValueWriter, ValueWriterBlob},
};

/// An ordered set of uniquely named layers.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tile {
	layers: Vec<Layer>,
}

impl Tile {
	#[must_use]
	pub fn new() -> Tile {
		Tile::default()
	}

	#[must_use]
	pub fn layers(&self) -> &[Layer] {
		&self.layers
	}

	/// Appends `layer`. A name that is already taken is an assembly error and leaves the tile
	/// unchanged.
	pub fn add_layer(&mut self, layer: Layer) -> Result<()> {
		if self.find_layer(&layer.name).is_some() {
			return Err(TileError::assembly(format!("duplicate layer name \"{}\"", layer.name)));
		}
		self.layers.push(layer);
		Ok(())
	}

	/// Serializes all layers, in insertion order, into MVT bytes.
	pub fn assemble(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		for layer in &self.layers {
			let blob = layer
				.encode()
				.with_context(|| format!("while assembling layer \"{}\"", layer.name))?;
			writer.write_pbf_key(3, 2).context("Failed to write PBF key")?;
			writer.write_pbf_blob(&blob).context("Failed to write PBF blob")?;
		}

		Ok(writer.into_blob())
	}

	/// Like [`Tile::assemble`], but appends the bytes to `writer`. Nothing is written unless the
	/// whole tile encodes.
	pub fn assemble_into<E: ByteOrder>(&self, writer: &mut impl ValueWriter<E>) -> Result<()> {
		let blob = self.assemble()?;
		writer.write_blob(&blob)
	}

	pub fn from_blob(blob: &Blob) -> Result<Tile> {
		let mut reader = ValueReaderSlice::new_le(blob.as_slice());

		let mut tile = Tile::default();
		while reader.has_remaining() {
			match reader.read_pbf_key().context("Failed to read PBF key")? {
				(3, 2) => {
					let layer = Layer::read(
						reader
							.get_pbf_sub_reader()
							.context("Failed to get PBF sub-reader")?
							.as_mut(),
					)
					.context("Failed to read Layer")?;
					tile.add_layer(layer)?;
				}
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			}
		}

		Ok(tile)
	}

	#[must_use]
	pub fn find_layer(&self, name: &str) -> Option<&Layer> {
		self.layers.iter().find(|layer| layer.name == name)
	}

	pub fn find_layer_mut(&mut self, name: &str) -> Option<&mut Layer> {
		self.layers.iter_mut().find(|layer| layer.name == name)
	}
}
