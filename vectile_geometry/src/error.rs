use std::fmt::{self, Display};

/// Classifies failures of the tile pipeline.
///
/// Values travel inside [`anyhow::Error`]; use `error.downcast_ref::<TileError>()` to recover the
/// category, also after `.context(...)` has been added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileError {
	/// Truncated or malformed WKB.
	Decode(String),
	/// Structurally invalid input to the clipper.
	Clip(String),
	/// A feature or layer that cannot be written into a tile.
	Assembly(String),
}

impl TileError {
	pub fn decode(msg: impl Into<String>) -> anyhow::Error {
		anyhow::Error::new(TileError::Decode(msg.into()))
	}

	pub fn clip(msg: impl Into<String>) -> anyhow::Error {
		anyhow::Error::new(TileError::Clip(msg.into()))
	}

	pub fn assembly(msg: impl Into<String>) -> anyhow::Error {
		anyhow::Error::new(TileError::Assembly(msg.into()))
	}
}

impl Display for TileError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TileError::Decode(msg) => write!(f, "decode error: {msg}"),
			TileError::Clip(msg) => write!(f, "clip error: {msg}"),
			TileError::Assembly(msg) => write!(f, "assembly error: {msg}"),
		}
	}
}

impl std::error::Error for TileError {}
