//! [`Blob`], a thin wrapper around `Vec<u8>` used for encoded WKB and MVT payloads.
//!
//! ```rust
//! use vectile_core::Blob;
//!
//! let blob = Blob::from_hex("01 01 00 00 00").unwrap();
//! assert_eq!(blob.len(), 5);
//! assert_eq!(blob.as_hex(), "01 01 00 00 00");
//! ```

use anyhow::{Context, Result, ensure};
use std::fmt::Debug;
use std::path::Path;

/// Owned byte buffer.
#[derive(Clone, PartialEq, Eq)]
pub struct Blob(Vec<u8>);

impl Blob {
	#[must_use]
	pub fn new_empty() -> Blob {
		Blob(Vec::new())
	}

	/// Creates a zero-filled `Blob` of `length` bytes.
	#[must_use]
	pub fn new_sized(length: usize) -> Blob {
		Blob(vec![0u8; length])
	}

	/// Parses hexadecimal text. Whitespace and an optional `0x` prefix are ignored, so both
	/// `"0101000000"` and `"01 01 00 00 00"` are accepted.
	pub fn from_hex(text: &str) -> Result<Blob> {
		let text = text.trim();
		let text = text.strip_prefix("0x").unwrap_or(text);
		let digits: Vec<u8> = text.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
		ensure!(
			digits.len().is_multiple_of(2),
			"hex input must have an even number of digits, got {}",
			digits.len()
		);
		digits
			.chunks(2)
			.map(|pair| {
				let pair = std::str::from_utf8(pair).context("hex input is not ASCII")?;
				u8::from_str_radix(pair, 16).with_context(|| format!("invalid hex byte '{pair}'"))
			})
			.collect::<Result<Vec<u8>>>()
			.map(Blob)
	}

	#[must_use]
	pub fn as_slice(&self) -> &[u8] {
		&self.0
	}

	#[must_use]
	pub fn as_mut_slice(&mut self) -> &mut [u8] {
		&mut self.0
	}

	#[must_use]
	pub fn into_vec(self) -> Vec<u8> {
		self.0
	}

	/// Lower-case hex with the bytes separated by spaces.
	#[must_use]
	pub fn as_hex(&self) -> String {
		self
			.0
			.iter()
			.map(|byte| format!("{byte:02x}"))
			.collect::<Vec<_>>()
			.join(" ")
	}

	#[must_use]
	pub fn len(&self) -> u64 {
		self.0.len() as u64
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn save_to_file(&self, path: &Path) -> Result<()> {
		std::fs::write(path, &self.0).with_context(|| format!("Failed to write {path:?}"))
	}

	pub fn load_from_file(path: &Path) -> Result<Self> {
		Ok(Blob::from(
			std::fs::read(path).with_context(|| format!("Failed to read {path:?}"))?,
		))
	}
}

impl From<Vec<u8>> for Blob {
	fn from(item: Vec<u8>) -> Self {
		Blob(item)
	}
}

impl From<&[u8]> for Blob {
	fn from(item: &[u8]) -> Self {
		Blob(item.to_vec())
	}
}

impl<const N: usize> From<&[u8; N]> for Blob {
	fn from(item: &[u8; N]) -> Self {
		Blob(item.to_vec())
	}
}

impl Debug for Blob {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "Blob({}): {}", self.0.len(), self.as_hex())
	}
}

impl Default for Blob {
	fn default() -> Self {
		Self::new_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn creation_and_invariants() {
		let empty = Blob::new_empty();
		assert_eq!(empty.len(), 0);
		assert!(empty.is_empty());

		let sized = Blob::new_sized(3);
		assert_eq!(sized.as_slice(), &[0, 0, 0]);

		let blob = Blob::from(&[1u8, 2, 3]);
		assert_eq!(blob.clone().into_vec(), vec![1, 2, 3]);
		assert_eq!(blob, Blob::from(vec![1, 2, 3]));
	}

	#[rstest]
	#[case("0101000000", &[1, 1, 0, 0, 0])]
	#[case("01 01 00 00 00", &[1, 1, 0, 0, 0])]
	#[case("0xDEADbeef", &[0xDE, 0xAD, 0xBE, 0xEF])]
	#[case("", &[])]
	fn from_hex(#[case] text: &str, #[case] expected: &[u8]) -> Result<()> {
		assert_eq!(Blob::from_hex(text)?.as_slice(), expected);
		Ok(())
	}

	#[rstest]
	#[case("abc")]
	#[case("zz")]
	fn from_hex_rejects_garbage(#[case] text: &str) {
		assert!(Blob::from_hex(text).is_err());
	}

	#[test]
	fn debug() {
		assert_eq!(format!("{:?}", Blob::from(&[0xDE, 0xAD])), "Blob(2): de ad");
	}

	#[test]
	fn save_and_load() -> Result<()> {
		let dir = tempfile::tempdir()?;
		let path = dir.path().join("blob.bin");
		let blob = Blob::from(&[9u8, 8, 7]);
		blob.save_to_file(&path)?;
		assert_eq!(Blob::load_from_file(&path)?, blob);
		Ok(())
	}
}
