use crate::GeoValue;
use anyhow::{Context, Result, anyhow, bail};
use byteorder::LE;
use vectile_core::{
	Blob,
	io::{ValueReader, ValueWriter, ValueWriterBlob},
};

/// Reading and writing the MVT `Value` message.
pub trait GeoValuePBF<'a> {
	fn read(reader: &mut dyn ValueReader<'a, LE>) -> Result<GeoValue>;
	fn to_blob(&self) -> Result<Blob>;
}

impl<'a> GeoValuePBF<'a> for GeoValue {
	fn read(reader: &mut dyn ValueReader<'a, LE>) -> Result<GeoValue> {
		use GeoValue::*;
		let mut value: Option<GeoValue> = None;

		while reader.has_remaining() {
			value = Some(match reader.read_pbf_key().context("Failed to read PBF key")? {
				(1, 2) => String(reader.read_pbf_string().context("Failed to read string value")?),
				(2, 5) => Float(reader.read_f32().context("Failed to read f32 value")?),
				(3, 1) => Double(reader.read_f64().context("Failed to read f64 value")?),
				(4, 0) => Int(reader.read_varint().context("Failed to read varint for int value")? as i64),
				(5, 0) => UInt(reader.read_varint().context("Failed to read varint for uint value")?),
				(6, 0) => Int(reader.read_svarint().context("Failed to read svarint value")?),
				(7, 0) => Bool(reader.read_varint().context("Failed to read varint for bool value")? != 0),
				(f, w) => bail!("Unexpected combination of field number ({f}) and wire type ({w})"),
			});
		}
		value
			.ok_or_else(|| anyhow!("No value found"))
			.context("Failed to read GeoValue")
	}

	fn to_blob(&self) -> Result<Blob> {
		let mut writer = ValueWriterBlob::new_le();

		match self {
			GeoValue::String(s) => {
				writer.write_pbf_key(1, 2)?;
				writer.write_pbf_string(s).context("Failed to write string value")?;
			}
			GeoValue::Float(f) => {
				writer.write_pbf_key(2, 5)?;
				writer.write_f32(*f).context("Failed to write float value")?;
			}
			GeoValue::Double(f) => {
				writer.write_pbf_key(3, 1)?;
				writer.write_f64(*f).context("Failed to write double value")?;
			}
			GeoValue::UInt(u) => {
				writer.write_pbf_key(5, 0)?;
				writer.write_varint(*u).context("Failed to write uint value")?;
			}
			GeoValue::Int(s) => {
				writer.write_pbf_key(6, 0)?;
				writer.write_svarint(*s).context("Failed to write int value")?;
			}
			GeoValue::Bool(b) => {
				writer.write_pbf_key(7, 0)?;
				writer.write_varint(u64::from(*b)).context("Failed to write bool value")?;
			}
			GeoValue::Null => bail!("null values have no MVT encoding"),
		}

		Ok(writer.into_blob())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use vectile_core::io::ValueReaderSlice;

	#[rstest]
	#[case::string(GeoValue::from("hello"), &[0x0A, 0x05, b'h', b'e', b'l', b'l', b'o'])]
	#[case::float(GeoValue::Float(1.0), &[0x15, 0x00, 0x00, 0x80, 0x3F])]
	#[case::double(GeoValue::Double(1.0), &[0x19, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xF0, 0x3F])]
	#[case::sint(GeoValue::Int(75), &[0x30, 0x96, 0x01])]
	#[case::uint(GeoValue::UInt(150), &[0x28, 0x96, 0x01])]
	#[case::bool(GeoValue::Bool(true), &[0x38, 0x01])]
	fn write_and_read(#[case] value: GeoValue, #[case] bytes: &[u8]) -> Result<()> {
		assert_eq!(value.to_blob()?.as_slice(), bytes);
		let mut reader = ValueReaderSlice::new_le(bytes);
		assert_eq!(GeoValue::read(&mut reader)?, value);
		Ok(())
	}

	#[test]
	fn read_plain_int_field() -> Result<()> {
		let mut reader = ValueReaderSlice::new_le(&[0x20, 0x05]);
		assert_eq!(GeoValue::read(&mut reader)?, GeoValue::Int(5));
		Ok(())
	}

	#[test]
	fn null_and_empty_fail() {
		assert!(GeoValue::Null.to_blob().is_err());
		let mut reader = ValueReaderSlice::new_le(&[]);
		assert!(GeoValue::read(&mut reader).is_err());
	}
}
