//! Value readers and writers.
//!
//! [`ValueReader`] and [`ValueWriter`] are generic over a [`byteorder::ByteOrder`] so the same
//! code paths serve little-endian protobuf data and big- or little-endian WKB payloads.

mod value_reader;
mod value_reader_slice;
mod value_writer;
mod value_writer_blob;

pub use value_reader::*;
pub use value_reader_slice::*;
pub use value_writer::*;
pub use value_writer_blob::*;
