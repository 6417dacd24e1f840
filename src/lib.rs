#![doc = include_str!("../README.md")]

pub mod chunk_buffer;
pub mod error;
pub mod file_writer;
pub mod io_utils;
pub mod page;
pub mod schema;
pub mod stats;
pub mod value;
pub mod writer;

pub use error::{ChunkWriterError, ChunkWriterResult, PageError};
pub use file_writer::{FileWriter, IoFileWriter};
pub use schema::MeasurementSchema;
pub use stats::Stats;
pub use value::{Decimal, EncodingSpec, ScalarType, Value};
pub use writer::{ChunkWriter, ChunkWriterConfig};
