//! The downstream file-writer contract and one concrete, `std::io::Write`-
//! backed implementation of it.
//!
//! The file-level writer that concatenates chunks from many series into a
//! single file is out of scope for this crate; it only needs something
//! that can accept *one* series' chunk at a time.

use byteorder::{WriteBytesExt, BE};
use std::io::{self, Write};

use crate::io_utils::write_uvarint;
use crate::stats::Stats;
use crate::value::ScalarType;

/// What a [`crate::chunk_buffer::ChunkBuffer`] needs from its downstream sink.
pub trait FileWriter {
    /// Emits the chunk header: series id, type tag, total payload size,
    /// chunk statistics, and page count.
    fn start_chunk(
        &mut self,
        series_id: &str,
        scalar_type: ScalarType,
        total_bytes: u64,
        chunk_stats: &Stats,
        num_pages: u32,
    ) -> io::Result<()>;

    /// Emits one span of already-framed page bytes (header + payload).
    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()>;

    /// Marks the end of the current chunk.
    fn end_chunk(&mut self) -> io::Result<()>;
}

fn type_tag(ty: ScalarType) -> u8 {
    match ty {
        ScalarType::Bool => 0,
        ScalarType::Int32 => 1,
        ScalarType::Int64 => 2,
        ScalarType::Float => 3,
        ScalarType::Double => 4,
        ScalarType::Decimal => 5,
        ScalarType::Binary => 6,
    }
}

/// A [`FileWriter`] that writes chunks directly to any [`Write`] implementation.
///
/// This is the writer most callers will use. The file writer passed to
/// [`crate::writer::ChunkWriter::write_to_file_writer`] is always borrowed,
/// never owned, so callers keep control of its lifetime.
pub struct IoFileWriter<W: Write> {
    inner: W,
}

impl<W: Write> IoFileWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> FileWriter for IoFileWriter<W> {
    fn start_chunk(
        &mut self,
        series_id: &str,
        scalar_type: ScalarType,
        total_bytes: u64,
        chunk_stats: &Stats,
        num_pages: u32,
    ) -> io::Result<()> {
        let id_bytes = series_id.as_bytes();
        write_uvarint(&mut self.inner, id_bytes.len() as u64)?;
        self.inner.write_all(id_bytes)?;
        self.inner.write_u8(type_tag(scalar_type))?;
        write_uvarint(&mut self.inner, total_bytes)?;
        write_uvarint(&mut self.inner, num_pages as u64)?;
        chunk_stats.serialize(&mut self.inner)?;
        Ok(())
    }

    fn append_bytes(&mut self, bytes: &[u8]) -> io::Result<()> {
        self.inner.write_all(bytes)
    }

    fn end_chunk(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}
