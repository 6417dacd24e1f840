//! Error types for the chunk writer.

use thiserror::Error;

use crate::value::ScalarType;

/// Errors surfaced to callers of [`crate::writer::ChunkWriter`].
///
/// Page-level failures (a statistics/series type mismatch during flush) are
/// *not* represented here: the writer recovers from those locally by
/// dropping the page (see [`crate::writer::ChunkWriter::dropped_page_count`])
/// and only construction errors and terminal I/O errors reach the caller.
#[derive(Error, Debug)]
pub enum ChunkWriterError {
    #[error("value of type {found:?} does not match series type {expected:?}")]
    TypeMismatch {
        expected: ScalarType,
        found: ScalarType,
    },

    #[error("invalid chunk writer configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("i/o error writing chunk: {0}")]
    Io(#[from] std::io::Error),
}

pub type ChunkWriterResult<T> = Result<T, ChunkWriterError>;

/// Raised internally when a page cannot be handed off to the [`crate::chunk_buffer::ChunkBuffer`].
///
/// Callers never see this directly; [`crate::writer::ChunkWriter::write_page`] logs it and
/// drops the page.
#[derive(Error, Debug)]
pub enum PageError {
    #[error("statistics for type {0:?} could not be serialized: {1}")]
    BadStatistics(ScalarType, &'static str),

    /// Declared for contract completeness with the page-write interface, but
    /// unreachable with this crate's own `ChunkBuffer`/`PageEncoder`, which
    /// only ever write into in-memory `Vec<u8>` buffers. See DESIGN.md.
    #[error("i/o error serializing page: {0}")]
    Io(#[from] std::io::Error),
}
