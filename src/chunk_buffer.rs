//! `ChunkBuffer`: accumulates completed pages for one series until sealed.

use crate::error::PageError;
use crate::file_writer::FileWriter;
use crate::page::{page_header_encoded_len, write_page_header};
use crate::stats::Stats;
use crate::value::ScalarType;

/// Accumulates completed page byte blocks (header + payload) for one
/// in-progress chunk.
///
/// Pages appear in the emitted chunk in insertion order — this crate never
/// reorders for performance.
pub struct ChunkBuffer {
    series_id: String,
    scalar_type: ScalarType,
    pages: Vec<u8>,
    num_pages: u32,
    current_data_size: u64,
    chunk_min_ts: Option<i64>,
    chunk_max_ts: Option<i64>,
}

impl ChunkBuffer {
    pub fn new(series_id: impl Into<String>, scalar_type: ScalarType) -> Self {
        Self {
            series_id: series_id.into(),
            scalar_type,
            pages: Vec::new(),
            num_pages: 0,
            current_data_size: 0,
            chunk_min_ts: None,
            chunk_max_ts: None,
        }
    }

    pub fn num_pages(&self) -> u32 {
        self.num_pages
    }

    pub fn current_data_size(&self) -> u64 {
        self.current_data_size
    }

    /// Upper-bound estimate of this buffer's current in-memory footprint.
    /// Fed into [`crate::writer::ChunkWriter::estimate_max_series_mem_size`]
    /// alongside the live `PageEncoder`'s own estimate.
    pub fn estimate_max_page_mem_size(&self) -> i64 {
        self.current_data_size as i64
    }

    pub fn chunk_min_ts(&self) -> Option<i64> {
        self.chunk_min_ts
    }

    pub fn chunk_max_ts(&self) -> Option<i64> {
        self.chunk_max_ts
    }

    /// Appends one page: writes its header followed by its payload into the
    /// buffer, and folds `max_ts`/`min_ts` into the chunk-wide bounds.
    ///
    /// Fails with [`PageError::BadStatistics`] if the statistics variant
    /// doesn't match this buffer's series type — the caller
    /// (`ChunkWriter::write_page`) is responsible for dropping the page on
    /// error. `PageError::Io` cannot actually occur here: both the
    /// statistics serialization below and the header/payload writes land in
    /// this buffer's own `Vec<u8>`, which never fails to write. See
    /// DESIGN.md for why the variant is kept anyway.
    pub fn write_page_header_and_data(
        &mut self,
        payload_bytes: &[u8],
        value_count: u64,
        page_stats: &Stats,
        max_ts: i64,
        min_ts: i64,
    ) -> Result<(), PageError> {
        if page_stats.scalar_type() != self.scalar_type {
            return Err(PageError::BadStatistics(
                page_stats.scalar_type(),
                "statistics type does not match series type",
            ));
        }

        let mut stats_bytes = Vec::new();
        page_stats.serialize(&mut stats_bytes)?;

        let header_len = page_header_encoded_len(value_count, payload_bytes.len() as u64, stats_bytes.len());
        self.pages.reserve(header_len + payload_bytes.len());
        write_page_header(
            &mut self.pages,
            value_count,
            payload_bytes.len() as u64,
            max_ts,
            min_ts,
            &stats_bytes,
        )?;
        self.pages.extend_from_slice(payload_bytes);

        self.num_pages += 1;
        self.current_data_size += (header_len + payload_bytes.len()) as u64;
        self.chunk_min_ts = Some(self.chunk_min_ts.map_or(min_ts, |m| m.min(min_ts)));
        self.chunk_max_ts = Some(self.chunk_max_ts.map_or(max_ts, |m| m.max(max_ts)));

        Ok(())
    }

    /// Emits the chunk header followed by all accumulated page bytes to
    /// `file_writer`, then clears this buffer.
    pub fn write_all_pages_of_series_to_file(
        &mut self,
        file_writer: &mut impl FileWriter,
        chunk_stats: &Stats,
    ) -> std::io::Result<()> {
        file_writer.start_chunk(
            &self.series_id,
            self.scalar_type,
            self.current_data_size,
            chunk_stats,
            self.num_pages,
        )?;
        file_writer.append_bytes(&self.pages)?;
        file_writer.end_chunk()?;
        self.reset();
        Ok(())
    }

    /// Discards accumulated pages.
    pub fn reset(&mut self) {
        self.pages.clear();
        self.num_pages = 0;
        self.current_data_size = 0;
        self.chunk_min_ts = None;
        self.chunk_max_ts = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file_writer::IoFileWriter;
    use crate::value::Value;

    #[test]
    fn single_page_sets_min_max_to_its_own_bounds() {
        let mut buf = ChunkBuffer::new("s1", ScalarType::Int64);
        let mut stats = Stats::of_type(ScalarType::Int64);
        stats.update(&Value::Int64(7));
        buf.write_page_header_and_data(&[1, 2, 3], 1, &stats, 5, 5).unwrap();
        assert_eq!(buf.num_pages(), 1);
        assert_eq!(buf.chunk_min_ts(), Some(5));
        assert_eq!(buf.chunk_max_ts(), Some(5));
    }

    #[test]
    fn multiple_pages_widen_chunk_bounds_and_keep_order() {
        let mut buf = ChunkBuffer::new("s1", ScalarType::Int64);
        let mut stats = Stats::of_type(ScalarType::Int64);
        stats.update(&Value::Int64(1));
        buf.write_page_header_and_data(&[0xAA], 1, &stats, 10, 1).unwrap();
        buf.write_page_header_and_data(&[0xBB], 1, &stats, 20, 15).unwrap();
        assert_eq!(buf.num_pages(), 2);
        assert_eq!(buf.chunk_min_ts(), Some(1));
        assert_eq!(buf.chunk_max_ts(), Some(20));

        let mut out = Vec::new();
        let mut fw = IoFileWriter::new(&mut out);
        let chunk_stats = Stats::of_type(ScalarType::Int64);
        buf.write_all_pages_of_series_to_file(&mut fw, &chunk_stats).unwrap();
        // page bytes preserve insertion order: 0xAA's page precedes 0xBB's.
        let aa_pos = out.windows(1).position(|w| w == [0xAA]).unwrap();
        let bb_pos = out.windows(1).position(|w| w == [0xBB]).unwrap();
        assert!(aa_pos < bb_pos);
        assert_eq!(buf.num_pages(), 0, "buffer clears itself after emitting");
    }

    #[test]
    fn empty_buffer_emits_zero_page_chunk() {
        let mut buf = ChunkBuffer::new("empty", ScalarType::Double);
        let mut out = Vec::new();
        let mut fw = IoFileWriter::new(&mut out);
        let chunk_stats = Stats::of_type(ScalarType::Double);
        buf.write_all_pages_of_series_to_file(&mut fw, &chunk_stats).unwrap();
        assert!(!out.is_empty(), "chunk header is still emitted");
        assert_eq!(buf.num_pages(), 0);
    }

    #[test]
    fn rejects_mismatched_statistics_type() {
        let mut buf = ChunkBuffer::new("s1", ScalarType::Int64);
        let stats = Stats::of_type(ScalarType::Double);
        let err = buf.write_page_header_and_data(&[], 0, &stats, 0, 0);
        assert!(err.is_err());
    }
}
