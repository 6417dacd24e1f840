//! `ChunkWriter`: the orchestrator. Routes appends to the active
//! `PageEncoder`, maintains page/chunk statistics, runs the adaptive flush
//! predictor, and drives `ChunkBuffer` on seal.

use crate::chunk_buffer::ChunkBuffer;
use crate::error::{ChunkWriterError, ChunkWriterResult};
use crate::file_writer::FileWriter;
use crate::io_utils::uvarint_len;
use crate::page::PageEncoder;
use crate::schema::MeasurementSchema;
use crate::stats::Stats;
use crate::value::Value;

/// `next_check_at`'s starting point, and what it resets to after every flush.
const MIN_CHECK: u64 = 1500;

/// Builder for [`ChunkWriter`], mirroring `mcap`'s `WriteOptions`.
#[derive(Debug, Clone)]
pub struct ChunkWriterConfig {
    page_size_threshold: Option<u64>,
    page_point_upper_bound: Option<u64>,
    minimum_record_count_for_check: u64,
}

impl Default for ChunkWriterConfig {
    fn default() -> Self {
        Self {
            page_size_threshold: None,
            page_point_upper_bound: None,
            minimum_record_count_for_check: MIN_CHECK,
        }
    }
}

impl ChunkWriterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Soft target page payload size, in bytes. `0` puts the writer in
    /// diagnostic mode: every point flushes its own page.
    pub fn page_size_threshold(mut self, bytes: u64) -> Self {
        self.page_size_threshold = Some(bytes);
        self
    }

    /// Hard cap on points per page.
    pub fn page_point_upper_bound(mut self, points: u64) -> Self {
        self.page_point_upper_bound = Some(points);
        self
    }

    /// Overrides `MIN_CHECK`, the point count the predictor starts (and
    /// resets to after each flush) before it re-checks the page size
    /// estimate. Defaults to 1500.
    pub fn minimum_record_count_for_check(mut self, points: u64) -> Self {
        self.minimum_record_count_for_check = points;
        self
    }

    pub fn build(self, schema: MeasurementSchema) -> ChunkWriterResult<ChunkWriter> {
        let page_size_threshold = self
            .page_size_threshold
            .ok_or(ChunkWriterError::InvalidConfig("page_size_threshold is required"))?;
        let page_point_upper_bound = self
            .page_point_upper_bound
            .ok_or(ChunkWriterError::InvalidConfig("page_point_upper_bound is required"))?;
        if page_point_upper_bound == 0 {
            return Err(ChunkWriterError::InvalidConfig(
                "page_point_upper_bound must be > 0",
            ));
        }
        if self.minimum_record_count_for_check == 0 {
            return Err(ChunkWriterError::InvalidConfig(
                "minimum_record_count_for_check must be > 0",
            ));
        }

        Ok(ChunkWriter::new(
            schema,
            page_size_threshold,
            page_point_upper_bound,
            self.minimum_record_count_for_check,
        ))
    }
}

/// Orchestrates one series' append stream into a sequence of pages packed
/// into a chunk.
pub struct ChunkWriter {
    schema: MeasurementSchema,
    page_encoder: PageEncoder,
    page_stats: Stats,
    chunk_stats: Stats,
    chunk_buffer: ChunkBuffer,

    value_count_in_page: u64,
    next_check_at: u64,
    last_time: i64,
    page_min_ts: Option<i64>,

    page_size_threshold: u64,
    page_point_upper_bound: u64,
    min_check: u64,

    dropped_page_count: u64,
}

impl ChunkWriter {
    fn new(
        schema: MeasurementSchema,
        page_size_threshold: u64,
        page_point_upper_bound: u64,
        min_check: u64,
    ) -> Self {
        let page_encoder = PageEncoder::new(
            schema.scalar_type(),
            schema.time_encoder_spec(),
            schema.value_encoder_spec(),
        );
        let page_stats = Stats::of_type(schema.scalar_type());
        let chunk_stats = Stats::of_type(schema.scalar_type());
        let chunk_buffer = ChunkBuffer::new(schema.id().to_owned(), schema.scalar_type());

        Self {
            schema,
            page_encoder,
            page_stats,
            chunk_stats,
            chunk_buffer,
            value_count_in_page: 0,
            next_check_at: min_check,
            last_time: 0,
            page_min_ts: None,
            page_size_threshold,
            page_point_upper_bound,
            min_check,
            dropped_page_count: 0,
        }
    }

    pub fn schema(&self) -> &MeasurementSchema {
        &self.schema
    }

    /// Number of pages dropped so far due to a [`crate::error::PageError`]
    /// during flush — a hook for observing otherwise-silent page drops
    /// without escalating them to a hard error.
    pub fn dropped_page_count(&self) -> u64 {
        self.dropped_page_count
    }

    pub fn num_of_pages(&self) -> i32 {
        self.chunk_buffer.num_pages() as i32
    }

    /// Sum of the live `PageEncoder`'s estimate and the `ChunkBuffer`'s
    /// estimate.
    pub fn estimate_max_series_mem_size(&self) -> i64 {
        self.page_encoder.estimate_max_mem_size() + self.chunk_buffer.estimate_max_page_mem_size()
    }

    /// Serialised-bytes estimate: chunk-header size (a function of the
    /// series id's length) plus the buffer's accumulated page bytes.
    pub fn current_chunk_size(&self) -> i64 {
        chunk_header_size_estimate(self.schema.id()) + self.chunk_buffer.current_data_size() as i64
    }

    /// Appends one point. `value`'s type must match the series' schema
    /// type; timestamps need not be monotonic.
    pub fn write(&mut self, time: i64, value: Value) -> ChunkWriterResult<()> {
        let found = value.scalar_type();
        let expected = self.schema.scalar_type();
        if found != expected {
            return Err(ChunkWriterError::TypeMismatch { expected, found });
        }

        self.last_time = time;
        if self.page_min_ts.is_none() {
            self.page_min_ts = Some(time);
        }

        self.page_encoder.append(time, &value);
        self.page_stats.update(&value);
        self.value_count_in_page += 1;

        self.maybe_flush();
        Ok(())
    }

    /// The adaptive flush predictor: avoids querying the
    /// encoder's memory estimate on every append by only checking once
    /// `value_count_in_page` reaches `next_check_at`, and projecting the
    /// next check point from the observed growth rate.
    fn maybe_flush(&mut self) {
        if self.page_size_threshold == 0 {
            // Diagnostic mode: flush after every point.
            self.write_page();
            return;
        }

        if self.value_count_in_page >= self.page_point_upper_bound {
            self.write_page();
            return;
        }

        if self.value_count_in_page < self.next_check_at {
            return;
        }

        let estimate = self.page_encoder.estimate_max_mem_size();
        if estimate == 0 {
            // No bytes reported yet: defer the next check rather than flush.
            self.next_check_at = self.value_count_in_page + self.min_check;
            return;
        }

        if estimate as u64 > self.page_size_threshold {
            self.write_page();
            return;
        }

        let projected = (self.page_size_threshold as u128 * self.value_count_in_page as u128
            / estimate as u128) as u64;
        self.next_check_at = if projected > self.value_count_in_page {
            projected
        } else {
            self.value_count_in_page + 1
        };
    }

    /// Flushes the active page, if non-empty. Idempotent on an empty page,
    /// and shared by the predictor's hard-cap/threshold flush paths and by
    /// `seal_current_page`.
    fn write_page(&mut self) {
        if self.value_count_in_page == 0 {
            return;
        }

        let payload = self.page_encoder.serialize_uncompressed();
        let max_ts = self.last_time;
        let min_ts = self.page_min_ts.unwrap_or(self.last_time);

        match self.chunk_buffer.write_page_header_and_data(
            &payload,
            self.value_count_in_page,
            &self.page_stats,
            max_ts,
            min_ts,
        ) {
            Ok(()) => {
                log::debug!(
                    "flushed page for series '{}': {} points, {} bytes",
                    self.schema.id(),
                    self.value_count_in_page,
                    payload.len()
                );
                self.chunk_stats.merge(&self.page_stats);
            }
            Err(err) => {
                self.dropped_page_count += 1;
                log::warn!(
                    "dropping page for series '{}' ({} points lost): {}",
                    self.schema.id(),
                    self.value_count_in_page,
                    err
                );
            }
        }

        self.page_min_ts = None;
        self.value_count_in_page = 0;
        self.page_encoder.reset();
        self.page_stats = Stats::of_type(self.schema.scalar_type());
        self.next_check_at = self.min_check;
    }

    /// Flushes any residual in-memory page so it becomes part of the chunk.
    /// Calling this twice in a row is equivalent to calling it once.
    pub fn seal_current_page(&mut self) {
        self.write_page();
    }

    /// Seals, then hands the accumulated chunk off to `file_writer`, then
    /// resets chunk-level statistics for the next chunk on this series.
    pub fn write_to_file_writer(&mut self, file_writer: &mut impl FileWriter) -> ChunkWriterResult<()> {
        self.seal_current_page();
        self.chunk_buffer
            .write_all_pages_of_series_to_file(file_writer, &self.chunk_stats)?;
        self.chunk_stats = Stats::of_type(self.schema.scalar_type());
        Ok(())
    }
}

fn chunk_header_size_estimate(series_id: &str) -> i64 {
    let id_len = series_id.len();
    (uvarint_len(id_len as u64) + id_len + 1) as i64
}
