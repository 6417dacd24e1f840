//! `PageEncoder`: turns a batch of `(time, value)` pairs into two byte streams.
//!
//! Low-level encoders of this kind are otherwise out of scope for this
//! crate, so this module ships one concrete implementation, grounded on
//! `mcap`'s manual byte-framing style (`write.rs`'s `op_and_len`,
//! `records.rs`'s hand-written `write_string`) rather than a derive macro,
//! since the payload mixes varints, fixed-width values, and length-prefixed
//! blobs depending on the series' scalar type.

use byteorder::{WriteBytesExt, BE};
use std::io::{self, Write};

use crate::io_utils::{uvarint_len, write_uvarint, zigzag_decode, zigzag_encode};
use crate::value::{EncodingSpec, ScalarType, Value};

/// Accumulates one page's worth of points for a single series.
///
/// Exactly one instance is live per [`crate::writer::ChunkWriter`] at a time.
/// `append` is infallible; only `serialize_uncompressed` is CPU-bound work
/// and only `reset`/construction may be called between pages.
pub struct PageEncoder {
    scalar_type: ScalarType,
    time_encoder_spec: EncodingSpec,
    value_encoder_spec: EncodingSpec,

    time_stream: Vec<u8>,
    value_stream: Vec<u8>,
    value_count: u64,

    last_time: Option<i64>,
    last_int_value: Option<i64>,
}

impl PageEncoder {
    pub fn new(
        scalar_type: ScalarType,
        time_encoder_spec: EncodingSpec,
        value_encoder_spec: EncodingSpec,
    ) -> Self {
        Self {
            scalar_type,
            time_encoder_spec: normalize(time_encoder_spec),
            value_encoder_spec: normalize(value_encoder_spec),
            time_stream: Vec::new(),
            value_stream: Vec::new(),
            value_count: 0,
            last_time: None,
            last_int_value: None,
        }
    }

    pub fn value_count(&self) -> u64 {
        self.value_count
    }

    /// Records one point. Accumulation only — never fails.
    pub fn append(&mut self, time: i64, value: &Value) {
        self.append_time(time);
        self.append_value(value);
        self.value_count += 1;
    }

    fn append_time(&mut self, time: i64) {
        let delta = time.wrapping_sub(self.last_time.unwrap_or(0));
        let _ = write_uvarint(&mut self.time_stream, zigzag_encode(delta));
        self.last_time = Some(time);
        let _ = self.time_encoder_spec; // reserved: time stream is always delta-varint today
    }

    fn append_value(&mut self, value: &Value) {
        match value {
            Value::Bool(b) => self.value_stream.push(*b as u8),
            Value::Int32(v) => self.append_int(*v as i64),
            Value::Int64(v) => self.append_int(*v),
            Value::Float(v) => {
                let _ = self.value_stream.write_f32::<BE>(*v);
            }
            Value::Double(v) => {
                let _ = self.value_stream.write_f64::<BE>(*v);
            }
            Value::Decimal(d) => {
                let _ = self.value_stream.write_i128::<BE>(d.unscaled);
                let _ = self.value_stream.write_u8(d.scale);
            }
            Value::Binary(bytes) => {
                let _ = write_uvarint(&mut self.value_stream, bytes.len() as u64);
                self.value_stream.extend_from_slice(bytes);
            }
        }
    }

    fn append_int(&mut self, v: i64) {
        let encoded = match self.value_encoder_spec {
            EncodingSpec::DeltaVarint => {
                let delta = v.wrapping_sub(self.last_int_value.unwrap_or(0));
                self.last_int_value = Some(v);
                delta
            }
            _ => v,
        };
        let _ = write_uvarint(&mut self.value_stream, zigzag_encode(encoded));
    }

    /// Upper-bound estimate of the serialized payload size, in bytes.
    ///
    /// This implementation's streams are already fully encoded as points
    /// arrive, so this is the exact current size rather than a heuristic
    /// upper bound, and stays O(1) to call.
    pub fn estimate_max_mem_size(&self) -> i64 {
        (self.payload_len()) as i64
    }

    fn payload_len(&self) -> usize {
        uvarint_len(self.time_stream.len() as u64) + self.time_stream.len() + self.value_stream.len()
    }

    /// Produces the page payload: the two streams concatenated, with the
    /// time stream's byte length prefixed so a reader can split them back
    /// apart. Infallible: both streams are already-encoded in-memory
    /// buffers, so there is nothing left that can fail at this point.
    pub fn serialize_uncompressed(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.payload_len());
        let _ = write_uvarint(&mut out, self.time_stream.len() as u64);
        out.extend_from_slice(&self.time_stream);
        out.extend_from_slice(&self.value_stream);
        out
    }

    /// Clears internal state; `value_count()` returns to 0.
    pub fn reset(&mut self) {
        self.time_stream.clear();
        self.value_stream.clear();
        self.value_count = 0;
        self.last_time = None;
        self.last_int_value = None;
    }
}

fn normalize(spec: EncodingSpec) -> EncodingSpec {
    if spec == EncodingSpec::Rle {
        log::warn!("RLE encoding is not implemented by this crate; falling back to Plain");
        EncodingSpec::Plain
    } else {
        spec
    }
}

/// Byte length of a page header given its constituent field values, computable
/// without touching the payload bytes.
pub fn page_header_encoded_len(value_count: u64, payload_len: u64, stats_len: usize) -> usize {
    uvarint_len(value_count) + uvarint_len(payload_len) + 8 + 8 + stats_len
}

/// Writes a page header: `value_count` varint, payload byte length varint,
/// `max_ts`/`min_ts` as big-endian `i64`, then the pre-serialized statistics
/// bytes.
pub fn write_page_header<W: Write>(
    w: &mut W,
    value_count: u64,
    payload_len: u64,
    max_ts: i64,
    min_ts: i64,
    stats_bytes: &[u8],
) -> io::Result<()> {
    write_uvarint(w, value_count)?;
    write_uvarint(w, payload_len)?;
    w.write_i64::<BE>(max_ts)?;
    w.write_i64::<BE>(min_ts)?;
    w.write_all(stats_bytes)?;
    Ok(())
}

#[allow(dead_code)]
fn decode_zigzag_delta_stream(deltas: &[i64]) -> Vec<i64> {
    // Reference-only helper documenting how a reader would reconstruct
    // absolute timestamps from `time_stream`; this crate never reads its
    // own format back, but keeping this nearby makes the append_time
    // encoding's inverse obvious to whoever implements a reader.
    let mut out = Vec::with_capacity(deltas.len());
    let mut last = 0i64;
    for &d in deltas {
        last = last.wrapping_add(d);
        out.push(last);
    }
    out
}
