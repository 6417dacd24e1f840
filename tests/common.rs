use tschunk::schema::MeasurementSchema;
use tschunk::value::ScalarType;
use tschunk::writer::{ChunkWriter, ChunkWriterConfig};

pub fn int64_writer(page_size_threshold: u64, page_point_upper_bound: u64) -> ChunkWriter {
    ChunkWriterConfig::new()
        .page_size_threshold(page_size_threshold)
        .page_point_upper_bound(page_point_upper_bound)
        .build(MeasurementSchema::new("room_temp", ScalarType::Int64))
        .expect("valid config")
}
