mod common;

use tschunk::error::ChunkWriterError;
use tschunk::file_writer::IoFileWriter;
use tschunk::value::Value;

/// Hard-cap flush at `page_point_upper_bound` points.
#[test]
fn hard_cap_flush_produces_one_page_with_expected_stats() -> anyhow::Result<()> {
    let mut writer = common::int64_writer(1000, 4);
    for (t, v) in [(1i64, 10i64), (2, 20), (3, 30), (4, 40)] {
        writer.write(t, Value::Int64(v))?;
    }
    writer.seal_current_page();
    assert_eq!(writer.num_of_pages(), 1);

    let mut out = Vec::new();
    let mut file_writer = IoFileWriter::new(&mut out);
    writer.write_to_file_writer(&mut file_writer)?;
    // header (series id + type tag + varints) + one page's header + 4 points' payload
    assert!(out.len() > 4);
    Ok(())
}

/// A short page sealed manually, not via the hard cap.
#[test]
fn manual_seal_with_constant_values_tracks_bounds() -> anyhow::Result<()> {
    let mut writer = common::int64_writer(1000, 100);
    for (t, v) in [(1i64, 5i64), (2, 5), (3, 5)] {
        writer.write(t, Value::Int64(v))?;
    }
    writer.seal_current_page();
    assert_eq!(writer.num_of_pages(), 1);
    Ok(())
}

/// A type mismatch leaves the in-progress page untouched.
#[test]
fn type_mismatch_rejects_without_mutating_state() -> anyhow::Result<()> {
    let mut writer = common::int64_writer(1000, 4);
    writer.write(1, Value::Int64(10))?;

    let result = writer.write(2, Value::Float(1.5));
    assert!(matches!(
        result,
        Err(ChunkWriterError::TypeMismatch { .. })
    ));

    // the rejected write must not have advanced the page toward a flush.
    writer.write(3, Value::Int64(20))?;
    writer.write(4, Value::Int64(30))?;
    writer.write(5, Value::Int64(40))?;
    // upper bound is 4: three accepted writes plus this one hit the cap.
    assert_eq!(writer.num_of_pages(), 1);
    Ok(())
}

/// An empty writer still emits a well-formed, empty chunk.
#[test]
fn empty_writer_emits_zero_page_chunk() -> anyhow::Result<()> {
    let mut writer = common::int64_writer(1000, 4);
    let mut out = Vec::new();
    let mut file_writer = IoFileWriter::new(&mut out);
    writer.write_to_file_writer(&mut file_writer)?;
    assert_eq!(writer.num_of_pages(), 0);
    assert!(!out.is_empty(), "chunk header is still written");
    Ok(())
}

/// A single point becomes a one-point page on seal.
#[test]
fn single_point_becomes_one_page() -> anyhow::Result<()> {
    let mut writer = common::int64_writer(1000, 4);
    writer.write(7, Value::Int64(100))?;
    writer.seal_current_page();
    assert_eq!(writer.num_of_pages(), 1);
    Ok(())
}

/// Splitting one append sequence across two seals yields the same total
/// point count as a single seal, with more pages.
#[test]
fn splitting_a_sequence_preserves_total_points_but_not_page_count() -> anyhow::Result<()> {
    let points: Vec<(i64, i64)> = (0..20).map(|i| (i, i * 3)).collect();

    let mut one_shot = common::int64_writer(1_000_000, 1000);
    for (t, v) in &points {
        one_shot.write(*t, Value::Int64(*v))?;
    }
    one_shot.seal_current_page();
    assert_eq!(one_shot.num_of_pages(), 1);

    let mut two_parts = common::int64_writer(1_000_000, 1000);
    for (t, v) in &points[..8] {
        two_parts.write(*t, Value::Int64(*v))?;
    }
    two_parts.seal_current_page();
    for (t, v) in &points[8..] {
        two_parts.write(*t, Value::Int64(*v))?;
    }
    two_parts.seal_current_page();
    assert_eq!(two_parts.num_of_pages(), 2);

    Ok(())
}

/// No emitted page exceeds `page_point_upper_bound`.
#[test]
fn no_page_exceeds_the_upper_bound() -> anyhow::Result<()> {
    let mut writer = common::int64_writer(1_000_000, 4);
    for i in 0..17i64 {
        writer.write(i, Value::Int64(i))?;
    }
    writer.seal_current_page();
    // 17 points capped at 4 per page: 4 full pages plus a final page of 1.
    assert_eq!(writer.num_of_pages(), 5);
    Ok(())
}

/// `seal_current_page` is idempotent.
#[test]
fn sealing_twice_in_a_row_is_a_no_op_the_second_time() -> anyhow::Result<()> {
    let mut writer = common::int64_writer(1000, 100);
    writer.write(1, Value::Int64(1))?;
    writer.seal_current_page();
    assert_eq!(writer.num_of_pages(), 1);
    writer.seal_current_page();
    assert_eq!(writer.num_of_pages(), 1);
    Ok(())
}
