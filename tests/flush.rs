mod common;

use tschunk::value::Value;

/// Once the predicted size estimate exceeds `page_size_threshold` at the
/// first check point, the page flushes there and the next page resets its
/// check point to `MIN_CHECK`.
///
/// `PageEncoder::estimate_max_mem_size` is the real running byte count, so
/// this test picks a threshold the real per-point growth rate (roughly 2
/// bytes/point for small constant-delta INT64 values) will exceed by the
/// first check at 1500 points.
#[test]
fn predictor_flushes_once_the_estimate_exceeds_threshold_at_first_check() -> anyhow::Result<()> {
    let mut writer = common::int64_writer(2500, 1_000_000);
    for i in 0..1500i64 {
        writer.write(i, Value::Int64(i))?;
    }
    assert_eq!(
        writer.num_of_pages(),
        1,
        "estimate at the 1500-point check should have exceeded the threshold"
    );

    // the next page re-checks starting from MIN_CHECK, not immediately.
    for i in 1500..1510i64 {
        writer.write(i, Value::Int64(i))?;
    }
    assert_eq!(writer.num_of_pages(), 1, "second page hasn't hit its own check yet");
    writer.seal_current_page();
    assert_eq!(writer.num_of_pages(), 2);
    Ok(())
}

/// When the estimate at the first check is comfortably under threshold, the
/// predictor projects a later `next_check_at` rather than flushing, and the
/// page keeps growing until that projected point.
///
/// With this crate's real, exact byte-counting estimator, a
/// constant-delta INT64 series' payload size at `N` points works out to
/// `3*N - 62` bytes for `N >= 64` (1 byte/point for the delta-encoded time
/// stream, 2 bytes/point for the zigzag-varint value stream once values
/// exceed 63). At the first check (`N = 1500`) that's 4438 bytes; against a
/// 6000-byte threshold the predictor projects
/// `floor(6000 * 1500 / 4438) = 2027` as the next check point, which is
/// where `3*N - 62` first exceeds 6000.
#[test]
fn predictor_defers_flush_and_projects_a_later_check_point() -> anyhow::Result<()> {
    let mut writer = common::int64_writer(6000, 1_000_000);
    for i in 0..1500i64 {
        writer.write(i, Value::Int64(i))?;
    }
    assert_eq!(
        writer.num_of_pages(),
        0,
        "estimate at 1500 points (4438 bytes) should stay under a 6000-byte threshold"
    );

    // the projected check point is 2027; nothing should flush before it.
    for i in 1500..2026i64 {
        writer.write(i, Value::Int64(i))?;
    }
    assert_eq!(writer.num_of_pages(), 0, "projected check point not yet reached");

    // the 2027th point lands exactly on the projected check; its estimate
    // (6019 bytes) exceeds the threshold, so this is where the flush fires.
    writer.write(2026, Value::Int64(2026))?;
    assert_eq!(writer.num_of_pages(), 1);
    Ok(())
}

/// Diagnostic mode: `page_size_threshold == 0` flushes every point into its
/// own page.
#[test]
fn zero_threshold_is_diagnostic_mode() -> anyhow::Result<()> {
    let mut writer = common::int64_writer(0, 1_000_000);
    for i in 0..5i64 {
        writer.write(i, Value::Int64(i))?;
    }
    assert_eq!(writer.num_of_pages(), 5);
    Ok(())
}
