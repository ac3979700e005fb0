//! Timestamp and window-index math shared across the crate.

use ffmpeg_next::Rational;

/// Rescale a PTS value from stream time base to seconds.
pub(crate) fn pts_to_seconds(pts: i64, time_base: Rational) -> f64 {
    pts as f64 * time_base.numerator() as f64 / time_base.denominator() as f64
}

/// Timestamp of a frame given its ordinal index and the stream frame rate.
///
/// Used when the decoder produces frames without presentation timestamps.
/// `frames_per_second` must be positive; [`crate::VideoSource::open`]
/// rejects sources where it is not.
pub(crate) fn ordinal_to_seconds(frame_number: u64, frames_per_second: f64) -> f64 {
    frame_number as f64 / frames_per_second
}

/// The index of the half-open window `[i * interval, (i + 1) * interval)`
/// containing `timestamp`.
pub(crate) fn window_index(timestamp: f64, interval_seconds: f64) -> u64 {
    let index = (timestamp / interval_seconds).floor();
    if index <= 0.0 { 0 } else { index as u64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pts_rescaling() {
        // 90 kHz time base, 90_000 ticks = 1 second.
        let time_base = Rational::new(1, 90_000);
        assert_eq!(pts_to_seconds(90_000, time_base), 1.0);
        assert_eq!(pts_to_seconds(45_000, time_base), 0.5);
        assert_eq!(pts_to_seconds(0, time_base), 0.0);
    }

    #[test]
    fn ordinal_fallback() {
        assert_eq!(ordinal_to_seconds(0, 10.0), 0.0);
        assert_eq!(ordinal_to_seconds(25, 10.0), 2.5);
        assert_eq!(ordinal_to_seconds(30, 30.0), 1.0);
    }

    #[test]
    fn window_boundaries_are_half_open() {
        assert_eq!(window_index(0.0, 1.0), 0);
        assert_eq!(window_index(0.999, 1.0), 0);
        assert_eq!(window_index(1.0, 1.0), 1);
        assert_eq!(window_index(2.5, 1.0), 2);
        assert_eq!(window_index(5.0, 2.5), 2);
    }

    #[test]
    fn window_index_clamps_negative_timestamps() {
        // Streams occasionally report a small negative first PTS.
        assert_eq!(window_index(-0.04, 1.0), 0);
    }
}
