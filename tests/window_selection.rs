//! Window selection properties.
//!
//! These tests drive the selection fold directly with synthetic frames of
//! known sharpness, so they need no media fixtures and no FFmpeg.

use image::{DynamicImage, GrayImage, Luma};
use stillpick::{ScoredFrame, SelectedWindow, WindowAccumulator, laplacian_variance};

/// A frame whose score is supplied directly.
fn frame(frame_number: u64, timestamp: f64, score: f64) -> ScoredFrame {
    ScoredFrame {
        frame_number,
        timestamp,
        score,
        image: DynamicImage::new_rgb8(4, 4),
    }
}

/// A checkerboard with the given tile size: smaller tiles = sharper.
fn synthetic_image(tile: u32) -> DynamicImage {
    let image = GrayImage::from_fn(32, 32, |x, y| {
        if ((x / tile) + (y / tile)) % 2 == 0 {
            Luma([255])
        } else {
            Luma([0])
        }
    });
    DynamicImage::ImageLuma8(image)
}

/// Run a full stream of frames through the fold and collect every window.
fn select_all(
    interval_seconds: f64,
    frames: impl IntoIterator<Item = ScoredFrame>,
) -> Vec<SelectedWindow> {
    let mut windows = WindowAccumulator::new(interval_seconds).expect("valid interval");
    let mut selected = Vec::new();
    for item in frames {
        if let Some(window) = windows.push(item) {
            selected.push(window);
        }
    }
    if let Some(window) = windows.finish() {
        selected.push(window);
    }
    selected
}

#[test]
fn each_window_emits_its_maximum_scoring_frame() {
    // 3 seconds at 10 fps, interval 1.0: thirty frames, three windows.
    // Sharpness pattern peaks at a known frame in each window.
    let frames = (0..30).map(|n| {
        let timestamp = n as f64 / 10.0;
        let score = match n {
            7 => 90.0,
            13 => 80.0,
            21 => 70.0,
            _ => (n % 5) as f64,
        };
        frame(n, timestamp, score)
    });

    let selected = select_all(1.0, frames);

    assert_eq!(selected.len(), 3);
    assert_eq!(
        selected.iter().map(|w| w.window_index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
    assert_eq!(
        selected.iter().map(|w| w.frame_number).collect::<Vec<_>>(),
        vec![7, 13, 21]
    );
}

#[test]
fn equal_scores_keep_the_earliest_frame() {
    let frames = vec![
        frame(0, 0.0, 5.0),
        frame(1, 0.1, 5.0),
        frame(2, 0.2, 5.0),
    ];
    let selected = select_all(1.0, frames);

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].frame_number, 0);
}

#[test]
fn later_strictly_greater_score_wins() {
    let selected = select_all(1.0, vec![frame(0, 0.0, 5.0), frame(1, 0.5, 5.1)]);
    assert_eq!(selected[0].frame_number, 1);
}

#[test]
fn windows_without_frames_emit_nothing() {
    // A frame at 0.3s and the next at 5.2s: windows 1-4 are empty.
    let selected = select_all(1.0, vec![frame(0, 0.3, 1.0), frame(1, 5.2, 2.0)]);

    assert_eq!(
        selected.iter().map(|w| w.window_index).collect::<Vec<_>>(),
        vec![0, 5]
    );
}

#[test]
fn interval_longer_than_video_yields_one_window() {
    let frames = (0..30).map(|n| frame(n, n as f64 / 10.0, n as f64));
    let selected = select_all(60.0, frames);

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].window_index, 0);
    // Highest score in the only window is the last frame.
    assert_eq!(selected[0].frame_number, 29);
}

#[test]
fn empty_stream_yields_no_windows() {
    let selected = select_all(1.0, Vec::new());
    assert!(selected.is_empty());
}

#[test]
fn window_indices_strictly_increase() {
    let frames = (0..100).map(|n| frame(n, n as f64 / 7.0, (n % 11) as f64));
    let selected = select_all(2.0, frames);

    for pair in selected.windows(2) {
        assert!(pair[0].window_index < pair[1].window_index);
    }
}

#[test]
fn result_count_equals_nonempty_window_count() {
    // Frames clustered into windows 0, 2, and 7 only.
    let timestamps = [0.1, 0.4, 2.2, 2.9, 7.0, 7.5, 7.9];
    let frames = timestamps
        .iter()
        .enumerate()
        .map(|(n, &timestamp)| frame(n as u64, timestamp, n as f64));
    let selected = select_all(1.0, frames);

    assert_eq!(selected.len(), 3);
    assert_eq!(
        selected.iter().map(|w| w.window_index).collect::<Vec<_>>(),
        vec![0, 2, 7]
    );
}

#[test]
fn dropped_frames_attach_to_the_open_window() {
    let mut windows = WindowAccumulator::new(1.0).expect("valid interval");

    // A failure before any frame is charged to the first window to open.
    windows.note_dropped();
    assert!(windows.push(frame(0, 0.1, 1.0)).is_none());
    windows.note_dropped();

    let first = windows.push(frame(1, 1.2, 2.0)).expect("window 0 closed");
    assert_eq!(first.dropped_frames, 2);

    let last = windows.finish().expect("window 1 flushed");
    assert_eq!(last.dropped_frames, 0);
}

#[test]
fn scored_synthetic_images_rank_by_detail() {
    // Fine checkerboard vs coarse checkerboard vs flat: the fold fed with
    // real scores must pick the finest pattern.
    let fine = synthetic_image(1);
    let coarse = synthetic_image(8);
    let flat = DynamicImage::ImageLuma8(GrayImage::from_pixel(32, 32, Luma([128])));

    let candidates = [
        (0_u64, 0.0, flat),
        (1, 0.3, coarse),
        (2, 0.6, fine.clone()),
    ];

    let mut windows = WindowAccumulator::new(1.0).expect("valid interval");
    for (frame_number, timestamp, image) in candidates {
        let score = laplacian_variance(&image);
        windows.push(ScoredFrame {
            frame_number,
            timestamp,
            score,
            image,
        });
    }

    let winner = windows.finish().expect("one window");
    assert_eq!(winner.frame_number, 2);
    assert_eq!(winner.image.as_bytes(), fine.as_bytes());
}

#[test]
fn zero_interval_is_rejected() {
    assert!(WindowAccumulator::new(0.0).is_err());
    assert!(WindowAccumulator::new(-2.0).is_err());
    assert!(WindowAccumulator::new(f64::NAN).is_err());
}
