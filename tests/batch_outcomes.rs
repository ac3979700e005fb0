//! Batch runner outcome aggregation.
//!
//! The half of these tests that decodes real video requires
//! `tests/fixtures/sample_video.mp4` and is skipped when it is absent;
//! failure-path behaviour needs no fixtures.

use std::path::Path;

use stillpick::{SelectOptions, StillpickError, VideoJob, run_jobs};

fn sample_video_path() -> &'static str {
    "tests/fixtures/sample_video.mp4"
}

#[test]
fn unopenable_video_produces_one_failed_outcome() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let options = SelectOptions::new().with_output_dir(temporary_directory.path());

    let jobs = vec![VideoJob::new("this_file_does_not_exist.mp4")];
    let outcomes = run_jobs(jobs, &options).expect("batch itself runs");

    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].is_success());

    let error_message = outcomes[0].result.as_ref().unwrap_err().to_string();
    assert!(
        error_message.contains("Failed to open video file"),
        "Error should mention the open failure: {error_message}",
    );
}

#[test]
fn garbage_file_produces_a_failed_outcome() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let garbage_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&garbage_path, b"this is not a media file").expect("write garbage");

    let options = SelectOptions::new().with_output_dir(temporary_directory.path().join("out"));
    let outcomes = run_jobs(vec![VideoJob::new(&garbage_path)], &options).expect("batch runs");

    assert_eq!(outcomes.len(), 1);
    assert!(!outcomes[0].is_success());
}

#[test]
fn every_job_reaches_exactly_one_outcome() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let options = SelectOptions::new()
        .with_output_dir(temporary_directory.path())
        .with_concurrency(Some(2));

    let jobs = vec![
        VideoJob::new("missing_a.mp4"),
        VideoJob::new("missing_b.mp4"),
        VideoJob::new("missing_c.mp4"),
    ];
    let outcomes = run_jobs(jobs, &options).expect("batch runs");

    assert_eq!(outcomes.len(), 3);
    // Outcome order matches job order regardless of completion order.
    assert_eq!(outcomes[0].video, Path::new("missing_a.mp4"));
    assert_eq!(outcomes[1].video, Path::new("missing_b.mp4"));
    assert_eq!(outcomes[2].video, Path::new("missing_c.mp4"));
}

#[test]
fn invalid_interval_fails_before_any_job() {
    let options = SelectOptions::new().with_interval(0.0);
    let result = run_jobs(vec![VideoJob::new("whatever.mp4")], &options);

    assert!(matches!(result, Err(StillpickError::InvalidInterval)));
}

#[test]
fn one_bad_video_does_not_affect_its_siblings() {
    let fixture = sample_video_path();
    if !Path::new(fixture).exists() {
        return;
    }

    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let options = SelectOptions::new().with_output_dir(temporary_directory.path());

    let jobs = vec![
        VideoJob::new("this_file_does_not_exist.mp4"),
        VideoJob::new(fixture),
    ];
    let outcomes = run_jobs(jobs, &options).expect("batch runs");

    assert_eq!(outcomes.len(), 2);
    assert!(!outcomes[0].is_success());

    let summary = outcomes[1]
        .result
        .as_ref()
        .expect("valid video succeeds despite failing sibling");
    assert!(summary.frames_written >= 1);
}

#[test]
fn flat_mode_writes_stem_prefixed_files_into_one_directory() {
    let fixture = sample_video_path();
    if !Path::new(fixture).exists() {
        return;
    }

    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let options = SelectOptions::new()
        .with_output_dir(temporary_directory.path())
        .with_flat(true);

    let outcomes = run_jobs(vec![VideoJob::new(fixture)], &options).expect("batch runs");
    assert!(outcomes[0].is_success());

    let first_frame = temporary_directory.path().join("sample_video_0000.jpg");
    assert!(
        first_frame.is_file(),
        "expected {} to exist",
        first_frame.display()
    );

    let subdirectories: Vec<_> = std::fs::read_dir(temporary_directory.path())
        .expect("read dir")
        .filter_map(Result::ok)
        .filter(|entry| entry.path().is_dir())
        .collect();
    assert!(subdirectories.is_empty(), "flat mode must not create subdirectories");
}
