//! Concurrent processing of many videos.
//!
//! [`run_jobs`] fans sharpest-frame selection out across a fixed-size
//! worker pool. Every [`VideoJob`] is fully independent: each worker opens
//! its own demuxer and decoder, threads its own window state, and writes
//! only its own output paths, so jobs share no mutable state and a failing
//! job never cancels its siblings. Outcomes are aggregated and returned
//! once all jobs have reached a terminal state.

use std::path::PathBuf;

use rayon::iter::{IntoParallelIterator, ParallelIterator};

use crate::config::SelectOptions;
use crate::error::StillpickError;
use crate::output::{OutputLayout, video_stem};
use crate::source::VideoSource;

/// One video's end-to-end unit of work.
#[derive(Debug, Clone)]
pub struct VideoJob {
    /// Path of the input video.
    pub video: PathBuf,
}

impl VideoJob {
    /// Create a job for one input video.
    pub fn new<P: Into<PathBuf>>(video: P) -> Self {
        Self {
            video: video.into(),
        }
    }
}

/// Counters from one successfully completed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobSummary {
    /// Number of images written to disk (one per non-empty window).
    pub frames_written: u64,
    /// Frames lost to recoverable decode errors across all windows.
    pub dropped_frames: u64,
}

/// Terminal outcome of one job.
#[derive(Debug)]
pub struct JobOutcome {
    /// The input video this outcome belongs to.
    pub video: PathBuf,
    /// Success with counters, or the error that ended the job.
    pub result: Result<JobSummary, StillpickError>,
}

impl JobOutcome {
    /// Whether the job completed without a fatal error.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Process a batch of videos concurrently.
///
/// Builds a worker pool sized by
/// [`SelectOptions::concurrency`](crate::SelectOptions) (available hardware
/// parallelism when `None`), runs one task per job, and returns exactly one
/// [`JobOutcome`] per input job. Outcome order matches job order; completion
/// order is unspecified. Never fails fast: a job that cannot open its video
/// is reported in its outcome while the rest of the batch proceeds.
///
/// # Errors
///
/// Returns an error only for problems that precede all jobs: an invalid
/// configuration or a worker pool that cannot be built.
///
/// # Example
///
/// ```no_run
/// use stillpick::{SelectOptions, VideoJob, run_jobs};
///
/// let jobs = vec![VideoJob::new("a.mp4"), VideoJob::new("b.mp4")];
/// let outcomes = run_jobs(jobs, &SelectOptions::new())?;
/// for outcome in &outcomes {
///     match &outcome.result {
///         Ok(summary) => println!("{}: {} written", outcome.video.display(), summary.frames_written),
///         Err(error) => eprintln!("{}: {error}", outcome.video.display()),
///     }
/// }
/// # Ok::<(), stillpick::StillpickError>(())
/// ```
pub fn run_jobs(
    jobs: Vec<VideoJob>,
    options: &SelectOptions,
) -> Result<Vec<JobOutcome>, StillpickError> {
    run_jobs_with(jobs, options, |_| {})
}

/// Like [`run_jobs`], invoking `on_outcome` from the worker as each job
/// reaches its terminal state. Used by the CLI to advance its progress bar.
pub fn run_jobs_with<F>(
    jobs: Vec<VideoJob>,
    options: &SelectOptions,
    on_outcome: F,
) -> Result<Vec<JobOutcome>, StillpickError>
where
    F: Fn(&JobOutcome) + Send + Sync,
{
    options.validate()?;

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(limit) = options.concurrency {
        builder = builder.num_threads(limit);
    }
    let pool = builder
        .build()
        .map_err(|error| StillpickError::ThreadPool(error.to_string()))?;

    let layout = options.layout();
    let interval = options.interval;

    log::debug!(
        "Dispatching {} job(s) across {} worker(s)",
        jobs.len(),
        pool.current_num_threads()
    );

    let outcomes = pool.install(|| {
        jobs.into_par_iter()
            .map(|job| {
                let result = process_job(&job, interval, &layout);
                let outcome = JobOutcome {
                    video: job.video,
                    result,
                };
                on_outcome(&outcome);
                outcome
            })
            .collect()
    });

    Ok(outcomes)
}

/// Run one job to completion: open, select, write.
fn process_job(
    job: &VideoJob,
    interval_seconds: f64,
    layout: &OutputLayout,
) -> Result<JobSummary, StillpickError> {
    let stem = video_stem(&job.video);
    let mut source = VideoSource::open(&job.video)?;
    layout.prepare_video_dir(&stem)?;

    let mut frames_written = 0_u64;
    let mut dropped_frames = 0_u64;

    for selected in source.sharpest_frames(interval_seconds)? {
        let selected = selected?;
        let frame_path = layout.frame_path(&stem, selected.window_index);
        selected
            .image
            .save(&frame_path)
            .map_err(|error| StillpickError::OutputWrite {
                path: frame_path.clone(),
                reason: error.to_string(),
            })?;

        log::debug!(
            "{}: window {} -> {} (score {:.1}, frame {} at {:.3}s)",
            job.video.display(),
            selected.window_index,
            frame_path.display(),
            selected.score,
            selected.frame_number,
            selected.timestamp,
        );

        frames_written += 1;
        dropped_frames += selected.dropped_frames;
    }

    log::info!(
        "Finished {}: {} frame(s) written, {} dropped",
        job.video.display(),
        frames_written,
        dropped_frames,
    );

    Ok(JobSummary {
        frames_written,
        dropped_frames,
    })
}
