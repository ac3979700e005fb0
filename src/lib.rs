//! # stillpick
//!
//! Pick the sharpest frame from every fixed-length time interval of a video
//! and save it as an image, powered by FFmpeg via the
//! [`ffmpeg-next`](https://crates.io/crates/ffmpeg-next) crate.
//!
//! Frames are scored with a Laplacian-variance focus measure: blurred
//! frames have little second-derivative energy, sharp frames a lot. Each
//! half-open window `[i·interval, (i+1)·interval)` keeps only its
//! best-scoring frame, emitted lazily as the window closes, so memory stays
//! constant no matter how long the video is.
//!
//! ## Quick Start
//!
//! ### One video, lazily
//!
//! ```no_run
//! use stillpick::VideoSource;
//!
//! let mut source = VideoSource::open("input.mp4")?;
//! for selected in source.sharpest_frames(1.0)? {
//!     let selected = selected?;
//!     selected.image.save(format!("window_{:04}.jpg", selected.window_index))?;
//! }
//! # Ok::<(), stillpick::StillpickError>(())
//! ```
//!
//! ### A batch of videos, concurrently
//!
//! ```no_run
//! use stillpick::{SelectOptions, VideoJob, run_jobs};
//!
//! let jobs = vec![VideoJob::new("a.mp4"), VideoJob::new("b.mp4")];
//! let options = SelectOptions::new().with_interval(2.0).with_output_dir("stills");
//! for outcome in run_jobs(jobs, &options)? {
//!     match outcome.result {
//!         Ok(summary) => println!("{}: {} written", outcome.video.display(), summary.frames_written),
//!         Err(error) => eprintln!("{}: {error}", outcome.video.display()),
//!     }
//! }
//! # Ok::<(), stillpick::StillpickError>(())
//! ```
//!
//! ### Scoring frames yourself
//!
//! ```
//! use image::DynamicImage;
//! use stillpick::laplacian_variance;
//!
//! // A uniform frame carries no detail.
//! assert_eq!(laplacian_variance(&DynamicImage::new_rgb8(64, 64)), 0.0);
//! ```
//!
//! ## Guarantees
//!
//! - For every window containing at least one decodable frame, exactly one
//!   image is emitted, and it has the maximum focus score in that window
//!   (ties go to the earliest frame). Empty windows emit nothing.
//! - Within one video, windows are emitted in strictly increasing index
//!   order.
//! - Jobs in a batch are fully independent: one unopenable video never
//!   affects the others, and failures are aggregated, not fail-fast.
//! - A corrupt frame mid-stream is skipped (and counted on its window),
//!   never fatal; a file that cannot be opened at all is fatal for that
//!   job only.
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed on your system.

pub mod batch;
pub mod config;
mod conversion;
pub mod error;
pub mod ffmpeg;
pub mod output;
pub mod score;
pub mod selector;
pub mod source;

pub use batch::{JobOutcome, JobSummary, VideoJob, run_jobs, run_jobs_with};
pub use config::SelectOptions;
pub use error::StillpickError;
pub use ffmpeg::{FfmpegLogLevel, set_ffmpeg_log_level};
pub use output::{ImageFormat, OutputLayout};
pub use score::laplacian_variance;
pub use selector::{ScoredFrame, SelectedWindow, SharpestFrames, WindowAccumulator};
pub use source::{SourceInfo, VideoSource};
