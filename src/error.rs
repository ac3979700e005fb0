//! Error types for the `stillpick` crate.
//!
//! This module defines [`StillpickError`], the unified error type returned by
//! all fallible operations in the crate. Variants carry the context needed to
//! diagnose a failure — file paths, underlying library messages — without
//! additional logging at the call site.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use image::ImageError;
use thiserror::Error;

/// The unified error type for all `stillpick` operations.
///
/// Every public method that can fail returns `Result<T, StillpickError>`.
/// Failures that abort a single video's job (open errors, output write
/// errors) never affect sibling jobs; see
/// [`run_jobs`](crate::batch::run_jobs).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StillpickError {
    /// The video file could not be opened or demuxed.
    #[error("Failed to open video file at {path}: {reason}")]
    FileOpen {
        /// Path that was passed to [`crate::VideoSource::open`].
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// The file was opened but contains no video stream.
    #[error("No video stream found in {path}")]
    NoVideoStream {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// The video stream reports no usable frame rate, so frame ordinals
    /// cannot be mapped to timestamps.
    #[error("Video stream in {path} reports a zero or missing frame rate")]
    MissingFrameRate {
        /// Path of the offending file.
        path: PathBuf,
    },

    /// A decoded frame could not be converted into an image.
    #[error("Failed to decode video frame: {0}")]
    FrameDecode(String),

    /// The selection interval is zero, negative, or not finite.
    #[error("Interval must be a positive number of seconds")]
    InvalidInterval,

    /// The requested output image format is not supported.
    #[error("Unsupported image format: {0} (expected jpg or png)")]
    UnsupportedImageFormat(String),

    /// The output directory could not be created or an image could not be
    /// written to it.
    #[error("Failed to write output at {path}: {reason}")]
    OutputWrite {
        /// The directory or file that could not be written.
        path: PathBuf,
        /// Underlying reason the write failed.
        reason: String,
    },

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    Ffmpeg(String),

    /// The worker pool for batch processing could not be constructed.
    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] IoError),

    /// An error from the `image` crate while encoding a frame.
    #[error("Image encoding error: {0}")]
    Image(#[from] ImageError),
}

impl From<FfmpegError> for StillpickError {
    fn from(error: FfmpegError) -> Self {
        StillpickError::Ffmpeg(error.to_string())
    }
}
