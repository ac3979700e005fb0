//! Run configuration.
//!
//! [`SelectOptions`] is a builder carrying everything a batch run needs:
//! window length, output location and format, layout mode, and worker
//! count. [`validate`](SelectOptions::validate) is called before any job
//! starts, so configuration mistakes fail the whole run up front rather
//! than per video.

use std::path::PathBuf;

use crate::error::StillpickError;
use crate::output::{ImageFormat, OutputLayout};

/// Options for a sharpest-frame selection run.
///
/// Defaults match the CLI: 1-second windows, JPEG output under
/// `sharpest_frames/`, per-video subdirectories, worker count picked from
/// available parallelism.
///
/// # Example
///
/// ```
/// use stillpick::{ImageFormat, SelectOptions};
///
/// let options = SelectOptions::new()
///     .with_interval(2.5)
///     .with_format(ImageFormat::Png)
///     .with_output_dir("stills")
///     .with_flat(true);
/// options.validate()?;
/// # Ok::<(), stillpick::StillpickError>(())
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct SelectOptions {
    /// Window length in seconds. Must be positive and finite.
    pub interval: f64,
    /// Image encoding for written frames.
    pub format: ImageFormat,
    /// Base output directory.
    pub output_dir: PathBuf,
    /// When `true`, all videos share `output_dir` with stem-prefixed names.
    pub flat: bool,
    /// Worker pool size. `None` uses available hardware parallelism.
    pub concurrency: Option<usize>,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectOptions {
    /// Create options with the default settings.
    pub fn new() -> Self {
        Self {
            interval: 1.0,
            format: ImageFormat::Jpg,
            output_dir: PathBuf::from("sharpest_frames"),
            flat: false,
            concurrency: None,
        }
    }

    /// Set the window length in seconds.
    pub fn with_interval(mut self, seconds: f64) -> Self {
        self.interval = seconds;
        self
    }

    /// Set the output image format.
    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the base output directory.
    pub fn with_output_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Write every video's frames into the base directory directly,
    /// without per-video subdirectories.
    pub fn with_flat(mut self, flat: bool) -> Self {
        self.flat = flat;
        self
    }

    /// Cap the number of videos processed concurrently.
    ///
    /// `None` (the default) sizes the pool from available parallelism.
    pub fn with_concurrency(mut self, limit: Option<usize>) -> Self {
        self.concurrency = limit;
        self
    }

    /// Check the configuration before running any job.
    ///
    /// # Errors
    ///
    /// Returns [`StillpickError::InvalidInterval`] when the interval is
    /// zero, negative, or not finite.
    pub fn validate(&self) -> Result<(), StillpickError> {
        if !(self.interval > 0.0) || !self.interval.is_finite() {
            return Err(StillpickError::InvalidInterval);
        }
        Ok(())
    }

    /// The on-disk layout these options describe.
    pub(crate) fn layout(&self) -> OutputLayout {
        OutputLayout::new(self.output_dir.clone(), self.flat, self.format)
    }
}
