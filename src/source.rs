//! Opening video sources.
//!
//! [`VideoSource`] is the entry point for selection. It opens a video file,
//! locates the best video stream, and caches the stream properties the
//! selector needs ([`SourceInfo`]). A source that cannot be opened, has no
//! video stream, or reports no usable frame rate is rejected here, before
//! any decoding starts.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    time::Duration,
};

use ffmpeg_next::{codec::context::Context as CodecContext, format::context::Input, media::Type};

use crate::error::StillpickError;
use crate::selector::SharpestFrames;

/// Properties of an opened video stream, cached at open time.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Average frames per second. Always positive for an opened source.
    pub frames_per_second: f64,
    /// Estimated total frame count (duration × fps).
    pub frame_count: u64,
    /// Container-level duration.
    pub duration: Duration,
    /// Video codec name, e.g. `h264`.
    pub codec: String,
}

/// An opened video file, ready for sharpest-frame selection.
///
/// Created via [`VideoSource::open`]. Holds the demuxer context and cached
/// [`SourceInfo`]; obtain a lazy selector with
/// [`sharpest_frames`](VideoSource::sharpest_frames). The demuxer is closed
/// when the source is dropped, including when selection bails out partway
/// through.
///
/// # Example
///
/// ```no_run
/// use stillpick::VideoSource;
///
/// let mut source = VideoSource::open("input.mp4")?;
/// println!("{:.2} fps over {:?}", source.info().frames_per_second, source.info().duration);
/// for selected in source.sharpest_frames(1.0)? {
///     let selected = selected?;
///     selected.image.save(format!("window_{:04}.jpg", selected.window_index))?;
/// }
/// # Ok::<(), stillpick::StillpickError>(())
/// ```
pub struct VideoSource {
    /// The opened FFmpeg input (demuxer) context.
    pub(crate) input_context: Input,
    /// Index of the best video stream.
    pub(crate) video_stream_index: usize,
    /// Cached stream properties.
    pub(crate) info: SourceInfo,
    /// Path to the opened file, kept for error messages.
    pub(crate) file_path: PathBuf,
}

impl Debug for VideoSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("VideoSource")
            .field("file_path", &self.file_path)
            .field("video_stream_index", &self.video_stream_index)
            .field("info", &self.info)
            .finish_non_exhaustive()
    }
}

impl VideoSource {
    /// Open a video file for selection.
    ///
    /// Initialises FFmpeg (idempotent), opens the file, locates the best
    /// video stream, and caches its properties.
    ///
    /// # Errors
    ///
    /// - [`StillpickError::FileOpen`] if the path is missing, unreadable, or
    ///   not a recognisable container.
    /// - [`StillpickError::NoVideoStream`] if the file has no video stream.
    /// - [`StillpickError::MissingFrameRate`] if the stream reports a zero
    ///   frame rate; frame timestamps would be undefined, so this is fatal
    ///   rather than guessed around.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StillpickError> {
        let path = path.as_ref();
        let file_path = path.to_path_buf();

        log::debug!("Opening video source: {}", file_path.display());

        // Safe to call multiple times.
        ffmpeg_next::init().map_err(|error| StillpickError::FileOpen {
            path: file_path.clone(),
            reason: format!("FFmpeg initialisation failed: {error}"),
        })?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| StillpickError::FileOpen {
                path: file_path.clone(),
                reason: error.to_string(),
            })?;

        let video_stream_index = input_context
            .streams()
            .best(Type::Video)
            .map(|stream| stream.index())
            .ok_or_else(|| StillpickError::NoVideoStream {
                path: file_path.clone(),
            })?;

        let duration_microseconds = input_context.duration();
        let duration = if duration_microseconds > 0 {
            Duration::from_micros(duration_microseconds as u64)
        } else {
            Duration::ZERO
        };

        let stream = input_context
            .stream(video_stream_index)
            .ok_or_else(|| StillpickError::NoVideoStream {
                path: file_path.clone(),
            })?;

        // Average frame rate, with the raw rate field as a fallback.
        let frame_rate = stream.avg_frame_rate();
        let frames_per_second = if frame_rate.denominator() != 0 && frame_rate.numerator() != 0 {
            frame_rate.numerator() as f64 / frame_rate.denominator() as f64
        } else {
            let rate = stream.rate();
            if rate.denominator() != 0 {
                rate.numerator() as f64 / rate.denominator() as f64
            } else {
                0.0
            }
        };

        if !(frames_per_second > 0.0) || !frames_per_second.is_finite() {
            return Err(StillpickError::MissingFrameRate { path: file_path });
        }

        let codec_parameters = stream.parameters();
        let decoder_context =
            CodecContext::from_parameters(codec_parameters).map_err(|error| {
                StillpickError::FileOpen {
                    path: file_path.clone(),
                    reason: format!("Failed to read video codec parameters: {error}"),
                }
            })?;
        let video_decoder =
            decoder_context
                .decoder()
                .video()
                .map_err(|error| StillpickError::FileOpen {
                    path: file_path.clone(),
                    reason: format!("Failed to create video decoder: {error}"),
                })?;

        let codec = video_decoder
            .codec()
            .map(|codec| codec.name().to_string())
            .unwrap_or_else(|| "unknown".to_string());

        let info = SourceInfo {
            width: video_decoder.width(),
            height: video_decoder.height(),
            frames_per_second,
            frame_count: (duration.as_secs_f64() * frames_per_second) as u64,
            duration,
            codec,
        };

        log::info!(
            "Opened {}: {}x{} @ {:.2} fps, ~{} frames, {:.2}s [{}]",
            file_path.display(),
            info.width,
            info.height,
            info.frames_per_second,
            info.frame_count,
            info.duration.as_secs_f64(),
            info.codec,
        );

        Ok(Self {
            input_context,
            video_stream_index,
            info,
            file_path,
        })
    }

    /// Cached properties of the opened video stream.
    pub fn info(&self) -> &SourceInfo {
        &self.info
    }

    /// Path this source was opened from.
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Create a lazy iterator yielding the sharpest frame of each
    /// `interval_seconds`-long window, in increasing window order.
    ///
    /// The iterator borrows this source mutably and consumes the decode
    /// stream once; it is not restartable. See
    /// [`SharpestFrames`] for the selection semantics.
    ///
    /// # Errors
    ///
    /// Returns [`StillpickError::InvalidInterval`] if `interval_seconds` is
    /// not a positive finite number, or a decoder setup error.
    pub fn sharpest_frames(
        &mut self,
        interval_seconds: f64,
    ) -> Result<SharpestFrames<'_>, StillpickError> {
        SharpestFrames::new(self, interval_seconds)
    }
}
