//! Sharpest-frame-per-window selection.
//!
//! Selection is a fold over the decode stream: frames are partitioned into
//! fixed-length, half-open time windows `[i·interval, (i+1)·interval)`, each
//! window keeps only its best-scoring frame, and a window's winner is
//! emitted the moment a frame lands in a later window. Two layers implement
//! this:
//!
//! - [`WindowAccumulator`] — the pure fold, usable on any ordered stream of
//!   scored frames.
//! - [`SharpestFrames`] — a lazy [`Iterator`] that drives FFmpeg decoding
//!   through the accumulator, created via
//!   [`VideoSource::sharpest_frames`](crate::VideoSource::sharpest_frames).
//!
//! Memory stays constant in video length: only the current window's best
//! frame and the frame under evaluation are alive at any time.

use ffmpeg_next::{
    Error as FfmpegError, Packet, Rational,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::conversion::{ordinal_to_seconds, pts_to_seconds, window_index};
use crate::error::StillpickError;
use crate::score::laplacian_variance;
use crate::source::VideoSource;

/// A decoded frame with its focus score, ready for window selection.
#[derive(Debug, Clone)]
pub struct ScoredFrame {
    /// Zero-based ordinal of the frame within its video.
    pub frame_number: u64,
    /// Presentation timestamp in seconds.
    pub timestamp: f64,
    /// Focus score; higher is sharper.
    pub score: f64,
    /// The decoded image.
    pub image: DynamicImage,
}

/// The winning frame of one finalized window.
#[derive(Debug, Clone)]
pub struct SelectedWindow {
    /// Zero-based index of the window on the video's timeline.
    pub window_index: u64,
    /// Ordinal of the winning frame.
    pub frame_number: u64,
    /// Presentation timestamp of the winning frame, in seconds.
    pub timestamp: f64,
    /// The winning frame's focus score.
    pub score: f64,
    /// The winning frame.
    pub image: DynamicImage,
    /// Frames lost to decode errors while this window was open. Non-zero
    /// means the window's winner was chosen from an incomplete candidate
    /// set.
    pub dropped_frames: u64,
}

/// State of the window currently accepting frames.
struct OpenWindow {
    index: u64,
    best: ScoredFrame,
    dropped: u64,
}

impl OpenWindow {
    /// Replace the held best only on a strictly greater score, so the
    /// earliest frame wins ties.
    fn offer(&mut self, frame: ScoredFrame) {
        if frame.score > self.best.score {
            self.best = frame;
        }
    }

    fn finalize(self) -> SelectedWindow {
        SelectedWindow {
            window_index: self.index,
            frame_number: self.best.frame_number,
            timestamp: self.best.timestamp,
            score: self.best.score,
            image: self.best.image,
            dropped_frames: self.dropped,
        }
    }
}

/// The pure per-window selection fold.
///
/// Push frames in timestamp order; each push returns the previous window's
/// winner when the incoming frame opens a later window, and [`finish`]
/// flushes the last one. Window indices that no frame ever lands in are
/// skipped over and emit nothing, so for every emitted window the winner is
/// the maximum-scoring frame among all frames whose timestamp fell inside
/// it.
///
/// # Example
///
/// ```
/// use image::DynamicImage;
/// use stillpick::{ScoredFrame, WindowAccumulator};
///
/// let mut windows = WindowAccumulator::new(1.0)?;
/// let frame = |n: u64, timestamp: f64, score: f64| ScoredFrame {
///     frame_number: n,
///     timestamp,
///     score,
///     image: DynamicImage::new_rgb8(2, 2),
/// };
///
/// assert!(windows.push(frame(0, 0.2, 1.0)).is_none());
/// assert!(windows.push(frame(1, 0.7, 5.0)).is_none());
/// let first = windows.push(frame(2, 1.1, 3.0)).expect("window 0 closed");
/// assert_eq!(first.window_index, 0);
/// assert_eq!(first.frame_number, 1);
/// let last = windows.finish().expect("window 1 flushed");
/// assert_eq!(last.window_index, 1);
/// # Ok::<(), stillpick::StillpickError>(())
/// ```
///
/// [`finish`]: WindowAccumulator::finish
pub struct WindowAccumulator {
    interval_seconds: f64,
    current: Option<OpenWindow>,
    /// Decode failures seen before any frame opened a window; folded into
    /// the next window that opens.
    orphan_dropped: u64,
}

impl WindowAccumulator {
    /// Create an accumulator over windows of `interval_seconds`.
    ///
    /// # Errors
    ///
    /// Returns [`StillpickError::InvalidInterval`] unless `interval_seconds`
    /// is a positive finite number.
    pub fn new(interval_seconds: f64) -> Result<Self, StillpickError> {
        if !(interval_seconds > 0.0) || !interval_seconds.is_finite() {
            return Err(StillpickError::InvalidInterval);
        }
        Ok(Self {
            interval_seconds,
            current: None,
            orphan_dropped: 0,
        })
    }

    /// Feed the next frame, in timestamp order.
    ///
    /// Returns the finalized previous window when `frame` falls into a
    /// different window, `None` otherwise.
    pub fn push(&mut self, frame: ScoredFrame) -> Option<SelectedWindow> {
        let index = window_index(frame.timestamp, self.interval_seconds);

        match self.current.take() {
            None => {
                self.current = Some(OpenWindow {
                    index,
                    best: frame,
                    dropped: std::mem::take(&mut self.orphan_dropped),
                });
                None
            }
            Some(mut open) if open.index == index => {
                open.offer(frame);
                self.current = Some(open);
                None
            }
            Some(open) => {
                self.current = Some(OpenWindow {
                    index,
                    best: frame,
                    dropped: 0,
                });
                Some(open.finalize())
            }
        }
    }

    /// Record a frame lost to a decode error against the open window.
    pub fn note_dropped(&mut self) {
        match &mut self.current {
            Some(open) => open.dropped += 1,
            None => self.orphan_dropped += 1,
        }
    }

    /// Finalize and return the still-open window, if any frame reached it.
    ///
    /// Call once after the last frame; pushing after `finish` starts a new
    /// window lineage.
    pub fn finish(&mut self) -> Option<SelectedWindow> {
        self.current.take().map(OpenWindow::finalize)
    }
}

/// A lazy iterator over each window's sharpest frame.
///
/// Yields `Result<SelectedWindow, StillpickError>` in strictly increasing
/// window-index order. Decoding happens on demand: each call to
/// [`next()`](Iterator::next) reads just enough packets to close the next
/// window. The iterator borrows the underlying [`VideoSource`] mutably and
/// consumes its decode stream once; it is not restartable.
///
/// A frame that fails to decode or convert mid-stream is skipped with a
/// `log::warn!` and counted in the enclosing window's
/// [`dropped_frames`](SelectedWindow::dropped_frames); it never aborts the
/// video.
pub struct SharpestFrames<'a> {
    source: &'a mut VideoSource,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    video_stream_index: usize,
    time_base: Rational,
    frames_per_second: f64,
    width: u32,
    height: u32,
    windows: WindowAccumulator,
    next_frame_number: u64,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    eof_sent: bool,
    done: bool,
}

impl<'a> SharpestFrames<'a> {
    pub(crate) fn new(
        source: &'a mut VideoSource,
        interval_seconds: f64,
    ) -> Result<Self, StillpickError> {
        let windows = WindowAccumulator::new(interval_seconds)?;

        let video_stream_index = source.video_stream_index;
        let stream = source
            .input_context
            .stream(video_stream_index)
            .ok_or_else(|| StillpickError::NoVideoStream {
                path: source.file_path.clone(),
            })?;
        let time_base = stream.time_base();
        let codec_parameters = stream.parameters();
        let decoder_context = CodecContext::from_parameters(codec_parameters)?;
        let decoder = decoder_context.decoder().video()?;

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )?;

        let frames_per_second = source.info.frames_per_second;

        Ok(Self {
            source,
            decoder,
            scaler,
            video_stream_index,
            time_base,
            frames_per_second,
            width,
            height,
            windows,
            next_frame_number: 0,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            eof_sent: false,
            done: false,
        })
    }

    /// Scale and convert the current `decoded_frame` to a `DynamicImage`.
    fn convert_current_frame(&mut self) -> Result<DynamicImage, StillpickError> {
        self.scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;
        let buffer = frame_to_rgb_buffer(&self.rgb_frame, self.width, self.height);
        let rgb_image = RgbImage::from_raw(self.width, self.height, buffer).ok_or_else(|| {
            StillpickError::FrameDecode(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })?;
        Ok(DynamicImage::ImageRgb8(rgb_image))
    }

    /// Decode, score, and fold one frame; returns a window if one closed.
    fn consume_decoded_frame(&mut self) -> Option<SelectedWindow> {
        let frame_number = self.next_frame_number;
        self.next_frame_number += 1;

        let timestamp = match self.decoded_frame.pts() {
            Some(pts) => pts_to_seconds(pts, self.time_base),
            None => ordinal_to_seconds(frame_number, self.frames_per_second),
        };

        match self.convert_current_frame() {
            Ok(image) => {
                let score = laplacian_variance(&image);
                self.windows.push(ScoredFrame {
                    frame_number,
                    timestamp,
                    score,
                    image,
                })
            }
            Err(error) => {
                log::warn!("Skipping undecodable frame {frame_number} at {timestamp:.3}s: {error}");
                self.windows.note_dropped();
                None
            }
        }
    }
}

impl Iterator for SharpestFrames<'_> {
    type Item = Result<SelectedWindow, StillpickError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            // Drain frames the decoder has already produced.
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                if let Some(window) = self.consume_decoded_frame() {
                    return Some(Ok(window));
                }
                continue;
            }

            // Decoder is drained after EOF: flush the final window.
            if self.eof_sent {
                self.done = true;
                return self.windows.finish().map(Ok);
            }

            // Feed the decoder more packets.
            let mut packet = Packet::empty();
            match packet.read(&mut self.source.input_context) {
                Ok(()) => {
                    if packet.stream() == self.video_stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            // Corrupt packet mid-stream: the video stays usable.
                            log::warn!(
                                "Dropping corrupt packet in {}: {error}",
                                self.source.file_path.display()
                            );
                            self.windows.note_dropped();
                        }
                    }
                }
                Err(FfmpegError::Eof) => {
                    if let Err(error) = self.decoder.send_eof() {
                        self.done = true;
                        return Some(Err(StillpickError::from(error)));
                    }
                    self.eof_sent = true;
                }
                Err(error) => {
                    log::warn!(
                        "Recoverable read error in {}: {error}",
                        self.source.file_path.display()
                    );
                }
            }
        }
    }
}

/// Copy pixel data from a scaled RGB24 frame into a tightly-packed buffer,
/// collapsing any row padding FFmpeg added for alignment.
fn frame_to_rgb_buffer(rgb_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let stride = rgb_frame.stride(0);
    let row_bytes = (width as usize) * 3;
    let data = rgb_frame.data(0);

    if stride == row_bytes {
        data[..row_bytes * (height as usize)].to_vec()
    } else {
        let mut buffer = Vec::with_capacity(row_bytes * (height as usize));
        for row in 0..(height as usize) {
            let row_start = row * stride;
            buffer.extend_from_slice(&data[row_start..row_start + row_bytes]);
        }
        buffer
    }
}
