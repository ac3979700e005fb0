//! Output image format and on-disk layout.
//!
//! Selected frames are written as
//! `<output>/<stem>/<stem>_<window:04>.<ext>` by default, or
//! `<output>/<stem>_<window:04>.<ext>` in flat mode where every video
//! shares one directory and the stem prefix keeps filenames from
//! colliding.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::error::StillpickError;

/// Supported output image encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    /// JPEG encoding. This is the default.
    #[default]
    Jpg,
    /// PNG encoding.
    Png,
}

impl ImageFormat {
    /// File extension used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            ImageFormat::Jpg => "jpg",
            ImageFormat::Png => "png",
        }
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = StillpickError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Ok(ImageFormat::Jpg),
            "png" => Ok(ImageFormat::Png),
            other => Err(StillpickError::UnsupportedImageFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

/// Where and how a job's selected frames land on disk.
///
/// Directory creation is idempotent, so concurrent jobs may prepare sibling
/// (or, in flat mode, identical) directories without racing.
#[derive(Debug, Clone)]
pub struct OutputLayout {
    /// Base output directory shared by all jobs.
    pub base_dir: PathBuf,
    /// When `true`, skip per-video subdirectories.
    pub flat: bool,
    /// Image encoding for written frames.
    pub format: ImageFormat,
}

impl OutputLayout {
    /// Create a layout rooted at `base_dir`.
    pub fn new<P: Into<PathBuf>>(base_dir: P, flat: bool, format: ImageFormat) -> Self {
        Self {
            base_dir: base_dir.into(),
            flat,
            format,
        }
    }

    /// The directory a given video's frames are written to.
    pub fn video_dir(&self, video_stem: &str) -> PathBuf {
        if self.flat {
            self.base_dir.clone()
        } else {
            self.base_dir.join(video_stem)
        }
    }

    /// Create the directory for a video's frames, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`StillpickError::OutputWrite`] when the directory cannot be
    /// created.
    pub fn prepare_video_dir(&self, video_stem: &str) -> Result<PathBuf, StillpickError> {
        let dir = self.video_dir(video_stem);
        fs::create_dir_all(&dir).map_err(|error| StillpickError::OutputWrite {
            path: dir.clone(),
            reason: error.to_string(),
        })?;
        Ok(dir)
    }

    /// Full path for one selected frame.
    ///
    /// Window indices are zero-padded to four digits and the field widens
    /// on its own past 9999.
    pub fn frame_path(&self, video_stem: &str, window_index: u64) -> PathBuf {
        self.video_dir(video_stem).join(format!(
            "{video_stem}_{window_index:04}.{}",
            self.format.extension()
        ))
    }
}

/// File stem of a video path, used to name its output.
///
/// Falls back to the whole file name, then to `"video"` for pathological
/// paths like `..`.
pub(crate) fn video_stem(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{ImageFormat, OutputLayout, video_stem};

    #[test]
    fn format_parsing_and_aliases() {
        assert_eq!("jpg".parse::<ImageFormat>().unwrap(), ImageFormat::Jpg);
        assert_eq!("JPEG".parse::<ImageFormat>().unwrap(), ImageFormat::Jpg);
        assert_eq!(".png".parse::<ImageFormat>().unwrap(), ImageFormat::Png);
        assert!("webp".parse::<ImageFormat>().is_err());
    }

    #[test]
    fn per_video_layout_nests_by_stem() {
        let layout = OutputLayout::new("out", false, ImageFormat::Jpg);
        assert_eq!(
            layout.frame_path("clip", 3),
            Path::new("out/clip/clip_0003.jpg")
        );
    }

    #[test]
    fn flat_layout_keeps_stem_prefix() {
        let layout = OutputLayout::new("out", true, ImageFormat::Png);
        assert_eq!(layout.frame_path("clip", 0), Path::new("out/clip_0000.png"));
    }

    #[test]
    fn index_field_widens_past_9999() {
        let layout = OutputLayout::new("out", true, ImageFormat::Jpg);
        assert_eq!(
            layout.frame_path("clip", 12_345),
            Path::new("out/clip_12345.jpg")
        );
    }

    #[test]
    fn stems_for_odd_paths() {
        assert_eq!(video_stem(Path::new("/data/a.mp4")), "a");
        assert_eq!(video_stem(Path::new("noext")), "noext");
        assert_eq!(video_stem(Path::new("archive.tar.mp4")), "archive.tar");
    }
}
