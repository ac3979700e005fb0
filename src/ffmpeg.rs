//! FFmpeg log level configuration.
//!
//! FFmpeg has its own logging system, separate from the Rust
//! [`log`](https://crates.io/crates/log) crate, and prints warnings and
//! errors to stderr by default. During batch runs over many videos that
//! chatter drowns out per-job diagnostics, so this module exposes a thin
//! wrapper around FFmpeg's log-level API. The CLI's `--log-level` flag
//! parses straight into [`FfmpegLogLevel`] via its [`FromStr`] impl.
//!
//! This controls FFmpeg's own console output only. Rust-side diagnostics go
//! through the `log` facade and are configured separately (the binary uses
//! `env_logger`, so `RUST_LOG` applies).

use std::str::FromStr;

use ffmpeg_next::util::log::Level;

use crate::error::StillpickError;

/// FFmpeg internal log verbosity, most quiet to most verbose.
///
/// Maps directly onto FFmpeg's `AV_LOG_*` constants. Setting a level
/// suppresses all FFmpeg messages below that severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FfmpegLogLevel {
    /// Print nothing at all.
    Quiet,
    /// Unrecoverable errors only.
    Fatal,
    /// Recoverable errors.
    Error,
    /// Warnings (FFmpeg's default).
    Warning,
    /// Informational messages.
    Info,
    /// Debugging output.
    Debug,
}

impl FfmpegLogLevel {
    fn to_ffmpeg_level(self) -> Level {
        match self {
            FfmpegLogLevel::Quiet => Level::Quiet,
            FfmpegLogLevel::Fatal => Level::Fatal,
            FfmpegLogLevel::Error => Level::Error,
            FfmpegLogLevel::Warning => Level::Warning,
            FfmpegLogLevel::Info => Level::Info,
            FfmpegLogLevel::Debug => Level::Debug,
        }
    }
}

impl FromStr for FfmpegLogLevel {
    type Err = StillpickError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "quiet" | "silent" => Ok(FfmpegLogLevel::Quiet),
            "fatal" => Ok(FfmpegLogLevel::Fatal),
            "error" => Ok(FfmpegLogLevel::Error),
            "warning" | "warn" => Ok(FfmpegLogLevel::Warning),
            "info" => Ok(FfmpegLogLevel::Info),
            "debug" => Ok(FfmpegLogLevel::Debug),
            other => Err(StillpickError::Ffmpeg(format!(
                "unknown log level: {other}"
            ))),
        }
    }
}

/// Set the FFmpeg internal log verbosity level.
///
/// # Example
///
/// ```no_run
/// use stillpick::FfmpegLogLevel;
///
/// // Only show errors and above while decoding.
/// stillpick::set_ffmpeg_log_level(FfmpegLogLevel::Error);
/// ```
pub fn set_ffmpeg_log_level(level: FfmpegLogLevel) {
    ffmpeg_next::util::log::set_level(level.to_ffmpeg_level());
}

#[cfg(test)]
mod tests {
    use super::FfmpegLogLevel;

    #[test]
    fn parses_known_levels() {
        assert_eq!(
            "quiet".parse::<FfmpegLogLevel>().unwrap(),
            FfmpegLogLevel::Quiet
        );
        assert_eq!(
            "WARN".parse::<FfmpegLogLevel>().unwrap(),
            FfmpegLogLevel::Warning
        );
        assert_eq!(
            "debug".parse::<FfmpegLogLevel>().unwrap(),
            FfmpegLogLevel::Debug
        );
    }

    #[test]
    fn rejects_unknown_levels() {
        assert!("loud".parse::<FfmpegLogLevel>().is_err());
    }
}
