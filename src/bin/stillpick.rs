use std::path::PathBuf;

use clap::{CommandFactory, Parser};
use clap_complete::Shell;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use stillpick::{FfmpegLogLevel, ImageFormat, SelectOptions, VideoJob, run_jobs_with};

const CLI_AFTER_HELP: &str = "Examples:\n  stillpick input.mp4\n  stillpick a.mp4 b.mp4 --interval 2.5 --output stills --format png\n  stillpick cam/*.mp4 --flat --jobs 4 --progress\n  stillpick input.mp4 --json --log-level quiet";

#[derive(Debug, Parser)]
#[command(
    name = "stillpick",
    version,
    about = "Extract the sharpest frame from each time interval of one or more videos",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    /// Path(s) to input video file(s).
    #[arg(required_unless_present = "completions")]
    videos: Vec<PathBuf>,

    /// Window length in seconds between selected frames.
    #[arg(long, default_value_t = 1.0)]
    interval: f64,

    /// Base output directory.
    #[arg(long, default_value = "sharpest_frames")]
    output: PathBuf,

    /// Output image format (jpg or png).
    #[arg(long, default_value = "jpg")]
    format: ImageFormat,

    /// Save all frames directly into the output directory instead of
    /// per-video subdirectories.
    #[arg(long)]
    flat: bool,

    /// Number of videos to process concurrently (default: all cores).
    #[arg(long)]
    jobs: Option<usize>,

    /// Show per-video detail on stderr.
    #[arg(long)]
    verbose: bool,

    /// Show a progress bar advancing as videos finish.
    #[arg(long)]
    progress: bool,

    /// Print a machine-readable per-video summary to stdout.
    #[arg(long)]
    json: bool,

    /// FFmpeg log level (quiet, fatal, error, warning, info, debug).
    #[arg(long)]
    log_level: Option<FfmpegLogLevel>,

    /// Generate a shell completion script and exit.
    #[arg(long, value_enum)]
    completions: Option<Shell>,
}

fn run() -> Result<bool, Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(shell) = cli.completions {
        let mut command = Cli::command();
        clap_complete::generate(shell, &mut command, "stillpick", &mut std::io::stdout());
        return Ok(true);
    }

    if let Some(level) = cli.log_level {
        stillpick::set_ffmpeg_log_level(level);
    }

    let options = SelectOptions::new()
        .with_interval(cli.interval)
        .with_format(cli.format)
        .with_output_dir(cli.output.clone())
        .with_flat(cli.flat)
        .with_concurrency(cli.jobs);

    // Configuration problems abort before any job starts.
    options.validate()?;

    let jobs: Vec<VideoJob> = cli.videos.iter().map(VideoJob::new).collect();

    let progress_bar = if cli.progress {
        let pb = ProgressBar::new(jobs.len() as u64);
        let style =
            ProgressStyle::with_template("{spinner:.green} {bar:40.cyan/blue} {pos}/{len} {msg}")?;
        pb.set_style(style.progress_chars("##-"));
        Some(pb)
    } else {
        None
    };

    let outcomes = run_jobs_with(jobs, &options, |outcome| {
        if let Some(pb) = &progress_bar {
            pb.inc(1);
            pb.set_message(
                outcome
                    .video
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
            );
        }
    })?;

    if let Some(pb) = progress_bar {
        pb.finish_with_message("done");
    }

    let mut any_failed = false;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(summary) => {
                if cli.verbose {
                    eprintln!(
                        "{} {}",
                        "success:".green().bold(),
                        format!(
                            "{}: {} frame(s) written to {}",
                            outcome.video.display(),
                            summary.frames_written,
                            cli.output.display()
                        )
                        .green()
                    );
                }
                if summary.dropped_frames > 0 {
                    eprintln!(
                        "{} {}",
                        "warning:".yellow().bold(),
                        format!(
                            "{}: {} frame(s) skipped due to decode errors",
                            outcome.video.display(),
                            summary.dropped_frames
                        )
                        .yellow()
                    );
                }
            }
            Err(error) => {
                any_failed = true;
                eprintln!(
                    "{} {}",
                    "error:".red().bold(),
                    format!("{}: {error}", outcome.video.display()).red()
                );
            }
        }
    }

    if cli.json {
        let payload: Vec<_> = outcomes
            .iter()
            .map(|outcome| match &outcome.result {
                Ok(summary) => json!({
                    "video": outcome.video,
                    "ok": true,
                    "frames_written": summary.frames_written,
                    "dropped_frames": summary.dropped_frames,
                }),
                Err(error) => json!({
                    "video": outcome.video,
                    "ok": false,
                    "error": error.to_string(),
                }),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&payload)?);
    } else {
        let succeeded = outcomes.iter().filter(|outcome| outcome.is_success()).count();
        let written: u64 = outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .map(|summary| summary.frames_written)
            .sum();
        println!(
            "{} {}",
            "done:".green().bold(),
            format!(
                "{succeeded}/{} video(s) processed, {written} frame(s) written to {}",
                outcomes.len(),
                cli.output.display()
            )
            .green()
        );
    }

    Ok(!any_failed)
}

fn main() {
    env_logger::init();

    match run() {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(error) => {
            eprintln!("error: {error}");
            std::process::exit(1);
        }
    }
}
