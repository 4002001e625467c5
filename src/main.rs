use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use tempo_io::{KeypointReader, ReportWriter, SeriesReader, SessionName};
use tempo_motion::{Grade, RegistrationConfig, SpeedConfig, align_shape, extract_series};

#[derive(Parser)]
#[command(name = "tempo")]
#[command(about = "Timing-tolerant motion sequence scoring with Dynamic Time Warping")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Input series and output location shared by the comparison commands.
#[derive(Args, Debug, Clone)]
struct CompareArgs {
    /// Path to the recorded series (.json or .csv)
    #[arg(long)]
    recorded: PathBuf,

    /// Path to the reference series (.json or .csv)
    #[arg(long)]
    reference: PathBuf,

    /// Session name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long)]
    session: String,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Score how closely the shape of a recording follows a reference
    Shape {
        #[command(flatten)]
        io: CompareArgs,

        /// Include the distance and cost matrices in the report
        #[arg(long, default_value_t = false)]
        include_matrices: bool,
    },

    /// Compare the speed profile of a recording against a reference and a faster reference
    Speed {
        #[command(flatten)]
        io: CompareArgs,

        /// Multiplier applied to reference speeds for the fast score
        #[arg(long, default_value_t = SpeedConfig::DEFAULT_FAST_FACTOR)]
        fast_factor: f64,
    },

    /// Extract upper-body feature vectors from pose keypoint frames
    Extract {
        /// Path to the keypoint frames JSON file
        #[arg(long)]
        keypoints: PathBuf,

        /// Session name; when set, writes {session}_features.json instead of printing
        #[arg(long)]
        session: Option<String>,

        /// Output directory for the features file
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Minimum keypoint confidence for the registration check
        #[arg(long, default_value_t = 0.1)]
        confidence_threshold: f64,

        /// Maximum arm slope for the registration check
        #[arg(long, default_value_t = 0.5)]
        angle_threshold: f64,
    },
}

// --- JSON stdout output structs ---

#[derive(Serialize)]
struct ShapeOutput {
    session: String,
    recorded_len: usize,
    reference_len: usize,
    score: f64,
    score_display: String,
    grade: Grade,
    path_len: usize,
    report: PathBuf,
}

#[derive(Serialize)]
struct SpeedOutput {
    session: String,
    recorded_len: usize,
    reference_len: usize,
    normal_score: f64,
    normal_grade: Grade,
    fast_score: f64,
    fast_grade: Grade,
    report: PathBuf,
}

#[derive(Serialize)]
struct ExtractOutput {
    n_frames: usize,
    n_registered: usize,
    dim: usize,
    features: Vec<Vec<f64>>,
}

#[derive(Serialize)]
struct ExtractFileOutput {
    session: String,
    n_frames: usize,
    n_registered: usize,
    dim: usize,
    report: PathBuf,
}

fn read_pair(io: &CompareArgs) -> Result<(tempo_dtw::TimeSeries, tempo_dtw::TimeSeries)> {
    let recorded = SeriesReader::new(&io.recorded)
        .read()
        .context("failed to read recorded series")?;
    let reference = SeriesReader::new(&io.reference)
        .read()
        .context("failed to read reference series")?;
    info!(
        recorded_len = recorded.len(),
        reference_len = reference.len(),
        dim = recorded.dim(),
        "series loaded"
    );
    Ok((recorded, reference))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Configure Rayon thread pool
    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Shape {
            io,
            include_matrices,
        } => {
            let session = SessionName::new(io.session.clone())?;
            let (recorded, reference) = read_pair(&io)?;

            let comparison =
                align_shape(&recorded, &reference).context("shape comparison failed")?;
            info!(score = %comparison.score, "shape comparison complete");

            let writer = ReportWriter::new(&io.output_dir, session)?;
            let report = writer.write_shape(&comparison, include_matrices)?;

            let output = ShapeOutput {
                session: io.session,
                recorded_len: recorded.len(),
                reference_len: reference.len(),
                score: comparison.score.value(),
                score_display: comparison.score.to_string(),
                grade: Grade::from_score(comparison.score),
                path_len: comparison.alignment.path.len(),
                report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Speed { io, fast_factor } => {
            let session = SessionName::new(io.session.clone())?;
            let config = SpeedConfig::new().with_fast_factor(fast_factor)?;
            let (recorded, reference) = read_pair(&io)?;

            let scores = config
                .compare(&recorded, &reference)
                .context("speed comparison failed")?;
            info!(
                normal = %scores.normal,
                fast = %scores.fast,
                "speed comparison complete"
            );

            let writer = ReportWriter::new(&io.output_dir, session)?;
            let report =
                writer.write_speed(&scores, config.fast_factor(), recorded.len(), reference.len())?;

            let output = SpeedOutput {
                session: io.session,
                recorded_len: recorded.len(),
                reference_len: reference.len(),
                normal_score: scores.normal.value(),
                normal_grade: scores.normal_grade(),
                fast_score: scores.fast.value(),
                fast_grade: scores.fast_grade(),
                report,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }

        Command::Extract {
            keypoints,
            session,
            output_dir,
            confidence_threshold,
            angle_threshold,
        } => {
            let registration = RegistrationConfig::new()
                .with_confidence_threshold(confidence_threshold)?
                .with_angle_threshold(angle_threshold)?;

            let frames = KeypointReader::new(&keypoints)
                .read()
                .context("failed to read keypoint frames")?;

            let mut n_registered = 0;
            for (frame, points) in frames.iter().enumerate() {
                let check = registration
                    .check(points)
                    .with_context(|| format!("registration check failed on frame {frame}"))?;
                if check.is_registered() {
                    n_registered += 1;
                }
            }
            if n_registered == 0 {
                warn!(n_frames = frames.len(), "no frame passed the registration check");
            } else {
                info!(n_registered, n_frames = frames.len(), "registration checked");
            }

            let features = extract_series(&frames).context("feature extraction failed")?;

            match session {
                Some(name) => {
                    let writer = ReportWriter::new(&output_dir, SessionName::new(name.clone())?)?;
                    let report = writer.write_features(&features)?;
                    let output = ExtractFileOutput {
                        session: name,
                        n_frames: frames.len(),
                        n_registered,
                        dim: features.dim(),
                        report,
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
                None => {
                    let output = ExtractOutput {
                        n_frames: frames.len(),
                        n_registered,
                        dim: features.dim(),
                        features: features.into_frames(),
                    };
                    println!("{}", serde_json::to_string_pretty(&output)?);
                }
            }
        }
    }

    Ok(())
}
