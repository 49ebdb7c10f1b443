//! reelgen - video generation client
//!
//! CLI binary for submitting video generation jobs and waiting for results.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use reelgen::config::{Config, ConfigOverrides};
use reelgen::types::{AspectRatio, DurationSeconds, Resolution};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;

#[derive(Parser)]
#[command(name = "reelgen")]
#[command(about = "Generate videos from text prompts, images and clips")]
#[command(version)]
struct Cli {
    /// Base URL of the generation service
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Milliseconds between status checks
    #[arg(long, global = true)]
    poll_interval_ms: Option<u64>,

    /// Show each phase and status check
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a video and wait for it
    Generate(GenerateArgs),

    /// Check a submitted operation once
    Status {
        /// Operation name returned at submission
        operation: String,
    },

    /// Wait for a submitted operation to finish
    Wait {
        /// Operation name returned at submission
        operation: String,

        /// Save the finished video to this file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the most recent video the service can extend
    LastVideo,

    /// Download a generated video
    Download {
        /// Video URL or service path (e.g. /videos/abc.mp4)
        video: String,

        /// Destination file or directory
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Default)]
struct GenerateArgs {
    /// Text prompt (asked interactively when omitted)
    prompt: Option<String>,

    /// What the video should avoid
    #[arg(short, long)]
    negative_prompt: Option<String>,

    /// Aspect ratio: 16:9 or 9:16
    #[arg(short, long)]
    aspect_ratio: Option<AspectRatio>,

    /// Resolution: 720p or 1080p
    #[arg(short, long)]
    resolution: Option<Resolution>,

    /// Duration in seconds: 4, 6 or 8
    #[arg(short, long)]
    duration: Option<DurationSeconds>,

    /// Initial image to animate
    #[arg(long, value_name = "PATH")]
    image: Option<PathBuf>,

    /// Reference image for style or subject (up to 3)
    #[arg(long = "reference", value_name = "PATH")]
    references: Vec<PathBuf>,

    /// Video to extend
    #[arg(long, value_name = "PATH")]
    video: Option<PathBuf>,

    /// Final frame to interpolate towards
    #[arg(long, value_name = "PATH")]
    last_frame: Option<PathBuf>,

    /// Extend the last video the service generated
    #[arg(long, conflicts_with = "video")]
    extend_last: bool,

    /// Model override
    #[arg(long)]
    model: Option<String>,

    /// Fill in every field interactively
    #[arg(short, long)]
    interactive: bool,

    /// Dry run - show the request without sending it
    #[arg(long)]
    dry_run: bool,

    /// Return after submission instead of waiting
    #[arg(long, conflicts_with = "output")]
    no_wait: bool,

    /// Save the finished video to this file or directory
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl GenerateArgs {
    fn into_parts(self, verbose: bool) -> (cli::FormInput, cli::GenerateOptions) {
        let input = cli::FormInput {
            prompt: self.prompt,
            negative_prompt: self.negative_prompt,
            aspect_ratio: self.aspect_ratio,
            resolution: self.resolution,
            duration: self.duration,
            image: self.image,
            references: self.references,
            video: self.video,
            last_frame: self.last_frame,
            extend_last: self.extend_last,
            model: self.model,
        };
        let options = cli::GenerateOptions {
            interactive: self.interactive,
            dry_run: self.dry_run,
            no_wait: self.no_wait,
            output: self.output,
            verbose,
        };
        (input, options)
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "reelgen=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = Config::load(&ConfigOverrides {
        api_url: cli.api_url,
        poll_interval_ms: cli.poll_interval_ms,
        ..ConfigOverrides::default()
    })?;

    match cli.command {
        None => {
            // Default: interactive form
            let (input, options) = GenerateArgs::default().into_parts(cli.verbose);
            cli::run_generate(&config, &input, &options).await?;
        }
        Some(Commands::Generate(args)) => {
            let (input, options) = args.into_parts(cli.verbose);
            cli::run_generate(&config, &input, &options).await?;
        }
        Some(Commands::Status { operation }) => {
            cli::run_status(&config, &operation).await?;
        }
        Some(Commands::Wait { operation, output }) => {
            cli::run_wait(&config, &operation, output.as_deref(), cli.verbose).await?;
        }
        Some(Commands::LastVideo) => {
            cli::run_last_video(&config).await?;
        }
        Some(Commands::Download { video, output }) => {
            cli::run_download(&config, &video, output.as_deref()).await?;
        }
    }

    Ok(())
}
