//! Command-line client for the Core Catalyst video API
//!
//! # Usage
//!
//! ```bash
//! catalyst ping
//! catalyst info 762
//! catalyst status 762 763 764
//! catalyst upload lecture.mp4 --title "Lecture 1"
//! catalyst --config ./catalyst.toml embed 762 --kind mobile
//! ```

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use core_catalyst::api::UploadRequest;
use core_catalyst::cli::{Command, RunArgs, run};
use core_catalyst::config::EmbedKind;
use core_catalyst::types::{Toggle, VideoUpdate};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "catalyst")]
struct Cli {
    /// Configuration file path
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the API is reachable with the configured credentials
    Ping,

    /// Show one video
    Info { video_id: String },

    /// Show several videos, fetched concurrently
    Status {
        #[arg(required = true, allow_hyphen_values = true)]
        video_ids: Vec<String>,
    },

    /// List all categories
    Categories,

    /// List the videos of a category
    CategoryVideos { category_id: String },

    /// List the categories of a video
    VideoCategories { video_id: String },

    /// Add a video to a category
    Assign {
        video_id: String,
        category_id: String,
    },

    /// Remove a video from a category
    Unassign {
        video_id: String,
        category_id: String,
    },

    /// Change a video's metadata
    Update {
        video_id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long, value_enum)]
        published: Option<Toggle>,

        #[arg(long, value_enum)]
        download: Option<Toggle>,

        #[arg(long, value_enum)]
        embed: Option<Toggle>,
    },

    /// Delete a video
    Delete { video_id: String },

    /// Upload a video file
    Upload {
        file: PathBuf,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,
    },

    /// Print embed markup for a video
    Embed {
        video_id: String,

        #[arg(long, value_enum)]
        kind: Option<EmbedKind>,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<f64>,
    },
}

impl From<Commands> for Command {
    fn from(command: Commands) -> Self {
        match command {
            Commands::Ping => Command::Ping,
            Commands::Info { video_id } => Command::Info { video_id },
            Commands::Status { video_ids } => Command::Status { video_ids },
            Commands::Categories => Command::Categories,
            Commands::CategoryVideos { category_id } => Command::CategoryVideos { category_id },
            Commands::VideoCategories { video_id } => Command::VideoCategories { video_id },
            Commands::Assign {
                video_id,
                category_id,
            } => Command::Assign {
                video_id,
                category_id,
            },
            Commands::Unassign {
                video_id,
                category_id,
            } => Command::Unassign {
                video_id,
                category_id,
            },
            Commands::Update {
                video_id,
                title,
                description,
                published,
                download,
                embed,
            } => Command::Update {
                video_id,
                update: VideoUpdate {
                    title,
                    description,
                    published,
                    embed,
                    download,
                },
            },
            Commands::Delete { video_id } => Command::Delete { video_id },
            Commands::Upload {
                file,
                title,
                description,
            } => Command::Upload {
                request: UploadRequest {
                    file,
                    title,
                    description,
                },
            },
            Commands::Embed {
                video_id,
                kind,
                width,
                height,
            } => Command::Embed {
                video_id,
                kind,
                width,
                height,
            },
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let args = RunArgs {
        config: cli.config,
        verbose: cli.verbose,
        command: cli.command.into(),
    };

    if let Err(e) = run(args).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}
