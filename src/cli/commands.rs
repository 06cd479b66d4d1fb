//! Subcommand execution
//!
//! Every command resolves to a JSON value printed on stdout; logs go to stderr.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

use serde_json::{Value, json};
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::api::{CatalystClient, CatalystClientGeneric, EmbedOptions, UploadRequest};
use crate::config::{ConfigLoader, EmbedKind};
use crate::error::format_error;
use crate::transport::Transport;
use crate::types::{VideoDetails, VideoUpdate};

/// Arguments shared by every invocation
#[derive(Debug)]
pub struct RunArgs {
    pub config: Option<PathBuf>,
    pub verbose: bool,
    pub command: Command,
}

/// What to do
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Ping,
    Info {
        video_id: String,
    },
    /// Prints `videos` keyed by the id each response carries, and `missing`
    /// for requested ids with no match. `"762"` and `"0762"` count as the same id.
    Status {
        video_ids: Vec<String>,
    },
    Categories,
    CategoryVideos {
        category_id: String,
    },
    VideoCategories {
        video_id: String,
    },
    Assign {
        video_id: String,
        category_id: String,
    },
    Unassign {
        video_id: String,
        category_id: String,
    },
    Update {
        video_id: String,
        update: VideoUpdate,
    },
    Delete {
        video_id: String,
    },
    Upload {
        request: UploadRequest,
    },
    Embed {
        video_id: String,
        kind: Option<EmbedKind>,
        width: Option<u32>,
        height: Option<f64>,
    },
}

/// Initialize the tracing subscriber on stderr
///
/// `RUST_LOG` wins over the configured level. Fails when a global subscriber
/// is already installed.
pub fn init_logging(verbose: bool, level: &str) -> Result<(), TryInitError> {
    let default_level = if verbose { "debug" } else { level };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_level.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
}

/// Requested ids with no fetched video, comparing numeric ids by value
fn missing_ids<'a>(requested: &'a [String], fetched: &HashMap<String, VideoDetails>) -> Vec<&'a str> {
    let fetched_numbers: HashSet<u64> = fetched
        .keys()
        .filter_map(|key| key.trim().parse().ok())
        .collect();

    requested
        .iter()
        .map(|id| id.as_str())
        .filter(|id| {
            if fetched.contains_key(*id) {
                return false;
            }
            match id.trim().parse::<u64>() {
                Ok(number) => !fetched_numbers.contains(&number),
                Err(_) => true,
            }
        })
        .collect()
}

/// Load configuration, run one command and print its result
pub async fn run(args: RunArgs) -> anyhow::Result<()> {
    let settings = ConfigLoader::new()
        .load_discovered(args.config.as_deref())
        .map_err(|e| anyhow::anyhow!(format_error(&e)))?;

    if let Err(e) = init_logging(
        args.verbose || settings.logging.verbose,
        &settings.logging.level,
    ) {
        debug!("Keeping the installed tracing subscriber: {}", e);
    }
    debug!("Running {:?}", args.command);

    let client = CatalystClient::new(settings).map_err(|e| anyhow::anyhow!(format_error(&e)))?;
    let output = execute(&client, args.command)
        .await
        .map_err(|e| anyhow::anyhow!(format_error(&e)))?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

/// Run a command against a client
pub async fn execute<T>(client: &CatalystClientGeneric<T>, command: Command) -> crate::Result<Value>
where
    T: Transport + ?Sized + 'static,
{
    let output = match command {
        Command::Ping => {
            client.test_connection().await?;
            info!("Connected to {}", client.settings().api.url);
            json!({ "status": "ok", "api_url": client.settings().api.url })
        }
        Command::Info { video_id } => serde_json::to_value(client.get_info(&video_id).await?)?,
        Command::Status { video_ids } => {
            let videos = client.get_info_multi(&video_ids).await?;
            let missing = missing_ids(&video_ids, &videos);
            let videos: BTreeMap<_, _> = videos.into_iter().collect();
            json!({ "videos": videos, "missing": missing })
        }
        Command::Categories => serde_json::to_value(client.get_categories().await?)?,
        Command::CategoryVideos { category_id } => {
            serde_json::to_value(client.get_category_videos(&category_id).await?)?
        }
        Command::VideoCategories { video_id } => {
            serde_json::to_value(client.get_categories_by_video_id(&video_id).await?)?
        }
        Command::Assign {
            video_id,
            category_id,
        } => {
            client.set_category(&video_id, &category_id).await?;
            json!({ "status": "success", "video_id": video_id, "category_id": category_id })
        }
        Command::Unassign {
            video_id,
            category_id,
        } => {
            client.unset_category(&video_id, &category_id).await?;
            json!({ "status": "success", "video_id": video_id, "category_id": category_id })
        }
        Command::Update { video_id, update } => {
            client.update_info(&video_id, &update).await?;
            json!({ "status": "success", "video_id": video_id })
        }
        Command::Delete { video_id } => {
            client.delete_video(&video_id).await?;
            json!({ "status": "success", "video_id": video_id })
        }
        Command::Upload { request } => serde_json::to_value(client.upload(&request).await?)?,
        Command::Embed {
            video_id,
            kind,
            width,
            height,
        } => {
            let mut options = EmbedOptions::from(&client.settings().embed);
            if let Some(kind) = kind {
                options.kind = kind;
            }
            if let Some(width) = width {
                options.width = width;
            }
            if let Some(height) = height {
                options.height = height;
            }
            let markup = client.embed(&video_id, Some(options)).await?;
            json!({ "video_id": video_id, "markup": markup })
        }
    };

    Ok(output)
}
