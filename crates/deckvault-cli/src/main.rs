//! Deckvault CLI: operate on the configured asset store.
//!
//! Configuration comes from the environment (or `.env`): STORAGE_PROVIDER plus the
//! S3_* / AWS_* or LOCAL_STORAGE_* variables.

use anyhow::Context;
use clap::{Parser, Subcommand};
use deckvault_cli::{init_tracing, UploadFlags};
use deckvault_services::{AssetError, AssetStorage, StorageConfig};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "deckvault", about = "Deckvault asset storage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a file, optionally resizing/converting images
    Upload {
        /// Path to the file to upload
        file: PathBuf,
        /// Folder prefix for the generated key
        #[arg(long)]
        folder: Option<String>,
        /// Target width in pixels (never enlarges)
        #[arg(long)]
        width: Option<u32>,
        /// Target height in pixels (never enlarges)
        #[arg(long)]
        height: Option<u32>,
        /// Resize fit: cover, contain, fill, inside, outside
        #[arg(long)]
        fit: Option<String>,
        /// Output format: jpeg, png, webp
        #[arg(long)]
        format: Option<String>,
        /// Encoder quality (1-100)
        #[arg(long)]
        quality: Option<u8>,
        /// Also store a 300x300 JPEG thumbnail
        #[arg(long)]
        thumbnail: bool,
        /// Make the object publicly readable
        #[arg(long)]
        public: bool,
    },
    /// Print an access URL for a key
    Url {
        key: String,
        /// URL lifetime in seconds (defaults to STORAGE_SIGNED_URL_TTL_SECS)
        #[arg(long)]
        expires_in: Option<u64>,
    },
    /// Delete a key (no-op when absent)
    Delete { key: String },
    /// Check whether a key exists
    Exists { key: String },
    /// Print size, modification time and MIME type of a key
    Stat { key: String },
}

fn print_json(value: &impl serde::Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize response")?;
    println!("{}", out);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let config = StorageConfig::from_env().context("Failed to load storage configuration")?;
    let assets = AssetStorage::new(config)
        .await
        .context("Failed to initialize storage backend")?;

    match cli.command {
        Commands::Upload {
            file,
            folder,
            width,
            height,
            fit,
            format,
            quality,
            thumbnail,
            public,
        } => {
            let options = UploadFlags {
                folder,
                width,
                height,
                fit,
                format,
                quality,
                thumbnail,
                public,
            }
            .into_options()?;
            let filename = file
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string)
                .context("File path has no usable file name")?;

            match assets.upload(file, &filename, None, &options).await {
                Ok(result) => print_json(&result)?,
                Err(AssetError::PartialUpload { result, source }) => {
                    print_json(&json!({ "partial": true, "result": result, "error": source.to_string() }))?;
                    anyhow::bail!("Upload stored without thumbnail: {}", source);
                }
                Err(e) => return Err(e).context("Upload failed"),
            }
        }
        Commands::Url { key, expires_in } => {
            let url = assets
                .read_url(&key, expires_in.map(Duration::from_secs))
                .await?;
            print_json(&json!({ "key": key, "url": url }))?;
        }
        Commands::Delete { key } => {
            assets.delete(&key).await?;
            print_json(&json!({ "success": true, "key": key }))?;
        }
        Commands::Exists { key } => {
            let exists = assets.exists(&key).await?;
            print_json(&json!({ "key": key, "exists": exists }))?;
        }
        Commands::Stat { key } => match assets.stat(&key).await? {
            Some(meta) => print_json(&meta)?,
            None => print_json(&json!({ "key": key, "exists": false }))?,
        },
    }

    Ok(())
}
