//! Rate Uploader CLI - push CD rate rows into the rates collection
//!
//! ```bash
//! rate-uploader upload rates.csv --ids "A1,B2"     # Map and replace collection content
//! rate-uploader upload rates.csv --ids A1 --dry-run
//! rate-uploader preview rates.csv --ids "A1,B2"    # Print the payload only
//! rate-uploader parse rates.csv                    # Inspect the normalized dataset
//! rate-uploader serve                              # Start HTTP server (port 3000)
//! ```
//!
//! The credential is read from `CIO_API_KEY` (a `.env` file is honored).

use clap::{Parser, Subcommand};
use rate_uploader::{
    parse_csv_file, prepare, upload_file, CollectionClient, CollectionConfig, UploadOutcome,
};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "rate-uploader")]
#[command(about = "Upload CD/savings rates to a content collection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map the selected rows and replace the collection content
    Upload {
        /// Rates CSV file
        input: PathBuf,

        /// Comma-separated object_id values
        #[arg(short, long)]
        ids: String,

        /// Collection to write (default: CIO_COLLECTION_ID or 5)
        #[arg(long)]
        collection_id: Option<u64>,

        /// API base URL (default: CIO_API_URL or the public API)
        #[arg(long)]
        api_url: Option<String>,

        /// Map only, do not send
        #[arg(long)]
        dry_run: bool,

        /// Also write the payload to a file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the payload that would be uploaded
    Preview {
        /// Rates CSV file
        input: PathBuf,

        /// Comma-separated object_id values
        #[arg(short, long)]
        ids: String,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load a CSV file and print the normalized dataset
    Parse {
        /// Rates CSV file
        input: PathBuf,

        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Start HTTP server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Collection to write (default: CIO_COLLECTION_ID or 5)
        #[arg(long)]
        collection_id: Option<u64>,

        /// API base URL (default: CIO_API_URL or the public API)
        #[arg(long)]
        api_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Upload {
            input,
            ids,
            collection_id,
            api_url,
            dry_run,
            output,
        } => {
            if dry_run {
                cmd_preview(&input, &ids, output.as_deref())
            } else {
                cmd_upload(
                    &input,
                    &ids,
                    collection_id,
                    api_url.as_deref(),
                    output.as_deref(),
                )
                .await
            }
        }

        Commands::Preview { input, ids, output } => cmd_preview(&input, &ids, output.as_deref()),

        Commands::Parse { input, output } => cmd_parse(&input, output.as_deref()),

        Commands::Serve {
            port,
            collection_id,
            api_url,
        } => cmd_serve(port, collection_id, api_url.as_deref()).await,
    };

    if let Err(e) = result {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn load_config(
    collection_id: Option<u64>,
    api_url: Option<&str>,
) -> Result<CollectionConfig, Box<dyn std::error::Error>> {
    let mut config = CollectionConfig::from_env()?;
    if let Some(id) = collection_id {
        config = config.with_collection_id(id);
    }
    if let Some(url) = api_url {
        config = config.with_api_url(url);
    }
    Ok(config)
}

async fn cmd_upload(
    input: &Path,
    ids: &str,
    collection_id: Option<u64>,
    api_url: Option<&str>,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = CollectionClient::new(load_config(collection_id, api_url)?)?;

    let report = upload_file(input, ids, &client).await?;

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&report.records)?;
        fs::write(path, json)?;
        eprintln!("💾 Payload written to: {}", path.display());
    }

    match report.outcome {
        UploadOutcome::Success => {
            eprintln!("✅ Rates collection successfully updated!");
            Ok(())
        }
        UploadOutcome::Failed { status, body } => {
            eprintln!("❌ Failed to update collection. Status: {}", status);
            eprintln!("{}", body);
            std::process::exit(1);
        }
    }
}

fn cmd_preview(
    input: &Path,
    ids: &str,
    output: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Previewing: {}", input.display());

    let parsed = parse_csv_file(input)?;
    let mapped = prepare(&parsed.dataset, ids)?;

    let json = serde_json::to_string_pretty(&mapped.records)?;
    write_output(&json, output)?;

    Ok(())
}

fn cmd_parse(input: &Path, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("📄 Parsing CSV: {}", input.display());

    let result = parse_csv_file(input)?;

    eprintln!("   Encoding: {}", result.encoding);
    eprintln!("   Columns: {}", result.dataset.columns().join(", "));
    if !result.dropped_columns.is_empty() {
        eprintln!("   Dropped (empty): {}", result.dropped_columns.join(", "));
    }
    eprintln!("✅ Parsed {} rows", result.dataset.len());

    let json = serde_json::to_string_pretty(result.dataset.rows())?;
    write_output(&json, output)?;

    Ok(())
}

async fn cmd_serve(
    port: u16,
    collection_id: Option<u64>,
    api_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let client = CollectionClient::new(load_config(collection_id, api_url)?)?;
    rate_uploader::server::start_server(port, client).await?;
    Ok(())
}

fn write_output(content: &str, path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            fs::write(p, content)?;
            eprintln!("💾 Output written to: {}", p.display());
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
