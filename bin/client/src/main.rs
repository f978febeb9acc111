//! Document archive client

mod fetch;
mod upload;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

const DEFAULT_SERVER: &str = "http://127.0.0.1:8080";

#[derive(Parser)]
#[command(name = "client")]
#[command(about = "Document archive client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload a document; its content hash becomes the document id
    Upload {
        /// File to upload
        file: PathBuf,
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER)]
        server: String,
        /// MIME type of the document
        #[arg(long, default_value = "application/octet-stream")]
        content_type: String,
        /// Document title
        #[arg(long)]
        title: Option<String>,
        /// Document summary
        #[arg(long)]
        summary: Option<String>,
        /// Uploader name
        #[arg(long)]
        uploader: Option<String>,
    },
    /// Upload a metadata JSON file for an archived document
    UploadMeta {
        /// Document id (content hash)
        id: String,
        /// Metadata JSON file
        file: PathBuf,
        /// Language variant; default metadata when omitted
        #[arg(long)]
        lang: Option<String>,
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER)]
        server: String,
    },
    /// Fetch a document, searching backward from a start year
    Fetch {
        /// Document id (content hash)
        id: String,
        /// Search start year; current year when omitted
        #[arg(long)]
        year: Option<String>,
        /// Metadata language
        #[arg(long)]
        lang: Option<String>,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER)]
        server: String,
    },
    /// Fetch a document's metadata JSON
    Meta {
        /// Document id (content hash)
        id: String,
        /// Search start year; current year when omitted
        #[arg(long)]
        year: Option<String>,
        /// Metadata language
        #[arg(long)]
        lang: Option<String>,
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER)]
        server: String,
    },
    /// Probe whether a document exists, searching backward
    Exists {
        /// Document id (content hash)
        id: String,
        /// Search start year; current year when omitted
        #[arg(long)]
        year: Option<String>,
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER)]
        server: String,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Upload {
            file,
            server,
            content_type,
            title,
            summary,
            uploader,
        } => upload::upload_document(&server, &file, &content_type, title, summary, uploader),
        Commands::UploadMeta {
            id,
            file,
            lang,
            server,
        } => upload::upload_meta(&server, &id, &file, lang.as_deref()),
        Commands::Fetch {
            id,
            year,
            lang,
            output,
            server,
        } => fetch::fetch_document(
            &server,
            &id,
            year.as_deref(),
            lang.as_deref(),
            output.as_deref(),
        ),
        Commands::Meta {
            id,
            year,
            lang,
            server,
        } => fetch::fetch_meta(&server, &id, year.as_deref(), lang.as_deref()),
        Commands::Exists { id, year, server } => fetch::exists(&server, &id, year.as_deref()),
    }
}
