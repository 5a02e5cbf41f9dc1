use std::net::SocketAddr;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use hashpad_doc::DEFAULT_STYLESHEET;

/// Blob directory used by `put`, `get` and `resolve` when `--store` is not given.
pub const DEFAULT_STORE_DIR: &str = ".hashpad/blobs";

#[derive(Parser)]
#[command(
    name = "hashpad",
    about = "Hashpad: content-addressed Markdown documents",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Blob store directory
    #[arg(long, global = true)]
    pub store: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Start the HTTP server
    Serve(ServeArgs),
    /// Store a file and print its hash
    Put(PutArgs),
    /// Print a stored blob
    Get(GetArgs),
    /// Rewrite a Markdown file in canonical form
    Normalize(NormalizeArgs),
    /// Render a Markdown file as a standalone HTML page
    Export(ExportArgs),
    /// Show how the server would route a request path
    Resolve(ResolveArgs),
}

#[derive(Args)]
pub struct ServeArgs {
    /// TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    #[arg(long)]
    pub bind: Option<SocketAddr>,
    /// Static asset directory
    #[arg(long)]
    pub public: Option<PathBuf>,
}

#[derive(Args)]
pub struct PutArgs {
    pub file: PathBuf,
    /// Content type; guessed from the extension when omitted
    #[arg(long = "type")]
    pub content_type: Option<String>,
}

#[derive(Args)]
pub struct GetArgs {
    /// 64-char hex or 43-char base64url hash
    pub hash: String,
    /// Write to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct NormalizeArgs {
    pub file: PathBuf,
    /// Overwrite the file instead of printing
    #[arg(short, long)]
    pub write: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    pub file: PathBuf,
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long, default_value = DEFAULT_STYLESHEET)]
    pub stylesheet: String,
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Request path or URI
    pub path: String,
    #[arg(long, default_value = hashpad_router::DEFAULT_DOCUMENT)]
    pub default_document: String,
}
