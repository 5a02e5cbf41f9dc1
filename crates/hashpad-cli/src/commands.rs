use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use colored::Colorize;
use serde_json::json;

use hashpad_doc::{serialize, standalone_html, Renderer};
use hashpad_router::{download_path, extension_for, request_path, resolve, RouteError, RouteOutcome};
use hashpad_server::{HashpadServer, ServerConfig};
use hashpad_store::{
    BlobMetadata, BlobStore, FsBlobStore, HTML_CONTENT_TYPE, MARKDOWN_CONTENT_TYPE, OCTET_STREAM,
};
use hashpad_types::ContentHash;

use crate::cli::*;

/// Origin relative request paths are resolved against.
const RESOLVE_BASE: &str = "http://localhost/";

pub async fn run_command(cli: Cli) -> anyhow::Result<()> {
    let format = cli.format;
    let store_dir = cli.store;
    match cli.command {
        Command::Serve(args) => cmd_serve(args, store_dir).await,
        Command::Put(args) => cmd_put(args, &open_store(store_dir)?, format).await,
        Command::Get(args) => cmd_get(args, &open_store(store_dir)?).await,
        Command::Normalize(args) => cmd_normalize(args),
        Command::Export(args) => cmd_export(args),
        Command::Resolve(args) => cmd_resolve(args, &open_store(store_dir)?, format).await,
    }
}

fn open_store(dir: Option<PathBuf>) -> anyhow::Result<FsBlobStore> {
    let dir = dir.unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_DIR));
    FsBlobStore::open(&dir).with_context(|| format!("opening blob store at {}", dir.display()))
}

fn guess_content_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("md" | "markdown") => MARKDOWN_CONTENT_TYPE,
        Some("html" | "htm") => HTML_CONTENT_TYPE,
        Some("txt") => "text/plain; charset=utf-8",
        _ => OCTET_STREAM,
    }
}

fn read_markdown(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

fn write_output(output: Option<&Path>, data: &[u8]) -> anyhow::Result<()> {
    match output {
        Some(path) => std::fs::write(path, data).with_context(|| format!("writing {}", path.display())),
        None => Ok(std::io::stdout().write_all(data)?),
    }
}

async fn cmd_serve(args: ServeArgs, store_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let mut config = match &args.config {
        Some(path) => ServerConfig::load(path)?,
        None => ServerConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(public) = args.public {
        config.public_dir = public;
    }
    if store_dir.is_some() {
        config.store_dir = store_dir;
    }

    let backing = match &config.store_dir {
        Some(dir) => dir.display().to_string(),
        None => "memory".to_string(),
    };
    println!(
        "{} Hashpad on {} (assets: {}, blobs: {})",
        "✓".green().bold(),
        config.bind_addr.to_string().bold(),
        config.public_dir.display(),
        backing.cyan()
    );
    HashpadServer::new(config)?.serve().await?;
    Ok(())
}

async fn cmd_put(args: PutArgs, store: &dyn BlobStore, format: OutputFormat) -> anyhow::Result<()> {
    let data = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("reading {}", args.file.display()))?;
    let content_type = args
        .content_type
        .unwrap_or_else(|| guess_content_type(&args.file).to_string());

    let mut metadata = BlobMetadata::new(content_type).with_size(data.len() as u64);
    if let Some(name) = args.file.file_name().and_then(|n| n.to_str()) {
        metadata = metadata.with_name(name);
    }
    if let Ok(modified) = std::fs::metadata(&args.file).and_then(|m| m.modified()) {
        metadata = metadata.with_last_modified(DateTime::<Utc>::from(modified));
    }
    let ext = extension_for(&metadata.content_type);

    let hash = store.put(Bytes::from(data), metadata).await?;
    let url = download_path(&hash, ext);
    match format {
        OutputFormat::Json => println!(
            "{}",
            json!({ "hash": hash.to_hex(), "short": hash.to_base64url(), "url": url })
        ),
        OutputFormat::Text => {
            println!("{} Stored {}", "✓".green().bold(), args.file.display());
            println!("  Hash: {}", hash.to_hex().yellow());
            println!("  Short: {}", hash.to_base64url().cyan());
            println!("  URL: {}", url.blue());
        }
    }
    Ok(())
}

async fn cmd_get(args: GetArgs, store: &dyn BlobStore) -> anyhow::Result<()> {
    let hash = ContentHash::parse(&args.hash)?;
    let Some(blob) = store.get(&hash).await? else {
        bail!("blob {} not found", hash.short_hex());
    };
    write_output(args.output.as_deref(), &blob.data)
}

fn cmd_normalize(args: NormalizeArgs) -> anyhow::Result<()> {
    let markdown = read_markdown(&args.file)?;
    let normalized = serialize(&Renderer::default().render(&markdown)?)?;
    if args.write {
        if normalized == markdown {
            println!("{} already canonical", args.file.display());
        } else {
            std::fs::write(&args.file, &normalized)?;
            println!("{} Normalized {}", "✓".green().bold(), args.file.display());
        }
        Ok(())
    } else {
        write_output(None, normalized.as_bytes())
    }
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let markdown = read_markdown(&args.file)?;
    let body = Renderer::default().render(&markdown)?;
    let page = standalone_html(&body.inner_html(), &args.stylesheet);
    write_output(args.output.as_deref(), page.as_bytes())
}

async fn cmd_resolve(args: ResolveArgs, store: &dyn BlobStore, format: OutputFormat) -> anyhow::Result<()> {
    let path = request_path(&args.path, RESOLVE_BASE)?;
    let outcome = match resolve(&path, store, &args.default_document).await {
        Ok(outcome) => outcome,
        Err(RouteError::NotFound(hash)) => {
            match format {
                OutputFormat::Json => println!("{}", json!({ "status": 404, "hash": hash.to_hex() })),
                OutputFormat::Text => println!("{} {}", "404".red().bold(), hash.to_hex().yellow()),
            }
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    match (format, outcome) {
        (
            OutputFormat::Json,
            RouteOutcome::Stream {
                status,
                content_type,
                content_length,
                ..
            },
        ) => println!(
            "{}",
            json!({ "status": status, "content_type": content_type, "content_length": content_length })
        ),
        (OutputFormat::Json, RouteOutcome::Redirect { status, location }) => {
            println!("{}", json!({ "status": status, "location": location }))
        }
        (
            OutputFormat::Text,
            RouteOutcome::Stream {
                status,
                content_type,
                content_length,
                ..
            },
        ) => println!(
            "{} {} ({} bytes)",
            status.to_string().green().bold(),
            content_type,
            content_length
        ),
        (OutputFormat::Text, RouteOutcome::Redirect { status, location }) => {
            println!("{} → {}", status.to_string().cyan().bold(), location.blue())
        }
    }
    Ok(())
}
