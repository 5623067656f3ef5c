use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

use farecast::api::AppState;
use farecast::documents::DocumentChunk;
use farecast::{web, FarecastConfig};

#[derive(Parser)]
#[command(
    name = "farecast",
    version,
    about = "Air travel ticket price comparison with AI travel insights"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the API server
    Serve,
    /// Upload and process a PDF file, displaying its chunks
    Upload {
        /// Path to the PDF file to upload
        file: PathBuf,
        /// Server URL
        #[arg(long, default_value = "http://localhost:8000")]
        server_url: String,
    },
    /// Extract raw text from a PDF file
    ExtractText {
        /// Path to the PDF file to extract text from
        file: PathBuf,
        /// Server URL
        #[arg(long, default_value = "http://localhost:8000")]
        server_url: String,
        /// Path to save the extracted text instead of printing it
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve => serve().await,
        Commands::Upload { file, server_url } => upload(&file, &server_url).await,
        Commands::ExtractText {
            file,
            server_url,
            output,
        } => extract_text(&file, &server_url, output.as_deref()).await,
    }
}

async fn serve() -> Result<()> {
    let config = FarecastConfig::from_env()?;
    let state = Arc::new(AppState::from_config(&config));
    web::run(state, &config.api_host, config.api_port).await
}

async fn upload(file: &Path, server_url: &str) -> Result<()> {
    let response = post_pdf(file, server_url, "/api/pdf/upload").await?;
    let chunks: Vec<DocumentChunk> = response
        .json()
        .await
        .context("Failed to parse server response")?;

    println!("Successfully processed PDF!");
    println!("Number of chunks: {}\n", chunks.len());

    println!("{:<8}  {:<6}  Content Preview", "Chunk #", "Page");
    println!("{}", "-".repeat(80));
    for (i, chunk) in chunks.iter().enumerate() {
        println!(
            "{:<8}  {:<6}  {}",
            i + 1,
            chunk.metadata.page,
            preview(&chunk.content)
        );
    }

    Ok(())
}

async fn extract_text(file: &Path, server_url: &str, output: Option<&Path>) -> Result<()> {
    let response = post_pdf(file, server_url, "/api/pdf/extract-text").await?;
    let body: Value = response
        .json()
        .await
        .context("Failed to parse server response")?;
    let text = body["text"].as_str().unwrap_or_default();

    match output {
        Some(path) => {
            std::fs::write(path, text)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Text saved to {}", path.display());
        }
        None => println!("{text}"),
    }

    Ok(())
}

/// Send a local PDF to one of the server's multipart endpoints
async fn post_pdf(file: &Path, server_url: &str, route: &str) -> Result<reqwest::Response> {
    if !file.exists() {
        bail!("File {} does not exist", file.display());
    }
    if !file
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    {
        bail!("Only PDF files are supported");
    }

    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.pdf".to_string());
    let bytes = std::fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;

    let part = reqwest::multipart::Part::bytes(bytes)
        .file_name(file_name)
        .mime_str("application/pdf")?;
    let form = reqwest::multipart::Form::new().part("file", part);

    let response = reqwest::Client::new()
        .post(format!("{server_url}{route}"))
        .multipart(form)
        .send()
        .await
        .with_context(|| format!("Failed to reach server at {server_url}"))?;

    if !response.status().is_success() {
        let status = response.status();
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|v| v["detail"].as_str().map(String::from))
            .unwrap_or_else(|| format!("server returned {status}"));
        bail!("Error: {detail}");
    }

    Ok(response)
}

fn preview(content: &str) -> String {
    let truncated: String = content.chars().take(100).collect();
    if truncated.len() < content.len() {
        format!("{truncated}...")
    } else {
        truncated
    }
}
