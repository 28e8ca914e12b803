use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::Value;
use std::path::{Path, PathBuf};

use memory_breaker::config::loader::load_config;

#[derive(Parser)]
#[command(name = "breaker-cli")]
#[command(about = "Management CLI for breaker nodes", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8081")]
    url: String,

    #[arg(short, long, default_value = "admin-secret-key")]
    key: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check node status
    Status,
    /// Show usage, limits and trip counts of all breakers
    Breakers,
    /// Show a single breaker
    Breaker {
        name: String,
    },
    /// Validate a configuration file without contacting a node
    Validate {
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let endpoint = match &cli.command {
        Commands::Status => "/admin/status".to_string(),
        Commands::Breakers => "/admin/breakers".to_string(),
        Commands::Breaker { name } => format!("/admin/breakers/{}", name),
        Commands::Validate { path } => return validate(path),
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {}", cli.key))?,
    );

    let res = reqwest::Client::new()
        .get(format!("{}{}", cli.url, endpoint))
        .headers(headers)
        .send()
        .await?;
    print_response(res).await
}

fn validate(path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(path)?;
    println!("{}: ok", path.display());
    println!("  parent limit: {}", config.breakers.parent.limit);
    for child in &config.breakers.children {
        println!(
            "  {}: limit {}, overhead {}",
            child.name,
            child.limit,
            child.overhead
        );
    }
    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
