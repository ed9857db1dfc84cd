use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use dynamic_router::admin::ADMIN_PREFIX;
use serde_json::json;

#[derive(Parser)]
#[command(name = "router-cli")]
#[command(about = "Manage routes of a running dynamic router", long_about = None)]
struct Cli {
    /// Admin API base URL.
    #[arg(short, long, default_value = "http://127.0.0.1:2019")]
    url: String,

    /// Bearer token, if the admin API requires one.
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Route a host to an upstream (replaces any existing route)
    Add {
        #[arg(long)]
        host: String,
        #[arg(long)]
        upstream: String,
    },
    /// Remove the route for a host
    Delete {
        #[arg(long)]
        host: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", key))?);
    }

    let base = cli.url.trim_end_matches('/');
    let (endpoint, payload) = match &cli.command {
        Commands::Add { host, upstream } => ("add", json!({ "host": host, "upstream": upstream })),
        Commands::Delete { host } => ("delete", json!({ "host": host })),
    };

    let res = client
        .post(format!("{}{}{}", base, ADMIN_PREFIX, endpoint))
        .headers(headers)
        .json(&payload)
        .send()
        .await?;

    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: Admin API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        std::process::exit(1);
    }

    println!("ok");
    Ok(())
}
