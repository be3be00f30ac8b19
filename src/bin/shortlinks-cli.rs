use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::redirect::Policy;
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "shortlinks-cli")]
#[command(about = "Management CLI for the shortlinks registry", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Admin API key, when the server requires one
    #[arg(short, long)]
    key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check service status
    Status,
    /// List every registered redirect
    List,
    /// Show the destination stored for a source
    Get { source: String },
    /// Register or replace a redirect
    Set { source: String, destination: String },
    /// Remove a redirect
    Delete { source: String },
    /// Show where a path would redirect
    Resolve { path: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut headers = HeaderMap::new();
    if let Some(key) = &cli.key {
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", key))?,
        );
    }
    let client = reqwest::Client::builder()
        .redirect(Policy::none())
        .default_headers(headers)
        .build()?;

    let base = cli.url.trim_end_matches('/');
    match cli.command {
        Commands::Status => {
            let res = client.get(format!("{}/apiz/status", base)).send().await?;
            print_response(res).await?;
        }
        Commands::List => {
            let res = client.get(format!("{}/registryz", base)).send().await?;
            print_response(res).await?;
        }
        Commands::Get { source } => {
            let res = client
                .get(format!("{}/apiz/entries/{}", base, source.trim_start_matches('/')))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Set {
            source,
            destination,
        } => {
            let res = client
                .post(format!("{}/apiz/save", base))
                .json(&json!({ "source": source, "destination": destination }))
                .send()
                .await?;
            print_status(res).await?;
        }
        Commands::Delete { source } => {
            let res = client
                .post(format!("{}/apiz/save", base))
                .json(&json!({ "source": source, "destination": "" }))
                .send()
                .await?;
            print_status(res).await?;
        }
        Commands::Resolve { path } => {
            let res = client
                .get(format!("{}/apiz/resolve/{}", base, path.trim_start_matches('/')))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        return report_failure(res).await;
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

async fn print_status(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    if !res.status().is_success() {
        return report_failure(res).await;
    }
    println!("OK");
    Ok(())
}

async fn report_failure(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    eprintln!("Error: API returned status {}", res.status());
    if let Ok(text) = res.text().await {
        eprintln!("Response: {}", text);
    }
    std::process::exit(1);
}
