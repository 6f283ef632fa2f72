use clap::{Parser, Subcommand};
use serde_json::Value;

#[derive(Parser)]
#[command(name = "shell-cli")]
#[command(about = "Probe a running offline-shell", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:3000")]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Call the registration endpoint
    Register,
    /// Call the database-init endpoint
    InitDb {
        /// Use POST instead of GET
        #[arg(long)]
        post: bool,
    },
    /// Show shell health and engine startup state
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    let res = match cli.command {
        Commands::Register => client.post(format!("{base}/api/auth/register")).send().await?,
        Commands::InitDb { post: true } => client.post(format!("{base}/api/init-db")).send().await?,
        Commands::InitDb { post: false } => client.get(format!("{base}/api/init-db")).send().await?,
        Commands::Health => client.get(format!("{base}/health")).send().await?,
    };

    print_response(res).await
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: shell returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
