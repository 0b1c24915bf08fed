//! Lists the Gemini models available to the configured API key and marks
//! which of them support `generateContent`.

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use agrismart_ml::adapters::ai::{GeminiConfig, GeminiProvider};
use agrismart_ml::config::AppConfig;
use agrismart_ml::ports::ModelCatalog;

#[derive(Parser)]
#[command(name = "list-models")]
#[command(about = "List Gemini models usable for content generation", long_about = None)]
#[command(version)]
struct Cli {
    /// API key (defaults to the configured one)
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Show every model, not only those supporting generateContent
    #[arg(long)]
    all: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let Some(api_key) = cli.api_key.or(config.ai.gemini_api_key.clone()) else {
        bail!("no API key: set GEMINI_API_KEY or pass --api-key");
    };

    let provider = GeminiProvider::new(GeminiConfig::from_settings(
        &config.ai,
        &api_key,
        &config.ai.model,
    ))?;
    let models = provider.list_models().await.context("failed to list models")?;

    let selected: Vec<_> = models
        .into_iter()
        .filter(|m| cli.all || m.supports_generate_content())
        .collect();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&selected)?);
        return Ok(());
    }

    let candidates = config.ai.model_candidates();
    println!("{:<45} {:<8} {}", "MODEL", "GENERATE", "DISPLAY NAME");
    for model in &selected {
        let marker = if candidates.iter().any(|c| c == model.short_name()) {
            " (configured)"
        } else {
            ""
        };
        println!(
            "{:<45} {:<8} {}{}",
            model.short_name(),
            if model.supports_generate_content() { "yes" } else { "no" },
            model.display_name,
            marker
        );
    }
    println!("\n{} model(s)", selected.len());

    Ok(())
}
