use ai_doctor::ai::{CallOptions, ModelQuery, ModelResponse};
use ai_doctor::app::Advisor;
use ai_doctor::models::{Config, ImagePayload};
use ai_doctor::{prompts, server};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "ai-doctor")]
#[command(about = "Multi-model medical image advice backend")]
struct CliArgs {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve {
        /// Address to bind, overriding BIND_ADDR.
        #[arg(long, value_name = "ADDR")]
        bind: Option<String>,
    },
    /// Analyze a local image file and print the reply as JSON.
    Analyze {
        #[arg(value_name = "IMAGE")]
        image: PathBuf,
        #[arg(value_name = "QUERY")]
        query: String,
    },
    /// Check that the upstream API accepts the configured key.
    Ping,
}

/// Show only the ends of a secret, e.g. `gsk_abcdef...wxyz1`.
fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 15 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..10].iter().collect();
    let tail: String = chars[chars.len() - 5..].iter().collect();
    format!("{}...{}", head, tail)
}

async fn read_image(path: &Path) -> Result<ImagePayload> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read image {}", path.display()))?;
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(ImagePayload::new(&bytes, &filename)?)
}

async fn analyze(config: &Config, image: &Path, query: &str) -> Result<()> {
    let advisor = Advisor::from_config(config)?;
    let payload = read_image(image).await?;
    info!("Image type: {}", payload.mime());

    let reply = advisor.advise(&payload, query).await;
    println!("{}", serde_json::to_string_pretty(&reply)?);
    Ok(())
}

async fn ping(config: &Config) -> Result<()> {
    let advisor = Advisor::from_config(config)?;
    println!("API key found: {}", mask_secret(config.require_api_key()?));
    println!("Testing API connection...");

    let response = advisor
        .chat()
        .complete(
            ModelQuery::text(&advisor.models().analyzer, prompts::PING),
            &CallOptions::PING,
        )
        .await;

    match response {
        ModelResponse::Content(text) => {
            println!("API connection successful");
            println!("Response: {}", text);
            Ok(())
        }
        ModelResponse::Failed(failure) => anyhow::bail!("API connection failed: {}", failure),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ai_doctor=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = CliArgs::parse();

    let mut config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    let outcome = match args.command.unwrap_or(Command::Serve { bind: None }) {
        Command::Serve { bind } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            info!("Starting ai-doctor server");
            server::serve(&config).await.map_err(anyhow::Error::from)
        }
        Command::Analyze { image, query } => analyze(&config, &image, &query).await,
        Command::Ping => ping(&config).await,
    };

    if let Err(e) = outcome {
        error!("{:#}", e);
        std::process::exit(1);
    }
    Ok(())
}
