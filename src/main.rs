use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use newsdigest::config::Config;
use newsdigest::delivery::TelegramClient;
use newsdigest::pipeline;
use newsdigest::secrets::Secrets;
use newsdigest::summarize::HuggingFaceSummarizer;

#[derive(Parser, Debug)]
#[command(
    name = "newsdigest",
    version,
    about = "Summarize the latest RSS headlines and post them to Telegram"
)]
struct Args {
    /// Config file (TOML). A missing file means built-in defaults.
    #[arg(long, value_name = "FILE", default_value = "newsdigest.toml")]
    config: PathBuf,

    /// Where to write the digest (overrides `output_path`)
    #[arg(long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Feed URL to collect; repeat for several (replaces configured feeds)
    #[arg(long = "feed", value_name = "URL")]
    feeds: Vec<String>,

    /// Build and save the digest without posting it
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    if let Some(output) = args.output {
        config.output_path = output;
    }
    if !args.feeds.is_empty() {
        config.feeds = args.feeds;
    }
    config.validate()?;

    // Resolve every credential before the first request goes out.
    let secrets = Secrets::from_env(!args.dry_run)?;

    let client =
        pipeline::http_client(config.request_timeout()).context("Failed to build HTTP client")?;

    let summarizer = HuggingFaceSummarizer::new(
        client.clone(),
        config.summarizer_url.clone(),
        secrets.summarizer_token,
        config.max_summary_input_chars,
    );
    let telegram = secrets.telegram.map(|creds| {
        TelegramClient::new(
            client.clone(),
            config.telegram_api_base.clone(),
            creds.bot_token,
            creds.chat_id,
        )
    });

    let today = chrono::Local::now().date_naive();
    let report = pipeline::run(&config, &client, &summarizer, telegram.as_ref(), today).await?;

    tracing::info!(
        collected = report.collected,
        entries = report.digest.entries,
        failed_summaries = report.digest.failed_summaries,
        output = %report.output_path.display(),
        "Run complete"
    );

    if let Some(Err(e)) = report.delivery {
        anyhow::bail!(
            "Digest saved to {} but Telegram delivery failed: {}",
            report.output_path.display(),
            e
        );
    }

    Ok(())
}
