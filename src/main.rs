use std::io::{self, Write};
use std::sync::Arc;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use scribe::config::Config;
use scribe::generator::bedrock::BedrockClient;
use scribe::generator::{FallbackPlan, Generator};
use scribe::handler::Handler;
use scribe::publisher::Publisher;
use scribe::publisher::s3::S3Store;

#[derive(Parser)]
#[command(name = "scribe", version, about = "Topic in, blog post out.")]
struct Cli {
    /// Generate one blog for this topic and exit
    #[arg(short, long)]
    topic: Option<String>,

    /// Handle a raw event (JSON) and print the response envelope
    #[arg(long, conflicts_with = "topic")]
    event: Option<String>,

    /// Primary model id (overrides MODEL_ID)
    #[arg(long)]
    model: Option<String>,

    /// Fallback model id (overrides FALLBACK_MODEL_ID)
    #[arg(long)]
    fallback_model: Option<String>,

    /// AWS region (overrides AWS_REGION)
    #[arg(long)]
    region: Option<String>,

    /// Destination bucket (overrides BLOG_S3_BUCKET; omit to skip uploads)
    #[arg(long)]
    bucket: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(model) = cli.model {
        config.primary_model = model;
    }
    if let Some(model) = cli.fallback_model {
        config.fallback_model = model;
    }
    if let Some(region) = cli.region {
        config.region = region;
    }
    if let Some(bucket) = cli.bucket {
        config.bucket = Some(bucket).filter(|b| !b.trim().is_empty());
    }

    let client = Arc::new(BedrockClient::new(&config.region).await);
    let generator = Generator::new(client, FallbackPlan::from_config(&config));
    let store = Arc::new(S3Store::new(&config.region).await);
    let publisher = Publisher::new(store, config.bucket.clone());

    // Raw event mode: run the full handler once and print the envelope.
    if let Some(event) = cli.event {
        let handler = Handler::new(generator, publisher);
        let response = handler.handle(&event).await;
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    // Single topic mode.
    if let Some(topic) = cli.topic {
        run_once(&generator, &publisher, &topic).await;
        return Ok(());
    }

    // Interactive — async stdin so Ctrl+C is caught at the prompt too.
    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print!("\ntopic> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        // Ctrl+D (EOF)
                        println!();
                        break;
                    }
                    Err(e) => {
                        eprintln!("input error: {}", e);
                        break;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                println!();
                break;
            }
        };

        let topic = line.trim();

        if topic.is_empty() {
            continue;
        }
        if topic == "quit" || topic == "exit" {
            break;
        }

        run_once(&generator, &publisher, topic).await;
    }

    Ok(())
}

async fn run_once(generator: &Generator, publisher: &Publisher, topic: &str) {
    println!("Generating blog for topic: {}\n", topic);

    let text = generator.generate(topic).await;
    if text.is_empty() {
        eprintln!("no blog produced — all models failed or returned nothing");
        return;
    }

    println!("{}", text);

    if publisher.enabled() {
        match publisher.publish(&text).await {
            Ok(key) => println!("\nuploaded: {}", key),
            Err(e) => eprintln!("\nupload failed: {}", e),
        }
    }
}
