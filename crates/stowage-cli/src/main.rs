//! Stowage CLI: operator utilities around the storage-class pipeline.
//!
//! Uses the same environment as the Lambda handler (DYNAMODB_TABLE,
//! INFERENCE_PROVIDER, AWS_REGION, S3_ENDPOINT, ...).

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::time::Duration;
use stowage_cli::{format_insight, sample_files};
use stowage_core::Config;

#[derive(Parser)]
#[command(name = "stowage", about = "Stowage storage-class optimizer utilities")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Upload the sample files to a bucket to trigger the pipeline
    Upload {
        /// Target bucket
        bucket: String,
        /// Seconds to wait between uploads
        #[arg(long, default_value = "2")]
        delay_secs: u64,
    },
    /// Print every stored insight record
    Insights {
        #[arg(long, value_enum, default_value = "table")]
        format: OutputFormat,
    },
    /// Run the pipeline for one object without the Lambda runtime
    Analyze {
        bucket: String,
        /// Object key, taken literally unless --encoded is given
        key: String,
        /// The key is form-urlencoded as in an S3 notification (`+` for space, `%XX`)
        #[arg(long)]
        encoded: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn upload(config: &Config, bucket: &str, delay: Duration) -> anyhow::Result<()> {
    let store = stowage_storage::create_object_store(config)
        .await
        .context("Failed to create S3 client")?;
    let files = sample_files();
    let total = files.len();
    let mut failed = 0;

    for (i, file) in files.into_iter().enumerate() {
        let size = file.body.len();
        let metadata = file.metadata();
        match store
            .put_object(bucket, file.key, file.body, Some(file.content_type), metadata)
            .await
        {
            Ok(()) => println!("uploaded {}/{} ({} bytes)", bucket, file.key, size),
            Err(e) => {
                failed += 1;
                tracing::error!(error = %e, bucket = %bucket, key = %file.key, "Upload failed");
            }
        }

        if i + 1 < total {
            tokio::time::sleep(delay).await;
        }
    }

    if failed > 0 {
        bail!("{} of {} uploads failed", failed, total);
    }
    Ok(())
}

async fn insights(config: &Config, format: OutputFormat) -> anyhow::Result<()> {
    let Some(store) = stowage_db::create_record_store(config).await else {
        bail!("DYNAMODB_TABLE is not set");
    };
    let records = store
        .scan()
        .await
        .with_context(|| format!("Failed to scan {}", store.target()))?;

    match format {
        OutputFormat::Json => print_json(&records)?,
        OutputFormat::Table => {
            if records.is_empty() {
                println!("No insights found in {}", store.target());
            } else {
                println!("{} insights in {}\n", records.len(), store.target());
                for record in &records {
                    println!("{}\n", format_insight(record, 80));
                }
            }
        }
    }
    Ok(())
}

async fn analyze(config: &Config, bucket: &str, key: &str, encoded: bool) -> anyhow::Result<()> {
    let dispatcher = stowage_services::build_dispatcher(config).await?;
    let result = if encoded {
        dispatcher.process_record(bucket, key).await
    } else {
        dispatcher.process_key(bucket, key.to_string()).await
    };
    let outcome = result.with_context(|| format!("Failed to analyze {}/{}", bucket, key))?;

    print_json(&serde_json::json!({
        "bucket": outcome.bucket,
        "key": outcome.key,
        "size": outcome.size,
        "recommendation": outcome.recommendation,
        "recorded": outcome.recorded,
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;
    stowage_infra::init_telemetry(config.log_format, stowage_infra::DEFAULT_FILTER)
        .map_err(|e| anyhow::anyhow!(e))?;

    match cli.command {
        Commands::Upload { bucket, delay_secs } => {
            upload(&config, &bucket, Duration::from_secs(delay_secs)).await?
        }
        Commands::Insights { format } => insights(&config, format).await?,
        Commands::Analyze {
            bucket,
            key,
            encoded,
        } => analyze(&config, &bucket, &key, encoded).await?,
    }

    Ok(())
}
