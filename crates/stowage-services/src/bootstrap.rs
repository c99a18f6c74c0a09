//! Client construction from configuration

use anyhow::{Context, Result};
use stowage_core::Config;

use crate::dispatcher::EventDispatcher;

/// Build every client named by `config` and wire them into a dispatcher
pub async fn build_dispatcher(config: &Config) -> Result<EventDispatcher> {
    let object_store = stowage_storage::create_object_store(config)
        .await
        .context("Failed to create S3 client")?;
    let inference = stowage_inference::create_inference_service(config)
        .await
        .context("Failed to create inference backend")?;
    let record_store = stowage_db::create_record_store(config).await;

    tracing::info!(
        inference = %inference.name(),
        record_store = config.record_store_enabled(),
        record_table = ?config.record_table,
        environment = %config.environment,
        "Pipeline clients ready"
    );

    Ok(EventDispatcher::new(object_store, inference, record_store))
}
