use crate::{ObjectStore, S3ObjectStore, StorageResult};
use std::sync::Arc;
use stowage_core::Config;

/// Create the object store client described by the configuration
pub async fn create_object_store(config: &Config) -> StorageResult<Arc<dyn ObjectStore>> {
    let store = S3ObjectStore::new(config.aws_region.clone(), config.s3_endpoint.clone()).await?;

    tracing::debug!(
        region = ?config.aws_region,
        endpoint = ?config.s3_endpoint,
        "S3 object store client created"
    );

    Ok(Arc::new(store))
}
