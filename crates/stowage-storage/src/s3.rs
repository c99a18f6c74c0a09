use crate::traits::{ObjectAccessError, ObjectHead, ObjectStore, ObjectTag, StorageResult};
use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{MetadataDirective, StorageClass, Tag, Tagging};
use aws_sdk_s3::Client;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use stowage_core::{encode_copy_source, StorageTier};

/// S3 object store implementation
#[derive(Clone)]
pub struct S3ObjectStore {
    client: Client,
}

impl S3ObjectStore {
    /// Create a new S3ObjectStore
    ///
    /// # Arguments
    /// * `region` - AWS region; the SDK default provider chain is used when `None`
    /// * `endpoint_url` - Optional custom endpoint for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO, "http://localhost:4566" for localstack)
    pub async fn new(region: Option<String>, endpoint_url: Option<String>) -> StorageResult<Self> {
        let region_provider = RegionProviderChain::first_try(region.map(aws_config::Region::new))
            .or_default_provider();

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        let client = if let Some(ref endpoint) = endpoint_url {
            // Path-style addressing is required by MinIO and localstack
            let s3_config = aws_sdk_s3::config::Builder::from(&config)
                .endpoint_url(endpoint)
                .force_path_style(true)
                .build();
            Client::from_conf(s3_config)
        } else {
            Client::new(&config)
        };

        Ok(S3ObjectStore { client })
    }
}

fn is_access_denied(code: Option<&str>) -> bool {
    matches!(code, Some("AccessDenied") | Some("Forbidden") | Some("403"))
}

fn to_utc(dt: &aws_sdk_s3::primitives::DateTime) -> Option<DateTime<Utc>> {
    DateTime::<Utc>::from_timestamp(dt.secs(), dt.subsec_nanos())
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn head_metadata(&self, bucket: &str, key: &str) -> StorageResult<ObjectHead> {
        let start = std::time::Instant::now();

        let output = self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                let service_err = e.into_service_error();
                if service_err.is_not_found() {
                    return ObjectAccessError::NotFound {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                    };
                }
                tracing::error!(
                    error = %DisplayErrorContext(&service_err),
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 head_object failed"
                );
                if is_access_denied(service_err.code()) {
                    ObjectAccessError::PermissionDenied {
                        bucket: bucket.to_string(),
                        key: key.to_string(),
                        message: service_err.to_string(),
                    }
                } else {
                    ObjectAccessError::BackendError(
                        DisplayErrorContext(&service_err).to_string(),
                    )
                }
            })?;

        let head = ObjectHead {
            size: output.content_length().unwrap_or(0).max(0) as u64,
            content_type: output.content_type().map(str::to_string),
            storage_class: output.storage_class().map(|c| c.as_str().to_string()),
            last_modified: output.last_modified().and_then(to_utc),
        };

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            size_bytes = head.size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 head_object successful"
        );

        Ok(head)
    }

    async fn copy_in_place(
        &self,
        bucket: &str,
        key: &str,
        tier: StorageTier,
        metadata: HashMap<String, String>,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();

        self.client
            .copy_object()
            .bucket(bucket)
            .key(key)
            .copy_source(encode_copy_source(bucket, key))
            .storage_class(StorageClass::from(tier.as_str()))
            .metadata_directive(MetadataDirective::Replace)
            .set_metadata(Some(metadata))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    bucket = %bucket,
                    key = %key,
                    tier = %tier,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 copy_object failed"
                );
                ObjectAccessError::CopyFailed(DisplayErrorContext(&e).to_string())
            })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            tier = %tier,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 copy in place successful"
        );

        Ok(())
    }

    async fn replace_tags(
        &self,
        bucket: &str,
        key: &str,
        tags: Vec<ObjectTag>,
    ) -> StorageResult<()> {
        let start = std::time::Instant::now();

        let tag_set = tags
            .into_iter()
            .map(|tag| Tag::builder().key(tag.key).value(tag.value).build())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| ObjectAccessError::TaggingFailed(e.to_string()))?;

        let tagging = Tagging::builder()
            .set_tag_set(Some(tag_set))
            .build()
            .map_err(|e| ObjectAccessError::TaggingFailed(e.to_string()))?;

        self.client
            .put_object_tagging()
            .bucket(bucket)
            .key(key)
            .tagging(tagging)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    bucket = %bucket,
                    key = %key,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 put_object_tagging failed"
                );
                ObjectAccessError::TaggingFailed(DisplayErrorContext(&e).to_string())
            })?;

        tracing::debug!(
            bucket = %bucket,
            key = %key,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 tag set replaced"
        );

        Ok(())
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: Option<&str>,
        metadata: HashMap<String, String>,
    ) -> StorageResult<()> {
        let size = body.len() as u64;
        let start = std::time::Instant::now();

        let mut request = self
            .client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(Bytes::from(body)))
            .set_metadata(Some(metadata));

        if let Some(ct) = content_type {
            request = request.content_type(ct);
        }

        request.send().await.map_err(|e| {
            tracing::error!(
                error = %DisplayErrorContext(&e),
                bucket = %bucket,
                key = %key,
                size_bytes = size,
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 upload failed"
            );
            ObjectAccessError::UploadFailed(DisplayErrorContext(&e).to_string())
        })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn access_denied_codes() {
        assert!(is_access_denied(Some("AccessDenied")));
        assert!(is_access_denied(Some("Forbidden")));
        assert!(!is_access_denied(Some("NoSuchKey")));
        assert!(!is_access_denied(None));
    }

    #[test]
    fn converts_smithy_datetime() {
        let dt = aws_sdk_s3::primitives::DateTime::from_secs_and_nanos(1_704_103_200, 500);
        let converted = to_utc(&dt).unwrap();
        assert_eq!(converted.timestamp(), 1_704_103_200);
        assert_eq!(converted.timestamp_subsec_nanos(), 500);
    }
}
