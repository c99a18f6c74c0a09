//! DynamoDB record store

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use stowage_core::{Config, InsightRecord};

use crate::traits::{RecordStore, RecordStoreError, RecordStoreResult};

type Item = HashMap<String, AttributeValue>;

/// Insight records in a DynamoDB table with `file_id` as partition key and
/// `ttl` as TTL attribute.
#[derive(Clone)]
pub struct DynamoRecordStore {
    client: Client,
    table: String,
}

impl DynamoRecordStore {
    pub async fn new(table: String, region: Option<String>) -> Self {
        let region_provider = RegionProviderChain::first_try(region.map(aws_config::Region::new))
            .or_default_provider();

        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        Self::from_client(Client::new(&config), table)
    }

    pub fn from_client(client: Client, table: String) -> Self {
        Self { client, table }
    }
}

/// Create the record store when `DYNAMODB_TABLE` is set, `None` otherwise
pub async fn create_record_store(config: &Config) -> Option<Arc<dyn RecordStore>> {
    let table = config.record_table.clone()?;
    tracing::debug!(table = %table, "DynamoDB record store client created");
    Some(Arc::new(
        DynamoRecordStore::new(table, config.aws_region.clone()).await,
    ))
}

pub(crate) fn to_item(record: &InsightRecord) -> Item {
    let s = |v: &str| AttributeValue::S(v.to_string());
    let n = |v: String| AttributeValue::N(v);

    HashMap::from([
        ("file_id".to_string(), s(&record.id)),
        ("bucket_name".to_string(), s(&record.bucket)),
        ("object_key".to_string(), s(&record.key)),
        ("file_name".to_string(), s(&record.name)),
        ("file_size".to_string(), n(record.size.to_string())),
        ("file_type".to_string(), s(&record.file_type)),
        ("content_type".to_string(), s(&record.content_type)),
        ("last_modified".to_string(), s(&record.last_modified.to_rfc3339())),
        ("original_storage_class".to_string(), s(&record.current_tier)),
        ("recommended_storage_class".to_string(), s(record.tier.as_str())),
        ("reasoning".to_string(), s(&record.reasoning)),
        ("confidence".to_string(), s(record.confidence.as_str())),
        ("analyzed_at".to_string(), s(&record.analyzed_at.to_rfc3339())),
        ("ttl".to_string(), n(record.expires_at.timestamp().to_string())),
    ])
}

fn get_s<'a>(item: &'a Item, name: &str) -> RecordStoreResult<&'a str> {
    match item.get(name) {
        Some(AttributeValue::S(v)) => Ok(v.as_str()),
        _ => Err(RecordStoreError::Decode(format!(
            "missing string attribute {}",
            name
        ))),
    }
}

fn get_n<T>(item: &Item, name: &str) -> RecordStoreResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match item.get(name) {
        Some(AttributeValue::N(v)) => v.parse::<T>().map_err(|e| {
            RecordStoreError::Decode(format!("attribute {} is not an integer: {}", name, e))
        }),
        _ => Err(RecordStoreError::Decode(format!(
            "missing number attribute {}",
            name
        ))),
    }
}

fn get_time(item: &Item, name: &str) -> RecordStoreResult<DateTime<Utc>> {
    let raw = get_s(item, name)?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RecordStoreError::Decode(format!("attribute {} is not RFC 3339: {}", name, e)))
}

pub(crate) fn from_item(item: &Item) -> RecordStoreResult<InsightRecord> {
    let key = get_s(item, "object_key")?.to_string();
    let ttl: i64 = get_n(item, "ttl")?;

    Ok(InsightRecord {
        id: get_s(item, "file_id")?.to_string(),
        bucket: get_s(item, "bucket_name")?.to_string(),
        // Items written before file_name existed carry the key only
        name: get_s(item, "file_name").map(str::to_string).unwrap_or_else(|_| key.clone()),
        key,
        size: get_n::<u64>(item, "file_size")?,
        file_type: get_s(item, "file_type")?.to_string(),
        content_type: get_s(item, "content_type")?.to_string(),
        last_modified: get_time(item, "last_modified")?,
        current_tier: get_s(item, "original_storage_class")?.to_string(),
        tier: get_s(item, "recommended_storage_class")?
            .parse()
            .map_err(|e| RecordStoreError::Decode(format!("{}", e)))?,
        reasoning: get_s(item, "reasoning")?.to_string(),
        confidence: get_s(item, "confidence")?
            .parse()
            .map_err(|e| RecordStoreError::Decode(format!("{}", e)))?,
        analyzed_at: get_time(item, "analyzed_at")?,
        expires_at: DateTime::<Utc>::from_timestamp(ttl, 0)
            .ok_or_else(|| RecordStoreError::Decode(format!("ttl out of range: {}", ttl)))?,
    })
}

#[async_trait]
impl RecordStore for DynamoRecordStore {
    fn target(&self) -> &str {
        &self.table
    }

    async fn upsert(&self, record: &InsightRecord) -> RecordStoreResult<()> {
        let start = std::time::Instant::now();

        self.client
            .put_item()
            .table_name(&self.table)
            .set_item(Some(to_item(record)))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %DisplayErrorContext(&e),
                    table = %self.table,
                    id = %record.id,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "DynamoDB put_item failed"
                );
                RecordStoreError::WriteFailed {
                    id: record.id.clone(),
                    message: DisplayErrorContext(&e).to_string(),
                }
            })?;

        tracing::debug!(
            table = %self.table,
            id = %record.id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "DynamoDB put_item successful"
        );

        Ok(())
    }

    async fn scan(&self) -> RecordStoreResult<Vec<InsightRecord>> {
        let mut records = Vec::new();
        let mut start_key: Option<Item> = None;

        loop {
            let output = self
                .client
                .scan()
                .table_name(&self.table)
                .set_exclusive_start_key(start_key.take())
                .send()
                .await
                .map_err(|e| RecordStoreError::ScanFailed(DisplayErrorContext(&e).to_string()))?;

            for item in output.items() {
                match from_item(item) {
                    Ok(record) => records.push(record),
                    Err(e) => tracing::warn!(
                        table = %self.table,
                        error = %e,
                        "Skipping item that is not an insight record"
                    ),
                }
            }

            match output.last_evaluated_key() {
                Some(key) if !key.is_empty() => start_key = Some(key.clone()),
                _ => break,
            }
        }

        Ok(records)
    }
}
