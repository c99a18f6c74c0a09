//! Mock record store for testing without DynamoDB

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use stowage_core::InsightRecord;
use stowage_db::{RecordStore, RecordStoreError, RecordStoreResult};

#[derive(Clone, Default)]
pub struct MockRecordStore {
    records: Arc<Mutex<BTreeMap<String, InsightRecord>>>,
    writes: Arc<Mutex<usize>>,
    fail_writes: Arc<Mutex<bool>>,
}

impl MockRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_writes(&self) {
        *self.fail_writes.lock().unwrap() = true;
    }

    pub fn writes(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    pub fn get(&self, id: &str) -> Option<InsightRecord> {
        self.records.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl RecordStore for MockRecordStore {
    fn target(&self) -> &str {
        "mock-insights"
    }

    async fn upsert(&self, record: &InsightRecord) -> RecordStoreResult<()> {
        *self.writes.lock().unwrap() += 1;
        if *self.fail_writes.lock().unwrap() {
            return Err(RecordStoreError::WriteFailed {
                id: record.id.clone(),
                message: "ProvisionedThroughputExceededException".to_string(),
            });
        }
        self.records
            .lock()
            .unwrap()
            .insert(record.id.clone(), record.clone());
        Ok(())
    }

    async fn scan(&self) -> RecordStoreResult<Vec<InsightRecord>> {
        Ok(self.records.lock().unwrap().values().cloned().collect())
    }
}
