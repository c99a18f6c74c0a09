//! Mock object store for testing without S3

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use stowage_core::StorageTier;
use stowage_storage::{ObjectAccessError, ObjectHead, ObjectStore, ObjectTag, StorageResult};

/// One recorded `copy_in_place` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCall {
    pub bucket: String,
    pub key: String,
    pub tier: StorageTier,
    pub metadata: HashMap<String, String>,
}

/// One recorded `replace_tags` call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagCall {
    pub bucket: String,
    pub key: String,
    pub tags: Vec<ObjectTag>,
}

#[derive(Debug, Clone)]
struct StoredObject {
    head: ObjectHead,
    metadata: HashMap<String, String>,
    tags: Vec<ObjectTag>,
}

/// In-memory object store keyed by `(bucket, key)`
///
/// Records every write so tests can count calls and inspect arguments.
/// Individual operations can be made to fail per object.
#[derive(Clone, Default)]
#[allow(clippy::type_complexity)]
pub struct MockObjectStore {
    objects: Arc<Mutex<HashMap<(String, String), StoredObject>>>,
    denied_heads: Arc<Mutex<HashSet<(String, String)>>>,
    failing_copies: Arc<Mutex<HashSet<(String, String)>>>,
    failing_tags: Arc<Mutex<HashSet<(String, String)>>>,
    head_calls: Arc<Mutex<usize>>,
    copies: Arc<Mutex<Vec<CopyCall>>>,
    tag_calls: Arc<Mutex<Vec<TagCall>>>,
}

fn id(bucket: &str, key: &str) -> (String, String) {
    (bucket.to_string(), key.to_string())
}

impl MockObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_object(&self, bucket: &str, key: &str, size: u64, content_type: Option<&str>) {
        let object = StoredObject {
            head: ObjectHead {
                size,
                content_type: content_type.map(str::to_string),
                storage_class: None,
                last_modified: DateTime::<Utc>::from_timestamp(1_704_103_200, 0),
            },
            metadata: HashMap::new(),
            tags: Vec::new(),
        };
        self.objects.lock().unwrap().insert(id(bucket, key), object);
    }

    pub fn set_storage_class(&self, bucket: &str, key: &str, class: &str) {
        if let Some(object) = self.objects.lock().unwrap().get_mut(&id(bucket, key)) {
            object.head.storage_class = Some(class.to_string());
        }
    }

    /// Overwrite the object's size, as a concurrent upload would.
    pub fn set_size(&self, bucket: &str, key: &str, size: u64) {
        if let Some(object) = self.objects.lock().unwrap().get_mut(&id(bucket, key)) {
            object.head.size = size;
        }
    }

    pub fn deny_head(&self, bucket: &str, key: &str) {
        self.denied_heads.lock().unwrap().insert(id(bucket, key));
    }

    pub fn fail_copy(&self, bucket: &str, key: &str) {
        self.failing_copies.lock().unwrap().insert(id(bucket, key));
    }

    pub fn fail_tagging(&self, bucket: &str, key: &str) {
        self.failing_tags.lock().unwrap().insert(id(bucket, key));
    }

    pub fn head_calls(&self) -> usize {
        *self.head_calls.lock().unwrap()
    }

    pub fn copies(&self) -> Vec<CopyCall> {
        self.copies.lock().unwrap().clone()
    }

    pub fn tag_calls(&self) -> Vec<TagCall> {
        self.tag_calls.lock().unwrap().clone()
    }

    pub fn storage_class(&self, bucket: &str, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(&id(bucket, key))
            .and_then(|o| o.head.storage_class.clone())
    }

    pub fn user_metadata(&self, bucket: &str, key: &str) -> Option<HashMap<String, String>> {
        self.objects
            .lock()
            .unwrap()
            .get(&id(bucket, key))
            .map(|o| o.metadata.clone())
    }

    pub fn tags(&self, bucket: &str, key: &str) -> Option<Vec<ObjectTag>> {
        self.objects
            .lock()
            .unwrap()
            .get(&id(bucket, key))
            .map(|o| o.tags.clone())
    }

    fn not_found(bucket: &str, key: &str) -> ObjectAccessError {
        ObjectAccessError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    async fn head_metadata(&self, bucket: &str, key: &str) -> StorageResult<ObjectHead> {
        *self.head_calls.lock().unwrap() += 1;

        if self.denied_heads.lock().unwrap().contains(&id(bucket, key)) {
            return Err(ObjectAccessError::PermissionDenied {
                bucket: bucket.to_string(),
                key: key.to_string(),
                message: "AccessDenied".to_string(),
            });
        }

        self.objects
            .lock()
            .unwrap()
            .get(&id(bucket, key))
            .map(|o| o.head.clone())
            .ok_or_else(|| Self::not_found(bucket, key))
    }

    async fn copy_in_place(
        &self,
        bucket: &str,
        key: &str,
        tier: StorageTier,
        metadata: HashMap<String, String>,
    ) -> StorageResult<()> {
        self.copies.lock().unwrap().push(CopyCall {
            bucket: bucket.to_string(),
            key: key.to_string(),
            tier,
            metadata: metadata.clone(),
        });

        if self.failing_copies.lock().unwrap().contains(&id(bucket, key)) {
            return Err(ObjectAccessError::CopyFailed(format!(
                "InvalidStorageClass for {}/{}",
                bucket, key
            )));
        }

        let mut objects = self.objects.lock().unwrap();
        let object = objects
            .get_mut(&id(bucket, key))
            .ok_or_else(|| Self::not_found(bucket, key))?;
        object.head.storage_class = Some(tier.as_str().to_string());
        object.metadata = metadata;
        Ok(())
    }

    async fn replace_tags(
        &self,
        bucket: &str,
        key: &str,
        tags: Vec<ObjectTag>,
    ) -> StorageResult<()> {
        self.tag_calls.lock().unwrap().push(TagCall {
            bucket: bucket.to_string(),
            key: key.to_string(),
            tags: tags.clone(),
        });

        if self.failing_tags.lock().unwrap().contains(&id(bucket, key)) {
            return Err(ObjectAccessError::TaggingFailed(format!(
                "InvalidTag for {}/{}",
                bucket, key
            )));
        }

        let mut objects = self.objects.lock().unwrap();
        let object = objects
            .get_mut(&id(bucket, key))
            .ok_or_else(|| Self::not_found(bucket, key))?;
        object.tags = tags;
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
        self.add_object(bucket, key, body.len() as u64, content_type);
        if let Some(object) = self.objects.lock().unwrap().get_mut(&id(bucket, key)) {
            object.metadata = metadata;
        }
        Ok(())
    }
}
