//! Shared helpers for the operator CLI

use std::collections::HashMap;
use stowage_core::InsightRecord;

/// An object uploaded by `stowage upload` to exercise the pipeline
#[derive(Debug, Clone)]
pub struct SampleFile {
    pub key: &'static str,
    pub content_type: &'static str,
    pub description: &'static str,
    pub body: Vec<u8>,
}

impl SampleFile {
    /// User metadata attached on upload
    pub fn metadata(&self) -> HashMap<String, String> {
        HashMap::from([
            ("description".to_string(), self.description.to_string()),
            ("test-file".to_string(), "true".to_string()),
        ])
    }
}

/// One document, one backup, one log and one image, each with a distinct profile
pub fn sample_files() -> Vec<SampleFile> {
    vec![
        SampleFile {
            key: "documento.pdf",
            content_type: "application/pdf",
            description: "PDF document",
            body: b"%PDF-1.4 sample document for archiving".to_vec(),
        },
        SampleFile {
            key: "backup.zip",
            content_type: "application/zip",
            description: "Backup archive",
            body: b"PK\x03\x04 compressed backup archive".to_vec(),
        },
        SampleFile {
            key: "log_aplicacao.txt",
            content_type: "text/plain",
            description: "Application log",
            body: b"2024-01-01 10:00:00 INFO Application started\n".repeat(100),
        },
        SampleFile {
            key: "imagem.jpg",
            content_type: "image/jpeg",
            description: "JPEG image",
            body: b"\xff\xd8\xff\xe0 JFIF sample image".to_vec(),
        },
    ]
}

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Human-readable block for one insight record
pub fn format_insight(record: &InsightRecord, reasoning_width: usize) -> String {
    format!(
        "{}\n  size:        {} bytes\n  original:    {}\n  recommended: {}\n  confidence:  {}\n  reasoning:   {}\n  analyzed at: {}",
        record.id,
        record.size,
        record.current_tier,
        record.tier,
        record.confidence,
        truncate_string(&record.reasoning, reasoning_width),
        record.analyzed_at.to_rfc3339(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_exact() {
        assert_eq!(truncate_string("hello", 5), "hello");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("ab", 2), "ab");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_counts_characters() {
        assert_eq!(truncate_string("acesso infrequente é esperado", 10), "acesso ...");
        assert_eq!(truncate_string("ééééé", 4), "é...");
    }

    #[test]
    fn sample_files_cover_distinct_types() {
        let files = sample_files();
        let keys: Vec<&str> = files.iter().map(|f| f.key).collect();
        assert_eq!(keys, vec!["documento.pdf", "backup.zip", "log_aplicacao.txt", "imagem.jpg"]);

        let log = &files[2];
        assert_eq!(log.body.iter().filter(|b| **b == b'\n').count(), 100);

        let metadata = files[0].metadata();
        assert_eq!(metadata["test-file"], "true");
        assert_eq!(metadata["description"], "PDF document");
    }
}
