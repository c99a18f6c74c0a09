//! Object key handling shared by the dispatcher and the S3 client.
//!
//! Notification keys arrive form-urlencoded (`+` for spaces, `%XX` escapes),
//! while `CopyObject` expects the copy source key percent-encoded.

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use thiserror::Error;

use crate::constants::UNKNOWN_FILE_TYPE;

/// Characters left as-is in a copy source: unreserved characters and `/`.
const COPY_SOURCE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Debug, Error)]
#[error("Object key is not valid UTF-8 after decoding: {raw}")]
pub struct KeyDecodeError {
    pub raw: String,
}

/// Reverse the escaping applied to object keys in S3 event notifications.
pub fn decode_event_key(raw: &str) -> Result<String, KeyDecodeError> {
    let spaced = raw.replace('+', " ");
    percent_decode_str(&spaced)
        .decode_utf8()
        .map(|decoded| decoded.into_owned())
        .map_err(|_| KeyDecodeError {
            raw: raw.to_string(),
        })
}

/// Build the `x-amz-copy-source` value for an object in `bucket`.
pub fn encode_copy_source(bucket: &str, key: &str) -> String {
    format!("{}/{}", bucket, utf8_percent_encode(key, COPY_SOURCE))
}

/// Lower-cased substring after the last `.` of the key, or `unknown`.
pub fn file_type_from_key(key: &str) -> String {
    match key.rsplit_once('.') {
        Some((_, extension)) => extension.to_lowercase(),
        None => UNKNOWN_FILE_TYPE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_plain_key_is_unchanged() {
        assert_eq!(decode_event_key("documento.pdf").unwrap(), "documento.pdf");
    }

    #[test]
    fn decode_plus_as_space() {
        assert_eq!(
            decode_event_key("my+annual+report.pdf").unwrap(),
            "my annual report.pdf"
        );
    }

    #[test]
    fn decode_percent_escapes() {
        assert_eq!(
            decode_event_key("logs/2024%2F01/app%2Blog.txt").unwrap(),
            "logs/2024/01/app+log.txt"
        );
        assert_eq!(
            decode_event_key("fotos/f%C3%A9rias.jpg").unwrap(),
            "fotos/férias.jpg"
        );
    }

    #[test]
    fn decode_rejects_invalid_utf8() {
        let err = decode_event_key("bad%FF.bin").unwrap_err();
        assert_eq!(err.raw, "bad%FF.bin");
    }

    #[test]
    fn copy_source_keeps_slashes_and_escapes_spaces() {
        assert_eq!(
            encode_copy_source("bucket", "dir/my report (1).pdf"),
            "bucket/dir/my%20report%20%281%29.pdf"
        );
        assert_eq!(
            encode_copy_source("bucket", "a-b_c.d~e"),
            "bucket/a-b_c.d~e"
        );
    }

    #[test]
    fn file_type_is_lowercased_suffix() {
        assert_eq!(file_type_from_key("documento.PDF"), "pdf");
        assert_eq!(file_type_from_key("backup.tar.GZ"), "gz");
        assert_eq!(file_type_from_key("logs/app.2024/out"), "2024/out");
    }

    #[test]
    fn file_type_without_dot_is_unknown() {
        assert_eq!(file_type_from_key("README"), "unknown");
        assert_eq!(file_type_from_key("logs/app/stdout"), "unknown");
    }

    #[test]
    fn file_type_with_trailing_dot_is_empty() {
        assert_eq!(file_type_from_key("archive."), "");
    }
}
