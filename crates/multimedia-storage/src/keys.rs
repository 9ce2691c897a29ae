//! Object key generation and validation.
//!
//! Generated keys have the form `{YYYYmmddHHMMSS}-{random u32}{.ext}` (UTC), so
//! keys sort by upload time and keep the original extension.

use crate::traits::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use std::path::Path;

/// Generate a destination key for an uploaded file, keeping its extension.
pub fn generate_object_key(original_filename: &str) -> String {
    generate_object_key_at(original_filename, Utc::now(), rand::random::<u32>())
}

pub(crate) fn generate_object_key_at(
    original_filename: &str,
    now: DateTime<Utc>,
    nonce: u32,
) -> String {
    format!(
        "{}-{}{}",
        now.format("%Y%m%d%H%M%S"),
        nonce,
        extension_with_dot(original_filename)
    )
}

/// The extension of `filename` including the leading dot, or an empty string.
pub fn extension_with_dot(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty())
        .map(|ext| format!(".{}", ext))
        .unwrap_or_default()
}

/// Keys must be non-empty and must not contain `..` or a leading `/`.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.trim().is_empty() {
        return Err(StorageError::InvalidKey(
            "Storage key must not be empty".to_string(),
        ));
    }
    if key.contains("..") || key.starts_with('/') {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_generated_key_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(
            generate_object_key_at("holiday.photo.JPG", now, 42),
            "20240309070501-42.JPG"
        );
        assert_eq!(generate_object_key_at("README", now, 7), "20240309070501-7");
    }

    #[test]
    fn test_generated_keys_are_valid() {
        let key = generate_object_key("song.mp3");
        assert!(key.ends_with(".mp3"));
        assert!(validate_key(&key).is_ok());
    }

    #[test]
    fn test_validate_key_rejects_traversal() {
        assert!(validate_key("").is_err());
        assert!(validate_key("../etc/passwd").is_err());
        assert!(validate_key("/absolute").is_err());
        assert!(validate_key("nested/ok.png").is_ok());
    }
}
