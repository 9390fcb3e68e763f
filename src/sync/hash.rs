//! Content hashing for in-batch deduplication.
//!
//! Readwise treats a highlight as the same highlight when its text and source
//! match. We hash the same pair locally so a batch never carries two copies of
//! one highlight.

use sha2::{Digest, Sha256};

/// SHA256 fingerprint of a highlight's `(text, source_url)` pair.
///
/// The two parts are separated by a NUL byte so that moving characters
/// between text and URL changes the hash.
#[must_use]
pub fn dedup_key(text: &str, source_url: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hasher.update([0u8]);
    if let Some(url) = source_url {
        hasher.update(url.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_key_deterministic() {
        let first = dedup_key("Design is a series of choices", Some("http://x/1"));
        let second = dedup_key("Design is a series of choices", Some("http://x/1"));

        assert_eq!(first, second);
        assert_eq!(first.len(), 64); // SHA256 produces 64 hex chars
    }

    #[test]
    fn test_dedup_key_changes_with_source() {
        let a = dedup_key("same text", Some("http://x/1"));
        let b = dedup_key("same text", Some("http://x/2"));
        let c = dedup_key("same text", None);

        assert_ne!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_dedup_key_separates_fields() {
        assert_ne!(dedup_key("ab", Some("c")), dedup_key("a", Some("bc")));
    }
}
