//! Cache key generation using SHA-256 hashes

use sha2::{Digest, Sha256};

/// Generate a deterministic cache key for one operation and its input.
///
/// The input is hashed verbatim: "Aspirin" and "aspirin " are different keys.
/// The operation name and input are length-prefixed so no pair of
/// (operation, input) can produce the same byte stream as another.
pub fn cache_key(operation: &str, input: &str) -> String {
    let mut hasher = Sha256::new();

    hasher.update((operation.len() as u64).to_be_bytes());
    hasher.update(operation.as_bytes());
    hasher.update(b"|");
    hasher.update(input.as_bytes());

    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_key_deterministic() {
        assert_eq!(cache_key("search", "aspirin"), cache_key("search", "aspirin"));
    }

    #[test]
    fn test_cache_key_different_operations() {
        assert_ne!(cache_key("history", "123"), cache_key("validate", "123"));
    }

    #[test]
    fn test_cache_key_is_not_normalized() {
        assert_ne!(cache_key("search", "Aspirin"), cache_key("search", "aspirin"));
        assert_ne!(cache_key("search", "aspirin"), cache_key("search", "aspirin "));
    }

    #[test]
    fn test_cache_key_no_boundary_collision() {
        assert_ne!(cache_key("ab", "|c"), cache_key("ab|", "c"));
    }

    #[test]
    fn test_cache_key_is_hex_sha256() {
        let key = cache_key("search", "");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
