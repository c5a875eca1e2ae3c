// Redis key formatting and hashing utilities

use sha2::{Digest, Sha256};

/// Keys longer than this are replaced by their hash
pub const MAX_KEY_LENGTH: usize = 250;

/// Formats a Redis key inside the backend namespace
///
/// # Format
/// - Short keys: "{prefix}{key}"
/// - Long keys: "{prefix}hash:{sha256}"
pub fn format_key(prefix: &str, key: &str) -> String {
    let full_key = format!("{}{}", prefix, key);

    if full_key.len() > MAX_KEY_LENGTH {
        hash_long_key(prefix, key)
    } else {
        full_key
    }
}

fn hash_long_key(prefix: &str, key: &str) -> String {
    let hash = Sha256::digest(key.as_bytes());
    format!("{}hash:{}", prefix, hex::encode(hash))
}

/// SCAN pattern matching every key of the namespace
///
/// Glob metacharacters inside the prefix are escaped so a prefix such as
/// `app[1]:` only matches itself.
pub fn namespace_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '*' | '?' | '[' | ']' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('*');
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_format_prefix_key() {
        assert_eq!(format_key("trellis:view:", "home:index:ab12"), "trellis:view:home:index:ab12");
    }

    #[test]
    fn test_empty_prefix_keeps_key() {
        assert_eq!(format_key("", "k"), "k");
    }

    #[test]
    fn test_long_keys_are_hashed() {
        let long = "a".repeat(300);
        let key = format_key("p:", &long);
        let hash_part = key.strip_prefix("p:hash:").unwrap();
        assert_eq!(hash_part.len(), 64);
        assert!(hash_part.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_long_key_collision_avoidance() {
        let key1 = format_key("p:", &format!("{}1", "a".repeat(300)));
        let key2 = format_key("p:", &format!("{}2", "a".repeat(300)));
        assert_ne!(key1, key2);
    }

    #[test]
    fn test_namespace_pattern_escapes_glob_chars() {
        assert_eq!(namespace_pattern("trellis:view:"), "trellis:view:*");
        assert_eq!(namespace_pattern("app[1]*?:"), "app\\[1\\]\\*\\?:*");
        assert_eq!(namespace_pattern(""), "*");
    }
}
