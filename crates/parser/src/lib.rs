pub mod html;
pub mod robots;
pub mod sitemap;

pub use html::parse_html;
pub use robots::RobotsRules;
pub use sitemap::parse_sitemap;

use md5::{Digest, Md5};

/// Lowercase hex digest of a response body, used for duplicate-content
/// detection. Not a security-sensitive hash; only needs to be stable.
pub fn content_hash(body: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(body);
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_hash_is_deterministic_and_md5_sized() {
        let h1 = content_hash(b"hello world");
        let h2 = content_hash(b"hello world");
        assert_eq!(h1, h2);
        assert_eq!(h1.len(), 32);
    }

    #[test]
    fn content_hash_differs_for_different_bodies() {
        assert_ne!(content_hash(b"a"), content_hash(b"b"));
    }
}
