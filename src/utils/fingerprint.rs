//! URL fingerprinting.
//!
//! A fingerprint is the lowercase hex MD5 digest of the URL bytes. It is the
//! raw material for short identifiers, not an integrity check, so MD5 is
//! sufficient.

/// Length of a fingerprint in hex characters (128-bit digest).
pub const FINGERPRINT_LEN: usize = 32;

/// Computes the fingerprint of a URL.
///
/// The same URL always yields the same 32-character digest.
///
/// # Examples
///
/// ```
/// use hashlink::utils::fingerprint::fingerprint;
///
/// assert_eq!(fingerprint("https://example.com"), "c984d06aafbecf6bc55569f964148ea3");
/// ```
pub fn fingerprint(url: &str) -> String {
    hex::encode(md5::compute(url.as_bytes()).0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_has_fixed_length() {
        assert_eq!(fingerprint("https://example.com").len(), FINGERPRINT_LEN);
        assert_eq!(fingerprint("").len(), FINGERPRINT_LEN);
        assert_eq!(
            fingerprint(&format!("https://example.com/{}", "a".repeat(4096))).len(),
            FINGERPRINT_LEN
        );
    }

    #[test]
    fn test_fingerprint_is_deterministic() {
        let url = "https://rust-lang.org/learn?x=1";
        assert_eq!(fingerprint(url), fingerprint(url));
    }

    #[test]
    fn test_fingerprint_known_values() {
        assert_eq!(fingerprint(""), "d41d8cd98f00b204e9800998ecf8427e");
        assert_eq!(
            fingerprint("https://example.com"),
            "c984d06aafbecf6bc55569f964148ea3"
        );
    }

    #[test]
    fn test_fingerprint_is_lowercase_hex() {
        let digest = fingerprint("https://EXAMPLE.com/Path");
        assert!(
            digest
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_different_urls_have_different_fingerprints() {
        assert_ne!(
            fingerprint("https://example.com/a"),
            fingerprint("https://example.com/b")
        );
    }
}
