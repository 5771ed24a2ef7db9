//! Canonical parameter strings and MD5 signature tokens.
//!
//! The gateway signs `key=value` pairs sorted by key, form-encoded and joined
//! with `&`, optionally followed by `&passphrase=...`, and hashes the result
//! with MD5. MD5 is fixed by the gateway's protocol; on its own it would be
//! a weak MAC. Tokens are therefore only trusted together with the merchant
//! identity check and the shared passphrase.

use super::fields::FieldMap;
use md5::{Digest, Md5};
use serde::Serialize;
use std::fmt;
use subtle::ConstantTimeEq;

/// Name of the synthetic field carrying the shared secret.
pub const PASSPHRASE_FIELD: &str = "passphrase";

/// Length of a rendered signature token.
pub const SIGNATURE_LEN: usize = 32;

/// Form-encodes a single component: unreserved bytes are kept, spaces become
/// `+`, everything else is `%XX` with uppercase hex.
pub fn encode_component(value: &str) -> String {
    // A literal '%' in the input is itself encoded, so every "%20" in the
    // output stands for a space.
    urlencoding::encode(value).replace("%20", "+")
}

/// Builds the canonical string hashed by [`sign`].
pub fn canonicalize(fields: &FieldMap, passphrase: Option<&str>) -> String {
    let mut canonical = fields
        .signable()
        .map(|(key, value)| format!("{key}={}", encode_component(&value)))
        .collect::<Vec<_>>()
        .join("&");

    if let Some(secret) = passphrase.filter(|s| !s.is_empty()) {
        canonical.push('&');
        canonical.push_str(PASSPHRASE_FIELD);
        canonical.push('=');
        canonical.push_str(&encode_component(secret));
    }

    canonical
}

/// Signs a field set with the optional shared passphrase.
pub fn sign(fields: &FieldMap, passphrase: Option<&str>) -> Signature {
    let canonical = canonicalize(fields, passphrase);
    let digest = Md5::digest(canonical.as_bytes());
    Signature(hex::encode(digest))
}

/// A lowercase hex MD5 signature token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Signature(String);

impl Signature {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }

    /// Compares against a token received from the wire in constant time.
    pub fn matches(&self, received: &str) -> bool {
        let expected = self.0.as_bytes();
        let received = received.as_bytes();
        expected.len() == received.len() && bool::from(expected.ct_eq(received))
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Signature {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::fields::FieldValue;

    fn itn_fields() -> FieldMap {
        [
            ("merchant_id", "10000100"),
            ("pf_payment_id", "12345"),
            ("payment_status", "COMPLETE"),
            ("item_name", "Test Product"),
            ("amount_gross", "100.00"),
            ("amount_fee", "5.00"),
            ("amount_net", "95.00"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_encode_component() {
        assert_eq!(encode_component("Test Product"), "Test+Product");
        assert_eq!(encode_component("a&b=c"), "a%26b%3Dc");
        assert_eq!(encode_component("~-_.*"), "~-_.%2A");
        assert_eq!(encode_component("100%"), "100%25");
        assert_eq!(encode_component("é"), "%C3%A9");
        assert_eq!(
            encode_component("https://example.com/notify"),
            "https%3A%2F%2Fexample.com%2Fnotify"
        );
    }

    #[test]
    fn test_canonical_string() {
        assert_eq!(
            canonicalize(&itn_fields(), Some("jt7NOE43FZPn")),
            "amount_fee=5.00&amount_gross=100.00&amount_net=95.00&item_name=Test+Product\
             &merchant_id=10000100&payment_status=COMPLETE&pf_payment_id=12345\
             &passphrase=jt7NOE43FZPn"
        );
    }

    #[test]
    fn test_empty_passphrase_is_ignored() {
        let fields = itn_fields();
        assert_eq!(canonicalize(&fields, Some("")), canonicalize(&fields, None));
    }

    #[test]
    fn test_passphrase_without_fields() {
        assert_eq!(canonicalize(&FieldMap::new(), Some("s")), "&passphrase=s");
        assert_eq!(canonicalize(&FieldMap::new(), None), "");
    }

    #[test]
    fn test_passphrase_is_encoded() {
        let fields: FieldMap = [("a", "x y")].into_iter().collect();
        assert_eq!(canonicalize(&fields, Some("my pass")), "a=x+y&passphrase=my+pass");
        assert_eq!(
            sign(&fields, Some("my pass")).as_str(),
            "b212369576dfb17bcd31044e1c5df5d9"
        );
    }

    #[test]
    fn test_known_signatures() {
        let fields = itn_fields();
        assert_eq!(
            sign(&fields, Some("jt7NOE43FZPn")).as_str(),
            "76e1af7216c28c932a47fbc209f6fc61"
        );
        assert_eq!(
            sign(&fields, None).as_str(),
            "949fdd4ff8c0b9b19a1151749e5c932f"
        );
    }

    #[test]
    fn test_typed_values_sign_like_their_strings() {
        let mut typed = FieldMap::new();
        typed.insert("amount", FieldValue::Decimal("100.00".parse().unwrap()));
        typed.insert("custom_int1", 42i64);
        typed.insert("email_confirmation", true);

        let mut plain = FieldMap::new();
        plain.insert("amount", "100.00");
        plain.insert("custom_int1", "42");
        plain.insert("email_confirmation", "1");

        assert_eq!(sign(&typed, None), sign(&plain, None));
    }

    #[test]
    fn test_signature_shape() {
        let signature = sign(&itn_fields(), Some("secret"));
        assert_eq!(signature.as_str().len(), SIGNATURE_LEN);
        assert!(
            signature
                .as_str()
                .chars()
                .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
        );
    }

    #[test]
    fn test_matches() {
        let signature = sign(&itn_fields(), None);
        assert!(signature.matches("949fdd4ff8c0b9b19a1151749e5c932f"));
        assert!(!signature.matches("949FDD4FF8C0B9B19A1151749E5C932F"));
        assert!(!signature.matches("949fdd4ff8c0b9b19a1151749e5c932"));
        assert!(!signature.matches(""));
    }
}
