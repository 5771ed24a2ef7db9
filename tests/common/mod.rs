#![allow(dead_code)]

use payfast::domain::fields::{FieldMap, SIGNATURE_FIELD};
use payfast::domain::signature::sign;
use payfast::{PayFastClient, PayFastConfig};

pub const MERCHANT_ID: &str = "10000100";
pub const MERCHANT_KEY: &str = "46f0cd694581a";
pub const PASSPHRASE: &str = "jt7NOE43FZPn";

/// Signature of [`itn_fields`] with [`PASSPHRASE`].
pub const ITN_SIGNATURE: &str = "76e1af7216c28c932a47fbc209f6fc61";
/// Signature of [`itn_fields`] without a passphrase.
pub const ITN_SIGNATURE_NO_PASSPHRASE: &str = "949fdd4ff8c0b9b19a1151749e5c932f";

pub fn config() -> PayFastConfig {
    PayFastConfig::builder(MERCHANT_ID, MERCHANT_KEY)
        .passphrase(PASSPHRASE)
        .sandbox(true)
        .build()
        .unwrap()
}

pub fn client() -> PayFastClient {
    PayFastClient::new(config())
}

/// A completed R100.00 payment, unsigned.
pub fn itn_fields() -> FieldMap {
    [
        ("merchant_id", MERCHANT_ID),
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

pub fn signed(mut fields: FieldMap, passphrase: Option<&str>) -> FieldMap {
    let signature = sign(&fields, passphrase);
    fields.insert(SIGNATURE_FIELD, signature.into_inner());
    fields
}

pub fn signed_itn() -> FieldMap {
    signed(itn_fields(), Some(PASSPHRASE))
}

/// Form-encodes a field set the way the gateway posts it.
pub fn form_body(fields: &FieldMap) -> String {
    let pairs: Vec<(String, String)> = fields
        .iter()
        .map(|(k, v)| (k.clone(), v.to_string()))
        .collect();
    serde_urlencoded::to_string(pairs).unwrap()
}
