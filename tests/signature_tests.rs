mod common;

use common::{ITN_SIGNATURE, ITN_SIGNATURE_NO_PASSPHRASE, PASSPHRASE, itn_fields};
use payfast::domain::fields::{FieldMap, FieldValue, SIGNATURE_FIELD};
use payfast::domain::signature::{SIGNATURE_LEN, canonicalize, sign};
use rand::seq::SliceRandom;

#[test]
fn test_known_vectors() {
    assert_eq!(sign(&itn_fields(), Some(PASSPHRASE)).as_str(), ITN_SIGNATURE);
    assert_eq!(sign(&itn_fields(), None).as_str(), ITN_SIGNATURE_NO_PASSPHRASE);
}

#[test]
fn test_special_characters_vector() {
    let fields: FieldMap = [
        ("merchant_id", "10000100"),
        ("merchant_key", "46f0cd694581a"),
        ("amount", "100.00"),
        ("item_name", "Test Product & Special Chars!"),
        ("item_description", "With spaces and @#$%~*"),
    ]
    .into_iter()
    .collect();

    assert_eq!(
        canonicalize(&fields, Some(PASSPHRASE)),
        "amount=100.00\
         &item_description=With+spaces+and+%40%23%24%25~%2A\
         &item_name=Test+Product+%26+Special+Chars%21\
         &merchant_id=10000100\
         &merchant_key=46f0cd694581a\
         &passphrase=jt7NOE43FZPn"
    );
    assert_eq!(
        sign(&fields, Some(PASSPHRASE)).as_str(),
        "7df75e4b90d14e057e191ffb337aad45"
    );
}

#[test]
fn test_insertion_order_does_not_matter() {
    let mut pairs = vec![
        ("merchant_id", "10000100"),
        ("pf_payment_id", "12345"),
        ("payment_status", "COMPLETE"),
        ("item_name", "Test Product"),
        ("amount_gross", "100.00"),
        ("amount_fee", "5.00"),
        ("amount_net", "95.00"),
    ];
    let mut rng = rand::thread_rng();
    for _ in 0..20 {
        pairs.shuffle(&mut rng);
        let fields: FieldMap = pairs.iter().copied().collect();
        assert_eq!(sign(&fields, Some(PASSPHRASE)).as_str(), ITN_SIGNATURE);
    }
}

#[test]
fn test_blank_fields_are_dropped() {
    let mut fields = itn_fields();
    fields.insert("name_first", "");
    fields.insert("custom_int1", FieldValue::Null);
    fields.insert("custom_str2", None::<String>);

    assert_eq!(sign(&fields, Some(PASSPHRASE)).as_str(), ITN_SIGNATURE);
}

#[test]
fn test_signature_field_is_excluded() {
    let mut fields = itn_fields();
    fields.insert(SIGNATURE_FIELD, "anything");
    assert_eq!(sign(&fields, Some(PASSPHRASE)).as_str(), ITN_SIGNATURE);
}

#[test]
fn test_empty_passphrase_is_no_passphrase() {
    assert_eq!(sign(&itn_fields(), Some("")).as_str(), ITN_SIGNATURE_NO_PASSPHRASE);
}

#[test]
fn test_signing_is_deterministic() {
    let first = sign(&itn_fields(), Some(PASSPHRASE));
    let second = sign(&itn_fields(), Some(PASSPHRASE));
    assert_eq!(first, second);
    assert_eq!(first.as_str().len(), SIGNATURE_LEN);
    assert!(
        first
            .as_str()
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c))
    );
}

#[test]
fn test_secret_sensitivity() {
    let with = sign(&itn_fields(), Some(PASSPHRASE));
    let other = sign(&itn_fields(), Some("jt7NOE43FZPo"));
    let without = sign(&itn_fields(), None);
    assert_ne!(with, other);
    assert_ne!(with, without);
}
