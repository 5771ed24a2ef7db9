use crate::config::{Passphrase, PayFastConfig};
use crate::domain::fields::{FieldMap, SIGNATURE_FIELD};
use crate::domain::notification::ItnNotification;
use crate::domain::signature::sign;
use crate::error::{PayFastError, Result};
use std::net::IpAddr;
use tracing::{debug, warn};

/// Validates inbound ITNs against one merchant account.
///
/// Each call is an independent, fail-fast check sequence:
/// signature present, signature matches, merchant matches, then the fields
/// are parsed into an [`ItnNotification`]. The source address allow-list is
/// advisory: a miss is logged and the notification is still accepted.
#[derive(Debug, Clone)]
pub struct ItnVerifier {
    merchant_id: String,
    passphrase: Option<Passphrase>,
    allow_list: Option<Vec<IpAddr>>,
}

impl ItnVerifier {
    pub fn new(merchant_id: impl Into<String>, passphrase: Option<String>) -> Self {
        Self {
            merchant_id: merchant_id.into(),
            passphrase: passphrase.and_then(Passphrase::new),
            allow_list: None,
        }
    }

    pub fn with_allow_list(mut self, ips: impl IntoIterator<Item = IpAddr>) -> Self {
        self.allow_list = Some(ips.into_iter().collect());
        self
    }

    pub fn from_config(config: &PayFastConfig) -> Self {
        let verifier = Self::new(
            config.merchant_id(),
            config.passphrase().map(str::to_string),
        );
        if config.validate_ip() {
            verifier.with_allow_list(config.valid_ips().iter().copied())
        } else {
            verifier
        }
    }

    pub fn verify(&self, fields: &FieldMap, source: Option<IpAddr>) -> Result<ItnNotification> {
        let received = fields
            .get_param(SIGNATURE_FIELD)
            .ok_or(PayFastError::MissingSignature)?;

        let passphrase = self.passphrase.as_ref().map(Passphrase::expose);
        let expected = sign(fields, passphrase);
        if !expected.matches(&received) {
            warn!(pf_payment_id = ?fields.get_param("pf_payment_id"), "ITN signature mismatch");
            return Err(PayFastError::SignatureMismatch);
        }

        let asserted = fields.get_param("merchant_id");
        if asserted.as_deref() != Some(self.merchant_id.as_str()) {
            warn!(merchant_id = ?asserted, "ITN for unexpected merchant");
            return Err(PayFastError::InvalidMerchant {
                expected: self.merchant_id.clone(),
            });
        }

        self.check_source(source);

        let notification = ItnNotification::from_fields(fields)?;
        debug!(
            pf_payment_id = %notification.pf_payment_id,
            status = %notification.payment_status,
            "ITN verified"
        );
        Ok(notification)
    }

    fn check_source(&self, source: Option<IpAddr>) {
        let Some(allow_list) = &self.allow_list else {
            return;
        };
        match source {
            Some(addr) if allow_list.contains(&addr) => {}
            Some(addr) => warn!(%addr, "ITN from address outside the allow-list"),
            None => warn!("ITN source address unknown, allow-list not checked"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PASSPHRASE: &str = "jt7NOE43FZPn";

    fn verifier() -> ItnVerifier {
        ItnVerifier::new("10000100", Some(PASSPHRASE.to_string()))
    }

    fn signed_fields() -> FieldMap {
        let mut fields: FieldMap = [
            ("merchant_id", "10000100"),
            ("pf_payment_id", "12345"),
            ("payment_status", "COMPLETE"),
            ("item_name", "Test Product"),
            ("amount_gross", "100.00"),
            ("amount_fee", "5.00"),
            ("amount_net", "95.00"),
        ]
        .into_iter()
        .collect();
        let signature = sign(&fields, Some(PASSPHRASE));
        fields.insert(SIGNATURE_FIELD, signature.into_inner());
        fields
    }

    #[test]
    fn test_verify_success() {
        let itn = verifier().verify(&signed_fields(), None).unwrap();
        assert_eq!(itn.pf_payment_id, "12345");
        assert!(itn.is_successful());
    }

    #[test]
    fn test_missing_signature() {
        let mut fields = signed_fields();
        fields.remove(SIGNATURE_FIELD);
        assert!(matches!(
            verifier().verify(&fields, None),
            Err(PayFastError::MissingSignature)
        ));
    }

    #[test]
    fn test_empty_signature_is_missing() {
        let mut fields = signed_fields();
        fields.insert(SIGNATURE_FIELD, "");
        assert!(matches!(
            verifier().verify(&fields, None),
            Err(PayFastError::MissingSignature)
        ));
    }

    #[test]
    fn test_wrong_passphrase() {
        let verifier = ItnVerifier::new("10000100", Some("other".to_string()));
        assert!(matches!(
            verifier.verify(&signed_fields(), None),
            Err(PayFastError::SignatureMismatch)
        ));
    }

    #[test]
    fn test_signature_field_is_not_signed() {
        let fields = signed_fields();
        let token = fields.get_param(SIGNATURE_FIELD).unwrap();
        assert!(sign(&fields, Some(PASSPHRASE)).matches(&token));
    }

    #[test]
    fn test_allow_list_is_advisory() {
        let verifier = verifier().with_allow_list(["197.97.145.144".parse().unwrap()]);
        let outsider: IpAddr = "10.0.0.1".parse().unwrap();
        assert!(verifier.verify(&signed_fields(), Some(outsider)).is_ok());
        assert!(verifier.verify(&signed_fields(), None).is_ok());
    }

    #[test]
    fn test_debug_hides_passphrase() {
        assert!(!format!("{:?}", verifier()).contains(PASSPHRASE));
    }

    #[test]
    fn test_from_config_without_ip_validation() {
        let config = PayFastConfig::builder("10000100", "46f0cd694581a")
            .passphrase(PASSPHRASE)
            .validate_ip(false)
            .build()
            .unwrap();
        let verifier = ItnVerifier::from_config(&config);
        assert!(verifier.allow_list.is_none());
        assert!(verifier.verify(&signed_fields(), None).is_ok());
    }
}
