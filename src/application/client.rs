use super::verifier::ItnVerifier;
use crate::config::PayFastConfig;
use crate::domain::amount::reconcile_amount;
use crate::domain::fields::{FieldMap, SIGNATURE_FIELD};
use crate::domain::notification::ItnNotification;
use crate::domain::payment::PaymentRequest;
use crate::domain::ports::ItnRequest;
use crate::domain::signature::sign;
use crate::error::{PayFastError, Result};
use crate::interfaces::html::payment_form::render_payment_form;
use rust_decimal::Decimal;
use serde::Serialize;
use std::net::IpAddr;
use tracing::debug;

/// A signed payment, ready to be posted to the gateway.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignedPayment {
    pub action_url: String,
    pub fields: FieldMap,
}

impl SignedPayment {
    pub fn signature(&self) -> Option<&str> {
        self.fields.get(SIGNATURE_FIELD).and_then(|v| v.as_str())
    }
}

/// Entry point for one merchant integration.
///
/// Holds only immutable configuration and can be shared freely between
/// request handlers.
#[derive(Debug, Clone)]
pub struct PayFastClient {
    config: PayFastConfig,
    verifier: ItnVerifier,
}

impl PayFastClient {
    pub fn new(config: PayFastConfig) -> Self {
        let verifier = ItnVerifier::from_config(&config);
        Self { config, verifier }
    }

    pub fn config(&self) -> &PayFastConfig {
        &self.config
    }

    /// Validates the request, attaches the merchant credentials and signs it.
    ///
    /// `merchant_id` and `merchant_key` always come from configuration.
    pub fn create_payment(&self, request: &PaymentRequest) -> Result<SignedPayment> {
        request.validate()?;

        let mut fields = request.to_fields();
        fields.insert("merchant_id", self.config.merchant_id());
        fields.insert("merchant_key", self.config.merchant_key());

        let signature = sign(&fields, self.config.passphrase());
        debug!(m_payment_id = ?request.m_payment_id, "signed payment request");
        fields.insert(SIGNATURE_FIELD, signature.into_inner());

        Ok(SignedPayment {
            action_url: self.config.process_url(),
            fields,
        })
    }

    /// HTML page that auto-submits the signed payment to the gateway.
    pub fn generate_payment_form(&self, request: &PaymentRequest) -> Result<String> {
        let payment = self.create_payment(request)?;
        Ok(render_payment_form(&payment.action_url, &payment.fields))
    }

    /// Reads an inbound ITN and verifies it.
    pub async fn verify_itn(&self, request: &dyn ItnRequest) -> Result<ItnNotification> {
        let fields = request.form().await?;
        self.verify_fields(&fields, request.client_addr())
    }

    /// Verifies ITN fields that have already been read from the transport.
    pub fn verify_fields(
        &self,
        fields: &FieldMap,
        source: Option<IpAddr>,
    ) -> Result<ItnNotification> {
        self.verifier.verify(fields, source)
    }

    /// True when the gross amount is within `tolerance` of `expected`.
    pub fn validate_payment_amount(
        &self,
        itn: &ItnNotification,
        expected: Decimal,
        tolerance: Decimal,
    ) -> bool {
        reconcile_amount(itn.amount_gross, expected, tolerance)
    }

    /// Like [`Self::validate_payment_amount`], for callers that want the
    /// mismatch as an error.
    pub fn ensure_payment_amount(
        &self,
        itn: &ItnNotification,
        expected: Decimal,
        tolerance: Decimal,
    ) -> Result<()> {
        if self.validate_payment_amount(itn, expected, tolerance) {
            Ok(())
        } else {
            Err(PayFastError::InvalidAmount {
                expected,
                received: itn.amount_gross,
            })
        }
    }

    pub fn is_payment_successful(&self, itn: &ItnNotification) -> bool {
        itn.is_successful()
    }
}
