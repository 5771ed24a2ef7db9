use miette::Diagnostic;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;

/// Errors raised while building payment requests or validating ITNs.
///
/// Every validation variant is local to a single attempt: a forged or
/// malformed message fails the same way on every retry.
#[derive(Error, Diagnostic, Debug)]
pub enum PayFastError {
    #[error("Missing signature")]
    #[diagnostic(code(payfast::itn::missing_signature))]
    MissingSignature,

    #[error("Signature mismatch")]
    #[diagnostic(
        code(payfast::itn::signature_mismatch),
        help("check that the passphrase matches the one configured on the merchant account")
    )]
    SignatureMismatch,

    #[error("Merchant ID mismatch: expected {expected}")]
    #[diagnostic(code(payfast::itn::invalid_merchant))]
    InvalidMerchant { expected: String },

    #[error("Invalid ITN data: {0}")]
    #[diagnostic(code(payfast::itn::malformed))]
    MalformedNotification(String),

    #[error("Amount mismatch: expected {expected}, received {received}")]
    #[diagnostic(code(payfast::itn::invalid_amount))]
    InvalidAmount { expected: Decimal, received: Decimal },

    #[error("Validation error: {0}")]
    #[diagnostic(code(payfast::payment::validation))]
    Validation(String),

    #[error("Configuration error: {0}")]
    #[diagnostic(code(payfast::config))]
    Config(String),

    #[error("Form decode error: {0}")]
    #[diagnostic(code(payfast::itn::form_decode))]
    FormDecode(#[from] serde_urlencoded::de::Error),

    #[error("IO error: {0}")]
    #[diagnostic(code(payfast::io))]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, PayFastError>;

/// Transport-level rendering of a [`PayFastError`], for the web layer to
/// turn into its own response type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HttpRejection {
    pub status: u16,
    pub detail: String,
}

impl PayFastError {
    /// HTTP status the calling web layer should answer with.
    pub fn status_code(&self) -> u16 {
        match self {
            PayFastError::Io(_) => 500,
            _ => 400,
        }
    }

    pub fn to_http_rejection(&self) -> HttpRejection {
        HttpRejection {
            status: self.status_code(),
            detail: self.to_string(),
        }
    }

    /// Only I/O failures while reading the inbound body can succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, PayFastError::Io(_))
    }

    /// Short machine-readable tag, stable across message wording changes.
    pub fn reason(&self) -> &'static str {
        match self {
            PayFastError::MissingSignature => "missing_signature",
            PayFastError::SignatureMismatch => "signature_mismatch",
            PayFastError::InvalidMerchant { .. } => "invalid_merchant",
            PayFastError::MalformedNotification(_) => "malformed_notification",
            PayFastError::InvalidAmount { .. } => "invalid_amount",
            PayFastError::Validation(_) => "validation",
            PayFastError::Config(_) => "config",
            PayFastError::FormDecode(_) => "form_decode",
            PayFastError::Io(_) => "io",
        }
    }
}
