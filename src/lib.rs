pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod interfaces;

pub use application::client::{PayFastClient, SignedPayment};
pub use application::verifier::ItnVerifier;
pub use config::{Environment, PayFastConfig};
pub use domain::fields::{FieldMap, FieldValue};
pub use domain::notification::{ItnNotification, PaymentStatus};
pub use domain::payment::PaymentRequest;
pub use error::{PayFastError, Result};
