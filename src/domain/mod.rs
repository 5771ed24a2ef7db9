//! Domain layer: field sets, the signing protocol and the typed payment
//! and notification records.

pub mod amount;
pub mod fields;
pub mod notification;
pub mod payment;
pub mod ports;
pub mod signature;
