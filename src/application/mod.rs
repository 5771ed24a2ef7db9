//! Application layer: the merchant-facing client and the ITN verifier.
//!
//! Everything here is stateless apart from immutable configuration, so a
//! single `PayFastClient` can serve concurrent request handlers.

pub mod client;
pub mod verifier;
