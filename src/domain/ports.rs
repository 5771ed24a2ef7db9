use super::fields::FieldMap;
use crate::error::Result;
use async_trait::async_trait;
use std::net::IpAddr;

/// An inbound ITN as delivered by the web layer.
///
/// Reading the body is the only operation that may suspend; everything the
/// verifier does with the result is synchronous.
#[async_trait]
pub trait ItnRequest: Send + Sync {
    /// Posted form fields, flat and string-keyed.
    async fn form(&self) -> Result<FieldMap>;

    /// Network address the notification came from, if the transport knows it.
    fn client_addr(&self) -> Option<IpAddr>;
}

pub type ItnRequestBox = Box<dyn ItnRequest>;
