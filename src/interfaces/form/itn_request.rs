use crate::domain::fields::FieldMap;
use crate::domain::ports::ItnRequest;
use crate::error::Result;
use async_trait::async_trait;
use std::net::IpAddr;

/// An ITN carried as an `application/x-www-form-urlencoded` body.
///
/// Repeated keys keep the last value.
#[derive(Debug, Clone)]
pub struct FormItnRequest {
    body: Vec<u8>,
    client_addr: Option<IpAddr>,
}

impl FormItnRequest {
    pub fn new(body: impl Into<Vec<u8>>, client_addr: Option<IpAddr>) -> Self {
        Self {
            body: body.into(),
            client_addr,
        }
    }
}

/// Decodes a form-urlencoded body into a field map.
pub fn parse_form(body: &[u8]) -> Result<FieldMap> {
    let pairs: Vec<(String, String)> = serde_urlencoded::from_bytes(body)?;
    Ok(pairs.into_iter().collect())
}

#[async_trait]
impl ItnRequest for FormItnRequest {
    async fn form(&self) -> Result<FieldMap> {
        parse_form(&self.body)
    }

    fn client_addr(&self) -> Option<IpAddr> {
        self.client_addr
    }
}
