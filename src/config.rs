use crate::error::{PayFastError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};

const SANDBOX_HOST: &str = "https://sandbox.payfast.co.za";
const PRODUCTION_HOST: &str = "https://www.payfast.co.za";

/// Addresses the gateway is known to send ITNs from.
pub const DEFAULT_VALID_IPS: [IpAddr; 2] = [
    IpAddr::V4(Ipv4Addr::new(197, 97, 145, 144)),
    IpAddr::V4(Ipv4Addr::new(41, 74, 179, 194)),
];

/// Which gateway deployment requests are sent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Sandbox,
    Production,
}

impl Environment {
    pub fn from_sandbox_flag(sandbox: bool) -> Self {
        if sandbox {
            Environment::Sandbox
        } else {
            Environment::Production
        }
    }

    fn host(self) -> &'static str {
        match self {
            Environment::Sandbox => SANDBOX_HOST,
            Environment::Production => PRODUCTION_HOST,
        }
    }

    /// Where the payment form is posted.
    pub fn process_url(self) -> String {
        format!("{}/eng/process", self.host())
    }

    /// Server-side ITN validation endpoint.
    pub fn validate_url(self) -> String {
        format!("{}/eng/query/validate", self.host())
    }
}

/// Shared secret configured on the merchant account.
///
/// Never printed: `Debug` and `Display` are redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Passphrase(String);

impl Passphrase {
    /// `None` for an empty secret.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        (!value.is_empty()).then_some(Passphrase(value))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Passphrase([REDACTED])")
    }
}

impl fmt::Display for Passphrase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

/// Immutable settings for one merchant integration.
#[derive(Debug, Clone)]
pub struct PayFastConfig {
    merchant_id: String,
    merchant_key: String,
    passphrase: Option<Passphrase>,
    environment: Environment,
    validate_ip: bool,
    valid_ips: Vec<IpAddr>,
}

impl PayFastConfig {
    pub fn builder(
        merchant_id: impl Into<String>,
        merchant_key: impl Into<String>,
    ) -> PayFastConfigBuilder {
        PayFastConfigBuilder {
            merchant_id: merchant_id.into(),
            merchant_key: merchant_key.into(),
            passphrase: None,
            environment: Environment::default(),
            validate_ip: true,
            valid_ips: DEFAULT_VALID_IPS.to_vec(),
        }
    }

    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    pub fn merchant_key(&self) -> &str {
        &self.merchant_key
    }

    pub fn passphrase(&self) -> Option<&str> {
        self.passphrase.as_ref().map(Passphrase::expose)
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn is_sandbox(&self) -> bool {
        self.environment == Environment::Sandbox
    }

    pub fn validate_ip(&self) -> bool {
        self.validate_ip
    }

    pub fn valid_ips(&self) -> &[IpAddr] {
        &self.valid_ips
    }

    pub fn process_url(&self) -> String {
        self.environment.process_url()
    }

    pub fn validate_url(&self) -> String {
        self.environment.validate_url()
    }
}

#[derive(Debug, Clone)]
pub struct PayFastConfigBuilder {
    merchant_id: String,
    merchant_key: String,
    passphrase: Option<Passphrase>,
    environment: Environment,
    validate_ip: bool,
    valid_ips: Vec<IpAddr>,
}

impl PayFastConfigBuilder {
    /// An empty passphrase is the same as none.
    pub fn passphrase(mut self, passphrase: impl Into<String>) -> Self {
        self.passphrase = Passphrase::new(passphrase);
        self
    }

    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.environment = Environment::from_sandbox_flag(sandbox);
        self
    }

    pub fn environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self
    }

    pub fn validate_ip(mut self, validate_ip: bool) -> Self {
        self.validate_ip = validate_ip;
        self
    }

    pub fn valid_ips(mut self, ips: impl IntoIterator<Item = IpAddr>) -> Self {
        self.valid_ips = ips.into_iter().collect();
        self
    }

    pub fn build(self) -> Result<PayFastConfig> {
        if self.merchant_id.trim().is_empty() {
            return Err(PayFastError::Config("merchant_id must not be empty".to_string()));
        }
        if self.merchant_key.trim().is_empty() {
            return Err(PayFastError::Config("merchant_key must not be empty".to_string()));
        }

        Ok(PayFastConfig {
            merchant_id: self.merchant_id,
            merchant_key: self.merchant_key,
            passphrase: self.passphrase,
            environment: self.environment,
            validate_ip: self.validate_ip,
            valid_ips: self.valid_ips,
        })
    }
}
