use super::fields::{FieldMap, SIGNATURE_FIELD};
use crate::error::{PayFastError, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment status codes reported by an ITN.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Complete,
    Failed,
    Pending,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Complete => "COMPLETE",
            PaymentStatus::Failed => "FAILED",
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Only a completed payment counts as a success.
    pub fn is_successful(&self) -> bool {
        *self == PaymentStatus::Complete
    }
}

impl FromStr for PaymentStatus {
    type Err = PayFastError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "COMPLETE" => Ok(PaymentStatus::Complete),
            "FAILED" => Ok(PaymentStatus::Failed),
            "PENDING" => Ok(PaymentStatus::Pending),
            "CANCELLED" => Ok(PaymentStatus::Cancelled),
            other => Err(PayFastError::MalformedNotification(format!(
                "unknown payment_status `{other}`"
            ))),
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A verified Instant Transaction Notification.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItnNotification {
    pub m_payment_id: Option<String>,
    pub pf_payment_id: String,
    pub payment_status: PaymentStatus,
    pub item_name: String,
    pub item_description: Option<String>,
    pub amount_gross: Decimal,
    pub amount_fee: Decimal,
    pub amount_net: Decimal,
    /// `custom_str1` through `custom_str5`.
    pub custom_str: [Option<String>; 5],
    /// `custom_int1` through `custom_int5`.
    pub custom_int: [Option<i64>; 5],
    pub name_first: Option<String>,
    pub name_last: Option<String>,
    pub email_address: Option<String>,
    pub merchant_id: String,
    pub signature: String,
}

impl ItnNotification {
    /// Builds the typed record from the raw notification fields.
    ///
    /// Unknown fields are ignored. Blank optional fields are treated as
    /// absent; blank required fields are rejected.
    pub fn from_fields(fields: &FieldMap) -> Result<Self> {
        let mut custom_int = [None; 5];
        for (i, slot) in custom_int.iter_mut().enumerate() {
            *slot = optional_int(fields, &format!("custom_int{}", i + 1))?;
        }

        Ok(Self {
            m_payment_id: optional(fields, "m_payment_id"),
            pf_payment_id: required(fields, "pf_payment_id")?,
            payment_status: required(fields, "payment_status")?.parse()?,
            item_name: required(fields, "item_name")?,
            item_description: optional(fields, "item_description"),
            amount_gross: decimal(fields, "amount_gross")?,
            amount_fee: decimal(fields, "amount_fee")?,
            amount_net: decimal(fields, "amount_net")?,
            custom_str: std::array::from_fn(|i| optional(fields, &format!("custom_str{}", i + 1))),
            custom_int,
            name_first: optional(fields, "name_first"),
            name_last: optional(fields, "name_last"),
            email_address: optional(fields, "email_address"),
            merchant_id: required(fields, "merchant_id")?,
            signature: required(fields, SIGNATURE_FIELD)?,
        })
    }

    pub fn is_successful(&self) -> bool {
        self.payment_status.is_successful()
    }
}

fn optional(fields: &FieldMap, key: &str) -> Option<String> {
    fields.get_param(key).map(|v| v.into_owned())
}

fn required(fields: &FieldMap, key: &str) -> Result<String> {
    optional(fields, key)
        .ok_or_else(|| PayFastError::MalformedNotification(format!("missing field `{key}`")))
}

fn decimal(fields: &FieldMap, key: &str) -> Result<Decimal> {
    let raw = required(fields, key)?;
    Decimal::from_str(raw.trim()).map_err(|e| {
        PayFastError::MalformedNotification(format!("field `{key}` is not a decimal: {e}"))
    })
}

fn optional_int(fields: &FieldMap, key: &str) -> Result<Option<i64>> {
    optional(fields, key)
        .map(|raw| {
            raw.trim().parse::<i64>().map_err(|e| {
                PayFastError::MalformedNotification(format!("field `{key}` is not an integer: {e}"))
            })
        })
        .transpose()
}
