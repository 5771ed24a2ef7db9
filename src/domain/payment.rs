use super::amount::Amount;
use super::fields::FieldMap;
use crate::error::{PayFastError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

/// Subscription type codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum SubscriptionType {
    Subscription = 1,
    Adhoc = 2,
}

/// Billing frequency codes for recurring payments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum FrequencyType {
    Monthly = 3,
    Quarterly = 4,
    Biannual = 5,
    Annual = 6,
}

impl SubscriptionType {
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl FrequencyType {
    pub fn code(self) -> i64 {
        self as i64
    }
}

impl TryFrom<i64> for SubscriptionType {
    type Error = PayFastError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            1 => Ok(SubscriptionType::Subscription),
            2 => Ok(SubscriptionType::Adhoc),
            other => Err(PayFastError::Validation(format!(
                "unknown subscription_type {other}"
            ))),
        }
    }
}

impl TryFrom<i64> for FrequencyType {
    type Error = PayFastError;

    fn try_from(code: i64) -> Result<Self> {
        match code {
            3 => Ok(FrequencyType::Monthly),
            4 => Ok(FrequencyType::Quarterly),
            5 => Ok(FrequencyType::Biannual),
            6 => Ok(FrequencyType::Annual),
            other => Err(PayFastError::Validation(format!("unknown frequency {other}"))),
        }
    }
}

impl From<SubscriptionType> for i64 {
    fn from(value: SubscriptionType) -> Self {
        value.code()
    }
}

impl From<FrequencyType> for i64 {
    fn from(value: FrequencyType) -> Self {
        value.code()
    }
}

/// Outbound payment data, before the merchant credentials and signature
/// are attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRequest {
    pub amount: Amount,
    pub item_name: String,
    #[serde(default)]
    pub item_description: Option<String>,

    #[serde(default)]
    pub return_url: Option<Url>,
    #[serde(default)]
    pub cancel_url: Option<Url>,
    #[serde(default)]
    pub notify_url: Option<Url>,

    #[serde(default)]
    pub name_first: Option<String>,
    #[serde(default)]
    pub name_last: Option<String>,
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub cell_number: Option<String>,

    /// Merchant-side reference for the payment.
    #[serde(default)]
    pub m_payment_id: Option<String>,
    #[serde(default)]
    pub custom_str: [Option<String>; 5],
    #[serde(default)]
    pub custom_int: [Option<i64>; 5],

    #[serde(default)]
    pub subscription_type: Option<SubscriptionType>,
    /// First billing date, `YYYY-MM-DD`.
    #[serde(default)]
    pub billing_date: Option<String>,
    #[serde(default)]
    pub recurring_amount: Option<Amount>,
    #[serde(default)]
    pub frequency: Option<FrequencyType>,
    /// Number of billing cycles, 0 for indefinite.
    #[serde(default)]
    pub cycles: Option<u32>,

    #[serde(default)]
    pub email_confirmation: Option<bool>,
    #[serde(default)]
    pub confirmation_address: Option<String>,
}

impl PaymentRequest {
    pub fn new(amount: Decimal, item_name: impl Into<String>) -> Result<Self> {
        Ok(Self {
            amount: Amount::new(amount)?,
            item_name: item_name.into(),
            item_description: None,
            return_url: None,
            cancel_url: None,
            notify_url: None,
            name_first: None,
            name_last: None,
            email_address: None,
            cell_number: None,
            m_payment_id: None,
            custom_str: Default::default(),
            custom_int: [None; 5],
            subscription_type: None,
            billing_date: None,
            recurring_amount: None,
            frequency: None,
            cycles: None,
            email_confirmation: None,
            confirmation_address: None,
        })
    }

    /// Checks the field constraints the gateway enforces on its side.
    pub fn validate(&self) -> Result<()> {
        let name_len = self.item_name.chars().count();
        if !(1..=100).contains(&name_len) {
            return Err(PayFastError::Validation(
                "item_name must be between 1 and 100 characters".to_string(),
            ));
        }

        check_max_len("item_description", self.item_description.as_deref(), 255)?;
        check_max_len("name_first", self.name_first.as_deref(), 100)?;
        check_max_len("name_last", self.name_last.as_deref(), 100)?;
        check_max_len("email_address", self.email_address.as_deref(), 100)?;
        check_max_len("cell_number", self.cell_number.as_deref(), 20)?;
        check_max_len(
            "confirmation_address",
            self.confirmation_address.as_deref(),
            100,
        )?;
        for (i, value) in self.custom_str.iter().enumerate() {
            check_max_len(&format!("custom_str{}", i + 1), value.as_deref(), 255)?;
        }

        for (name, url) in [
            ("return_url", &self.return_url),
            ("cancel_url", &self.cancel_url),
            ("notify_url", &self.notify_url),
        ] {
            if let Some(url) = url
                && !matches!(url.scheme(), "http" | "https")
            {
                return Err(PayFastError::Validation(format!(
                    "{name} must be an http(s) URL"
                )));
            }
        }

        if let Some(date) = self.billing_date.as_deref()
            && !is_iso_date(date)
        {
            return Err(PayFastError::Validation(format!(
                "billing_date must be formatted YYYY-MM-DD, got `{date}`"
            )));
        }

        Ok(())
    }

    /// Field set sent to the gateway. Absent optional fields are omitted.
    pub fn to_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("amount", self.amount.value());
        fields.insert("item_name", self.item_name.as_str());
        fields.insert_opt("item_description", self.item_description.as_deref());
        fields.insert_opt("return_url", self.return_url.as_ref().map(Url::as_str));
        fields.insert_opt("cancel_url", self.cancel_url.as_ref().map(Url::as_str));
        fields.insert_opt("notify_url", self.notify_url.as_ref().map(Url::as_str));
        fields.insert_opt("name_first", self.name_first.as_deref());
        fields.insert_opt("name_last", self.name_last.as_deref());
        fields.insert_opt("email_address", self.email_address.as_deref());
        fields.insert_opt("cell_number", self.cell_number.as_deref());
        fields.insert_opt("m_payment_id", self.m_payment_id.as_deref());
        for (i, value) in self.custom_str.iter().enumerate() {
            fields.insert_opt(&format!("custom_str{}", i + 1), value.as_deref());
        }
        for (i, value) in self.custom_int.iter().enumerate() {
            fields.insert_opt(&format!("custom_int{}", i + 1), *value);
        }
        fields.insert_opt("subscription_type", self.subscription_type.map(i64::from));
        fields.insert_opt("billing_date", self.billing_date.as_deref());
        fields.insert_opt("recurring_amount", self.recurring_amount.map(|a| a.value()));
        fields.insert_opt("frequency", self.frequency.map(i64::from));
        fields.insert_opt("cycles", self.cycles);
        fields.insert_opt("email_confirmation", self.email_confirmation);
        fields.insert_opt("confirmation_address", self.confirmation_address.as_deref());
        fields
    }
}

fn check_max_len(name: &str, value: Option<&str>, max: usize) -> Result<()> {
    match value {
        Some(v) if v.chars().count() > max => Err(PayFastError::Validation(format!(
            "{name} must be at most {max} characters"
        ))),
        _ => Ok(()),
    }
}

fn is_iso_date(value: &str) -> bool {
    value.len() == 10 && NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
}
