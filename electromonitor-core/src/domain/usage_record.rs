use std::{convert::Infallible, fmt, str::FromStr};

use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PaymentStatus {
    Unpaid,
    Paid,
}

/// How a paid record was settled.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PaymentType {
    /// Cash or counter payment recorded by an EB officer.
    Offline,
    /// Online payment, tagged with the method the customer chose (e.g. `phonepe`).
    Online(String),
}

impl FromStr for PaymentType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase();
        if tag == "offline" {
            Ok(Self::Offline)
        } else {
            Ok(Self::Online(tag))
        }
    }
}

impl fmt::Display for PaymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Offline => f.write_str("offline"),
            Self::Online(method) => f.write_str(method),
        }
    }
}

/// The outstanding (or most recently settled) bill of one customer.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsageRecord {
    pub customer_id: String,
    /// Cumulative kWh for the billing period.
    pub usage: f64,
    /// Sum of the tariff applied to each merged entry.
    pub payable: f64,
    pub chip_id: String,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339"))]
    pub updated_at: OffsetDateTime,
    pub payment_status: PaymentStatus,
    pub payment_type: Option<PaymentType>,
    #[cfg_attr(feature = "serde", serde(with = "time::serde::rfc3339::option"))]
    pub paid_at: Option<OffsetDateTime>,
}

impl UsageRecord {
    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }
}
