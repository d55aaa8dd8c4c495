use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ledger::remaining;

/// How a payment was made
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Cash,
    Card,
    Transfer,
}

impl PaymentMethod {
    /// Display label printed on receipts and listings
    pub fn label(self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Efectivo",
            PaymentMethod::Card => "Tarjeta",
            PaymentMethod::Transfer => "Transferencia",
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "cash" | "efectivo" => Ok(PaymentMethod::Cash),
            "card" | "tarjeta" => Ok(PaymentMethod::Card),
            "transfer" | "transferencia" => Ok(PaymentMethod::Transfer),
            other => Err(format!(
                "unknown payment method '{other}' (use cash, card or transfer)"
            )),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Active,
    Cancelled,
}

/// A single payment recorded against a credit
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Payment {
    /// `PAY-<unix-millis>-<seq>`
    pub id: String,
    pub amount: Decimal,
    pub date: NaiveDate,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub status: PaymentStatus,
}

impl Payment {
    pub fn is_active(&self) -> bool {
        self.status == PaymentStatus::Active
    }
}

/// A product line on a credit
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CreditItem {
    pub name: String,
    pub quantity: u32,
    pub price: Decimal,
    pub subtotal: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreditStatus {
    Pending,
    Partial,
    Paid,
}

impl fmt::Display for CreditStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreditStatus::Pending => write!(f, "PENDING"),
            CreditStatus::Partial => write!(f, "PARTIAL"),
            CreditStatus::Paid => write!(f, "PAID"),
        }
    }
}

/// A deferred-payment account for a client
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Credit {
    pub id: String,
    pub code: String,
    pub client_name: String,
    pub client_phone: String,
    pub total_amount: Decimal,
    #[serde(default)]
    pub products: Vec<CreditItem>,
    #[serde(default)]
    pub payments: Vec<Payment>,
}

impl Credit {
    /// Payments that still count against the balance
    pub fn active_payments(&self) -> impl Iterator<Item = &Payment> {
        self.payments.iter().filter(|p| p.is_active())
    }

    pub fn paid_amount(&self) -> Decimal {
        self.active_payments().map(|p| p.amount).sum()
    }

    /// Remaining balance; cancelled payments are ignored
    pub fn outstanding(&self) -> Decimal {
        remaining(self.total_amount, self.active_payments())
    }

    pub fn status(&self) -> CreditStatus {
        let paid = self.paid_amount();
        if paid.is_zero() && !self.total_amount.is_zero() {
            CreditStatus::Pending
        } else if paid >= self.total_amount {
            CreditStatus::Paid
        } else {
            CreditStatus::Partial
        }
    }

    pub fn find_payment(&self, payment_id: &str) -> Option<&Payment> {
        self.payments.iter().find(|p| p.id == payment_id)
    }

    /// Case-insensitive match on code or client name
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        self.code.to_lowercase().contains(&term) || self.client_name.to_lowercase().contains(&term)
    }
}
