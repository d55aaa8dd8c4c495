use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::credit::PaymentMethod;
use super::catalog::Client;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SaleItem {
    pub name: String,
    pub quantity: u32,
    pub sale_price: Decimal,
    pub subtotal: Decimal,
    #[serde(default)]
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SalePayment {
    pub method: PaymentMethod,
    #[serde(default)]
    pub reference: Option<String>,
}

/// Staff member credited with a sale
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StaffAttribution {
    pub code: String,
    pub name: String,
    /// Percentage, e.g. `10` for 10%
    pub commission: Decimal,
}

/// A completed point-of-sale transaction
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Sale {
    pub id: String,
    pub date: DateTime<Utc>,
    pub client: Client,
    #[serde(default)]
    pub products: Vec<SaleItem>,
    pub total: Decimal,
    #[serde(default)]
    pub payment: Option<SalePayment>,
    #[serde(default)]
    pub staff: Option<StaffAttribution>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Newest first
pub fn sort_recent_first(sales: &mut [Sale]) {
    sales.sort_by(|a, b| b.date.cmp(&a.date));
}
