use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Commission earned on one attributed sale. Never edited once appended.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StaffSaleRecord {
    pub id: String,
    pub date: DateTime<Utc>,
    pub amount: Decimal,
    pub commission: Decimal,
    #[serde(default)]
    pub discount: Decimal,
    pub total_commission: Decimal,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct StaffMember {
    pub code: String,
    pub name: String,
    /// Percentage used when a sale does not specify one
    #[serde(default)]
    pub default_commission: Decimal,
    #[serde(default)]
    pub sales: Vec<StaffSaleRecord>,
}

impl StaffMember {
    pub fn total_commission(&self) -> Decimal {
        self.sales.iter().map(|s| s.total_commission).sum()
    }

    pub fn total_sold(&self) -> Decimal {
        self.sales.iter().map(|s| s.amount).sum()
    }
}
