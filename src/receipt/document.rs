use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::error::{Result, StoreError};
use crate::model::{Credit, Payment};
use crate::money::CurrencyFormat;

/// Printed when a payment id carries no timestamp token
pub const PLACEHOLDER_NUMBER: &str = "FACT-S/N";

pub const RECEIPT_TITLE: &str = "Comprobante de Pago";

/// Presentation settings for receipts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub currency: CurrencyFormat,
    /// chrono format string for the payment date
    pub date_format: String,
    /// Printed under the business name when set
    pub business_phone: Option<String>,
    pub business_address: Option<String>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            currency: CurrencyFormat::default(),
            date_format: "%d/%m/%Y".to_string(),
            business_phone: None,
            business_address: None,
        }
    }
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ReceiptLine {
    pub name: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Everything printed on a payment receipt
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Receipt {
    pub business_name: String,
    pub business_phone: Option<String>,
    pub business_address: Option<String>,
    pub title: String,
    pub number: String,
    pub client_name: String,
    pub client_phone: String,
    pub date: String,
    pub method: String,
    pub reference: Option<String>,
    pub credit_code: String,
    pub lines: Vec<ReceiptLine>,
    pub credit_total: Decimal,
    pub amount_paid: Decimal,
    pub remaining: Decimal,
}

/// Receipt number derived from the timestamp token of a payment id.
///
/// `PAY-16899001234-X` becomes `FACT-16899001234`.
pub fn invoice_number(payment_id: &str) -> Result<String> {
    match payment_id.split('-').nth(1) {
        Some(token) if !token.trim().is_empty() => Ok(format!("FACT-{}", token.trim())),
        _ => Err(StoreError::MalformedIdentifier(payment_id.to_string())),
    }
}

/// Assemble the receipt for one payment of a credit.
///
/// The remaining balance reflects the whole active payment history of the
/// credit, not just this payment.
pub fn build(
    credit: &Credit,
    payment: &Payment,
    business_name: &str,
    options: &RenderOptions,
) -> Receipt {
    let number = invoice_number(&payment.id).unwrap_or_else(|e| {
        warn!(error = %e, "using placeholder receipt number");
        PLACEHOLDER_NUMBER.to_string()
    });

    let lines = credit
        .products
        .iter()
        .map(|p| ReceiptLine {
            name: p.name.clone(),
            quantity: p.quantity,
            unit_price: p.price,
            subtotal: p.subtotal,
        })
        .collect();

    Receipt {
        business_name: business_name.to_string(),
        business_phone: options.business_phone.clone().filter(|p| !p.trim().is_empty()),
        business_address: options.business_address.clone().filter(|a| !a.trim().is_empty()),
        title: RECEIPT_TITLE.to_string(),
        number,
        client_name: credit.client_name.clone(),
        client_phone: credit.client_phone.clone(),
        date: payment.date.format(&options.date_format).to_string(),
        method: payment.method.label().to_string(),
        reference: payment.reference.clone().filter(|r| !r.is_empty()),
        credit_code: credit.code.clone(),
        lines,
        credit_total: credit.total_amount,
        amount_paid: payment.amount,
        remaining: credit.outstanding(),
    }
}
