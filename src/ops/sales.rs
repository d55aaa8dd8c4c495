use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::info;

use super::items::ResolvedItem;
use crate::config::State;
use crate::error::{Result, StoreError};
use crate::ledger::{attach, commission_record_id, sale_id, staff_record_for_sale};
use crate::model::{Client, Sale, SaleItem, SalePayment, StaffAttribution, StaffSaleRecord};
use crate::money::validate_amount;

/// Input for recording a sale
#[derive(Debug, Clone)]
pub struct NewSale {
    pub client: Client,
    pub items: Vec<ResolvedItem>,
    pub payment: Option<SalePayment>,
    /// Staff code and an optional commission percentage overriding the
    /// member's default
    pub staff: Option<(String, Option<Decimal>)>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RecordedSale {
    pub sale: Sale,
    pub commission: Option<StaffSaleRecord>,
    pub new_client: bool,
}

/// Record a sale. When staff is attributed, the commission record is appended
/// to that member's history.
pub fn record_sale(state: &mut State, new: NewSale, at: DateTime<Utc>) -> Result<RecordedSale> {
    if new.items.is_empty() {
        return Err(StoreError::NoItems);
    }

    let staff = match new.staff {
        Some((code, percent)) => {
            let idx = state
                .staff_index(&code)
                .ok_or_else(|| StoreError::StaffNotFound(code.clone()))?;
            let member = &state.staff[idx];
            let commission = validate_amount(
                percent.unwrap_or(member.default_commission),
                "commission percentage",
            )?;
            Some((
                idx,
                StaffAttribution {
                    code: member.code.clone(),
                    name: member.name.clone(),
                    commission,
                },
            ))
        }
        None => None,
    };

    let products: Vec<SaleItem> = new
        .items
        .into_iter()
        .map(|item| SaleItem {
            name: item.product.name,
            quantity: item.quantity,
            sale_price: item.product.price,
            subtotal: item.subtotal,
            image_url: item.product.image_url,
        })
        .collect();
    let total: Decimal = products.iter().map(|p| p.subtotal).sum();

    let new_client = state.find_client(&new.client.name).is_none();
    if new_client {
        state.clients.push(new.client.clone());
    }

    let mut seq = state.sales.len() + 1;
    while state.sales.iter().any(|s| s.id == sale_id(at, seq)) {
        seq += 1;
    }

    let sale = Sale {
        id: sale_id(at, seq),
        date: at,
        client: new.client,
        products,
        total,
        payment: new.payment,
        staff: staff.as_ref().map(|(_, attribution)| attribution.clone()),
        notes: new.notes.filter(|n| !n.trim().is_empty()),
    };

    let commission = match staff {
        Some((idx, _)) => {
            let record_id = commission_record_id(at, state.staff[idx].sales.len() + 1);
            match staff_record_for_sale(&sale, record_id, at) {
                Some(record) => {
                    let updated = attach(&state.staff[idx], record.clone());
                    state.staff[idx] = updated;
                    Some(record)
                }
                None => None,
            }
        }
        None => None,
    };

    info!(sale = %sale.id, %total, client = %sale.client.name, "sale recorded");
    state.sales.push(sale.clone());

    Ok(RecordedSale {
        sale,
        commission,
        new_client,
    })
}

/// Remove a sale. Commission already credited to staff is kept.
pub fn delete_sale(state: &mut State, sale_ref: &str) -> Result<Sale> {
    let idx = state
        .sales
        .iter()
        .position(|s| s.id == sale_ref)
        .ok_or_else(|| StoreError::SaleNotFound(sale_ref.to_string()))?;
    Ok(state.sales.remove(idx))
}
