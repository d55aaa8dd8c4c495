use rust_decimal::Decimal;
use std::collections::BTreeMap;

use crate::error::{Result, StoreError};
use crate::model::Product;

/// A catalog product resolved with its quantity
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    pub code: String,
    pub product: Product,
    pub quantity: u32,
    pub subtotal: Decimal,
}

/// Parse item input like "camisa:2" into (product_code, quantity)
pub fn parse_item_input(input: &str) -> Result<(&str, u32)> {
    let (code, qty_str) = input
        .split_once(':')
        .filter(|(code, qty)| !code.is_empty() && !qty.contains(':'))
        .ok_or_else(|| StoreError::InvalidItemFormat(input.to_string()))?;

    let quantity: u32 = qty_str.parse().map_err(|_| StoreError::InvalidQuantity {
        product: code.to_string(),
        qty: qty_str.to_string(),
        reason: "must be a whole number".to_string(),
    })?;

    if quantity == 0 {
        return Err(StoreError::InvalidQuantity {
            product: code.to_string(),
            qty: qty_str.to_string(),
            reason: "must be greater than 0".to_string(),
        });
    }

    Ok((code, quantity))
}

/// Resolve item inputs against the catalog, keeping input order
pub fn resolve_items(
    inputs: &[String],
    catalog: &BTreeMap<String, Product>,
) -> Result<Vec<ResolvedItem>> {
    if inputs.is_empty() {
        return Err(StoreError::NoItems);
    }

    inputs
        .iter()
        .map(|input| {
            let (code, quantity) = parse_item_input(input)?;
            let product = catalog
                .get(code)
                .ok_or_else(|| StoreError::ProductNotFound(code.to_string()))?;

            Ok(ResolvedItem {
                code: code.to_string(),
                product: product.clone(),
                quantity,
                subtotal: product.price * Decimal::from(quantity),
            })
        })
        .collect()
}
