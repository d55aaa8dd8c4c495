use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use tracing::info;

use super::items::ResolvedItem;
use crate::config::{CreditSettings, State};
use crate::error::{Result, StoreError};
use crate::ledger::{credit_id, format_credit_code, payment_id};
use crate::model::{Credit, CreditItem, Payment, PaymentMethod, PaymentStatus};
use crate::money::validate_amount;

/// Input for opening a credit
#[derive(Debug, Clone)]
pub struct NewCredit {
    /// Explicit code; generated from the counter when `None`
    pub code: Option<String>,
    pub client_name: String,
    pub client_phone: String,
    pub items: Vec<ResolvedItem>,
}

/// Input for recording a payment
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub amount: Decimal,
    pub date: NaiveDate,
    pub method: PaymentMethod,
    pub reference: Option<String>,
}

/// Open a credit and return its index in `state.credits`
pub fn open_credit(
    state: &mut State,
    settings: &CreditSettings,
    new: NewCredit,
    at: DateTime<Utc>,
) -> Result<usize> {
    if new.items.is_empty() {
        return Err(StoreError::NoItems);
    }

    let code = match new.code {
        Some(code) => {
            if state.credit_by_code(&code).is_some() {
                return Err(StoreError::DuplicateCredit(code));
            }
            code
        }
        None => next_credit_code(state, settings, at.year())?,
    };

    let products: Vec<CreditItem> = new
        .items
        .into_iter()
        .map(|item| CreditItem {
            name: item.product.name,
            quantity: item.quantity,
            price: item.product.price,
            subtotal: item.subtotal,
        })
        .collect();
    let total_amount: Decimal = products.iter().map(|p| p.subtotal).sum();

    info!(%code, client = %new.client_name, %total_amount, "credit opened");

    let mut seq = state.credits.len() + 1;
    while state.credit_index(&credit_id(at, seq)).is_some() {
        seq += 1;
    }

    state.credits.push(Credit {
        id: credit_id(at, seq),
        code,
        client_name: new.client_name,
        client_phone: new.client_phone,
        total_amount,
        products,
        payments: Vec::new(),
    });
    Ok(state.credits.len() - 1)
}

/// Advance the counter past codes already taken by explicit `--code` credits
pub fn next_credit_code(
    state: &mut State,
    settings: &CreditSettings,
    year: i32,
) -> Result<String> {
    let mut previous: Option<String> = None;
    loop {
        let seq = state.counter.last_credit + 1;
        let code = format_credit_code(&settings.code_format, year, seq);
        if state.credit_by_code(&code).is_none() {
            state.counter.last_credit = seq;
            return Ok(code);
        }
        // a template without {seq} yields the same code forever
        if previous.as_deref() == Some(code.as_str()) {
            return Err(StoreError::DuplicateCredit(code));
        }
        state.counter.last_credit = seq;
        previous = Some(code);
    }
}

fn credit_mut<'a>(state: &'a mut State, reference: &str) -> Result<&'a mut Credit> {
    let idx = state
        .credit_index(reference)
        .ok_or_else(|| StoreError::CreditNotFound(reference.to_string()))?;
    Ok(&mut state.credits[idx])
}

/// Record a payment; rejects amounts above the outstanding balance
pub fn add_payment(
    state: &mut State,
    credit_ref: &str,
    new: NewPayment,
    at: DateTime<Utc>,
) -> Result<Payment> {
    let amount = validate_amount(new.amount, "payment amount")?;
    if amount.is_zero() {
        return Err(StoreError::InvalidAmount {
            field: "payment amount".to_string(),
            value: amount,
        });
    }

    let credit = credit_mut(state, credit_ref)?;
    let outstanding = credit.outstanding();
    if amount > outstanding {
        return Err(StoreError::OverPayment {
            credit: credit.code.clone(),
            max: outstanding,
        });
    }

    let payment = Payment {
        id: payment_id(at, credit.payments.len() + 1),
        amount,
        date: new.date,
        method: new.method,
        reference: new.reference.filter(|r| !r.trim().is_empty()),
        status: PaymentStatus::Active,
    };
    credit.payments.push(payment.clone());

    info!(credit = %credit.code, payment = %payment.id, %amount, "payment recorded");
    Ok(payment)
}

/// Mark a payment cancelled; it stays in the history but no longer counts
pub fn cancel_payment(state: &mut State, credit_ref: &str, payment_ref: &str) -> Result<Payment> {
    let credit = credit_mut(state, credit_ref)?;
    let code = credit.code.clone();
    let payment = credit
        .payments
        .iter_mut()
        .find(|p| p.id == payment_ref)
        .ok_or_else(|| StoreError::PaymentNotFound {
            credit: code.clone(),
            payment: payment_ref.to_string(),
        })?;

    if payment.status == PaymentStatus::Cancelled {
        return Err(StoreError::AlreadyCancelled(payment.id.clone()));
    }
    payment.status = PaymentStatus::Cancelled;

    info!(credit = %code, payment = %payment.id, "payment cancelled");
    Ok(payment.clone())
}

/// Remove a payment from the credit entirely
pub fn delete_payment(state: &mut State, credit_ref: &str, payment_ref: &str) -> Result<Payment> {
    let credit = credit_mut(state, credit_ref)?;
    let idx = credit
        .payments
        .iter()
        .position(|p| p.id == payment_ref)
        .ok_or_else(|| StoreError::PaymentNotFound {
            credit: credit.code.clone(),
            payment: payment_ref.to_string(),
        })?;

    Ok(credit.payments.remove(idx))
}

pub fn delete_credit(state: &mut State, credit_ref: &str) -> Result<Credit> {
    let idx = state
        .credit_index(credit_ref)
        .ok_or_else(|| StoreError::CreditNotFound(credit_ref.to_string()))?;
    Ok(state.credits.remove(idx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn at(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_770_000_000 + secs, 0).unwrap()
    }

    fn item(name: &str, price: Decimal, quantity: u32) -> ResolvedItem {
        ResolvedItem {
            code: name.to_lowercase(),
            product: Product {
                name: name.to_string(),
                price,
                image_url: None,
            },
            quantity,
            subtotal: price * Decimal::from(quantity),
        }
    }

    fn with_credit() -> State {
        let mut state = State::default();
        open_credit(
            &mut state,
            &CreditSettings::default(),
            NewCredit {
                code: None,
                client_name: "Ana".to_string(),
                client_phone: "300".to_string(),
                items: vec![item("Camisa", dec!(40), 2), item("Medias", dec!(5), 4)],
            },
            at(0),
        )
        .unwrap();
        state
    }

    fn pay(amount: Decimal) -> NewPayment {
        NewPayment {
            amount,
            date: NaiveDate::from_ymd_opt(2026, 2, 2).unwrap(),
            method: PaymentMethod::Transfer,
            reference: Some("TRX-1".to_string()),
        }
    }

    #[test]
    fn opening_assigns_code_and_total() {
        let state = with_credit();
        let credit = &state.credits[0];
        assert_eq!(credit.code, "CR-0001");
        assert_eq!(credit.total_amount, dec!(100));
        assert_eq!(state.counter.last_credit, 1);
    }

    fn open_with_code(state: &mut State, code: Option<&str>, client: &str) -> Result<usize> {
        open_credit(
            state,
            &CreditSettings::default(),
            NewCredit {
                code: code.map(str::to_string),
                client_name: client.to_string(),
                client_phone: "300".to_string(),
                items: vec![item("Camisa", dec!(40), 1)],
            },
            at(0),
        )
    }

    #[test]
    fn generated_code_skips_explicit_ones() {
        let mut state = State::default();
        open_with_code(&mut state, Some("CR-0001"), "Ana").unwrap();
        let idx = open_with_code(&mut state, None, "Bob").unwrap();

        assert_eq!(state.credits[idx].code, "CR-0002");
        assert_eq!(state.counter.last_credit, 2);
        assert_ne!(state.credits[0].id, state.credits[1].id);

        add_payment(&mut state, "CR-0002", pay(dec!(10)), at(5)).unwrap();
        assert!(state.credits[0].payments.is_empty());
        assert_eq!(state.credits[1].payments.len(), 1);
    }

    #[test]
    fn explicit_code_must_be_unique() {
        let mut state = with_credit();
        assert!(matches!(
            open_with_code(&mut state, Some("cr-0001"), "Bob"),
            Err(StoreError::DuplicateCredit(_))
        ));
        assert_eq!(state.credits.len(), 1);
    }

    #[test]
    fn template_without_sequence_reports_duplicate() {
        let mut state = State::default();
        let settings = CreditSettings {
            code_format: "FIJO".to_string(),
        };
        assert_eq!(next_credit_code(&mut state, &settings, 2026).unwrap(), "FIJO");
        open_with_code(&mut state, Some("FIJO"), "Ana").unwrap();
        assert!(matches!(
            next_credit_code(&mut state, &settings, 2026),
            Err(StoreError::DuplicateCredit(_))
        ));
    }

    #[test]
    fn id_lookup_wins_over_code() {
        let mut state = State::default();
        open_with_code(&mut state, Some("7"), "Ana").unwrap();
        open_with_code(&mut state, None, "Bob").unwrap();
        let bob_id = state.credits[1].id.clone();

        assert_eq!(state.credit_index("7"), Some(0));
        assert_eq!(state.credit_index(&bob_id), Some(1));
    }

    #[test]
    fn payments_reduce_outstanding() {
        let mut state = with_credit();
        let first = add_payment(&mut state, "cr-0001", pay(dec!(30)), at(10)).unwrap();
        add_payment(&mut state, "CR-0001", pay(dec!(20)), at(20)).unwrap();

        assert_eq!(first.id, format!("PAY-{}-1", at(10).timestamp_millis()));
        assert_eq!(state.credits[0].outstanding(), dec!(50));
    }

    #[test]
    fn overpayment_is_rejected() {
        let mut state = with_credit();
        let err = add_payment(&mut state, "CR-0001", pay(dec!(100.01)), at(1)).unwrap_err();
        assert!(matches!(err, StoreError::OverPayment { max, .. } if max == dec!(100)));
    }

    #[test]
    fn non_positive_amounts_are_rejected() {
        let mut state = with_credit();
        assert!(matches!(
            add_payment(&mut state, "CR-0001", pay(dec!(0)), at(1)),
            Err(StoreError::InvalidAmount { .. })
        ));
        assert!(matches!(
            add_payment(&mut state, "CR-0001", pay(dec!(-5)), at(1)),
            Err(StoreError::InvalidAmount { .. })
        ));
    }

    #[test]
    fn cancel_then_delete() {
        let mut state = with_credit();
        let p = add_payment(&mut state, "CR-0001", pay(dec!(60)), at(1)).unwrap();

        cancel_payment(&mut state, "CR-0001", &p.id).unwrap();
        assert_eq!(state.credits[0].outstanding(), dec!(100));
        assert!(matches!(
            cancel_payment(&mut state, "CR-0001", &p.id),
            Err(StoreError::AlreadyCancelled(_))
        ));

        delete_payment(&mut state, "CR-0001", &p.id).unwrap();
        assert!(state.credits[0].payments.is_empty());
        assert!(matches!(
            delete_payment(&mut state, "CR-0001", &p.id),
            Err(StoreError::PaymentNotFound { .. })
        ));
    }

    #[test]
    fn delete_unknown_credit() {
        let mut state = with_credit();
        assert!(matches!(
            delete_credit(&mut state, "CR-9999"),
            Err(StoreError::CreditNotFound(_))
        ));
        assert_eq!(delete_credit(&mut state, "CR-0001").unwrap().code, "CR-0001");
        assert!(state.credits.is_empty());
    }
}
