use rust_decimal::Decimal;

use crate::model::Payment;

/// Balance left on a credit after the given payments.
///
/// Every payment passed in is counted; callers filter out cancelled ones
/// (see [`Credit::outstanding`](crate::model::Credit::outstanding)).
pub fn remaining<'a, I>(total_amount: Decimal, payments: I) -> Decimal
where
    I: IntoIterator<Item = &'a Payment>,
{
    let paid: Decimal = payments.into_iter().map(|p| p.amount).sum();
    total_amount - paid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{PaymentMethod, PaymentStatus};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn pay(amount: Decimal) -> Payment {
        Payment {
            id: "PAY-1700000000000-1".to_string(),
            amount,
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            method: PaymentMethod::Cash,
            reference: None,
            status: PaymentStatus::Active,
        }
    }

    #[test]
    fn empty_history_leaves_total() {
        assert_eq!(remaining(dec!(250.75), &Vec::<Payment>::new()), dec!(250.75));
    }

    #[test]
    fn subtracts_every_payment() {
        let payments = vec![pay(dec!(30.00)), pay(dec!(20.00))];
        assert_eq!(remaining(dec!(100.00), &payments), dec!(50.00));
    }

    #[test]
    fn no_float_drift() {
        let payments: Vec<_> = (0..10).map(|_| pay(dec!(0.1))).collect();
        assert_eq!(remaining(dec!(1), &payments), Decimal::ZERO);
    }

    #[test]
    fn counts_whatever_the_caller_passes() {
        let mut cancelled = pay(dec!(40));
        cancelled.status = PaymentStatus::Cancelled;
        let payments = vec![pay(dec!(10)), cancelled];
        assert_eq!(remaining(dec!(100), &payments), dec!(50));
    }
}
