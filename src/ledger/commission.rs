use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tracing::debug;

use crate::model::{Sale, StaffMember, StaffSaleRecord};
use crate::money::round_money;

/// Commission owed on a sale.
///
/// The discount comes off the sale total first and the percentage applies to
/// what is left. A discount above the total leaves nothing to commission.
pub fn commission(sale_total: Decimal, commission_percent: Decimal, discount: Decimal) -> Decimal {
    let base = (sale_total - discount).max(Decimal::ZERO);
    round_money(base * commission_percent / Decimal::ONE_HUNDRED)
}

/// Return `staff` with `record` appended to its sales history.
pub fn attach(staff: &StaffMember, record: StaffSaleRecord) -> StaffMember {
    let mut updated = staff.clone();
    updated.sales.push(record);
    updated
}

/// Commission record for an attributed sale, or `None` when nobody is credited.
///
/// The sales flow never applies a discount to commissions, so it is recorded
/// as zero.
pub fn staff_record_for_sale(sale: &Sale, id: String, at: DateTime<Utc>) -> Option<StaffSaleRecord> {
    let staff = sale.staff.as_ref()?;
    let discount = Decimal::ZERO;
    let total_commission = commission(sale.total, staff.commission, discount);

    debug!(
        sale = %sale.id,
        staff = %staff.code,
        %total_commission,
        "computed staff commission"
    );

    Some(StaffSaleRecord {
        id,
        date: at,
        amount: sale.total,
        commission: staff.commission,
        discount,
        total_commission,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Client, StaffAttribution};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn member() -> StaffMember {
        StaffMember {
            code: "ana".to_string(),
            name: "Ana Ruiz".to_string(),
            default_commission: dec!(5),
            sales: vec![StaffSaleRecord {
                id: "COM-1-1".to_string(),
                date: Utc.with_ymd_and_hms(2026, 1, 1, 10, 0, 0).unwrap(),
                amount: dec!(200),
                commission: dec!(5),
                discount: Decimal::ZERO,
                total_commission: dec!(10),
            }],
        }
    }

    fn record(id: &str) -> StaffSaleRecord {
        StaffSaleRecord {
            id: id.to_string(),
            date: Utc.with_ymd_and_hms(2026, 2, 1, 10, 0, 0).unwrap(),
            amount: dec!(1000),
            commission: dec!(10),
            discount: Decimal::ZERO,
            total_commission: dec!(100),
        }
    }

    #[test]
    fn percentage_of_total() {
        assert_eq!(commission(dec!(1000), dec!(10), dec!(0)), dec!(100));
        assert_eq!(commission(dec!(1000), dec!(0), dec!(0)), dec!(0));
        assert_eq!(commission(dec!(99.99), dec!(7.5), dec!(0)), dec!(7.50));
    }

    // Discount semantics are not confirmed by any caller; this pins the
    // subtract-then-percentage reading.
    #[test]
    fn discount_reduces_the_base() {
        assert_eq!(commission(dec!(1000), dec!(10), dec!(200)), dec!(80));
        assert_eq!(commission(dec!(100), dec!(10), dec!(150)), dec!(0));
    }

    #[test]
    fn attach_leaves_original_untouched() {
        let staff = member();
        let before = staff.sales.clone();
        let updated = attach(&staff, record("COM-2-1"));

        assert_eq!(staff.sales, before);
        assert_eq!(updated.sales.len(), before.len() + 1);
        assert_eq!(&updated.sales[..before.len()], &before[..]);
        assert_eq!(updated.sales.last().unwrap().id, "COM-2-1");
        assert_eq!(updated.total_commission(), dec!(110));
    }

    #[test]
    fn record_only_for_attributed_sales() {
        let at = Utc.with_ymd_and_hms(2026, 3, 3, 12, 0, 0).unwrap();
        let mut sale = Sale {
            id: "VTA-1".to_string(),
            date: at,
            client: Client {
                name: "Luis".to_string(),
                phone: None,
                email: None,
            },
            products: Vec::new(),
            total: dec!(450),
            payment: None,
            staff: None,
            notes: None,
        };
        assert!(staff_record_for_sale(&sale, "COM-x".to_string(), at).is_none());

        sale.staff = Some(StaffAttribution {
            code: "ana".to_string(),
            name: "Ana Ruiz".to_string(),
            commission: dec!(10),
        });
        let rec = staff_record_for_sale(&sale, "COM-x".to_string(), at).unwrap();
        assert_eq!(rec.amount, dec!(450));
        assert_eq!(rec.discount, Decimal::ZERO);
        assert_eq!(rec.total_commission, dec!(45));
    }
}
