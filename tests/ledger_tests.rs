use chrono::{NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use tienda::model::{CreditItem, PaymentStatus, StaffSaleRecord};
use tienda::{attach, commission, remaining, render, Credit, Payment, PaymentMethod, StaffMember};

fn payment(id: &str, amount: Decimal) -> Payment {
    Payment {
        id: id.to_string(),
        amount,
        date: NaiveDate::from_ymd_opt(2026, 5, 17).unwrap(),
        method: PaymentMethod::Transfer,
        reference: Some("TRX-100".to_string()),
        status: PaymentStatus::Active,
    }
}

#[test]
fn remaining_matches_total_minus_payments() {
    let payments = vec![payment("PAY-1-1", dec!(30.00)), payment("PAY-2-2", dec!(20.00))];
    assert_eq!(remaining(dec!(100.00), &payments), dec!(50.00));
    assert_eq!(remaining(dec!(100.00), payments.iter().take(0)), dec!(100.00));

    let cents: Vec<_> = (0..3).map(|i| payment(&format!("PAY-{i}-1"), dec!(0.10))).collect();
    assert_eq!(remaining(dec!(0.30), &cents), Decimal::ZERO);
}

#[test]
fn commission_examples() {
    assert_eq!(commission(dec!(1000), dec!(10), dec!(0)), dec!(100));
    assert_eq!(commission(dec!(1000), dec!(0), dec!(0)), dec!(0));
}

#[test]
fn attach_is_a_functional_update() {
    let staff = StaffMember {
        code: "leo".to_string(),
        name: "Leo".to_string(),
        default_commission: dec!(3),
        sales: Vec::new(),
    };
    let record = StaffSaleRecord {
        id: "COM-1-1".to_string(),
        date: Utc.with_ymd_and_hms(2026, 5, 17, 9, 0, 0).unwrap(),
        amount: dec!(500),
        commission: dec!(3),
        discount: Decimal::ZERO,
        total_commission: dec!(15),
    };

    let updated = attach(&staff, record.clone());
    assert!(staff.sales.is_empty());
    assert_eq!(updated.sales, vec![record]);
}

#[test]
fn receipt_is_byte_identical_across_runs() {
    let credit = Credit {
        id: "CRE-1".to_string(),
        code: "CR-0100".to_string(),
        client_name: "Sofía & Hijos".to_string(),
        client_phone: "601 555 0000".to_string(),
        total_amount: dec!(300),
        products: vec![CreditItem {
            name: "Nevera".to_string(),
            quantity: 1,
            price: dec!(300),
            subtotal: dec!(300),
        }],
        payments: vec![payment("PAY-1769990000000-1", dec!(120))],
    };

    let first = render(&credit, &credit.payments[0], "Electro Hogar");
    let second = render(&credit.clone(), &credit.payments[0].clone(), "Electro Hogar");

    assert_eq!(first.html.as_bytes(), second.html.as_bytes());
    assert!(first.html.contains("Sofía &amp; Hijos"));
    assert!(first.html.contains("FACT-1769990000000"));
    assert!(first.html.contains("Saldo Pendiente:</strong> $180.00"));
}
