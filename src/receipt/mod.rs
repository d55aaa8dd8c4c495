//! Printable payment receipts for credits.

mod document;
mod html;

pub use document::{
    build, invoice_number, Receipt, ReceiptLine, RenderOptions, PLACEHOLDER_NUMBER, RECEIPT_TITLE,
};
pub use html::{to_html, Document};

use tracing::debug;

use crate::model::{Credit, Payment};

/// Render a receipt with default formatting
pub fn render(credit: &Credit, payment: &Payment, business_name: &str) -> Document {
    render_with(credit, payment, business_name, &RenderOptions::default())
}

pub fn render_with(
    credit: &Credit,
    payment: &Payment,
    business_name: &str,
    options: &RenderOptions,
) -> Document {
    let receipt = build(credit, payment, business_name, options);
    debug!(
        number = %receipt.number,
        credit = %receipt.credit_code,
        lines = receipt.lines.len(),
        "rendering receipt"
    );
    to_html(&receipt, &options.currency)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CreditItem, PaymentMethod, PaymentStatus};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn sample_credit() -> Credit {
        Credit {
            id: "CRE-1".to_string(),
            code: "CR-0042".to_string(),
            client_name: "Pedro Pérez".to_string(),
            client_phone: "555-0101".to_string(),
            total_amount: dec!(100.00),
            products: vec![
                CreditItem {
                    name: "Zapatos".to_string(),
                    quantity: 1,
                    price: dec!(70.00),
                    subtotal: dec!(70.00),
                },
                CreditItem {
                    name: "Medias".to_string(),
                    quantity: 3,
                    price: dec!(10.00),
                    subtotal: dec!(30.00),
                },
            ],
            payments: vec![
                Payment {
                    id: "PAY-16899001234-1".to_string(),
                    amount: dec!(30.00),
                    date: NaiveDate::from_ymd_opt(2026, 2, 9).unwrap(),
                    method: PaymentMethod::Card,
                    reference: Some("AUTH-991".to_string()),
                    status: PaymentStatus::Active,
                },
                Payment {
                    id: "PAY-16899005555-2".to_string(),
                    amount: dec!(20.00),
                    date: NaiveDate::from_ymd_opt(2026, 2, 20).unwrap(),
                    method: PaymentMethod::Cash,
                    reference: None,
                    status: PaymentStatus::Active,
                },
            ],
        }
    }

    #[test]
    fn number_uses_middle_token() {
        assert_eq!(
            invoice_number("PAY-16899001234-X").unwrap(),
            "FACT-16899001234"
        );
        assert!(invoice_number("PAY").is_err());
        assert!(invoice_number("PAY--3").is_err());
    }

    #[test]
    fn malformed_id_falls_back_to_placeholder() {
        let mut credit = sample_credit();
        credit.payments[0].id = "legacy".to_string();
        let receipt = build(
            &credit,
            &credit.payments[0],
            "Tienda",
            &RenderOptions::default(),
        );
        assert_eq!(receipt.number, PLACEHOLDER_NUMBER);
    }

    #[test]
    fn receipt_fields() {
        let credit = sample_credit();
        let receipt = build(
            &credit,
            &credit.payments[0],
            "Tienda La Esquina",
            &RenderOptions::default(),
        );

        assert_eq!(receipt.number, "FACT-16899001234");
        assert_eq!(receipt.method, "Tarjeta");
        assert_eq!(receipt.date, "09/02/2026");
        assert_eq!(receipt.reference.as_deref(), Some("AUTH-991"));
        assert_eq!(receipt.amount_paid, dec!(30.00));
        // whole history counts, not just this payment
        assert_eq!(receipt.remaining, dec!(50.00));
        let names: Vec<_> = receipt.lines.iter().map(|l| l.name.as_str()).collect();
        assert_eq!(names, ["Zapatos", "Medias"]);
    }

    #[test]
    fn html_contains_summary() {
        let credit = sample_credit();
        let doc = render(&credit, &credit.payments[1], "Tienda <Central>");

        assert_eq!(doc.title, "Factura FACT-16899005555");
        assert!(doc.html.contains("Tienda &lt;Central&gt;"));
        assert!(doc.html.contains("Efectivo"));
        assert!(!doc.html.contains("Referencia:"));
        assert!(doc.html.contains("Crédito N°:</strong> CR-0042"));
        assert!(doc.html.contains("Total del Crédito:</strong> $100.00"));
        assert!(doc.html.contains("Monto Pagado:</strong> $20.00"));
        assert!(doc.html.contains("Saldo Pendiente:</strong> $50.00"));
        let zapatos = doc.html.find("Zapatos").unwrap();
        let medias = doc.html.find("Medias").unwrap();
        assert!(zapatos < medias);
    }

    #[test]
    fn business_contact_in_header() {
        let credit = sample_credit();
        let options = RenderOptions {
            business_phone: Some("601 234 5678".to_string()),
            business_address: Some("Calle 10 # 5-20 <Local 3>".to_string()),
            ..RenderOptions::default()
        };
        let doc = render_with(&credit, &credit.payments[0], "Tienda", &options);

        assert!(doc.html.contains("Tel: 601 234 5678"));
        assert!(doc.html.contains("Calle 10 # 5-20 &lt;Local 3&gt;"));
        assert!(!render(&credit, &credit.payments[0], "Tienda")
            .html
            .contains("Tel:"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let credit = sample_credit();
        let first = render(&credit, &credit.payments[0], "Tienda");
        let second = render(&credit, &credit.payments[0], "Tienda");
        assert_eq!(first, second);
    }
}
