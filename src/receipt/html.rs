use std::fmt::Write;

use super::document::Receipt;
use crate::money::{format_currency, CurrencyFormat};

/// A self-contained printable page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub html: String,
}

const STYLE: &str = r#"      body {
        font-family: Arial, sans-serif;
        line-height: 1.6;
        margin: 0;
        padding: 20px;
      }
      .invoice { max-width: 800px; margin: 0 auto; padding: 20px; }
      .header {
        text-align: center;
        margin-bottom: 30px;
        padding-bottom: 20px;
        border-bottom: 2px solid #eee;
      }
      .business-name { font-size: 24px; font-weight: bold; margin: 0; color: #2563eb; }
      .business-contact { margin: 2px 0; color: #444; font-size: 14px; }
      .invoice-title { margin: 5px 0; color: #666; }
      .info-section { display: flex; justify-content: space-between; margin-bottom: 30px; }
      .info-group { flex: 1; }
      .info-group p { margin: 5px 0; }
      table { width: 100%; border-collapse: collapse; margin-bottom: 20px; }
      th, td { padding: 12px; text-align: left; border-bottom: 1px solid #eee; }
      th { background-color: #f8f9fa; font-weight: bold; }
      .amounts { margin-top: 20px; text-align: right; }
      .amounts p { margin: 5px 0; }
      .total { font-size: 18px; font-weight: bold; color: #2563eb; }
      .footer { margin-top: 50px; text-align: center; color: #666; font-size: 14px; }
      @media print {
        body { print-color-adjust: exact; -webkit-print-color-adjust: exact; }
      }
"#;

pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a receipt to HTML. Output depends only on the inputs.
pub fn to_html(receipt: &Receipt, currency: &CurrencyFormat) -> Document {
    let money = |amount| escape_html(&format_currency(amount, currency));
    let title = format!("Factura {}", receipt.number);

    // Writing into a String cannot fail
    let mut html = String::new();
    let _ = writeln!(html, "<!DOCTYPE html>");
    let _ = writeln!(html, "<html>");
    let _ = writeln!(html, "  <head>");
    let _ = writeln!(html, "    <meta charset=\"UTF-8\">");
    let _ = writeln!(html, "    <title>{}</title>", escape_html(&title));
    let _ = writeln!(html, "    <style>");
    html.push_str(STYLE);
    let _ = writeln!(html, "    </style>");
    let _ = writeln!(html, "  </head>");
    let _ = writeln!(html, "  <body>");
    let _ = writeln!(html, "    <div class=\"invoice\">");

    let _ = writeln!(html, "      <div class=\"header\">");
    let _ = writeln!(
        html,
        "        <h1 class=\"business-name\">{}</h1>",
        escape_html(&receipt.business_name)
    );
    if let Some(address) = &receipt.business_address {
        let _ = writeln!(
            html,
            "        <p class=\"business-contact\">{}</p>",
            escape_html(address)
        );
    }
    if let Some(phone) = &receipt.business_phone {
        let _ = writeln!(
            html,
            "        <p class=\"business-contact\">Tel: {}</p>",
            escape_html(phone)
        );
    }
    let _ = writeln!(
        html,
        "        <p class=\"invoice-title\">{}</p>",
        escape_html(&receipt.title)
    );
    let _ = writeln!(
        html,
        "        <p class=\"invoice-title\">N° {}</p>",
        escape_html(&receipt.number)
    );
    let _ = writeln!(html, "      </div>");

    let _ = writeln!(html, "      <div class=\"info-section\">");
    let _ = writeln!(html, "        <div class=\"info-group\">");
    let _ = writeln!(
        html,
        "          <p><strong>Cliente:</strong> {}</p>",
        escape_html(&receipt.client_name)
    );
    let _ = writeln!(
        html,
        "          <p><strong>Teléfono:</strong> {}</p>",
        escape_html(&receipt.client_phone)
    );
    let _ = writeln!(
        html,
        "          <p><strong>Fecha:</strong> {}</p>",
        escape_html(&receipt.date)
    );
    let _ = writeln!(html, "        </div>");
    let _ = writeln!(
        html,
        "        <div class=\"info-group\" style=\"text-align: right;\">"
    );
    let _ = writeln!(
        html,
        "          <p><strong>Método de Pago:</strong> {}</p>",
        escape_html(&receipt.method)
    );
    if let Some(reference) = &receipt.reference {
        let _ = writeln!(
            html,
            "          <p><strong>Referencia:</strong> {}</p>",
            escape_html(reference)
        );
    }
    let _ = writeln!(
        html,
        "          <p><strong>Crédito N°:</strong> {}</p>",
        escape_html(&receipt.credit_code)
    );
    let _ = writeln!(html, "        </div>");
    let _ = writeln!(html, "      </div>");

    let _ = writeln!(html, "      <table>");
    let _ = writeln!(html, "        <thead>");
    let _ = writeln!(html, "          <tr>");
    let _ = writeln!(html, "            <th>Producto</th>");
    let _ = writeln!(html, "            <th style=\"text-align: center;\">Cantidad</th>");
    let _ = writeln!(html, "            <th style=\"text-align: right;\">Precio Unit.</th>");
    let _ = writeln!(html, "            <th style=\"text-align: right;\">Subtotal</th>");
    let _ = writeln!(html, "          </tr>");
    let _ = writeln!(html, "        </thead>");
    let _ = writeln!(html, "        <tbody>");
    for line in &receipt.lines {
        let _ = writeln!(html, "          <tr>");
        let _ = writeln!(html, "            <td>{}</td>", escape_html(&line.name));
        let _ = writeln!(
            html,
            "            <td style=\"text-align: center;\">{}</td>",
            line.quantity
        );
        let _ = writeln!(
            html,
            "            <td style=\"text-align: right;\">{}</td>",
            money(line.unit_price)
        );
        let _ = writeln!(
            html,
            "            <td style=\"text-align: right;\">{}</td>",
            money(line.subtotal)
        );
        let _ = writeln!(html, "          </tr>");
    }
    let _ = writeln!(html, "        </tbody>");
    let _ = writeln!(html, "      </table>");

    let _ = writeln!(html, "      <div class=\"amounts\">");
    let _ = writeln!(
        html,
        "        <p><strong>Total del Crédito:</strong> {}</p>",
        money(receipt.credit_total)
    );
    let _ = writeln!(
        html,
        "        <p><strong>Monto Pagado:</strong> {}</p>",
        money(receipt.amount_paid)
    );
    let _ = writeln!(
        html,
        "        <p class=\"total\"><strong>Saldo Pendiente:</strong> {}</p>",
        money(receipt.remaining)
    );
    let _ = writeln!(html, "      </div>");

    let _ = writeln!(html, "      <div class=\"footer\">");
    let _ = writeln!(html, "        <p>¡Gracias por su pago!</p>");
    let _ = writeln!(
        html,
        "        <p>Este documento es un comprobante válido de su pago.</p>"
    );
    let _ = writeln!(html, "      </div>");
    let _ = writeln!(html, "    </div>");
    let _ = writeln!(html, "  </body>");
    let _ = writeln!(html, "</html>");

    Document { title, html }
}
