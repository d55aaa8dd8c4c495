use serde::{Deserialize, Serialize};

use crate::money::CurrencyFormat;
use crate::receipt::RenderOptions;

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    pub business: Business,
    #[serde(default)]
    pub currency: CurrencyFormat,
    #[serde(default)]
    pub receipt: ReceiptSettings,
    #[serde(default)]
    pub credits: CreditSettings,
}

impl Config {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            currency: self.currency.clone(),
            date_format: self.receipt.date_format.clone(),
            business_phone: self.business.phone.clone(),
            business_address: self.business.address.clone(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Business {
    pub name: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ReceiptSettings {
    #[serde(default = "default_date_format")]
    pub date_format: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ReceiptSettings {
    fn default() -> Self {
        Self {
            date_format: default_date_format(),
            output_dir: default_output_dir(),
        }
    }
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

fn default_output_dir() -> String {
    "receipts".to_string()
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CreditSettings {
    #[serde(default = "default_code_format")]
    pub code_format: String,
}

impl Default for CreditSettings {
    fn default() -> Self {
        Self {
            code_format: default_code_format(),
        }
    }
}

fn default_code_format() -> String {
    "CR-{seq:04}".to_string()
}
