use rust_decimal::Decimal;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Config directory not found at {0}. Run 'tienda init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {path}: {reason}")]
    StateWrite { path: PathBuf, reason: String },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Invalid amount for {field}: {value}")]
    InvalidAmount { field: String, value: Decimal },

    #[error("Payment identifier '{0}' has no timestamp token")]
    MalformedIdentifier(String),

    #[error("Credit '{0}' not found")]
    CreditNotFound(String),

    #[error("Credit '{0}' already exists")]
    DuplicateCredit(String),

    #[error("Payment '{payment}' not found on credit {credit}")]
    PaymentNotFound { credit: String, payment: String },

    #[error("Sale '{0}' not found")]
    SaleNotFound(String),

    #[error("Staff member '{0}' not found")]
    StaffNotFound(String),

    #[error("Staff member '{0}' already exists")]
    DuplicateStaff(String),

    #[error("Client '{0}' already exists")]
    DuplicateClient(String),

    #[error("Invalid credit index '{0}'. Use 'tienda credits' to see available credits.")]
    InvalidCreditIndex(String),

    #[error("Product '{0}' not found in products.toml")]
    ProductNotFound(String),

    #[error("Payment would exceed credit balance (max {max} remaining on {credit})")]
    OverPayment { credit: String, max: Decimal },

    #[error("Payment '{0}' is already cancelled")]
    AlreadyCancelled(String),

    #[error("Invalid item format '{0}'. Expected 'product:quantity' (e.g., 'cafe:2')")]
    InvalidItemFormat(String),

    #[error("Invalid quantity '{qty}' for product '{product}': {reason}")]
    InvalidQuantity {
        product: String,
        qty: String,
        reason: String,
    },

    #[error("No items specified. Use --item <product>:<quantity> to add line items.")]
    NoItems,

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Invalid date_format '{0}' in config.toml")]
    InvalidDateFormat(String),

    #[error("Failed to encode receipt: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
