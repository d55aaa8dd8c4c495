mod settings;
mod state;

pub use settings::{Business, Config, CreditSettings, ReceiptSettings};
pub use state::{Counter, State};

use crate::error::{Result, StoreError};
use crate::model::Product;
use crate::money::validate_amount;
use chrono::format::{Item, StrftimeItems};
use directories::ProjectDirs;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Get the config directory path (XDG config dir, falling back to ~/.tienda/)
pub fn config_dir() -> Result<PathBuf> {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "tienda") {
        return Ok(proj_dirs.config_dir().to_path_buf());
    }

    let home = dirs_home().ok_or_else(|| {
        StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Could not determine home directory",
        ))
    })?;

    Ok(home.join(".tienda"))
}

fn dirs_home() -> Option<PathBuf> {
    std::env::var_os("HOME").map(PathBuf::from)
}

/// Expand ~ in paths
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs_home() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Receipt output directory; relative paths live under the config dir
pub fn resolve_output_dir(output_dir: &str, config_dir: &Path) -> PathBuf {
    let path = expand_path(output_dir);
    if path.is_absolute() {
        path
    } else {
        config_dir.join(path)
    }
}

fn read_toml<T: serde::de::DeserializeOwned>(path: PathBuf) -> Result<T> {
    if !path.exists() {
        return Err(StoreError::ConfigFileNotFound(path));
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).map_err(|e| StoreError::ConfigParse { path, source: e })
}

/// Load the main config.toml
pub fn load_config(config_dir: &Path) -> Result<Config> {
    let config: Config = read_toml(config_dir.join("config.toml"))?;
    validate_date_format(&config.receipt.date_format)?;
    Ok(config)
}

/// chrono panics when displaying a bad format string, so reject it up front
fn validate_date_format(format: &str) -> Result<()> {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(StoreError::InvalidDateFormat(format.to_string()));
    }
    Ok(())
}

/// Load products.toml keyed by product code. Negative prices are rejected.
pub fn load_products(config_dir: &Path) -> Result<BTreeMap<String, Product>> {
    let products: BTreeMap<String, Product> = read_toml(config_dir.join("products.toml"))?;
    for (code, product) in &products {
        validate_amount(product.price, &format!("price of {code}"))?;
    }
    Ok(products)
}

/// Load state.toml (empty state if missing)
pub fn load_state(config_dir: &Path) -> Result<State> {
    let path = config_dir.join("state.toml");
    if !path.exists() {
        return Ok(State::default());
    }
    let state: State = read_toml(path)?;
    debug!(
        credits = state.credits.len(),
        sales = state.sales.len(),
        staff = state.staff.len(),
        "loaded state"
    );
    Ok(state)
}

/// Save state.toml
pub fn save_state(config_dir: &Path, state: &State) -> Result<()> {
    let path = config_dir.join("state.toml");
    let content = toml::to_string_pretty(state).map_err(|e| StoreError::StateWrite {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    fs::write(path, content)?;
    Ok(())
}

/// Template content for config.toml
pub const CONFIG_TEMPLATE: &str = r#"[business]
name = "Mi Tienda"
# phone = "+57 300 000 0000"    # optional
# address = "Calle 10 # 5-20"   # optional

[currency]
symbol = "$"
thousands_separator = ","
decimal_separator = "."

[receipt]
date_format = "%d/%m/%Y"
output_dir = "receipts"   # relative to this directory, or absolute / ~/...

[credits]
code_format = "CR-{seq:04}"  # e.g., CR-0001
"#;

/// Template content for products.toml
pub const PRODUCTS_TEMPLATE: &str = r#"# Product catalog. The table name (e.g., [camisa]) is the product code
# used with --item.
#
# Example:
#   tienda credit-new --client "Ana" --phone 3000000000 --item camisa:2

[camisa]
name = "Camisa de algodón"
price = "45000"

[pantalon]
name = "Pantalón jean"
price = "89900"

[medias]
name = "Medias (par)"
price = "8500"
# image_url = "https://example.com/medias.png"   # optional
"#;
