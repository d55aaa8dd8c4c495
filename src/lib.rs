pub mod config;
pub mod error;
pub mod ledger;
pub mod model;
pub mod money;
pub mod ops;
pub mod present;
pub mod receipt;

pub use config::{Config, State};
pub use error::{Result, StoreError};
pub use ledger::{attach, commission, remaining};
pub use model::{Credit, Payment, PaymentMethod, Sale, StaffMember, StaffSaleRecord};
pub use present::{FilePresenter, Presenter, StdoutPresenter};
pub use receipt::{render, render_with, Document, Receipt, RenderOptions};
