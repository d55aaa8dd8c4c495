mod catalog;
mod credit;
mod sale;
mod staff;

pub use catalog::{Client, Product};
pub use credit::{Credit, CreditItem, CreditStatus, Payment, PaymentMethod, PaymentStatus};
pub use sale::{sort_recent_first, Sale, SaleItem, SalePayment, StaffAttribution};
pub use staff::{StaffMember, StaffSaleRecord};
