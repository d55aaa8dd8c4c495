//! Balance and commission arithmetic.
//!
//! Everything here is a pure function over its inputs; persistence of the
//! returned values is up to the caller.

mod balance;
mod commission;
mod ids;

pub use balance::remaining;
pub use commission::{attach, commission, staff_record_for_sale};
pub use ids::{commission_record_id, credit_id, format_credit_code, payment_id, sale_id};
