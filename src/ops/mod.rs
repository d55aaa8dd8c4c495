//! State-changing workflows behind the CLI commands.
//!
//! These operate on an in-memory [`State`](crate::config::State); loading and
//! saving it is left to the caller.

mod credits;
mod items;
mod sales;

pub use credits::{
    add_payment, cancel_payment, delete_credit, delete_payment, next_credit_code, open_credit,
    NewCredit, NewPayment,
};
pub use items::{parse_item_input, resolve_items, ResolvedItem};
pub use sales::{delete_sale, record_sale, NewSale, RecordedSale};
