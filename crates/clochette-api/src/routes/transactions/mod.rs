//! Transaction routes - History, pagination and detail
//!
//! Structure:
//! - api.rs: list partial, detail modal, range collection helper
//! - page.rs: Full page and row rendering

pub mod api;
pub mod page;

pub use api::{htmx_transaction_detail, htmx_transactions_list};
pub(crate) use api::transactions_in_range;
pub use page::page_transactions;
