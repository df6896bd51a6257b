//! Treasury routes - Balances and period summary

pub mod api;
pub mod page;

pub use api::api_treasury;
pub use page::page_treasury;
