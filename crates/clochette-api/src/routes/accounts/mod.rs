//! Account routes - Staff accounts, restricted to managers
//!
//! Structure:
//! - api.rs: HTMX endpoints (list, create, edit, update, delete)
//! - page.rs: Full page and fragment rendering

pub mod api;
pub mod page;

pub use api::{htmx_account_create, htmx_account_delete, htmx_account_edit_form, htmx_account_update, htmx_accounts_list};
pub use page::page_accounts;
