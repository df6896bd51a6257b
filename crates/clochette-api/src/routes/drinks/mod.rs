//! Drink routes - Drinks served from barrels
//!
//! Structure:
//! - api.rs: HTMX endpoints (list, create, edit, update, delete)
//! - page.rs: Full page and fragment rendering

pub mod api;
pub mod page;

pub use api::{htmx_drink_create, htmx_drink_delete, htmx_drink_edit_form, htmx_drink_update, htmx_drinks_list};
pub use page::page_drinks;
