//! Non-inventoried item routes - EcoCup deposit, services, supplies

pub mod api;
pub mod page;

pub use api::{htmx_item_create, htmx_item_delete, htmx_item_edit_form, htmx_item_update, htmx_items_list};
pub use page::page_items;
