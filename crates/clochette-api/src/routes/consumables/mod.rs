//! Consumable routes - Stocked items sold as bought

pub mod api;
pub mod page;

pub use api::{htmx_consumable_create, htmx_consumable_delete, htmx_consumable_edit_form, htmx_consumable_update, htmx_consumables_list};
pub use page::page_consumables;
