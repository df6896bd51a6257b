//! Barrel routes - Kegs in stock and on tap
//!
//! Structure:
//! - api.rs: HTMX endpoints (list, create, edit, update, delete, mount, unmount)
//! - page.rs: Full page and fragment rendering

pub mod api;
pub mod page;

pub use api::{
    htmx_barrel_create,
    htmx_barrel_delete,
    htmx_barrel_edit_form,
    htmx_barrel_mount,
    htmx_barrel_unmount,
    htmx_barrel_update,
    htmx_barrels_list,
};
pub use page::page_barrels;
