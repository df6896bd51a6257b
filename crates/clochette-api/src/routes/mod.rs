//! Route modules for the API server
//!
//! Each module follows a consistent structure:
//! - mod.rs: Module declaration and exports
//! - api.rs: JSON API endpoints and HTMX partials
//! - page.rs: Full page rendering

pub mod accounts;
pub mod auth;
pub mod barrels;
pub mod consumables;
pub mod dashboard;
pub mod drinks;
pub mod items;
pub mod pos;
pub mod settings;
pub mod time;
pub mod transactions;
pub mod treasury;
