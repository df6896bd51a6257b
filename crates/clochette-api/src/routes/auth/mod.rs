//! Authentication routes - Login form, logout, session info
//!
//! Structure:
//! - api.rs: Login/logout handlers and session JSON
//! - page.rs: Login page rendering

pub mod api;
pub mod page;

pub use api::{api_session, htmx_login, htmx_logout};
pub use page::page_login;
