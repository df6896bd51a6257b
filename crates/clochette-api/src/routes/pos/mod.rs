//! Point of sale routes - Sale and purchase carts
//!
//! The cart of each page lives in `AppState::carts` under the session key
//! and is reset every time the page itself is loaded.

pub mod api;
pub mod page;

pub use api::{api_purchase_cart, api_sale_cart, htmx_purchase_cart, htmx_purchase_checkout, htmx_sale_cart, htmx_sale_checkout};
pub use page::{page_purchase, page_sale};
