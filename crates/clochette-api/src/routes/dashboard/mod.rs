//! Dashboard route - Bar overview

pub mod page;

pub use page::page_dashboard;
