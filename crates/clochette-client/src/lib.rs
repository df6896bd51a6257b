//! Backend clients
//!
//! `HttpBackend` talks to the real REST backend, `MemoryBackend` keeps a
//! seeded store in process for offline demos and tests.

pub mod error;
pub mod http;
pub mod memory;

pub use error::{error_message, status_error};
pub use http::HttpBackend;
pub use memory::MemoryBackend;
