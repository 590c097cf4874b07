//! Journal backend library: domain, adapters and configuration.
//!
//! The binary in `main.rs` only loads settings, builds the adapters and
//! starts the server; everything it wires lives here so integration tests
//! can assemble the same app.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use middleware::Trace;
