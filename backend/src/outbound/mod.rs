//! Outbound adapters implementing the domain ports.
//!
//! - [`persistence`]: PostgreSQL entry store via Diesel.
//! - [`file_store`]: JSON-file entry store for single-node deployments.
//! - [`jwks`]: bearer-token verification against an issuer's key set.

pub mod file_store;
pub mod jwks;
pub mod persistence;
