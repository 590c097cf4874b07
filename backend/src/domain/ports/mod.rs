//! Domain ports: the edges the domain drives.
//!
//! Adapters under `outbound` implement these traits; HTTP handlers only ever
//! see the trait objects.

mod entry_repository;
mod token_verifier;

#[cfg(test)]
pub use entry_repository::MockEntryRepository;
pub use entry_repository::{EntryRepository, EntryRepositoryError, InMemoryEntryRepository};
#[cfg(test)]
pub use token_verifier::MockTokenVerifier;
pub use token_verifier::TokenVerifier;
