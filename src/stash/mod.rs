//! Retrieval of records from a running Stash server over GraphQL.

mod client;
pub mod queries;

pub use client::StashClient;
