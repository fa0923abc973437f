// --- File: crates/buslink_firestore/src/lib.rs ---
//! Firestore integration: REST client, typed-value codec, and the store
//! implementations backing the refund ledger and the trip catalog.

pub mod auth;
pub mod client;
pub mod mapping;
pub mod store;
pub mod value;


pub use client::{FirestoreClient, FirestoreError, Precondition, MAX_WRITES_PER_BATCH};
pub use store::{collections, FirestoreStore, LEGACY_ROUTE_FIELDS};
