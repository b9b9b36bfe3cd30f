//! Core types and trait definitions for the addrbook contact service.
//!
//! This crate is deliberately free of HTTP and database dependencies.
//! The store backend and the API layer both depend on it.

pub mod contact;
pub mod store;

pub use contact::{Contact, ContactFilter, ContactPatch, NewContact};
pub use store::ContactStore;
