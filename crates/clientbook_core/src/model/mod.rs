//! Domain records for the client and item books.
//!
//! # Responsibility
//! - Define canonical record shapes shared by every storage backend.
//! - Own field validation so repositories never persist invalid state.
//!
//! # Invariants
//! - A `Client` value that escapes a constructor or setter is always valid.
//! - Identity (`ClientId`/`ItemId`) is assigned by repositories, not callers,
//!   for clients; items carry caller-provided ids.

pub mod client;
pub mod item;
