//! Record store facade over the storage primitives.
//!
//! # Responsibility
//! - Route content URIs to table operations and normalize selections per
//!   route before delegating to the engine.
//!
//! # Invariants
//! - Every operation classifies the URI first; unrecognized routes never
//!   reach the engine.
//! - The store holds no state beyond the injected connection and router.

pub mod record_store;
