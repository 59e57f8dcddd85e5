//! LAN Drop Server Library
//!
//! Exposes the building blocks of the server so the binary in main.rs and
//! the integration tests can assemble the same router.
//!
//! # Modules
//!
//! - `storage`: Blob store over the content directory
//! - `sessions`: In-memory session registry and file records
//! - `routes`: HTTP handlers and router assembly

pub mod clock;
pub mod config;
pub mod error;
pub mod network;
pub mod retention;
pub mod routes;
pub mod sessions;
pub mod state;
pub mod storage;
