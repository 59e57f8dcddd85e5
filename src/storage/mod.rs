//! Blob storage
//!
//! Uploaded file bytes live on the local filesystem under the content
//! directory and are served back over `/uploads/<stored name>`.

pub mod blob_store;

pub use blob_store::{stored_name_for, BlobStore, BlobWriter, StoredBlob};
