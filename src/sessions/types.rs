//! Session types

use serde::{Deserialize, Serialize};

/// Metadata for one uploaded file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    /// Unique record ID
    pub id: String,

    /// Original file name as sent by the client (untrusted)
    pub name: String,

    /// Content length in bytes
    pub size: u64,

    /// Client-declared MIME type (untrusted)
    #[serde(rename = "type")]
    pub mime_type: String,

    /// Absolute URL the blob can be downloaded from
    pub url: String,

    /// Upload time, Unix milliseconds
    pub created_at: i64,

    /// Name of the blob inside the content directory
    #[serde(skip)]
    pub stored_name: String,
}
