use serde::Serialize;
use chrono::{DateTime, Utc};

use crate::domain::entities::shared_file::SharedFile;
use crate::domain::services::classification::format_size;

/// DTO for shared-file responses
#[derive(Debug, Clone, Serialize)]
pub struct FileDto {
    /// Opaque file identifier
    pub id: String,

    /// Name the file was uploaded with
    pub original_name: String,

    /// Size in bytes
    pub size_bytes: u64,

    /// Human-readable size ("1.50 KB")
    pub size_formatted: String,

    /// Declared MIME type
    pub mime_type: String,

    /// Derived category tag
    pub category: String,

    /// Optional description
    pub description: Option<String>,

    /// Times the file has been downloaded
    pub download_count: u64,

    /// Public URL the host serves the blob under
    pub public_url: String,

    /// Upload timestamp
    pub created_at: DateTime<Utc>,

    /// Last successful download
    pub last_accessed_at: DateTime<Utc>,
}

impl From<SharedFile> for FileDto {
    fn from(file: SharedFile) -> Self {
        Self {
            id: file.id().to_string(),
            original_name: file.original_name().to_string(),
            size_bytes: file.size_bytes(),
            size_formatted: format_size(file.size_bytes()),
            mime_type: file.mime_type().to_string(),
            category: file.category().as_str().to_string(),
            description: file.description().map(|d| d.to_string()),
            download_count: file.download_count(),
            public_url: file.public_url().to_string(),
            created_at: file.created_at(),
            last_accessed_at: file.last_accessed_at(),
        }
    }
}
