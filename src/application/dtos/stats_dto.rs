use serde::Serialize;

use crate::domain::repositories::shared_file_repository::OwnerStats;
use crate::domain::services::classification::format_size;

/// DTO for per-owner aggregate statistics.
///
/// Siempre presente y a cero para propietarios sin archivos.
#[derive(Debug, Clone, Serialize)]
pub struct OwnerStatsDto {
    /// Number of files the owner has
    pub file_count: u64,

    /// Sum of all file sizes in bytes
    pub total_bytes: u64,

    /// Human-readable total size
    pub total_bytes_formatted: String,

    /// Sum of all download counters
    pub total_downloads: u64,
}

impl From<OwnerStats> for OwnerStatsDto {
    fn from(stats: OwnerStats) -> Self {
        Self {
            file_count: stats.file_count,
            total_bytes: stats.total_bytes,
            total_bytes_formatted: format_size(stats.total_bytes),
            total_downloads: stats.total_downloads,
        }
    }
}
