// Exportar los módulos principales del proyecto
pub mod common;
pub mod domain;
pub mod application;
pub mod infrastructure;

// Re-exportaciones públicas comunes
pub use application::services::file_upload_service::FileUploadService;
pub use application::services::file_retrieval_service::FileRetrievalService;
pub use application::services::file_management_service::FileManagementService;
pub use application::services::search_service::SearchService;
pub use application::services::profile_service::ProfileService;
pub use domain::services::id_service::IdGenerator;
pub use infrastructure::repositories::blob_fs_repository::BlobFsRepository;
pub use infrastructure::repositories::user_sqlite_repository::UserSqliteRepository;
pub use infrastructure::repositories::shared_file_sqlite_repository::SharedFileSqliteRepository;
