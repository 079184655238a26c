pub mod blob_fs_repository;
pub mod shared_file_sqlite_repository;
pub mod user_sqlite_repository;

pub use blob_fs_repository::BlobFsRepository;
pub use shared_file_sqlite_repository::SharedFileSqliteRepository;
pub use user_sqlite_repository::UserSqliteRepository;
