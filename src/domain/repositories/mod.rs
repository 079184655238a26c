pub mod shared_file_repository;
pub mod user_repository;
