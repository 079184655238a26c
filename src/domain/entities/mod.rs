pub mod shared_file;
pub mod user;
