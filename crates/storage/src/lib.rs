pub mod http;
pub mod repository;

pub use repository::{Storage, StorageError};
