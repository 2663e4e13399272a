pub mod blob;
pub mod defaults;
pub mod file;
pub mod handlers;
pub mod repository;
pub mod resume;

pub use blob::BlobRepository;
pub use file::FileRepository;
pub use repository::{ContentRepository, StorageError};
