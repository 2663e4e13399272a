//! Generic nested-document editor: path-addressed read/mutate/append/remove
//! over a JSON document, plus the edit-buffer both content editors share.

pub mod path;
pub mod session;
pub mod store;

pub use path::{PathAddress, PathError, Step};
pub use session::EditSession;
