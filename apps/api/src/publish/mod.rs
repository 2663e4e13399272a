pub mod handlers;
pub mod pipeline;

pub use pipeline::{PublishPipeline, PublishReceipt};
