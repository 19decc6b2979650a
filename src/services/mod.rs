pub mod completion;
pub mod metrics;

pub use completion::CompletionClient;
pub use metrics::{get_metrics, init_metrics};
