mod dispatch;
mod metrics;
mod root;

pub use dispatch::dispatch_handler;
pub use metrics::{METRICS_BODY, metrics_handler};
pub use root::root_handler;
