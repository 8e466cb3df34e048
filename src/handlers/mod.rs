mod health;
mod metrics;
mod supporters;

pub use health::health_handler;
pub use metrics::metrics_handler;
pub use supporters::{normalize_username, supporters_handler};
