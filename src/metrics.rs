use lazy_static::lazy_static;
use prometheus::{Counter, Histogram, register_counter, register_histogram};


lazy_static! {
    pub static ref REQUEST_TOTAL: Counter =
        register_counter!("supporters_requests_total", "Total number of supporters requests").unwrap();
    pub static ref SUPPORTERS_ADDED: Counter =
        register_counter!("supporters_added_total", "New supporters appended to the list").unwrap();
    pub static ref DUPLICATE_SUBMISSIONS: Counter =
        register_counter!("supporters_duplicates_total", "Submissions of an already listed name").unwrap();
    pub static ref RATE_LIMITED: Counter =
        register_counter!("supporters_rate_limited_total", "Requests rejected by the rate limiter").unwrap();
    pub static ref STORE_ERRORS: Counter =
        register_counter!("supporters_store_errors_total", "Key-value store failures").unwrap();
    pub static ref REQUEST_LATENCY: Histogram = register_histogram!(
        "supporters_request_latency_seconds",
        "Request latency in seconds"
    )
    .unwrap();
}
