//! Default value functions used by serde for config deserialization.

pub fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

pub fn default_request_timeout() -> u64 {
    30
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_capacity() -> usize {
    100
}

pub fn default_max_retry_delay() -> u64 {
    60_000
}
