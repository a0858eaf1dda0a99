use crate::VenueConfig;

pub fn default_enabled() -> bool {
    true
}

pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub fn default_http_port() -> u16 {
    3000
}

pub fn default_max_connections() -> u32 {
    20
}

pub fn default_connect_timeout_seconds() -> u64 {
    30
}

pub fn default_max_attempts() -> u32 {
    3
}

pub fn default_concurrency() -> usize {
    10
}

pub fn default_retry_backoff_ms() -> u64 {
    500
}

pub fn default_queue_key() -> String {
    "dexflow:orders".to_string()
}

pub fn default_log_format() -> String {
    "pretty".to_string()
}

/// The stock simulated venues and their fee/band parameters.
pub fn default_venues() -> Vec<VenueConfig> {
    vec![
        VenueConfig {
            name: "raydium".to_string(),
            price_band: [0.98, 1.02],
            fee: 0.003,
            enabled: true,
        },
        VenueConfig {
            name: "meteora".to_string(),
            price_band: [0.97, 1.02],
            fee: 0.002,
            enabled: true,
        },
    ]
}
