use clap::Parser;
use std::time::Duration;

// CLI argument structure, every option can also come from the environment
#[derive(Parser, Debug, Clone)]
#[command(name = "supporter-registry")]
#[command(about = "Deduplicated, rate-limited supporter list over a REST key-value store")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    // Base URL of the key-value store's REST API
    #[arg(long, env = "KV_REST_API_URL")]
    pub kv_url: Option<String>,

    // Bearer token for the key-value store
    #[arg(long, env = "KV_REST_API_TOKEN", hide_env_values = true)]
    pub kv_token: Option<String>,

    // POSTs allowed per client IP per window
    #[arg(long, env = "SUPPORTERS_RATE_LIMIT", default_value_t = 5)]
    pub rate_limit: i64,

    // Rate limit window in seconds
    #[arg(long, env = "SUPPORTERS_RATE_WINDOW", default_value_t = 30)]
    pub rate_window: u64,

    // Most recent supporters kept in the list
    #[arg(long, env = "SUPPORTERS_MAX", default_value_t = 1000, value_parser = clap::value_parser!(u32).range(1..))]
    pub max_supporters: u32,

    // Longest accepted username, in UTF-16 code units
    #[arg(long, env = "SUPPORTERS_MAX_NAME_LEN", default_value_t = 50)]
    pub max_name_len: usize,

    // Serve from a process-local store instead of the REST store (development only)
    #[arg(long, env = "SUPPORTERS_IN_MEMORY")]
    pub in_memory: bool,
}

impl Args {
    /// Store URL and token, only when both are set and non-empty.
    pub fn kv_credentials(&self) -> Option<(&str, &str)> {
        let url = self.kv_url.as_deref().filter(|s| !s.is_empty())?;
        let token = self.kv_token.as_deref().filter(|s| !s.is_empty())?;
        Some((url, token))
    }

    pub fn limits(&self) -> Limits {
        Limits {
            rate_limit: self.rate_limit,
            rate_window: Duration::from_secs(self.rate_window),
            max_supporters: self.max_supporters,
            max_name_len: self.max_name_len,
        }
    }
}

// Request limits applied by the supporters handler
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    pub rate_limit: i64,       // max POSTs per window
    pub rate_window: Duration, // counter time-to-live
    pub max_supporters: u32,   // retained list length
    pub max_name_len: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            rate_limit: 5,
            rate_window: Duration::from_secs(30),
            max_supporters: 1000,
            max_name_len: 50,
        }
    }
}
