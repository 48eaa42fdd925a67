use std::path::PathBuf;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (default: 127.0.0.1)
    pub server_host: String,

    /// Server port (default: 4000)
    pub server_port: u16,

    /// Environment: development, production, test
    pub environment: String,

    /// JWT signing secret for access tokens
    pub jwt_secret: String,

    /// Access token lifetime in minutes (default: 15)
    pub access_token_ttl_mins: u64,

    /// Refresh credential lifetime in days, used for the cookie Max-Age
    /// (default: 7)
    pub refresh_token_ttl_days: i64,

    /// Password-reset token lifetime in hours (default: 24)
    pub reset_token_ttl_hours: i64,

    /// Simulated network latency applied to every response, in milliseconds
    /// (default: 500)
    pub latency_ms: u64,

    /// Directory holding the persisted accounts file. `None` disables
    /// persistence entirely (used by the test harness).
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables (with .env support).
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        // Load .env file if present (ignore errors if missing)
        let _ = dotenvy::dotenv();

        Ok(Config {
            server_host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            server_port: std::env::var("SERVER_PORT")
                .unwrap_or_else(|_| "4000".to_string())
                .parse()
                .unwrap_or(4000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            jwt_secret: std::env::var("JWT_SECRET")
                .unwrap_or_else(|_| "mockhr-dev-secret-change-me".to_string()),
            access_token_ttl_mins: std::env::var("ACCESS_TOKEN_TTL_MINS")
                .unwrap_or_else(|_| "15".to_string())
                .parse()
                .unwrap_or(15),
            refresh_token_ttl_days: std::env::var("REFRESH_TOKEN_TTL_DAYS")
                .unwrap_or_else(|_| "7".to_string())
                .parse()
                .unwrap_or(7),
            reset_token_ttl_hours: std::env::var("RESET_TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .unwrap_or(24),
            latency_ms: std::env::var("LATENCY_MS")
                .unwrap_or_else(|_| "500".to_string())
                .parse()
                .unwrap_or(500),
            data_dir: Some(PathBuf::from(
                std::env::var("DATA_DIR").unwrap_or_else(|_| "./data".to_string()),
            )),
        })
    }

    /// A configuration suitable for embedding in tests: no latency, no
    /// persistence, a fixed signing secret.
    pub fn for_tests() -> Self {
        Config {
            server_host: "127.0.0.1".to_string(),
            server_port: 0, // OS assigns a random port
            environment: "test".to_string(),
            jwt_secret: "test-secret-key-for-testing".to_string(),
            access_token_ttl_mins: 15,
            refresh_token_ttl_days: 7,
            reset_token_ttl_hours: 24,
            latency_ms: 0,
            data_dir: None,
        }
    }

    /// Check if running in development mode.
    pub fn is_dev(&self) -> bool {
        self.environment == "development"
    }

    /// Get the full server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
