//! Configuration for the remote API endpoint.

use anyhow::Result;

/// Default backend address when nothing else is configured.
const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

/// Remote API configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    /// Resolve the API base URL.
    ///
    /// Precedence: the `--api-url` flag, then the `CADERNETA_API_URL`
    /// environment variable (a `.env` file is loaded if present), then the
    /// local default. A trailing slash is trimmed so endpoint paths can be
    /// appended directly.
    pub fn resolve(flag: Option<String>) -> Result<Self> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let base_url = flag
            .or_else(|| std::env::var("CADERNETA_API_URL").ok())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Note: Environment variable tests are inherently racy when run in
    // parallel. The flag-based tests below avoid touching the environment.

    #[test]
    fn test_flag_takes_precedence() {
        let config = ApiConfig::resolve(Some("https://api.example.com".to_string())).unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
    }

    #[test]
    fn test_trailing_slash_trimmed() {
        let config = ApiConfig::resolve(Some("https://api.example.com/".to_string())).unwrap();
        assert_eq!(config.base_url, "https://api.example.com");
    }

    #[test]
    fn test_env_variable_used_when_no_flag() {
        std::env::set_var("CADERNETA_API_URL", "https://env.example.com");
        let config = ApiConfig::resolve(None).unwrap();
        assert_eq!(config.base_url, "https://env.example.com");
        std::env::remove_var("CADERNETA_API_URL");
    }
}
