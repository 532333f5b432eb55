use serde::Deserialize;
use std::time::Duration;

/// Backend resource used when `CREDITO_API_URL` is not set.
pub const DEFAULT_CREDITO_API_URL: &str = "http://localhost:8080/api/creditos";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub credito_api_url: String,
    pub port: u16,
    pub http_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self::from_lookup(|key| std::env::var(key).ok())?;

        tracing::info!("Configuration loaded successfully");
        tracing::debug!("Credito API URL: {}", config.credito_api_url);
        tracing::debug!("Server Port: {}", config.port);
        tracing::debug!("HTTP timeout: {}s", config.http_timeout_secs);

        Ok(config)
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            credito_api_url: Ok::<_, anyhow::Error>(
                lookup("CREDITO_API_URL").unwrap_or_else(|| DEFAULT_CREDITO_API_URL.to_string()),
            )
            .and_then(|url| {
                let url = url.trim().trim_end_matches('/').to_string();
                if url.is_empty() {
                    anyhow::bail!("CREDITO_API_URL cannot be empty");
                }
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("CREDITO_API_URL must start with http:// or https://");
                }
                Ok(url)
            })?,
            port: lookup("PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number between 1-65535"))?,
            http_timeout_secs: lookup("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|| "30".to_string())
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| anyhow::anyhow!("HTTP_TIMEOUT_SECS must be a positive integer"))?,
        })
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs)
    }
}
