use std::{
    env,
    net::{IpAddr, Ipv4Addr, SocketAddr},
    time::Duration,
};

use anyhow::bail;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub listen_addr: SocketAddr,
    pub model_endpoint: String,
    pub model_id: String,
    pub max_new_tokens: usize,
    pub temperature: f64,
    pub model_timeout: Duration,
    pub image_size: u32,
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::new(IpAddr::V4(Ipv4Addr::LOCALHOST), 8000),
            model_endpoint: "http://localhost:11434".to_string(),
            model_id: "gemma3:4b".to_string(),
            max_new_tokens: 256,
            temperature: 0.0,
            model_timeout: Duration::from_secs(300),
            image_size: 640,
            max_upload_bytes: 20 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();

        let listen_addr = env::var("SERVER_ADDR")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(defaults.listen_addr);

        let model_endpoint = env::var("MODEL_ENDPOINT")
            .unwrap_or(defaults.model_endpoint)
            .trim()
            .trim_end_matches('/')
            .to_string();
        let model_id = env::var("MODEL_ID").unwrap_or(defaults.model_id);

        let max_new_tokens = parse_or("MAX_NEW_TOKENS", defaults.max_new_tokens);
        let temperature = parse_or("TEMPERATURE", defaults.temperature);
        let model_timeout = env::var("MODEL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.model_timeout);
        let image_size = parse_or("IMAGE_SIZE", defaults.image_size);
        let max_upload_bytes = parse_or("MAX_UPLOAD_BYTES", defaults.max_upload_bytes);

        let config = Self {
            listen_addr,
            model_endpoint,
            model_id,
            max_new_tokens,
            temperature,
            model_timeout,
            image_size,
            max_upload_bytes,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.model_endpoint.is_empty() {
            bail!("MODEL_ENDPOINT must not be empty");
        }
        if self.model_id.trim().is_empty() {
            bail!("MODEL_ID must not be empty");
        }
        if self.image_size == 0 {
            bail!("IMAGE_SIZE must be greater than zero");
        }
        Ok(())
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, fallback: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(fallback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.image_size, 640);
        assert_eq!(config.max_new_tokens, 256);
    }

    #[test]
    fn zero_image_size_is_rejected() {
        let config = AppConfig {
            image_size: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_endpoint_is_rejected() {
        let config = AppConfig {
            model_endpoint: String::new(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
