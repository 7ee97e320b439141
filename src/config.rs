use std::{env, time::Duration};

/// Read-only demo endpoint used when no read URL is configured.
pub const DEFAULT_ENERGY_API_URL: &str =
    "https://functions.poehali.dev/0335f84a-22ea-47e1-ab0f-623e2884ffec";

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REFETCH_SECS: u64 = 5 * 60;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub read_url: String,
    pub write_url: String,
    pub is_using_default_read_only_endpoint: bool,
    pub port: u16,
    pub refetch_interval: Duration,
    pub http_timeout: Duration,
}

impl Config {
    /// Builds a config from explicit endpoints, applying the same fallbacks
    /// as the environment: read falls back to the demo endpoint, write falls
    /// back to read.
    pub fn new(read_url: Option<&str>, write_url: Option<&str>) -> Self {
        let read_url = non_empty(read_url).unwrap_or(DEFAULT_ENERGY_API_URL).to_string();
        let write_url = non_empty(write_url)
            .map(str::to_string)
            .unwrap_or_else(|| read_url.clone());

        Self {
            is_using_default_read_only_endpoint: write_url == DEFAULT_ENERGY_API_URL,
            read_url,
            write_url,
            port: DEFAULT_PORT,
            refetch_interval: Duration::from_secs(DEFAULT_REFETCH_SECS),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = lookup("ENERGY_API_URL");
        let write = lookup("ENERGY_CREATE_ENTRY_URL");
        let mut config = Self::new(read.as_deref(), write.as_deref());

        config.port = lookup("PORT")
            .and_then(|value| value.trim().parse::<u16>().ok())
            .unwrap_or(DEFAULT_PORT);
        config.refetch_interval = lookup("ENERGY_REFETCH_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(config.refetch_interval);
        config.http_timeout = lookup("ENERGY_HTTP_TIMEOUT_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(config.http_timeout);

        config
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_endpoints_fall_back_to_demo() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.read_url, DEFAULT_ENERGY_API_URL);
        assert_eq!(config.write_url, DEFAULT_ENERGY_API_URL);
        assert!(config.is_using_default_read_only_endpoint);
        assert_eq!(config.port, 8080);
        assert_eq!(config.refetch_interval, Duration::from_secs(300));
    }

    #[test]
    fn write_url_falls_back_to_read_url() {
        let config = Config::from_lookup(lookup_from(&[(
            "ENERGY_API_URL",
            "  https://example.test/energy  ",
        )]));
        assert_eq!(config.read_url, "https://example.test/energy");
        assert_eq!(config.write_url, "https://example.test/energy");
        assert!(!config.is_using_default_read_only_endpoint);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let config = Config::from_lookup(lookup_from(&[
            ("ENERGY_API_URL", "   "),
            ("ENERGY_CREATE_ENTRY_URL", ""),
        ]));
        assert_eq!(config.read_url, DEFAULT_ENERGY_API_URL);
        assert!(config.is_using_default_read_only_endpoint);
    }

    #[test]
    fn separate_write_endpoint_clears_hint() {
        let config = Config::new(None, Some("https://example.test/write"));
        assert_eq!(config.read_url, DEFAULT_ENERGY_API_URL);
        assert_eq!(config.write_url, "https://example.test/write");
        assert!(!config.is_using_default_read_only_endpoint);
    }

    #[test]
    fn numeric_settings_ignore_garbage() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("ENERGY_REFETCH_SECS", "0"),
            ("ENERGY_HTTP_TIMEOUT_SECS", "3"),
        ]));
        assert_eq!(config.port, 8080);
        assert_eq!(config.refetch_interval, Duration::from_secs(300));
        assert_eq!(config.http_timeout, Duration::from_secs(3));
    }
}
