use serde::Deserialize;
use std::{fs, path::PathBuf};
use time::UtcOffset;

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    pub data_path: PathBuf,
}

fn default_session_ttl_secs() -> u64 {
    7 * 24 * 60 * 60
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub session_secret: String,
    #[serde(default = "default_session_ttl_secs")]
    pub session_ttl_secs: u64,
}

/// Offset used for "today" when finding the billing cycle, and for
/// timestamps submitted without an explicit offset.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClockConfig {
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub bind_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub store: StoreConfig,
    pub auth: AuthConfig,
    #[serde(default)]
    pub clock: ClockConfig,
    pub metrics: Option<MetricsConfig>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        use std::env;

        let path = env::var("BILLFLOW_CONFIG").unwrap_or_else(|_| "billflow.toml".to_string());
        let contents = fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read config {path}: {e}"))?;
        Self::from_toml(&contents, |key| env::var(key).ok())
    }

    /// Parse a TOML document, then let `LOGIN_PASSWORD` and `SESSION_SECRET`
    /// (looked up through `env`) override the `[auth]` section.
    pub fn from_toml<F>(contents: &str, env: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg: AppConfig = toml::from_str(contents)?;

        if let Some(password) = env("LOGIN_PASSWORD").filter(|v| !v.is_empty()) {
            cfg.auth.password = password;
        }
        if let Some(secret) = env("SESSION_SECRET").filter(|v| !v.is_empty()) {
            cfg.auth.session_secret = secret;
        }

        if cfg.auth.password.is_empty() {
            anyhow::bail!("auth.password is not set (or LOGIN_PASSWORD)");
        }
        if cfg.auth.session_secret.is_empty() {
            anyhow::bail!("auth.session_secret is not set (or SESSION_SECRET)");
        }
        cfg.utc_offset()?;

        Ok(cfg)
    }

    pub fn utc_offset(&self) -> anyhow::Result<UtcOffset> {
        UtcOffset::from_whole_seconds(self.clock.utc_offset_minutes * 60)
            .map_err(|e| anyhow::anyhow!("invalid clock.utc_offset_minutes: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"
        [server]
        bind_addr = "127.0.0.1:3000"

        [store]
        data_path = "data/data.json"

        [auth]
        password = "from-file"
        session_secret = "file-secret"
    "#;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn parses_minimal_config_with_defaults() {
        let cfg = AppConfig::from_toml(BASE, no_env).unwrap();
        assert_eq!(cfg.server.bind_addr, "127.0.0.1:3000");
        assert_eq!(cfg.store.data_path, PathBuf::from("data/data.json"));
        assert_eq!(cfg.auth.session_ttl_secs, 604_800);
        assert_eq!(cfg.clock.utc_offset_minutes, 0);
        assert!(cfg.metrics.is_none());
        assert_eq!(cfg.utc_offset().unwrap(), UtcOffset::UTC);
    }

    #[test]
    fn environment_overrides_auth_section() {
        let env = |key: &str| match key {
            "LOGIN_PASSWORD" => Some("from-env".to_string()),
            _ => None,
        };
        let cfg = AppConfig::from_toml(BASE, env).unwrap();
        assert_eq!(cfg.auth.password, "from-env");
        assert_eq!(cfg.auth.session_secret, "file-secret");
    }

    #[test]
    fn missing_password_is_rejected() {
        let toml = BASE.replace("password = \"from-file\"", "");
        let err = AppConfig::from_toml(&toml, no_env).unwrap_err();
        assert!(err.to_string().contains("auth.password"));
    }

    #[test]
    fn offset_out_of_range_is_rejected() {
        let toml = format!("{BASE}\n[clock]\nutc_offset_minutes = 100000\n");
        assert!(AppConfig::from_toml(&toml, no_env).is_err());
    }

    #[test]
    fn parses_clock_and_metrics_sections() {
        let toml = format!(
            "{BASE}\n[clock]\nutc_offset_minutes = 480\n\n[metrics]\nbind_addr = \"127.0.0.1:9100\"\n"
        );
        let cfg = AppConfig::from_toml(&toml, no_env).unwrap();
        assert_eq!(cfg.utc_offset().unwrap().whole_hours(), 8);
        assert_eq!(cfg.metrics.unwrap().bind_addr, "127.0.0.1:9100");
    }
}
