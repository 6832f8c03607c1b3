use std::path::PathBuf;

use anyhow::{anyhow, Context};
use serde::Deserialize;

const DEFAULT_ENV: &str = "local";
const ENV_VAR_NAME: &str = "BOOKSHELF_ENV";
const CONFIG_DIR_ENV: &str = "BOOKSHELF_CONFIG_DIR";
const ENV_PREFIX: &str = "BOOKSHELF";

/// Deployment environment the application is running in.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Local,
    Staging,
    Production,
}

impl Environment {
    fn parse(raw: &str) -> anyhow::Result<Self> {
        match raw {
            "local" => Ok(Environment::Local),
            "staging" => Ok(Environment::Staging),
            "production" => Ok(Environment::Production),
            other => Err(anyhow!(
                "unsupported environment '{}'; expected local/staging/production",
                other
            )),
        }
    }
}

/// Top-level configuration structure loaded from layered sources.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: Environment,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub telemetry: TelemetrySettings,
}

impl Settings {
    /// Load configuration by layering `.env`, base file, and environment overlay.
    pub fn load() -> anyhow::Result<Self> {
        Self::resolve(None, None)
    }

    /// Like [`Settings::load`], but an explicit directory or environment name
    /// takes precedence over `BOOKSHELF_CONFIG_DIR` and `BOOKSHELF_ENV`.
    ///
    /// Without either, the directory is `./config` and the environment `local`.
    pub fn resolve(config_dir: Option<PathBuf>, environment: Option<String>) -> anyhow::Result<Self> {
        // Allow missing `.env` files without failing.
        let _ = dotenvy::dotenv();

        let environment = environment
            .or_else(|| std::env::var(ENV_VAR_NAME).ok())
            .unwrap_or_else(|| DEFAULT_ENV.to_string());
        let config_dir = match config_dir.or_else(|| std::env::var_os(CONFIG_DIR_ENV).map(PathBuf::from)) {
            Some(dir) => dir,
            None => std::env::current_dir()
                .context("unable to resolve current directory")?
                .join("config"),
        };

        Self::load_from(config_dir, &environment)
    }

    /// Load configuration from an explicit directory and environment name.
    ///
    /// Environment variables (`BOOKSHELF_SERVER__PORT=9000`) are layered on top
    /// of `base.toml` and `{environment}.toml`; both files are optional.
    pub fn load_from(config_dir: PathBuf, environment: &str) -> anyhow::Result<Self> {
        let parsed_environment = Environment::parse(environment)?;

        let base_path = config_dir.join("base.toml");
        let environment_path = config_dir.join(format!("{}.toml", environment));

        let builder = config::Config::builder()
            .add_source(config::File::from(base_path).required(false))
            .add_source(config::File::from(environment_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            );

        let cfg = builder
            .build()
            .with_context(|| "failed to build configuration")?;

        let mut settings: Settings = cfg
            .try_deserialize()
            .with_context(|| "failed to deserialize configuration")?;

        settings.environment = parsed_environment;

        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "ServerSettings::default_host")]
    pub host: String,
    #[serde(default = "ServerSettings::default_port")]
    pub port: u16,
    #[serde(default = "ServerSettings::default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl ServerSettings {
    fn default_host() -> String {
        "0.0.0.0".to_string()
    }

    fn default_port() -> u16 {
        8000
    }

    fn default_request_timeout_ms() -> u64 {
        15000
    }

    /// `host:port` pair suitable for binding a listener.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: Self::default_host(),
            port: Self::default_port(),
            request_timeout_ms: Self::default_request_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    #[serde(default = "DatabaseSettings::default_url")]
    pub url: String,
    #[serde(default = "DatabaseSettings::default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "DatabaseSettings::default_create_if_missing")]
    pub create_if_missing: bool,
}

impl DatabaseSettings {
    fn default_url() -> String {
        "sqlite://books.db".to_string()
    }

    fn default_max_connections() -> u32 {
        5
    }

    fn default_create_if_missing() -> bool {
        true
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: Self::default_url(),
            max_connections: Self::default_max_connections(),
            create_if_missing: Self::default_create_if_missing(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelemetrySettings {
    #[serde(default)]
    pub log_format: LogFormat,
    /// Default `EnvFilter` directive, used when `RUST_LOG` is unset.
    #[serde(default = "TelemetrySettings::default_filter")]
    pub filter: String,
}

impl TelemetrySettings {
    fn default_filter() -> String {
        "info".to_string()
    }
}

impl Default for TelemetrySettings {
    fn default() -> Self {
        Self {
            log_format: LogFormat::Pretty,
            filter: Self::default_filter(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_environment_is_local() {
        let settings = Settings::default();
        assert_eq!(settings.environment, Environment::Local);
    }

    #[test]
    fn default_database_url_is_local_sqlite_file() {
        let settings = Settings::default();
        assert_eq!(settings.database.url, "sqlite://books.db");
        assert!(settings.database.create_if_missing);
    }

    #[test]
    fn default_bind_addr_listens_on_8000() {
        let settings = Settings::default();
        assert_eq!(settings.server.bind_addr(), "0.0.0.0:8000");
    }

    #[test]
    fn unknown_environment_is_rejected() {
        let err = Environment::parse("qa").unwrap_err();
        assert!(err.to_string().contains("unsupported environment 'qa'"));
    }

    #[test]
    fn missing_config_dir_falls_back_to_defaults() {
        let dir = std::env::temp_dir().join("bookshelf-settings-does-not-exist");
        let settings = Settings::load_from(dir, "staging").unwrap();
        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.telemetry.filter, "info");
        assert_eq!(settings.telemetry.log_format, LogFormat::Pretty);
    }

    #[test]
    fn base_file_is_layered_under_environment_file() {
        let dir = std::env::temp_dir().join(format!("bookshelf-settings-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(
            dir.join("base.toml"),
            "[server]\nport = 9100\n\n[database]\nurl = \"sqlite://base.db\"\n",
        )
        .unwrap();
        std::fs::write(dir.join("production.toml"), "[server]\nport = 9200\n").unwrap();

        let settings = Settings::load_from(dir.clone(), "production").unwrap();
        assert_eq!(settings.environment, Environment::Production);
        assert_eq!(settings.server.port, 9200);
        assert_eq!(settings.database.url, "sqlite://base.db");

        std::fs::remove_dir_all(dir).ok();
    }

    #[test]
    fn explicit_overrides_win_over_defaults() {
        let dir = std::env::temp_dir().join(format!("bookshelf-resolve-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("staging.toml"), "[server]\nport = 9300\n").unwrap();

        let settings = Settings::resolve(Some(dir.clone()), Some("staging".to_string())).unwrap();
        assert_eq!(settings.environment, Environment::Staging);
        assert_eq!(settings.server.port, 9300);

        let err = Settings::resolve(Some(dir.clone()), Some("qa".to_string())).unwrap_err();
        assert!(err.to_string().contains("unsupported environment 'qa'"));

        std::fs::remove_dir_all(dir).ok();
    }
}
