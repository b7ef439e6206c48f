//! Handles the configuration of the client.
//!
//! this module is responsible for parsing the Sekai.toml file and merging it with the environment
//! and cli arguments.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use std::{path::PathBuf, str::FromStr, time::Duration};

pub static DEFAULT_CONFIG: &str = include_str!("../Sekai.toml");

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct Settings {
    /// How to reach the API server, and how the client behaves.
    #[serde(default)]
    pub client: ClientSettings,
    /// Where the login session is kept.
    #[serde(default)]
    pub session: SessionSettings,
}

impl Settings {
    /// Load settings from the config file, environment variables, and CLI arguments.
    ///
    /// The environment variables are prefixed with `SEKAI_`, with `__` separating sections,
    /// e.g. `SEKAI_CLIENT__BASE_URL`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the config file is not found or if the config file is
    /// invalid.
    #[inline]
    pub fn init(
        config: PathBuf,
        base_url: Option<String>,
        log_level: Option<log::LevelFilter>,
    ) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .add_source(File::from(config))
            .add_source(Environment::with_prefix("SEKAI").separator("__"))
            .build()?;

        let mut settings: Self = s.try_deserialize()?;

        if let Some(token_file) = &mut settings.session.token_file {
            *token_file = shellexpand::tilde(&token_file.to_string_lossy())
                .into_owned()
                .into();
        }

        if let Some(base_url) = base_url {
            settings.client.base_url = base_url;
        }

        if let Some(log_level) = log_level {
            settings.client.log_level = log_level;
        }

        Ok(settings)
    }

    /// Get the (default) path to the config file.
    /// If the config file does not exist at this path, it will be created with the default config.
    ///
    /// See [`crate::get_config_dir`] for more information about where this default path is located.
    ///
    /// # Errors
    ///
    /// This function will return an error if the system config directory (e.g., `~/.config` on linux) could not be found, or if the config file was missing and could not be created.
    #[inline]
    pub fn get_config_path() -> Result<PathBuf, std::io::Error> {
        match crate::get_config_dir() {
            Ok(config_dir) => {
                if !config_dir.exists() {
                    std::fs::create_dir_all(&config_dir)?;
                }
                let config_file = config_dir.join("Sekai.toml");

                if !config_file.exists() {
                    std::fs::write(&config_file, DEFAULT_CONFIG)?;
                }

                Ok(config_file)
            }
            Err(e) => {
                eprintln!("Error: {e}");
                Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Unable to find the config directory for sekai-mylist.",
                ))
            }
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ClientSettings {
    /// The address of the API server.
    /// Default is "http://localhost:8080".
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout of a single request, in seconds.
    /// Default is 30.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Delay between a successful login and the move to the user page, in milliseconds.
    /// Default is 1000.
    #[serde(default = "default_redirect_delay_ms")]
    pub redirect_delay_ms: u64,
    /// What level of logging to use.
    /// Default is "info".
    #[serde(default = "default_log_level")]
    #[serde(deserialize_with = "de_log_level")]
    pub log_level: log::LevelFilter,
    /// Print tracing spans of API calls.
    #[serde(default)]
    pub tracing: bool,
}

impl ClientSettings {
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    #[must_use]
    pub const fn redirect_delay(&self) -> Duration {
        Duration::from_millis(self.redirect_delay_ms)
    }
}

fn de_log_level<'de, D>(deserializer: D) -> Result<log::LevelFilter, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Ok(log::LevelFilter::from_str(&s).unwrap_or_else(|_| default_log_level()))
}

fn default_base_url() -> String {
    "http://localhost:8080".to_owned()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_redirect_delay_ms() -> u64 {
    1000
}

const fn default_log_level() -> log::LevelFilter {
    log::LevelFilter::Info
}

impl Default for ClientSettings {
    #[inline]
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            redirect_delay_ms: default_redirect_delay_ms(),
            log_level: default_log_level(),
            tracing: false,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Default, PartialEq, Eq)]
pub struct SessionSettings {
    /// The file holding the login token.
    /// If unset, `token` in the data directory is used (see [`crate::get_data_dir`]).
    #[serde(default)]
    pub token_file: Option<PathBuf>,
}

impl SessionSettings {
    /// The token file to use, falling back to the data directory.
    ///
    /// # Errors
    ///
    /// Returns an error if no file is configured and the data directory cannot be found.
    pub fn token_path(&self) -> Result<PathBuf, crate::errors::DirectoryError> {
        match &self.token_file {
            Some(path) => Ok(path.clone()),
            None => Ok(crate::get_data_dir()?.join("token")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("debug", log::LevelFilter::Debug)]
    #[case("WARN", log::LevelFilter::Warn)]
    #[case("off", log::LevelFilter::Off)]
    #[case("loud", log::LevelFilter::Info)]
    fn test_de_log_level(#[case] input: &str, #[case] expected: log::LevelFilter) {
        use serde::de::IntoDeserializer;
        let deserializer: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
            input.into_deserializer();
        assert_eq!(de_log_level(deserializer).unwrap(), expected);
    }

    #[test]
    fn test_init_config() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            r#"
[client]
base_url = "https://sekai.example.com"
request_timeout_secs = 5
redirect_delay_ms = 0
log_level = "debug"
tracing = true

[session]
token_file = "/tmp/sekai-token"
            "#,
        )
        .unwrap();

        let expected = Settings {
            client: ClientSettings {
                base_url: "https://sekai.example.com".into(),
                request_timeout_secs: 5,
                redirect_delay_ms: 0,
                log_level: log::LevelFilter::Debug,
                tracing: true,
            },
            session: SessionSettings {
                token_file: Some("/tmp/sekai-token".into()),
            },
        };

        let settings = Settings::init(config_path, None, None).unwrap();

        assert_eq!(settings, expected);
        assert_eq!(settings.client.redirect_delay(), Duration::ZERO);
        assert_eq!(settings.client.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_flags_override_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[client]\nlog_level = \"debug\"\n").unwrap();

        let settings = Settings::init(
            config_path,
            Some("http://127.0.0.1:9000".into()),
            Some(log::LevelFilter::Trace),
        )
        .unwrap();

        assert_eq!(settings.client.base_url, "http://127.0.0.1:9000");
        assert_eq!(settings.client.log_level, log::LevelFilter::Trace);
        assert_eq!(settings.client.redirect_delay_ms, 1000);
        assert_eq!(settings.session, SessionSettings::default());
    }

    #[test]
    fn test_token_file_is_tilde_expanded() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "[session]\ntoken_file = \"~/sekai/token\"\n").unwrap();

        let settings = Settings::init(config_path, None, None).unwrap();
        let token_file = settings.session.token_file.unwrap();

        assert!(!token_file.starts_with("~"));
        assert!(token_file.ends_with("sekai/token"));
    }

    #[test]
    fn test_default_config_works() {
        let temp_dir = tempfile::tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, DEFAULT_CONFIG).unwrap();

        let settings = Settings::init(config_path, None, None);

        assert!(settings.is_ok(), "Error: {:?}", settings.err());
        assert_eq!(settings.unwrap(), Settings::default());
    }
}
