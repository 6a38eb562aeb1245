use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub mail: MailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
}

fn default_host() -> String { "0.0.0.0".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub bookings_file: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WebConfig {
    pub templates_dir: PathBuf,
    pub static_dir: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            templates_dir: PathBuf::from("templates"),
            static_dir: PathBuf::from("static"),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum MailSecurity {
    /// Plain connection upgraded with STARTTLS (submission port 587).
    #[default]
    StartTls,
    /// TLS from the first byte (port 465).
    Tls,
    /// No encryption. Only for local relays.
    None,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct MailConfig {
    pub enabled: bool,
    pub relay: String,
    pub port: u16,
    pub security: MailSecurity,
    pub username: String,
    pub password: String,
    pub from: String,
    pub timeout_seconds: u64,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            relay: "smtp.gmail.com".to_string(),
            port: 587,
            security: MailSecurity::StartTls,
            username: String::new(),
            password: String::new(),
            from: "Kempinski Hotel <kempinskihotel@gmail.com>".to_string(),
            timeout_seconds: 10,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());
        Self::load_with("config", &run_mode, Self::environment())
    }

    /// `HOTEL_SERVER__PORT=9090` sets `server.port`.
    pub fn environment() -> config::Environment {
        config::Environment::with_prefix("HOTEL")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    pub fn load_with(
        dir: impl AsRef<Path>,
        run_mode: &str,
        environment: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let dir = dir.as_ref();
        let source = |name: &str| dir.join(name).to_string_lossy().into_owned();

        let s = config::Config::builder()
            .add_source(config::File::with_name(&source("default")))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&source(run_mode)).required(false))
            // Untracked local overrides
            .add_source(config::File::with_name(&source("local")).required(false))
            .add_source(environment)
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = r#"
[server]
port = 8080

[storage]
bookings_file = "bookings.json"
"#;

    fn config_dir(default_toml: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("default.toml"), default_toml).unwrap();
        dir
    }

    /// Environment source fed from `vars` instead of the process environment.
    fn isolated_env(vars: &[(&str, &str)]) -> config::Environment {
        let mut map = config::Map::new();
        for (key, value) in vars {
            map.insert(key.to_string(), value.to_string());
        }
        Config::environment().source(Some(map))
    }

    fn load_files(dir: &Path) -> Result<Config, config::ConfigError> {
        Config::load_with(dir, "development", isolated_env(&[]))
    }

    fn workspace_config_dir() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../config")
    }

    #[test]
    fn minimal_file_fills_in_defaults() {
        let dir = config_dir(MINIMAL);
        let config = load_files(dir.path()).unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.storage.bookings_file, PathBuf::from("bookings.json"));
        assert_eq!(config.web.templates_dir, PathBuf::from("templates"));
        assert_eq!(config.web.static_dir, PathBuf::from("static"));
        assert!(!config.mail.enabled);
        assert_eq!(config.mail.port, 587);
        assert_eq!(config.mail.security, MailSecurity::StartTls);
        assert_eq!(config.mail.timeout_seconds, 10);
    }

    #[test]
    fn mail_section_overrides_defaults() {
        let dir = config_dir(&format!(
            "{MINIMAL}\n[mail]\nenabled = true\nrelay = \"localhost\"\nport = 2525\nsecurity = \"none\"\n"
        ));
        let config = load_files(dir.path()).unwrap();

        assert!(config.mail.enabled);
        assert_eq!(config.mail.relay, "localhost");
        assert_eq!(config.mail.port, 2525);
        assert_eq!(config.mail.security, MailSecurity::None);
    }

    #[test]
    fn run_mode_file_overrides_default() {
        let dir = config_dir(MINIMAL);
        std::fs::write(dir.path().join("production.toml"), "[server]\nport = 80\n").unwrap();

        let config = Config::load_with(dir.path(), "production", isolated_env(&[])).unwrap();
        assert_eq!(config.server.port, 80);

        let config = load_files(dir.path()).unwrap();
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn local_file_overrides_default() {
        let dir = config_dir(MINIMAL);
        std::fs::write(dir.path().join("local.toml"), "[server]\nport = 9191\n").unwrap();

        let config = load_files(dir.path()).unwrap();
        assert_eq!(config.server.port, 9191);
    }

    #[test]
    fn environment_overrides_files() {
        let dir = config_dir(MINIMAL);
        let env = isolated_env(&[
            ("HOTEL_MAIL__USERNAME", "front-desk"),
            ("HOTEL_SERVER__PORT", "9090"),
        ]);

        let config = Config::load_with(dir.path(), "development", env).unwrap();

        assert_eq!(config.mail.username, "front-desk");
        assert_eq!(config.server.port, 9090);
    }

    #[test]
    fn shipped_default_run_mode_keeps_the_configured_relay() {
        let env = isolated_env(&[("HOTEL_MAIL__ENABLED", "true")]);

        let config = Config::load_with(workspace_config_dir(), "development", env).unwrap();

        assert!(config.mail.enabled);
        assert_eq!(config.mail.relay, "smtp.gmail.com");
        assert_eq!(config.mail.port, 587);
        assert_eq!(config.mail.security, MailSecurity::StartTls);
    }

    #[test]
    fn shipped_mailhog_run_mode_targets_local_relay() {
        let config = Config::load_with(workspace_config_dir(), "mailhog", isolated_env(&[])).unwrap();

        assert_eq!(config.mail.relay, "localhost");
        assert_eq!(config.mail.port, 1025);
        assert_eq!(config.mail.security, MailSecurity::None);
    }

    #[test]
    fn missing_default_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(load_files(dir.path()).is_err());
    }

    #[test]
    fn missing_port_is_an_error() {
        let dir = config_dir("[storage]\nbookings_file = \"b.json\"\n");
        assert!(load_files(dir.path()).is_err());
    }
}
