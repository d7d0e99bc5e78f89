use serde::Deserialize;
use std::env;
use std::fmt::{self, Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "escheck.toml";

/// Runtime configuration, read from an optional TOML file with environment
/// overrides on top.
#[derive(Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    /// Installation root of the client; the binary lives at `<root>/bin/es`.
    pub install_root: Option<PathBuf>,
    /// Virtual datacenter appended to every client invocation.
    pub datacenter: String,
    /// Cached session-token file written by the client.
    pub session_file: PathBuf,
    /// Pause length between request bursts.
    pub throttle_secs: u64,
    pub user: Credentials,
    pub admin: Credentials,
}

#[derive(Deserialize, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            install_root: None,
            datacenter: String::from("main"),
            session_file: PathBuf::from("/tmp/esdc.session"),
            throttle_secs: 60,
            user: Credentials {
                username: String::from("test"),
                password: String::from("lacodoma"),
            },
            admin: Credentials {
                username: String::from("admin"),
                password: String::from("changeme"),
            },
        }
    }
}

pub enum ConfigError {
    FailedToReadFile(PathBuf, io::Error),
    FailedToParseConfig(PathBuf, toml::de::Error),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::FailedToReadFile(path, err) => {
                write!(f, "Failed to read config file {}: {}", path.display(), err)
            }
            Self::FailedToParseConfig(path, err) => {
                write!(f, "Failed to parse config file {}: {}", path.display(), err)
            }
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicitly given file must exist and parse. Without one, the default
    /// config file is used when present. The `ERIGONES_HOME` environment
    /// variable overrides `install_root` in either case.
    pub fn load(config_file: Option<&Path>) -> Result<Config, ConfigError> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.is_file() {
                    Self::from_file(default_path)?
                } else {
                    Config::default()
                }
            }
        };

        if let Ok(install_root) = env::var("ERIGONES_HOME") {
            config.install_root = Some(PathBuf::from(install_root));
        }

        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Config, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|err| ConfigError::FailedToReadFile(path.to_path_buf(), err))?;
        toml::from_str(&content)
            .map_err(|err| ConfigError::FailedToParseConfig(path.to_path_buf(), err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.datacenter, "main");
        assert_eq!(config.session_file, PathBuf::from("/tmp/esdc.session"));
        assert_eq!(config.throttle_secs, 60);
        assert_eq!(config.user.username, "test");
        assert_eq!(config.admin.username, "admin");
        assert!(config.install_root.is_none());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            datacenter = "staging"

            [admin]
            username = "root"
            password = "secret"
            "#,
        )
        .unwrap();

        assert_eq!(config.datacenter, "staging");
        assert_eq!(config.admin.username, "root");
        assert_eq!(config.user.username, "test");
        assert_eq!(config.throttle_secs, 60);
    }

    #[test]
    fn test_install_root_from_file() {
        let config: Config = toml::from_str(r#"install_root = "/opt/erigones""#).unwrap();

        assert_eq!(config.install_root, Some(PathBuf::from("/opt/erigones")));
    }
}
