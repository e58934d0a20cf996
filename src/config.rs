// Service configuration: CLI > env > YAML file > defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseYaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },
}

/// On-disk config file; every key optional for partial overrides
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    bind_addr: Option<String>,
    log_level: Option<String>,
    seed_default_categories: Option<bool>,
}

/// Config-related CLI flags, shared by every subcommand
#[derive(clap::Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Address to bind the HTTP API to
    #[arg(short, long, env = "TASKFLOW_BIND", global = true)]
    pub bind: Option<String>,

    /// Path to config file (default: `~/.config/taskflow/taskflow.yaml`)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error)
    #[arg(long, env = "TASKFLOW_LOG", global = true)]
    pub log_level: Option<String>,

    /// Start with no categories instead of Work/Personal/Shopping
    #[arg(long, global = true)]
    pub no_seed: bool,
}

/// Fully resolved configuration
///
/// Each key comes from the first source that sets it: CLI flag, environment variable
/// (`TASKFLOW_BIND`, `TASKFLOW_LOG`), `~/.config/taskflow/taskflow.yaml`, then the default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Config {
    pub bind_addr: String,
    pub log_level: String,
    pub seed_default_categories: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:5000".to_string(),
            log_level: "info".to_string(),
            seed_default_categories: true,
        }
    }
}

impl Config {
    /// Load configuration by merging CLI args, env vars, and a YAML file.
    ///
    /// An explicit `--config` path that does not exist is an error; the default path is
    /// optional.
    pub fn load(args: &ConfigArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(args.config.as_deref())?;
        Ok(Self::resolve(args, &file))
    }

    fn resolve(args: &ConfigArgs, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        Self {
            bind_addr: args
                .bind
                .clone()
                .or_else(|| file.bind_addr.clone())
                .unwrap_or(defaults.bind_addr),
            log_level: args
                .log_level
                .clone()
                .or_else(|| file.log_level.clone())
                .unwrap_or(defaults.log_level),
            seed_default_categories: !args.no_seed
                && file
                    .seed_default_categories
                    .unwrap_or(defaults.seed_default_categories),
        }
    }
}

/// Default config file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("taskflow").join("taskflow.yaml"))
}

fn load_config_file(explicit: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    let (path, required) = match explicit {
        Some(p) => (p.to_path_buf(), true),
        None => match default_config_path() {
            Some(p) => (p, false),
            None => return Ok(ConfigFile::default()),
        },
    };

    let contents = match std::fs::read_to_string(&path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => {
            return Ok(ConfigFile::default());
        }
        Err(source) => return Err(ConfigError::ReadFile { path, source }),
    };

    if contents.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    serde_yaml::from_str(&contents).map_err(|source| ConfigError::ParseYaml { path, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::resolve(&ConfigArgs::default(), &ConfigFile::default());
        assert_eq!(config, Config::default());
        assert!(config.seed_default_categories);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("taskflow.yaml");
        fs::write(&path, "bind_addr: 0.0.0.0:8080\nseed_default_categories: false\n").unwrap();

        let args = ConfigArgs {
            config: Some(path),
            ..ConfigArgs::default()
        };
        let config = Config::load(&args).unwrap();
        assert_eq!(config.bind_addr, "0.0.0.0:8080");
        assert_eq!(config.log_level, "info");
        assert!(!config.seed_default_categories);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = ConfigFile {
            bind_addr: Some("0.0.0.0:8080".to_string()),
            log_level: Some("warn".to_string()),
            seed_default_categories: Some(true),
        };
        let args = ConfigArgs {
            bind: Some("127.0.0.1:9999".to_string()),
            log_level: Some("debug".to_string()),
            no_seed: true,
            ..ConfigArgs::default()
        };
        let config = Config::resolve(&args, &file);
        assert_eq!(config.bind_addr, "127.0.0.1:9999");
        assert_eq!(config.log_level, "debug");
        assert!(!config.seed_default_categories);
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let temp = TempDir::new().unwrap();
        let args = ConfigArgs {
            config: Some(temp.path().join("nope.yaml")),
            ..ConfigArgs::default()
        };
        assert!(matches!(Config::load(&args), Err(ConfigError::ReadFile { .. })));
    }

    #[test]
    fn test_invalid_yaml_is_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("bad.yaml");
        fs::write(&path, "bind_addr: [unclosed\n").unwrap();
        let args = ConfigArgs {
            config: Some(path),
            ..ConfigArgs::default()
        };
        assert!(matches!(Config::load(&args), Err(ConfigError::ParseYaml { .. })));
    }

    #[test]
    fn test_empty_file_is_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("empty.yaml");
        fs::write(&path, "").unwrap();
        let args = ConfigArgs {
            config: Some(path),
            ..ConfigArgs::default()
        };
        assert_eq!(Config::load(&args).unwrap(), Config::default());
    }
}
