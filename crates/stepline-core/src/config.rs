use crate::Result;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_INTERPRETER: &str = "ruby";
pub const DEFAULT_RC_FILE: &str = ".steplinerc";
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

fn default_interpreter() -> String {
    DEFAULT_INTERPRETER.to_string()
}

fn default_syntax_check_args() -> Vec<String> {
    vec!["-c".to_string()]
}

fn default_rc_file() -> String {
    DEFAULT_RC_FILE.to_string()
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Program that both syntax-checks and runs the debugged script.
    #[serde(default = "default_interpreter")]
    pub interpreter: String,

    #[serde(default = "default_syntax_check_args")]
    pub syntax_check_args: Vec<String>,

    /// Extra arguments placed before the script when running it.
    #[serde(default)]
    pub run_args: Vec<String>,

    #[serde(default = "default_rc_file")]
    pub rc_file: String,

    /// Seconds to wait for the syntax check. Unset waits forever.
    #[serde(default)]
    pub validation_timeout: Option<u64>,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            syntax_check_args: default_syntax_check_args(),
            run_args: Vec::new(),
            rc_file: default_rc_file(),
            validation_timeout: None,
            connect_timeout: default_connect_timeout(),
        }
    }
}

impl Config {
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validation_timeout(&self) -> Option<Duration> {
        self.validation_timeout.map(Duration::from_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.interpreter, "ruby");
        assert_eq!(config.syntax_check_args, vec!["-c".to_string()]);
        assert_eq!(config.rc_file, ".steplinerc");
        assert!(config.validation_timeout().is_none());
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_full_file_is_loaded() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(
            &config_path,
            concat!(
                "interpreter = \"python3\"\n",
                "syntax_check_args = [\"-m\", \"py_compile\"]\n",
                "run_args = [\"-X\", \"dev\"]\n",
                "rc_file = \".pysteprc\"\n",
                "validation_timeout = 5\n",
                "connect_timeout = 3\n",
            ),
        )?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(
            loaded,
            Config {
                interpreter: "python3".to_string(),
                syntax_check_args: vec!["-m".to_string(), "py_compile".to_string()],
                run_args: vec!["-X".to_string(), "dev".to_string()],
                rc_file: ".pysteprc".to_string(),
                validation_timeout: Some(5),
                connect_timeout: 3,
            }
        );
        assert_eq!(loaded.connect_timeout(), Duration::from_secs(3));
        assert_eq!(loaded.validation_timeout(), Some(Duration::from_secs(5)));

        Ok(())
    }

    #[test]
    fn test_partial_file_fills_in_defaults() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "interpreter = \"sh\"\n")?;

        let config = Config::load_from(&config_path)?;
        assert_eq!(config.interpreter, "sh");
        assert_eq!(config.syntax_check_args, vec!["-c".to_string()]);
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT_SECS);

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("nonexistent.toml");

        let config = Config::load_from(&config_path)?;
        assert_eq!(config, Config::default());

        Ok(())
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "interpreter = [").unwrap();

        let err = Config::load_from(&config_path).unwrap_err();
        assert!(matches!(err, crate::Error::Config(_)));
    }
}
