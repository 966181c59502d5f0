use linenote::value::UnknownInspect;
use linenote::{DirectoryReport, Inspect, OptionsPatch, Session};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Unknown inspect style {0:?} (expected \"pretty\" or \"debug\")")]
    UnknownInspect(String),
}

impl From<UnknownInspect> for ConfigError {
    fn from(e: UnknownInspect) -> Self {
        Self::UnknownInspect(e.0)
    }
}

/// Settings read from `config.toml`. Every key is optional; a missing key
/// leaves the session's current value alone.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tabstop: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_indent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compact: Option<bool>,
    /// `"pretty"` or `"debug"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inspect: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotate: Option<bool>,
    /// Where annotated files are written when emitting to a directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config.output_dir = config
            .output_dir
            .map(|dir| Self::expand_path(&dir).unwrap_or(dir));

        Ok(Some(config))
    }

    /// Load from `$LINENOTE_CONFIG`, or the default location when unset.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        if let Some(path) = std::env::var_os("LINENOTE_CONFIG") {
            let path = PathBuf::from(path);
            return Self::expand_path(&path).unwrap_or(path);
        }
        let config_dir = shellexpand::tilde("~/.config/linenote");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The options this file sets, ready to merge into a session.
    pub fn to_patch(&self) -> Result<OptionsPatch, ConfigError> {
        let inspect = self
            .inspect
            .as_deref()
            .map(str::parse::<Inspect>)
            .transpose()?;
        Ok(OptionsPatch {
            tabstop: self.tabstop,
            default_indent: self.default_indent.clone(),
            compact: self.compact,
            inspect,
            annotate: self.annotate,
        })
    }

    pub fn apply(&self, session: &mut Session) -> Result<(), ConfigError> {
        session.set_options(self.to_patch()?);
        Ok(())
    }

    /// Write `session`'s annotated files into `output_dir`. Returns `None`
    /// when no output directory is configured.
    pub fn emit_to_output_dir(
        &self,
        session: &Session,
    ) -> linenote::Result<Option<DirectoryReport>> {
        self.output_dir
            .as_ref()
            .map(|dir| session.emit_to_directory(dir.clone()))
            .transpose()
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path_default() {
        if env::var_os("LINENOTE_CONFIG").is_some() {
            return;
        }
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/linenote/config.toml"));
    }

    #[test]
    fn test_full_config_parses() {
        let config: Config = toml::from_str(
            r#"
tabstop = 8
default_indent = "  "
compact = true
inspect = "debug"
annotate = true
output_dir = "/tmp/linenote-out"
"#,
        )
        .unwrap();

        assert_eq!(
            config,
            Config {
                tabstop: Some(8),
                default_indent: Some("  ".to_string()),
                compact: Some(true),
                inspect: Some("debug".to_string()),
                annotate: Some(true),
                output_dir: Some(PathBuf::from("/tmp/linenote-out")),
            }
        );
    }

    #[test]
    fn test_missing_keys_leave_options_alone() {
        let config: Config = toml::from_str("compact = true\n").unwrap();
        let mut session = Session::new();
        config.apply(&mut session).unwrap();

        let options = session.options();
        assert!(options.compact);
        assert_eq!(options.tabstop, 4);
        assert_eq!(options.default_indent, "    ");
        assert!(matches!(options.inspect, Inspect::Pretty));
    }

    #[test]
    fn test_to_patch_parses_inspect() {
        let config = Config {
            inspect: Some("Debug".to_string()),
            ..Config::default()
        };
        let patch = config.to_patch().unwrap();
        assert!(matches!(patch.inspect, Some(Inspect::Debug)));
    }

    #[test]
    fn test_unknown_inspect_is_rejected() {
        let config = Config {
            inspect: Some("yaml".to_string()),
            ..Config::default()
        };
        let err = config.to_patch().unwrap_err();
        assert!(matches!(err, ConfigError::UnknownInspect(ref name) if name == "yaml"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        let result = Config::load_from_path(&non_existent_config).unwrap();

        assert!(result.is_none());
    }

    #[test]
    fn test_invalid_toml_is_a_parse_error() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "tabstop = \"wide\"\n").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();
        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/config.toml");
        let test_config = Config {
            tabstop: Some(2),
            annotate: Some(false),
            output_dir: Some(PathBuf::from("/tmp/linenote-out")),
            ..Config::default()
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_output_dir_with_env_var() {
        unsafe {
            env::set_var("LINENOTE_TEST_OUT", "/custom/out");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "output_dir = \"$LINENOTE_TEST_OUT/run\"\n").unwrap();
        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.output_dir, Some(PathBuf::from("/custom/out/run")));

        unsafe {
            env::remove_var("LINENOTE_TEST_OUT");
        }
    }

    #[test]
    fn test_emit_to_output_dir() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("annotated");
        let config = Config {
            output_dir: Some(out_dir.clone()),
            ..Config::default()
        };

        let mut session = Session::new();
        let id = session.register_virtual("show(3);\n", "three.rs").unwrap();
        session
            .record(&id, 1, linenote::Value::new(3), false)
            .unwrap();

        let report = config.emit_to_output_dir(&session).unwrap().unwrap();
        assert!(report.is_complete());
        assert_eq!(
            std::fs::read_to_string(out_dir.join("three.rs")).unwrap(),
            "show(3);\n// 3\n"
        );
    }

    #[test]
    fn test_emit_without_output_dir_does_nothing() {
        let session = Session::new();
        let report = Config::default().emit_to_output_dir(&session).unwrap();
        assert!(report.is_none());
    }

    #[test]
    fn test_expand_path_with_tilde() {
        let path = PathBuf::from("~/linenote/out");
        let expanded = Config::expand_path(&path).unwrap();

        assert!(!expanded.to_string_lossy().starts_with('~'));
        assert!(expanded.to_string_lossy().contains("linenote/out"));
    }
}
