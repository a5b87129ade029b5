//! Configuration loading for the CLI.
//!
//! Wraps `subst-config` resolution with file reading, schema version checks
//! and semantic validation, and keeps the raw file contents long enough to
//! hash them into a snapshot.

pub use subst_config::validate::ValidationError;
pub use subst_config::{Config, ConfigPaths, ConfigSnapshot, ConfigSource, ScoringParams, SummaryPolicy};

use std::path::{Path, PathBuf};
use subst_config::resolve::{resolve_config, POLICY_FILENAME, SCORING_FILENAME};
use subst_config::validate::{validate_policy, validate_scoring};
use thiserror::Error;

/// Errors that can occur during config loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {path}")]
    NotFound { path: PathBuf },

    #[error("Invalid JSON in config file {path}: {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("I/O error reading {path}: {source}")]
    IoError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Schema version mismatch in {path}: expected {expected}, got {actual}")]
    VersionMismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("Semantic validation failed: {0}")]
    ValidationError(#[from] ValidationError),
}

/// Configuration resolution options.
#[derive(Debug, Default, Clone)]
pub struct ConfigOptions {
    /// Directory holding policy.json and scoring.json.
    pub config_dir: Option<PathBuf>,
    /// Explicit policy file; must exist.
    pub policy_path: Option<PathBuf>,
    /// Explicit scoring file; must exist.
    pub scoring_path: Option<PathBuf>,
}

/// Loaded configuration with provenance.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub config: Config,
    pub paths: ConfigPaths,
    pub snapshot: ConfigSnapshot,
}

impl ResolvedConfig {
    pub fn policy(&self) -> &SummaryPolicy {
        &self.config.policy
    }

    pub fn scoring(&self) -> &ScoringParams {
        &self.config.scoring
    }

    /// True when neither file was found and built-ins are in effect.
    pub fn is_default(&self) -> bool {
        self.paths.policy.is_none() && self.paths.scoring.is_none()
    }
}

/// Load and validate configuration.
///
/// Explicit file paths must exist. Files implied by `config_dir` that are
/// absent fall through to the environment, XDG, /etc and the built-ins.
pub fn load_config(options: &ConfigOptions) -> Result<ResolvedConfig, ConfigError> {
    for path in [&options.policy_path, &options.scoring_path]
        .into_iter()
        .flatten()
    {
        if !path.exists() {
            return Err(ConfigError::NotFound { path: path.clone() });
        }
    }

    let cli_policy = options
        .policy_path
        .clone()
        .or_else(|| options.config_dir.as_ref().map(|d| d.join(POLICY_FILENAME)));
    let cli_scoring = options
        .scoring_path
        .clone()
        .or_else(|| options.config_dir.as_ref().map(|d| d.join(SCORING_FILENAME)));

    let paths = resolve_config(cli_policy.as_deref(), cli_scoring.as_deref());

    let policy_json = paths.policy.as_deref().map(read_file).transpose()?;
    let scoring_json = paths.scoring.as_deref().map(read_file).transpose()?;

    let policy = match (&paths.policy, &policy_json) {
        (Some(path), Some(json)) => {
            let policy = SummaryPolicy::parse_json(json).map_err(|e| parse_error(path, e))?;
            validate_policy(&policy).map_err(|e| with_path(path, e))?;
            policy
        }
        _ => SummaryPolicy::default(),
    };
    let scoring = match (&paths.scoring, &scoring_json) {
        (Some(path), Some(json)) => {
            let scoring = ScoringParams::parse_json(json).map_err(|e| parse_error(path, e))?;
            validate_scoring(&scoring).map_err(|e| with_path(path, e))?;
            scoring
        }
        _ => ScoringParams::default(),
    };

    let config = Config { policy, scoring };
    let snapshot = ConfigSnapshot::new(
        &config,
        &paths,
        policy_json.as_deref(),
        scoring_json.as_deref(),
    );

    Ok(ResolvedConfig {
        config,
        paths,
        snapshot,
    })
}

/// Validate a single file, guessing its kind from the file name
/// (a name containing `scoring` is scoring, anything else is a policy).
pub fn validate_file(path: &Path) -> Result<(), ConfigError> {
    let json = read_file(path)?;
    let is_scoring = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.contains("scoring"));

    if is_scoring {
        let scoring = ScoringParams::parse_json(&json).map_err(|e| parse_error(path, e))?;
        validate_scoring(&scoring).map_err(|e| with_path(path, e))
    } else {
        let policy = SummaryPolicy::parse_json(&json).map_err(|e| parse_error(path, e))?;
        validate_policy(&policy).map_err(|e| with_path(path, e))
    }
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_error(path: &Path, err: ValidationError) -> ConfigError {
    ConfigError::ParseError {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

fn with_path(path: &Path, err: ValidationError) -> ConfigError {
    match err {
        ValidationError::VersionMismatch { expected, actual } => ConfigError::VersionMismatch {
            path: path.to_path_buf(),
            expected,
            actual,
        },
        other => ConfigError::ValidationError(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn options_for(dir: &Path) -> ConfigOptions {
        ConfigOptions {
            config_dir: Some(dir.to_path_buf()),
            ..ConfigOptions::default()
        }
    }

    #[test]
    fn test_explicit_missing_file_is_not_found() {
        let options = ConfigOptions {
            policy_path: Some(PathBuf::from("/nonexistent/subst/policy.json")),
            ..ConfigOptions::default()
        };
        let err = load_config(&options).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound { .. }));
    }

    #[test]
    fn test_loads_files_from_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("policy.json"),
            r#"{"schema_version": "1.0.0", "min_confidence": 55}"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("scoring.json"),
            r#"{"schema_version": "1.0.0", "temperature": 10}"#,
        )
        .unwrap();

        let resolved = load_config(&options_for(dir.path())).unwrap();
        assert_eq!(resolved.policy().min_confidence, 55.0);
        assert_eq!(resolved.scoring().temperature, 10.0);
        assert_eq!(resolved.paths.policy_source, ConfigSource::CliArgument);
        assert!(resolved.snapshot.policy_hash.is_some());
        assert!(!resolved.is_default());
    }

    #[test]
    fn test_version_mismatch_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("policy.json");
        fs::write(&path, r#"{"schema_version": "0.9.0"}"#).unwrap();

        let err = load_config(&ConfigOptions {
            policy_path: Some(path.clone()),
            ..ConfigOptions::default()
        })
        .unwrap_err();
        match err {
            ConfigError::VersionMismatch { path: p, actual, .. } => {
                assert_eq!(p, path);
                assert_eq!(actual, "0.9.0");
            }
            other => panic!("expected VersionMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scoring.json");
        fs::write(&path, "{").unwrap();
        let err = load_config(&ConfigOptions {
            scoring_path: Some(path),
            ..ConfigOptions::default()
        })
        .unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn test_validate_file_picks_kind_from_name() {
        let dir = tempfile::tempdir().unwrap();
        let scoring = dir.path().join("scoring.json");
        fs::write(&scoring, r#"{"temperature": 0}"#).unwrap();
        assert!(matches!(
            validate_file(&scoring),
            Err(ConfigError::ValidationError(_))
        ));

        let policy = dir.path().join("mine.json");
        fs::write(&policy, r#"{"min_probability": 12.5}"#).unwrap();
        assert!(validate_file(&policy).is_ok());
    }
}
