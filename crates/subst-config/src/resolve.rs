//! Configuration resolution and path discovery.
//!
//! Resolution order: CLI arguments → environment variables → XDG paths →
//! system paths → defaults.

use std::path::{Path, PathBuf};

/// Discovered configuration file paths.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    /// Path to policy.json (or None if not found).
    pub policy: Option<PathBuf>,

    /// Path to scoring.json (or None if not found).
    pub scoring: Option<PathBuf>,

    pub policy_source: ConfigSource,
    pub scoring_source: ConfigSource,
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfigSource {
    CliArgument,
    Environment,
    XdgConfig,
    /// Found in /etc/subst/.
    SystemConfig,
    #[default]
    BuiltinDefault,
}

impl std::fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::CliArgument => write!(f, "CLI argument"),
            ConfigSource::Environment => write!(f, "environment variable"),
            ConfigSource::XdgConfig => write!(f, "XDG config"),
            ConfigSource::SystemConfig => write!(f, "system config"),
            ConfigSource::BuiltinDefault => write!(f, "builtin default"),
        }
    }
}

pub const ENV_POLICY_PATH: &str = "SUBST_POLICY";
pub const ENV_SCORING_PATH: &str = "SUBST_SCORING";
pub const ENV_CONFIG_DIR: &str = "SUBST_CONFIG_DIR";

pub const POLICY_FILENAME: &str = "policy.json";
pub const SCORING_FILENAME: &str = "scoring.json";

/// Application name for XDG and system directories.
const APP_NAME: &str = "subst";

/// Resolve configuration paths using the standard resolution order.
///
/// For each file:
/// 1. Explicit CLI path (if it exists)
/// 2. SUBST_POLICY / SUBST_SCORING
/// 3. SUBST_CONFIG_DIR + filename
/// 4. XDG config directory (~/.config/subst/)
/// 5. System config (/etc/subst/)
/// 6. Built-in defaults (None)
pub fn resolve_config(cli_policy: Option<&Path>, cli_scoring: Option<&Path>) -> ConfigPaths {
    let (policy, policy_source) =
        resolve_single_config(cli_policy, ENV_POLICY_PATH, POLICY_FILENAME);
    let (scoring, scoring_source) =
        resolve_single_config(cli_scoring, ENV_SCORING_PATH, SCORING_FILENAME);

    ConfigPaths {
        policy,
        scoring,
        policy_source,
        scoring_source,
    }
}

/// Resolve both files from a single `--config DIR`.
pub fn resolve_config_dir(dir: &Path) -> ConfigPaths {
    resolve_config(
        Some(&dir.join(POLICY_FILENAME)),
        Some(&dir.join(SCORING_FILENAME)),
    )
}

fn resolve_single_config(
    cli_path: Option<&Path>,
    env_var: &str,
    filename: &str,
) -> (Option<PathBuf>, ConfigSource) {
    if let Some(path) = cli_path {
        if path.exists() {
            return (Some(path.to_path_buf()), ConfigSource::CliArgument);
        }
    }

    if let Ok(env_path) = std::env::var(env_var) {
        let path = PathBuf::from(env_path);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Ok(config_dir) = std::env::var(ENV_CONFIG_DIR) {
        let path = PathBuf::from(config_dir).join(filename);
        if path.exists() {
            return (Some(path), ConfigSource::Environment);
        }
    }

    if let Some(dir) = xdg_config_dir() {
        let path = dir.join(filename);
        if path.exists() {
            return (Some(path), ConfigSource::XdgConfig);
        }
    }

    let system_path = system_config_dir().join(filename);
    if system_path.exists() {
        return (Some(system_path), ConfigSource::SystemConfig);
    }

    (None, ConfigSource::BuiltinDefault)
}

/// XDG config directory for subst.
pub fn xdg_config_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME))
}

/// System config directory.
pub fn system_config_dir() -> PathBuf {
    PathBuf::from("/etc").join(APP_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_source_display() {
        assert_eq!(ConfigSource::CliArgument.to_string(), "CLI argument");
        assert_eq!(ConfigSource::Environment.to_string(), "environment variable");
        assert_eq!(ConfigSource::XdgConfig.to_string(), "XDG config");
        assert_eq!(ConfigSource::SystemConfig.to_string(), "system config");
        assert_eq!(ConfigSource::BuiltinDefault.to_string(), "builtin default");
    }

    #[test]
    fn test_system_config_dir() {
        assert_eq!(system_config_dir(), PathBuf::from("/etc/subst"));
    }

    #[test]
    fn test_xdg_config_dir() {
        if let Some(path) = xdg_config_dir() {
            assert!(path.ends_with(APP_NAME));
        }
    }

    #[test]
    fn test_missing_cli_path_falls_through() {
        let (path, source) = resolve_single_config(
            Some(Path::new("/nonexistent/subst/policy.json")),
            "SUBST_TEST_UNSET_VARIABLE",
            "subst-test-no-such-file.json",
        );
        assert!(path.is_none());
        assert_eq!(source, ConfigSource::BuiltinDefault);
    }
}
