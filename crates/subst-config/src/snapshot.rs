//! Configuration snapshots for run logs and reproducibility.
//!
//! A snapshot records which files a run loaded, where they came from and
//! their content hashes, so a rendered decision can be traced back to the
//! thresholds that produced it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::resolve::{ConfigPaths, ConfigSource};
use crate::Config;

/// A frozen snapshot of configuration state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub timestamp: DateTime<Utc>,

    #[serde(default)]
    pub hostname: Option<String>,

    pub schema_version: String,

    /// SHA-256 of the policy file content.
    #[serde(default)]
    pub policy_hash: Option<String>,
    #[serde(default)]
    pub policy_path: Option<String>,
    pub policy_source: String,

    /// SHA-256 of the scoring file content.
    #[serde(default)]
    pub scoring_hash: Option<String>,
    #[serde(default)]
    pub scoring_path: Option<String>,
    pub scoring_source: String,

    /// Hash over both file hashes, for quick comparison.
    pub combined_hash: String,

    pub summary: ConfigSummary,
}

/// Key values for quick reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSummary {
    pub small_result_limit: usize,
    pub min_confidence: f64,
    pub min_probability: f64,
    pub temperature: f64,
    pub cross_family_multiplier: f64,
}

impl ConfigSummary {
    pub fn from_config(config: &Config) -> Self {
        ConfigSummary {
            small_result_limit: config.policy.small_result_limit,
            min_confidence: config.policy.min_confidence,
            min_probability: config.policy.min_probability,
            temperature: config.scoring.temperature,
            cross_family_multiplier: config.scoring.cross_family_multiplier,
        }
    }
}

impl ConfigSnapshot {
    /// Snapshot a loaded configuration along with the raw file contents.
    pub fn new(
        config: &Config,
        paths: &ConfigPaths,
        policy_json: Option<&str>,
        scoring_json: Option<&str>,
    ) -> Self {
        let policy_hash = policy_json.map(hash_content);
        let scoring_hash = scoring_json.map(hash_content);
        let combined = format!(
            "{}:{}",
            policy_hash.as_deref().unwrap_or("none"),
            scoring_hash.as_deref().unwrap_or("none")
        );

        ConfigSnapshot {
            timestamp: Utc::now(),
            hostname: current_hostname(),
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            policy_hash,
            policy_path: paths.policy.as_ref().map(|p| p.display().to_string()),
            policy_source: paths.policy_source.to_string(),
            scoring_hash,
            scoring_path: paths.scoring.as_ref().map(|p| p.display().to_string()),
            scoring_source: paths.scoring_source.to_string(),
            combined_hash: hash_content(&combined),
            summary: ConfigSummary::from_config(config),
        }
    }

    /// Snapshot with only built-in defaults.
    pub fn defaults_only() -> Self {
        ConfigSnapshot {
            timestamp: Utc::now(),
            hostname: current_hostname(),
            schema_version: crate::CONFIG_SCHEMA_VERSION.to_string(),
            policy_hash: None,
            policy_path: None,
            policy_source: ConfigSource::BuiltinDefault.to_string(),
            scoring_hash: None,
            scoring_path: None,
            scoring_source: ConfigSource::BuiltinDefault.to_string(),
            combined_hash: hash_content("none:none"),
            summary: ConfigSummary::from_config(&Config::default()),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Same configuration content as `other`.
    pub fn matches(&self, other: &ConfigSnapshot) -> bool {
        self.combined_hash == other.combined_hash
    }

    /// First 12 chars of the combined hash.
    pub fn short_id(&self) -> &str {
        &self.combined_hash[..12.min(self.combined_hash.len())]
    }
}

fn current_hostname() -> Option<String> {
    hostname::get()
        .ok()
        .map(|h| h.to_string_lossy().to_string())
}

/// SHA-256 as lowercase hex.
fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_snapshot() {
        let snapshot = ConfigSnapshot::defaults_only();
        assert_eq!(snapshot.schema_version, crate::CONFIG_SCHEMA_VERSION);
        assert!(snapshot.policy_hash.is_none());
        assert!(snapshot.scoring_hash.is_none());
        assert_eq!(snapshot.summary.min_confidence, 40.0);
        assert_eq!(snapshot.policy_source, "builtin default");
    }

    #[test]
    fn test_short_id() {
        assert_eq!(ConfigSnapshot::defaults_only().short_id().len(), 12);
    }

    #[test]
    fn test_content_changes_hash() {
        let paths = ConfigPaths::default();
        let config = Config::default();
        let a = ConfigSnapshot::new(&config, &paths, Some(r#"{"min_confidence": 40}"#), None);
        let b = ConfigSnapshot::new(&config, &paths, Some(r#"{"min_confidence": 50}"#), None);
        let c = ConfigSnapshot::new(&config, &paths, Some(r#"{"min_confidence": 40}"#), None);
        assert!(!a.matches(&b));
        assert!(a.matches(&c));
        assert_eq!(a.policy_hash.as_deref().map(str::len), Some(64));
    }

    #[test]
    fn test_json_roundtrip() {
        let snapshot = ConfigSnapshot::defaults_only();
        let json = snapshot.to_json().unwrap();
        let restored = ConfigSnapshot::from_json(&json).unwrap();
        assert!(snapshot.matches(&restored));
        assert_eq!(snapshot.summary, restored.summary);
    }
}
