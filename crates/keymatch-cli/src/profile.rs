//! Match settings from a TOML profile merged with command-line overrides.

use std::path::Path;

use anyhow::{Context, Result, bail};
use keymatch_core::MatchConfig;
use tracing::debug;

/// Values given on the command line. `None` keeps the profile value.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub reference_key: Option<String>,
    pub offer_key: Option<String>,
    /// Replaces the profile's list when non-empty.
    pub extra_columns: Vec<String>,
    pub fuzzy_threshold: Option<f64>,
    pub no_match_marker: Option<String>,
    pub rename_suffix: Option<String>,
}

impl ConfigOverrides {
    pub fn apply(self, mut config: MatchConfig) -> MatchConfig {
        if let Some(key) = self.reference_key {
            config.reference_key = key;
        }
        if let Some(key) = self.offer_key {
            config.offer_key = key;
        }
        if !self.extra_columns.is_empty() {
            config.extra_columns = self.extra_columns;
        }
        if let Some(threshold) = self.fuzzy_threshold {
            config.fuzzy_threshold = threshold;
        }
        if let Some(marker) = self.no_match_marker {
            config.no_match_marker = marker;
        }
        if let Some(suffix) = self.rename_suffix {
            config.rename_suffix = suffix;
        }
        config
    }
}

/// Parse a profile; absent fields take their defaults.
pub fn load_profile(path: &Path) -> Result<MatchConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read profile: {}", path.display()))?;
    let config: MatchConfig =
        toml::from_str(&text).with_context(|| format!("parse profile: {}", path.display()))?;
    debug!(path = %path.display(), "loaded match profile");
    Ok(config)
}

/// Merge an optional profile with overrides and validate the result.
pub fn resolve_config(profile: Option<&Path>, overrides: ConfigOverrides) -> Result<MatchConfig> {
    let base = match profile {
        Some(path) => load_profile(path)?,
        None => MatchConfig::default(),
    };
    let config = overrides.apply(base);
    if config.reference_key.trim().is_empty() {
        bail!(
            "reference key column is required (--reference-key or `reference_key` in the profile)"
        );
    }
    if config.offer_key.trim().is_empty() {
        bail!("offer key column is required (--offer-key or `offer_key` in the profile)");
    }
    config.validate().context("invalid match settings")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_flags_override_profile() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.toml");
        fs::write(
            &path,
            "reference_key = \"Code\"\noffer_key = \"Sku\"\nextra_columns = [\"Name\"]\nfuzzy_threshold = 90.0\n",
        )
        .unwrap();

        let overrides = ConfigOverrides {
            offer_key: Some("Product".to_string()),
            no_match_marker: Some("Ei vastaavaa".to_string()),
            ..ConfigOverrides::default()
        };
        let config = resolve_config(Some(&path), overrides).unwrap();
        assert_eq!(config.reference_key, "Code");
        assert_eq!(config.offer_key, "Product");
        assert_eq!(config.extra_columns, vec!["Name".to_string()]);
        assert_eq!(config.fuzzy_threshold, 90.0);
        assert_eq!(config.no_match_marker, "Ei vastaavaa");
    }

    #[test]
    fn test_missing_keys_are_usage_errors() {
        let err = resolve_config(None, ConfigOverrides::default()).unwrap_err();
        assert!(err.to_string().contains("reference key column is required"));

        let overrides = ConfigOverrides {
            reference_key: Some("Code".to_string()),
            offer_key: Some("Sku".to_string()),
            fuzzy_threshold: Some(140.0),
            ..ConfigOverrides::default()
        };
        let err = resolve_config(None, overrides).unwrap_err();
        assert_eq!(err.to_string(), "invalid match settings");
    }

    #[test]
    fn test_bad_profile_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "reference_key = [").unwrap();
        let err = load_profile(&path).unwrap_err();
        assert!(err.to_string().starts_with("parse profile:"));
    }
}
