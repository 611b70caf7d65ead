use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use termlex_terminology::TerminologyConfig;

/// Per-profile CLI configuration; everything optional, defaults come from
/// [`TerminologyConfig`].
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub value_set_base_url: Option<String>,
    pub concept_base_url: Option<String>,
    pub ticket_base_url: Option<String>,
    pub format: Option<String>,
}

pub fn config_dir() -> Result<PathBuf> {
    let dir = dirs::home_dir()
        .context("Cannot determine home directory")?
        .join(".termlex");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

fn profile_path(profile: &str) -> Result<PathBuf> {
    Ok(config_dir()?.join(format!("config.{profile}.toml")))
}

pub fn load_profile(profile: &str) -> Result<ProfileConfig> {
    let path = profile_path(profile)?;
    if !path.exists() {
        return Ok(ProfileConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    toml::from_str(&content).context("Failed to parse profile config")
}

pub fn save_profile(profile: &str, config: &ProfileConfig) -> Result<()> {
    let path = profile_path(profile)?;
    let content = toml::to_string_pretty(config)?;
    fs::write(path, content)?;
    Ok(())
}

/// Terminology config with this profile's overrides applied.
pub fn terminology_config(profile: &ProfileConfig) -> TerminologyConfig {
    let mut config = TerminologyConfig::default();
    if let Some(url) = &profile.value_set_base_url {
        config.value_set_base_url = url.clone();
    }
    if let Some(url) = &profile.concept_base_url {
        config.concept_base_url = url.clone();
    }
    if let Some(url) = &profile.ticket_base_url {
        config.ticket_base_url = url.clone();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_apply_over_defaults() {
        let profile = ProfileConfig {
            concept_base_url: Some("http://localhost:8080/rest".to_string()),
            ..ProfileConfig::default()
        };
        let config = terminology_config(&profile);
        assert_eq!(config.concept_base_url, "http://localhost:8080/rest");
        assert!(config.value_set_base_url.starts_with("https://"));
    }

    #[test]
    fn test_profile_roundtrips_through_toml() {
        let profile = ProfileConfig {
            value_set_base_url: Some("http://localhost:8080/vs".to_string()),
            format: Some("text".to_string()),
            ..ProfileConfig::default()
        };
        let serialized = toml::to_string_pretty(&profile).unwrap();
        let parsed: ProfileConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.value_set_base_url, profile.value_set_base_url);
        assert_eq!(parsed.format, profile.format);
        assert!(parsed.ticket_base_url.is_none());
    }
}
