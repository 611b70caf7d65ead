use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use termlex_auth::Credentials;
use termlex_terminology::BasicCredentials;

use crate::config::config_dir;

/// Stored credentials for both sources: the value-set source takes a static
/// basic-auth pair, the concept service takes ticket-exchange credentials.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoredCredentials {
    pub value_set: StoredBasic,
    pub concept: StoredConcept,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct StoredBasic {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum StoredConcept {
    #[serde(rename = "password")]
    Password { username: String, password: String },
    #[serde(rename = "apikey")]
    ApiKey { api_key: String },
}

impl StoredCredentials {
    /// Split into the credential types the service constructor takes.
    pub fn to_service_credentials(&self) -> (BasicCredentials, Credentials) {
        let value_set = BasicCredentials {
            username: self.value_set.username.clone(),
            password: self.value_set.password.clone(),
        };
        let concept = match &self.concept {
            StoredConcept::Password { username, password } => Credentials::Password {
                username: username.clone(),
                password: password.clone(),
            },
            StoredConcept::ApiKey { api_key } => Credentials::ApiKey {
                api_key: api_key.clone(),
            },
        };
        (value_set, concept)
    }
}

fn creds_path(profile: &str) -> Result<PathBuf> {
    Ok(config_dir()?.join(format!("credentials.{profile}.json")))
}

pub fn load_credentials(profile: &str) -> Result<Option<StoredCredentials>> {
    let path = creds_path(profile)?;
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&path)?;
    let creds: StoredCredentials = serde_json::from_str(&content)?;
    Ok(Some(creds))
}

pub fn save_credentials(profile: &str, creds: &StoredCredentials) -> Result<()> {
    let path = creds_path(profile)?;
    let content = serde_json::to_string_pretty(creds)?;
    fs::write(path, content)?;
    Ok(())
}

pub fn remove_credentials(profile: &str) -> Result<bool> {
    let path = creds_path(profile)?;
    if path.exists() {
        fs::remove_file(path)?;
        Ok(true)
    } else {
        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stored_credentials_roundtrip() {
        let creds = StoredCredentials {
            value_set: StoredBasic {
                username: "vs-user".to_string(),
                password: "vs-pass".to_string(),
            },
            concept: StoredConcept::ApiKey {
                api_key: "key-123".to_string(),
            },
        };
        let json = serde_json::to_string(&creds).unwrap();
        assert!(json.contains(r#""type":"apikey""#));

        let parsed: StoredCredentials = serde_json::from_str(&json).unwrap();
        let (value_set, concept) = parsed.to_service_credentials();
        assert_eq!(value_set.username, "vs-user");
        assert!(matches!(concept, Credentials::ApiKey { .. }));
    }
}
