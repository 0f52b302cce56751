//! YAML configuration loading and types.

use std::path::{Path, PathBuf};

use gwadmin_directory::{
    DeleteGate, DirectoryClient, DirectoryConfig, DirectoryCredentials, ServiceAccountKey,
    DEFAULT_DIRECTORY_ENDPOINT, DEFAULT_SCOPES,
};
use serde::{Deserialize, Deserializer};

use crate::batch::LifecycleAction;
use crate::error::{CliError, CliResult};

/// Root gwadmin configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub credentials: CredentialsSettings,
    #[serde(default)]
    pub directory: DirectorySettings,
    pub groups: GroupMappings,
    #[serde(default)]
    pub provision: ProvisionSettings,
    #[serde(default)]
    pub batch: BatchSettings,
}

/// How to authenticate against the directory.
#[derive(Debug, Clone, Deserialize)]
pub struct CredentialsSettings {
    /// Service account JSON key.
    #[serde(default)]
    pub key_file: Option<PathBuf>,
    /// Pre-issued bearer token, used instead of `key_file` when set.
    #[serde(default)]
    pub access_token: Option<String>,
    /// Administrator impersonated through domain-wide delegation.
    pub delegate: String,
    #[serde(default = "default_scopes", deserialize_with = "comma_list")]
    pub scopes: Vec<String>,
}

fn default_scopes() -> Vec<String> {
    DEFAULT_SCOPES.iter().map(|s| (*s).to_string()).collect()
}

/// Directory API tuning.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectorySettings {
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub token_uri: Option<String>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_reuse_tokens")]
    pub reuse_tokens: bool,
    #[serde(default)]
    pub delete_gate: DeleteGate,
    #[serde(default = "default_org_unit")]
    pub restore_org_unit: String,
}

impl Default for DirectorySettings {
    fn default() -> Self {
        Self {
            domain: None,
            endpoint: default_endpoint(),
            token_uri: None,
            page_size: default_page_size(),
            request_timeout_secs: default_timeout(),
            reuse_tokens: default_reuse_tokens(),
            delete_gate: DeleteGate::default(),
            restore_org_unit: default_org_unit(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_DIRECTORY_ENDPOINT.to_string()
}

fn default_page_size() -> u32 {
    200
}

fn default_timeout() -> u64 {
    30
}

fn default_reuse_tokens() -> bool {
    true
}

fn default_org_unit() -> String {
    "/".to_string()
}

/// Target groups per department category.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupMappings {
    #[serde(deserialize_with = "comma_list")]
    pub sales: Vec<String>,
    #[serde(deserialize_with = "comma_list")]
    pub eng: Vec<String>,
    #[serde(deserialize_with = "comma_list")]
    pub catch_all: Vec<String>,
}

/// Defaults for the provisioning run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProvisionSettings {
    #[serde(default)]
    pub file: Option<PathBuf>,
}

/// Defaults for the lifecycle batch runner.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchSettings {
    #[serde(default)]
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub action: LifecycleAction,
}

/// Accepts either a YAML list or a comma-separated string.
fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrList {
        One(String),
        Many(Vec<String>),
    }

    let items = match StringOrList::deserialize(deserializer)? {
        StringOrList::One(s) => s.split(',').map(str::to_string).collect(),
        StringOrList::Many(v) => v,
    };

    Ok(items
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect())
}

impl Settings {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> CliResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CliError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str) -> CliResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| CliError::Config(format!("Failed to parse config: {e}")))
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from `lookup`, keyed by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key_file) = lookup("GWADMIN_KEY_FILE") {
            self.credentials.key_file = Some(PathBuf::from(key_file));
        }
        if let Some(token) = lookup("GWADMIN_ACCESS_TOKEN") {
            self.credentials.access_token = Some(token);
        }
        if let Some(delegate) = lookup("GWADMIN_DELEGATE") {
            self.credentials.delegate = delegate;
        }
        if let Some(domain) = lookup("GWADMIN_DOMAIN") {
            self.directory.domain = Some(domain);
        }
    }

    /// Builds the directory client configuration.
    pub fn directory_config(&self) -> CliResult<DirectoryConfig> {
        let mut builder = DirectoryConfig::builder()
            .endpoint(self.directory.endpoint.clone())
            .delegate(self.credentials.delegate.clone())
            .scopes(self.credentials.scopes.clone())
            .page_size(self.directory.page_size)
            .request_timeout_secs(self.directory.request_timeout_secs)
            .reuse_tokens(self.directory.reuse_tokens)
            .delete_gate(self.directory.delete_gate)
            .restore_org_unit(self.directory.restore_org_unit.clone());

        if let Some(ref domain) = self.directory.domain {
            builder = builder.domain(domain.clone());
        }
        if let Some(ref token_uri) = self.directory.token_uri {
            builder = builder.token_uri(token_uri.clone());
        }

        Ok(builder.build()?)
    }

    /// Resolves the configured credentials.
    pub fn directory_credentials(&self) -> CliResult<DirectoryCredentials> {
        if let Some(ref token) = self.credentials.access_token {
            return Ok(DirectoryCredentials::AccessToken(token.clone().into()));
        }

        let key_file = self.credentials.key_file.as_ref().ok_or_else(|| {
            CliError::Config(
                "credentials.key_file or credentials.access_token must be set".to_string(),
            )
        })?;

        Ok(DirectoryCredentials::ServiceAccount(
            ServiceAccountKey::from_file(key_file)?,
        ))
    }

    /// Builds a directory client from this configuration.
    pub fn build_client(&self) -> CliResult<DirectoryClient> {
        Ok(DirectoryClient::new(
            self.directory_config()?,
            self.directory_credentials()?,
        )?)
    }
}
