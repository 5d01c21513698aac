//! # View configuration: `users.toml`
//!
//! Defines the TOML file that configures the users view: where the remote store
//! lives and how the form behaves when a remote write fails.
//!
//! ## Structure
//!
//! ```toml
//! [remote]
//! base_url = "http://localhost:3000/api"
//! users_path = "user"
//! experiences_path = "experiencias"
//!
//! [form]
//! draft_policy = "clear-always"   # or "keep-on-failure"
//! ```
//!
//! ## Types
//!
//! | Struct | Purpose |
//! |--------|---------|
//! | [`UsersConfig`] | Top-level config. Builder helpers (`new`, `with_draft_policy`), TOML (de)serialisation, and the canonical filename. |
//! | [`RemoteConfig`] | Base URL and resource paths of the REST API. |
//! | [`FormConfig`] | The [`DraftPolicy`] applied after a create/update has been dispatched. |
//!
//! Every section has serde defaults, so a missing or empty file is equivalent to
//! the default configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `users.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UsersConfig {
    #[serde(default)]
    pub remote: RemoteConfig,
    #[serde(default)]
    pub form: FormConfig,
}

/// Location of the REST API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// API root, without a trailing slash.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_users_path")]
    pub users_path: String,
    #[serde(default = "default_experiences_path")]
    pub experiences_path: String,
}

fn default_base_url() -> String {
    "http://localhost:3000/api".to_string()
}

fn default_users_path() -> String {
    "user".to_string()
}

fn default_experiences_path() -> String {
    "experiencias".to_string()
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            users_path: default_users_path(),
            experiences_path: default_experiences_path(),
        }
    }
}

/// What happens to the draft once a create or update has been dispatched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DraftPolicy {
    /// Reset the draft and end the edit session whatever the remote outcome.
    #[default]
    ClearAlways,
    /// Keep the draft (and the edit session) when the remote call failed.
    KeepOnFailure,
}

/// Form behaviour.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormConfig {
    #[serde(default)]
    pub draft_policy: DraftPolicy,
}

impl UsersConfig {
    /// Create a config pointing at the given API root.
    pub fn new(base_url: String) -> Self {
        Self {
            remote: RemoteConfig {
                base_url,
                ..RemoteConfig::default()
            },
            form: FormConfig::default(),
        }
    }

    /// Builder method to set the draft policy.
    pub fn with_draft_policy(mut self, policy: DraftPolicy) -> Self {
        self.form.draft_policy = policy;
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "users.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = UsersConfig::from_toml("").unwrap();
        assert_eq!(config, UsersConfig::default());
        assert_eq!(config.remote.base_url, "http://localhost:3000/api");
        assert_eq!(config.remote.users_path, "user");
        assert_eq!(config.form.draft_policy, DraftPolicy::ClearAlways);
    }

    #[test]
    fn test_partial_sections_fill_defaults() {
        let config = UsersConfig::from_toml(
            "[remote]\nbase_url = \"https://api.example.com\"\n\n[form]\ndraft_policy = \"keep-on-failure\"\n",
        )
        .unwrap();
        assert_eq!(config.remote.base_url, "https://api.example.com");
        assert_eq!(config.remote.experiences_path, "experiencias");
        assert_eq!(config.form.draft_policy, DraftPolicy::KeepOnFailure);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = UsersConfig::new("http://127.0.0.1:4000/api".to_string())
            .with_draft_policy(DraftPolicy::KeepOnFailure);
        let text = config.to_toml().unwrap();
        assert_eq!(UsersConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn test_unknown_policy_is_rejected() {
        assert!(UsersConfig::from_toml("[form]\ndraft_policy = \"sometimes\"\n").is_err());
    }
}
