//! Organizations file loading

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{ConfigError, Result};

/// An organization entry from the organizations file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationConfig {
    /// GitHub organization login
    pub name: String,

    /// Disabled organizations are skipped entirely
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Contents of the organizations file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationList {
    #[serde(default)]
    pub organizations: Vec<OrganizationConfig>,
}

impl OrganizationList {
    /// Load from a JSON file, or YAML when the extension is `.yaml`/`.yml`
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(ConfigError::OrganizationsNotFound(path.display().to_string()).into());
        }

        let contents = std::fs::read_to_string(path)?;
        let is_yaml = matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        );

        if is_yaml {
            Ok(serde_yaml::from_str(&contents).map_err(ConfigError::from)?)
        } else {
            serde_json::from_str(&contents).map_err(|e| {
                ConfigError::ParseError(format!("{}: {}", path.display(), e)).into()
            })
        }
    }

    /// Enabled organizations in file order
    pub fn enabled(&self) -> impl Iterator<Item = &OrganizationConfig> {
        self.organizations.iter().filter(|org| org.enabled)
    }

    pub fn disabled_count(&self) -> usize {
        self.organizations.iter().filter(|org| !org.enabled).count()
    }
}
