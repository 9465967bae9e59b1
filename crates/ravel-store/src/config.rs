//! Facade configuration.
//!
//! Loaded from TOML, then optionally overridden from the environment:
//!
//! ```toml
//! mixed_families = "promote_dense"
//! validate_layouts = false
//! ```

use std::path::Path;

use ravel_core::MixedFamilyPolicy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RavelError, RavelResult};

pub const ENV_MIXED_FAMILIES: &str = "RAVEL_MIXED_FAMILIES";
pub const ENV_VALIDATE_LAYOUTS: &str = "RAVEL_VALIDATE_LAYOUTS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RavelConfig {
    /// How `get_attribute` treats documents whose entries disagree on family.
    pub mixed_families: MixedFamilyPolicy,
    /// Run the full structural scan on values passed to `set_attribute`.
    pub validate_layouts: bool,
}

impl Default for RavelConfig {
    fn default() -> Self {
        Self {
            mixed_families: MixedFamilyPolicy::Reject,
            validate_layouts: true,
        }
    }
}

impl RavelConfig {
    /// # Errors
    /// [`RavelError::Config`] when `text` is not a valid configuration.
    pub fn from_toml_str(text: &str) -> RavelResult<Self> {
        toml::from_str(text)
            .map_err(|e| RavelError::config(format!("failed to parse config: {e}")))
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    /// [`RavelError::Config`] when the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> RavelResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RavelError::config(format!(
                "failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), ?config, "loaded ravel config");
        Ok(config)
    }

    /// Apply `RAVEL_MIXED_FAMILIES` and `RAVEL_VALIDATE_LAYOUTS` when set.
    ///
    /// # Errors
    /// [`RavelError::Config`] when a variable holds an unrecognised value.
    pub fn with_env_overrides(self) -> RavelResult<Self> {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> RavelResult<Self> {
        if let Some(raw) = lookup(ENV_MIXED_FAMILIES) {
            self.mixed_families = parse_policy(&raw)?;
        }
        if let Some(raw) = lookup(ENV_VALIDATE_LAYOUTS) {
            self.validate_layouts = parse_bool(ENV_VALIDATE_LAYOUTS, &raw)?;
        }
        Ok(self)
    }

    #[must_use]
    pub const fn with_mixed_families(mut self, policy: MixedFamilyPolicy) -> Self {
        self.mixed_families = policy;
        self
    }

    #[must_use]
    pub const fn with_validate_layouts(mut self, validate: bool) -> Self {
        self.validate_layouts = validate;
        self
    }
}

fn parse_policy(raw: &str) -> RavelResult<MixedFamilyPolicy> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "reject" => Ok(MixedFamilyPolicy::Reject),
        "promote_dense" => Ok(MixedFamilyPolicy::PromoteDense),
        other => Err(RavelError::config(format!(
            "{ENV_MIXED_FAMILIES} must be `reject` or `promote_dense`, got `{other}`"
        ))),
    }
}

fn parse_bool(key: &str, raw: &str) -> RavelResult<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(RavelError::config(format!(
            "{key} must be a boolean, got `{other}`"
        ))),
    }
}
