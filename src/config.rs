//! Run configuration: defaults that command-line flags override.
//!
//! Loaded from an optional TOML file. Resolution order for every setting is
//! flag → file → built-in default.

use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;
use crate::filter::SchemeRetention;
use crate::rdf_io::RdfFormat;

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    /// Input serialization when `--format` is not given.
    pub format: Option<RdfFormat>,
    /// Base IRI for resolving relative IRIs in the input.
    pub base_iri: Option<String>,
    pub hierarchy: HierarchyConfig,
    pub language: LanguageConfig,
}

/// `[hierarchy]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HierarchyConfig {
    pub schemes: Option<SchemeRetention>,
}

/// `[language]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LanguageConfig {
    pub keep_other_languages: Option<bool>,
}

impl FilterConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_toml(&content, &path.display().to_string())
    }

    /// Parse TOML text. `origin` names the source in error messages.
    pub fn from_toml(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Load the file if a path was given, otherwise use defaults.
    pub fn load_optional(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => {
                let config = Self::load(path)?;
                tracing::debug!(config = %path.display(), "configuration loaded");
                Ok(config)
            }
            None => Ok(Self::default()),
        }
    }

    pub fn input_format(&self, flag: Option<RdfFormat>) -> RdfFormat {
        flag.or(self.format).unwrap_or_default()
    }

    pub fn base_iri<'a>(&'a self, flag: Option<&'a str>) -> Option<&'a str> {
        flag.or(self.base_iri.as_deref())
    }

    pub fn scheme_retention(&self, flag: Option<SchemeRetention>) -> SchemeRetention {
        flag.or(self.hierarchy.schemes).unwrap_or_default()
    }

    pub fn keep_other_languages(&self, flag: Option<bool>) -> bool {
        flag.or(self.language.keep_other_languages).unwrap_or(true)
    }
}
