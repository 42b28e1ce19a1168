//! Biome component options
//!
//! [`BiomeOptions`] is the user-facing, partially specified form (every field
//! optional, camelCase on the wire). [`ResolvedOptions`] has the documented
//! defaults filled in and is what the component works with.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::BiomeKitError;
use crate::merge::Tree;
use crate::result::Result;

/// Default Biome version selector
pub const DEFAULT_BIOME_VERSION: &str = "^1";

/// Options for the Biome component
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BiomeOptions {
    /// Version of Biome to use
    #[schemars(description = "Version selector for @biomejs/biome (default: ^1)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    /// Enable linting. Replaces Eslint.
    #[schemars(description = "Enable the Biome linter (default: true)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linter: Option<bool>,

    /// Enable code formatter. Replaces Prettier.
    #[schemars(description = "Enable the Biome formatter (default: false)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub formatter: Option<bool>,

    /// Enable import sorting/organizing
    #[schemars(description = "Enable the Biome import organizer (default: false)")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organize_imports: Option<bool>,

    /// Merge arrays (deduplicated) instead of replacing them when applying overrides
    #[schemars(
        description = "Merge arrays from overrides with defaults instead of replacing them (default: true)"
    )]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_arrays_in_configuration: Option<bool>,

    /// Biome configuration applied last; it dictates the final outcome for every key it sets
    #[schemars(description = "Biome configuration merged on top of the generated defaults")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overrides: Option<Tree>,
}

/// Which Biome features end up enabled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnabledFeatures {
    pub linter: bool,
    pub formatter: bool,
    pub organize_imports: bool,
}

/// Options with defaults applied
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub version: String,
    pub features: EnabledFeatures,
    pub merge_arrays: bool,
    pub overrides: Tree,
}

impl BiomeOptions {
    /// Apply the documented defaults: linter on, formatter and import
    /// organizer off, arrays merged, version `^1`.
    pub fn resolve(&self) -> ResolvedOptions {
        ResolvedOptions {
            version: self
                .version
                .clone()
                .unwrap_or_else(|| DEFAULT_BIOME_VERSION.to_string()),
            features: EnabledFeatures {
                linter: self.linter.unwrap_or(true),
                formatter: self.formatter.unwrap_or(false),
                organize_imports: self.organize_imports.unwrap_or(false),
            },
            merge_arrays: self.merge_arrays_in_configuration.unwrap_or(true),
            overrides: self.overrides.clone().unwrap_or_default(),
        }
    }

    /// Reject option values that would produce a broken project.
    ///
    /// The version must be a valid semver requirement (`^1`, `~1.9.0`,
    /// `>=1.8, <2`).
    pub fn validate(&self) -> Result<()> {
        if let Some(version) = &self.version {
            semver::VersionReq::parse(version).map_err(|e| {
                BiomeKitError::config_error(format!(
                    "Invalid Biome version selector '{version}': {e}"
                ))
            })?;
        }
        Ok(())
    }
}

impl ResolvedOptions {
    /// Feed resolved values back into the builder's option form, with every
    /// field set explicitly.
    pub fn to_options(&self) -> BiomeOptions {
        BiomeOptions {
            version: Some(self.version.clone()),
            linter: Some(self.features.linter),
            formatter: Some(self.features.formatter),
            organize_imports: Some(self.features.organize_imports),
            merge_arrays_in_configuration: Some(self.merge_arrays),
            overrides: Some(self.overrides.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_defaults() {
        let resolved = BiomeOptions::default().resolve();
        assert_eq!(resolved.version, "^1");
        assert!(resolved.features.linter);
        assert!(!resolved.features.formatter);
        assert!(!resolved.features.organize_imports);
        assert!(resolved.merge_arrays);
        assert!(resolved.overrides.is_empty());
    }

    #[test]
    fn test_deserialize_camel_case() {
        let options: BiomeOptions = serde_json::from_value(json!({
            "version": "^1.9",
            "linter": false,
            "organizeImports": true,
            "mergeArraysInConfiguration": false,
            "overrides": { "files": { "ignore": ["dist"] } }
        }))
        .unwrap();

        assert_eq!(options.version.as_deref(), Some("^1.9"));
        assert_eq!(options.linter, Some(false));
        assert_eq!(options.formatter, None);
        assert_eq!(options.organize_imports, Some(true));
        assert_eq!(options.merge_arrays_in_configuration, Some(false));
        assert_eq!(
            options.overrides.unwrap()["files"]["ignore"],
            json!(["dist"])
        );
    }

    #[test]
    fn test_validate_version_selector() {
        let good = BiomeOptions {
            version: Some("~1.9.0".to_string()),
            ..Default::default()
        };
        assert!(good.validate().is_ok());

        let bad = BiomeOptions {
            version: Some("not a version".to_string()),
            ..Default::default()
        };
        let err = bad.validate().unwrap_err();
        assert!(err.to_string().contains("Invalid Biome version selector"));
    }

    #[test]
    fn test_to_options_round_trips_resolution() {
        let resolved = BiomeOptions {
            formatter: Some(true),
            ..Default::default()
        }
        .resolve();

        assert_eq!(resolved.to_options().resolve(), resolved);
    }
}
