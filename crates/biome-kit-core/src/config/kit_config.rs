//! The biome-kit options file
//!
//! `KitConfig` mirrors what a project definition would pass to the Biome
//! component, plus enough of the host project to synthesize it from the CLI.

use std::fs;
use std::path::{Path, PathBuf};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::biome::Biome;
use crate::component::{Eslint, Prettier, ProjenrcFile};
use crate::error::BiomeKitError;
use crate::options::BiomeOptions;
use crate::project::{Project, ProjectKind};
use crate::result::Result;

/// Default location of the Biome configuration schema
pub const DEFAULT_SCHEMA_PATH: &str = "node_modules/@biomejs/biome/configuration_schema.json";

/// Default location of the generated type declarations
pub const DEFAULT_TYPES_OUTPUT: &str = "src/biome-configuration.ts";

/// Root of the options file
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct KitConfig {
    /// JSON Schema reference (for editor support)
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Host project description
    #[serde(default)]
    pub project: ProjectSection,

    /// Options for the Biome component
    #[serde(default)]
    pub biome: BiomeOptions,

    /// Type generation settings
    #[serde(default)]
    pub types: TypesSection,
}

/// Kind of host project
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ProjectKindName {
    Node,
    #[default]
    Typescript,
}

/// Tools the host project already uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ComponentName {
    Eslint,
    Prettier,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSection {
    /// Package name
    #[schemars(description = "Package name of the project")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[schemars(description = "Project kind: 'node' or 'typescript'")]
    #[serde(default)]
    pub kind: ProjectKindName,

    #[schemars(description = "Source directory of a TypeScript project (default: src)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srcdir: Option<String>,

    #[schemars(description = "Test directory of a TypeScript project (default: test)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub testdir: Option<String>,

    /// Project definition file, checked by Biome with relaxed rules
    #[schemars(description = "Path of the project definition file (e.g. .projenrc.ts)")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projenrc: Option<String>,

    #[schemars(description = "Other tools registered on the project")]
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub components: Vec<ComponentName>,
}

impl Default for ProjectSection {
    fn default() -> Self {
        Self {
            name: None,
            kind: ProjectKindName::default(),
            srcdir: None,
            testdir: None,
            projenrc: Some(".projenrc.ts".to_string()),
            components: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypesSection {
    #[schemars(description = "Biome configuration schema to read")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,

    #[schemars(description = "Where to write the generated TypeScript declarations")]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
}

impl TypesSection {
    pub fn schema_path(&self) -> PathBuf {
        self.schema
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SCHEMA_PATH))
    }

    pub fn output_path(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TYPES_OUTPUT))
    }
}

/// Serialization format of an options file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// Detect the format from a file extension (`.json`, `.jsonc`, `.yaml`,
    /// `.yml`, `.toml`)
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") | Some("jsonc") => Some(Self::Json),
            Some("yaml") | Some("yml") => Some(Self::Yaml),
            Some("toml") => Some(Self::Toml),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Toml => "toml",
        }
    }
}

impl KitConfig {
    /// Parse `content` in the given format. JSON is read as JSON5, so
    /// comments and trailing commas are accepted.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let parsed = match format {
            ConfigFormat::Json => json5::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
            ConfigFormat::Toml => toml::from_str(content).map_err(|e| e.to_string()),
        };
        parsed.map_err(BiomeKitError::config_error)
    }

    /// Load an options file, picking the format from its extension
    pub fn load(path: &Path) -> Result<Self> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| {
            BiomeKitError::config_error(format!(
                "Unsupported file extension for '{}' (expected .json, .jsonc, .yaml, .yml or .toml)",
                path.display()
            ))
        })?;
        let content = fs::read_to_string(path).map_err(|e| BiomeKitError::io_error(path, e))?;
        Self::parse(&content, format)
    }

    /// Serialize in the given format
    pub fn to_string_as(&self, format: ConfigFormat) -> Result<String> {
        let text = match format {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Yaml => {
                serde_yaml::to_string(self).map_err(|e| BiomeKitError::config_error(e.to_string()))?
            }
            ConfigFormat::Toml => toml::to_string_pretty(self)
                .map_err(|e| BiomeKitError::config_error(e.to_string()))?,
        };
        Ok(text)
    }

    /// Check the options without building anything
    pub fn validate(&self) -> Result<()> {
        self.biome.validate()?;
        if self.project.kind == ProjectKindName::Node
            && (self.project.srcdir.is_some() || self.project.testdir.is_some())
        {
            return Err(BiomeKitError::config_error(
                "srcdir and testdir only apply to typescript projects",
            ));
        }
        Ok(())
    }

    /// Build the host project rooted at `root` and register Biome on it.
    ///
    /// Without an explicit name the project takes the name of `root`.
    pub fn to_project(&self, root: &Path) -> Result<Project> {
        self.validate()?;

        let name = self.project.name.clone().unwrap_or_else(|| {
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| "project".to_string())
        });
        let kind = match self.project.kind {
            ProjectKindName::Node => ProjectKind::Node,
            ProjectKindName::Typescript => ProjectKind::TypeScript {
                srcdir: self.project.srcdir.clone().unwrap_or_else(|| "src".to_string()),
                testdir: self.project.testdir.clone().unwrap_or_else(|| "test".to_string()),
            },
        };

        let mut project = Project::new(name, root, kind);
        if let Some(projenrc) = &self.project.projenrc {
            project.add_component(ProjenrcFile::new(projenrc.clone()));
        }
        for component in &self.project.components {
            match component {
                ComponentName::Eslint => project.add_component(Eslint),
                ComponentName::Prettier => project.add_component(Prettier),
            }
        }

        Biome::register(&mut project, self.biome.clone())?;
        Ok(project)
    }
}
