//! biome-kit type generation
//!
//! Turns the Biome configuration JSON Schema into TypeScript declarations
//! for the generated configuration API. Compilation names every declaration
//! `I{name}`, then an ordered [`RewriteTable`] adjusts the text for strict
//! interface compilers:
//!
//! ```no_run
//! # async fn run() -> biome_kit_typegen::Result<()> {
//! use biome_kit_typegen::TypeGenerator;
//!
//! TypeGenerator::new("node_modules/@biomejs/biome/configuration_schema.json")
//!     .generate("src/biome-configuration.ts")
//!     .await?;
//! # Ok(())
//! # }
//! ```

pub mod compiler;
pub mod error;
pub mod naming;
pub mod rewrite;

use std::path::{Path, PathBuf};

use serde_json::Value;
use tokio::fs;
use tracing::info;

pub use compiler::{CompileOptions, DEFAULT_BANNER, NameFn, SchemaCompiler};
pub use error::{Result, TypegenError};
pub use naming::{interface_name, to_safe_string};
pub use rewrite::{Matcher, RewriteRule, RewriteTable};

/// Location of the Biome schema in an installed project
pub const DEFAULT_SCHEMA_PATH: &str = "node_modules/@biomejs/biome/configuration_schema.json";

/// Generate declarations from the schema at [`DEFAULT_SCHEMA_PATH`] and write
/// them to `output`.
pub async fn generate_types(output: impl AsRef<Path>) -> Result<()> {
    TypeGenerator::new(DEFAULT_SCHEMA_PATH).generate(output).await
}

/// Reads a schema, compiles it and writes the rewritten declarations
#[derive(Debug)]
pub struct TypeGenerator {
    schema_path: PathBuf,
    compiler: SchemaCompiler,
    rewrites: RewriteTable,
}

impl TypeGenerator {
    /// Generator for the schema at `schema_path`, with interface naming and
    /// the Biome rewrite rules
    pub fn new(schema_path: impl Into<PathBuf>) -> Self {
        Self {
            schema_path: schema_path.into(),
            compiler: SchemaCompiler::new(CompileOptions {
                custom_name: Some(Box::new(interface_name)),
                ..Default::default()
            }),
            rewrites: RewriteTable::biome().clone(),
        }
    }

    pub fn with_compiler(mut self, compiler: SchemaCompiler) -> Self {
        self.compiler = compiler;
        self
    }

    /// Run `rule` after the built-in rewrites
    pub fn with_rule(mut self, rule: RewriteRule) -> Self {
        self.rewrites.push(rule);
        self
    }

    pub fn schema_path(&self) -> &Path {
        &self.schema_path
    }

    /// Compile and rewrite a schema that is already in memory
    pub fn render(&self, schema: &Value) -> Result<String> {
        let compiled = self.compiler.compile(schema)?;
        Ok(self.rewrites.apply(&compiled))
    }

    /// Read the schema and return the final declaration text
    pub async fn generate_string(&self) -> Result<String> {
        let content = fs::read_to_string(&self.schema_path)
            .await
            .map_err(|e| TypegenError::io(&self.schema_path, e))?;
        let schema: Value = serde_json::from_str(&content)?;
        self.render(&schema)
    }

    /// Generate declarations and write them to `output`, creating parent
    /// directories and replacing any existing file.
    pub async fn generate(&self, output: impl AsRef<Path>) -> Result<()> {
        let output = output.as_ref();
        let types = self.generate_string().await?;

        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| TypegenError::io(parent, e))?;
        }
        fs::write(output, &types)
            .await
            .map_err(|e| TypegenError::io(output, e))?;

        info!(
            schema = %self.schema_path.display(),
            output = %output.display(),
            bytes = types.len(),
            "Generated configuration types"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_missing_schema_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = TypeGenerator::new(dir.path().join("missing.json"))
            .generate(dir.path().join("out.ts"))
            .await
            .unwrap_err();
        assert!(matches!(err, TypegenError::Io { .. }));
        assert!(!dir.path().join("out.ts").exists());
    }

    #[tokio::test]
    async fn test_malformed_schema_is_json_error() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("schema.json");
        std::fs::write(&schema, "{ not json").unwrap();

        let err = TypeGenerator::new(&schema)
            .generate(dir.path().join("out.ts"))
            .await
            .unwrap_err();
        assert!(matches!(err, TypegenError::Json(_)));
    }

    #[tokio::test]
    async fn test_generate_creates_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let schema = dir.path().join("schema.json");
        std::fs::write(
            &schema,
            json!({ "title": "Configuration", "type": "object", "additionalProperties": false })
                .to_string(),
        )
        .unwrap();

        let output = dir.path().join("src/generated/types.ts");
        TypeGenerator::new(&schema).generate(&output).await.unwrap();

        let text = std::fs::read_to_string(output).unwrap();
        assert!(text.contains("export interface IConfiguration {}"));
    }

    #[test]
    fn test_render_applies_extra_rule() {
        let generator = TypeGenerator::new("unused.json").with_rule(RewriteRule::literal(
            "rename",
            "IConfiguration",
            "BiomeConfiguration",
        ));
        let text = generator
            .render(&json!({ "title": "Configuration", "type": "object", "additionalProperties": false }))
            .unwrap();
        assert!(text.contains("export interface BiomeConfiguration {}"));
    }
}
