//! Options file for the biome-kit CLI
//!
//! The CLI reads the Biome component options, the host project description
//! and the type generation settings from one file:
//!
//! - `biome-kit.json` / `biome-kit.jsonc` - JSON with comments and trailing commas
//! - `biome-kit.yaml` / `biome-kit.yml`
//! - `biome-kit.toml`
//!
//! When no explicit path is given, the loader searches from the current
//! directory upward until a file is found or the filesystem root is reached.
//!
//! ## Example
//!
//! ```jsonc
//! {
//!   "project": {
//!     "name": "app",
//!     "kind": "typescript",
//!     "projenrc": ".projenrc.ts",
//!     "components": ["prettier"]
//!   },
//!   "biome": {
//!     "linter": true,
//!     "overrides": { "files": { "ignore": ["dist"] } }
//!   },
//!   "types": { "output": "src/biome-configuration.ts" }
//! }
//! ```

mod kit_config;
mod loader;

pub use kit_config::{
    ComponentName, ConfigFormat, DEFAULT_SCHEMA_PATH, DEFAULT_TYPES_OUTPUT, KitConfig,
    ProjectKindName, ProjectSection, TypesSection,
};
pub use loader::{CONFIG_FILE_NAMES, ConfigLoader};
