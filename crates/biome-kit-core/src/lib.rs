//! biome-kit core
//!
//! Biome configuration for scaffolded JavaScript/TypeScript projects.
//! This crate provides the configuration merge engine, the default
//! configuration layers, conflict validation against Eslint and Prettier, and
//! the project model that synthesizes `biome.jsonc`.

pub mod biome;
pub mod component;
pub mod config;
pub mod configuration;
pub mod error;
pub mod file;
pub mod layers;
pub mod merge;
pub mod options;
pub mod project;
pub mod result;
pub mod task;
pub mod validation;

// Re-export commonly used types
pub use biome::{BIOME_TASK, Biome, CONFIG_FILE};
pub use component::{Component, ComponentTag, Eslint, Prettier, ProjenrcFile};
pub use config::{ConfigFormat, ConfigLoader, KitConfig};
pub use configuration::build_configuration;
pub use error::{BiomeKitError, ConflictError, ErrorKind};
pub use file::{GENERATED_MARKER, GeneratedFile, JsonFile};
pub use merge::{Tree, merge_trees};
pub use options::{BiomeOptions, DEFAULT_BIOME_VERSION, EnabledFeatures, ResolvedOptions};
pub use project::{DEPS_FILE, Dependency, Project, ProjectKind, SynthOutput, TASKS_FILE};
pub use result::Result;
pub use task::{TEST_TASK, Task, TaskRegistry, TaskRunner, TaskStep};
pub use validation::validate_no_conflicts;

/// Initialize the tracing subscriber for logging
pub fn init_tracing() {
    use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("biome_kit=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
