//! The Biome component
//!
//! Registering Biome on a project:
//!
//! 1. adds `@biomejs/biome@<version>` as a development dependency
//! 2. builds the merged configuration and registers `biome.jsonc`
//! 3. registers the `biome` task and makes `test` spawn it
//!
//! Before synthesis it checks that no sibling component already owns
//! linting or formatting.

use std::any::Any;

use serde_json::{Value, json};
use tracing::{debug, info};

use crate::component::{Component, ComponentTag};
use crate::configuration::build_configuration;
use crate::error::BiomeKitError;
use crate::file::JsonFile;
use crate::merge::Tree;
use crate::options::{BiomeOptions, EnabledFeatures, ResolvedOptions};
use crate::project::{Project, ProjectKind, SynthOutput};
use crate::result::Result;
use crate::task::{TEST_TASK, TaskStep};
use crate::validation::validate_no_conflicts;

/// Biome configuration file, relative to the project root
pub const CONFIG_FILE: &str = "biome.jsonc";

/// Name of the task that runs Biome
pub const BIOME_TASK: &str = "biome";

/// Package name of biome-kit's own scaffolded project; it bundles Biome and
/// must not depend on itself.
const SELF_PACKAGE_NAME: &str = "projen-biome";

/// Biome registered on a project
#[derive(Debug, Clone)]
pub struct Biome {
    options: ResolvedOptions,
    config_file: JsonFile,
}

impl Biome {
    /// Register Biome on `project`.
    ///
    /// Fails on invalid options (an unparsable version selector) or when the
    /// project already has a `biome` task.
    pub fn register(project: &mut Project, options: BiomeOptions) -> Result<()> {
        options.validate()?;
        let resolved = options.resolve();

        let mut configuration = build_configuration(&resolved.to_options(), project.projenrc_file());
        backfill_enabled_flags(&mut configuration, resolved.features);

        let config_file = JsonFile::new(CONFIG_FILE, Value::Object(configuration))
            .with_comments(true)
            .with_marker(true);

        // nothing is touched until the task slots are known to be usable
        if project.tasks().get(BIOME_TASK).is_some() {
            return Err(BiomeKitError::task_error(BIOME_TASK, "task already exists"));
        }
        if project.tasks().get(TEST_TASK).is_none() {
            return Err(BiomeKitError::task_error(TEST_TASK, "unknown task"));
        }

        let target_dirs = target_dirs(project);
        project.tasks_mut().add_task(
            BIOME_TASK,
            Some("Runs Biome against the codebase"),
            vec![TaskStep::Exec {
                exec: format!("biome check --write {}", target_dirs.join(" ")),
            }],
        )?;
        project.tasks_mut().spawn(TEST_TASK, BIOME_TASK)?;

        if project.name() != SELF_PACKAGE_NAME {
            project.add_dev_deps(&format!("@biomejs/biome@{}", resolved.version));
        }

        info!(
            linter = resolved.features.linter,
            formatter = resolved.features.formatter,
            organize_imports = resolved.features.organize_imports,
            "Registered Biome"
        );
        project.add_component(Biome {
            options: resolved,
            config_file,
        });
        Ok(())
    }

    /// The Biome component registered on `project`, if any
    pub fn of(project: &Project) -> Option<&Biome> {
        project.find_component::<Biome>()
    }

    pub fn version(&self) -> &str {
        &self.options.version
    }

    pub fn features(&self) -> EnabledFeatures {
        self.options.features
    }

    /// The generated configuration tree
    pub fn configuration(&self) -> &Value {
        self.config_file.obj()
    }

    pub fn config_file(&self) -> &JsonFile {
        &self.config_file
    }
}

impl Component for Biome {
    fn tag(&self) -> ComponentTag {
        ComponentTag::Biome
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn pre_synthesize(&self, project: &Project) -> Result<()> {
        debug!("Checking for conflicting linters and formatters");
        validate_no_conflicts(&project.component_tags(), self.options.features)?;
        Ok(())
    }

    fn synthesize(&self, _project: &Project, output: &mut SynthOutput) -> Result<()> {
        output.add(self.config_file.to_generated()?)
    }
}

/// Make `formatter.enabled`, `linter.enabled` and `organizeImports.enabled`
/// explicit when the configuration leaves them unset.
fn backfill_enabled_flags(configuration: &mut Tree, features: EnabledFeatures) {
    for (section, enabled) in [
        ("formatter", features.formatter),
        ("linter", features.linter),
        ("organizeImports", features.organize_imports),
    ] {
        let entry = configuration
            .entry(section)
            .or_insert_with(|| json!({}));
        if !entry.is_object() {
            *entry = json!({});
        }
        if let Some(map) = entry.as_object_mut() {
            let unset = map.get("enabled").is_none_or(Value::is_null);
            if unset {
                map.insert("enabled".to_string(), Value::Bool(enabled));
            }
        }
    }
}

/// Paths the `biome` task checks
fn target_dirs(project: &Project) -> Vec<String> {
    let mut dirs = Vec::new();
    if let Some(projenrc) = project.projenrc_file() {
        dirs.push(projenrc.to_string());
    }
    if let ProjectKind::TypeScript { srcdir, testdir } = project.kind() {
        dirs.push(srcdir.clone());
        dirs.push(testdir.clone());
    }
    dirs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::ProjenrcFile;

    fn typescript_project() -> Project {
        let mut project = Project::new(
            "test-project",
            ".",
            ProjectKind::TypeScript {
                srcdir: "src".to_string(),
                testdir: "test".to_string(),
            },
        );
        project.add_component(ProjenrcFile::new(".projenrc.ts"));
        project
    }

    #[test]
    fn test_register_adds_task_and_dependency() {
        let mut project = typescript_project();
        Biome::register(&mut project, BiomeOptions::default()).unwrap();

        let task = project.tasks().get(BIOME_TASK).unwrap();
        assert_eq!(
            task.steps,
            vec![TaskStep::Exec {
                exec: "biome check --write .projenrc.ts src test".to_string()
            }]
        );
        assert!(
            project
                .tasks()
                .get(TEST_TASK)
                .unwrap()
                .steps
                .contains(&TaskStep::Spawn {
                    spawn: BIOME_TASK.to_string()
                })
        );
        assert_eq!(project.dev_deps()[0].name, "@biomejs/biome");
        assert_eq!(project.dev_deps()[0].version.as_deref(), Some("^1"));
    }

    #[test]
    fn test_failed_registration_leaves_project_untouched() {
        let mut project = typescript_project();
        project
            .tasks_mut()
            .add_task(BIOME_TASK, None, vec![TaskStep::Exec { exec: "true".to_string() }])
            .unwrap();
        let tasks_before = project.tasks().clone();

        let err = Biome::register(&mut project, BiomeOptions::default()).unwrap_err();

        assert!(matches!(err, BiomeKitError::TaskError { .. }));
        assert!(project.dev_deps().is_empty());
        assert_eq!(project.tasks(), &tasks_before);
        assert!(Biome::of(&project).is_none());
    }

    #[test]
    fn test_node_project_without_projenrc_has_no_targets() {
        let mut project = Project::new("app", ".", ProjectKind::Node);
        Biome::register(&mut project, BiomeOptions::default()).unwrap();

        let task = project.tasks().get(BIOME_TASK).unwrap();
        assert_eq!(
            task.steps,
            vec![TaskStep::Exec {
                exec: "biome check --write ".to_string()
            }]
        );
    }

    #[test]
    fn test_self_hosting_project_skips_dependency() {
        let mut project = Project::new(SELF_PACKAGE_NAME, ".", ProjectKind::Node);
        Biome::register(&mut project, BiomeOptions::default()).unwrap();
        assert!(project.dev_deps().is_empty());
    }

    #[test]
    fn test_default_configuration_has_explicit_flags() {
        let mut project = typescript_project();
        Biome::register(&mut project, BiomeOptions::default()).unwrap();

        let config = Biome::of(&project).unwrap().configuration();
        assert_eq!(config["linter"]["enabled"], json!(true));
        assert_eq!(config["formatter"]["enabled"], json!(false));
        assert_eq!(config["organizeImports"]["enabled"], json!(false));
        assert_eq!(config["overrides"][0]["include"], json!([".projenrc.ts"]));
    }

    #[test]
    fn test_override_enabled_flag_is_kept() {
        let mut project = typescript_project();
        let overrides = match json!({ "formatter": { "enabled": true, "lineWidth": 100 } }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        Biome::register(
            &mut project,
            BiomeOptions {
                overrides: Some(overrides),
                ..Default::default()
            },
        )
        .unwrap();

        let config = Biome::of(&project).unwrap().configuration();
        assert_eq!(config["formatter"]["enabled"], json!(true));
        assert_eq!(config["formatter"]["lineWidth"], json!(100));
    }

    #[test]
    fn test_of_returns_none_when_absent() {
        let project = typescript_project();
        assert!(Biome::of(&project).is_none());
    }

    #[test]
    fn test_register_rejects_bad_version() {
        let mut project = typescript_project();
        let result = Biome::register(
            &mut project,
            BiomeOptions {
                version: Some("latest!".to_string()),
                ..Default::default()
            },
        );
        assert!(result.is_err());
        assert!(Biome::of(&project).is_none());
        assert!(project.tasks().get(BIOME_TASK).is_none());
    }
}
