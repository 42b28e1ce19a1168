//! Scaffolded project model
//!
//! A [`Project`] owns its registered components, tasks and development
//! dependencies. [`Project::synth`] drives the component lifecycle and writes
//! every generated file under the project root. All hooks run before the
//! first write, so a failing hook leaves the file system untouched.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use crate::component::{Component, ComponentTag, ProjenrcFile};
use crate::error::BiomeKitError;
use crate::file::{GeneratedFile, JsonFile};
use crate::result::Result;
use crate::task::{TEST_TASK, TaskRegistry};

/// Task manifest path, relative to the project root
pub const TASKS_FILE: &str = ".scaffold/tasks.json";

/// Dependency manifest path, relative to the project root
pub const DEPS_FILE: &str = ".scaffold/deps.json";

/// Kind of project being scaffolded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectKind {
    /// Plain Node.js project
    Node,
    /// TypeScript project with declared source and test directories
    TypeScript { srcdir: String, testdir: String },
}

/// A development dependency (`name@version`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dependency {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "type")]
    pub dep_type: String,
}

impl Dependency {
    /// Parse `name@version`. Scoped names (`@scope/name`) keep their leading `@`.
    pub fn parse_dev(spec: &str) -> Self {
        let split = spec
            .char_indices()
            .skip(1)
            .find(|(_, c)| *c == '@')
            .map(|(i, _)| i);

        let (name, version) = match split {
            Some(i) => (&spec[..i], Some(spec[i + 1..].to_string())),
            None => (spec, None),
        };

        Self {
            name: name.to_string(),
            version,
            dep_type: "build".to_string(),
        }
    }
}

/// Files collected during synthesis
#[derive(Debug, Default)]
pub struct SynthOutput {
    files: Vec<GeneratedFile>,
}

impl SynthOutput {
    /// Add a file. Two components may not produce the same path.
    pub fn add(&mut self, file: GeneratedFile) -> Result<()> {
        if self.files.iter().any(|f| f.path == file.path) {
            return Err(BiomeKitError::config_error(format!(
                "There is already a file under {}",
                file.path.display()
            )));
        }
        self.files.push(file);
        Ok(())
    }

    pub fn files(&self) -> &[GeneratedFile] {
        &self.files
    }
}

/// A scaffolded project
#[derive(Debug)]
pub struct Project {
    name: String,
    root: PathBuf,
    kind: ProjectKind,
    components: Vec<Box<dyn Component>>,
    tasks: TaskRegistry,
    dev_deps: Vec<Dependency>,
}

impl Project {
    /// Create a project rooted at `root`. Every project carries a `test` task.
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>, kind: ProjectKind) -> Self {
        Self {
            name: name.into(),
            root: root.into(),
            kind,
            components: Vec::new(),
            tasks: TaskRegistry::with_test_task(),
            dev_deps: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind(&self) -> &ProjectKind {
        &self.kind
    }

    pub fn add_component<C: Component + 'static>(&mut self, component: C) {
        debug!(component = %component.tag(), "Registering component");
        self.components.push(Box::new(component));
    }

    pub fn components(&self) -> impl Iterator<Item = &dyn Component> {
        self.components.iter().map(|c| &**c)
    }

    /// Tags of every registered component, in registration order
    pub fn component_tags(&self) -> Vec<ComponentTag> {
        self.components.iter().map(|c| c.tag()).collect()
    }

    /// First registered component of type `C`
    pub fn find_component<C: Component + 'static>(&self) -> Option<&C> {
        self.components
            .iter()
            .find_map(|c| c.as_any().downcast_ref::<C>())
    }

    /// Path of the project definition file, when one is registered
    pub fn projenrc_file(&self) -> Option<&str> {
        self.find_component::<ProjenrcFile>()
            .map(ProjenrcFile::file_path)
    }

    pub fn tasks(&self) -> &TaskRegistry {
        &self.tasks
    }

    pub fn tasks_mut(&mut self) -> &mut TaskRegistry {
        &mut self.tasks
    }

    /// Add a development dependency given as `name@version`
    pub fn add_dev_deps(&mut self, spec: &str) {
        let dep = Dependency::parse_dev(spec);
        if !self.dev_deps.contains(&dep) {
            self.dev_deps.push(dep);
        }
    }

    pub fn dev_deps(&self) -> &[Dependency] {
        &self.dev_deps
    }

    /// Run the component lifecycle and collect every generated file.
    ///
    /// Nothing is written; see [`Project::synth`].
    pub fn render(&self) -> Result<SynthOutput> {
        for component in &self.components {
            component.pre_synthesize(self)?;
        }

        let mut output = SynthOutput::default();
        for component in &self.components {
            component.synthesize(self, &mut output)?;
        }

        output.add(JsonFile::new(TASKS_FILE, serde_json::to_value(&self.tasks)?).to_generated()?)?;
        output.add(
            JsonFile::new(DEPS_FILE, json!({ "dependencies": self.dev_deps })).to_generated()?,
        )?;

        Ok(output)
    }

    /// Synthesize the project and write all files under the root.
    ///
    /// Returns the written paths.
    pub fn synth(&self) -> Result<Vec<PathBuf>> {
        let output = self.render()?;

        let mut written = Vec::with_capacity(output.files().len());
        for file in output.files() {
            let path = self.root.join(&file.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| BiomeKitError::io_error(parent, e))?;
            }
            fs::write(&path, &file.contents).map_err(|e| BiomeKitError::io_error(&path, e))?;
            debug!("Wrote {}", path.display());
            written.push(path);
        }

        info!(project = %self.name, files = written.len(), "Synthesis completed");
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::{Eslint, Prettier};
    use tempfile::TempDir;

    #[test]
    fn test_parse_dev_dependency() {
        let dep = Dependency::parse_dev("@biomejs/biome@^1");
        assert_eq!(dep.name, "@biomejs/biome");
        assert_eq!(dep.version.as_deref(), Some("^1"));

        let dep = Dependency::parse_dev("typescript");
        assert_eq!(dep.name, "typescript");
        assert_eq!(dep.version, None);
    }

    #[test]
    fn test_new_project_has_test_task() {
        let project = Project::new("app", ".", ProjectKind::Node);
        assert!(project.tasks().get(TEST_TASK).is_some());
    }

    #[test]
    fn test_find_component_and_tags() {
        let mut project = Project::new("app", ".", ProjectKind::Node);
        project.add_component(ProjenrcFile::new(".projenrc.ts"));
        project.add_component(Eslint);
        project.add_component(Prettier);

        assert_eq!(
            project.component_tags(),
            vec![
                ComponentTag::ProjenrcFile,
                ComponentTag::Eslint,
                ComponentTag::Prettier
            ]
        );
        assert_eq!(project.projenrc_file(), Some(".projenrc.ts"));
        assert!(project.find_component::<Eslint>().is_some());
    }

    #[test]
    fn test_synth_writes_manifests() {
        let dir = TempDir::new().unwrap();
        let mut project = Project::new("app", dir.path(), ProjectKind::Node);
        project.add_dev_deps("@biomejs/biome@^1");
        project.add_dev_deps("@biomejs/biome@^1");

        let written = project.synth().unwrap();
        assert_eq!(written.len(), 2);

        let deps: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(dir.path().join(DEPS_FILE)).unwrap())
                .unwrap();
        assert_eq!(
            deps,
            json!({ "dependencies": [
                { "name": "@biomejs/biome", "version": "^1", "type": "build" }
            ] })
        );

        let tasks = TaskRegistry::load(&dir.path().join(TASKS_FILE)).unwrap();
        assert!(tasks.get(TEST_TASK).is_some());
    }

    #[test]
    fn test_duplicate_output_paths_rejected() {
        let mut output = SynthOutput::default();
        let file = GeneratedFile {
            path: PathBuf::from("a.json"),
            contents: "{}".to_string(),
        };
        output.add(file.clone()).unwrap();
        assert!(output.add(file).is_err());
    }
}
