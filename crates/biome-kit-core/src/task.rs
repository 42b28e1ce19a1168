//! Tasks and the task runner
//!
//! Tasks are named sequences of steps. A step either runs a shell command or
//! spawns another task. The registry serializes to the project's task
//! manifest; the runner executes a task from a registry, resolving spawns
//! recursively.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::BiomeKitError;
use crate::result::Result;

/// Name of the task every project carries
pub const TEST_TASK: &str = "test";

/// One step of a task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskStep {
    /// Run a shell command
    Exec { exec: String },
    /// Run another task
    Spawn { spawn: String },
}

/// A named task
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub steps: Vec<TaskStep>,
}

/// Tasks registered on a project, keyed by name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRegistry {
    tasks: BTreeMap<String, Task>,
}

impl TaskRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding only the empty `test` task
    pub fn with_test_task() -> Self {
        let task = Task {
            name: TEST_TASK.to_string(),
            description: Some("Run tests".to_string()),
            steps: Vec::new(),
        };
        Self {
            tasks: BTreeMap::from([(TEST_TASK.to_string(), task)]),
        }
    }

    /// Register a task. Names are unique.
    pub fn add_task(
        &mut self,
        name: impl Into<String>,
        description: Option<&str>,
        steps: Vec<TaskStep>,
    ) -> Result<&Task> {
        let name = name.into();
        if self.tasks.contains_key(&name) {
            return Err(BiomeKitError::task_error(name, "task already exists"));
        }

        debug!(task = %name, steps = steps.len(), "Registering task");
        let task = Task {
            name: name.clone(),
            description: description.map(str::to_string),
            steps,
        };
        let task = self.tasks.entry(name).or_insert(task);
        Ok(&*task)
    }

    /// Append a step to `parent` that spawns `child`
    pub fn spawn(&mut self, parent: &str, child: &str) -> Result<()> {
        if !self.tasks.contains_key(child) {
            return Err(BiomeKitError::task_error(child, "cannot spawn unknown task"));
        }
        let task = self
            .tasks
            .get_mut(parent)
            .ok_or_else(|| BiomeKitError::task_error(parent, "unknown task"))?;
        task.steps.push(TaskStep::Spawn {
            spawn: child.to_string(),
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Task> {
        self.tasks.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Load a task manifest written by synthesis
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| BiomeKitError::io_error(path, e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Executes tasks from a registry inside a working directory
#[derive(Debug)]
pub struct TaskRunner<'a> {
    registry: &'a TaskRegistry,
    cwd: PathBuf,
}

impl<'a> TaskRunner<'a> {
    pub fn new(registry: &'a TaskRegistry, cwd: impl Into<PathBuf>) -> Self {
        Self {
            registry,
            cwd: cwd.into(),
        }
    }

    /// Run `name` and everything it spawns. Stops at the first failing step.
    pub fn run(&self, name: &str) -> Result<()> {
        let mut stack = Vec::new();
        self.run_inner(name, &mut stack)
    }

    fn run_inner(&self, name: &str, stack: &mut Vec<String>) -> Result<()> {
        if stack.iter().any(|t| t == name) {
            let chain = stack
                .iter()
                .map(String::as_str)
                .chain(std::iter::once(name))
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(BiomeKitError::task_error(
                name,
                format!("spawn cycle detected: {chain}"),
            ));
        }

        let task = self
            .registry
            .get(name)
            .ok_or_else(|| BiomeKitError::task_error(name, "unknown task"))?;

        info!(task = %name, "Running task");
        stack.push(name.to_string());
        for step in &task.steps {
            match step {
                TaskStep::Exec { exec } => self.exec(name, exec)?,
                TaskStep::Spawn { spawn } => self.run_inner(spawn, stack)?,
            }
        }
        stack.pop();
        Ok(())
    }

    fn exec(&self, task: &str, command: &str) -> Result<()> {
        debug!(task = %task, command = %command, "Executing step");
        let status = Command::new("sh")
            .arg("-c")
            .arg(command)
            .current_dir(&self.cwd)
            .status()
            .map_err(|e| BiomeKitError::io_error(&self.cwd, e))?;

        if status.success() {
            Ok(())
        } else {
            Err(BiomeKitError::task_error(
                task,
                format!("'{command}' exited with {status}"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn exec(command: &str) -> TaskStep {
        TaskStep::Exec {
            exec: command.to_string(),
        }
    }

    #[test]
    fn test_with_test_task_holds_only_test() {
        let registry = TaskRegistry::with_test_task();
        assert_eq!(registry.names().collect::<Vec<_>>(), vec![TEST_TASK]);
        let test = registry.get(TEST_TASK).unwrap();
        assert_eq!(test.description.as_deref(), Some("Run tests"));
        assert!(test.steps.is_empty());
    }

    #[test]
    fn test_add_task_rejects_duplicates() {
        let mut registry = TaskRegistry::new();
        registry.add_task("biome", None, vec![]).unwrap();
        assert!(registry.add_task("biome", None, vec![]).is_err());
    }

    #[test]
    fn test_spawn_appends_step() {
        let mut registry = TaskRegistry::new();
        registry.add_task(TEST_TASK, None, vec![]).unwrap();
        registry
            .add_task("biome", Some("Runs Biome"), vec![exec("biome check")])
            .unwrap();
        registry.spawn(TEST_TASK, "biome").unwrap();

        assert_eq!(
            registry.get(TEST_TASK).unwrap().steps,
            vec![TaskStep::Spawn {
                spawn: "biome".to_string()
            }]
        );
        assert!(registry.spawn(TEST_TASK, "missing").is_err());
        assert!(registry.spawn("missing", "biome").is_err());
    }

    #[test]
    fn test_manifest_shape() {
        let mut registry = TaskRegistry::new();
        registry
            .add_task("biome", Some("Runs Biome"), vec![exec("biome check --write src")])
            .unwrap();

        let json = serde_json::to_value(&registry).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tasks": {
                    "biome": {
                        "name": "biome",
                        "description": "Runs Biome",
                        "steps": [{ "exec": "biome check --write src" }]
                    }
                }
            })
        );

        let back: TaskRegistry = serde_json::from_value(json).unwrap();
        assert_eq!(back, registry);
    }

    #[test]
    fn test_runner_executes_spawned_tasks() {
        let dir = TempDir::new().unwrap();
        let mut registry = TaskRegistry::new();
        registry.add_task(TEST_TASK, None, vec![]).unwrap();
        registry
            .add_task("touch", None, vec![exec("echo ran > marker.txt")])
            .unwrap();
        registry.spawn(TEST_TASK, "touch").unwrap();

        TaskRunner::new(&registry, dir.path()).run(TEST_TASK).unwrap();

        let marker = fs::read_to_string(dir.path().join("marker.txt")).unwrap();
        assert_eq!(marker.trim(), "ran");
    }

    #[test]
    fn test_runner_reports_failing_step() {
        let dir = TempDir::new().unwrap();
        let mut registry = TaskRegistry::new();
        registry.add_task("fail", None, vec![exec("exit 3")]).unwrap();

        let err = TaskRunner::new(&registry, dir.path()).run("fail").unwrap_err();
        assert!(err.to_string().contains("Task error in 'fail'"));
    }

    #[test]
    fn test_runner_detects_spawn_cycles() {
        let dir = TempDir::new().unwrap();
        let registry: TaskRegistry = serde_json::from_value(serde_json::json!({
            "tasks": {
                "a": { "name": "a", "steps": [{ "spawn": "b" }] },
                "b": { "name": "b", "steps": [{ "spawn": "a" }] }
            }
        }))
        .unwrap();

        let err = TaskRunner::new(&registry, dir.path()).run("a").unwrap_err();
        assert!(err.to_string().contains("a -> b -> a"));
    }

    #[test]
    fn test_runner_unknown_task() {
        let registry = TaskRegistry::new();
        assert!(TaskRunner::new(&registry, ".").run("nope").is_err());
    }
}
