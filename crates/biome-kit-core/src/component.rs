//! Project components and their lifecycle
//!
//! A component is anything registered on a [`Project`]. Synthesis calls
//! [`Component::pre_synthesize`] on every component, in registration order,
//! before any [`Component::synthesize`] runs. Components never look at each
//! other's internals; sibling discovery goes through [`ComponentTag`]s.

use std::any::Any;
use std::fmt;

use crate::project::{Project, SynthOutput};
use crate::result::Result;

/// Identity of a registered component, as seen by its siblings
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ComponentTag {
    /// Owns linting
    Eslint,
    /// Owns formatting
    Prettier,
    /// The project's own definition file
    ProjenrcFile,
    /// Biome itself
    Biome,
}

impl fmt::Display for ComponentTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentTag::Eslint => "eslint",
            ComponentTag::Prettier => "prettier",
            ComponentTag::ProjenrcFile => "projenrc",
            ComponentTag::Biome => "biome",
        };
        f.write_str(name)
    }
}

/// A unit registered on a project that takes part in synthesis
pub trait Component: fmt::Debug {
    /// Tag siblings use to detect this component
    fn tag(&self) -> ComponentTag;

    /// Downcast support for typed lookups such as `Biome::of`
    fn as_any(&self) -> &dyn Any;

    /// Called once for every component before any file is produced.
    ///
    /// Returning an error aborts synthesis.
    fn pre_synthesize(&self, _project: &Project) -> Result<()> {
        Ok(())
    }

    /// Contribute generated files
    fn synthesize(&self, _project: &Project, _output: &mut SynthOutput) -> Result<()> {
        Ok(())
    }
}

/// Eslint registered on the project (linting owner)
#[derive(Debug, Clone, Default)]
pub struct Eslint;

impl Component for Eslint {
    fn tag(&self) -> ComponentTag {
        ComponentTag::Eslint
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Prettier registered on the project (formatting owner)
#[derive(Debug, Clone, Default)]
pub struct Prettier;

impl Component for Prettier {
    fn tag(&self) -> ComponentTag {
        ComponentTag::Prettier
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// The file the project is defined in, e.g. `.projenrc.ts`
#[derive(Debug, Clone)]
pub struct ProjenrcFile {
    file_path: String,
}

impl ProjenrcFile {
    pub fn new(file_path: impl Into<String>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    /// Path relative to the project root
    pub fn file_path(&self) -> &str {
        &self.file_path
    }
}

impl Component for ProjenrcFile {
    fn tag(&self) -> ComponentTag {
        ComponentTag::ProjenrcFile
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
