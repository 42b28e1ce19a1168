//! Generated JSON files
//!
//! [`JsonFile`] serializes a value to pretty-printed JSON (two-space indent,
//! trailing newline). When comments are allowed and a marker is requested,
//! the first line is a comment flagging the file as generated. `null` object
//! members are treated as "no value" and left out of the output.

use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::result::Result;

/// Comment placed at the top of generated files
pub const GENERATED_MARKER: &str =
    "~~ Generated by biome-kit. To modify, edit the project options and run \"biome-kit synth\".";

/// A file produced by synthesis, relative to the project root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

/// JSON (or JSON-with-comments) file backed by an in-memory value
#[derive(Debug, Clone)]
pub struct JsonFile {
    path: PathBuf,
    obj: Value,
    marker: bool,
    allow_comments: bool,
}

impl JsonFile {
    pub fn new(path: impl Into<PathBuf>, obj: Value) -> Self {
        Self {
            path: path.into(),
            obj,
            marker: false,
            allow_comments: false,
        }
    }

    /// Emit the generated-file marker comment (requires comments)
    pub fn with_marker(mut self, marker: bool) -> Self {
        self.marker = marker;
        self
    }

    pub fn with_comments(mut self, allow_comments: bool) -> Self {
        self.allow_comments = allow_comments;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn obj(&self) -> &Value {
        &self.obj
    }

    /// Render the file contents
    pub fn render(&self) -> Result<String> {
        let json = serde_json::to_string_pretty(&strip_nulls(&self.obj))?;

        let mut out = String::with_capacity(json.len() + GENERATED_MARKER.len() + 8);
        if self.marker && self.allow_comments {
            out.push_str("// ");
            out.push_str(GENERATED_MARKER);
            out.push('\n');
        }
        out.push_str(&json);
        out.push('\n');
        Ok(out)
    }

    /// Render into a [`GeneratedFile`]
    pub fn to_generated(&self) -> Result<GeneratedFile> {
        Ok(GeneratedFile {
            path: self.path.clone(),
            contents: self.render()?,
        })
    }
}

/// Copy `value` without `null` object members, at any depth.
///
/// Array elements are kept as they are.
pub fn strip_nulls(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .filter(|(_, v)| !v.is_null())
                .map(|(k, v)| (k.clone(), strip_nulls(v)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(strip_nulls).collect()),
        other => other.clone(),
    }
}
