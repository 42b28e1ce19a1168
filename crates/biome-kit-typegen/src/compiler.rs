//! JSON Schema to TypeScript declaration compiler
//!
//! Covers the subset of JSON Schema used by configuration schemas and emits
//! declarations in the shape json-schema-to-typescript produces:
//!
//! - named object schemas become `export interface Name { ... }`
//! - other named schemas become `export type Name = ...;`
//! - optional properties are marked `?:`, open objects get `[k: string]: unknown;`
//! - `$ref` resolves to the referenced declaration's name
//!
//! The root schema is emitted first, followed by every entry of
//! `definitions` and `$defs` in document order, followed by inline schemas
//! that received a name. The same input always produces the same text.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Result, TypegenError};
use crate::naming::{is_identifier, to_safe_string};

/// Naming callback: `(schema, key name)` to a declaration name.
///
/// The key name is only present for `definitions`/`$defs` entries.
pub type NameFn = dyn Fn(&Value, Option<&str>) -> Option<String> + Send + Sync;

/// Default banner placed at the top of the output
pub const DEFAULT_BANNER: &str = "/* eslint-disable */
/**
 * This file was automatically generated by biome-kit from the Biome
 * configuration schema. DO NOT MODIFY IT BY HAND. Run \"biome-kit types\"
 * to regenerate it.
 */";

/// Beyond this many required items, arrays are emitted as plain `T[]`
const MAX_TUPLE_ITEMS: u64 = 20;

/// Compiler options
pub struct CompileOptions {
    /// Comment emitted before the first declaration
    pub banner_comment: String,
    /// Name of the root declaration when nothing else names it
    pub default_name: String,
    /// Custom naming; falls back to `title`, `$id`, then the key name
    pub custom_name: Option<Box<NameFn>>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            banner_comment: DEFAULT_BANNER.to_string(),
            default_name: "Configuration".to_string(),
            custom_name: None,
        }
    }
}

impl fmt::Debug for CompileOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompileOptions")
            .field("banner_comment", &self.banner_comment)
            .field("default_name", &self.default_name)
            .field("custom_name", &self.custom_name.is_some())
            .finish()
    }
}

/// Compiles a schema document into TypeScript source
#[derive(Debug, Default)]
pub struct SchemaCompiler {
    options: CompileOptions,
}

impl SchemaCompiler {
    pub fn new(options: CompileOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    /// Compile `schema` into declaration source text
    pub fn compile(&self, schema: &Value) -> Result<String> {
        if !schema.is_object() {
            return Err(TypegenError::compile("root schema must be an object"));
        }

        let mut compilation = Compilation::new(&self.options, schema);
        let declarations = compilation.run()?;
        debug!(declarations = declarations.len(), "Compiled schema");

        let mut out = String::new();
        if !self.options.banner_comment.is_empty() {
            out.push_str(&self.options.banner_comment);
            out.push_str("\n\n");
        }
        out.push_str(&declarations.join("\n"));
        Ok(out)
    }
}

/// State of one compilation run
struct Compilation<'a> {
    options: &'a CompileOptions,
    root: &'a Value,
    used_names: HashSet<String>,
    ref_names: HashMap<String, String>,
    definitions: Vec<(String, &'a Value)>,
    pending: VecDeque<(String, &'a Value)>,
}

impl<'a> Compilation<'a> {
    fn new(options: &'a CompileOptions, root: &'a Value) -> Self {
        Self {
            options,
            root,
            used_names: HashSet::new(),
            ref_names: HashMap::new(),
            definitions: Vec::new(),
            pending: VecDeque::new(),
        }
    }

    fn run(&mut self) -> Result<Vec<String>> {
        let root_name = self
            .standalone_name(self.root, None)
            .unwrap_or_else(|| self.options.default_name.clone());
        let root_name = self.claim(&root_name);
        self.ref_names.insert("#".to_string(), root_name.clone());

        // Name every definition before emitting anything so references may
        // point forward.
        for section in ["definitions", "$defs"] {
            let Some(entries) = self.root.get(section).and_then(Value::as_object) else {
                continue;
            };
            for (key, schema) in entries {
                let name = self
                    .standalone_name(schema, Some(key))
                    .unwrap_or_else(|| key.clone());
                let name = self.claim(&name);
                self.ref_names
                    .insert(format!("#/{section}/{}", escape_pointer(key)), name.clone());
                self.definitions.push((name, schema));
            }
        }

        let mut declarations = vec![self.declaration(&root_name, self.root)?];
        for (name, schema) in std::mem::take(&mut self.definitions) {
            declarations.push(self.declaration(&name, schema)?);
        }
        while let Some((name, schema)) = self.pending.pop_front() {
            declarations.push(self.declaration(&name, schema)?);
        }
        Ok(declarations)
    }

    fn standalone_name(&self, schema: &Value, key_name: Option<&str>) -> Option<String> {
        if let Some(custom) = &self.options.custom_name
            && let Some(name) = custom(schema, key_name)
        {
            return Some(name);
        }
        schema
            .get("title")
            .and_then(Value::as_str)
            .or_else(|| schema.get("$id").and_then(Value::as_str))
            .or(key_name)
            .map(str::to_string)
    }

    /// Reserve a safe, unique identifier derived from `raw`
    fn claim(&mut self, raw: &str) -> String {
        let base = to_safe_string(raw);
        let mut name = base.clone();
        let mut suffix = 1;
        while self.used_names.contains(&name) {
            name = format!("{base}{suffix}");
            suffix += 1;
        }
        self.used_names.insert(name.clone());
        name
    }

    fn declaration(&mut self, name: &str, schema: &'a Value) -> Result<String> {
        let mut out = doc_comment(schema, 0);
        if is_object_schema(schema) {
            out.push_str(&format!(
                "export interface {name} {}\n",
                self.object_body(schema, 0)?
            ));
        } else {
            let body = self.body_of(schema, 0)?;
            out.push_str(&format!("export type {name} = {};\n", body.text));
        }
        Ok(out)
    }

    /// Type expression for a schema in type position
    fn type_of(&mut self, schema: &'a Value, depth: usize) -> Result<TypeExpr> {
        if schema.is_object()
            && let Some(name) = self.standalone_name(schema, None)
        {
            let name = self.claim(&name);
            self.pending.push_back((name.clone(), schema));
            return Ok(TypeExpr::atom(name));
        }
        self.body_of(schema, depth)
    }

    /// Type expression for a schema, ignoring its own name
    fn body_of(&mut self, schema: &'a Value, depth: usize) -> Result<TypeExpr> {
        let map = match schema {
            Value::Bool(true) => return Ok(TypeExpr::atom("unknown")),
            Value::Bool(false) => return Ok(TypeExpr::atom("never")),
            Value::Object(map) => map,
            other => {
                return Err(TypegenError::compile(format!(
                    "expected a schema, found {other}"
                )));
            }
        };

        if let Some(reference) = map.get("$ref").and_then(Value::as_str) {
            return self.resolve_ref(reference).map(TypeExpr::atom);
        }
        if let Some(value) = map.get("const") {
            return Ok(TypeExpr::atom(literal(value)));
        }
        if let Some(values) = map.get("enum").and_then(Value::as_array) {
            let members = values.iter().map(|v| TypeExpr::atom(literal(v))).collect();
            return Ok(TypeExpr::union(members));
        }
        for keyword in ["anyOf", "oneOf"] {
            if let Some(members) = map.get(keyword).and_then(Value::as_array) {
                return Ok(TypeExpr::union(self.types_of(members, depth)?));
            }
        }
        if let Some(members) = map.get("allOf").and_then(Value::as_array) {
            return Ok(TypeExpr::intersection(self.types_of(members, depth)?));
        }

        match map.get("type") {
            Some(Value::String(ty)) => self.simple_type(ty, schema, depth),
            Some(Value::Array(types)) => {
                let mut out = Vec::with_capacity(types.len());
                for ty in types {
                    let ty = ty.as_str().ok_or_else(|| {
                        TypegenError::compile(format!("invalid type entry {ty}"))
                    })?;
                    out.push(self.simple_type(ty, schema, depth)?);
                }
                Ok(TypeExpr::union(out))
            }
            Some(other) => Err(TypegenError::compile(format!("invalid type {other}"))),
            None if map.contains_key("properties") || map.contains_key("additionalProperties") => {
                self.object_body(schema, depth).map(TypeExpr::atom)
            }
            None if map.contains_key("items") => self.array_type(map, depth),
            None => Ok(TypeExpr::atom("unknown")),
        }
    }

    fn types_of(&mut self, members: &'a [Value], depth: usize) -> Result<Vec<TypeExpr>> {
        members.iter().map(|m| self.type_of(m, depth)).collect()
    }

    fn simple_type(&mut self, ty: &str, schema: &'a Value, depth: usize) -> Result<TypeExpr> {
        let out = match ty {
            "string" => "string".to_string(),
            "number" | "integer" => "number".to_string(),
            "boolean" => "boolean".to_string(),
            "null" => "null".to_string(),
            "object" => self.object_body(schema, depth)?,
            "array" => match schema.as_object() {
                Some(map) => return self.array_type(map, depth),
                None => "unknown[]".to_string(),
            },
            other => return Err(TypegenError::compile(format!("unknown type '{other}'"))),
        };
        Ok(TypeExpr::atom(out))
    }

    fn array_type(&mut self, map: &'a Map<String, Value>, depth: usize) -> Result<TypeExpr> {
        let items = match map.get("items") {
            None => return Ok(TypeExpr::atom("unknown[]")),
            Some(Value::Array(tuple)) => {
                let types: Vec<String> = self
                    .types_of(tuple, depth)?
                    .into_iter()
                    .map(|t| t.text)
                    .collect();
                return Ok(TypeExpr::atom(format!("[{}]", types.join(", "))));
            }
            Some(items) => items,
        };

        let element = self.type_of(items, depth)?.grouped();
        let min_items = map.get("minItems").and_then(Value::as_u64).unwrap_or(0);
        if (1..=MAX_TUPLE_ITEMS).contains(&min_items) && !map.contains_key("maxItems") {
            let mut parts = vec![element.clone(); min_items as usize];
            parts.push(format!("...{element}[]"));
            return Ok(TypeExpr::atom(format!("[{}]", parts.join(", "))));
        }
        Ok(TypeExpr::atom(format!("{element}[]")))
    }

    fn object_body(&mut self, schema: &'a Value, depth: usize) -> Result<String> {
        let inner = indent(depth + 1);
        let mut members = Vec::new();

        let required: HashSet<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|r| r.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
            for (name, property) in properties {
                let ty = self.type_of(property, depth + 1)?.text;
                let key = if is_identifier(name) {
                    name.clone()
                } else {
                    literal(&Value::String(name.clone()))
                };
                let marker = if required.contains(name.as_str()) { ":" } else { "?:" };
                members.push(format!(
                    "{}{inner}{key}{marker} {ty};",
                    doc_comment(property, depth + 1)
                ));
            }
        }

        match schema.get("additionalProperties") {
            Some(Value::Bool(false)) => {}
            None | Some(Value::Bool(true)) => members.push(format!("{inner}[k: string]: unknown;")),
            Some(additional) => {
                let ty = self.type_of(additional, depth + 1)?.text;
                members.push(format!("{inner}[k: string]: {ty};"));
            }
        }

        if members.is_empty() {
            return Ok("{}".to_string());
        }
        Ok(format!("{{\n{}\n{}}}", members.join("\n"), indent(depth)))
    }

    fn resolve_ref(&self, reference: &str) -> Result<String> {
        if !reference.starts_with('#') {
            return Err(TypegenError::compile(format!(
                "only local $ref values are supported, found '{reference}'"
            )));
        }
        self.ref_names
            .get(reference)
            .cloned()
            .ok_or_else(|| TypegenError::compile(format!("unresolved $ref '{reference}'")))
    }
}

fn is_object_schema(schema: &Value) -> bool {
    let Some(map) = schema.as_object() else {
        return false;
    };
    if ["$ref", "anyOf", "oneOf", "allOf", "enum", "const"]
        .iter()
        .any(|k| map.contains_key(*k))
    {
        return false;
    }
    match map.get("type") {
        Some(Value::String(ty)) => ty == "object",
        None => map.contains_key("properties"),
        Some(_) => false,
    }
}

/// JSDoc block for a schema's `description`, indented to `depth`
fn doc_comment(schema: &Value, depth: usize) -> String {
    let Some(description) = schema.get("description").and_then(Value::as_str) else {
        return String::new();
    };
    let pad = indent(depth);
    let mut out = format!("{pad}/**\n");
    for line in description.replace("*/", "*\\/").lines() {
        if line.is_empty() {
            out.push_str(&format!("{pad} *\n"));
        } else {
            out.push_str(&format!("{pad} * {line}\n"));
        }
    }
    out.push_str(&format!("{pad} */\n"));
    out
}

fn literal(value: &Value) -> String {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) | Value::Null => value.to_string(),
        _ => "unknown".to_string(),
    }
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

/// A rendered type expression
#[derive(Debug, Clone, PartialEq, Eq)]
struct TypeExpr {
    text: String,
    /// Joined by a top-level `|` or `&`
    compound: bool,
}

impl TypeExpr {
    fn atom(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            compound: false,
        }
    }

    fn union(members: Vec<TypeExpr>) -> Self {
        Self::join(members, " | ", |m| m.text)
    }

    /// Members are grouped, so a nested union keeps its meaning
    fn intersection(members: Vec<TypeExpr>) -> Self {
        Self::join(members, " & ", |m| m.grouped())
    }

    fn join(mut members: Vec<TypeExpr>, separator: &str, render: fn(TypeExpr) -> String) -> Self {
        match members.len() {
            0 => Self::atom("never"),
            1 => members.remove(0),
            _ => Self {
                text: members.into_iter().map(render).collect::<Vec<_>>().join(separator),
                compound: true,
            },
        }
    }

    /// Text usable as an operand of `[]`, `|` or `&`
    fn grouped(self) -> String {
        if self.compound {
            format!("({})", self.text)
        } else {
            self.text
        }
    }
}

fn escape_pointer(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}
