//! Default configuration layers
//!
//! Each layer is one named contribution to the final Biome configuration.
//! The linter and formatter layers mirror what `biome migrate eslint` and
//! `biome migrate prettier` produce for a stock scaffolded project, minus the
//! settings both migrations share (those live in the common baseline).

use std::fmt;

use serde_json::{Value, json};

use crate::merge::Tree;

/// Named source of configuration values, in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    LinterDefaults,
    FormatterDefaults,
    OrganizeImportsDefaults,
    CommonBaseline,
    UserOverrides,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Layer::LinterDefaults => "linter defaults",
            Layer::FormatterDefaults => "formatter defaults",
            Layer::OrganizeImportsDefaults => "organize-imports defaults",
            Layer::CommonBaseline => "common baseline",
            Layer::UserOverrides => "user overrides",
        };
        f.write_str(name)
    }
}

/// Linter settings that replace a scaffolded Eslint setup.
///
/// Formatting-related Eslint rules are left out; they belong to the
/// formatter layer. `projenrc_file`, when given, scopes the rule-override
/// entry to the project's own definition file.
pub fn linter_defaults(projenrc_file: Option<&str>) -> Tree {
    let include: Vec<&str> = projenrc_file.into_iter().collect();

    into_tree(json!({
        "linter": {
            "enabled": true,
            "rules": {
                "recommended": false,
                "complexity": {
                    "useLiteralKeys": "error"
                },
                "style": {
                    "useBlockStatements": "error"
                }
            },
            "ignore": [
                "**/*.js",
                "**/*.d.ts",
                "**/node_modules/",
                "**/*.generated.ts",
                "**/coverage"
            ]
        },
        "overrides": [
            {
                "include": include,
                "linter": {
                    "rules": {}
                }
            }
        ]
    }))
}

/// Formatter settings that replace a scaffolded Prettier setup.
///
/// The linter is switched off here so formatter-only projects do not lint;
/// the linter layer is folded on top and wins when both are requested.
pub fn formatter_defaults() -> Tree {
    into_tree(json!({
        "formatter": {
            "enabled": true,
            "useEditorconfig": true,
            "formatWithErrors": true,
            "indentStyle": "space",
            "indentWidth": 2,
            "lineEnding": "lf",
            "lineWidth": 80,
            "attributePosition": "auto",
            "bracketSpacing": true
        },
        "organizeImports": {
            "enabled": true
        },
        "linter": {
            "enabled": false
        },
        "javascript": {
            "formatter": {
                "jsxQuoteStyle": "double",
                "quoteProperties": "asNeeded",
                "trailingCommas": "all",
                "semicolons": "asNeeded",
                "arrowParentheses": "always",
                "bracketSameLine": false,
                "quoteStyle": "single",
                "attributePosition": "auto",
                "bracketSpacing": true
            }
        }
    }))
}

/// Import organizer switch; always present so the flag is explicit.
pub fn organize_imports_defaults(enabled: bool) -> Tree {
    into_tree(json!({
        "organizeImports": {
            "enabled": enabled
        }
    }))
}

/// Settings shared by every generated configuration
pub fn common_baseline() -> Tree {
    into_tree(json!({
        "vcs": {
            "enabled": false,
            "clientKind": "git",
            "useIgnoreFile": false
        },
        "files": {
            "ignoreUnknown": false,
            "ignore": []
        }
    }))
}

fn into_tree(value: Value) -> Tree {
    match value {
        Value::Object(map) => map,
        _ => Tree::new(),
    }
}
