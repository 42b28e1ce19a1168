//! Post-compilation text rewrites
//!
//! The compiled declarations are valid TypeScript but carry constructs that
//! strict interface compilers reject. A [`RewriteTable`] is an ordered list
//! of rules applied one after another to the whole text.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::error::{Result, TypegenError};

/// How a rule finds the text to replace
#[derive(Debug, Clone)]
pub enum Matcher {
    /// Regular expression; the replacement may use `$1`-style groups
    Regex(Regex),
    /// Exact substring
    Literal(String),
}

/// One named rewrite
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pub name: String,
    pub matcher: Matcher,
    pub replacement: String,
}

impl RewriteRule {
    /// Rule matching a regular expression. Fails when `pattern` does not compile.
    pub fn regex(
        name: impl Into<String>,
        pattern: &str,
        replacement: impl Into<String>,
    ) -> Result<Self> {
        let regex = Regex::new(pattern).map_err(|source| TypegenError::Regex {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self {
            name: name.into(),
            matcher: Matcher::Regex(regex),
            replacement: replacement.into(),
        })
    }

    /// Rule replacing every occurrence of `needle`
    pub fn literal(
        name: impl Into<String>,
        needle: impl Into<String>,
        replacement: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: Matcher::Literal(needle.into()),
            replacement: replacement.into(),
        }
    }

    pub fn apply(&self, text: &str) -> String {
        match &self.matcher {
            Matcher::Regex(regex) => regex
                .replace_all(text, self.replacement.as_str())
                .into_owned(),
            Matcher::Literal(needle) => text.replace(needle.as_str(), &self.replacement),
        }
    }
}

/// Ordered set of rewrite rules
#[derive(Debug, Clone, Default)]
pub struct RewriteTable {
    rules: Vec<RewriteRule>,
}

static BIOME_RULES: LazyLock<RewriteTable> = LazyLock::new(|| RewriteTable {
    rules: vec![
        // optional fields must not also be nullable
        RewriteRule::regex("optional-nullable", r"(\?:.*) \| null;", "${1};").unwrap(),
        RewriteRule::literal("redundant-undefined", " | undefined", ""),
        RewriteRule::literal("a11y-casing", "A11Y", "A11y"),
        RewriteRule::literal(
            "non-empty-number-tuple",
            "boolean | [number, ...number[]]",
            "boolean | number[]",
        ),
        RewriteRule::regex(
            "comment-schema-field",
            r"(?m)^(\s*)(\$schema\??:)",
            "${1}//${2}",
        )
        .unwrap(),
    ],
});

impl RewriteTable {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    /// Rules that make Biome schema declarations acceptable to strict
    /// interface compilers
    pub fn biome() -> &'static RewriteTable {
        &BIOME_RULES
    }

    /// Append a rule; it runs after every existing rule
    pub fn push(&mut self, rule: RewriteRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Apply every rule, in order
    pub fn apply(&self, text: &str) -> String {
        self.rules.iter().fold(text.to_string(), |acc, rule| {
            let rewritten = rule.apply(&acc);
            if rewritten != acc {
                debug!(rule = %rule.name, "Applied rewrite");
            }
            rewritten
        })
    }
}
