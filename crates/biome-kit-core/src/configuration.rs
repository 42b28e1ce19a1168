//! Biome configuration builder
//!
//! Folds the default layers and the user overrides into one tree. The default
//! layers are always combined with array union; only the final user-override
//! step follows `mergeArraysInConfiguration`.

use tracing::debug;

use crate::layers::{
    Layer, common_baseline, formatter_defaults, linter_defaults, organize_imports_defaults,
};
use crate::merge::{Tree, merge_trees};
use crate::options::BiomeOptions;

/// Build the Biome configuration for `options`.
///
/// Feature flags that are not set count as disabled here; callers that want
/// the documented defaults pass options through
/// [`BiomeOptions::resolve`](crate::BiomeOptions::resolve) first.
/// `projenrc_file` scopes the linter layer's rule-override entry.
pub fn build_configuration(options: &BiomeOptions, projenrc_file: Option<&str>) -> Tree {
    let linter = if options.linter.unwrap_or(false) {
        linter_defaults(projenrc_file)
    } else {
        Tree::new()
    };
    let formatter = if options.formatter.unwrap_or(false) {
        formatter_defaults()
    } else {
        Tree::new()
    };
    let organized = organize_imports_defaults(options.organize_imports.unwrap_or(false));

    // Linter goes on top of the formatter layer so it can re-enable linting
    // that the formatter layer switches off.
    let mut config = Tree::new();
    for (layer, tree) in [
        (Layer::FormatterDefaults, formatter),
        (Layer::LinterDefaults, linter),
        (Layer::OrganizeImportsDefaults, organized),
        (Layer::CommonBaseline, common_baseline()),
    ] {
        debug!(%layer, keys = tree.len(), "Folding configuration layer");
        config = merge_trees(&config, &tree, true);
    }

    match &options.overrides {
        Some(overrides) => {
            let merge_arrays = options.merge_arrays_in_configuration.unwrap_or(true);
            debug!(layer = %Layer::UserOverrides, merge_arrays, "Folding configuration layer");
            merge_trees(&config, overrides, merge_arrays)
        }
        None => config,
    }
}
