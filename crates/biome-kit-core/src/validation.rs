//! Conflict validation
//!
//! Biome must not share linting with Eslint, nor formatting (including import
//! organizing) with Prettier. The check is a one-shot presence test over the
//! registered component tags, run from the pre-synthesis hook once every
//! component is known, so registration order does not matter.

use crate::component::ComponentTag;
use crate::error::ConflictError;
use crate::options::EnabledFeatures;

/// Fail when a registered component owns a responsibility Biome is enabled for.
///
/// The linter conflict is reported first when both apply.
pub fn validate_no_conflicts(
    tags: &[ComponentTag],
    features: EnabledFeatures,
) -> Result<(), ConflictError> {
    if features.linter && tags.contains(&ComponentTag::Eslint) {
        return Err(ConflictError::Linter);
    }

    if (features.formatter || features.organize_imports) && tags.contains(&ComponentTag::Prettier)
    {
        return Err(ConflictError::Formatter);
    }

    Ok(())
}
