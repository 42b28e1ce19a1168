//! Result type alias for biome-kit operations

use crate::error::BiomeKitError;

/// Standard Result type for biome-kit operations
pub type Result<T> = std::result::Result<T, BiomeKitError>;
