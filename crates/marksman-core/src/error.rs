//! Error types for catalog lookups and startup configuration.

use thiserror::Error;

/// Lookup failures against the static catalogs.
///
/// These indicate an integration or configuration mistake, not a
/// gameplay condition: invalid player input is handled as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// No weapon archetype with this id.
    #[error("Unknown weapon id '{0}'")]
    UnknownWeapon(String),

    /// No environment with this id.
    #[error("Unknown environment id '{0}'")]
    UnknownEnvironment(String),
}
