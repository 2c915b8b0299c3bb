//! Reasons a player command was ignored.
//!
//! Rejections are not failures: the engine logs them at debug level and
//! leaves the state untouched. Transition functions return them so tests
//! can tell a no-op apart from a success.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Rejection {
    #[error("no session running")]
    NotActive,

    #[error("armory menu is open")]
    MenuOpen,

    #[error("weapon is reloading")]
    Reloading,

    #[error("magazine is empty")]
    OutOfAmmo,

    #[error("fire rate cooldown ({remaining_ms:.0} ms left)")]
    Cooldown { remaining_ms: f64 },

    #[error("reload already in progress")]
    AlreadyReloading,

    #[error("weapon '{0}' already owned")]
    AlreadyOwned(String),

    #[error("insufficient currency: need {needed}, have {available}")]
    InsufficientFunds { needed: u64, available: u64 },

    #[error("unknown weapon id '{0}'")]
    UnknownWeapon(String),

    #[error("invalid sensitivity {0}")]
    InvalidSensitivity(f32),
}
