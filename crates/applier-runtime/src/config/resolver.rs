//! Runtime overrides applied on top of loaded configuration.
//!
//! ```text
//! ConfigLoader.load()  →  ApplierConfig (files + env)
//!                              │
//!                              ▼
//!                     ConfigResolver.apply()   (CLI flags)
//!                              │
//!                              ▼
//!                     ApplierConfig (final)
//! ```

use super::ApplierConfig;

/// Applies overrides to a loaded configuration.
///
/// Only values the resolver actually holds should be applied; unset
/// options keep what the loader produced.
pub trait ConfigResolver {
    /// Applies overrides to the given configuration.
    fn apply(&self, config: &mut ApplierConfig);
}
