//! Update option configuration
//!
//! Selects which change types a regenerated manifest should apply.

use serde::{Deserialize, Serialize};

/// Which classes of upgrade to apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOptions {
    /// Apply major version bumps
    pub update_major: bool,
    /// Apply minor version bumps
    pub update_minor: bool,
    /// Apply patch version bumps
    pub update_patch: bool,
}

impl Default for UpdateOptions {
    /// Minor and patch updates are applied, major updates are opt-in
    fn default() -> Self {
        Self {
            update_major: false,
            update_minor: true,
            update_patch: true,
        }
    }
}

impl UpdateOptions {
    /// Create options with the default selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable every change type
    pub fn all() -> Self {
        Self {
            update_major: true,
            update_minor: true,
            update_patch: true,
        }
    }

    /// Disable every change type
    pub fn none() -> Self {
        Self {
            update_major: false,
            update_minor: false,
            update_patch: false,
        }
    }

    /// Set whether major updates are applied
    pub fn with_major(mut self, enabled: bool) -> Self {
        self.update_major = enabled;
        self
    }

    /// Set whether minor updates are applied
    pub fn with_minor(mut self, enabled: bool) -> Self {
        self.update_minor = enabled;
        self
    }

    /// Set whether patch updates are applied
    pub fn with_patch(mut self, enabled: bool) -> Self {
        self.update_patch = enabled;
        self
    }

    /// Returns true if no change type is enabled
    pub fn is_empty(&self) -> bool {
        !(self.update_major || self.update_minor || self.update_patch)
    }
}
