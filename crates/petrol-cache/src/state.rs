//! Cache lifecycle states.

use std::fmt;

use serde::Serialize;

/// Lifecycle of one cache version.
///
/// ```text
/// Uninstalled -> Installing -> Active
///                    |
///                    v
///                Redundant -> Installing (retry)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheState {
    /// Nothing has been fetched yet.
    #[default]
    Uninstalled,
    /// Assets are being fetched.
    Installing,
    /// Every asset is cached and requests are served cache-first.
    Active,
    /// The install failed. This version never activates unless reinstalled.
    Redundant,
}

impl CacheState {
    /// Whether `install()` may start from this state.
    pub fn can_install(self) -> bool {
        matches!(self, Self::Uninstalled | Self::Redundant)
    }

    pub fn is_active(self) -> bool {
        self == Self::Active
    }
}

impl fmt::Display for CacheState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uninstalled => "uninstalled",
            Self::Installing => "installing",
            Self::Active => "active",
            Self::Redundant => "redundant",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_can_install() {
        assert!(CacheState::Uninstalled.can_install());
        assert!(CacheState::Redundant.can_install());
        assert!(!CacheState::Installing.can_install());
        assert!(!CacheState::Active.can_install());
    }

    #[test]
    fn test_serialize_lowercase() {
        let json = serde_json::to_string(&CacheState::Redundant).unwrap();
        assert_eq!(json, "\"redundant\"");
    }
}
