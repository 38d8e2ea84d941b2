//! Value Objects - Immutable domain primitives
//!
//! Value objects are identified by their value rather than identity.
//! They are immutable and can be freely shared.

use crate::domain::errors::LookupError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// IP protocol version hint passed to upstream providers.
///
/// Callers speak in the exact strings `"4"` and `"6"`; an absent or empty
/// value means IPv4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum IpVersion {
    #[default]
    V4,
    V6,
}

impl IpVersion {
    /// Parse an optional version string.
    ///
    /// # Examples
    /// ```
    /// use ipcheck::IpVersion;
    ///
    /// assert_eq!(IpVersion::parse(None).unwrap(), IpVersion::V4);
    /// assert_eq!(IpVersion::parse(Some("6")).unwrap(), IpVersion::V6);
    /// assert!(IpVersion::parse(Some("5")).is_err());
    /// ```
    pub fn parse(value: Option<&str>) -> Result<Self, LookupError> {
        match value {
            None | Some("") | Some("4") => Ok(Self::V4),
            Some("6") => Ok(Self::V6),
            Some(other) => Err(LookupError::InvalidInput(format!(
                "IPV type must be '4' or '6', got '{}'",
                other
            ))),
        }
    }

    /// Wire representation ("4" or "6").
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::V4 => "4",
            Self::V6 => "6",
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
