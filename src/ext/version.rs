//! Host compatibility versioning for extensions.
//!
//! Every extension declares the minimum host version it was built against.
//! The host compares that token against [`HOST_COMPATIBILITY_VERSION`] at
//! load time and refuses incompatible extensions before they receive any
//! hook call. The compatibility token moves rarely — only when the hook
//! surface changes in a way that could break existing extensions — so it
//! usually trails the user-visible release version.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// The newest extension interface revision this host supports.
pub const HOST_COMPATIBILITY_VERSION: HostVersion = HostVersion::new(1, 0, 0);

/// A three-part version token, ordered numerically part by part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl HostVersion {
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for HostVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Parse errors for version tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version must have exactly three dot-separated parts, got '{0}'")]
    WrongShape(String),
    #[error("version part '{0}' is not a number")]
    BadPart(String),
}

impl FromStr for HostVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(VersionParseError::WrongShape(s.to_owned()));
        }

        let mut numbers = [0u32; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            *slot = part
                .parse()
                .map_err(|_| VersionParseError::BadPart((*part).to_owned()))?;
        }

        Ok(Self::new(numbers[0], numbers[1], numbers[2]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_three_part_version() {
        let v: HostVersion = "5.0.4".parse().unwrap();
        assert_eq!(v, HostVersion::new(5, 0, 4));
        assert_eq!(v.to_string(), "5.0.4");
    }

    #[test]
    fn rejects_wrong_shapes() {
        assert!(matches!(
            "5.0".parse::<HostVersion>(),
            Err(VersionParseError::WrongShape(_))
        ));
        assert!(matches!(
            "5.0.0.1".parse::<HostVersion>(),
            Err(VersionParseError::WrongShape(_))
        ));
        assert!(matches!(
            "5.x.0".parse::<HostVersion>(),
            Err(VersionParseError::BadPart(_))
        ));
    }

    #[test]
    fn orders_numerically_not_lexically() {
        let small: HostVersion = "1.2.0".parse().unwrap();
        let big: HostVersion = "1.10.0".parse().unwrap();
        assert!(small < big);
        assert!(HostVersion::new(2, 0, 0) > HostVersion::new(1, 99, 99));
    }
}
