//! Sector identity.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::CoreError;

/// A fixed physical sub-area being photographed over time (e.g. "Desk").
///
/// The name is used verbatim as a file stem, so it is validated to stay
/// inside its period directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Sector(String);

impl Sector {
    /// Validate and wrap a sector name. Surrounding whitespace is trimmed.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidSector`] for empty names, path separators,
    /// control characters, or the `.`/`..` segments.
    pub fn new(name: impl AsRef<str>) -> Result<Self, CoreError> {
        let raw = name.as_ref();
        let trimmed = raw.trim();
        let reject = |reason| {
            Err(CoreError::InvalidSector {
                name: raw.to_string(),
                reason,
            })
        };

        if trimmed.is_empty() {
            return reject("name is empty");
        }
        if trimmed == "." || trimmed == ".." {
            return reject("name is a relative path segment");
        }
        if trimmed.contains(['/', '\\']) {
            return reject("name contains a path separator");
        }
        if trimmed.chars().any(char::is_control) {
            return reject("name contains a control character");
        }

        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Sector {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Sector {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Serialize for Sector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Sector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn keeps_inner_spaces_and_trims_edges() {
        let sector = Sector::new("  North Wall ").unwrap();
        assert_eq!(sector.as_str(), "North Wall");
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("..")]
    #[case("desk/../../etc")]
    #[case("a\\b")]
    #[case("tab\there")]
    fn rejects_unsafe_names(#[case] raw: &str) {
        let err = Sector::new(raw).unwrap_err();
        assert!(matches!(err, CoreError::InvalidSector { .. }));
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_json::from_str::<Sector>("\"Bed\"").is_ok());
        assert!(serde_json::from_str::<Sector>("\"a/b\"").is_err());
    }
}
