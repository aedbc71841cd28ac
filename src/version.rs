use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ReleaseToolsError, Result};

/// Project version: `major.minor.patch` with an optional qualifier such as
/// `SNAPSHOT` (`1.4.0-SNAPSHOT`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub qualifier: Option<String>,
}

impl Version {
    /// Create a new version without qualifier
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Version {
            major,
            minor,
            patch,
            qualifier: None,
        }
    }

    /// Attach a qualifier (e.g. "SNAPSHOT")
    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = Some(qualifier.into());
        self
    }

    /// Parse a version string (e.g. "1.2.3", "v1.2.3" or "1.2.3-SNAPSHOT")
    pub fn parse(raw: &str) -> Result<Self> {
        // Tolerate tag-style prefixes
        let clean = raw.trim().trim_start_matches('v').trim_start_matches('V');

        let (numbers, qualifier) = match clean.split_once('-') {
            Some((_, "")) => {
                return Err(ReleaseToolsError::version(format!(
                    "Invalid version format: '{}' - empty qualifier",
                    raw
                )))
            }
            Some((numbers, qualifier)) => (numbers, Some(qualifier.to_string())),
            None => (clean, None),
        };

        let parts: Vec<&str> = numbers.split('.').collect();
        if parts.len() != 3 {
            return Err(ReleaseToolsError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                raw
            )));
        }

        let major = parts[0].parse::<u32>().map_err(|_| {
            ReleaseToolsError::version(format!("Invalid major version: {}", parts[0]))
        })?;
        let minor = parts[1].parse::<u32>().map_err(|_| {
            ReleaseToolsError::version(format!("Invalid minor version: {}", parts[1]))
        })?;
        let patch = parts[2].parse::<u32>().map_err(|_| {
            ReleaseToolsError::version(format!("Invalid patch version: {}", parts[2]))
        })?;

        Ok(Version {
            major,
            minor,
            patch,
            qualifier,
        })
    }

    /// Bump the version, resetting lower components and keeping the qualifier
    pub fn bump(&self, bump_type: &VersionBump) -> Self {
        let bumped = match bump_type {
            VersionBump::Major => Version::new(self.major + 1, 0, 0),
            VersionBump::Minor => Version::new(self.major, self.minor + 1, 0),
            VersionBump::Patch => Version::new(self.major, self.minor, self.patch + 1),
        };

        Version {
            qualifier: self.qualifier.clone(),
            ..bumped
        }
    }

    /// Whether this is a Maven snapshot version
    pub fn is_snapshot(&self) -> bool {
        self.qualifier.as_deref() == Some("SNAPSHOT")
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(qualifier) = &self.qualifier {
            write!(f, "-{}", qualifier)?;
        }
        Ok(())
    }
}

/// Version bump type decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl FromStr for VersionBump {
    type Err = ReleaseToolsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "major" => Ok(VersionBump::Major),
            "minor" => Ok(VersionBump::Minor),
            "patch" => Ok(VersionBump::Patch),
            other => Err(ReleaseToolsError::version(format!(
                "Unknown bump type: '{}' - expected major, minor or patch",
                other
            ))),
        }
    }
}
