//! Per-series version identifiers, rendered externally as `v{n}`.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::codec::CodecError;

/// One allocated version number of a series. Totally ordered, never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version(u64);

impl Version {
    /// Wrap a counter value. Returns None for 0, which the allocator never issues.
    pub fn new(number: u64) -> Option<Self> {
        (number > 0).then_some(Version(number))
    }

    pub fn number(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

impl FromStr for Version {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('v')
            .filter(|digits| {
                !digits.is_empty()
                    && !digits.starts_with('0')
                    && digits.bytes().all(|b| b.is_ascii_digit())
            })
            .and_then(|digits| digits.parse::<u64>().ok())
            .and_then(Version::new)
            .ok_or_else(|| CodecError::MalformedVersion(s.to_string()))
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Which version a caller wants resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VersionSelector {
    /// Whatever the latest pointer names at the time of the read.
    Latest,
    Exact(Version),
}

impl VersionSelector {
    /// Map an optional query parameter: absent means latest.
    pub fn from_query(version: Option<&str>) -> Result<Self, CodecError> {
        match version {
            None => Ok(VersionSelector::Latest),
            Some(raw) => raw.parse(),
        }
    }
}

impl From<Version> for VersionSelector {
    fn from(version: Version) -> Self {
        VersionSelector::Exact(version)
    }
}

impl fmt::Display for VersionSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionSelector::Latest => f.write_str("latest"),
            VersionSelector::Exact(version) => version.fmt(f),
        }
    }
}

impl FromStr for VersionSelector {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "latest" {
            Ok(VersionSelector::Latest)
        } else {
            s.parse().map(VersionSelector::Exact)
        }
    }
}
