//! API versions used by the `since` / `until` field tags.
//!
//! Accepted forms: `[v]N(.N)*[[-]prerelease][+metadata]`. Short forms such as
//! `"2"` or `"1.4"` are valid; missing segments compare as zero, so `"2"`,
//! `"2.0"` and `"2.0.0"` are all equal. The `-` before a prerelease may be
//! left out when it starts with a letter (`1.0beta`, `1.2.3rc1`). Prerelease
//! and metadata are dot-separated identifiers of `[0-9A-Za-z-~]`.
//!
//! Ordering:
//! 1. numeric segments, left to right
//! 2. a version with a prerelease sorts before the same version without one
//! 3. prerelease identifiers (dot-separated) compare numerically when both
//!    are numeric, otherwise lexically; numeric identifiers sort first
//!
//! Build metadata is kept for display but ignored by comparisons.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{FieldgateError, Result};

/// A parsed API version.
#[derive(Debug, Clone)]
pub struct Version {
    segments: Vec<u64>,
    prerelease: Vec<String>,
    metadata: Option<String>,
    original: String,
}

impl Version {
    /// Parse a version string.
    ///
    /// # Errors
    ///
    /// Returns [`FieldgateError::VersionParse`] for empty input, non-numeric
    /// segments, or empty/ill-formed prerelease and metadata identifiers.
    ///
    /// ```
    /// use fieldgate::Version;
    ///
    /// let short = Version::parse("2").unwrap();
    /// let full = Version::parse("v2.0.0").unwrap();
    /// assert_eq!(short, full);
    /// assert!(Version::parse("2.0.0-beta").unwrap() < full);
    /// ```
    pub fn parse(input: &str) -> Result<Self> {
        let fail = |reason: &str| FieldgateError::VersionParse {
            input: input.to_owned(),
            reason: reason.to_owned(),
        };

        let trimmed = input.trim();
        let body = trimmed.strip_prefix('v').unwrap_or(trimmed);
        if body.is_empty() {
            return Err(fail("empty version"));
        }

        let (body, metadata) = match body.split_once('+') {
            Some((rest, meta)) => {
                if !valid_identifiers(meta) {
                    return Err(fail("malformed build metadata"));
                }
                (rest, Some(meta.to_owned()))
            }
            None => (body, None),
        };

        // Numeric core: `N(.N)*`, stopping before anything that is not a
        // dot followed by a digit.
        let bytes = body.as_bytes();
        let mut segments = Vec::new();
        let mut pos = 0;
        loop {
            let start = pos;
            while pos < bytes.len() && bytes[pos].is_ascii_digit() {
                pos += 1;
            }
            if pos == start {
                return Err(fail("segments must be non-empty decimal numbers"));
            }
            let n = body[start..pos]
                .parse::<u64>()
                .map_err(|_| fail("segment out of range"))?;
            segments.push(n);
            if pos + 1 < bytes.len() && bytes[pos] == b'.' && bytes[pos + 1].is_ascii_digit() {
                pos += 1;
            } else {
                break;
            }
        }

        // Prerelease: `-` then any identifier, or an identifier that starts
        // with a letter, `-` or `~` directly after the core (`1.0beta`).
        let rest = &body[pos..];
        let prerelease = if rest.is_empty() {
            Vec::new()
        } else {
            let pre = match rest.strip_prefix('-') {
                Some(pre) => pre,
                None if rest.starts_with(|c: char| c.is_ascii_alphabetic() || c == '~') => rest,
                None => return Err(fail("unexpected characters after numeric segments")),
            };
            if !valid_identifiers(pre) {
                return Err(fail("malformed prerelease"));
            }
            pre.split('.').map(str::to_owned).collect()
        };

        Ok(Self {
            segments,
            prerelease,
            metadata,
            original: trimmed.to_owned(),
        })
    }

    /// Numeric segments as written (no zero padding).
    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    /// Prerelease identifiers joined by `.`, empty when none.
    pub fn prerelease(&self) -> String {
        self.prerelease.join(".")
    }

    pub fn metadata(&self) -> Option<&str> {
        self.metadata.as_deref()
    }

    fn segment(&self, i: usize) -> u64 {
        self.segments.get(i).copied().unwrap_or(0)
    }
}

/// Dot-separated, non-empty identifiers made of `[0-9A-Za-z-~]`.
fn valid_identifiers(s: &str) -> bool {
    s.split('.').all(|id| {
        !id.is_empty()
            && id
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'~')
    })
}

fn compare_prerelease(a: &[String], b: &[String]) -> Ordering {
    match (a.is_empty(), b.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        (false, false) => {}
    }
    for (x, y) in a.iter().zip(b) {
        let ord = match (x.parse::<u64>(), y.parse::<u64>()) {
            (Ok(x), Ok(y)) => x.cmp(&y),
            (Ok(_), Err(_)) => Ordering::Less,
            (Err(_), Ok(_)) => Ordering::Greater,
            (Err(_), Err(_)) => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        (0..len)
            .map(|i| self.segment(i).cmp(&other.segment(i)))
            .find(|ord| *ord != Ordering::Equal)
            .unwrap_or_else(|| compare_prerelease(&self.prerelease, &other.prerelease))
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl FromStr for Version {
    type Err = FieldgateError;

    fn from_str(s: &str) -> Result<Self> {
        Version::parse(s)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Version::parse(&raw).map_err(serde::de::Error::custom)
    }
}
