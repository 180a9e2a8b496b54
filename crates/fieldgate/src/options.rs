//! Per-call marshalling options.
//!
//! `Options` is read-only for the duration of a [`crate::marshal()`] call. It
//! can be built fluently or loaded from a configuration document:
//!
//! ```
//! use fieldgate::Options;
//!
//! let opts: Options = serde_json::from_str(
//!     r#"{"groups":["api"],"apiVersion":"2.1","outputFieldsWithNoGroup":true}"#,
//! ).unwrap();
//! assert_eq!(opts.groups, vec!["api".to_string()]);
//! assert!(opts.include_ungrouped);
//! assert!(!opts.inherit_groups);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::version::Version;

/// Determines which record fields end up in the output tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Options {
    /// Active groups. A field declaring several groups is emitted when any
    /// one of them is listed here.
    pub groups: Vec<String>,

    /// Target API version compared against `since` and `until` tags.
    /// A field with `until:"2"` is emitted for `1.0.0`; one with `since:"2"`
    /// is not. When unset, the tags do not filter (their values are still
    /// validated).
    pub api_version: Option<Version>,

    /// Emit fields that declare no group. Fields whose groups do not match
    /// are still dropped.
    #[serde(rename = "outputFieldsWithNoGroup")]
    pub include_ungrouped: bool,

    /// Propagate the groups of a record-typed field to every field of that
    /// record.
    pub inherit_groups: bool,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = groups.into_iter().map(Into::into).collect();
        self
    }

    pub fn api_version(mut self, version: Version) -> Self {
        self.api_version = Some(version);
        self
    }

    /// Parse and set the target API version.
    pub fn try_api_version(self, version: &str) -> Result<Self> {
        Ok(self.api_version(Version::parse(version)?))
    }

    pub fn include_ungrouped(mut self, yes: bool) -> Self {
        self.include_ungrouped = yes;
        self
    }

    pub fn inherit_groups(mut self, yes: bool) -> Self {
        self.inherit_groups = yes;
        self
    }
}
