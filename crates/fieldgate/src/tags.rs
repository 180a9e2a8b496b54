//! Field metadata: struct-tag strings and per-type descriptor tables.
//!
//! # Tag syntax
//!
//! A tag string is a space-separated list of `key:"value"` pairs, e.g.
//!
//! ```text
//! json:"email,omitempty" groups:"admin,support" since:"2" until:"3.1"
//! ```
//!
//! Keys read by the walker:
//!
//! - `json` -- output key and options. `-` skips the field; the `omitempty`
//!   option drops it when its value is empty.
//! - `groups` -- comma-separated group names.
//! - `since` / `until` -- inclusive API version bounds, parsed when the field
//!   is visited.

use crate::version::Version;

/// A raw struct-tag string with `key:"value"` lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructTag(String);

impl StructTag {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Value for `key`, or `None` when absent. The first occurrence wins.
    /// Parsing stops at the first malformed pair.
    pub fn lookup(&self, key: &str) -> Option<String> {
        let mut rest = self.0.as_str();
        loop {
            rest = rest.trim_start_matches(' ');
            if rest.is_empty() {
                return None;
            }

            // Key: everything up to ':' (no spaces, quotes or control chars).
            let name_len = rest
                .bytes()
                .position(|b| b <= b' ' || b == b':' || b == b'"' || b == 0x7f)
                .unwrap_or(rest.len());
            let bytes = rest.as_bytes();
            if name_len == 0
                || name_len + 1 >= rest.len()
                || bytes[name_len] != b':'
                || bytes[name_len + 1] != b'"'
            {
                return None;
            }
            let name = &rest[..name_len];
            rest = &rest[name_len + 1..];

            // Quoted value, honouring backslash escapes.
            let bytes = rest.as_bytes();
            let mut i = 1;
            while i < bytes.len() && bytes[i] != b'"' {
                if bytes[i] == b'\\' {
                    i += 1;
                }
                i += 1;
            }
            if i >= bytes.len() {
                return None;
            }
            let quoted = &rest[1..i];
            rest = &rest[i + 1..];

            if name == key {
                return unescape(quoted);
            }
        }
    }

    /// Like [`lookup`](Self::lookup) but maps an empty value to `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.lookup(key).filter(|v| !v.is_empty())
    }
}

fn unescape(quoted: &str) -> Option<String> {
    let mut out = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next()? {
            '"' => out.push('"'),
            '\\' => out.push('\\'),
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            _ => return None,
        }
    }
    Some(out)
}

/// Descriptor for one record field, derived from its identifier, tag string
/// and structural flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    ident: &'static str,
    tag: StructTag,
    embedded: bool,
    private: bool,
    key: String,
    skip: bool,
    omit_empty: bool,
    groups: Vec<String>,
    since: Option<String>,
    until: Option<String>,
}

impl FieldInfo {
    /// A field with no tags, emitted under its identifier.
    pub fn new(ident: &'static str) -> Self {
        Self {
            ident,
            tag: StructTag::default(),
            embedded: false,
            private: false,
            key: ident.to_owned(),
            skip: false,
            omit_empty: false,
            groups: Vec::new(),
            since: None,
            until: None,
        }
    }

    /// Attach a tag string and derive the naming, group and version metadata.
    pub fn tags(mut self, raw: &str) -> Self {
        self.tag = StructTag::new(raw);

        let naming = self.tag.lookup("json").unwrap_or_default();
        let (name, opts) = match naming.split_once(',') {
            Some((name, opts)) => (name, opts),
            None => (naming.as_str(), ""),
        };
        self.key = if name.is_empty() {
            self.ident.to_owned()
        } else {
            name.to_owned()
        };
        self.skip = self.key == "-";
        self.omit_empty = opts.split(',').any(|o| o == "omitempty");

        self.groups = self
            .tag
            .get("groups")
            .map(|g| {
                g.split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        self.since = self.tag.get("since");
        self.until = self.tag.get("until");
        self
    }

    /// Mark the field as an anonymous composition: when its value is a
    /// record, that record's fields are flattened into the parent.
    pub fn embedded(mut self) -> Self {
        self.embedded = true;
        self
    }

    /// Mark the field as not externally accessible; it is never emitted.
    pub fn private(mut self) -> Self {
        self.private = true;
        self
    }

    pub fn ident(&self) -> &'static str {
        self.ident
    }

    pub fn tag(&self) -> &StructTag {
        &self.tag
    }

    /// Output key (the `json` tag name, or the identifier).
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    pub fn omit_empty(&self) -> bool {
        self.omit_empty
    }

    pub fn is_embedded(&self) -> bool {
        self.embedded
    }

    pub fn is_private(&self) -> bool {
        self.private
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn since(&self) -> Option<&str> {
        self.since.as_deref()
    }

    pub fn until(&self) -> Option<&str> {
        self.until.as_deref()
    }

    /// Parsed `since` bound.
    pub fn since_version(&self) -> crate::Result<Option<Version>> {
        self.since.as_deref().map(Version::parse).transpose()
    }

    /// Parsed `until` bound.
    pub fn until_version(&self) -> crate::Result<Option<Version>> {
        self.until.as_deref().map(Version::parse).transpose()
    }
}

/// Field descriptor table for one record type, in declaration order.
///
/// Built once per type and shared by every value of it; the [`crate::record!`]
/// macro keeps it in a `static OnceLock`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    type_name: &'static str,
    fields: Vec<FieldInfo>,
}

impl Schema {
    pub fn new(type_name: &'static str, fields: Vec<FieldInfo>) -> Self {
        Self { type_name, fields }
    }

    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    pub fn field(&self, index: usize) -> Option<&FieldInfo> {
        self.fields.get(index)
    }

    /// Index of the field with identifier `ident`.
    pub fn index_of(&self, ident: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.ident == ident)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
