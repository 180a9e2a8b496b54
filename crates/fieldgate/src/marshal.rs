//! The marshalling walk: records → output maps, everything else → values.
//!
//! Per field of a record, in declaration order:
//!
//! 1. `json:"-"`, unreadable, private, and empty `omitempty` fields are skipped.
//! 2. Group visibility is decided (only when a group filter is in effect).
//! 3. `since` / `until` bounds are checked against the target API version.
//! 4. The value is walked **whether or not it is visible**, so errors in hidden
//!    fields still surface. Inherited/embedded groups are pushed onto the
//!    parents set for the duration of that walk.
//! 5. Visible results are stored under the field key, or merged into the
//!    parent map for embedded records.

use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::error::{FieldgateError, Result};
use crate::group_set::GroupSet;
use crate::options::Options;
use crate::tags::FieldInfo;
use crate::version::Version;
use crate::walk::{MapKey, Record, Shape, Walk};

/// Marshal `data` into a generic value tree filtered by `options`.
///
/// A record yields a `Value::Object`; any other input yields whatever its
/// classification produces (array, scalar, null, ...).
///
/// # Errors
///
/// - [`FieldgateError::InvalidInputType`] for a mapping with non-string keys
/// - [`FieldgateError::VersionParse`] for a malformed `since`/`until` tag
/// - any error returned by a [`crate::Marshaller`] or a self-describing value
///
/// The first error aborts the whole call.
pub fn marshal(options: &Options, data: &dyn Walk) -> Result<Value> {
    debug!(
        groups = ?options.groups,
        api_version = ?options.api_version.as_ref().map(ToString::to_string),
        include_ungrouped = options.include_ungrouped,
        inherit_groups = options.inherit_groups,
        "marshal"
    );
    let mut walker = Walker::new(options);
    walker.object(data, false)
}

/// Shorthand for [`marshal`] with only `groups` set.
pub fn marshal_with_groups<I, S>(groups: I, data: &dyn Walk) -> Result<Value>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    marshal(&Options::new().groups(groups), data)
}

/// State of one marshal call.
struct Walker<'o> {
    options: &'o Options,
    /// Groups requested by the caller; fixed after construction.
    activation: GroupSet,
    /// Groups pushed by the inherited/embedded fields on the current path.
    parents: GroupSet,
}

impl<'o> Walker<'o> {
    fn new(options: &'o Options) -> Self {
        Self {
            options,
            activation: options.groups.iter().collect(),
            parents: GroupSet::new(),
        }
    }

    /// Walk a record's fields, or fall back to [`Walker::value`] for
    /// anything that is not record-shaped.
    fn object(&mut self, data: &dyn Walk, embedded_parents: bool) -> Result<Value> {
        match data.shape() {
            Shape::Record(record) => self.fields(record, embedded_parents),
            _ => self.value(data, false),
        }
    }

    fn fields(&mut self, record: &dyn Record, embedded_parents: bool) -> Result<Value> {
        let schema = record.schema();
        let mut dest = Map::new();

        for (index, info) in schema.fields().iter().enumerate() {
            if info.is_skipped() {
                continue;
            }
            let Some(val) = record.field(index) else {
                continue;
            };
            if info.omit_empty() && val.is_empty_value() {
                continue;
            }
            if info.is_private() {
                continue;
            }

            // Composition fields flatten into the parent and skip the group check.
            let is_embedded = info.is_embedded() && matches!(val.shape(), Shape::Record(_));

            let check_groups = !self.options.groups.is_empty()
                || (self.options.inherit_groups && !self.parents.is_empty())
                || self.options.include_ungrouped;
            let groups: &[String] = if check_groups { info.groups() } else { &[] };

            let show_from_group =
                !check_groups || self.group_visible(groups, is_embedded, embedded_parents);
            let (show_from_since, show_from_until) = self.version_visible(info)?;

            let push = self.options.inherit_groups || is_embedded;
            if push {
                self.parents.push(groups);
            }
            let result = self.value(val, is_embedded);
            if push {
                self.parents.pop(groups);
            }
            let node = result?;

            let keep = show_from_group && show_from_since && show_from_until;
            trace!(
                record = schema.type_name(),
                field = info.ident(),
                key = info.key(),
                group = show_from_group,
                since = show_from_since,
                until = show_from_until,
                keep,
                "field"
            );
            if !keep {
                continue;
            }

            match node {
                Value::Object(nested) if is_embedded => dest.extend(nested),
                node => {
                    dest.insert(info.key().to_owned(), node);
                }
            }
        }

        Ok(Value::Object(dest))
    }

    fn group_visible(&self, groups: &[String], is_embedded: bool, embedded_parents: bool) -> bool {
        let has_exact_match = self.activation.contains_any(groups);
        let has_parent_match = if self.options.inherit_groups {
            self.parents.contains_any(&self.options.groups)
        } else if embedded_parents && groups.is_empty() {
            self.parents.contains_any(&self.options.groups)
        } else {
            false
        };
        let has_no_group = groups.is_empty();

        has_exact_match
            || has_parent_match
            || (has_no_group && self.options.include_ungrouped)
            || is_embedded
    }

    /// `(since_ok, until_ok)` for a field. Tags are parsed even without a
    /// target version so malformed values are always reported.
    fn version_visible(&self, info: &FieldInfo) -> Result<(bool, bool)> {
        let since = info.since_version()?;
        let until = info.until_version()?;
        let Some(target) = self.options.api_version.as_ref() else {
            return Ok((true, true));
        };
        let since_ok = since.map_or(true, |s: Version| *target >= s);
        let until_ok = until.map_or(true, |u: Version| *target <= u);
        Ok((since_ok, until_ok))
    }

    fn value(&mut self, v: &dyn Walk, embedded_parents: bool) -> Result<Value> {
        if let Some(marshaller) = v.as_marshaller() {
            return marshaller.marshal(self.options);
        }
        if let Some(described) = v.describe() {
            return described;
        }

        match v.shape() {
            Shape::Absent => Ok(Value::Null),
            Shape::Record(record) => self.fields(record, embedded_parents),
            Shape::Sequence(items) => items
                .into_iter()
                .map(|item| self.value(item, embedded_parents))
                .collect::<Result<Vec<_>>>()
                .map(Value::Array),
            Shape::Mapping { type_name, entries } => {
                if entries.is_empty() {
                    return Ok(Value::Null);
                }
                let len = entries.len();
                let mut keyed = Vec::with_capacity(len);
                for (key, item) in entries {
                    match key {
                        MapKey::Str(k) => keyed.push((k, item)),
                        MapKey::Other { kind, key } => {
                            return Err(FieldgateError::InvalidInputType {
                                kind,
                                key,
                                type_name,
                                len,
                            })
                        }
                    }
                }
                let mut dest = Map::new();
                for (key, item) in keyed {
                    let node = self.value(item, embedded_parents)?;
                    dest.insert(key.to_owned(), node);
                }
                Ok(Value::Object(dest))
            }
            Shape::Scalar(scalar) => Ok(scalar),
        }
    }
}
