//! Value classification: how the walker sees an arbitrary Rust value.
//!
//! A value is resolved in this priority order:
//!
//! 1. **Self-marshalling** -- [`Walk::as_marshaller`] returns a [`Marshaller`];
//!    the walker hands it the options and returns its output verbatim.
//! 2. **Self-describing** -- [`Walk::describe`] renders the value through its
//!    own serde/`Display` implementation, which is passed through untouched.
//!    Use [`Opaque`] or [`Stringified`] for types such as addresses or byte
//!    blobs that must not be taken apart structurally.
//! 3. **Structural** -- [`Walk::shape`]: record, sequence, keyed mapping,
//!    scalar, or absent.
//!
//! `Option`, `Box`, `Rc`, `Arc` and references are one level of indirection:
//! they forward to the value they hold, and `None` is absent.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::fmt::Display;
use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::error::Result;
use crate::options::Options;
use crate::tags::Schema;

/// Structural category of a value.
pub enum Shape<'a> {
    /// Nothing to read (`None`, `()`, or a value that hides its structure).
    Absent,
    /// Struct-like value with enumerable fields.
    Record(&'a dyn Record),
    /// Ordered elements.
    Sequence(Vec<&'a dyn Walk>),
    /// Keyed entries. `type_name` identifies the container in errors.
    Mapping {
        type_name: &'static str,
        entries: Vec<(MapKey<'a>, &'a dyn Walk)>,
    },
    /// Leaf value, emitted as-is.
    Scalar(Value),
}

/// Key of a mapping entry. Only string keys can be marshalled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapKey<'a> {
    Str(&'a str),
    /// Non-string key: its type name and rendered value.
    Other { kind: &'static str, key: String },
}

/// Anything that can appear as a mapping key.
pub trait AsMapKey {
    fn map_key(&self) -> MapKey<'_>;
}

/// A value the walker can traverse.
pub trait Walk {
    fn shape(&self) -> Shape<'_>;

    /// Custom marshalling hook, checked before anything else.
    fn as_marshaller(&self) -> Option<&dyn Marshaller> {
        None
    }

    /// Pre-rendered representation, checked after [`Walk::as_marshaller`].
    fn describe(&self) -> Option<Result<Value>> {
        None
    }

    /// Zero/empty test used by the `omitempty` tag option.
    fn is_empty_value(&self) -> bool {
        false
    }
}

/// Types that produce their own output given the active options.
///
/// The implementation is responsible for any group/version filtering of
/// its own content.
pub trait Marshaller {
    fn marshal(&self, options: &Options) -> Result<Value>;
}

/// A struct-like value: a descriptor table plus indexed field access.
///
/// Usually implemented through [`crate::record!`].
pub trait Record {
    fn schema(&self) -> &'static Schema;

    /// Value of the field at `index` in the schema, or `None` when it cannot
    /// be read (the walker then skips it).
    fn field(&self, index: usize) -> Option<&dyn Walk>;
}

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

macro_rules! walk_number {
    ($($t:ty),*) => {$(
        impl Walk for $t {
            fn shape(&self) -> Shape<'_> {
                Shape::Scalar(Value::from(*self))
            }

            fn is_empty_value(&self) -> bool {
                *self == (0 as $t)
            }
        }

        impl AsMapKey for $t {
            fn map_key(&self) -> MapKey<'_> {
                MapKey::Other {
                    kind: stringify!($t),
                    key: self.to_string(),
                }
            }
        }
    )*};
}

walk_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Walk for bool {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Value::Bool(*self))
    }

    fn is_empty_value(&self) -> bool {
        !*self
    }
}

impl AsMapKey for bool {
    fn map_key(&self) -> MapKey<'_> {
        MapKey::Other {
            kind: "bool",
            key: self.to_string(),
        }
    }
}

impl Walk for char {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Value::String(self.to_string()))
    }

    fn is_empty_value(&self) -> bool {
        *self == '\0'
    }
}

impl AsMapKey for char {
    fn map_key(&self) -> MapKey<'_> {
        MapKey::Other {
            kind: "char",
            key: self.to_string(),
        }
    }
}

impl Walk for str {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(Value::String(self.to_owned()))
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl AsMapKey for str {
    fn map_key(&self) -> MapKey<'_> {
        MapKey::Str(self)
    }
}

impl Walk for String {
    fn shape(&self) -> Shape<'_> {
        self.as_str().shape()
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl AsMapKey for String {
    fn map_key(&self) -> MapKey<'_> {
        MapKey::Str(self)
    }
}

impl Walk for () {
    fn shape(&self) -> Shape<'_> {
        Shape::Absent
    }

    fn is_empty_value(&self) -> bool {
        true
    }
}

/// Already a generic tree: passed through unchanged.
impl Walk for Value {
    fn shape(&self) -> Shape<'_> {
        Shape::Scalar(self.clone())
    }

    fn describe(&self) -> Option<Result<Value>> {
        Some(Ok(self.clone()))
    }

    fn is_empty_value(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Bool(b) => !b,
            Value::Number(n) => n.as_f64() == Some(0.0),
            Value::String(s) => s.is_empty(),
            Value::Array(a) => a.is_empty(),
            Value::Object(o) => o.is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Indirection
// ---------------------------------------------------------------------------

impl<T: Walk> Walk for Option<T> {
    fn shape(&self) -> Shape<'_> {
        match self {
            Some(v) => v.shape(),
            None => Shape::Absent,
        }
    }

    fn as_marshaller(&self) -> Option<&dyn Marshaller> {
        self.as_ref()?.as_marshaller()
    }

    fn describe(&self) -> Option<Result<Value>> {
        self.as_ref()?.describe()
    }

    fn is_empty_value(&self) -> bool {
        self.is_none()
    }
}

macro_rules! walk_forward {
    ($($ptr:ident),*) => {$(
        impl<T: Walk + ?Sized> Walk for $ptr<T> {
            fn shape(&self) -> Shape<'_> {
                (**self).shape()
            }

            fn as_marshaller(&self) -> Option<&dyn Marshaller> {
                (**self).as_marshaller()
            }

            fn describe(&self) -> Option<Result<Value>> {
                (**self).describe()
            }

            fn is_empty_value(&self) -> bool {
                (**self).is_empty_value()
            }
        }

        impl<T: AsMapKey + ?Sized> AsMapKey for $ptr<T> {
            fn map_key(&self) -> MapKey<'_> {
                (**self).map_key()
            }
        }
    )*};
}

walk_forward!(Box, Rc, Arc);

impl<T: Walk + ?Sized> Walk for &T {
    fn shape(&self) -> Shape<'_> {
        (**self).shape()
    }

    fn as_marshaller(&self) -> Option<&dyn Marshaller> {
        (**self).as_marshaller()
    }

    fn describe(&self) -> Option<Result<Value>> {
        (**self).describe()
    }

    fn is_empty_value(&self) -> bool {
        (**self).is_empty_value()
    }
}

impl<T: AsMapKey + ?Sized> AsMapKey for &T {
    fn map_key(&self) -> MapKey<'_> {
        (**self).map_key()
    }
}

// ---------------------------------------------------------------------------
// Sequences
// ---------------------------------------------------------------------------

impl<T: Walk> Walk for [T] {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|v| v as &dyn Walk).collect())
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<T: Walk, const N: usize> Walk for [T; N] {
    fn shape(&self) -> Shape<'_> {
        self.as_slice().shape()
    }

    fn is_empty_value(&self) -> bool {
        N == 0
    }
}

impl<T: Walk> Walk for Vec<T> {
    fn shape(&self) -> Shape<'_> {
        self.as_slice().shape()
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

macro_rules! walk_iterable {
    ($($coll:ident),*) => {$(
        impl<T: Walk> Walk for $coll<T> {
            fn shape(&self) -> Shape<'_> {
                Shape::Sequence(self.iter().map(|v| v as &dyn Walk).collect())
            }

            fn is_empty_value(&self) -> bool {
                self.is_empty()
            }
        }
    )*};
}

walk_iterable!(VecDeque, BTreeSet);

impl<T: Walk, S> Walk for HashSet<T, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::Sequence(self.iter().map(|v| v as &dyn Walk).collect())
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Mappings
// ---------------------------------------------------------------------------

impl<K: AsMapKey, V: Walk, S> Walk for HashMap<K, V, S> {
    fn shape(&self) -> Shape<'_> {
        Shape::Mapping {
            type_name: std::any::type_name::<Self>(),
            entries: self
                .iter()
                .map(|(k, v)| (k.map_key(), v as &dyn Walk))
                .collect(),
        }
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

impl<K: AsMapKey, V: Walk> Walk for BTreeMap<K, V> {
    fn shape(&self) -> Shape<'_> {
        Shape::Mapping {
            type_name: std::any::type_name::<Self>(),
            entries: self
                .iter()
                .map(|(k, v)| (k.map_key(), v as &dyn Walk))
                .collect(),
        }
    }

    fn is_empty_value(&self) -> bool {
        self.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Self-describing wrappers
// ---------------------------------------------------------------------------

/// Renders the wrapped value through its own `Serialize` impl and passes
/// the result through without structural processing.
///
/// ```
/// use fieldgate::{marshal, Opaque, Options};
/// use std::net::Ipv4Addr;
///
/// let out = marshal(&Options::new(), &Opaque(Ipv4Addr::LOCALHOST)).unwrap();
/// assert_eq!(out, serde_json::json!("127.0.0.1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Opaque<T>(pub T);

impl<T: Serialize> Walk for Opaque<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Absent
    }

    fn describe(&self) -> Option<Result<Value>> {
        Some(serde_json::to_value(&self.0).map_err(Into::into))
    }
}

/// Renders the wrapped value through `Display` as a single string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Stringified<T>(pub T);

impl<T: Display> Walk for Stringified<T> {
    fn shape(&self) -> Shape<'_> {
        Shape::Absent
    }

    fn describe(&self) -> Option<Result<Value>> {
        Some(Ok(Value::String(self.0.to_string())))
    }
}
