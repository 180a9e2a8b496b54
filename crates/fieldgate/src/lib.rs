//! # fieldgate
//!
//! Group- and version-aware marshalling of Rust records into a generic
//! `serde_json::Value` tree, ready to hand to any serde encoder.
//!
//! Every field of a record can carry struct-tag style metadata:
//!
//! - `json:"name,omitempty"` -- output key, omit when empty, `-` to skip
//! - `groups:"api,admin"` -- the field is only emitted when one of its groups is active
//! - `since:"2"` / `until:"3.1"` -- the API version range the field is valid for
//!
//! ## Quick start
//!
//! ```rust
//! use fieldgate::{marshal, record, Options};
//! use serde_json::json;
//!
//! struct User {
//!     name: String,
//!     email: String,
//!     password_hash: String,
//! }
//!
//! record!(User {
//!     name: r#"json:"name" groups:"api""#,
//!     email: r#"json:"email" groups:"admin""#,
//!     password_hash: r#"json:"-""#,
//! });
//!
//! let user = User {
//!     name: "alice".into(),
//!     email: "alice@example.com".into(),
//!     password_hash: "x".into(),
//! };
//!
//! let out = marshal(&Options::new().groups(["api"]), &user).unwrap();
//! assert_eq!(out, json!({"name": "alice"}));
//! ```
//!
//! ## Modules
//!
//! - [`marshal`] — the object/value walkers and the [`marshal()`] entry point
//! - [`walk`] — the [`Walk`] classification trait and impls for std types
//! - [`tags`] — struct-tag parsing and per-type field descriptor tables
//! - [`options`] — per-call [`Options`]
//! - [`group_set`] — reference-counted group multiset
//! - [`version`] — API version parsing and ordering
//! - [`error`] — error types

pub mod error;
pub mod group_set;
mod macros;
pub mod marshal;
pub mod options;
pub mod tags;
pub mod version;
pub mod walk;

pub use error::{FieldgateError, Result};
pub use group_set::GroupSet;
pub use marshal::{marshal, marshal_with_groups};
pub use options::Options;
pub use tags::{FieldInfo, Schema, StructTag};
pub use version::Version;
pub use walk::{AsMapKey, MapKey, Marshaller, Opaque, Record, Shape, Stringified, Walk};
