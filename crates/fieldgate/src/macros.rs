/// Implement [`Record`](crate::Record) and [`Walk`](crate::Walk) for a struct.
///
/// Each field is listed with its tag string, in declaration order. Prefix a
/// field with `#[embedded]` to flatten a nested record into its parent, or
/// `#[private]` to keep it out of the output entirely. The descriptor table
/// is built on first use and shared afterwards; for a generic record every
/// instantiation shares one table.
///
/// The type is named by a bare identifier, optionally followed by type
/// parameters (`Page<T>`); each parameter is bound by `Walk`. Invoke the
/// macro where the type is in scope rather than through a path. Lifetime
/// and const parameters, and extra bounds, need hand-written impls.
///
/// ```
/// use fieldgate::{marshal, record, Options};
/// use serde_json::json;
///
/// struct Audit {
///     created_by: String,
/// }
/// record!(Audit { created_by: r#"json:"createdBy""# });
///
/// struct Document {
///     audit: Audit,
///     title: String,
/// }
/// record!(Document {
///     #[embedded] audit: "",
///     title: r#"json:"title""#,
/// });
///
/// let doc = Document {
///     audit: Audit { created_by: "bob".into() },
///     title: "Q3".into(),
/// };
/// let out = marshal(&Options::new(), &doc).unwrap();
/// assert_eq!(out, json!({"createdBy": "bob", "title": "Q3"}));
/// ```
#[macro_export]
macro_rules! record {
    ($ty:ident $(< $($gen:ident),+ $(,)? >)? { $( $(#[$flag:ident])* $field:ident : $tags:expr ),* $(,)? }) => {
        impl $(< $($gen: $crate::Walk),+ >)? $crate::Record for $ty $(< $($gen),+ >)? {
            fn schema(&self) -> &'static $crate::Schema {
                static SCHEMA: ::std::sync::OnceLock<$crate::Schema> = ::std::sync::OnceLock::new();
                SCHEMA.get_or_init(|| {
                    $crate::Schema::new(
                        ::std::stringify!($ty),
                        ::std::vec![
                            $( $crate::FieldInfo::new(::std::stringify!($field)).tags($tags) $(.$flag())* ),*
                        ],
                    )
                })
            }

            fn field(&self, index: usize) -> ::std::option::Option<&dyn $crate::Walk> {
                let fields: &[&dyn $crate::Walk] = &[ $( &self.$field ),* ];
                fields.get(index).copied()
            }
        }

        impl $(< $($gen: $crate::Walk),+ >)? $crate::Walk for $ty $(< $($gen),+ >)? {
            fn shape(&self) -> $crate::Shape<'_> {
                $crate::Shape::Record(self)
            }
        }
    };
}
