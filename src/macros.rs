//! Macros for declaring saveframe field bindings.
//!
//! These reduce the boilerplate of wiring entry struct fields into the
//! mapping engine: one accessor per attribute, resolved once when the
//! saveframe definition is built.

/// Build an [`Accessor`](crate::field::Accessor) for a field of an entry struct.
///
/// The field type must implement [`Bind`](crate::value::Bind), i.e. be an
/// `Option<T>` or `Vec<Option<T>>` of `String`, `i64` or `f64`. Setter errors
/// are reported as [`StarError::InvalidValue`](crate::error::StarError::InvalidValue)
/// naming the field.
///
/// # Example
///
/// ```ignore
/// #[derive(Default)]
/// struct Entry {
///     frq: Option<f64>,
///     res_nums: Vec<Option<i64>>,
/// }
///
/// let frq = bind!(Entry, frq);
/// let res_nums = bind!(Entry, res_nums);
/// ```
#[macro_export]
macro_rules! bind {
    ($entry:ty, $field:ident) => {
        $crate::field::Accessor::<$entry> {
            attribute: stringify!($field),
            get: |e: &$entry| $crate::value::Bind::to_bound(&e.$field),
            set: |e: &mut $entry, bound: $crate::value::Bound| {
                e.$field = $crate::value::Bind::from_bound(bound).map_err(|reason| {
                    $crate::error::StarError::InvalidValue {
                        field: stringify!($field).to_string(),
                        reason,
                    }
                })?;
                Ok(())
            },
        }
    };
}

/// Declare a per-version naming table.
///
/// Each entry maps a field key to its local wire tag; keys left out are not
/// present in that version.
///
/// # Example
///
/// ```ignore
/// const T1_V3_1: CategoryNaming = naming!(Some("T1"), [
///     "RxID" => "ID",
///     "Val" => "Val",
/// ]);
/// ```
#[macro_export]
macro_rules! naming {
    ($label:expr, [$($key:literal => $tag:literal),* $(,)?]) => {
        $crate::naming::CategoryNaming {
            label: $label,
            tags: &[$(($key, $tag)),*],
        }
    };
}
