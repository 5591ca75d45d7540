//! Tag categories: the generic build/extract engine.
//!
//! A [`TagCategory`] is an ordered set of [`FieldDescriptor`]s resolved for
//! one dictionary version. [`TagCategory::build`] turns an entry into a
//! [`Table`] and [`TagCategory::extract`] fills an entry back from one.
//!
//! Row count rules for loop categories:
//!
//! - N is the length of the first list-valued field, preferring required fields.
//! - Without any list, N is 1 if some attribute carries a value, else 0.
//! - Scalars are broadcast to N rows; other lists must have exactly N items.
//!
//! Free categories always hold one row and reject lists longer than one.

use crate::codec;
use crate::error::{Result, StarError};
use crate::field::{FieldDescriptor, FieldSpec, Source};
use crate::naming::CategoryNaming;
use crate::table::Table;
use crate::value::{Bound, Value};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::fmt;

/// Version-independent declaration of a tag category.
pub struct CategorySpec<E> {
    /// Logical category name, used in error messages.
    pub name: &'static str,
    /// Whether the category is written as a free (single row) table.
    pub free: bool,
    /// Fields in emission order.
    pub fields: Vec<FieldSpec<E>>,
}

impl<E> CategorySpec<E> {
    /// A free (single row) category.
    #[must_use]
    pub fn free(name: &'static str, fields: Vec<FieldSpec<E>>) -> Self {
        CategorySpec {
            name,
            free: true,
            fields,
        }
    }

    /// A loop (N row) category.
    #[must_use]
    pub fn looped(name: &'static str, fields: Vec<FieldSpec<E>>) -> Self {
        CategorySpec {
            name,
            free: false,
            fields,
        }
    }
}

impl<E> fmt::Debug for CategorySpec<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CategorySpec")
            .field("name", &self.name)
            .field("free", &self.free)
            .field("fields", &self.fields)
            .finish()
    }
}

/// Values supplied by the owning saveframe rather than the entry.
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    /// Saveframe category marker.
    pub marker: &'a str,
    /// Saveframe framecode.
    pub framecode: &'a str,
    /// Sequence number of the saveframe being written.
    pub list_id: u32,
}

/// A tag category resolved against one dictionary version.
pub struct TagCategory<E> {
    name: &'static str,
    label: Option<&'static str>,
    free: bool,
    fields: IndexMap<&'static str, FieldDescriptor<E>>,
    // Composed `_Label.Tag` names aligned with `fields`; `None` when suppressed.
    full_tags: Vec<Option<String>>,
}

impl<E> TagCategory<E> {
    /// Resolve a category declaration against a version's naming table.
    ///
    /// # Errors
    ///
    /// Returns [`StarError::Dictionary`] for duplicate keys, naming entries
    /// that do not correspond to a declared key, or colliding wire tags.
    pub fn new(spec: CategorySpec<E>, naming: &CategoryNaming) -> Result<Self> {
        let CategorySpec { name, free, fields } = spec;

        let mut descriptors = IndexMap::with_capacity(fields.len());
        for field in fields {
            let key = field.key;
            let descriptor = FieldDescriptor {
                wire_tag: naming.tag(key),
                spec: field,
            };
            if descriptors.insert(key, descriptor).is_some() {
                return Err(StarError::Dictionary(format!(
                    "duplicate field key '{key}' in {name}"
                )));
            }
        }

        if let Some(unknown) = naming.keys().find(|k| !descriptors.contains_key(*k)) {
            return Err(StarError::Dictionary(format!(
                "naming table for {name} refers to unknown key '{unknown}'"
            )));
        }

        let full_tags: Vec<Option<String>> = descriptors
            .values()
            .map(|d: &FieldDescriptor<E>| d.resolve_wire_tag(naming.label))
            .collect();

        let mut seen = HashSet::new();
        for tag in full_tags.iter().flatten() {
            if !seen.insert(tag.as_str()) {
                return Err(StarError::Dictionary(format!(
                    "wire tag '{tag}' is used twice in {name}"
                )));
            }
        }

        Ok(TagCategory {
            name,
            label: naming.label,
            free,
            fields: descriptors,
            full_tags,
        })
    }

    /// Logical category name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Wire label (tag prefix), if the version uses one.
    #[must_use]
    pub fn label(&self) -> Option<&'static str> {
        self.label
    }

    /// Whether this is a free (single row) category.
    #[must_use]
    pub fn is_free(&self) -> bool {
        self.free
    }

    /// Whether any field exists on the wire in this version.
    #[must_use]
    pub fn is_emitted(&self) -> bool {
        self.full_tags.iter().any(Option::is_some)
    }

    /// Descriptor of a field by key.
    #[must_use]
    pub fn descriptor(&self, key: &str) -> Option<&FieldDescriptor<E>> {
        self.fields.get(key)
    }

    /// Full wire tag of a field by key, `None` if unknown or suppressed.
    #[must_use]
    pub fn full_tag(&self, key: &str) -> Option<&str> {
        self.fields
            .get_index_of(key)
            .and_then(|i| self.full_tags[i].as_deref())
    }

    /// Full wire tags in emission order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.full_tags.iter().flatten().map(String::as_str)
    }

    /// Whether a table read from a file plausibly belongs to this category.
    ///
    /// Labelled categories require every column to carry the label prefix;
    /// flat (unlabelled) categories require at least one known tag.
    #[must_use]
    pub fn owns_table(&self, table: &Table) -> bool {
        if table.column_names.is_empty() {
            return false;
        }
        match self.label {
            Some(label) => {
                let prefix = format!("_{label}{}", crate::field::SEPARATOR);
                table.column_names.iter().all(|c| c.starts_with(&prefix))
            },
            None => table
                .column_names
                .iter()
                .any(|c| self.column_names().any(|known| known == c)),
        }
    }

    fn emitted(&self) -> impl Iterator<Item = (&FieldDescriptor<E>, &str)> + '_ {
        self.fields
            .values()
            .zip(&self.full_tags)
            .filter_map(|(d, tag)| tag.as_deref().map(|t| (d, t)))
    }

    /// Build the table for one entry.
    ///
    /// # Errors
    ///
    /// - [`StarError::MissingField`] when a required field is absent or has
    ///   missing elements
    /// - [`StarError::LengthMismatch`] when a list does not match the row count
    /// - [`StarError::InvalidValue`] for values outside the allowed set or
    ///   lists given to a free category
    pub fn build(&self, entry: &E, ctx: &BuildContext<'_>) -> Result<Table> {
        let bound: Vec<(&FieldDescriptor<E>, &str, Bound)> = self
            .emitted()
            .map(|(d, tag)| (d, tag, resolve(d, entry, ctx)))
            .collect();

        for (descriptor, _, value) in &bound {
            if descriptor.spec.required && value.is_absent() {
                return Err(self.missing(descriptor));
            }
        }

        let nrows = self.row_count(&bound)?;
        let mut table = Table::new(self.free);

        for (descriptor, tag, value) in bound {
            let spec = &descriptor.spec;
            let values: Vec<Option<Value>> = match value {
                _ if matches!(spec.source, Source::RowIds) => {
                    (1_i64..).take(nrows).map(|i| Some(Value::Int(i))).collect()
                },
                Bound::Absent => vec![None; nrows],
                Bound::Scalar(v) => vec![Some(v); nrows],
                Bound::List(items) => {
                    if items.len() != nrows {
                        return Err(StarError::LengthMismatch {
                            category: self.name.to_string(),
                            field: spec.display_name().to_string(),
                            expected: nrows,
                            found: items.len(),
                        });
                    }
                    items
                },
            };

            if spec.required && values.iter().any(Option::is_none) {
                return Err(self.missing(descriptor));
            }
            if let Some(allowed) = spec.allowed {
                check_allowed(spec.display_name(), allowed, &values)?;
            }

            table.push_column(tag.to_string(), codec::encode_column(&values));
        }

        Ok(table)
    }

    /// Populate an entry's attributes from a table.
    ///
    /// Columns are matched by full wire tag name. Each bound attribute
    /// receives the whole decoded column; derived and unbound fields are
    /// ignored on read. Optional columns that are absent leave the attribute
    /// untouched.
    ///
    /// # Errors
    ///
    /// - [`StarError::MissingColumn`] when a required field's tag is absent
    /// - [`StarError::Format`] when a value cannot be decoded
    /// - [`StarError::InvalidValue`] when the decoded column does not fit the attribute
    pub fn extract(&self, table: &Table, entry: &mut E) -> Result<()> {
        for (descriptor, tag) in self.emitted() {
            let Some(index) = table.column_index(tag) else {
                if descriptor.spec.required {
                    return Err(StarError::MissingColumn(tag.to_string()));
                }
                continue;
            };
            let Source::Attr(accessor) = &descriptor.spec.source else {
                continue;
            };
            let texts = table.columns.get(index).map_or(&[][..], Vec::as_slice);
            let values = codec::decode_column(texts, descriptor.spec.format)?;
            (accessor.set)(entry, Bound::List(values))?;
        }
        Ok(())
    }

    fn row_count(&self, bound: &[(&FieldDescriptor<E>, &str, Bound)]) -> Result<usize> {
        if self.free {
            for (descriptor, _, value) in bound {
                if let Some(len) = value.list_len().filter(|len| *len > 1) {
                    return Err(StarError::InvalidValue {
                        field: descriptor.spec.display_name().to_string(),
                        reason: format!(
                            "{} holds a single value per saveframe, found {len}",
                            self.name
                        ),
                    });
                }
            }
            return Ok(1);
        }

        let first_list = bound
            .iter()
            .find(|(d, _, v)| d.spec.required && v.list_len().is_some())
            .or_else(|| bound.iter().find(|(_, _, v)| v.list_len().is_some()));
        if let Some(len) = first_list.and_then(|(_, _, v)| v.list_len()) {
            return Ok(len);
        }

        let has_value = bound.iter().any(|(d, _, v)| {
            matches!(d.spec.source, Source::Attr(_) | Source::Computed(_))
                && matches!(v, Bound::Scalar(_))
        });
        Ok(usize::from(has_value))
    }

    fn missing(&self, descriptor: &FieldDescriptor<E>) -> StarError {
        StarError::MissingField {
            category: self.name.to_string(),
            field: descriptor.spec.display_name().to_string(),
        }
    }
}

impl<E> fmt::Debug for TagCategory<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagCategory")
            .field("name", &self.name)
            .field("label", &self.label)
            .field("free", &self.free)
            .field("columns", &self.column_names().collect::<Vec<_>>())
            .finish()
    }
}

fn resolve<E>(descriptor: &FieldDescriptor<E>, entry: &E, ctx: &BuildContext<'_>) -> Bound {
    let spec = &descriptor.spec;
    let value = match &spec.source {
        Source::Attr(accessor) => (accessor.get)(entry),
        Source::Computed(derive) => derive(entry),
        Source::Marker => Bound::Scalar(Value::from(ctx.marker)),
        Source::Framecode => Bound::Scalar(Value::from(ctx.framecode)),
        Source::ListId => Bound::Scalar(Value::Int(i64::from(ctx.list_id))),
        Source::RowIds | Source::Unbound => Bound::Absent,
    };
    match (value, &spec.default) {
        (Bound::Absent, Some(default)) => Bound::Scalar(default.clone()),
        (value, _) => value,
    }
}

fn check_allowed(field: &str, allowed: &[&str], values: &[Option<Value>]) -> Result<()> {
    for value in values.iter().flatten() {
        let text = value.to_string();
        if !allowed.contains(&text.as_str()) {
            return Err(StarError::InvalidValue {
                field: field.to_string(),
                reason: format!("'{text}' is not one of {allowed:?}"),
            });
        }
    }
    Ok(())
}
