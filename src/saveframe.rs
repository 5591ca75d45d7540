//! Saveframes: one record family bound to one dictionary version.
//!
//! A [`SaveframeDef`] is the declarative description of a family (category
//! specs, per-version naming, framecode). [`Saveframe::new`] resolves it for a
//! version; afterwards [`Saveframe::add`] writes entries as new blocks and
//! [`Saveframe::each`] lazily decodes matching blocks back into entries.

use crate::category::{BuildContext, CategorySpec, TagCategory};
use crate::error::{Result, StarError};
use crate::field::{compose_tag, Source};
use crate::naming::SaveframeNaming;
use crate::table::{Block, Table};
use crate::version::DictVersion;
use std::fmt;
use std::slice;

/// Produces the framecode of the saveframe written for an entry.
pub type Framecode<E> = fn(&E, u32) -> String;

/// Whole-entry validation run before any table is built.
pub type Validate<E> = fn(&E) -> Result<()>;

/// Naming tables of a family, `None` for versions that lack it.
pub type NamingFn = fn(DictVersion) -> Option<SaveframeNaming>;

/// Declarative description of a record family.
pub struct SaveframeDef<E> {
    /// Family label used in logs and errors.
    pub label: &'static str,
    /// Tag categories in block order. The first category carries the marker.
    pub categories: Vec<CategorySpec<E>>,
    /// Naming tables per dictionary version.
    pub naming: NamingFn,
    /// Framecode generator, given the entry and its sequence number.
    pub framecode: Framecode<E>,
    /// Optional entry-level check, e.g. matrix shapes.
    pub validate: Option<Validate<E>>,
}

impl<E> fmt::Debug for SaveframeDef<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SaveframeDef")
            .field("label", &self.label)
            .field("categories", &self.categories)
            .finish_non_exhaustive()
    }
}

struct Layout<E> {
    marker: &'static str,
    marker_tag: String,
    categories: Vec<TagCategory<E>>,
}

/// Marker of the same family under another dictionary version.
#[derive(Debug)]
struct ForeignMarker {
    version: DictVersion,
    tag: String,
    value: &'static str,
}

enum Membership {
    Member,
    OtherVersion(DictVersion),
    Unrelated,
}

/// A record family resolved for one dictionary version.
///
/// Owns the per-family sequence counter. Blocks are supplied by the caller on
/// every call and are never retained.
pub struct Saveframe<E> {
    label: &'static str,
    version: DictVersion,
    layout: Option<Layout<E>>,
    foreign: Vec<ForeignMarker>,
    framecode: Framecode<E>,
    validate: Option<Validate<E>>,
    instance_count: u32,
}

impl<E> Saveframe<E> {
    /// Resolve a family definition for a dictionary version.
    ///
    /// A family without naming tables for `version` is still constructed;
    /// its `add` and `each` then report [`StarError::VersionMismatch`].
    ///
    /// # Errors
    ///
    /// Returns [`StarError::Dictionary`] when the definition and its naming
    /// tables are inconsistent.
    pub fn new(def: SaveframeDef<E>, version: DictVersion) -> Result<Self> {
        let SaveframeDef {
            label,
            categories,
            naming,
            framecode,
            validate,
        } = def;

        let marker_key = categories
            .first()
            .and_then(|c| {
                c.fields
                    .iter()
                    .find(|f| matches!(f.source, Source::Marker))
            })
            .map(|f| f.key)
            .ok_or_else(|| {
                StarError::Dictionary(format!("saveframe '{label}' declares no category marker"))
            })?;

        let foreign = DictVersion::ALL
            .into_iter()
            .filter(|v| *v != version)
            .filter_map(|other| {
                let names = naming(other)?;
                let first = names.categories.first()?;
                let tag = first.tag(marker_key)?;
                Some(ForeignMarker {
                    version: other,
                    tag: compose_tag(first.label, tag),
                    value: names.marker,
                })
            })
            .collect();

        let layout = match naming(version) {
            Some(names) => Some(resolve_layout(label, categories, &names, marker_key)?),
            None => None,
        };

        Ok(Saveframe {
            label,
            version,
            layout,
            foreign,
            framecode,
            validate,
            instance_count: 0,
        })
    }

    /// Family label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        self.label
    }

    /// The dictionary version this saveframe was resolved for.
    #[must_use]
    pub fn version(&self) -> DictVersion {
        self.version
    }

    /// Whether the family exists in this version.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.layout.is_some()
    }

    /// Category marker value, if the family exists in this version.
    #[must_use]
    pub fn marker(&self) -> Option<&'static str> {
        self.layout.as_ref().map(|l| l.marker)
    }

    /// Number of entries successfully added so far.
    #[must_use]
    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }

    /// The resolved tag categories written by this saveframe, in block order.
    #[must_use]
    pub fn categories(&self) -> &[TagCategory<E>] {
        self.layout.as_ref().map_or(&[], |l| l.categories.as_slice())
    }

    /// Whether a block carries this family's marker for the configured version.
    #[must_use]
    pub fn matches(&self, block: &Block) -> bool {
        matches!(self.membership(block), Membership::Member)
    }

    /// Validate an entry, build its tables and append them as one new block.
    ///
    /// Returns the sequence number assigned to the entry, which is also the
    /// value of every list ID cross-reference in the block. Nothing is
    /// appended and no sequence number is consumed when validation fails.
    ///
    /// # Errors
    ///
    /// - [`StarError::VersionMismatch`] when the family does not exist in this version
    /// - [`StarError::Validation`] wrapping the missing-field, length or
    ///   invalid-value error that rejected the entry
    pub fn add(&mut self, blocks: &mut Vec<Block>, entry: &E) -> Result<u32> {
        let layout = self.layout.as_ref().ok_or_else(|| self.unsupported())?;

        if let Some(validate) = self.validate {
            validate(entry).map_err(|e| e.into_validation(self.label))?;
        }

        let list_id = self.instance_count + 1;
        let framecode = (self.framecode)(entry, list_id);
        let ctx = BuildContext {
            marker: layout.marker,
            framecode: &framecode,
            list_id,
        };

        let mut block = Block::new(block_name(&framecode, self.label, list_id));
        for category in &layout.categories {
            let table = category
                .build(entry, &ctx)
                .map_err(|e| e.into_validation(self.label))?;
            block.tables.push(table);
        }

        let rows = block.tables.iter().map(Table::nrows).max().unwrap_or(0);
        blocks.push(block);
        self.instance_count = list_id;

        tracing::debug!(
            saveframe = self.label,
            version = %self.version,
            list_id,
            rows,
            "added saveframe"
        );
        Ok(list_id)
    }

    fn membership(&self, block: &Block) -> Membership {
        let Some(first) = block.tables.first() else {
            return Membership::Unrelated;
        };
        if let Some(layout) = &self.layout {
            if first.first_value(&layout.marker_tag) == Some(layout.marker) {
                return Membership::Member;
            }
        }
        self.foreign
            .iter()
            .find(|m| first.first_value(&m.tag) == Some(m.value))
            .map_or(Membership::Unrelated, |m| Membership::OtherVersion(m.version))
    }

    fn unsupported(&self) -> StarError {
        StarError::VersionMismatch {
            saveframe: self.label.to_string(),
            reason: format!("not defined by the NMR-STAR {} dictionary", self.version),
        }
    }

    fn structural(&self, reason: String) -> StarError {
        StarError::StructuralMismatch {
            saveframe: self.label.to_string(),
            reason,
        }
    }
}

impl<E: Default> Saveframe<E> {
    /// Lazily decode every block belonging to this family.
    ///
    /// Blocks of other families are skipped silently. A matching block that
    /// cannot be decoded yields an `Err` (and a warning) and the scan moves on
    /// to the next block. Each call starts a fresh scan.
    pub fn each<'a>(&'a self, blocks: &'a [Block]) -> Entries<'a, E> {
        Entries {
            saveframe: self,
            blocks: blocks.iter(),
            reported_unsupported: false,
        }
    }

    /// Classify one block and decode it if it belongs to this family.
    ///
    /// Returns `None` for blocks of other families. Blocks carrying this
    /// family's marker under another dictionary version yield
    /// [`StarError::VersionMismatch`]. Every error is logged before it is
    /// returned.
    pub fn read_block(&self, block: &Block) -> Option<Result<E>> {
        let result = match self.membership(block) {
            Membership::Unrelated => return None,
            Membership::Member => self.decode(block),
            Membership::OtherVersion(found) => Err(StarError::VersionMismatch {
                saveframe: self.label.to_string(),
                reason: format!(
                    "block '{}' uses the NMR-STAR {found} marker, configured for {}",
                    block.name, self.version
                ),
            }),
        };
        if let Err(err) = &result {
            tracing::warn!(
                saveframe = self.label,
                block = %block.name,
                error = %err,
                "skipping saveframe"
            );
        }
        Some(result)
    }

    /// Decode one block, which must belong to this family.
    ///
    /// # Errors
    ///
    /// - [`StarError::VersionMismatch`] when the family does not exist in this version
    /// - [`StarError::StructuralMismatch`] when the tables do not line up with the categories
    /// - any error from [`TagCategory::extract`]
    pub fn decode(&self, block: &Block) -> Result<E> {
        let layout = self.layout.as_ref().ok_or_else(|| self.unsupported())?;

        if block.tables.len() < layout.categories.len() {
            return Err(self.structural(format!(
                "block '{}' has {} tables, expected {}",
                block.name,
                block.tables.len(),
                layout.categories.len()
            )));
        }

        let mut entry = E::default();
        for (index, (category, table)) in layout.categories.iter().zip(&block.tables).enumerate() {
            if !table.is_rectangular() {
                return Err(self.structural(format!(
                    "table {index} of block '{}' has ragged columns",
                    block.name
                )));
            }
            if !category.owns_table(table) {
                return Err(self.structural(format!(
                    "table {index} of block '{}' does not hold {} tags",
                    block.name,
                    category.name()
                )));
            }
            category.extract(table, &mut entry)?;
        }
        Ok(entry)
    }
}

impl<E> fmt::Debug for Saveframe<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Saveframe")
            .field("label", &self.label)
            .field("version", &self.version)
            .field("marker", &self.marker())
            .field("instance_count", &self.instance_count)
            .finish_non_exhaustive()
    }
}

/// Lazy iterator over the entries of one family, created by [`Saveframe::each`].
pub struct Entries<'a, E> {
    saveframe: &'a Saveframe<E>,
    blocks: slice::Iter<'a, Block>,
    reported_unsupported: bool,
}

impl<E: Default> Iterator for Entries<'_, E> {
    type Item = Result<E>;

    fn next(&mut self) -> Option<Self::Item> {
        let saveframe = self.saveframe;
        if !saveframe.is_supported() {
            if self.reported_unsupported {
                return None;
            }
            self.reported_unsupported = true;
            return Some(Err(saveframe.unsupported()));
        }

        self.blocks.by_ref().find_map(|block| saveframe.read_block(block))
    }
}

impl<E> fmt::Debug for Entries<'_, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entries")
            .field("saveframe", &self.saveframe.label)
            .field("remaining", &self.blocks.len())
            .finish()
    }
}

fn resolve_layout<E>(
    label: &'static str,
    categories: Vec<CategorySpec<E>>,
    names: &SaveframeNaming,
    marker_key: &str,
) -> Result<Layout<E>> {
    if names.categories.len() != categories.len() {
        return Err(StarError::Dictionary(format!(
            "saveframe '{label}' declares {} categories but names {}",
            categories.len(),
            names.categories.len()
        )));
    }

    let mut resolved = Vec::with_capacity(categories.len());
    for (spec, naming) in categories.into_iter().zip(names.categories) {
        let category = TagCategory::new(spec, naming)?;
        // Categories with no tags in this version are neither written nor expected.
        if category.is_emitted() {
            resolved.push(category);
        }
    }

    let marker_tag = resolved
        .first()
        .and_then(|c| c.full_tag(marker_key))
        .map(str::to_string)
        .ok_or_else(|| {
            StarError::Dictionary(format!(
                "saveframe '{label}' does not write its category marker first"
            ))
        })?;

    Ok(Layout {
        marker: names.marker,
        marker_tag,
        categories: resolved,
    })
}

/// Save frame names cannot contain whitespace. A blank framecode would render
/// as the bare `save_` terminator, so it falls back to `<label>_<n>`.
fn block_name(framecode: &str, label: &str, list_id: u32) -> String {
    let name = framecode.split_whitespace().collect::<Vec<_>>().join("_");
    if name.is_empty() {
        format!("{label}_{list_id}")
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bind;
    use crate::field::FieldSpec;
    use crate::naming::CategoryNaming;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Sample {
        name: Option<String>,
        res_nums: Vec<Option<i64>>,
        values: Vec<Option<f64>>,
    }

    const V3_LIST: CategoryNaming = crate::naming!(Some("Sample_list"), [
        "SfCategory" => "Sf_category",
        "SfFramecode" => "Sf_framecode",
        "ID" => "ID",
        "Name" => "Name",
    ]);
    const V3_DATA: CategoryNaming = crate::naming!(Some("Sample"), [
        "ID" => "ID",
        "CompIndexID" => "Comp_index_ID",
        "Val" => "Val",
        "SampleListID" => "Sample_list_ID",
    ]);
    const V2_LIST: CategoryNaming = crate::naming!(None, [
        "SfCategory" => "Saveframe_category",
        "Name" => "Name",
    ]);
    const V2_DATA: CategoryNaming = crate::naming!(None, [
        "CompIndexID" => "Residue_seq_code",
        "Val" => "Sample_value",
    ]);

    fn naming(version: DictVersion) -> Option<SaveframeNaming> {
        Some(match version {
            DictVersion::V2_1 => SaveframeNaming {
                marker: "sample_data",
                categories: &[V2_LIST, V2_DATA],
            },
            DictVersion::V3_1 => SaveframeNaming {
                marker: "sample_data",
                categories: &[V3_LIST, V3_DATA],
            },
        })
    }

    fn definition() -> SaveframeDef<Sample> {
        SaveframeDef {
            label: "sample_data",
            categories: vec![
                CategorySpec::free(
                    "Sample_list",
                    vec![
                        FieldSpec::new("SfCategory", Source::Marker),
                        FieldSpec::new("SfFramecode", Source::Framecode),
                        FieldSpec::new("ID", Source::ListId).int(),
                        FieldSpec::attr("Name", bind!(Sample, name)),
                    ],
                ),
                CategorySpec::looped(
                    "Sample",
                    vec![
                        FieldSpec::new("ID", Source::RowIds).int(),
                        FieldSpec::attr("CompIndexID", bind!(Sample, res_nums))
                            .int()
                            .required(),
                        FieldSpec::attr("Val", bind!(Sample, values)).float(),
                        FieldSpec::new("SampleListID", Source::ListId).int(),
                    ],
                ),
            ],
            naming,
            framecode: |_, count| format!("sample data {count}"),
            validate: None,
        }
    }

    fn sample() -> Sample {
        Sample {
            name: Some("test".into()),
            res_nums: vec![Some(1), Some(2)],
            values: vec![Some(0.5), None],
        }
    }

    #[test]
    fn test_add_assigns_sequence_numbers() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        for expected in 1..=3 {
            assert_eq!(saveframe.add(&mut blocks, &sample()).unwrap(), expected);
        }
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[2].name, "sample_data_3");
        assert_eq!(
            blocks[1].tables[1].column("_Sample.Sample_list_ID").unwrap(),
            ["2", "2"]
        );
    }

    #[test]
    fn test_failed_add_leaves_blocks_untouched() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        let bad = Sample {
            values: vec![Some(1.0)],
            ..sample()
        };
        let err = saveframe.add(&mut blocks, &bad).unwrap_err();
        assert!(matches!(err, StarError::Validation { .. }));
        assert!(matches!(err.root(), StarError::LengthMismatch { .. }));
        assert!(blocks.is_empty());
        assert_eq!(saveframe.instance_count(), 0);

        assert_eq!(saveframe.add(&mut blocks, &sample()).unwrap(), 1);
    }

    #[test]
    fn test_blank_framecode_gets_numbered_block_name() {
        let def = SaveframeDef {
            framecode: |_, _| "  \t ".to_string(),
            ..definition()
        };
        let mut saveframe = Saveframe::new(def, DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        saveframe.add(&mut blocks, &sample()).unwrap();
        saveframe.add(&mut blocks, &sample()).unwrap();
        assert_eq!(blocks[0].name, "sample_data_1");
        assert_eq!(blocks[1].name, "sample_data_2");

        let document = crate::star::parse(&crate::star::render("t", &blocks)).unwrap();
        assert_eq!(document.blocks, blocks);
    }

    #[test]
    fn test_each_round_trip() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        saveframe.add(&mut blocks, &sample()).unwrap();

        let decoded: Vec<Sample> = saveframe.each(&blocks).collect::<Result<_>>().unwrap();
        assert_eq!(decoded, vec![sample()]);
        // A second scan starts over.
        assert_eq!(saveframe.each(&blocks).count(), 1);
    }

    #[test]
    fn test_each_reports_other_version() {
        let mut v2 = Saveframe::new(definition(), DictVersion::V2_1).unwrap();
        let mut blocks = Vec::new();
        v2.add(&mut blocks, &sample()).unwrap();

        let v3 = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let results: Vec<_> = v3.each(&blocks).collect();
        assert_eq!(results.len(), 1);
        assert!(matches!(results[0], Err(StarError::VersionMismatch { .. })));
    }

    #[test]
    fn test_each_structural_mismatch_continues() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        saveframe.add(&mut blocks, &sample()).unwrap();
        saveframe.add(&mut blocks, &sample()).unwrap();
        blocks[0].tables.truncate(1);

        let results: Vec<_> = saveframe.each(&blocks).collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(results[0], Err(StarError::StructuralMismatch { .. })));
        assert!(results[1].is_ok());
    }

    #[test]
    fn test_unsupported_version() {
        fn only_v3(version: DictVersion) -> Option<SaveframeNaming> {
            match version {
                DictVersion::V3_1 => naming(version),
                DictVersion::V2_1 => None,
            }
        }
        let def = SaveframeDef {
            naming: only_v3,
            ..definition()
        };
        let mut saveframe = Saveframe::new(def, DictVersion::V2_1).unwrap();
        assert!(!saveframe.is_supported());

        let mut blocks = Vec::new();
        let err = saveframe.add(&mut blocks, &sample()).unwrap_err();
        assert!(matches!(err, StarError::VersionMismatch { .. }));

        let results: Vec<_> = saveframe.each(&blocks).collect();
        assert_eq!(results.len(), 1);
        assert!(results[0].is_err());
    }
}
