//! Entity saveframes: one molecule of the assembly and its residue index.

use crate::bind;
use crate::category::CategorySpec;
use crate::field::{FieldSpec, Source};
use crate::naming::{CategoryNaming, SaveframeNaming};
use crate::saveframe::SaveframeDef;
use crate::version::DictVersion;

/// Legal polymer types.
pub const POLYMER_TYPES: &[&str] = &[
    "DNA/RNA hybrid",
    "polydeoxyribonucleotide",
    "polypeptide(D)",
    "polypeptide(L)",
    "polyribonucleotide",
    "polysaccharide(D)",
    "polysaccharide(L)",
];

/// One molecular entity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityEntry {
    /// Molecule name, also used as the saveframe name.
    pub mol_name: Option<String>,
    /// Molecule type, e.g. `polymer`.
    pub mol_type: Option<String>,
    /// One of [`POLYMER_TYPES`].
    pub polymer_type: Option<String>,
    /// One letter sequence.
    pub polymer_seq_code: Option<String>,
    /// Thiol state, e.g. `all free`.
    pub thiol_state: Option<String>,
    /// Residue numbers.
    pub res_nums: Vec<Option<i64>>,
    /// Residue names.
    pub res_names: Vec<Option<String>>,
}

fn framecode(entry: &EntityEntry, count: u32) -> String {
    entry
        .mol_name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .map_or_else(|| format!("entity {count}"), str::to_string)
}

/// The entity saveframe definition.
#[must_use]
pub fn definition() -> SaveframeDef<EntityEntry> {
    SaveframeDef {
        label: "entity",
        categories: vec![
            CategorySpec::free(
                "Entity",
                vec![
                    FieldSpec::new("SfCategory", Source::Marker),
                    FieldSpec::new("SfFramecode", Source::Framecode),
                    FieldSpec::new("EntityID", Source::ListId).int(),
                    FieldSpec::attr("Name", bind!(EntityEntry, mol_name)),
                    FieldSpec::attr("Type", bind!(EntityEntry, mol_type)),
                    FieldSpec::attr("PolymerType", bind!(EntityEntry, polymer_type)).allowed(POLYMER_TYPES),
                    FieldSpec::attr("PolymerSeqOneLetterCode", bind!(EntityEntry, polymer_seq_code)),
                    FieldSpec::attr("ThiolState", bind!(EntityEntry, thiol_state)),
                ],
            ),
            CategorySpec::looped(
                "Entity_comp_index",
                vec![
                    FieldSpec::attr("EntityCompIndexID", bind!(EntityEntry, res_nums)).int(),
                    FieldSpec::attr("CompID", bind!(EntityEntry, res_names)),
                    FieldSpec::new("EntityID", Source::ListId).int(),
                ],
            ),
        ],
        naming,
        framecode,
        validate: None,
    }
}

const ENTITY_V2_1: CategoryNaming = crate::naming!(None, [
    "SfCategory" => "Saveframe_category",
    "Name" => "Mol_system_component_name",
    "Type" => "Mol_type",
    "PolymerType" => "Mol_polymer_class",
    "PolymerSeqOneLetterCode" => "Mol_residue_sequence",
    "ThiolState" => "Mol_thiol_state",
]);

const ENTITY_V3_1: CategoryNaming = crate::naming!(Some("Entity"), [
    "SfCategory" => "Sf_category",
    "SfFramecode" => "Sf_framecode",
    "EntityID" => "ID",
    "Name" => "Name",
    "Type" => "Type",
    "PolymerType" => "Polymer_type",
    "PolymerSeqOneLetterCode" => "Polymer_seq_one_letter_code",
    "ThiolState" => "Thiol_state",
]);

const COMP_INDEX_V2_1: CategoryNaming = crate::naming!(None, [
    "EntityCompIndexID" => "Residue_seq_code",
    "CompID" => "Residue_label",
]);

const COMP_INDEX_V3_1: CategoryNaming = crate::naming!(Some("Entity_comp_index"), [
    "EntityCompIndexID" => "ID",
    "CompID" => "Comp_ID",
    "EntityID" => "Entity_ID",
]);

fn naming(version: DictVersion) -> Option<SaveframeNaming> {
    Some(match version {
        DictVersion::V2_1 => SaveframeNaming {
            marker: "monomeric_polymer",
            categories: &[ENTITY_V2_1, COMP_INDEX_V2_1],
        },
        DictVersion::V3_1 => SaveframeNaming {
            marker: "entity",
            categories: &[ENTITY_V3_1, COMP_INDEX_V3_1],
        },
    })
}
