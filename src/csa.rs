//! Chemical shift anisotropy saveframes.
//!
//! One saveframe holds the CSA values of one data set, in ppm by default.

use crate::bind;
use crate::category::CategorySpec;
use crate::field::{FieldSpec, Source};
use crate::naming::{CategoryNaming, SaveframeNaming};
use crate::saveframe::SaveframeDef;
use crate::version::DictVersion;

/// One chemical shift anisotropy data set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CsaEntry {
    /// Name of the deposited data file.
    pub data_file_name: Option<String>,
    /// Sample conditions label, defaults to `$conditions_1`.
    pub sample_cond_list_label: Option<String>,
    /// Value units, defaults to `ppm`.
    pub units: Option<String>,
    /// Sample label, defaults to `$sample_1`.
    pub sample_label: Option<String>,

    /// Assembly atom IDs.
    pub assembly_atom_ids: Vec<Option<i64>>,
    /// Entity assembly IDs.
    pub entity_assembly_ids: Vec<Option<i64>>,
    /// Entity IDs.
    pub entity_ids: Vec<Option<i64>>,
    /// Residue numbers.
    pub res_nums: Vec<Option<i64>>,
    /// Author sequence IDs.
    pub seq_ids: Vec<Option<i64>>,
    /// Residue names.
    pub res_names: Vec<Option<String>>,
    /// Atom names.
    pub atom_names: Vec<Option<String>>,
    /// Element symbols.
    pub atom_types: Vec<Option<String>>,
    /// Isotope mass numbers.
    pub isotopes: Vec<Option<i64>>,
    /// CSA values.
    pub csa: Vec<Option<f64>>,
    /// Errors of `csa`.
    pub csa_errors: Vec<Option<f64>>,
}

/// The chemical shift anisotropy saveframe definition.
#[must_use]
pub fn definition() -> SaveframeDef<CsaEntry> {
    SaveframeDef {
        label: "chem_shift_anisotropy",
        categories: vec![
            CategorySpec::free(
                "Chem_shift_anisotropy",
                vec![
                    FieldSpec::new("SfCategory", Source::Marker),
                    FieldSpec::new("SfFramecode", Source::Framecode),
                    FieldSpec::new("ChemShiftAnisotropyID", Source::ListId).int(),
                    FieldSpec::attr("DataFileName", bind!(CsaEntry, data_file_name)),
                    FieldSpec::attr("SampleConditionListLabel", bind!(CsaEntry, sample_cond_list_label))
                        .default("$conditions_1"),
                    FieldSpec::attr("ValUnits", bind!(CsaEntry, units)).default("ppm"),
                ],
            ),
            CategorySpec::looped(
                "CS_anisotropy_experiment",
                vec![FieldSpec::attr("SampleLabel", bind!(CsaEntry, sample_label)).default("$sample_1")],
            ),
            CategorySpec::looped(
                "CS_anisotropy",
                vec![
                    FieldSpec::new("CSAnisotropyID", Source::RowIds).int(),
                    FieldSpec::attr("AssemblyAtomID", bind!(CsaEntry, assembly_atom_ids)).int(),
                    FieldSpec::attr("EntityAssemblyID", bind!(CsaEntry, entity_assembly_ids)).int(),
                    FieldSpec::attr("EntityID", bind!(CsaEntry, entity_ids)).int().required(),
                    FieldSpec::attr("CompIndexID", bind!(CsaEntry, res_nums)).int().required(),
                    FieldSpec::attr("SeqID", bind!(CsaEntry, seq_ids)).int(),
                    FieldSpec::attr("CompID", bind!(CsaEntry, res_names)).required(),
                    FieldSpec::attr("AtomID", bind!(CsaEntry, atom_names)).required(),
                    FieldSpec::attr("AtomType", bind!(CsaEntry, atom_types)),
                    FieldSpec::attr("AtomIsotopeNumber", bind!(CsaEntry, isotopes)).int(),
                    FieldSpec::attr("Val", bind!(CsaEntry, csa)).float().required(),
                    FieldSpec::attr("ValErr", bind!(CsaEntry, csa_errors)).float(),
                    FieldSpec::new("ChemShiftAnisotropyID", Source::ListId).int(),
                ],
            ),
        ],
        naming,
        framecode: |_, count| format!("chem shift anisotropy {count}"),
        validate: None,
    }
}

const LIST_V2_1: CategoryNaming = crate::naming!(None, [
    "SfCategory" => "Saveframe_category",
    "DataFileName" => "Data_file_name",
    "SampleConditionListLabel" => "Sample_conditions_label",
    "ValUnits" => "Val_units",
]);

const LIST_V3_1: CategoryNaming = crate::naming!(Some("Chem_shift_anisotropy"), [
    "SfCategory" => "Sf_category",
    "SfFramecode" => "Sf_framecode",
    "ChemShiftAnisotropyID" => "ID",
    "DataFileName" => "Data_file_name",
    "SampleConditionListLabel" => "Sample_condition_list_label",
    "ValUnits" => "Val_units",
]);

const EXPERIMENT_V2_1: CategoryNaming = crate::naming!(None, [
    "SampleLabel" => "Sample_label",
]);

const EXPERIMENT_V3_1: CategoryNaming = crate::naming!(Some("CS_anisotropy_experiment"), [
    "SampleLabel" => "Sample_label",
]);

const DATA_V2_1: CategoryNaming = crate::naming!(None, [
    "AssemblyAtomID" => "Assembly_atom_ID",
    "EntityAssemblyID" => "Entity_assembly_ID",
    "EntityID" => "Entity_ID",
    "CompIndexID" => "Residue_seq_code",
    "SeqID" => "Seq_ID",
    "CompID" => "Residue_label",
    "AtomID" => "Atom_name",
    "AtomType" => "Atom_type",
    "AtomIsotopeNumber" => "Atom_isotope_number",
    "Val" => "value",
    "ValErr" => "value_error",
    "ChemShiftAnisotropyID" => "Chem_shift_anisotropy_ID",
]);

const DATA_V3_1: CategoryNaming = crate::naming!(Some("CS_anisotropy"), [
    "CSAnisotropyID" => "ID",
    "AssemblyAtomID" => "Assembly_atom_ID",
    "EntityAssemblyID" => "Entity_assembly_ID",
    "EntityID" => "Entity_ID",
    "CompIndexID" => "Comp_index_ID",
    "SeqID" => "Seq_ID",
    "CompID" => "Comp_ID",
    "AtomID" => "Atom_ID",
    "AtomType" => "Atom_type",
    "AtomIsotopeNumber" => "Atom_isotope_number",
    "Val" => "Val",
    "ValErr" => "Val_err",
    "ChemShiftAnisotropyID" => "Chem_shift_anisotropy_ID",
]);

fn naming(version: DictVersion) -> Option<SaveframeNaming> {
    let categories: &'static [CategoryNaming] = match version {
        DictVersion::V2_1 => &[LIST_V2_1, EXPERIMENT_V2_1, DATA_V2_1],
        DictVersion::V3_1 => &[LIST_V3_1, EXPERIMENT_V3_1, DATA_V3_1],
    };
    Some(SaveframeNaming {
        marker: "chem_shift_anisotropy",
        categories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saveframe::Saveframe;

    fn entry() -> CsaEntry {
        CsaEntry {
            entity_ids: vec![Some(1), Some(1), Some(1)],
            res_nums: vec![Some(3), Some(4), Some(6)],
            res_names: vec![Some("VAL".into()), Some("THR".into()), Some("GLU".into())],
            atom_names: vec![Some("N".into()); 3],
            isotopes: vec![Some(15); 3],
            csa: vec![Some(-172.0), Some(-165.5), Some(-160.2)],
            ..CsaEntry::default()
        }
    }

    #[test]
    fn test_versions_share_values_not_tags() {
        let mut decoded = Vec::new();
        for version in DictVersion::ALL {
            let mut saveframe = Saveframe::new(definition(), version).unwrap();
            let mut blocks = Vec::new();
            saveframe.add(&mut blocks, &entry()).unwrap();
            decoded.push(saveframe.each(&blocks).next().unwrap().unwrap());

            let data = &blocks[0].tables[2];
            let val_tag = match version {
                DictVersion::V2_1 => "_value",
                DictVersion::V3_1 => "_CS_anisotropy.Val",
            };
            assert_eq!(data.column(val_tag).unwrap(), ["-172.0", "-165.5", "-160.2"]);
        }
        assert_eq!(decoded[0], decoded[1]);
        assert_eq!(decoded[0].units.as_deref(), Some("ppm"));
    }

    #[test]
    fn test_cross_reference_follows_instance() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        saveframe.add(&mut blocks, &entry()).unwrap();
        saveframe.add(&mut blocks, &entry()).unwrap();

        let second = &blocks[1];
        assert_eq!(second.name, "chem_shift_anisotropy_2");
        assert_eq!(second.tables[0].first_value("_Chem_shift_anisotropy.ID"), Some("2"));
        assert_eq!(
            second.tables[2].column("_CS_anisotropy.Chem_shift_anisotropy_ID").unwrap(),
            ["2", "2", "2"]
        );
        assert_eq!(second.tables[2].column("_CS_anisotropy.ID").unwrap(), ["1", "2", "3"]);
    }
}
