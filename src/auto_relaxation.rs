//! Auto relaxation saveframes: R1 or R2 rates with optional Rex terms.
//!
//! Only the 3.1 dictionary defines this family. The relaxation type given by
//! the caller (`R1` or `R2`) is written as the common type name, and the
//! coherence type is derived from it (`Iz` for R1, `I+` for R2).

use crate::bind;
use crate::category::CategorySpec;
use crate::field::{FieldSpec, Source};
use crate::naming::{CategoryNaming, SaveframeNaming};
use crate::saveframe::SaveframeDef;
use crate::value::{Bound, Value};
use crate::version::DictVersion;

/// Legal relaxation type names.
pub const DATA_TYPES: &[&str] = &["R1", "R2"];

/// One auto relaxation data set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AutoRelaxEntry {
    /// `R1` or `R2`.
    pub data_type: Option<String>,
    /// Sample conditions list ID.
    pub sample_cond_list_id: Option<i64>,
    /// Defaults to `$conditions_1`.
    pub sample_cond_list_label: Option<String>,
    /// Temperature calibration method.
    pub temp_calibration: Option<String>,
    /// Temperature control method.
    pub temp_control: Option<String>,
    /// Proton spectrometer frequency in MHz.
    pub frq: Option<f64>,
    /// Defaults to `s-1`.
    pub units: Option<String>,
    /// Written as `Relaxation_val_type`.
    pub peak_intensity_type: Option<String>,
    /// Free text details.
    pub details: Option<String>,
    /// Defaults to `$sample_1`.
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
    /// Relaxation rates.
    pub data: Vec<Option<f64>>,
    /// Errors of `data`.
    pub errors: Vec<Option<f64>>,
    /// Chemical exchange contributions.
    pub rex: Vec<Option<f64>>,
    /// Errors of `rex`.
    pub rex_errors: Vec<Option<f64>>,
}

fn coherence(entry: &AutoRelaxEntry) -> Bound {
    match entry.data_type.as_deref() {
        Some("R1") => Bound::Scalar(Value::from("Iz")),
        Some("R2") => Bound::Scalar(Value::from("I+")),
        _ => Bound::Absent,
    }
}

/// The auto relaxation saveframe definition.
#[must_use]
pub fn definition() -> SaveframeDef<AutoRelaxEntry> {
    SaveframeDef {
        label: "auto_relaxation",
        categories: vec![
            CategorySpec::free(
                "Auto_relaxation_list",
                vec![
                    FieldSpec::new("SfCategory", Source::Marker),
                    FieldSpec::new("SfFramecode", Source::Framecode),
                    FieldSpec::new("ListID", Source::ListId).int(),
                    FieldSpec::attr("TempCalibrationMethod", bind!(AutoRelaxEntry, temp_calibration))
                        .required(),
                    FieldSpec::attr("TempControlMethod", bind!(AutoRelaxEntry, temp_control))
                        .required(),
                    FieldSpec::attr("SampleConditionListID", bind!(AutoRelaxEntry, sample_cond_list_id))
                        .int(),
                    FieldSpec::attr(
                        "SampleConditionListLabel",
                        bind!(AutoRelaxEntry, sample_cond_list_label),
                    )
                    .default("$conditions_1"),
                    FieldSpec::attr("SpectrometerFrequency1H", bind!(AutoRelaxEntry, frq)).float(),
                    FieldSpec::computed("RelaxationCoherenceType", coherence),
                    FieldSpec::attr("CommonRelaxationTypeName", bind!(AutoRelaxEntry, data_type))
                        .required()
                        .allowed(DATA_TYPES),
                    FieldSpec::attr("RelaxationValUnits", bind!(AutoRelaxEntry, units)).default("s-1"),
                    FieldSpec::attr("RelaxationValType", bind!(AutoRelaxEntry, peak_intensity_type))
                        .required(),
                    FieldSpec::attr("Details", bind!(AutoRelaxEntry, details)),
                ],
            ),
            CategorySpec::looped(
                "Auto_relaxation_experiment",
                vec![
                    FieldSpec::attr("SampleLabel", bind!(AutoRelaxEntry, sample_label))
                        .default("$sample_1"),
                    FieldSpec::new("ListID", Source::ListId).int(),
                ],
            ),
            CategorySpec::looped(
                "Auto_relaxation",
                vec![
                    FieldSpec::new("RxID", Source::RowIds).int(),
                    FieldSpec::attr("AssemblyAtomID", bind!(AutoRelaxEntry, assembly_atom_ids)).int(),
                    FieldSpec::attr("EntityAssemblyID", bind!(AutoRelaxEntry, entity_assembly_ids))
                        .int(),
                    FieldSpec::attr("EntityID", bind!(AutoRelaxEntry, entity_ids)).int().required(),
                    FieldSpec::attr("CompIndexID", bind!(AutoRelaxEntry, res_nums)).int().required(),
                    FieldSpec::attr("SeqID", bind!(AutoRelaxEntry, seq_ids)).int(),
                    FieldSpec::attr("CompID", bind!(AutoRelaxEntry, res_names)).required(),
                    FieldSpec::attr("AtomID", bind!(AutoRelaxEntry, atom_names)).required(),
                    FieldSpec::attr("AtomType", bind!(AutoRelaxEntry, atom_types)),
                    FieldSpec::attr("AtomIsotopeNumber", bind!(AutoRelaxEntry, isotopes)).int(),
                    FieldSpec::attr("Val", bind!(AutoRelaxEntry, data)).float().required(),
                    FieldSpec::attr("ValErr", bind!(AutoRelaxEntry, errors)).float(),
                    FieldSpec::attr("RexVal", bind!(AutoRelaxEntry, rex)).float(),
                    FieldSpec::attr("RexErr", bind!(AutoRelaxEntry, rex_errors)).float(),
                    FieldSpec::new("ListID", Source::ListId).int(),
                ],
            ),
        ],
        naming,
        framecode: |_, count| format!("auto relaxation {count}"),
        validate: None,
    }
}

const LIST: CategoryNaming = crate::naming!(Some("Auto_relaxation_list"), [
    "SfCategory" => "Sf_category",
    "SfFramecode" => "Sf_framecode",
    "ListID" => "ID",
    "TempCalibrationMethod" => "Temp_calibration_method",
    "TempControlMethod" => "Temp_control_method",
    "SampleConditionListID" => "Sample_condition_list_ID",
    "SampleConditionListLabel" => "Sample_condition_list_label",
    "SpectrometerFrequency1H" => "Spectrometer_frequency_1H",
    "RelaxationCoherenceType" => "Relaxation_coherence_type",
    "CommonRelaxationTypeName" => "Common_relaxation_type_name",
    "RelaxationValUnits" => "Relaxation_val_units",
    "RelaxationValType" => "Relaxation_val_type",
    "Details" => "Details",
]);

const EXPERIMENT: CategoryNaming = crate::naming!(Some("Auto_relaxation_experiment"), [
    "SampleLabel" => "Sample_label",
    "ListID" => "Auto_relaxation_list_ID",
]);

const DATA: CategoryNaming = crate::naming!(Some("Auto_relaxation"), [
    "RxID" => "ID",
    "AssemblyAtomID" => "Assembly_atom_ID",
    "EntityAssemblyID" => "Entity_assembly_ID",
    "EntityID" => "Entity_ID",
    "CompIndexID" => "Comp_index_ID",
    "SeqID" => "Seq_ID",
    "CompID" => "Comp_ID",
    "AtomID" => "Atom_ID",
    "AtomType" => "Atom_type",
    "AtomIsotopeNumber" => "Atom_isotope_number",
    "Val" => "Auto_relaxation_val",
    "ValErr" => "Auto_relaxation_val_err",
    "RexVal" => "Rex_val",
    "RexErr" => "Rex_err",
    "ListID" => "Auto_relaxation_list_ID",
]);

fn naming(version: DictVersion) -> Option<SaveframeNaming> {
    match version {
        DictVersion::V2_1 => None,
        DictVersion::V3_1 => Some(SaveframeNaming {
            marker: "auto_relaxation",
            categories: &[LIST, EXPERIMENT, DATA],
        }),
    }
}
