//! Model-free analysis results (order parameters).
//!
//! A saveframe holds one set of per-spin model-free parameters: the order
//! parameters S2, S2f and S2s, the internal correlation times te, tf and ts,
//! the local tau_c, chemical exchange Rex, the chi-squared value and the
//! selected model. The 2.1 dictionary has no local tau_c or Rex tags and
//! calls the saveframe `model_free`; 3.1 calls it `order_parameters`.

use crate::bind;
use crate::category::CategorySpec;
use crate::error::{Result, StarError};
use crate::field::{FieldSpec, Source};
use crate::naming::{CategoryNaming, SaveframeNaming};
use crate::saveframe::SaveframeDef;
use crate::version::DictVersion;

/// Model-free models accepted in `model_fit`.
///
/// Lipari-Szabo and extended models, optionally with Rex, and the same set
/// prefixed with a local `tm`. The empty string marks an unfitted spin.
pub const MODELS: &[&str] = &[
    "",
    "Rex",
    "S2",
    "S2, te",
    "S2, Rex",
    "S2, te, Rex",
    "S2f, S2, ts",
    "S2f, S2s, ts",
    "S2f, tf, S2, ts",
    "S2f, tf, S2s, ts",
    "S2f, S2, ts, Rex",
    "S2f, S2s, ts, Rex",
    "S2f, tf, S2, ts, Rex",
    "S2f, tf, S2s, ts, Rex",
    "tm",
    "tm, Rex",
    "tm, S2",
    "tm, S2, te",
    "tm, S2, Rex",
    "tm, S2, te, Rex",
    "tm, S2f, S2, ts",
    "tm, S2f, S2s, ts",
    "tm, S2f, tf, S2, ts",
    "tm, S2f, tf, S2s, ts",
    "tm, S2f, S2, ts, Rex",
    "tm, S2f, S2s, ts, Rex",
    "tm, S2f, tf, S2, ts, Rex",
    "tm, S2f, tf, S2s, ts, Rex",
];

/// One set of model-free results.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelFreeEntry {
    /// Sample conditions list ID.
    pub sample_cond_list_id: Option<i64>,
    /// Sample conditions label, defaults to `$conditions_1`.
    pub sample_cond_list_label: Option<String>,
    /// Units of te, defaults to `s`.
    pub te_units: Option<String>,
    /// Units of tf, defaults to `s`.
    pub tf_units: Option<String>,
    /// Units of ts, defaults to `s`.
    pub ts_units: Option<String>,
    /// Global chi-squared of the fit.
    pub global_chi2: Option<f64>,
    /// Proton frequency (MHz) that the Rex values refer to. Required when
    /// any Rex value is given.
    pub rex_frq: Option<f64>,
    /// Free text details.
    pub details: Option<String>,
    /// Sample label, defaults to `$sample_1`.
    pub sample_label: Option<String>,

    /// IDs of the software saveframes used.
    pub software_ids: Vec<Option<i64>>,
    /// Labels of the software saveframes used.
    pub software_labels: Vec<Option<String>>,

    /// Assembly atom IDs.
    pub assembly_atom_ids: Vec<Option<i64>>,
    /// Entity assembly IDs.
    pub entity_assembly_ids: Vec<Option<i64>>,
    /// Entity IDs.
    pub entity_ids: Vec<Option<i64>>,
    /// Residue numbers.
    pub res_nums: Vec<Option<i64>>,
    /// Residue names.
    pub res_names: Vec<Option<String>>,
    /// Observed atom names.
    pub atom_names: Vec<Option<String>>,
    /// Element symbols.
    pub atom_types: Vec<Option<String>>,
    /// Isotope mass numbers.
    pub isotopes: Vec<Option<i64>>,

    /// Overall order parameters.
    pub s2: Vec<Option<f64>>,
    /// Errors of `s2`.
    pub s2_err: Vec<Option<f64>>,
    /// Fast motion order parameters.
    pub s2f: Vec<Option<f64>>,
    /// Errors of `s2f`.
    pub s2f_err: Vec<Option<f64>>,
    /// Slow motion order parameters.
    pub s2s: Vec<Option<f64>>,
    /// Errors of `s2s`.
    pub s2s_err: Vec<Option<f64>>,
    /// Local rotational correlation time (3.1 only).
    pub local_tc: Vec<Option<f64>>,
    /// Errors of `local_tc`.
    pub local_tc_err: Vec<Option<f64>>,
    /// Effective internal correlation times.
    pub te: Vec<Option<f64>>,
    /// Errors of `te`.
    pub te_err: Vec<Option<f64>>,
    /// Fast internal correlation times.
    pub tf: Vec<Option<f64>>,
    /// Errors of `tf`.
    pub tf_err: Vec<Option<f64>>,
    /// Slow internal correlation times.
    pub ts: Vec<Option<f64>>,
    /// Errors of `ts`.
    pub ts_err: Vec<Option<f64>>,
    /// Chemical exchange (3.1 only).
    pub rex: Vec<Option<f64>>,
    /// Errors of `rex`.
    pub rex_err: Vec<Option<f64>>,
    /// Per-spin chi-squared.
    pub chi2: Vec<Option<f64>>,
    /// Selected model, one of [`MODELS`].
    pub model_fit: Vec<Option<String>>,
}

fn check_rex_frq(entry: &ModelFreeEntry) -> Result<()> {
    if entry.rex.iter().any(Option::is_some) && entry.rex_frq.is_none() {
        return Err(StarError::MissingField {
            category: "Model_free_list".to_string(),
            field: "rex_frq".to_string(),
        });
    }
    Ok(())
}

/// The model-free saveframe definition.
#[must_use]
pub fn definition() -> SaveframeDef<ModelFreeEntry> {
    SaveframeDef {
        label: "model_free",
        categories: vec![
            CategorySpec::free(
                "Model_free_list",
                vec![
                    FieldSpec::new("SfCategory", Source::Marker),
                    FieldSpec::new("SfFramecode", Source::Framecode),
                    FieldSpec::new("ModelFreeListID", Source::ListId).int(),
                    FieldSpec::attr("SampleConditionListID", bind!(ModelFreeEntry, sample_cond_list_id))
                        .int(),
                    FieldSpec::attr(
                        "SampleConditionListLabel",
                        bind!(ModelFreeEntry, sample_cond_list_label),
                    )
                    .default("$conditions_1"),
                    FieldSpec::attr("TaueValUnits", bind!(ModelFreeEntry, te_units)).default("s"),
                    FieldSpec::attr("TaufValUnits", bind!(ModelFreeEntry, tf_units)).default("s"),
                    FieldSpec::attr("TausValUnits", bind!(ModelFreeEntry, ts_units)).default("s"),
                    FieldSpec::attr("GlobalChiSquaredFitVal", bind!(ModelFreeEntry, global_chi2)).float(),
                    FieldSpec::attr("RexFieldStrength", bind!(ModelFreeEntry, rex_frq)).float(),
                    FieldSpec::attr("Details", bind!(ModelFreeEntry, details)),
                ],
            ),
            CategorySpec::looped(
                "Model_free_experiment",
                vec![
                    FieldSpec::attr("SampleLabel", bind!(ModelFreeEntry, sample_label))
                        .default("$sample_1"),
                ],
            ),
            CategorySpec::looped(
                "Model_free_software",
                vec![
                    FieldSpec::attr("SoftwareID", bind!(ModelFreeEntry, software_ids)).int(),
                    FieldSpec::attr("SoftwareLabel", bind!(ModelFreeEntry, software_labels)),
                    FieldSpec::new("ModelFreeListID", Source::ListId).int(),
                ],
            ),
            CategorySpec::looped(
                "Model_free",
                vec![
                    FieldSpec::new("ModelFreeID", Source::RowIds).int(),
                    FieldSpec::attr("AssemblyAtomID", bind!(ModelFreeEntry, assembly_atom_ids)).int(),
                    FieldSpec::attr("EntityAssemblyID", bind!(ModelFreeEntry, entity_assembly_ids))
                        .int(),
                    FieldSpec::attr("EntityID", bind!(ModelFreeEntry, entity_ids)).int(),
                    FieldSpec::attr("CompIndexID", bind!(ModelFreeEntry, res_nums)).int().required(),
                    FieldSpec::attr("CompID", bind!(ModelFreeEntry, res_names)).required(),
                    FieldSpec::attr("AtomID", bind!(ModelFreeEntry, atom_names)).required(),
                    FieldSpec::attr("AtomType", bind!(ModelFreeEntry, atom_types)),
                    FieldSpec::attr("AtomIsotopeNumber", bind!(ModelFreeEntry, isotopes)).int(),
                    FieldSpec::attr("S2Val", bind!(ModelFreeEntry, s2)).float(),
                    FieldSpec::attr("S2ValErr", bind!(ModelFreeEntry, s2_err)).float(),
                    FieldSpec::attr("S2fVal", bind!(ModelFreeEntry, s2f)).float(),
                    FieldSpec::attr("S2fValErr", bind!(ModelFreeEntry, s2f_err)).float(),
                    FieldSpec::attr("S2sVal", bind!(ModelFreeEntry, s2s)).float(),
                    FieldSpec::attr("S2sValErr", bind!(ModelFreeEntry, s2s_err)).float(),
                    FieldSpec::attr("LocalTauCVal", bind!(ModelFreeEntry, local_tc)).float(),
                    FieldSpec::attr("LocalTauCValErr", bind!(ModelFreeEntry, local_tc_err)).float(),
                    FieldSpec::attr("TauEVal", bind!(ModelFreeEntry, te)).float(),
                    FieldSpec::attr("TauEValErr", bind!(ModelFreeEntry, te_err)).float(),
                    FieldSpec::attr("TauFVal", bind!(ModelFreeEntry, tf)).float(),
                    FieldSpec::attr("TauFValErr", bind!(ModelFreeEntry, tf_err)).float(),
                    FieldSpec::attr("TauSVal", bind!(ModelFreeEntry, ts)).float(),
                    FieldSpec::attr("TauSValErr", bind!(ModelFreeEntry, ts_err)).float(),
                    FieldSpec::attr("RexVal", bind!(ModelFreeEntry, rex)).float(),
                    FieldSpec::attr("RexValErr", bind!(ModelFreeEntry, rex_err)).float(),
                    FieldSpec::attr("ChiSquaredVal", bind!(ModelFreeEntry, chi2)).float(),
                    FieldSpec::attr("ModelFit", bind!(ModelFreeEntry, model_fit)).allowed(MODELS),
                    FieldSpec::new("ModelFreeListID", Source::ListId).int(),
                ],
            ),
        ],
        naming,
        framecode: |_, count| format!("model free {count}"),
        validate: Some(check_rex_frq),
    }
}

const LIST_V2_1: CategoryNaming = crate::naming!(None, [
    "SfCategory" => "Saveframe_category",
    "SampleConditionListID" => "Sample_condition_list_ID",
    "SampleConditionListLabel" => "Sample_conditions_label",
    "TaueValUnits" => "Tau_e_val_units",
    "TaufValUnits" => "Tau_f_val_units",
    "TausValUnits" => "Tau_s_val_units",
    "GlobalChiSquaredFitVal" => "Global_chi_squared_fit_val",
    "Details" => "Details",
]);

const LIST_V3_1: CategoryNaming = crate::naming!(Some("Model_free_list"), [
    "SfCategory" => "Sf_category",
    "SfFramecode" => "Sf_framecode",
    "ModelFreeListID" => "ID",
    "SampleConditionListID" => "Sample_condition_list_ID",
    "SampleConditionListLabel" => "Sample_condition_list_label",
    "TaueValUnits" => "Tau_e_val_units",
    "TaufValUnits" => "Tau_f_val_units",
    "TausValUnits" => "Tau_s_val_units",
    "GlobalChiSquaredFitVal" => "Global_chi_squared_fit_val",
    "RexFieldStrength" => "Rex_field_strength",
    "Details" => "Details",
]);

const EXPERIMENT_V2_1: CategoryNaming = crate::naming!(None, [
    "SampleLabel" => "Sample_label",
]);

const EXPERIMENT_V3_1: CategoryNaming = crate::naming!(Some("Model_free_experiment"), [
    "SampleLabel" => "Sample_label",
]);

const SOFTWARE_V2_1: CategoryNaming = crate::naming!(None, [
    "SoftwareID" => "Software_ID",
    "SoftwareLabel" => "Software_label",
    "ModelFreeListID" => "Model_free_list_ID",
]);

const SOFTWARE_V3_1: CategoryNaming = crate::naming!(Some("Model_free_software"), [
    "SoftwareID" => "Software_ID",
    "SoftwareLabel" => "Software_label",
    "ModelFreeListID" => "Model_free_list_ID",
]);

const DATA_V2_1: CategoryNaming = crate::naming!(None, [
    "AssemblyAtomID" => "Assembly_atom_ID",
    "EntityAssemblyID" => "Entity_assembly_ID",
    "EntityID" => "Entity_ID",
    "CompIndexID" => "Residue_seq_code",
    "CompID" => "Residue_label",
    "AtomID" => "Atom_name",
    "AtomType" => "Atom_type",
    "AtomIsotopeNumber" => "Atom_isotope_number",
    "S2Val" => "S2_value",
    "S2ValErr" => "S2_value_fit_error",
    "S2fVal" => "S2f_value",
    "S2fValErr" => "S2f_value_fit_error",
    "S2sVal" => "S2s_value",
    "S2sValErr" => "S2s_value_fit_error",
    "TauEVal" => "Tau_e_value",
    "TauEValErr" => "Tau_e_value_fit_error",
    "TauFVal" => "Tau_f_value",
    "TauFValErr" => "Tau_f_value_fit_error",
    "TauSVal" => "Tau_s_value",
    "TauSValErr" => "Tau_s_value_fit_error",
    "ChiSquaredVal" => "SSE_val",
    "ModelFit" => "Model_fit",
]);

const DATA_V3_1: CategoryNaming = crate::naming!(Some("Model_free"), [
    "ModelFreeID" => "ID",
    "AssemblyAtomID" => "Assembly_atom_ID",
    "EntityAssemblyID" => "Entity_assembly_ID",
    "EntityID" => "Entity_ID",
    "CompIndexID" => "Comp_index_ID",
    "CompID" => "Comp_ID",
    "AtomID" => "Obs_atom_ID",
    "AtomType" => "Obs_atom_type",
    "AtomIsotopeNumber" => "Obs_atom_isotope_number",
    "S2Val" => "S2_val",
    "S2ValErr" => "S2_val_err",
    "S2fVal" => "S2f_val",
    "S2fValErr" => "S2f_val_err",
    "S2sVal" => "S2s_val",
    "S2sValErr" => "S2s_val_err",
    "LocalTauCVal" => "Local_tau_c_val",
    "LocalTauCValErr" => "Local_tau_c_val_err",
    "TauEVal" => "Tau_e_val",
    "TauEValErr" => "Tau_e_val_err",
    "TauFVal" => "Tau_f_val",
    "TauFValErr" => "Tau_f_val_err",
    "TauSVal" => "Tau_s_val",
    "TauSValErr" => "Tau_s_val_err",
    "RexVal" => "Rex_val",
    "RexValErr" => "Rex_val_err",
    "ChiSquaredVal" => "Chi_squared_val",
    "ModelFit" => "Model_fit",
    "ModelFreeListID" => "Model_free_list_ID",
]);

fn naming(version: DictVersion) -> Option<SaveframeNaming> {
    Some(match version {
        DictVersion::V2_1 => SaveframeNaming {
            marker: "model_free",
            categories: &[LIST_V2_1, EXPERIMENT_V2_1, SOFTWARE_V2_1, DATA_V2_1],
        },
        DictVersion::V3_1 => SaveframeNaming {
            marker: "order_parameters",
            categories: &[LIST_V3_1, EXPERIMENT_V3_1, SOFTWARE_V3_1, DATA_V3_1],
        },
    })
}
