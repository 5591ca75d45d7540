//! Heteronuclear relaxation data: R1 (T1), R2 (T2) and steady-state NOE.
//!
//! The three saveframe families share one entry type, [`RelaxEntry`], and
//! the same three tag categories: a free list category (spectrometer
//! frequency, sample conditions, units), a loop of experiments, and the
//! per-atom data loop. They differ in category marker, labels and a handful
//! of kind-specific tags:
//!
//! | Kind | 2.1 marker | 3.1 marker | Data label (3.1) |
//! |------|------------|------------|------------------|
//! | R1   | `T1_relaxation` | `heteronucl_T1_relaxation` | `T1` |
//! | R2   | `T2_relaxation` | `heteronucl_T2_relaxation` | `T2` |
//! | NOE  | `heteronuclear_NOE` | `heteronucl_NOEs` | `Heteronucl_NOE` |
//!
//! [`Relaxation`] bundles the three and reads them back in file order.
//!
//! # Examples
//!
//! ```
//! use nmrstar::relaxation::{RelaxEntry, RelaxKind, Relaxation};
//! use nmrstar::DictVersion;
//!
//! let mut relax = Relaxation::new(DictVersion::V3_1).unwrap();
//! let entry = RelaxEntry {
//!     frq: Some(600.0),
//!     entity_ids: vec![Some(1), Some(1)],
//!     res_nums: vec![Some(1), Some(2)],
//!     res_names: vec![Some("ALA".into()), Some("GLY".into())],
//!     atom_names: vec![Some("N".into()), Some("N".into())],
//!     isotopes: vec![Some(15), Some(15)],
//!     data: vec![Some(1.2), Some(1.5)],
//!     errors: vec![Some(0.1), Some(0.1)],
//!     ..RelaxEntry::default()
//! };
//!
//! let mut blocks = Vec::new();
//! assert_eq!(relax.add(&mut blocks, RelaxKind::R1, &entry).unwrap(), 1);
//!
//! let (kind, decoded) = relax.each(&blocks).next().unwrap().unwrap();
//! assert_eq!(kind, RelaxKind::R1);
//! assert_eq!(decoded.data, entry.data);
//! ```

use crate::bind;
use crate::category::CategorySpec;
use crate::codec::SENTINEL;
use crate::error::{Result, StarError};
use crate::field::{FieldSpec, Source};
use crate::naming::{CategoryNaming, SaveframeNaming};
use crate::saveframe::{Framecode, NamingFn, Saveframe, SaveframeDef};
use crate::table::Block;
use crate::version::DictVersion;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::slice;
use std::str::FromStr;

/// The kind of relaxation data held by a saveframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelaxKind {
    /// Longitudinal relaxation rate.
    R1,
    /// Transverse relaxation rate.
    R2,
    /// Steady-state heteronuclear NOE.
    #[serde(rename = "NOE")]
    Noe,
}

impl RelaxKind {
    /// All kinds, in the order [`Relaxation`] checks them.
    pub const ALL: [RelaxKind; 3] = [RelaxKind::R1, RelaxKind::R2, RelaxKind::Noe];

    /// Short name as used in framecodes.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            RelaxKind::R1 => "R1",
            RelaxKind::R2 => "R2",
            RelaxKind::Noe => "NOE",
        }
    }
}

impl fmt::Display for RelaxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelaxKind {
    type Err = StarError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "R1" => Ok(RelaxKind::R1),
            "R2" => Ok(RelaxKind::R2),
            "NOE" => Ok(RelaxKind::Noe),
            other => Err(StarError::InvalidValue {
                field: "kind".to_string(),
                reason: format!("'{other}' is not one of R1, R2, NOE"),
            }),
        }
    }
}

/// One relaxation data set: one spectrometer field, one saveframe.
///
/// Per-atom vectors are aligned by index. The `_2` fields describe the
/// second atom of an NOE pair and only exist in the 3.1 dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelaxEntry {
    /// Sample conditions list ID.
    pub sample_cond_list_id: Option<i64>,
    /// Sample conditions label, defaults to `$conditions_1`.
    pub sample_cond_list_label: Option<String>,
    /// Temperature calibration method (3.1 only, required for NOE).
    pub temp_calibration: Option<String>,
    /// Temperature control method (3.1 only, required for NOE).
    pub temp_control: Option<String>,
    /// Proton spectrometer frequency in MHz.
    pub frq: Option<f64>,
    /// Coherence type, defaults to `Nz` (R1) or `Ny` (R2).
    pub coherence: Option<String>,
    /// Rate units, defaults to `1/s`.
    pub units: Option<String>,
    /// How NOE peak intensities were measured (required for NOE in 3.1).
    pub peak_intensity_type: Option<String>,
    /// Free text details.
    pub details: Option<String>,
    /// Sample label, defaults to `$sample_1`.
    pub sample_label: Option<String>,

    /// Assembly atom IDs.
    pub assembly_atom_ids: Vec<Option<i64>>,
    /// Entity assembly IDs.
    pub entity_assembly_ids: Vec<Option<i64>>,
    /// Entity IDs.
    pub entity_ids: Vec<Option<i64>>,
    /// Residue numbers (`Comp_index_ID`).
    pub res_nums: Vec<Option<i64>>,
    /// Author sequence IDs.
    pub seq_ids: Vec<Option<i64>>,
    /// Residue names, e.g. `ALA`.
    pub res_names: Vec<Option<String>>,
    /// Atom names, e.g. `N`.
    pub atom_names: Vec<Option<String>>,
    /// Element symbols.
    pub atom_types: Vec<Option<String>>,
    /// Isotope mass numbers.
    pub isotopes: Vec<Option<i64>>,

    /// Assembly atom IDs of the second atom.
    pub assembly_atom_ids_2: Vec<Option<i64>>,
    /// Entity assembly IDs of the second atom.
    pub entity_assembly_ids_2: Vec<Option<i64>>,
    /// Entity IDs of the second atom.
    pub entity_ids_2: Vec<Option<i64>>,
    /// Residue numbers of the second atom.
    pub res_nums_2: Vec<Option<i64>>,
    /// Author sequence IDs of the second atom.
    pub seq_ids_2: Vec<Option<i64>>,
    /// Residue names of the second atom.
    pub res_names_2: Vec<Option<String>>,
    /// Atom names of the second atom.
    pub atom_names_2: Vec<Option<String>>,
    /// Element symbols of the second atom.
    pub atom_types_2: Vec<Option<String>>,
    /// Isotope mass numbers of the second atom.
    pub isotopes_2: Vec<Option<i64>>,

    /// Relaxation rates or NOE values.
    pub data: Vec<Option<f64>>,
    /// Errors of `data`.
    pub errors: Vec<Option<f64>>,
}

fn list_category(kind: RelaxKind) -> CategorySpec<RelaxEntry> {
    let temp_calibration = FieldSpec::attr("TempCalibrationMethod", bind!(RelaxEntry, temp_calibration));
    let temp_control = FieldSpec::attr("TempControlMethod", bind!(RelaxEntry, temp_control));

    let mut fields = vec![
        FieldSpec::new("SfCategory", Source::Marker),
        FieldSpec::new("SfFramecode", Source::Framecode),
        FieldSpec::new("ListID", Source::ListId).int(),
        FieldSpec::unbound("DataFileName"),
        FieldSpec::attr("SampleConditionListID", bind!(RelaxEntry, sample_cond_list_id)).int(),
        FieldSpec::attr("SampleConditionListLabel", bind!(RelaxEntry, sample_cond_list_label))
            .default("$conditions_1"),
        FieldSpec::attr("SpectrometerFrequency1H", bind!(RelaxEntry, frq)).float(),
    ];

    match kind {
        RelaxKind::R1 | RelaxKind::R2 => {
            let coherence = if kind == RelaxKind::R1 { "Nz" } else { "Ny" };
            fields.extend([
                temp_calibration,
                temp_control,
                FieldSpec::attr("CoherenceType", bind!(RelaxEntry, coherence)).default(coherence),
                FieldSpec::attr("ValUnits", bind!(RelaxEntry, units)).default("1/s"),
            ]);
        },
        RelaxKind::Noe => {
            fields.extend([
                temp_calibration.required(),
                temp_control.required(),
                FieldSpec::attr("HeteronuclearNOEValType", bind!(RelaxEntry, peak_intensity_type))
                    .required(),
                FieldSpec::unbound("NOERefVal"),
                FieldSpec::unbound("NOERefDescription"),
            ]);
        },
    }

    fields.extend([
        FieldSpec::attr("Details", bind!(RelaxEntry, details)),
        FieldSpec::unbound("TextDataFormat"),
        FieldSpec::unbound("TextData"),
    ]);

    CategorySpec::free("Heteronucl_list", fields)
}

fn experiment_category() -> CategorySpec<RelaxEntry> {
    CategorySpec::looped(
        "Heteronucl_experiment",
        vec![
            FieldSpec::unbound("ExperimentID"),
            FieldSpec::unbound("ExperimentName"),
            FieldSpec::unbound("SampleID"),
            FieldSpec::attr("SampleLabel", bind!(RelaxEntry, sample_label)).default("$sample_1"),
            FieldSpec::unbound("SampleState"),
            FieldSpec::new("ListID", Source::ListId).int(),
        ],
    )
}

fn data_category(kind: RelaxKind) -> CategorySpec<RelaxEntry> {
    let mut fields = vec![
        FieldSpec::new("RxID", Source::RowIds).int(),
        FieldSpec::attr("AssemblyAtomID", bind!(RelaxEntry, assembly_atom_ids)).int(),
        FieldSpec::attr("EntityAssemblyID", bind!(RelaxEntry, entity_assembly_ids)).int(),
        FieldSpec::attr("EntityID", bind!(RelaxEntry, entity_ids)).int().required(),
        FieldSpec::attr("CompIndexID", bind!(RelaxEntry, res_nums)).int().required(),
        FieldSpec::attr("SeqID", bind!(RelaxEntry, seq_ids)).int(),
        FieldSpec::attr("CompID", bind!(RelaxEntry, res_names)).required(),
        FieldSpec::attr("AtomID", bind!(RelaxEntry, atom_names)).required(),
        FieldSpec::attr("AtomType", bind!(RelaxEntry, atom_types)),
        FieldSpec::attr("AtomIsotopeNumber", bind!(RelaxEntry, isotopes)).int(),
    ];

    if kind == RelaxKind::Noe {
        fields.extend([
            FieldSpec::attr("AssemblyAtomID2", bind!(RelaxEntry, assembly_atom_ids_2)).int(),
            FieldSpec::attr("EntityAssemblyID2", bind!(RelaxEntry, entity_assembly_ids_2)).int(),
            FieldSpec::attr("EntityID2", bind!(RelaxEntry, entity_ids_2)).int(),
            FieldSpec::attr("CompIndexID2", bind!(RelaxEntry, res_nums_2)).int(),
            FieldSpec::attr("SeqID2", bind!(RelaxEntry, seq_ids_2)).int(),
            FieldSpec::attr("CompID2", bind!(RelaxEntry, res_names_2)),
            FieldSpec::attr("AtomID2", bind!(RelaxEntry, atom_names_2)),
            FieldSpec::attr("AtomType2", bind!(RelaxEntry, atom_types_2)),
            FieldSpec::attr("AtomIsotopeNumber2", bind!(RelaxEntry, isotopes_2)).int(),
        ]);
    }

    fields.extend([
        FieldSpec::attr("Val", bind!(RelaxEntry, data)).float().required(),
        FieldSpec::attr("ValErr", bind!(RelaxEntry, errors)).float(),
        FieldSpec::new("ListID", Source::ListId).int(),
    ]);

    CategorySpec::looped("Rx", fields)
}

/// The saveframe definition of one relaxation kind.
#[must_use]
pub fn definition(kind: RelaxKind) -> SaveframeDef<RelaxEntry> {
    let (label, naming): (&'static str, NamingFn) = match kind {
        RelaxKind::R1 => ("heteronucl_T1", r1_naming),
        RelaxKind::R2 => ("heteronucl_T2", r2_naming),
        RelaxKind::Noe => ("heteronucl_NOE", noe_naming),
    };
    let framecode: Framecode<RelaxEntry> = match kind {
        RelaxKind::R1 => r1_framecode,
        RelaxKind::R2 => r2_framecode,
        RelaxKind::Noe => noe_framecode,
    };

    SaveframeDef {
        label,
        categories: vec![list_category(kind), experiment_category(), data_category(kind)],
        naming,
        framecode,
        validate: None,
    }
}

fn framecode(entry: &RelaxEntry, kind: RelaxKind, count: u32) -> String {
    let frq = entry
        .frq
        .map_or_else(|| SENTINEL.to_string(), |frq| frq.to_string());
    format!("{frq} MHz heteronuclear {kind} {count}")
}

fn r1_framecode(entry: &RelaxEntry, count: u32) -> String {
    framecode(entry, RelaxKind::R1, count)
}

fn r2_framecode(entry: &RelaxEntry, count: u32) -> String {
    framecode(entry, RelaxKind::R2, count)
}

fn noe_framecode(entry: &RelaxEntry, count: u32) -> String {
    framecode(entry, RelaxKind::Noe, count)
}

const R1_LIST_V2_1: CategoryNaming = crate::naming!(None, [
    "SfCategory" => "Saveframe_category",
    "ListID" => "id",
    "SampleConditionListID" => "Sample_condition_list_ID",
    "SampleConditionListLabel" => "Sample_conditions_label",
    "SpectrometerFrequency1H" => "Spectrometer_frequency_1H",
    "CoherenceType" => "T1_coherence_type",
    "ValUnits" => "T1_value_units",
    "Details" => "Details",
]);

const R1_LIST_V3_1: CategoryNaming = crate::naming!(Some("Heteronucl_T1_list"), [
    "SfCategory" => "Sf_category",
    "SfFramecode" => "Sf_framecode",
    "ListID" => "ID",
    "SampleConditionListID" => "Sample_condition_list_ID",
    "SampleConditionListLabel" => "Sample_condition_list_label",
    "TempCalibrationMethod" => "Temp_calibration_method",
    "TempControlMethod" => "Temp_control_method",
    "SpectrometerFrequency1H" => "Spectrometer_frequency_1H",
    "CoherenceType" => "T1_coherence_type",
    "ValUnits" => "T1_val_units",
    "Details" => "Details",
]);

const R2_LIST_V2_1: CategoryNaming = crate::naming!(None, [
    "SfCategory" => "Saveframe_category",
    "ListID" => "ID",
    "SampleConditionListID" => "Sample_condition_list_ID",
    "SampleConditionListLabel" => "Sample_conditions_label",
    "SpectrometerFrequency1H" => "Spectrometer_frequency_1H",
    "CoherenceType" => "T2_coherence_type",
    "ValUnits" => "T2_value_units",
    "Details" => "Details",
]);

const R2_LIST_V3_1: CategoryNaming = crate::naming!(Some("Heteronucl_T2_list"), [
    "SfCategory" => "Sf_category",
    "SfFramecode" => "Sf_framecode",
    "ListID" => "ID",
    "SampleConditionListID" => "Sample_condition_list_ID",
    "SampleConditionListLabel" => "Sample_condition_list_label",
    "TempCalibrationMethod" => "Temp_calibration_method",
    "TempControlMethod" => "Temp_control_method",
    "SpectrometerFrequency1H" => "Spectrometer_frequency_1H",
    "CoherenceType" => "T2_coherence_type",
    "ValUnits" => "T2_val_units",
    "Details" => "Details",
]);

const NOE_LIST_V2_1: CategoryNaming = crate::naming!(None, [
    "SfCategory" => "Saveframe_category",
    "ListID" => "id",
    "DataFileName" => "Data_file_name",
    "SampleConditionListID" => "Sample_condition_list_ID",
    "SampleConditionListLabel" => "Sample_conditions_label",
    "SpectrometerFrequency1H" => "Spectrometer_frequency_1H",
    "HeteronuclearNOEValType" => "Heteronuclear_NOE_val_type",
    "NOERefVal" => "NOE_ref_val",
    "NOERefDescription" => "NOE_ref_description",
    "Details" => "Details",
    "TextDataFormat" => "Text_data_format",
    "TextData" => "Text_data",
]);

const NOE_LIST_V3_1: CategoryNaming = crate::naming!(Some("Heteronucl_NOE_list"), [
    "SfCategory" => "Sf_category",
    "SfFramecode" => "Sf_framecode",
    "ListID" => "ID",
    "DataFileName" => "Data_file_name",
    "SampleConditionListID" => "Sample_condition_list_ID",
    "SampleConditionListLabel" => "Sample_condition_list_label",
    "TempCalibrationMethod" => "Temp_calibration_method",
    "TempControlMethod" => "Temp_control_method",
    "SpectrometerFrequency1H" => "Spectrometer_frequency_1H",
    "HeteronuclearNOEValType" => "Heteronuclear_NOE_val_type",
    "NOERefVal" => "NOE_ref_val",
    "NOERefDescription" => "NOE_ref_description",
    "Details" => "Details",
    "TextDataFormat" => "Text_data_format",
    "TextData" => "Text_data",
]);

const SAMPLE_V2_1: CategoryNaming = crate::naming!(None, [
    "SampleLabel" => "Sample_label",
]);

const R1_EXPERIMENT_V3_1: CategoryNaming = crate::naming!(Some("Heteronucl_T1_experiment"), [
    "SampleLabel" => "Sample_label",
    "ListID" => "Heteronucl_T1_list_ID",
]);

const R2_EXPERIMENT_V3_1: CategoryNaming = crate::naming!(Some("Heteronucl_T2_experiment"), [
    "SampleLabel" => "Sample_label",
    "ListID" => "Heteronucl_T2_list_ID",
]);

const NOE_EXPERIMENT_V2_1: CategoryNaming = crate::naming!(None, [
    "ExperimentID" => "Experiment_ID",
    "ExperimentName" => "Experiment_label",
    "SampleID" => "Sample_ID",
    "SampleLabel" => "Sample_label",
    "SampleState" => "Sample_state",
    "ListID" => "Heteronucl_NOE_list_ID",
]);

const NOE_EXPERIMENT_V3_1: CategoryNaming = crate::naming!(Some("Heteronucl_NOE_experiment"), [
    "ExperimentID" => "Experiment_ID",
    "ExperimentName" => "Experiment_name",
    "SampleID" => "Sample_ID",
    "SampleLabel" => "Sample_label",
    "SampleState" => "Sample_state",
    "ListID" => "Heteronucl_NOE_list_ID",
]);

const R1_DATA_V2_1: CategoryNaming = crate::naming!(None, [
    "RxID" => "id",
    "AssemblyAtomID" => "Assembly_atom_ID",
    "EntityAssemblyID" => "Entity_assembly_ID",
    "EntityID" => "Entity_ID",
    "CompIndexID" => "Residue_seq_code",
    "SeqID" => "Seq_ID",
    "CompID" => "Residue_label",
    "AtomID" => "Atom_name",
    "AtomType" => "Atom_type",
    "AtomIsotopeNumber" => "Atom_isotope_number",
    "Val" => "T1_value",
    "ValErr" => "T1_value_error",
]);

const R2_DATA_V2_1: CategoryNaming = crate::naming!(None, [
    "RxID" => "id",
    "AssemblyAtomID" => "Assembly_atom_ID",
    "EntityAssemblyID" => "Entity_assembly_ID",
    "EntityID" => "Entity_ID",
    "CompIndexID" => "Residue_seq_code",
    "SeqID" => "Seq_ID",
    "CompID" => "Residue_label",
    "AtomID" => "Atom_name",
    "AtomType" => "Atom_type",
    "AtomIsotopeNumber" => "Atom_isotope_number",
    "Val" => "T2_value",
    "ValErr" => "T2_value_error",
]);

const NOE_DATA_V2_1: CategoryNaming = crate::naming!(None, [
    "RxID" => "id",
    "AssemblyAtomID" => "Assembly_atom_ID",
    "EntityAssemblyID" => "Entity_assembly_ID",
    "EntityID" => "Entity_ID",
    "CompIndexID" => "Residue_seq_code",
    "SeqID" => "Seq_ID",
    "CompID" => "Residue_label",
    "AtomID" => "Atom_name",
    "AtomType" => "Atom_type",
    "AtomIsotopeNumber" => "Atom_isotope_number",
    "Val" => "Heteronuclear_NOE_value",
    "ValErr" => "Heteronuclear_NOE_value_error",
    "ListID" => "Heteronucl_NOE_list_ID",
]);

const R1_DATA_V3_1: CategoryNaming = crate::naming!(Some("T1"), [
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
    "Val" => "Val",
    "ValErr" => "Val_err",
    "ListID" => "Heteronucl_T1_list_ID",
]);

const R2_DATA_V3_1: CategoryNaming = crate::naming!(Some("T2"), [
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
    "Val" => "Val",
    "ValErr" => "Val_err",
    "ListID" => "Heteronucl_T2_list_ID",
]);

const NOE_DATA_V3_1: CategoryNaming = crate::naming!(Some("Heteronucl_NOE"), [
    "RxID" => "ID",
    "AssemblyAtomID" => "Assembly_atom_ID_1",
    "EntityAssemblyID" => "Entity_assembly_ID_1",
    "EntityID" => "Entity_ID_1",
    "CompIndexID" => "Comp_index_ID_1",
    "SeqID" => "Seq_ID_1",
    "CompID" => "Comp_ID_1",
    "AtomID" => "Atom_ID_1",
    "AtomType" => "Atom_type_1",
    "AtomIsotopeNumber" => "Atom_isotope_number_1",
    "AssemblyAtomID2" => "Assembly_atom_ID_2",
    "EntityAssemblyID2" => "Entity_assembly_ID_2",
    "EntityID2" => "Entity_ID_2",
    "CompIndexID2" => "Comp_index_ID_2",
    "SeqID2" => "Seq_ID_2",
    "CompID2" => "Comp_ID_2",
    "AtomID2" => "Atom_ID_2",
    "AtomType2" => "Atom_type_2",
    "AtomIsotopeNumber2" => "Atom_isotope_number_2",
    "Val" => "Val",
    "ValErr" => "Val_err",
    "ListID" => "Heteronucl_NOE_list_ID",
]);

fn r1_naming(version: DictVersion) -> Option<SaveframeNaming> {
    Some(match version {
        DictVersion::V2_1 => SaveframeNaming {
            marker: "T1_relaxation",
            categories: &[R1_LIST_V2_1, SAMPLE_V2_1, R1_DATA_V2_1],
        },
        DictVersion::V3_1 => SaveframeNaming {
            marker: "heteronucl_T1_relaxation",
            categories: &[R1_LIST_V3_1, R1_EXPERIMENT_V3_1, R1_DATA_V3_1],
        },
    })
}

fn r2_naming(version: DictVersion) -> Option<SaveframeNaming> {
    Some(match version {
        DictVersion::V2_1 => SaveframeNaming {
            marker: "T2_relaxation",
            categories: &[R2_LIST_V2_1, SAMPLE_V2_1, R2_DATA_V2_1],
        },
        DictVersion::V3_1 => SaveframeNaming {
            marker: "heteronucl_T2_relaxation",
            categories: &[R2_LIST_V3_1, R2_EXPERIMENT_V3_1, R2_DATA_V3_1],
        },
    })
}

fn noe_naming(version: DictVersion) -> Option<SaveframeNaming> {
    Some(match version {
        DictVersion::V2_1 => SaveframeNaming {
            marker: "heteronuclear_NOE",
            categories: &[NOE_LIST_V2_1, NOE_EXPERIMENT_V2_1, NOE_DATA_V2_1],
        },
        DictVersion::V3_1 => SaveframeNaming {
            marker: "heteronucl_NOEs",
            categories: &[NOE_LIST_V3_1, NOE_EXPERIMENT_V3_1, NOE_DATA_V3_1],
        },
    })
}

/// The three relaxation families of one dictionary version.
#[derive(Debug)]
pub struct Relaxation {
    r1: Saveframe<RelaxEntry>,
    r2: Saveframe<RelaxEntry>,
    noe: Saveframe<RelaxEntry>,
}

impl Relaxation {
    /// Resolve all three families for `version`.
    ///
    /// # Errors
    ///
    /// Returns [`StarError::Dictionary`] if a naming table is inconsistent.
    pub fn new(version: DictVersion) -> Result<Self> {
        Ok(Relaxation {
            r1: Saveframe::new(definition(RelaxKind::R1), version)?,
            r2: Saveframe::new(definition(RelaxKind::R2), version)?,
            noe: Saveframe::new(definition(RelaxKind::Noe), version)?,
        })
    }

    /// The saveframe of one kind.
    #[must_use]
    pub fn saveframe(&self, kind: RelaxKind) -> &Saveframe<RelaxEntry> {
        match kind {
            RelaxKind::R1 => &self.r1,
            RelaxKind::R2 => &self.r2,
            RelaxKind::Noe => &self.noe,
        }
    }

    fn saveframe_mut(&mut self, kind: RelaxKind) -> &mut Saveframe<RelaxEntry> {
        match kind {
            RelaxKind::R1 => &mut self.r1,
            RelaxKind::R2 => &mut self.r2,
            RelaxKind::Noe => &mut self.noe,
        }
    }

    /// Add one data set of the given kind. Each kind numbers its saveframes
    /// independently.
    ///
    /// # Errors
    ///
    /// See [`Saveframe::add`].
    pub fn add(&mut self, blocks: &mut Vec<Block>, kind: RelaxKind, entry: &RelaxEntry) -> Result<u32> {
        self.saveframe_mut(kind).add(blocks, entry)
    }

    /// Lazily decode every relaxation block, of any kind, in file order.
    pub fn each<'a>(&'a self, blocks: &'a [Block]) -> RelaxEntries<'a> {
        RelaxEntries {
            relaxation: self,
            blocks: blocks.iter(),
        }
    }
}

/// Iterator over `(kind, entry)` pairs, created by [`Relaxation::each`].
#[derive(Debug)]
pub struct RelaxEntries<'a> {
    relaxation: &'a Relaxation,
    blocks: slice::Iter<'a, Block>,
}

impl Iterator for RelaxEntries<'_> {
    type Item = Result<(RelaxKind, RelaxEntry)>;

    fn next(&mut self) -> Option<Self::Item> {
        let relaxation = self.relaxation;
        self.blocks.by_ref().find_map(|block| {
            RelaxKind::ALL.into_iter().find_map(|kind| {
                relaxation
                    .saveframe(kind)
                    .read_block(block)
                    .map(|result| result.map(|entry| (kind, entry)))
            })
        })
    }
}
