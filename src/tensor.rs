//! Tensor saveframes (3.1 only).
//!
//! Each data row pairs an atom with a full 3×3 tensor. The nine elements
//! are written as the columns `Tensor_11` through `Tensor_33`; in memory a
//! row holds one `Vec<Vec<f64>>` matrix. Matrices of any other shape are
//! rejected before anything is written.

use crate::bind;
use crate::category::CategorySpec;
use crate::error::{Result, StarError};
use crate::field::{Accessor, FieldSpec, Source};
use crate::naming::{CategoryNaming, SaveframeNaming};
use crate::saveframe::SaveframeDef;
use crate::value::{Bind, Bound, Value};
use crate::version::DictVersion;

/// Legal `tensor_type` values.
pub const TENSOR_TYPES: &[&str] = &[
    "diffusion",
    "alignment",
    "chemical shift anisotropy",
    "magnetic susceptibility",
];

/// Legal `geometric_shape` values.
pub const SHAPES: &[&str] = &["sphere", "spheroid", "ellipsoid"];

/// Legal `axial_symmetry` values.
pub const AXIAL_SYMMETRIES: &[&str] = &["isotropic", "prolate", "oblate", "rhombic"];

/// One tensor data set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TensorEntry {
    /// Name of the deposited data file.
    pub data_file_name: Option<String>,
    /// Sample conditions list ID.
    pub sample_cond_list_id: Option<i64>,
    /// Sample conditions label, defaults to `$conditions_1`.
    pub sample_cond_list_label: Option<String>,
    /// One of [`TENSOR_TYPES`].
    pub tensor_type: Option<String>,
    /// One of [`SHAPES`].
    pub geometric_shape: Option<String>,
    /// One of [`AXIAL_SYMMETRIES`].
    pub axial_symmetry: Option<String>,
    /// Units of the tensor elements.
    pub units: Option<String>,
    /// Euler angle convention, e.g. `zyz`.
    pub euler_angle_type: Option<String>,
    /// Free text details.
    pub details: Option<String>,

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
    /// One 3×3 matrix per row, indexed `[row][column]`.
    pub tensors: Vec<Vec<Vec<f64>>>,
}

fn get_element(entry: &TensorEntry, i: usize, j: usize) -> Bound {
    if entry.tensors.is_empty() {
        return Bound::Absent;
    }
    Bound::List(
        entry
            .tensors
            .iter()
            .map(|t| t.get(i).and_then(|row| row.get(j)).map(|x| Value::Float(*x)))
            .collect(),
    )
}

fn set_element(entry: &mut TensorEntry, i: usize, j: usize, bound: Bound) -> Result<()> {
    let rows = match &bound {
        Bound::List(items) => items.len(),
        _ => 0,
    };
    let values: Vec<Option<f64>> = Bind::from_bound(bound).map_err(|reason| StarError::InvalidValue {
        field: "tensors".to_string(),
        reason,
    })?;
    // An all-sentinel column decodes to no values at all.
    if values.is_empty() && rows > 0 {
        return Err(missing_element(1, i, j));
    }
    if entry.tensors.len() < values.len() {
        entry.tensors.resize(values.len(), vec![vec![0.0; 3]; 3]);
    }
    for (row, (tensor, value)) in entry.tensors.iter_mut().zip(values).enumerate() {
        let value = value.ok_or_else(|| missing_element(row + 1, i, j))?;
        if let Some(cell) = tensor.get_mut(i).and_then(|r| r.get_mut(j)) {
            *cell = value;
        }
    }
    Ok(())
}

fn missing_element(row: usize, i: usize, j: usize) -> StarError {
    StarError::InvalidValue {
        field: "tensors".to_string(),
        reason: format!("row {row} has no element {}{}", i + 1, j + 1),
    }
}

macro_rules! element {
    ($i:literal, $j:literal) => {
        Accessor::<TensorEntry> {
            attribute: "tensors",
            get: |e: &TensorEntry| get_element(e, $i, $j),
            set: |e: &mut TensorEntry, bound: Bound| set_element(e, $i, $j, bound),
        }
    };
}

fn check_shapes(entry: &TensorEntry) -> Result<()> {
    for (index, tensor) in entry.tensors.iter().enumerate() {
        if tensor.len() != 3 || tensor.iter().any(|row| row.len() != 3) {
            let widths: Vec<usize> = tensor.iter().map(Vec::len).collect();
            return Err(StarError::InvalidValue {
                field: "tensors".to_string(),
                reason: format!(
                    "tensor {} has {} rows of widths {widths:?}, expected 3x3",
                    index + 1,
                    tensor.len()
                ),
            });
        }
    }
    Ok(())
}

/// The tensor saveframe definition.
#[must_use]
pub fn definition() -> SaveframeDef<TensorEntry> {
    SaveframeDef {
        label: "tensor",
        categories: vec![
            CategorySpec::free(
                "Tensor_list",
                vec![
                    FieldSpec::new("SfCategory", Source::Marker),
                    FieldSpec::new("SfFramecode", Source::Framecode),
                    FieldSpec::new("TensorListID", Source::ListId).int(),
                    FieldSpec::attr("DataFileName", bind!(TensorEntry, data_file_name)),
                    FieldSpec::attr("SampleConditionListID", bind!(TensorEntry, sample_cond_list_id)).int(),
                    FieldSpec::attr("SampleConditionListLabel", bind!(TensorEntry, sample_cond_list_label))
                        .default("$conditions_1"),
                    FieldSpec::attr("TensorType", bind!(TensorEntry, tensor_type)).allowed(TENSOR_TYPES),
                    FieldSpec::attr("GeometricShape", bind!(TensorEntry, geometric_shape)).allowed(SHAPES),
                    FieldSpec::attr("AxialSymmetry", bind!(TensorEntry, axial_symmetry))
                        .allowed(AXIAL_SYMMETRIES),
                    FieldSpec::attr("ValUnits", bind!(TensorEntry, units)),
                    FieldSpec::attr("EulerAngleType", bind!(TensorEntry, euler_angle_type)),
                    FieldSpec::attr("Details", bind!(TensorEntry, details)),
                ],
            ),
            CategorySpec::looped(
                "Tensor",
                vec![
                    FieldSpec::new("TensorID", Source::RowIds).int(),
                    FieldSpec::attr("AssemblyAtomID", bind!(TensorEntry, assembly_atom_ids)).int(),
                    FieldSpec::attr("EntityAssemblyID", bind!(TensorEntry, entity_assembly_ids)).int(),
                    FieldSpec::attr("EntityID", bind!(TensorEntry, entity_ids)).int().required(),
                    FieldSpec::attr("CompIndexID", bind!(TensorEntry, res_nums)).int().required(),
                    FieldSpec::attr("SeqID", bind!(TensorEntry, seq_ids)).int(),
                    FieldSpec::attr("CompID", bind!(TensorEntry, res_names)).required(),
                    FieldSpec::attr("AtomID", bind!(TensorEntry, atom_names)).required(),
                    FieldSpec::attr("AtomType", bind!(TensorEntry, atom_types)),
                    FieldSpec::attr("AtomIsotopeNumber", bind!(TensorEntry, isotopes)).int(),
                    FieldSpec::attr("Tensor11", element!(0, 0)).float().required(),
                    FieldSpec::attr("Tensor12", element!(0, 1)).float().required(),
                    FieldSpec::attr("Tensor13", element!(0, 2)).float().required(),
                    FieldSpec::attr("Tensor21", element!(1, 0)).float().required(),
                    FieldSpec::attr("Tensor22", element!(1, 1)).float().required(),
                    FieldSpec::attr("Tensor23", element!(1, 2)).float().required(),
                    FieldSpec::attr("Tensor31", element!(2, 0)).float().required(),
                    FieldSpec::attr("Tensor32", element!(2, 1)).float().required(),
                    FieldSpec::attr("Tensor33", element!(2, 2)).float().required(),
                    FieldSpec::new("TensorListID", Source::ListId).int(),
                ],
            ),
        ],
        naming,
        framecode: |_, count| format!("tensor {count}"),
        validate: Some(check_shapes),
    }
}

const LIST: CategoryNaming = crate::naming!(Some("Tensor_list"), [
    "SfCategory" => "Sf_category",
    "SfFramecode" => "Sf_framecode",
    "TensorListID" => "ID",
    "DataFileName" => "Data_file_name",
    "SampleConditionListID" => "Sample_condition_list_ID",
    "SampleConditionListLabel" => "Sample_condition_list_label",
    "TensorType" => "Tensor_type",
    "GeometricShape" => "Geometric_shape",
    "AxialSymmetry" => "Axial_symmetry",
    "ValUnits" => "Val_units",
    "EulerAngleType" => "Euler_angle_type",
    "Details" => "Details",
]);

const DATA: CategoryNaming = crate::naming!(Some("Tensor"), [
    "TensorID" => "ID",
    "AssemblyAtomID" => "Assembly_atom_ID",
    "EntityAssemblyID" => "Entity_assembly_ID",
    "EntityID" => "Entity_ID",
    "CompIndexID" => "Comp_index_ID",
    "SeqID" => "Seq_ID",
    "CompID" => "Comp_ID",
    "AtomID" => "Atom_ID",
    "AtomType" => "Atom_type",
    "AtomIsotopeNumber" => "Atom_isotope_number",
    "Tensor11" => "Tensor_11_val",
    "Tensor12" => "Tensor_12_val",
    "Tensor13" => "Tensor_13_val",
    "Tensor21" => "Tensor_21_val",
    "Tensor22" => "Tensor_22_val",
    "Tensor23" => "Tensor_23_val",
    "Tensor31" => "Tensor_31_val",
    "Tensor32" => "Tensor_32_val",
    "Tensor33" => "Tensor_33_val",
    "TensorListID" => "Tensor_list_ID",
]);

fn naming(version: DictVersion) -> Option<SaveframeNaming> {
    match version {
        DictVersion::V2_1 => None,
        DictVersion::V3_1 => Some(SaveframeNaming {
            marker: "tensor",
            categories: &[LIST, DATA],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::saveframe::Saveframe;

    fn diagonal(x: f64, y: f64, z: f64) -> Vec<Vec<f64>> {
        vec![vec![x, 0.0, 0.0], vec![0.0, y, 0.0], vec![0.0, 0.0, z]]
    }

    fn entry() -> TensorEntry {
        TensorEntry {
            tensor_type: Some("alignment".into()),
            geometric_shape: Some("ellipsoid".into()),
            axial_symmetry: Some("rhombic".into()),
            entity_ids: vec![Some(1), Some(1)],
            res_nums: vec![Some(10), Some(11)],
            res_names: vec![Some("LEU".into()), Some("ASP".into())],
            atom_names: vec![Some("N".into()), Some("N".into())],
            tensors: vec![diagonal(1.0, 2.0, -3.0), diagonal(-0.5, -0.5, 1.0)],
            ..TensorEntry::default()
        }
    }

    #[test]
    fn test_tensor_round_trip() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        saveframe.add(&mut blocks, &entry()).unwrap();

        let data = &blocks[0].tables[1];
        assert_eq!(data.column("_Tensor.Tensor_33_val").unwrap(), ["-3.0", "1.0"]);
        assert_eq!(data.column("_Tensor.Tensor_12_val").unwrap(), ["0.0", "0.0"]);
        assert_eq!(data.column("_Tensor.Tensor_list_ID").unwrap(), ["1", "1"]);

        let decoded = saveframe.each(&blocks).next().unwrap().unwrap();
        assert_eq!(decoded.tensors, entry().tensors);
        assert_eq!(decoded.geometric_shape.as_deref(), Some("ellipsoid"));
    }

    #[test]
    fn test_unknown_shape_is_invalid() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        let cube = TensorEntry {
            geometric_shape: Some("cube".into()),
            ..entry()
        };
        let err = saveframe.add(&mut blocks, &cube).unwrap_err();
        assert!(matches!(
            err.root(),
            StarError::InvalidValue { field, .. } if field == "geometric_shape"
        ));
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_malformed_matrix_rejected() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        let mut bad = entry();
        bad.tensors[1].pop();
        let err = saveframe.add(&mut blocks, &bad).unwrap_err();
        assert!(matches!(err.root(), StarError::InvalidValue { field, .. } if field == "tensors"));

        let mut ragged = entry();
        ragged.tensors[0][2].push(4.0);
        assert!(saveframe.add(&mut blocks, &ragged).is_err());
        assert!(blocks.is_empty());
        assert_eq!(saveframe.instance_count(), 0);
    }

    #[test]
    fn test_missing_element_on_read() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        saveframe.add(&mut blocks, &entry()).unwrap();
        let index = blocks[0].tables[1].column_index("_Tensor.Tensor_21_val").unwrap();
        blocks[0].tables[1].columns[index][0] = "?".into();

        let err = saveframe.each(&blocks).next().unwrap().unwrap_err();
        assert!(matches!(err, StarError::InvalidValue { field, .. } if field == "tensors"));
    }

    #[test]
    fn test_sentinel_element_column_is_an_error() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        for tag in ["_Tensor.Tensor_11_val", "_Tensor.Tensor_23_val"] {
            let mut blocks = Vec::new();
            saveframe.add(&mut blocks, &entry()).unwrap();
            let data = &mut blocks[0].tables[1];
            let index = data.column_index(tag).unwrap();
            data.columns[index] = vec!["?".into(), "?".into()];

            let err = saveframe.each(&blocks).next().unwrap().unwrap_err();
            assert!(matches!(
                err,
                StarError::InvalidValue { ref field, ref reason } if field == "tensors" && reason.starts_with("row 1 has no element")
            ));
        }
    }
}
