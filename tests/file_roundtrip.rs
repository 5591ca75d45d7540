//! Whole-file round trips through STAR text on disk, and behavior across
//! the two dictionary versions.

mod common;

use nmrstar::csa::CsaEntry;
use nmrstar::entity::EntityEntry;
use nmrstar::method::MethodEntry;
use nmrstar::relaxation::RelaxKind;
use nmrstar::star::{parse, render};
use nmrstar::tensor::TensorEntry;
use nmrstar::{open_dictionary, open_dictionary_with, DictVersion, DictionaryConfig, NmrStarFile, StarError};
use tempfile::TempDir;

fn method_entry() -> MethodEntry {
    MethodEntry {
        name: Some("relax full analysis".into()),
        details: Some("Fully automated model-free protocol".into()),
        cite_ids: vec![Some(1)],
        file_name: Some("full_analysis.py".into()),
        file_text: Some("# Script.\nfrom relax import *\n\nrun(diff_model='local_tm')".into()),
        param_file_name: Some("params.txt".into()),
        param_file_text: Some("grid_inc = 11".into()),
    }
}

fn entity_entry() -> EntityEntry {
    EntityEntry {
        mol_name: Some("ubiquitin".into()),
        mol_type: Some("polymer".into()),
        polymer_type: Some("polypeptide(L)".into()),
        polymer_seq_code: Some("MQIF".into()),
        thiol_state: Some("not present".into()),
        res_nums: vec![Some(1), Some(2), Some(3), Some(4)],
        res_names: ["MET", "GLN", "ILE", "PHE"].iter().map(|s| Some((*s).to_string())).collect(),
    }
}

fn tensor_entry() -> TensorEntry {
    TensorEntry {
        tensor_type: Some("diffusion".into()),
        geometric_shape: Some("spheroid".into()),
        axial_symmetry: Some("prolate".into()),
        units: Some("s-1".into()),
        entity_ids: vec![Some(1)],
        res_nums: vec![Some(1)],
        res_names: vec![Some("MET".into())],
        atom_names: vec![Some("N".into())],
        tensors: vec![vec![
            vec![1.2e7, 0.0, 0.0],
            vec![0.0, 1.2e7, 0.0],
            vec![0.0, 0.0, 1.9e7],
        ]],
        ..TensorEntry::default()
    }
}

#[test]
fn test_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("ubiquitin.str");
    let config = DictionaryConfig {
        version: DictVersion::V3_1,
        title: "ubiquitin_dynamics".into(),
    };

    let mut dict = open_dictionary_with(&config).unwrap();
    let mut file = NmrStarFile::new(&path, &config);
    dict.citations.add(&mut file.blocks, &common::citation_entry()).unwrap();
    dict.entity.add(&mut file.blocks, &entity_entry()).unwrap();
    dict.software.add(&mut file.blocks, &common::software_entry()).unwrap();
    dict.method.add(&mut file.blocks, &method_entry()).unwrap();
    dict.relaxation.add(&mut file.blocks, RelaxKind::R1, &common::relax_entry()).unwrap();
    dict.relaxation.add(&mut file.blocks, RelaxKind::Noe, &common::noe_entry()).unwrap();
    dict.tensor.add(&mut file.blocks, &tensor_entry()).unwrap();
    file.write().unwrap();

    let mut reopened = NmrStarFile::new(&path, &config);
    assert_eq!(reopened.read().unwrap().len(), 7);
    assert_eq!(reopened.blocks, file.blocks);

    let dict = open_dictionary(DictVersion::V3_1).unwrap();
    let citations: Vec<_> = dict.citations.each(&reopened.blocks).collect::<Result<_, _>>().unwrap();
    assert_eq!(citations, vec![common::citation_entry()]);
    assert_eq!(citations[0].authors()[0].family_name, "d'Auvergne");

    let entities: Vec<_> = dict.entity.each(&reopened.blocks).collect::<Result<_, _>>().unwrap();
    assert_eq!(entities, vec![entity_entry()]);

    let software: Vec<_> = dict.software.each(&reopened.blocks).collect::<Result<_, _>>().unwrap();
    assert_eq!(software, vec![common::software_entry()]);

    let methods: Vec<_> = dict.method.each(&reopened.blocks).collect::<Result<_, _>>().unwrap();
    assert_eq!(methods, vec![method_entry()]);

    let kinds: Vec<RelaxKind> = dict
        .relaxation
        .each(&reopened.blocks)
        .map(|item| item.map(|(kind, _)| kind))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(kinds, [RelaxKind::R1, RelaxKind::Noe]);

    let tensors: Vec<_> = dict.tensor.each(&reopened.blocks).collect::<Result<_, _>>().unwrap();
    assert_eq!(tensors[0].tensors, tensor_entry().tensors);
    assert_eq!(tensors[0].geometric_shape.as_deref(), Some("spheroid"));
}

#[test]
fn test_text_header_and_quoting() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("method.str");
    let config = DictionaryConfig::default();

    let mut dict = open_dictionary_with(&config).unwrap();
    let mut file = NmrStarFile::new(&path, &config);
    dict.method.add(&mut file.blocks, &method_entry()).unwrap();
    file.write().unwrap();

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("data_nmrstar\n"));
    assert!(text.contains("save_relax_full_analysis\n"));
    assert!(text.contains("'relax full analysis'"));
    assert!(text.contains("\n;# Script.\n"));
    assert_eq!(file.title(), "nmrstar");
}

#[test]
fn test_script_with_semicolon_lines_round_trips() {
    let entry = MethodEntry {
        file_text: Some("x = 1\n; note\ny = 2".into()),
        details: Some(";leading\n;\n".into()),
        ..method_entry()
    };
    for version in DictVersion::ALL {
        let mut dict = open_dictionary(version).unwrap();
        let mut blocks = Vec::new();
        dict.method.add(&mut blocks, &entry).unwrap();

        let parsed = parse(&render("script", &blocks)).unwrap().blocks;
        assert_eq!(parsed, blocks);
        let decoded = dict.method.each(&parsed).next().unwrap().unwrap();
        assert_eq!(decoded.file_text, entry.file_text);
        assert_eq!(decoded.details, entry.details);
    }
}

#[test]
fn test_same_entries_in_both_versions() {
    let entry = CsaEntry {
        entity_ids: vec![Some(1), Some(1)],
        res_nums: vec![Some(5), Some(6)],
        res_names: vec![Some("LEU".into()), Some("ILE".into())],
        atom_names: vec![Some("N".into()), Some("N".into())],
        csa: vec![Some(-172.0), Some(-160.5)],
        csa_errors: vec![Some(3.0), Some(2.5)],
        ..CsaEntry::default()
    };

    let mut tags = Vec::new();
    let mut decoded = Vec::new();
    for version in DictVersion::ALL {
        let mut dict = open_dictionary(version).unwrap();
        let mut blocks = Vec::new();
        dict.csa.add(&mut blocks, &entry).unwrap();
        dict.relaxation.add(&mut blocks, RelaxKind::R2, &common::relax_entry()).unwrap();

        let text = render("isolation", &blocks);
        let blocks = parse(&text).unwrap().blocks;

        let csa = dict.csa.each(&blocks).next().unwrap().unwrap();
        let (_, relax) = dict.relaxation.each(&blocks).next().unwrap().unwrap();
        decoded.push((csa.res_nums, csa.csa, relax.res_names, relax.data));
        tags.push(blocks[1].tables[2].column_names.clone());
    }

    assert_eq!(decoded[0], decoded[1]);
    assert_ne!(tags[0], tags[1]);
    assert!(tags[0].contains(&"_T2_value".to_string()));
    assert!(tags[1].contains(&"_T2.Val".to_string()));
}

#[test]
fn test_legacy_blocks_under_current_dictionary() {
    let mut legacy = open_dictionary(DictVersion::V2_1).unwrap();
    let mut blocks = Vec::new();
    legacy.relaxation.add(&mut blocks, RelaxKind::R1, &common::relax_entry()).unwrap();
    legacy.citations.add(&mut blocks, &common::citation_entry()).unwrap();

    let current = open_dictionary(DictVersion::V3_1).unwrap();
    let results: Vec<_> = current.relaxation.each(&blocks).collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(StarError::VersionMismatch { .. })));

    let citations: Vec<_> = current.citations.each(&blocks).collect();
    assert!(matches!(citations.as_slice(), [Err(StarError::VersionMismatch { .. })]));
}

#[test]
fn test_families_missing_from_legacy_dictionary() {
    let mut dict = open_dictionary(DictVersion::V2_1).unwrap();
    let mut blocks = Vec::new();
    let err = dict.tensor.add(&mut blocks, &tensor_entry()).unwrap_err();
    assert!(matches!(err, StarError::VersionMismatch { .. }));
    assert!(blocks.is_empty());
    assert!(dict.model_free.is_supported());

    let scanned: Vec<_> = dict.auto_relaxation.each(&blocks).collect();
    assert!(matches!(scanned.as_slice(), [Err(StarError::VersionMismatch { .. })]));
}

#[test]
fn test_unreadable_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.str");
    std::fs::write(&path, "data_broken\nsave_frame\n   _Tag.Name  'unterminated\n").unwrap();

    let mut file = NmrStarFile::new(&path, &DictionaryConfig::default());
    assert!(matches!(file.read(), Err(StarError::Parse { .. })));
    assert!(file.blocks.is_empty());

    let mut missing = NmrStarFile::new(dir.path().join("absent.str"), &DictionaryConfig::default());
    assert!(matches!(missing.read(), Err(StarError::IoError(_))));
}
