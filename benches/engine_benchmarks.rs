#![allow(missing_docs)]
//! Benchmarks for the nmrstar saveframe engine.
//!
//! Measures building relaxation saveframes, decoding them back, and the STAR
//! text render/parse round trip using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nmrstar::relaxation::{RelaxEntry, RelaxKind};
use nmrstar::star::{parse, render};
use nmrstar::{open_dictionary, Block, DictVersion};

/// An R1 data set with `n` residues.
fn relax_entry(n: usize) -> RelaxEntry {
    let nums: Vec<i64> = (1..=n as i64).collect();
    RelaxEntry {
        frq: Some(600.0),
        entity_ids: vec![Some(1); n],
        res_nums: nums.iter().copied().map(Some).collect(),
        res_names: vec![Some("ALA".to_string()); n],
        atom_names: vec![Some("N".to_string()); n],
        isotopes: vec![Some(15); n],
        data: nums.iter().map(|i| Some(1.0 + *i as f64 / 1000.0)).collect(),
        errors: vec![Some(0.02); n],
        ..RelaxEntry::default()
    }
}

/// One saveframe of each relaxation kind per field strength.
fn relax_blocks(version: DictVersion, residues: usize) -> Vec<Block> {
    let mut dict = open_dictionary(version).expect("dictionary");
    let mut blocks = Vec::new();
    let entry = relax_entry(residues);
    for kind in [RelaxKind::R1, RelaxKind::R2] {
        for frq in [500.0, 600.0, 800.0] {
            let entry = RelaxEntry {
                frq: Some(frq),
                ..entry.clone()
            };
            dict.relaxation.add(&mut blocks, kind, &entry).expect("add");
        }
    }
    blocks
}

fn benchmark_add(c: &mut Criterion) {
    let mut group = c.benchmark_group("relaxation_add");
    for residues in [100, 1_000] {
        let entry = relax_entry(residues);
        group.bench_with_input(BenchmarkId::from_parameter(residues), &entry, |b, entry| {
            b.iter(|| {
                let mut dict = open_dictionary(DictVersion::V3_1).expect("dictionary");
                let mut blocks = Vec::new();
                dict.relaxation
                    .add(&mut blocks, RelaxKind::R1, black_box(entry))
                    .expect("add");
                blocks
            });
        });
    }
    group.finish();
}

fn benchmark_each(c: &mut Criterion) {
    let blocks = relax_blocks(DictVersion::V3_1, 1_000);
    let dict = open_dictionary(DictVersion::V3_1).expect("dictionary");

    c.bench_function("relaxation_each_6x1k", |b| {
        b.iter(|| dict.relaxation.each(black_box(&blocks)).filter(Result::is_ok).count());
    });
}

fn benchmark_text_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("star_text");
    for version in DictVersion::ALL {
        let blocks = relax_blocks(version, 1_000);
        let text = render("bench", &blocks);

        group.bench_with_input(BenchmarkId::new("render", version), &blocks, |b, blocks| {
            b.iter(|| render("bench", black_box(blocks)));
        });
        group.bench_with_input(BenchmarkId::new("parse", version), &text, |b, text| {
            b.iter(|| parse(black_box(text)).expect("parse"));
        });
    }
    group.finish();
}

criterion_group!(benches, benchmark_add, benchmark_each, benchmark_text_round_trip);
criterion_main!(benches);
