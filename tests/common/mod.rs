//! Common test fixtures shared across the integration test suite.

#![allow(dead_code)]

use nmrstar::citations::{Author, CitationEntry};
use nmrstar::relaxation::RelaxEntry;
use nmrstar::software::SoftwareEntry;

/// Route library logs to the test harness output.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// The two-residue R1 data set used throughout the end-to-end scenarios.
pub fn relax_entry() -> RelaxEntry {
    RelaxEntry {
        frq: Some(600.0),
        entity_ids: vec![Some(1), Some(1)],
        res_nums: vec![Some(1), Some(2)],
        res_names: vec![Some("ALA".into()), Some("GLY".into())],
        atom_names: vec![Some("N".into()), Some("N".into())],
        isotopes: vec![Some(15), Some(15)],
        data: vec![Some(1.2), Some(1.5)],
        errors: vec![Some(0.1), Some(0.1)],
        ..RelaxEntry::default()
    }
}

/// An R1 data set of `n` residues, values derived from the residue number.
pub fn relax_entry_with(n: usize, frq: f64) -> RelaxEntry {
    let nums: Vec<i64> = (1..=n as i64).collect();
    RelaxEntry {
        frq: Some(frq),
        entity_ids: vec![Some(1); n],
        res_nums: nums.iter().copied().map(Some).collect(),
        res_names: nums.iter().map(|_| Some("LYS".to_string())).collect(),
        atom_names: vec![Some("N".to_string()); n],
        isotopes: vec![Some(15); n],
        data: nums.iter().map(|i| Some(1.0 + *i as f64 / 100.0)).collect(),
        errors: vec![Some(0.05); n],
        ..RelaxEntry::default()
    }
}

/// The NOE variant of [`relax_entry`] with the 3.1 required annotations.
pub fn noe_entry() -> RelaxEntry {
    RelaxEntry {
        temp_calibration: Some("methanol".into()),
        temp_control: Some("single scan interleaving".into()),
        peak_intensity_type: Some("peak height".into()),
        data: vec![Some(0.78), Some(0.81)],
        errors: vec![Some(0.02), Some(0.03)],
        ..relax_entry()
    }
}

/// A published journal citation with two authors.
pub fn citation_entry() -> CitationEntry {
    let mut citation = CitationEntry {
        title: Some("Model-free analysis of protein dynamics".into()),
        journal_abbrev: Some("J. Biomol. NMR".into()),
        journal_full: Some("Journal of Biomolecular NMR".into()),
        volume: Some("40".into()),
        issue: Some("2".into()),
        page_first: Some("107".into()),
        page_last: Some("119".into()),
        status: Some("published".into()),
        citation_type: Some("journal".into()),
        year: Some(2008),
        ..CitationEntry::default()
    };
    citation.push_author(Author::new("Edward", "d'Auvergne").initials("E.", "J."));
    citation.push_author(Author::new("Paul", "Gooley").initials("P.", "R."));
    // An all-missing column reads back as unset.
    citation.family_titles.clear();
    citation
}

/// The relax program with two tasks and one citation.
pub fn software_entry() -> SoftwareEntry {
    SoftwareEntry {
        name: Some("relax".into()),
        version: Some("1.3".into()),
        vendor_name: Some("The relax development team".into()),
        vendor_eaddress: Some("http://www.nmr-relax.com".into()),
        cite_ids: vec![Some(1)],
        tasks: vec![Some("data analysis".into()), Some("model-free fitting".into())],
        ..SoftwareEntry::default()
    }
}
