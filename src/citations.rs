//! Citation saveframes: bibliographic data and the author list.
//!
//! # Examples
//!
//! ```
//! use nmrstar::citations::{self, Author, CitationEntry};
//! use nmrstar::saveframe::Saveframe;
//! use nmrstar::DictVersion;
//!
//! let mut saveframe = Saveframe::new(citations::definition(), DictVersion::V3_1).unwrap();
//! let mut entry = CitationEntry {
//!     title: Some("Model-free analysis of protein dynamics".into()),
//!     year: Some(2008),
//!     ..CitationEntry::default()
//! };
//! entry.push_author(Author::new("Edward", "d'Auvergne").initials("E.", "J."));
//!
//! let mut blocks = Vec::new();
//! saveframe.add(&mut blocks, &entry).unwrap();
//! assert_eq!(blocks[0].name, "citation_1");
//!
//! let decoded = saveframe.each(&blocks).next().unwrap().unwrap();
//! assert_eq!(decoded.authors()[0].family_name, "d'Auvergne");
//! ```

use crate::bind;
use crate::category::CategorySpec;
use crate::field::{FieldSpec, Source};
use crate::naming::{CategoryNaming, SaveframeNaming};
use crate::saveframe::SaveframeDef;
use crate::version::DictVersion;

/// Legal publication states.
pub const STATUSES: &[&str] = &["in preparation", "in press", "published", "retracted", "submitted"];

/// Legal publication types.
pub const TYPES: &[&str] = &[
    "abstract",
    "BMRB only",
    "book",
    "book chapter",
    "internet",
    "journal",
    "personal communication",
    "thesis",
];

/// One citation.
///
/// Authors are stored column-wise; [`CitationEntry::push_author`] and
/// [`CitationEntry::authors`] convert from and to per-author records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CitationEntry {
    /// Saveframe name. `None` or `citation` produce `citation <n>`. Not
    /// read back.
    pub citation_label: Option<String>,
    /// Chemical Abstracts code.
    pub cas_abstract_code: Option<String>,
    /// MEDLINE UI code.
    pub medline_ui_code: Option<String>,
    /// DOI, e.g. `10.1000/182`.
    pub doi: Option<String>,
    /// PubMed ID.
    pub pubmed_id: Option<i64>,
    /// Full citation text, may span several lines.
    pub full_citation: Option<String>,
    /// Publication title.
    pub title: Option<String>,
    /// One of [`STATUSES`], defaults to `published`.
    pub status: Option<String>,
    /// One of [`TYPES`], defaults to `journal`.
    pub citation_type: Option<String>,
    /// CAS journal abbreviation.
    pub journal_abbrev: Option<String>,
    /// Full journal name.
    pub journal_full: Option<String>,
    /// Journal volume.
    pub volume: Option<String>,
    /// Journal issue.
    pub issue: Option<String>,
    /// First page.
    pub page_first: Option<String>,
    /// Last page.
    pub page_last: Option<String>,
    /// Publication year.
    pub year: Option<i64>,

    /// Author given names.
    pub given_names: Vec<Option<String>>,
    /// Author family names.
    pub family_names: Vec<Option<String>>,
    /// Author first initials (3.1 only).
    pub first_initials: Vec<Option<String>>,
    /// Author middle initials.
    pub middle_initials: Vec<Option<String>>,
    /// Author family titles.
    pub family_titles: Vec<Option<String>>,
}

/// One author of a citation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Author {
    /// Given name.
    pub given_name: String,
    /// Family name.
    pub family_name: String,
    /// First initial, e.g. `E.`.
    pub first_initial: Option<String>,
    /// Middle initials, e.g. `J.`.
    pub middle_initials: Option<String>,
    /// Family title, e.g. `Jr.`.
    pub family_title: Option<String>,
}

impl Author {
    /// An author with given and family name only.
    #[must_use]
    pub fn new(given_name: impl Into<String>, family_name: impl Into<String>) -> Self {
        Author {
            given_name: given_name.into(),
            family_name: family_name.into(),
            ..Author::default()
        }
    }

    /// Set the first and middle initials.
    #[must_use]
    pub fn initials(mut self, first: impl Into<String>, middle: impl Into<String>) -> Self {
        self.first_initial = Some(first.into());
        self.middle_initials = Some(middle.into());
        self
    }
}

impl CitationEntry {
    /// Append an author.
    pub fn push_author(&mut self, author: Author) {
        self.given_names.push(Some(author.given_name));
        self.family_names.push(Some(author.family_name));
        self.first_initials.push(author.first_initial);
        self.middle_initials.push(author.middle_initials);
        self.family_titles.push(author.family_title);
    }

    /// The authors as records, in ordinal order.
    ///
    /// Columns that are shorter than the family names (for instance unset
    /// optional columns) read as missing.
    #[must_use]
    pub fn authors(&self) -> Vec<Author> {
        let at = |column: &[Option<String>], i: usize| column.get(i).cloned().flatten();
        (0..self.family_names.len())
            .map(|i| Author {
                given_name: at(&self.given_names, i).unwrap_or_default(),
                family_name: at(&self.family_names, i).unwrap_or_default(),
                first_initial: at(&self.first_initials, i),
                middle_initials: at(&self.middle_initials, i),
                family_title: at(&self.family_titles, i),
            })
            .collect()
    }
}

fn framecode(entry: &CitationEntry, count: u32) -> String {
    match entry.citation_label.as_deref() {
        Some(label) if label != "citation" && !label.trim().is_empty() => label.to_string(),
        _ => format!("citation {count}"),
    }
}

/// The citation saveframe definition.
#[must_use]
pub fn definition() -> SaveframeDef<CitationEntry> {
    SaveframeDef {
        label: "citations",
        categories: vec![
            CategorySpec::free(
                "Citation",
                vec![
                    FieldSpec::new("SfCategory", Source::Marker),
                    FieldSpec::new("SfFramecode", Source::Framecode),
                    FieldSpec::new("CitationID", Source::ListId).int(),
                    FieldSpec::attr("CASAbstractCode", bind!(CitationEntry, cas_abstract_code)),
                    FieldSpec::attr("MEDLINEUICode", bind!(CitationEntry, medline_ui_code)),
                    FieldSpec::attr("DOI", bind!(CitationEntry, doi)),
                    FieldSpec::attr("PubMedID", bind!(CitationEntry, pubmed_id)).int(),
                    FieldSpec::attr("FullCitation", bind!(CitationEntry, full_citation)),
                    FieldSpec::attr("Title", bind!(CitationEntry, title)),
                    FieldSpec::attr("Status", bind!(CitationEntry, status))
                        .default("published")
                        .allowed(STATUSES),
                    FieldSpec::attr("Type", bind!(CitationEntry, citation_type))
                        .default("journal")
                        .allowed(TYPES),
                    FieldSpec::attr("JournalAbbrev", bind!(CitationEntry, journal_abbrev)),
                    FieldSpec::attr("JournalNameFull", bind!(CitationEntry, journal_full)),
                    FieldSpec::attr("JournalVolume", bind!(CitationEntry, volume)),
                    FieldSpec::attr("JournalIssue", bind!(CitationEntry, issue)),
                    FieldSpec::attr("PageFirst", bind!(CitationEntry, page_first)),
                    FieldSpec::attr("PageLast", bind!(CitationEntry, page_last)),
                    FieldSpec::attr("Year", bind!(CitationEntry, year)).int(),
                ],
            ),
            CategorySpec::looped(
                "Citation_author",
                vec![
                    FieldSpec::new("Ordinal", Source::RowIds).int(),
                    FieldSpec::attr("GivenName", bind!(CitationEntry, given_names)),
                    FieldSpec::attr("FamilyName", bind!(CitationEntry, family_names)),
                    FieldSpec::attr("FirstInitial", bind!(CitationEntry, first_initials)),
                    FieldSpec::attr("MiddleInitials", bind!(CitationEntry, middle_initials)),
                    FieldSpec::attr("FamilyTitle", bind!(CitationEntry, family_titles)),
                    FieldSpec::new("CitationID", Source::ListId).int(),
                ],
            ),
        ],
        naming,
        framecode,
        validate: None,
    }
}

const CITATION_V2_1: CategoryNaming = crate::naming!(None, [
    "SfCategory" => "Saveframe_category",
    "DOI" => "DOI",
    "PubMedID" => "PubMed_ID",
    "FullCitation" => "Citation_full",
    "Title" => "Citation_title",
    "Status" => "Citation_status",
    "Type" => "Citation_type",
    "JournalAbbrev" => "Journal_abbreviation",
    "JournalVolume" => "Journal_volume",
    "JournalIssue" => "Journal_issue",
    "PageFirst" => "Page_first",
    "PageLast" => "Page_last",
    "Year" => "Year",
]);

const CITATION_V3_1: CategoryNaming = crate::naming!(Some("Citation"), [
    "SfCategory" => "Sf_category",
    "SfFramecode" => "Sf_framecode",
    "CitationID" => "ID",
    "CASAbstractCode" => "CAS_abstract_code",
    "MEDLINEUICode" => "MEDLINE_UI_code",
    "DOI" => "DOI",
    "PubMedID" => "PubMed_ID",
    "FullCitation" => "Full_citation",
    "Title" => "Title",
    "Status" => "Status",
    "Type" => "Type",
    "JournalAbbrev" => "Journal_abbrev",
    "JournalNameFull" => "Journal_name_full",
    "JournalVolume" => "Journal_volume",
    "JournalIssue" => "Journal_issue",
    "PageFirst" => "Page_first",
    "PageLast" => "Page_last",
    "Year" => "Year",
]);

const AUTHOR_V2_1: CategoryNaming = crate::naming!(None, [
    "Ordinal" => "Author_ordinal",
    "GivenName" => "Author_given_name",
    "FamilyName" => "Author_family_name",
    "MiddleInitials" => "Author_middle_initials",
    "FamilyTitle" => "Author_family_title",
]);

const AUTHOR_V3_1: CategoryNaming = crate::naming!(Some("Citation_author"), [
    "Ordinal" => "Ordinal",
    "GivenName" => "Given_name",
    "FamilyName" => "Family_name",
    "FirstInitial" => "First_initial",
    "MiddleInitials" => "Middle_initials",
    "FamilyTitle" => "Family_title",
    "CitationID" => "Citation_ID",
]);

fn naming(version: DictVersion) -> Option<SaveframeNaming> {
    Some(match version {
        DictVersion::V2_1 => SaveframeNaming {
            marker: "citation",
            categories: &[CITATION_V2_1, AUTHOR_V2_1],
        },
        DictVersion::V3_1 => SaveframeNaming {
            marker: "citations",
            categories: &[CITATION_V3_1, AUTHOR_V3_1],
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StarError;
    use crate::saveframe::Saveframe;

    fn entry() -> CitationEntry {
        let mut entry = CitationEntry {
            title: Some("Optimisation of NMR dynamic models".into()),
            journal_abbrev: Some("J. Biomol. NMR".into()),
            volume: Some("40".into()),
            issue: Some("2".into()),
            page_first: Some("107".into()),
            page_last: Some("119".into()),
            year: Some(2008),
            pubmed_id: Some(18_085_410),
            ..CitationEntry::default()
        };
        entry.push_author(Author::new("Edward", "d'Auvergne").initials("E.", "J."));
        entry.push_author(Author::new("Paul", "Gooley").initials("P.", "R."));
        entry
    }

    #[test]
    fn test_authors_round_trip() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        saveframe.add(&mut blocks, &entry()).unwrap();

        let citation = &blocks[0].tables[0];
        assert_eq!(citation.first_value("_Citation.Status"), Some("published"));
        assert_eq!(citation.first_value("_Citation.Type"), Some("journal"));
        assert_eq!(citation.first_value("_Citation.Sf_framecode"), Some("citation 1"));

        let authors = &blocks[0].tables[1];
        assert_eq!(authors.column("_Citation_author.Ordinal").unwrap(), ["1", "2"]);
        assert_eq!(authors.column("_Citation_author.Family_name").unwrap(), ["d'Auvergne", "Gooley"]);
        // No family titles were given, so the column is all sentinels.
        assert_eq!(authors.column("_Citation_author.Family_title").unwrap(), ["?", "?"]);

        let decoded = saveframe.each(&blocks).next().unwrap().unwrap();
        assert_eq!(decoded.authors(), entry().authors());
        assert_eq!(decoded.year, Some(2008));
        assert!(decoded.citation_label.is_none());
    }

    #[test]
    fn test_custom_label_names_the_block() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        let labelled = CitationEntry {
            citation_label: Some("dAuvergne Gooley 2008".into()),
            ..entry()
        };
        saveframe.add(&mut blocks, &labelled).unwrap();
        saveframe.add(&mut blocks, &entry()).unwrap();
        assert_eq!(blocks[0].name, "dAuvergne_Gooley_2008");
        assert_eq!(blocks[1].name, "citation_2");
    }

    #[test]
    fn test_status_must_be_known() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        let bad = CitationEntry {
            status: Some("lost".into()),
            ..entry()
        };
        let err = saveframe.add(&mut blocks, &bad).unwrap_err();
        assert!(matches!(err.root(), StarError::InvalidValue { field, .. } if field == "status"));
    }

    #[test]
    fn test_v2_1_drops_initials() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V2_1).unwrap();
        let mut blocks = Vec::new();
        saveframe.add(&mut blocks, &entry()).unwrap();
        assert_eq!(blocks[0].tables[0].first_value("_Saveframe_category"), Some("citation"));
        assert_eq!(
            blocks[0].tables[1].column("_Author_middle_initials").unwrap(),
            ["J.", "R."]
        );

        let decoded = saveframe.each(&blocks).next().unwrap().unwrap();
        assert!(decoded.first_initials.is_empty());
        assert_eq!(decoded.authors()[1].given_name, "Paul");
    }

    #[test]
    fn test_blank_label_falls_back_to_numbered_frame() {
        let mut saveframe = Saveframe::new(definition(), DictVersion::V3_1).unwrap();
        let mut blocks = Vec::new();
        let blank = CitationEntry {
            citation_label: Some(String::new()),
            ..entry()
        };
        saveframe.add(&mut blocks, &blank).unwrap();
        assert_eq!(blocks[0].name, "citation_1");
        assert!(crate::star::parse(&crate::star::render("t", &blocks)).is_ok());
    }
}
