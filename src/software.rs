//! Software saveframes: a program, its citations, tasks and vendor.

use crate::bind;
use crate::category::CategorySpec;
use crate::field::{FieldSpec, Source};
use crate::naming::{CategoryNaming, SaveframeNaming};
use crate::saveframe::SaveframeDef;
use crate::version::DictVersion;

/// One program used in the analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SoftwareEntry {
    /// Program name, required. Also the saveframe name.
    pub name: Option<String>,
    /// Program version.
    pub version: Option<String>,
    /// Vendor name.
    pub vendor_name: Option<String>,
    /// Vendor postal address.
    pub vendor_address: Option<String>,
    /// Vendor e-mail or web address.
    pub vendor_eaddress: Option<String>,
    /// IDs of citation saveframes describing the program.
    pub cite_ids: Vec<Option<i64>>,
    /// Tasks the program performed, e.g. `data analysis`.
    pub tasks: Vec<Option<String>>,
}

fn framecode(entry: &SoftwareEntry, count: u32) -> String {
    entry
        .name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .map_or_else(|| format!("software {count}"), str::to_string)
}

/// The software saveframe definition.
#[must_use]
pub fn definition() -> SaveframeDef<SoftwareEntry> {
    SaveframeDef {
        label: "software",
        categories: vec![
            CategorySpec::free(
                "Software",
                vec![
                    FieldSpec::new("SfCategory", Source::Marker),
                    FieldSpec::new("SfFramecode", Source::Framecode),
                    FieldSpec::new("SoftwareID", Source::ListId).int(),
                    FieldSpec::attr("Name", bind!(SoftwareEntry, name)).required(),
                    FieldSpec::attr("Version", bind!(SoftwareEntry, version)),
                ],
            ),
            CategorySpec::looped(
                "Software_citation",
                vec![
                    FieldSpec::attr("CitationID", bind!(SoftwareEntry, cite_ids)).int(),
                    FieldSpec::new("SoftwareID", Source::ListId).int(),
                ],
            ),
            CategorySpec::looped(
                "Task",
                vec![
                    FieldSpec::attr("Task", bind!(SoftwareEntry, tasks)),
                    FieldSpec::new("SoftwareID", Source::ListId).int(),
                ],
            ),
            CategorySpec::looped(
                "Vendor",
                vec![
                    FieldSpec::attr("Name", bind!(SoftwareEntry, vendor_name)),
                    FieldSpec::attr("Address", bind!(SoftwareEntry, vendor_address)),
                    FieldSpec::attr("ElectronicAddress", bind!(SoftwareEntry, vendor_eaddress)),
                    FieldSpec::new("SoftwareID", Source::ListId).int(),
                ],
            ),
        ],
        naming,
        framecode,
        validate: None,
    }
}

const SOFTWARE_V2_1: CategoryNaming = crate::naming!(None, [
    "SfCategory" => "Saveframe_category",
    "Name" => "Name",
    "Version" => "Version",
]);

const SOFTWARE_V3_1: CategoryNaming = crate::naming!(Some("Software"), [
    "SfCategory" => "Sf_category",
    "SfFramecode" => "Sf_framecode",
    "SoftwareID" => "ID",
    "Name" => "Name",
    "Version" => "Version",
]);

const CITATION_V2_1: CategoryNaming = crate::naming!(None, [
    "CitationID" => "Citation_ID",
]);

const CITATION_V3_1: CategoryNaming = crate::naming!(Some("Software_citation"), [
    "CitationID" => "Citation_ID",
    "SoftwareID" => "Software_ID",
]);

const TASK_V2_1: CategoryNaming = crate::naming!(None, [
    "Task" => "Task",
]);

const TASK_V3_1: CategoryNaming = crate::naming!(Some("Task"), [
    "Task" => "Task",
    "SoftwareID" => "Software_ID",
]);

const VENDOR_V2_1: CategoryNaming = crate::naming!(None, [
    "Name" => "Vendor",
    "Address" => "Vendor_address",
    "ElectronicAddress" => "Vendor_electronic_address",
]);

const VENDOR_V3_1: CategoryNaming = crate::naming!(Some("Vendor"), [
    "Name" => "Name",
    "Address" => "Address",
    "ElectronicAddress" => "Electronic_address",
    "SoftwareID" => "Software_ID",
]);

fn naming(version: DictVersion) -> Option<SaveframeNaming> {
    Some(match version {
        DictVersion::V2_1 => SaveframeNaming {
            marker: "software",
            categories: &[SOFTWARE_V2_1, CITATION_V2_1, TASK_V2_1, VENDOR_V2_1],
        },
        DictVersion::V3_1 => SaveframeNaming {
            marker: "software",
            categories: &[SOFTWARE_V3_1, CITATION_V3_1, TASK_V3_1, VENDOR_V3_1],
        },
    })
}
