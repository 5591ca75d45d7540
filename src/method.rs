//! Method saveframes: an analysis protocol with its script and parameter file.
//!
//! The method name is the saveframe framecode, so it is read back from the
//! `Sf_framecode` tag. Version 2.1 has no framecode tag and the name is
//! then only used to name the block.

use crate::bind;
use crate::category::CategorySpec;
use crate::field::{FieldSpec, Source};
use crate::naming::{CategoryNaming, SaveframeNaming};
use crate::saveframe::SaveframeDef;
use crate::version::DictVersion;

/// One method.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MethodEntry {
    /// Method name, required.
    pub name: Option<String>,
    /// Free text details.
    pub details: Option<String>,
    /// IDs of citation saveframes describing the method.
    pub cite_ids: Vec<Option<i64>>,
    /// Name of the method file (script), required.
    pub file_name: Option<String>,
    /// Full text of the method file, required.
    pub file_text: Option<String>,
    /// Name of the parameter file.
    pub param_file_name: Option<String>,
    /// Full text of the parameter file.
    pub param_file_text: Option<String>,
}

fn framecode(entry: &MethodEntry, count: u32) -> String {
    entry
        .name
        .as_deref()
        .filter(|name| !name.trim().is_empty())
        .map_or_else(|| format!("method {count}"), str::to_string)
}

/// The method saveframe definition.
#[must_use]
pub fn definition() -> SaveframeDef<MethodEntry> {
    SaveframeDef {
        label: "method",
        categories: vec![
            CategorySpec::free(
                "Method",
                vec![
                    FieldSpec::new("SfCategory", Source::Marker),
                    FieldSpec::attr("SfFramecode", bind!(MethodEntry, name)).required(),
                    FieldSpec::new("MethodID", Source::ListId).int(),
                    FieldSpec::attr("Details", bind!(MethodEntry, details)),
                ],
            ),
            CategorySpec::looped(
                "Method_citation",
                vec![
                    FieldSpec::attr("CitationID", bind!(MethodEntry, cite_ids)).int(),
                    FieldSpec::new("MethodID", Source::ListId).int(),
                ],
            ),
            CategorySpec::looped(
                "Method_file",
                vec![
                    FieldSpec::attr("Name", bind!(MethodEntry, file_name)).required(),
                    FieldSpec::unbound("TextFormat"),
                    FieldSpec::attr("Text", bind!(MethodEntry, file_text)).required(),
                    FieldSpec::new("MethodID", Source::ListId).int(),
                ],
            ),
            CategorySpec::looped(
                "Method_param",
                vec![
                    FieldSpec::attr("FileName", bind!(MethodEntry, param_file_name)),
                    FieldSpec::unbound("TextFormat"),
                    FieldSpec::attr("Text", bind!(MethodEntry, param_file_text)),
                    FieldSpec::new("MethodID", Source::ListId).int(),
                ],
            ),
        ],
        naming,
        framecode,
        validate: None,
    }
}

const METHOD_V2_1: CategoryNaming = crate::naming!(None, [
    "SfCategory" => "Saveframe_category",
    "Details" => "Details",
]);

const METHOD_V3_1: CategoryNaming = crate::naming!(Some("Method"), [
    "SfCategory" => "Sf_category",
    "SfFramecode" => "Sf_framecode",
    "MethodID" => "ID",
    "Details" => "Details",
]);

const CITATION_V2_1: CategoryNaming = crate::naming!(None, [
    "CitationID" => "Citation_ID",
]);

const CITATION_V3_1: CategoryNaming = crate::naming!(Some("Method_citation"), [
    "CitationID" => "Citation_ID",
    "MethodID" => "Method_ID",
]);

const FILE_V2_1: CategoryNaming = crate::naming!(None, [
    "Name" => "Method_file_name",
    "TextFormat" => "Method_file_text_format",
    "Text" => "Method_file_text",
]);

const FILE_V3_1: CategoryNaming = crate::naming!(Some("Method_file"), [
    "Name" => "Name",
    "TextFormat" => "Text_format",
    "Text" => "Text",
    "MethodID" => "Method_ID",
]);

const PARAM_V2_1: CategoryNaming = crate::naming!(None, [
    "FileName" => "Param_file_name",
    "TextFormat" => "Param_file_text_format",
    "Text" => "Param_file_text",
]);

const PARAM_V3_1: CategoryNaming = crate::naming!(Some("Method_param"), [
    "FileName" => "File_name",
    "TextFormat" => "Text_format",
    "Text" => "Text",
    "MethodID" => "Method_ID",
]);

fn naming(version: DictVersion) -> Option<SaveframeNaming> {
    Some(match version {
        DictVersion::V2_1 => SaveframeNaming {
            marker: "method",
            categories: &[METHOD_V2_1, CITATION_V2_1, FILE_V2_1, PARAM_V2_1],
        },
        DictVersion::V3_1 => SaveframeNaming {
            marker: "method",
            categories: &[METHOD_V3_1, CITATION_V3_1, FILE_V3_1, PARAM_V3_1],
        },
    })
}
