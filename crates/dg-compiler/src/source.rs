use std::collections::BTreeMap;

use dg_core::DialogueError;
use dg_parser::{parse_xml_document, XmlElementNode};

use crate::dialogue_json::RawDialogue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SourceKind {
    DialogueXml,
    DialogueJson,
    SequenceXml,
}

#[derive(Debug, Clone)]
pub(crate) enum SourceFile {
    DialogueXml(XmlElementNode),
    DialogueJson(RawDialogue),
    SequenceXml(XmlElementNode),
}

pub(crate) fn parse_sources(
    sources_by_path: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, SourceFile>, DialogueError> {
    let mut sources = BTreeMap::new();

    for (raw_path, source_text) in sources_by_path {
        let file_path = normalize_virtual_path(raw_path);
        let kind = detect_source_kind(&file_path).ok_or_else(|| {
            DialogueError::new(
                "SOURCE_KIND_UNSUPPORTED",
                format!("Unsupported source extension: {}", file_path),
            )
        })?;

        let source = match kind {
            SourceKind::DialogueJson => {
                let raw = serde_json::from_str::<RawDialogue>(source_text).map_err(|error| {
                    DialogueError::new(
                        "JSON_PARSE_ERROR",
                        format!("Failed to parse dialogue JSON \"{}\": {}", file_path, error),
                    )
                })?;
                SourceFile::DialogueJson(raw)
            }
            SourceKind::DialogueXml => {
                SourceFile::DialogueXml(parse_xml_document(source_text)?.root)
            }
            SourceKind::SequenceXml => {
                SourceFile::SequenceXml(parse_xml_document(source_text)?.root)
            }
        };

        tracing::trace!(path = %file_path, kind = ?kind, "parsed source");
        sources.insert(file_path, source);
    }

    Ok(sources)
}

pub(crate) fn detect_source_kind(path: &str) -> Option<SourceKind> {
    if path.ends_with(".dialogue.xml") {
        Some(SourceKind::DialogueXml)
    } else if path.ends_with(".dialogue.json") {
        Some(SourceKind::DialogueJson)
    } else if path.ends_with(".sequence.xml") {
        Some(SourceKind::SequenceXml)
    } else {
        None
    }
}

pub fn normalize_virtual_path(path: &str) -> String {
    let mut stack: Vec<&str> = Vec::new();
    let replaced = path.replace('\\', "/");
    for part in replaced.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            stack.pop();
            continue;
        }
        stack.push(part);
    }
    stack.join("/")
}
