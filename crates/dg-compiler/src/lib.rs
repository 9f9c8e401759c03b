use std::collections::BTreeMap;
use std::sync::Arc;

use dg_core::{DialogueError, DialogueScript, SequenceManifest};

mod dialogue_json;
mod dialogue_xml;
mod sequence_xml;
mod source;
mod validate;
mod xml_utils;

pub use source::normalize_virtual_path;
pub use validate::CompileWarning;

use source::{parse_sources, SourceFile};

#[derive(Debug, Clone, Default)]
pub struct CompiledProject {
    pub scripts: BTreeMap<String, Arc<DialogueScript>>,
    pub sequences: BTreeMap<String, SequenceManifest>,
    pub warnings: Vec<CompileWarning>,
}

impl CompiledProject {
    pub fn script(&self, name: &str) -> Option<Arc<DialogueScript>> {
        self.scripts.get(name).cloned()
    }

    /// Scripts referenced by a sequence, in play order.
    pub fn scripts_for(
        &self,
        manifest: &SequenceManifest,
    ) -> Result<Vec<Arc<DialogueScript>>, DialogueError> {
        manifest
            .scripts
            .iter()
            .map(|name| {
                self.script(name).ok_or_else(|| {
                    DialogueError::new(
                        "COMPILE_SEQUENCE_SCRIPT_UNKNOWN",
                        format!(
                            "Sequence \"{}\" references unknown dialogue \"{}\".",
                            manifest.name, name
                        ),
                    )
                })
            })
            .collect()
    }
}

pub fn compile_scripts_from_source_map(
    sources_by_path: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, Arc<DialogueScript>>, DialogueError> {
    Ok(compile_project_from_source_map(sources_by_path)?.scripts)
}

pub fn compile_project_from_source_map(
    sources_by_path: &BTreeMap<String, String>,
) -> Result<CompiledProject, DialogueError> {
    let sources = parse_sources(sources_by_path)?;

    let mut scripts = BTreeMap::new();
    let mut sequences = BTreeMap::new();

    for (file_path, source) in &sources {
        match source {
            SourceFile::DialogueXml(root) => {
                let script = dialogue_xml::compile_dialogue(file_path, root)?;
                insert_script(&mut scripts, script, Some(root.location.clone()))?;
            }
            SourceFile::DialogueJson(raw) => {
                let script = dialogue_json::compile_dialogue(file_path, raw.clone())?;
                insert_script(&mut scripts, script, None)?;
            }
            SourceFile::SequenceXml(root) => {
                let manifest = sequence_xml::compile_sequence(file_path, root)?;
                if sequences.contains_key(&manifest.name) {
                    return Err(DialogueError::with_span(
                        "COMPILE_SEQUENCE_NAME_DUPLICATE",
                        format!("Duplicate sequence name \"{}\".", manifest.name),
                        root.location.clone(),
                    ));
                }
                sequences.insert(manifest.name.clone(), manifest);
            }
        }
    }

    validate::validate_sequence_references(&sequences, &scripts)?;
    let warnings = validate::collect_target_warnings(&scripts);

    tracing::debug!(
        scripts = scripts.len(),
        sequences = sequences.len(),
        warnings = warnings.len(),
        "compiled dialogue project"
    );

    Ok(CompiledProject {
        scripts,
        sequences,
        warnings,
    })
}

fn insert_script(
    scripts: &mut BTreeMap<String, Arc<DialogueScript>>,
    script: DialogueScript,
    span: Option<dg_core::SourceSpan>,
) -> Result<(), DialogueError> {
    if scripts.contains_key(&script.name) {
        let message = format!("Duplicate dialogue name \"{}\".", script.name);
        return Err(match span {
            Some(span) => {
                DialogueError::with_span("COMPILE_SCRIPT_NAME_DUPLICATE", message, span)
            }
            None => DialogueError::new("COMPILE_SCRIPT_NAME_DUPLICATE", message),
        });
    }
    scripts.insert(script.name.clone(), Arc::new(script));
    Ok(())
}

#[cfg(test)]
mod compiler_test_support;
