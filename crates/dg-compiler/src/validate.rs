use std::collections::BTreeMap;
use std::sync::Arc;

use dg_core::{DialogueError, DialogueScript, SequenceManifest, END_OF_SCRIPT};

/// Non-fatal finding about authored content. Out-of-range targets still
/// play; they simply end the dialogue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompileWarning {
    pub code: String,
    pub script_name: String,
    pub entry_index: usize,
    pub message: String,
}

pub(crate) fn validate_sequence_references(
    sequences: &BTreeMap<String, SequenceManifest>,
    scripts: &BTreeMap<String, Arc<DialogueScript>>,
) -> Result<(), DialogueError> {
    for manifest in sequences.values() {
        if let Some(missing) = manifest
            .scripts
            .iter()
            .find(|name| !scripts.contains_key(name.as_str()))
        {
            return Err(DialogueError::new(
                "COMPILE_SEQUENCE_SCRIPT_UNKNOWN",
                format!(
                    "Sequence \"{}\" references unknown dialogue \"{}\".",
                    manifest.name, missing
                ),
            ));
        }
    }
    Ok(())
}

pub(crate) fn collect_target_warnings(
    scripts: &BTreeMap<String, Arc<DialogueScript>>,
) -> Vec<CompileWarning> {
    let mut warnings = Vec::new();
    for script in scripts.values() {
        let count = script.entries.len();
        for (index, entry) in script.entries.iter().enumerate() {
            let mut targets = vec![("next", entry.next_entry_index)];
            if let Some(options) = &entry.options {
                targets.push(("top option", options.top.next_entry_index));
                targets.push(("bottom option", options.bottom.next_entry_index));
            }
            for (label, target) in targets {
                if target == END_OF_SCRIPT || (target >= 0 && (target as usize) < count) {
                    continue;
                }
                let warning = CompileWarning {
                    code: "COMPILE_TARGET_OUT_OF_RANGE".to_string(),
                    script_name: script.name.clone(),
                    entry_index: index,
                    message: format!(
                        "Entry {} {} target {} is outside 0..{}; it will end the dialogue.",
                        index, label, target, count
                    ),
                };
                tracing::warn!(
                    script = %warning.script_name,
                    entry = index,
                    target,
                    "{}",
                    warning.message
                );
                warnings.push(warning);
            }
        }
    }
    warnings
}
