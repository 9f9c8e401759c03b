use dg_core::{DialogueConfig, DialogueError, PopupSpec, SequenceManifest};
use dg_parser::XmlElementNode;

use crate::xml_utils::{
    get_optional_attr, get_required_non_empty_attr, parse_bool_attr, parse_u64_attr,
    require_valid_name,
};

pub(crate) fn compile_sequence(
    file_path: &str,
    root: &XmlElementNode,
) -> Result<SequenceManifest, DialogueError> {
    if root.name != "sequence" {
        return Err(DialogueError::with_span(
            "XML_ROOT_INVALID",
            format!(
                "Expected <sequence> root in file \"{}\", got <{}>.",
                file_path, root.name
            ),
            root.location.clone(),
        ));
    }

    let name = get_required_non_empty_attr(root, "name")?;
    require_valid_name(root, &name)?;
    let config = parse_config(root)?;

    let mut scripts = Vec::new();
    let mut popups = Vec::new();
    for child in root.child_elements() {
        match child.name.as_str() {
            "play" => {
                let dialogue = get_required_non_empty_attr(child, "dialogue")?;
                require_valid_name(child, &dialogue)?;
                scripts.push(dialogue);
            }
            "popup" => {
                let id = get_required_non_empty_attr(child, "id")?;
                popups.push(PopupSpec {
                    id,
                    title: get_optional_attr(child, "title")
                        .unwrap_or_default()
                        .trim()
                        .to_string(),
                    body: child.own_text(),
                });
            }
            other => {
                return Err(DialogueError::with_span(
                    "COMPILE_SEQUENCE_CHILD_INVALID",
                    format!(
                        "Unexpected <{}> in <sequence>; expected <play> or <popup>.",
                        other
                    ),
                    child.location.clone(),
                ));
            }
        }
    }

    if scripts.is_empty() {
        return Err(DialogueError::with_span(
            "COMPILE_SEQUENCE_EMPTY",
            format!("Sequence \"{}\" does not play any dialogue.", name),
            root.location.clone(),
        ));
    }

    Ok(SequenceManifest {
        name,
        scripts,
        popups,
        config,
    })
}

fn parse_config(root: &XmlElementNode) -> Result<DialogueConfig, DialogueError> {
    let defaults = DialogueConfig::default();
    Ok(DialogueConfig {
        typing_interval_ms: parse_u64_attr(
            root,
            "typing-interval-ms",
            defaults.typing_interval_ms,
        )?,
        fade_in_ms: parse_u64_attr(root, "fade-in-ms", defaults.fade_in_ms)?,
        fade_out_ms: parse_u64_attr(root, "fade-out-ms", defaults.fade_out_ms)?,
        auto_advance: parse_bool_attr(root, "auto-advance", defaults.auto_advance)?,
        popups_after_dialogue: parse_bool_attr(
            root,
            "popups-after-dialogue",
            defaults.popups_after_dialogue,
        )?,
    })
}
