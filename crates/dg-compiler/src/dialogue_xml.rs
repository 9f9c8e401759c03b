use dg_core::{
    DialogueEntry, DialogueError, DialogueOption, DialogueScript, EntryContent, OptionPair,
    OptionSide, SpeakerKind, END_OF_SCRIPT,
};
use dg_parser::XmlElementNode;

use crate::xml_utils::{
    get_optional_attr, get_required_non_empty_attr, parse_target_attr, require_valid_name,
};

pub(crate) fn compile_dialogue(
    file_path: &str,
    root: &XmlElementNode,
) -> Result<DialogueScript, DialogueError> {
    if root.name != "dialogue" {
        return Err(DialogueError::with_span(
            "XML_ROOT_INVALID",
            format!(
                "Expected <dialogue> root in file \"{}\", got <{}>.",
                file_path, root.name
            ),
            root.location.clone(),
        ));
    }

    let name = get_required_non_empty_attr(root, "name")?;
    require_valid_name(root, &name)?;

    let entry_nodes = root.child_elements().collect::<Vec<_>>();
    if let Some(unexpected) = entry_nodes.iter().find(|node| node.name != "entry") {
        return Err(DialogueError::with_span(
            "COMPILE_DIALOGUE_CHILD_INVALID",
            format!(
                "Unexpected <{}> in <dialogue>; only <entry> is allowed.",
                unexpected.name
            ),
            unexpected.location.clone(),
        ));
    }

    if entry_nodes.is_empty() {
        return Err(DialogueError::with_span(
            "COMPILE_SCRIPT_EMPTY",
            format!("Dialogue \"{}\" has no entries.", name),
            root.location.clone(),
        ));
    }

    let count = entry_nodes.len();
    let entries = entry_nodes
        .iter()
        .enumerate()
        .map(|(index, node)| compile_entry(node, index, count))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(DialogueScript { name, entries })
}

/// Default successor for an entry with no explicit `next`.
pub(crate) fn implicit_next(index: usize, count: usize) -> i32 {
    if index + 1 < count {
        (index + 1) as i32
    } else {
        END_OF_SCRIPT
    }
}

fn compile_entry(
    node: &XmlElementNode,
    index: usize,
    count: usize,
) -> Result<DialogueEntry, DialogueError> {
    let speaker = get_optional_attr(node, "speaker")
        .unwrap_or_default()
        .trim()
        .to_string();
    let speaker_kind = match get_optional_attr(node, "kind") {
        Some(raw) => SpeakerKind::parse(raw).ok_or_else(|| {
            DialogueError::with_span(
                "COMPILE_SPEAKER_KIND_INVALID",
                format!(
                    "Speaker kind \"{}\" must be one of narrator, npc, player.",
                    raw
                ),
                node.location.clone(),
            )
        })?,
        None => SpeakerKind::default(),
    };
    let next_entry_index = parse_target_attr(node, "next")?.unwrap_or(implicit_next(index, count));

    let mut lines = Vec::new();
    let mut text_node = None;
    let mut option_nodes = Vec::new();
    for child in node.child_elements() {
        match child.name.as_str() {
            "line" => lines.push(child.own_text()),
            "text" => {
                if text_node.replace(child).is_some() {
                    return Err(DialogueError::with_span(
                        "COMPILE_ENTRY_CONTENT_MIXED",
                        "<entry> may contain at most one <text>.",
                        child.location.clone(),
                    ));
                }
            }
            "option" => option_nodes.push(child),
            other => {
                return Err(DialogueError::with_span(
                    "COMPILE_ENTRY_CHILD_INVALID",
                    format!(
                        "Unexpected <{}> in <entry>; expected <text>, <line> or <option>.",
                        other
                    ),
                    child.location.clone(),
                ));
            }
        }
    }

    let inline = node.own_text();
    let sources = [!inline.is_empty(), text_node.is_some(), !lines.is_empty()]
        .iter()
        .filter(|present| **present)
        .count();
    if sources > 1 {
        return Err(DialogueError::with_span(
            "COMPILE_ENTRY_CONTENT_MIXED",
            "<entry> content must be inline text, one <text>, or a list of <line>.",
            node.location.clone(),
        ));
    }

    let content = if !lines.is_empty() {
        EntryContent::Fragments(lines)
    } else if let Some(text_node) = text_node {
        EntryContent::Line(text_node.own_text())
    } else {
        EntryContent::Line(inline)
    };

    let options = compile_options(node, &option_nodes)?;

    Ok(DialogueEntry {
        speaker,
        speaker_kind,
        content,
        options,
        next_entry_index,
    })
}

fn compile_options(
    entry: &XmlElementNode,
    option_nodes: &[&XmlElementNode],
) -> Result<Option<OptionPair>, DialogueError> {
    if option_nodes.is_empty() {
        return Ok(None);
    }
    if option_nodes.len() != 2 {
        return Err(DialogueError::with_span(
            "COMPILE_OPTIONS_INCOMPLETE",
            format!(
                "An entry with options needs exactly a top and a bottom option, found {}.",
                option_nodes.len()
            ),
            entry.location.clone(),
        ));
    }

    let mut top = None;
    let mut bottom = None;
    for (position, node) in option_nodes.iter().enumerate() {
        let side = match get_optional_attr(node, "side") {
            Some(raw) => OptionSide::parse(raw).ok_or_else(|| {
                DialogueError::with_span(
                    "COMPILE_OPTION_SIDE_INVALID",
                    format!("Option side \"{}\" must be \"top\" or \"bottom\".", raw),
                    node.location.clone(),
                )
            })?,
            None if position == 0 => OptionSide::Top,
            None => OptionSide::Bottom,
        };
        let Some(next_entry_index) = parse_target_attr(node, "next")? else {
            return Err(DialogueError::with_span(
                "XML_MISSING_ATTR",
                "Missing required attribute \"next\" on <option>.",
                node.location.clone(),
            ));
        };
        let option = DialogueOption {
            text: node.own_text(),
            next_entry_index,
        };
        let slot = match side {
            OptionSide::Top => &mut top,
            OptionSide::Bottom => &mut bottom,
        };
        if slot.replace(option).is_some() {
            return Err(DialogueError::with_span(
                "COMPILE_OPTIONS_INCOMPLETE",
                format!("Option side \"{}\" is declared twice.", side.as_str()),
                node.location.clone(),
            ));
        }
    }

    match (top, bottom) {
        (Some(top), Some(bottom)) => Ok(Some(OptionPair { top, bottom })),
        _ => Err(DialogueError::with_span(
            "COMPILE_OPTIONS_INCOMPLETE",
            "An entry with options needs both a top and a bottom option.",
            entry.location.clone(),
        )),
    }
}
