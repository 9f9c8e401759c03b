use dg_core::DialogueError;
use dg_parser::XmlElementNode;
use regex::Regex;

pub(crate) fn get_optional_attr<'a>(node: &'a XmlElementNode, name: &str) -> Option<&'a str> {
    node.attr(name)
}

pub(crate) fn get_required_non_empty_attr(
    node: &XmlElementNode,
    name: &str,
) -> Result<String, DialogueError> {
    let Some(raw) = node.attr(name) else {
        return Err(DialogueError::with_span(
            "XML_MISSING_ATTR",
            format!(
                "Missing required attribute \"{}\" on <{}>.",
                name, node.name
            ),
            node.location.clone(),
        ));
    };

    if raw.trim().is_empty() {
        return Err(DialogueError::with_span(
            "XML_EMPTY_ATTR",
            format!("Attribute \"{}\" on <{}> cannot be empty.", name, node.name),
            node.location.clone(),
        ));
    }

    Ok(raw.trim().to_string())
}

pub(crate) fn parse_bool_attr(
    node: &XmlElementNode,
    name: &str,
    default: bool,
) -> Result<bool, DialogueError> {
    let Some(value) = get_optional_attr(node, name) else {
        return Ok(default);
    };

    match value.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(DialogueError::with_span(
            "XML_ATTR_BOOL_INVALID",
            format!(
                "Attribute \"{}\" on <{}> must be \"true\" or \"false\".",
                name, node.name
            ),
            node.location.clone(),
        )),
    }
}

pub(crate) fn parse_u64_attr(
    node: &XmlElementNode,
    name: &str,
    default: u64,
) -> Result<u64, DialogueError> {
    let Some(value) = get_optional_attr(node, name) else {
        return Ok(default);
    };

    value.trim().parse::<u64>().map_err(|_| {
        DialogueError::with_span(
            "XML_ATTR_INT_INVALID",
            format!(
                "Attribute \"{}\" on <{}> must be a non-negative integer.",
                name, node.name
            ),
            node.location.clone(),
        )
    })
}

/// Parses an entry target. `end` is accepted as an alias for the terminator.
pub(crate) fn parse_target_attr(
    node: &XmlElementNode,
    name: &str,
) -> Result<Option<i32>, DialogueError> {
    let Some(value) = get_optional_attr(node, name) else {
        return Ok(None);
    };

    let trimmed = value.trim();
    if trimmed.eq_ignore_ascii_case("end") {
        return Ok(Some(dg_core::END_OF_SCRIPT));
    }

    trimmed.parse::<i32>().map(Some).map_err(|_| {
        DialogueError::with_span(
            "XML_ATTR_INT_INVALID",
            format!(
                "Attribute \"{}\" on <{}> must be an entry index or \"end\".",
                name, node.name
            ),
            node.location.clone(),
        )
    })
}

pub(crate) fn is_valid_name(name: &str) -> bool {
    let name_regex =
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").expect("name regex must compile");
    name_regex.is_match(name)
}

pub(crate) fn require_valid_name(
    node: &XmlElementNode,
    name: &str,
) -> Result<(), DialogueError> {
    if is_valid_name(name) {
        return Ok(());
    }
    Err(DialogueError::with_span(
        "COMPILE_NAME_INVALID",
        format!(
            "Name \"{}\" on <{}> must start with a letter or underscore and contain only letters, digits, '_', '-' or '.'.",
            name, node.name
        ),
        node.location.clone(),
    ))
}
