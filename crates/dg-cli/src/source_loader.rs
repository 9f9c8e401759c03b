use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use dg_core::DialogueError;
use walkdir::WalkDir;

use crate::{
    map_cli_source_path, map_cli_source_read, map_cli_source_scan, LoadedScenario,
    SCRIPTS_DIR_REF_PREFIX,
};

const SOURCE_SUFFIXES: [&str; 3] = [".dialogue.xml", ".dialogue.json", ".sequence.xml"];

pub(crate) fn load_source_by_scripts_dir(scripts_dir: &str) -> Result<LoadedScenario, DialogueError> {
    let root = resolve_scripts_dir(scripts_dir)?;
    let sources = read_dialogue_sources_from_dir(&root)?;
    let title = root
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "dialogue".to_string());

    Ok(LoadedScenario {
        id: make_scripts_dir_scenario_id(&root),
        title,
        root,
        sources,
    })
}

pub(crate) fn load_source_by_ref(scenario_ref: &str) -> Result<LoadedScenario, DialogueError> {
    let Some(raw) = scenario_ref.strip_prefix(SCRIPTS_DIR_REF_PREFIX) else {
        return Err(DialogueError::new(
            "CLI_SOURCE_REF_INVALID",
            format!("Unsupported scenario ref: {}", scenario_ref),
        ));
    };
    load_source_by_scripts_dir(raw)
}

pub(crate) fn resolve_scripts_dir(scripts_dir: &str) -> Result<PathBuf, DialogueError> {
    let path = PathBuf::from(scripts_dir);
    let absolute = if path.is_absolute() {
        path
    } else {
        std::env::current_dir()
            .map_err(map_cli_source_path)?
            .join(path)
    };

    if !absolute.exists() {
        return Err(DialogueError::new(
            "CLI_SOURCE_NOT_FOUND",
            format!("scripts-dir does not exist: {}", absolute.display()),
        ));
    }
    if !absolute.is_dir() {
        return Err(DialogueError::new(
            "CLI_SOURCE_NOT_DIR",
            format!("scripts-dir is not a directory: {}", absolute.display()),
        ));
    }

    Ok(absolute)
}

pub(crate) fn read_dialogue_sources_from_dir(
    root: &Path,
) -> Result<BTreeMap<String, String>, DialogueError> {
    let mut sources = BTreeMap::new();

    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
    {
        let path = entry.path();
        let name = path.to_string_lossy();
        if !SOURCE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix)) {
            continue;
        }

        let relative = path
            .strip_prefix(root)
            .map_err(map_cli_source_scan)?
            .to_string_lossy()
            .replace('\\', "/");
        let content = fs::read_to_string(path).map_err(map_cli_source_read)?;
        tracing::trace!(path = %relative, "loaded dialogue source");
        sources.insert(relative, content);
    }

    if sources.is_empty() {
        return Err(DialogueError::new(
            "CLI_SOURCE_EMPTY",
            format!(
                "No .dialogue.xml/.dialogue.json/.sequence.xml files under {}",
                root.display()
            ),
        ));
    }

    Ok(sources)
}

pub(crate) fn make_scripts_dir_scenario_id(root: &Path) -> String {
    format!("{}{}", SCRIPTS_DIR_REF_PREFIX, root.display())
}
