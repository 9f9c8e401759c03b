use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use crate::{DgToolError, TestCase, TESTCASE_SCHEMA_V1};

pub(crate) fn is_dialogue_source(path: &str) -> bool {
    path.ends_with(".dialogue.xml")
        || path.ends_with(".dialogue.json")
        || path.ends_with(".sequence.xml")
}

pub fn read_dialogue_sources_from_dir(
    demo_dir: &Path,
) -> Result<BTreeMap<String, String>, DgToolError> {
    let mut sources = BTreeMap::new();

    for entry in WalkDir::new(demo_dir)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_map(Result::ok)
    {
        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        if !is_dialogue_source(&path.to_string_lossy()) {
            continue;
        }

        let relative = path
            .strip_prefix(demo_dir)
            .expect("walkdir path should start with demo dir")
            .to_string_lossy()
            .replace('\\', "/");

        let content = fs::read_to_string(path).map_err(|source| DgToolError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        sources.insert(relative, content);
    }

    if sources.is_empty() {
        return Err(DgToolError::SourceEmpty {
            path: demo_dir.to_path_buf(),
        });
    }

    Ok(sources)
}

pub fn read_test_case(case_path: &Path) -> Result<TestCase, DgToolError> {
    let raw = fs::read_to_string(case_path).map_err(|source| DgToolError::ReadFile {
        path: case_path.to_path_buf(),
        source,
    })?;
    let parsed: TestCase = serde_json::from_str(&raw).map_err(|source| DgToolError::ParseCase {
        path: case_path.to_path_buf(),
        source,
    })?;

    if parsed.schema_version != TESTCASE_SCHEMA_V1 {
        return Err(DgToolError::InvalidSchemaVersion {
            expected: TESTCASE_SCHEMA_V1.to_string(),
            found: parsed.schema_version,
        });
    }

    Ok(parsed)
}
