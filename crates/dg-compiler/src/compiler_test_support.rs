use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub(crate) fn map(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect()
}

pub(crate) fn demos_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("demos")
}

pub(crate) fn read_sources_recursive(
    root: &Path,
    current: &Path,
    out: &mut BTreeMap<String, String>,
) -> std::io::Result<()> {
    let mut entries = fs::read_dir(current)?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .collect::<Vec<_>>();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            read_sources_recursive(root, &path, out)?;
            continue;
        }
        let name = path.to_string_lossy();
        if !(name.ends_with(".dialogue.xml")
            || name.ends_with(".dialogue.json")
            || name.ends_with(".sequence.xml"))
        {
            continue;
        }
        let relative = path
            .strip_prefix(root)
            .unwrap_or(&path)
            .to_string_lossy()
            .replace('\\', "/");
        out.insert(relative, fs::read_to_string(&path)?);
    }
    Ok(())
}

pub(crate) fn sources_from_demo_dir(name: &str) -> BTreeMap<String, String> {
    let root = demos_root().join(name);
    let mut files = BTreeMap::new();
    read_sources_recursive(&root, &root, &mut files).expect("demo sources should be readable");
    files
}
