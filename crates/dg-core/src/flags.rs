use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Named integers tracking narrative branches across scripts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoryFlags {
    values: BTreeMap<String, i32>,
}

impl StoryFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: i32) {
        self.values.insert(name.into(), value);
    }

    pub fn get(&self, name: &str, default_value: i32) -> i32 {
        self.values.get(name).copied().unwrap_or(default_value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn as_map(&self) -> &BTreeMap<String, i32> {
        &self.values
    }

    pub fn into_map(self) -> BTreeMap<String, i32> {
        self.values
    }
}

impl From<BTreeMap<String, i32>> for StoryFlags {
    fn from(values: BTreeMap<String, i32>) -> Self {
        Self { values }
    }
}
