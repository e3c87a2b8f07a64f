//! Dataset sources and the load-or-fallback entry point.
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{error, info};

use crate::error::Error;
use crate::traits::DatasetSource;
use crate::types::Dataset;

/// Reads a JSON document from disk. The dataset lives under `root_key`;
/// a document without that key is read as the dataset itself.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    root_key: String,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>, root_key: impl Into<String>) -> Self {
        Self { path: path.into(), root_key: root_key.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DatasetSource for JsonFileSource {
    fn load(&self) -> Result<Dataset> {
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read dataset: {}", self.path.display()))?;
        parse_document(&content, &self.root_key)
            .with_context(|| format!("Failed to parse dataset: {}", self.path.display()))
    }
}

/// A document already held in memory.
#[derive(Debug, Clone)]
pub struct JsonStrSource {
    content: String,
    root_key: String,
}

impl JsonStrSource {
    pub fn new(content: impl Into<String>, root_key: impl Into<String>) -> Self {
        Self { content: content.into(), root_key: root_key.into() }
    }
}

impl DatasetSource for JsonStrSource {
    fn load(&self) -> Result<Dataset> {
        parse_document(&self.content, &self.root_key)
    }
}

/// An already-built dataset, handy for tests and embedding hosts.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    dataset: Dataset,
}

impl StaticSource {
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }
}

impl DatasetSource for StaticSource {
    fn load(&self) -> Result<Dataset> {
        Ok(self.dataset.clone())
    }
}

pub fn parse_document(content: &str, root_key: &str) -> Result<Dataset> {
    let mut value: Value = serde_json::from_str(content).context("Dataset is not valid JSON")?;
    // key order survives the `Value` step through serde_json's `preserve_order`
    let section = if value.get(root_key).is_some() { value[root_key].take() } else { value };
    if !section.is_object() {
        let found = json_kind(&section);
        return Err(Error::Dataset(format!("expected an object of topics, found {}", found)).into());
    }
    serde_json::from_value(section).context("Dataset does not match the topic/subtopic schema")
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Result of a startup load. `failed` tells the host to show its
/// load-failure message; the dataset is then empty.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub dataset: Dataset,
    pub failed: bool,
}

pub fn load_or_empty<S: DatasetSource + ?Sized>(source: &S) -> LoadOutcome {
    match source.load() {
        Ok(dataset) => {
            info!(topics = dataset.topics.len(), items = dataset.item_count(), "dataset loaded");
            LoadOutcome { dataset, failed: false }
        }
        Err(e) => {
            error!("dataset load failed, continuing with an empty dataset: {:#}", e);
            LoadOutcome { dataset: Dataset::empty(), failed: true }
        }
    }
}
