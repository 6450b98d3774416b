//! Machine-readable summary of a generation run.
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

pub const REPORT_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub schema_version: u32,
    pub slug: String,
    pub seed: u64,
    pub successful: bool,
    pub case_count: usize,
    pub pass_count: usize,
    pub fail_count: usize,
    pub groups: Vec<GroupReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupReport {
    pub id: i32,
    pub successful: bool,
    pub cases: Vec<CaseReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub combination: Option<CombinationReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseReport {
    pub id: String,
    pub description: String,
    pub subtasks: BTreeSet<i32>,
    pub successful: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombinationReport {
    pub base_id: String,
    pub successful: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<String>,
}

impl GenerationReport {
    pub(crate) fn new(slug: &str, seed: u64, groups: Vec<GroupReport>) -> Self {
        let case_count = groups.iter().map(|group| group.cases.len()).sum();
        let pass_count = groups
            .iter()
            .flat_map(|group| &group.cases)
            .filter(|case| case.successful)
            .count();
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            slug: slug.to_string(),
            seed,
            successful: groups.iter().all(|group| group.successful),
            case_count,
            pass_count,
            fail_count: case_count - pass_count,
            groups,
        }
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(self).context("serialize generation report")?;
        std::fs::write(path, format!("{text}\n"))
            .with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }
}
