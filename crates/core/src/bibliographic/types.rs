//! Types for bibliographic search results.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The parts of a bibliographic work the harvester cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkSummary {
    /// Serial identifiers of the container (print and/or electronic).
    #[serde(default)]
    pub issns: Vec<String>,
    /// Container titles (journal, proceedings, series).
    #[serde(default)]
    pub container_titles: Vec<String>,
}

/// Extract work summaries from a Crossref `works` payload.
///
/// Expects `{"message": {"items": [...]}}`; `ISSN` and `container-title`
/// may each be a string or a list of strings.
pub fn parse_works(payload: &Value) -> Vec<WorkSummary> {
    payload["message"]["items"]
        .as_array()
        .map(|items| items.iter().map(work_from_item).collect())
        .unwrap_or_default()
}

fn work_from_item(item: &Value) -> WorkSummary {
    WorkSummary {
        issns: string_list(&item["ISSN"]),
        container_titles: string_list(&item["container-title"]),
    }
}

fn string_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => vec![s.clone()],
        Value::Array(items) => items
            .iter()
            .filter_map(Value::as_str)
            .filter(|s| !s.trim().is_empty())
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}
