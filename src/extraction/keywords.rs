// src/extraction/keywords.rs
use serde_json::{Map, Value};
use std::collections::HashSet;

pub const DEFAULT_MAX_KEYWORDS: usize = 25;

const STRING_LIST_KEYS: &[&str] = &["recommendationTags", "jobTags", "jobTaxonomyV3"];

/// Skills and tags in priority order, trimmed, deduplicated, capped at `max_keywords`
pub fn extract_keywords(job: &Map<String, Value>, max_keywords: usize) -> Vec<String> {
    let mut candidates: Vec<&str> = Vec::new();

    for skill in objects(job, "jdCoreSkills") {
        if let Some(s) = skill.get("skill").and_then(Value::as_str) {
            candidates.push(s);
        }
    }

    for score in objects(job, "skillMatchingScores") {
        let display = score
            .get("displayName")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty());
        let name = display.or_else(|| score.get("featureName").and_then(Value::as_str));
        if let Some(name) = name {
            candidates.push(name);
        }
    }

    for key in STRING_LIST_KEYS {
        if let Some(items) = job.get(*key).and_then(Value::as_array) {
            candidates.extend(items.iter().filter_map(Value::as_str));
        }
    }

    if let Some(taxonomy) = job.get("firstTaxonomy").and_then(Value::as_str) {
        candidates.push(taxonomy);
    }

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter(|s| seen.insert(*s))
        .take(max_keywords)
        .map(str::to_string)
        .collect()
}

fn objects<'a>(
    job: &'a Map<String, Value>,
    key: &str,
) -> impl Iterator<Item = &'a Map<String, Value>> {
    job.get(key)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}
