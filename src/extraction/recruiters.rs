// src/extraction/recruiters.rs
use serde_json::{Map, Value};

use super::probe::{str_field, SOCIAL_CONNECTIONS_KEY};
use crate::types::RecruiterContact;

const RECRUITING_TITLE_MARKERS: &[&str] = &["recruit", "talent", "sourc", "hr"];

/// Social connections whose job title looks like a recruiting role
pub fn extract_linkedin_recruiters(job: &Map<String, Value>) -> Vec<RecruiterContact> {
    let Some(connections) = job.get(SOCIAL_CONNECTIONS_KEY).and_then(Value::as_array) else {
        return Vec::new();
    };

    connections
        .iter()
        .filter_map(Value::as_object)
        .filter(|person| is_recruiting_title(person))
        .map(|person| RecruiterContact {
            full_name: full_name(person),
            job_title: str_field(person, "jobTitle"),
            company_name: str_field(person, "companyName"),
            linkedin_url: str_field(person, "linkedinUrl"),
        })
        .collect()
}

fn is_recruiting_title(person: &Map<String, Value>) -> bool {
    let title = person
        .get("jobTitle")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_lowercase();
    RECRUITING_TITLE_MARKERS.iter().any(|m| title.contains(m))
}

fn full_name(person: &Map<String, Value>) -> Option<String> {
    str_field(person, "fullName")
        .filter(|s| !s.is_empty())
        .or_else(|| {
            str_field(person, "firstName")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        })
}
