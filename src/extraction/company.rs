// src/extraction/company.rs
//! Company name resolution with an ordered fallback chain
//!
//! The API nests, renames or omits the company depending on endpoint and
//! version. Strategies are tried in order and the first hit wins:
//! direct aliases, nested company objects, social connections, the free-text
//! job summary, and finally the logo file name.

use regex::Regex;
use serde_json::{Map, Value};
use std::sync::OnceLock;

use super::probe::{non_blank, pick, SOCIAL_CONNECTIONS_KEY};

const DIRECT_KEYS: &[&str] = &[
    "companyName",
    "company",
    "company_name",
    "jdCompanyName",
    "companyDisplayName",
    "companyTitle",
];
const NESTED_OBJECT_KEYS: &[&str] = &["companyInfo", "companyVO", "companyDto"];

fn summary_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^([A-Z][A-Za-z0-9&.,'’\- ]{1,80})\s+is\s+").expect("summary regex is valid")
    })
}

fn logo_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)/([A-Za-z0-9-]+)_logo").expect("logo regex is valid"))
}

pub fn extract_company(job: &Map<String, Value>) -> Option<String> {
    from_direct_keys(job)
        .or_else(|| from_nested_objects(job))
        .or_else(|| from_social_connections(job))
        .or_else(|| from_summary(job))
        .or_else(|| from_logo(job))
}

fn from_direct_keys(job: &Map<String, Value>) -> Option<String> {
    match pick(job, DIRECT_KEYS)? {
        Value::Object(inner) => pick(inner, &["name", "companyName"]).and_then(non_blank),
        other => non_blank(other),
    }
}

fn from_nested_objects(job: &Map<String, Value>) -> Option<String> {
    NESTED_OBJECT_KEYS
        .iter()
        .filter_map(|k| job.get(*k).and_then(Value::as_object))
        .find_map(|inner| {
            pick(inner, &["name", "companyName", "displayName"]).and_then(non_blank)
        })
}

fn from_social_connections(job: &Map<String, Value>) -> Option<String> {
    job.get(SOCIAL_CONNECTIONS_KEY)?
        .as_array()?
        .iter()
        .filter_map(Value::as_object)
        .find_map(|person| person.get("companyName").and_then(non_blank))
}

/// "Acme Corp is hiring ..." -> "Acme Corp"
fn from_summary(job: &Map<String, Value>) -> Option<String> {
    let summary = job.get("jobSummary").and_then(non_blank)?;
    let caps = summary_pattern().captures(&summary)?;
    caps.get(1)
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// ".../openai_logo.png" -> "openai", case kept as-is
fn from_logo(job: &Map<String, Value>) -> Option<String> {
    let logo = job.get("jdLogo").and_then(non_blank)?;
    let path = logo_path(&logo);
    let caps = logo_pattern().captures(&path)?;
    caps.get(1).map(|m| m.as_str().to_string())
}

fn logo_path(logo: &str) -> String {
    match url::Url::parse(logo) {
        Ok(parsed) => parsed.path().to_string(),
        // relative or malformed: drop query and fragment by hand
        Err(_) => logo
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn company(v: Value) -> Option<String> {
        extract_company(v.as_object().unwrap())
    }

    #[test]
    fn test_fallback_from_summary() {
        assert_eq!(
            company(json!({"jobSummary": "OpenAI is building safe AGI."})),
            Some("OpenAI".to_string())
        );
    }

    #[test]
    fn test_fallback_from_logo_slug() {
        assert_eq!(
            company(json!({"jdLogo": "https://cdn.example.com/assets/openai_logo.png"})),
            Some("openai".to_string())
        );
        assert_eq!(
            company(json!({"jdLogo": ".../openai_logo.png"})),
            Some("openai".to_string())
        );
    }

    #[test]
    fn test_logo_keeps_case_and_ignores_query() {
        assert_eq!(
            company(json!({"jdLogo": "https://cdn.example.com/Stripe-Inc_LOGO.svg?v=_logo"})),
            Some("Stripe-Inc".to_string())
        );
    }

    #[test]
    fn test_direct_alias_trimmed() {
        assert_eq!(
            company(json!({"companyName": "  Acme  ", "jdLogo": "/x/other_logo.png"})),
            Some("Acme".to_string())
        );
    }

    #[test]
    fn test_direct_alias_nested_object() {
        assert_eq!(
            company(json!({"company": {"name": "Globex"}})),
            Some("Globex".to_string())
        );
    }

    #[test]
    fn test_blank_direct_alias_falls_through() {
        assert_eq!(
            company(json!({"companyName": " ", "companyInfo": {"displayName": "Initech"}})),
            Some("Initech".to_string())
        );
    }

    #[test]
    fn test_social_connections_company() {
        let job = json!({
            "socialConnections": [
                {"fullName": "A"},
                {"fullName": "B", "companyName": "Umbrella"}
            ]
        });
        assert_eq!(company(job), Some("Umbrella".to_string()));
    }

    #[test]
    fn test_summary_must_start_with_capital() {
        assert_eq!(company(json!({"jobSummary": "we are hiring, this is fun"})), None);
    }

    #[test]
    fn test_nothing_found() {
        assert_eq!(company(json!({"jobTitle": "SWE"})), None);
        assert_eq!(company(json!({"jdLogo": "https://cdn.example.com/logo.png"})), None);
    }
}
