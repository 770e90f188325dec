// src/types/job.rs
//! Canonical job records as written to the output file

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ===== Canonical Job Record =====

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    #[serde(rename = "jobId")]
    pub job_id: Option<String>,
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub jobright_url: Option<String>,
    pub apply_url: Option<String>,
    pub linkedin_recruiters: Vec<RecruiterContact>,
    pub keywords: Vec<String>,
    /// The candidate object exactly as the API returned it
    pub raw: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecruiterContact {
    pub full_name: Option<String>,
    pub job_title: Option<String>,
    pub company_name: Option<String>,
    pub linkedin_url: Option<String>,
}

// ===== Transport =====

/// Status and body of one API call made through the browser context
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    #[serde(rename = "text")]
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_auth_failure(&self) -> bool {
        matches!(self.status, 401 | 403)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_record_serializes_with_output_keys() {
        let record = JobRecord {
            job_id: Some("42".to_string()),
            title: Some("SWE".to_string()),
            company: None,
            location: Some("Remote".to_string()),
            jobright_url: Some("https://jobright.ai/jobs/info/42".to_string()),
            apply_url: None,
            linkedin_recruiters: vec![RecruiterContact {
                full_name: Some("Jane".to_string()),
                job_title: Some("Recruiter".to_string()),
                company_name: None,
                linkedin_url: None,
            }],
            keywords: vec!["Rust".to_string()],
            raw: json!({"jobId": 42}),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["jobId"], "42");
        assert_eq!(value["company"], Value::Null);
        assert_eq!(value["jobright_url"], "https://jobright.ai/jobs/info/42");
        assert_eq!(value["linkedin_recruiters"][0]["fullName"], "Jane");
        assert_eq!(value["linkedin_recruiters"][0]["jobTitle"], "Recruiter");
        assert_eq!(value["raw"]["jobId"], 42);
    }

    #[test]
    fn test_api_response_status_classes() {
        assert!(ApiResponse::new(401, "").is_auth_failure());
        assert!(ApiResponse::new(403, "").is_auth_failure());
        assert!(!ApiResponse::new(500, "").is_auth_failure());
        assert!(ApiResponse::new(200, "{}").is_success());
        assert!(!ApiResponse::new(404, "").is_success());
    }
}
