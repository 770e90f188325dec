// src/extraction/discovery.rs
//! Finds job-shaped objects anywhere inside a JSON payload

use serde_json::{Map, Value};

use super::probe::{has_any, APPLY_KEYS, COMPANY_KEYS, ID_KEYS, PROFILE_KEYS, TITLE_KEYS};

/// What a JSON object looks like structurally
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectShape {
    /// A job listing: id, title, and a company or apply signal
    Job,
    /// A person (recruiter, connection); never treated as a job
    Profile,
    Other,
}

/// Classify an object by which keys carry non-null values
pub fn classify(obj: &Map<String, Value>) -> ObjectShape {
    if has_any(obj, PROFILE_KEYS) {
        return ObjectShape::Profile;
    }

    let has_id = has_any(obj, ID_KEYS);
    let has_title = has_any(obj, TITLE_KEYS);
    let has_company = has_any(obj, COMPANY_KEYS);
    let has_apply = has_any(obj, APPLY_KEYS);

    if has_id && has_title && (has_company || has_apply) {
        ObjectShape::Job
    } else {
        ObjectShape::Other
    }
}

/// All job-shaped objects in `payload`, depth-first, parents before children
pub fn discover_jobs(payload: &Value) -> Vec<&Map<String, Value>> {
    let mut jobs = Vec::new();
    visit(payload, &mut jobs);
    jobs
}

fn visit<'a>(node: &'a Value, out: &mut Vec<&'a Map<String, Value>>) {
    match node {
        Value::Object(obj) => {
            if classify(obj) == ObjectShape::Job {
                out.push(obj);
            }
            // keep descending: jobs can nest "similar jobs" blocks
            for child in obj.values() {
                visit(child, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                visit(item, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filters_profiles() {
        let payload = json!({
            "data": [
                {"firstName": "Sam", "fullName": "Sam R", "linkedinUrl": "https://linkedin.com/in/x"},
                {"jobInfoId": 123, "jobTitle": "SWE", "companyName": "Acme", "applyUrl": "https://apply.example"}
            ]
        });

        let jobs = discover_jobs(&payload);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["jobTitle"], "SWE");
    }

    #[test]
    fn test_profile_keys_win_over_job_keys() {
        let person = json!({
            "id": 1, "name": "Jane", "companyName": "Acme", "fullName": "Jane Doe"
        });
        assert_eq!(classify(person.as_object().unwrap()), ObjectShape::Profile);
    }

    #[test]
    fn test_id_and_title_alone_are_not_a_job() {
        let entity = json!({"id": 9, "name": "Engineering"});
        assert_eq!(classify(entity.as_object().unwrap()), ObjectShape::Other);
        assert!(discover_jobs(&entity).is_empty());
    }

    #[test]
    fn test_null_values_do_not_count_as_present() {
        let job = json!({"jobId": null, "title": "SWE", "companyName": "Acme"});
        assert_eq!(classify(job.as_object().unwrap()), ObjectShape::Other);

        let person = json!({"jobId": 1, "title": "SWE", "companyName": "Acme", "fullName": null});
        assert_eq!(classify(person.as_object().unwrap()), ObjectShape::Job);
    }

    #[test]
    fn test_preorder_with_nested_jobs_and_nested_profiles() {
        let payload = json!({
            "result": {
                "jobList": [
                    {
                        "jobId": "a",
                        "jobTitle": "Parent",
                        "companyName": "Acme",
                        "socialConnections": [
                            {"fullName": "Rec", "jobTitle": "Recruiter", "id": 5, "companyName": "Acme"}
                        ],
                        "similarJobs": [
                            {"jobId": "a1", "title": "Child", "url": "https://x/1"}
                        ]
                    },
                    {"jobId": "b", "jobTitle": "Sibling", "applyLink": "https://x/2"}
                ]
            }
        });

        let titles: Vec<&str> = discover_jobs(&payload)
            .iter()
            .filter_map(|j| j.get("jobTitle").or_else(|| j.get("title")))
            .filter_map(Value::as_str)
            .collect();

        assert_eq!(titles, vec!["Parent", "Child", "Sibling"]);
    }

    #[test]
    fn test_scalars_and_empty_containers() {
        assert!(discover_jobs(&json!(42)).is_empty());
        assert!(discover_jobs(&json!("job")).is_empty());
        assert!(discover_jobs(&json!([])).is_empty());
        assert!(discover_jobs(&json!({})).is_empty());
    }

    #[test]
    fn test_top_level_array_of_jobs() {
        let payload = json!([
            {"id": 1, "name": "A", "company": {"name": "Acme"}},
            {"id": 2, "name": "B", "sourceUrl": "/apply/2"}
        ]);
        assert_eq!(discover_jobs(&payload).len(), 2);
    }
}
