// src/output.rs
//! Console summary and the JSON output file

use anyhow::Result;
use std::fmt::Write as _;
use std::path::Path;

use crate::types::JobRecord;
use crate::utils::write_json_pretty;

const SUMMARY_JOBS: usize = 20;
const SUMMARY_RECRUITERS: usize = 3;
const SUMMARY_KEYWORDS: usize = 12;

/// Human-readable listing of the first jobs of a run
pub fn render_summary(jobs: &[JobRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "[OK] Fetched {} jobs", jobs.len());

    for job in jobs.iter().take(SUMMARY_JOBS) {
        let _ = writeln!(
            out,
            "- {} | {} | {}",
            job.title.as_deref().unwrap_or_default(),
            job.company.as_deref().unwrap_or_default(),
            job.location.as_deref().unwrap_or_default()
        );
        let _ = writeln!(out, "  jobright: {}", display_opt(&job.jobright_url));
        let _ = writeln!(out, "  apply: {}", display_opt(&job.apply_url));

        if !job.linkedin_recruiters.is_empty() {
            let _ = writeln!(out, "  recruiters: {}", job.linkedin_recruiters.len());
            for r in job.linkedin_recruiters.iter().take(SUMMARY_RECRUITERS) {
                let _ = writeln!(
                    out,
                    "   - {} ({}) -> {}",
                    display_opt(&r.full_name),
                    display_opt(&r.job_title),
                    display_opt(&r.linkedin_url)
                );
            }
        }

        if !job.keywords.is_empty() {
            let shown: Vec<&str> = job
                .keywords
                .iter()
                .take(SUMMARY_KEYWORDS)
                .map(String::as_str)
                .collect();
            let _ = writeln!(out, "  keywords: {}", shown.join(", "));
        }
        out.push('\n');
    }

    out
}

fn display_opt(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("None")
}

pub async fn write_output(path: &Path, jobs: &[JobRecord]) -> Result<()> {
    write_json_pretty(path, jobs).await
}
