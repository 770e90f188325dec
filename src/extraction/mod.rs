// src/extraction/mod.rs
//! Locating job records in arbitrary API payloads and normalizing their fields

pub mod company;
pub mod discovery;
pub mod keywords;
pub mod normalizer;
pub mod probe;
pub mod recruiters;

pub use company::extract_company;
pub use discovery::{classify, discover_jobs, ObjectShape};
pub use keywords::extract_keywords;
pub use normalizer::JobNormalizer;
pub use recruiters::extract_linkedin_recruiters;
