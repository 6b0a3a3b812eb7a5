use scraper::Html;
use serde_json::Value;
use tracker_logging::tracker_debug;

use crate::page::parse_selector;
use crate::text::normalize_whitespace;

/// Fields read from a schema.org `JobPosting` block. Blank values are `None`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StructuredJob {
    pub title: Option<String>,
    pub company: Option<String>,
}

/// Returns the first `JobPosting` found in the page's JSON-LD blocks.
/// Blocks that fail to parse are skipped.
pub fn find_job_posting(document: &Html) -> Option<StructuredJob> {
    let selector = parse_selector(r#"script[type="application/ld+json"]"#)?;
    document.select(&selector).find_map(|block| {
        let raw = block.text().collect::<String>();
        match serde_json::from_str::<Value>(raw.trim()) {
            Ok(value) => find_posting(&value).map(read_posting),
            Err(err) => {
                tracker_debug!("Skipping unparsable JSON-LD block: {}", err);
                None
            }
        }
    })
}

fn find_posting(value: &Value) -> Option<&Value> {
    match value {
        Value::Array(items) => items.iter().find_map(find_posting),
        Value::Object(map) => {
            if is_job_posting(map.get("@type")) {
                Some(value)
            } else {
                map.get("@graph").and_then(find_posting)
            }
        }
        _ => None,
    }
}

fn is_job_posting(kind: Option<&Value>) -> bool {
    match kind {
        Some(Value::String(s)) => s == "JobPosting",
        Some(Value::Array(kinds)) => kinds.iter().any(|k| k.as_str() == Some("JobPosting")),
        _ => false,
    }
}

fn read_posting(posting: &Value) -> StructuredJob {
    let company = match posting.get("hiringOrganization") {
        Some(Value::String(name)) => Some(name.as_str()),
        Some(org) => org.get("name").and_then(Value::as_str),
        None => None,
    };
    StructuredJob {
        title: posting.get("title").and_then(Value::as_str).and_then(non_blank),
        company: company.and_then(non_blank),
    }
}

fn non_blank(s: &str) -> Option<String> {
    let normalized = normalize_whitespace(s);
    (!normalized.is_empty()).then_some(normalized)
}
