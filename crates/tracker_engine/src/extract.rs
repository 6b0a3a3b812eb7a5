use std::sync::Arc;

use tracker_core::JobCandidate;
use tracker_logging::tracker_debug;

use crate::hosts::{CompositeOrder, CompositeRule, HostProfile, HostRegistry};
use crate::page::{is_rendered, parse_selector, rendered_text, PageContext};
use crate::structured::find_job_posting;
use crate::text::{clean_company, clean_title, normalize_whitespace, passes_field_checks};

const META_TITLE_SELECTORS: &[&str] = &[
    r#"meta[property="og:title"]"#,
    r#"meta[name="twitter:title"]"#,
];

pub trait Extractor: Send + Sync {
    /// Best-effort candidate for the page. Never fails; unresolved fields get sentinels.
    fn extract(&self, page: &PageContext) -> JobCandidate;
}

/// Resolves fields through structured data, page metadata, the host's
/// selector chains and finally the host's composite header.
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    registry: Arc<HostRegistry>,
}

#[derive(Default)]
struct Fields {
    title: Option<String>,
    company: Option<String>,
}

impl Fields {
    fn complete(&self) -> bool {
        self.title.is_some() && self.company.is_some()
    }
}

impl FieldExtractor {
    pub fn new(registry: Arc<HostRegistry>) -> Self {
        Self { registry }
    }
}

impl Extractor for FieldExtractor {
    fn extract(&self, page: &PageContext) -> JobCandidate {
        let mut fields = Fields::default();

        if let Some(posting) = find_job_posting(page.document()) {
            tracker_debug!("JobPosting structured data found on {}", page.host());
            fields.title = posting.title;
            fields.company = posting.company;
        }

        if fields.title.is_none() {
            fields.title = metadata_title(page);
        }

        if let Some(profile) = self.registry.lookup(page.host()) {
            apply_host_chains(page, profile, &mut fields);
        }

        let title = fields.title.as_deref().map(clean_title).unwrap_or_default();
        let company = fields
            .company
            .as_deref()
            .map(clean_company)
            .unwrap_or_default();
        JobCandidate::new(title, company, page.host(), page.href())
    }
}

fn metadata_title(page: &PageContext) -> Option<String> {
    META_TITLE_SELECTORS.iter().find_map(|raw| {
        page.select_first(raw)
            .and_then(|meta| meta.value().attr("content"))
            .filter(|content| passes_field_checks(content))
            .map(normalize_whitespace)
    })
}

fn apply_host_chains(page: &PageContext, profile: &HostProfile, fields: &mut Fields) {
    if fields.title.is_none() {
        fields.title = first_valid(page, &profile.title_chain);
    }
    if fields.company.is_none() {
        fields.company = first_valid(page, &profile.company_chain);
    }
    if !fields.complete() {
        if let Some(rule) = &profile.composite {
            apply_composite(page, rule, fields);
        }
    }
}

/// First chain entry whose element is rendered and whose text passes the field checks.
fn first_valid(page: &PageContext, chain: &[String]) -> Option<String> {
    chain.iter().find_map(|raw| {
        let selector = parse_selector(raw)?;
        let element = page.document().select(&selector).next()?;
        if !is_rendered(element) {
            tracker_debug!("Selector {:?} matched an element that is not rendered", raw);
            return None;
        }
        let text = rendered_text(element);
        if passes_field_checks(&text) {
            Some(text)
        } else {
            tracker_debug!("Selector {:?} matched unusable text", raw);
            None
        }
    })
}

fn apply_composite(page: &PageContext, rule: &CompositeRule, fields: &mut Fields) {
    let Some(selector) = parse_selector(&rule.selector) else {
        return;
    };
    let Some(wrapper) = page
        .document()
        .select(&selector)
        .find(|el| is_rendered(*el))
    else {
        return;
    };
    let text = normalize_whitespace(&rendered_text(wrapper));
    let Some((first, second)) = text.split_once(rule.delimiter.as_str()) else {
        return;
    };
    let (title, company) = match rule.order {
        CompositeOrder::TitleFirst => (first, second),
        CompositeOrder::CompanyFirst => (second, first),
    };
    if fields.title.is_none() && passes_field_checks(title) {
        fields.title = Some(title.trim().to_string());
    }
    if fields.company.is_none() && passes_field_checks(company) {
        fields.company = Some(company.trim().to_string());
    }
}
