use serde::{Deserialize, Serialize};
use tracker_core::ConfirmationStyle;

/// Which side of the delimiter holds the title in a composite header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompositeOrder {
    TitleFirst,
    CompanyFirst,
}

/// One wrapper element whose text carries both title and company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeRule {
    pub selector: String,
    pub delimiter: String,
    pub order: CompositeOrder,
}

/// Static per-site configuration. Adding a site means adding one of these.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostProfile {
    /// Matched against the dot-separated labels of the page host.
    pub key: String,
    pub confirmation: ConfirmationStyle,
    #[serde(default)]
    pub success_signals: Vec<String>,
    /// Element whose text carries the success phrase; its presence marks a detail page.
    #[serde(default = "default_anchor")]
    pub anchor: String,
    #[serde(default)]
    pub title_chain: Vec<String>,
    #[serde(default)]
    pub company_chain: Vec<String>,
    #[serde(default)]
    pub composite: Option<CompositeRule>,
    /// Classes that mark an apply wrapper even when its text says something else.
    #[serde(default)]
    pub apply_wrapper_classes: Vec<String>,
}

fn default_anchor() -> String {
    "h1".to_string()
}

impl HostProfile {
    pub fn matches_host(&self, host: &str) -> bool {
        host.split('.')
            .any(|label| label.eq_ignore_ascii_case(&self.key))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostRegistry {
    profiles: Vec<HostProfile>,
}

impl HostRegistry {
    pub fn new(profiles: Vec<HostProfile>) -> Self {
        Self { profiles }
    }

    pub fn builtin() -> Self {
        Self::new(vec![indeed(), glassdoor(), linkedin()])
    }

    /// Replaces profiles with the same key and appends new ones.
    pub fn with_overrides(mut self, overrides: Vec<HostProfile>) -> Self {
        for profile in overrides {
            match self.profiles.iter_mut().find(|p| p.key == profile.key) {
                Some(existing) => *existing = profile,
                None => self.profiles.push(profile),
            }
        }
        self
    }

    pub fn lookup(&self, host: &str) -> Option<&HostProfile> {
        self.profiles.iter().find(|p| p.matches_host(host))
    }

    pub fn profiles(&self) -> &[HostProfile] {
        &self.profiles
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn indeed() -> HostProfile {
    HostProfile {
        key: "indeed".to_string(),
        confirmation: ConfirmationStyle::Asynchronous,
        success_signals: strings(&[
            "Your application has been submitted!",
            "Application submitted",
            "You successfully applied",
        ]),
        anchor: default_anchor(),
        title_chain: strings(&[
            ".jobsearch-JobInfoHeader-title-container h1",
            ".jobsearch-JobInfoHeader-title-container",
            r#"[data-testid="jobsearch-JobInfoHeader-title"]"#,
            "h1.jobsearch-JobInfoHeader-title",
            "h1",
        ]),
        company_chain: strings(&[
            r#"[data-testid="jobsearch-CompanyInfoContainer"] a"#,
            r#"[data-testid="jobsearch-CompanyInfoContainer"]"#,
            r#"[data-testid="inlineHeader-companyName"] a"#,
            r#"a[href*="/cmp/"]"#,
            ".css-1ygeylu a",
            "[data-company-name]",
            ".icl-u-lg-mr--sm span",
            ".jobsearch-CompanyInfoWithoutHeaderImage div",
        ]),
        composite: None,
        apply_wrapper_classes: strings(&["jobsearch-IndeedApplyButton-newDesign"]),
    }
}

fn glassdoor() -> HostProfile {
    HostProfile {
        key: "glassdoor".to_string(),
        confirmation: ConfirmationStyle::Asynchronous,
        success_signals: strings(&["Your application has been submitted!", "Application submitted"]),
        anchor: default_anchor(),
        title_chain: strings(&[r#"[data-test="job-title"]"#, "h1"]),
        company_chain: strings(&[r#"[data-test="employer-name"]"#, r#"[data-test="employerName"]"#]),
        composite: Some(CompositeRule {
            selector: r#"[data-test="job-header"]"#.to_string(),
            delimiter: " | ".to_string(),
            order: CompositeOrder::CompanyFirst,
        }),
        apply_wrapper_classes: strings(&["applyButton"]),
    }
}

fn linkedin() -> HostProfile {
    HostProfile {
        key: "linkedin".to_string(),
        confirmation: ConfirmationStyle::Synchronous,
        success_signals: Vec::new(),
        anchor: default_anchor(),
        title_chain: strings(&[
            ".job-details-jobs-unified-top-card__job-title h1",
            ".jobs-unified-top-card__job-title",
            "h1",
        ]),
        company_chain: strings(&[
            ".job-details-jobs-unified-top-card__company-name a",
            ".jobs-unified-top-card__company-name",
            r#"a[href*="/company/"]"#,
        ]),
        composite: None,
        apply_wrapper_classes: strings(&["jobs-apply-button"]),
    }
}
