use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;

use crate::hosts::HostProfile;
use crate::page::rendered_text;
use crate::text::normalize_whitespace;

static APPLY_PHRASES: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)apply now|easy apply|quick apply|apply on company site|apply on employer site")
        .expect("apply phrase pattern")
});

pub fn is_apply_text(text: &str) -> bool {
    APPLY_PHRASES.is_match(&normalize_whitespace(text))
}

/// Delegated capture: walks from the click target up to, but not including,
/// `body`, returning the first apply control or host apply wrapper.
pub fn find_apply_control<'a>(
    target: ElementRef<'a>,
    profile: &HostProfile,
) -> Option<ElementRef<'a>> {
    std::iter::successors(Some(target), |el| el.parent().and_then(ElementRef::wrap))
        .take_while(|el| !matches!(el.value().name(), "body" | "html"))
        .find(|el| is_apply_wrapper(*el, profile) || is_apply_control(*el))
}

fn is_apply_wrapper(element: ElementRef<'_>, profile: &HostProfile) -> bool {
    element
        .value()
        .classes()
        .any(|class| profile.apply_wrapper_classes.iter().any(|c| c == class))
}

fn is_apply_control(element: ElementRef<'_>) -> bool {
    let el = element.value();
    let text = match el.name() {
        "button" | "a" => rendered_text(element),
        "input" => match el.attr("type").map(str::to_ascii_lowercase).as_deref() {
            Some("submit") | Some("button") => el.attr("value").unwrap_or_default().to_string(),
            _ => return false,
        },
        _ if el.attr("role") == Some("button") => rendered_text(element),
        _ => return false,
    };
    is_apply_text(&text)
}
