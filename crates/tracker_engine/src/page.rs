use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracker_logging::tracker_warn;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PageError {
    #[error("invalid page url {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

/// Read-only view of one page: its address and current document.
pub struct PageContext {
    url: Url,
    document: Html,
}

impl PageContext {
    pub fn parse(url: &str, html: &str) -> Result<Self, PageError> {
        let url = Url::parse(url.trim()).map_err(|e| PageError::InvalidUrl {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            url,
            document: Html::parse_document(html),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    /// Hostname of the page, empty for hostless urls such as `file:`.
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    /// Swaps in new content after an in-place page change; the address is kept.
    pub fn replace_content(&mut self, html: &str) {
        self.document = Html::parse_document(html);
    }

    pub fn select_first(&self, selector: &str) -> Option<ElementRef<'_>> {
        let selector = parse_selector(selector)?;
        self.document.select(&selector).next()
    }
}

pub(crate) fn parse_selector(raw: &str) -> Option<Selector> {
    match Selector::parse(raw) {
        Ok(selector) => Some(selector),
        Err(err) => {
            tracker_warn!("Skipping invalid selector {:?}: {:?}", raw, err);
            None
        }
    }
}

const NEVER_RENDERED: &[&str] = &["script", "style", "head", "template", "noscript"];

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "div", "dl", "dt", "fieldset",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "pre", "section", "table", "td", "th", "tr", "ul",
];

/// Whether the element would get a layout box: neither it nor an ancestor is
/// hidden by tag, `hidden` attribute or inline `display:none`.
pub fn is_rendered(element: ElementRef<'_>) -> bool {
    std::iter::once(*element)
        .chain(element.ancestors())
        .filter_map(|node| node.value().as_element())
        .all(|el| {
            let name = el.name();
            if NEVER_RENDERED.contains(&name) || el.attr("hidden").is_some() {
                return false;
            }
            if name == "input"
                && el
                    .attr("type")
                    .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
            {
                return false;
            }
            !el.attr("style").is_some_and(hides_via_style)
        })
}

fn hides_via_style(style: &str) -> bool {
    let compact: String = style
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();
    compact
        .split(';')
        .any(|decl| decl.trim_end_matches("!important") == "display:none")
}

/// Visible text of an element, one line per block, whitespace collapsed within lines.
pub fn rendered_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(*element, &mut raw);
    raw.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Text(text) => out.push_str(text),
        Node::Element(el) => {
            let name = el.name();
            if NEVER_RENDERED.contains(&name) {
                return;
            }
            if let Some(element) = ElementRef::wrap(node) {
                if !is_rendered_self(element) {
                    return;
                }
            }
            if name == "br" {
                out.push('\n');
                return;
            }
            let block = BLOCK_ELEMENTS.contains(&name);
            if block {
                out.push('\n');
            }
            for child in node.children() {
                collect_text(child, out);
            }
            if block {
                out.push('\n');
            }
        }
        _ => {
            for child in node.children() {
                collect_text(child, out);
            }
        }
    }
}

fn is_rendered_self(element: ElementRef<'_>) -> bool {
    let el = element.value();
    el.attr("hidden").is_none() && !el.attr("style").is_some_and(hides_via_style)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> PageContext {
        PageContext::parse("https://www.indeed.com/viewjob?jk=42", html).unwrap()
    }

    #[test]
    fn host_and_href_come_from_url() {
        let page = page("<p>x</p>");
        assert_eq!(page.host(), "www.indeed.com");
        assert_eq!(page.href(), "https://www.indeed.com/viewjob?jk=42");
    }

    #[test]
    fn invalid_url_is_an_error() {
        assert!(matches!(
            PageContext::parse("not a url", ""),
            Err(PageError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn rendered_text_breaks_lines_at_blocks() {
        let page = page(
            "<div id=c><a>Acme   Corp</a><div>4.3 <b>stars</b></div><script>var x=1;</script></div>",
        );
        let el = page.select_first("#c").unwrap();
        assert_eq!(rendered_text(el), "Acme Corp\n4.3 stars");
    }

    #[test]
    fn hidden_subtrees_are_not_rendered() {
        let page = page(
            r#"<div style="display: none"><h1 id=a>Gone</h1></div>
               <h1 id=b hidden>Also gone</h1>
               <div><span id=c>Here</span><span style="display:none">nope</span></div>"#,
        );
        assert!(!is_rendered(page.select_first("#a").unwrap()));
        assert!(!is_rendered(page.select_first("#b").unwrap()));
        let c = page.select_first("#c").unwrap();
        assert!(is_rendered(c));
        let parent = ElementRef::wrap(c.parent().unwrap()).unwrap();
        assert_eq!(rendered_text(parent), "Here");
    }

    #[test]
    fn important_display_none_hides() {
        let page = page(
            r#"<p id=a style="color: red; display: none !important">x</p>
               <p id=b style="display:none!IMPORTANT;">y</p>
               <p id=c style="display: block !important">z</p>"#,
        );
        assert!(!is_rendered(page.select_first("#a").unwrap()));
        assert!(!is_rendered(page.select_first("#b").unwrap()));
        assert!(is_rendered(page.select_first("#c").unwrap()));
    }

    #[test]
    fn invalid_selector_yields_none() {
        let page = page("<h1>x</h1>");
        assert!(page.select_first("h1[").is_none());
    }
}
