use std::collections::HashSet;

use alert_core::{JobRecord, MIN_TITLE_LEN, UNKNOWN_COMPANY, UNSPECIFIED_LOCATION};
use alert_logging::alert_debug;
use ego_tree::NodeRef;
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// The postings list lives in this container; anything outside is ignored.
const LISTING_CONTAINER: &str = "#offers-list";
/// Origin prefixed onto relative posting links.
const SITE_ORIGIN: &str = "https://it.pracuj.pl";
/// Path fragments that mark an anchor as a posting link.
const POSTING_PATHS: [&str; 3] = ["/praca/", "/oferta/", "/job/"];
/// Tags considered when looking for company/location labels near an anchor.
const LABEL_TAGS: [&str; 3] = ["span", "div", "p"];
const COMPANY_CLASS_HINTS: [&str; 2] = ["company", "firma"];
const LOCATION_CLASS_HINTS: [&str; 3] = ["location", "miasto", "city"];

/// Extracts job records from raw listing-page HTML.
///
/// Markup drift degrades gracefully: a missing container or zero matching
/// anchors yields an empty vec, never an error.
pub fn parse_postings(html: &str) -> Vec<JobRecord> {
    let document = Html::parse_document(html);

    let (Ok(container_sel), Ok(anchor_sel)) =
        (Selector::parse(LISTING_CONTAINER), Selector::parse("a"))
    else {
        return Vec::new();
    };
    let Some(container) = document.select(&container_sel).next() else {
        alert_debug!("Listing container {LISTING_CONTAINER} not found in HTML");
        return Vec::new();
    };

    let mut jobs = Vec::new();
    let mut seen_titles: HashSet<String> = HashSet::new();

    for anchor in container.select(&anchor_sel) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        if !POSTING_PATHS.iter().any(|path| href.contains(path)) {
            continue;
        }

        let title = anchor.text().collect::<String>().trim().to_string();
        if title.chars().count() < MIN_TITLE_LEN || seen_titles.contains(&title) {
            continue;
        }

        let Some(link) = resolve_link(href) else {
            continue;
        };

        let (company, location) = nearby_labels(anchor);
        seen_titles.insert(title.clone());
        jobs.push(JobRecord {
            id: None,
            title,
            company,
            location,
            link,
            description: None,
        });
    }

    jobs
}

/// Relative links (leading `/`) get the site origin prefixed; absolute
/// `http(s)` links are kept as written if they parse; anything else is
/// discarded.
fn resolve_link(href: &str) -> Option<String> {
    let href = href.trim();
    if href.starts_with('/') {
        return Some(format!("{SITE_ORIGIN}{href}"));
    }
    if href.starts_with("http") && Url::parse(href).is_ok() {
        return Some(href.to_string());
    }
    None
}

/// Best-effort company/location lookup: walk to the anchor's parent element
/// and take the first descendant whose class attribute matches the
/// respective hint list.
fn nearby_labels(anchor: ElementRef) -> (String, String) {
    let company = labelled_text(anchor, &COMPANY_CLASS_HINTS)
        .unwrap_or_else(|| UNKNOWN_COMPANY.to_string());
    let location = labelled_text(anchor, &LOCATION_CLASS_HINTS)
        .unwrap_or_else(|| UNSPECIFIED_LOCATION.to_string());
    (company, location)
}

fn labelled_text(anchor: ElementRef, class_hints: &[&str]) -> Option<String> {
    let parent = anchor.parent().and_then(ElementRef::wrap)?;
    for node in parent.descendants() {
        if node.id() == parent.id() {
            continue;
        }
        if let Some(text) = label_candidate(node, class_hints) {
            return Some(text);
        }
    }
    None
}

fn label_candidate(node: NodeRef<Node>, class_hints: &[&str]) -> Option<String> {
    let element = ElementRef::wrap(node)?;
    if !LABEL_TAGS.contains(&element.value().name()) {
        return None;
    }
    let class = element.value().attr("class")?.to_ascii_lowercase();
    if !class_hints.iter().any(|hint| class.contains(hint)) {
        return None;
    }
    let text = element.text().collect::<String>().trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
