//! Page-level parsers: turn a fetched [`Page`](crate::extract::Page) into
//! normalized records.

pub mod player;
pub mod roster;
pub mod team;

use scraper::{ElementRef, Html, Selector};

use crate::normalize::clean_text;

const ARTICLE_PREFIX: &str = "/marvelrivals/";
const BASE_URL: &str = "https://liquipedia.net";

/// Full text of an element, whitespace-collapsed.
pub(crate) fn element_text(element: &ElementRef) -> String {
    clean_text(&element.text().collect::<String>())
}

/// The article title a wiki link points at, if the href is a plausible
/// article path: a single path segment under the wiki root, no namespace
/// separator (`Category:`, `Template:`, `File:`, `Special:` pages).
pub(crate) fn article_title(href: &str) -> Option<String> {
    let segment = href.strip_prefix(ARTICLE_PREFIX)?;
    if segment.is_empty() || segment.contains('/') || segment.contains(':') {
        return None;
    }
    // Strip fragment/query decoration.
    let segment = segment.split(['#', '?']).next().unwrap_or(segment);
    if segment.is_empty() {
        return None;
    }
    Some(segment.replace('_', " "))
}

/// Normalize a potentially relative asset URL to an absolute one.
pub(crate) fn normalize_asset_url(src: &str) -> String {
    if src.starts_with("//") {
        format!("https:{src}")
    } else if src.starts_with('/') {
        format!("{BASE_URL}{src}")
    } else {
        src.to_string()
    }
}

/// Find the first table/list element following a section heading whose
/// text case-insensitively contains one of `needles`. This anchors the
/// structured scans (roster tables, hero lists) the way readers navigate
/// the page: heading first, then the next structured sibling.
pub(crate) fn section_after_heading<'a>(
    document: &'a Html,
    needles: &[&str],
) -> Option<ElementRef<'a>> {
    let heading_selector = Selector::parse("h2, h3").ok()?;
    let heading = document.select(&heading_selector).find(|h| {
        let text = element_text(h).to_lowercase();
        needles.iter().any(|needle| text.contains(needle))
    })?;
    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| matches!(el.value().name(), "table" | "ul" | "div"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn article_title_accepts_single_segments() {
        assert_eq!(
            article_title("/marvelrivals/Team_Liquid"),
            Some("Team Liquid".to_string())
        );
        assert_eq!(article_title("/marvelrivals/Aim"), Some("Aim".to_string()));
    }

    #[test]
    fn article_title_rejects_namespaces_and_subpages() {
        assert_eq!(article_title("/marvelrivals/Category:Teams"), None);
        assert_eq!(article_title("/marvelrivals/Template:SquadRow"), None);
        assert_eq!(article_title("/marvelrivals/Sentinels/Results"), None);
        assert_eq!(article_title("/otherwiki/Aim"), None);
        assert_eq!(article_title("/marvelrivals/"), None);
    }

    #[test]
    fn section_lookup_finds_next_table() {
        let html = Html::parse_document(
            r#"<h2><span class="mw-headline">Active Squad</span></h2>
               <table><tr><td>row</td></tr></table>"#,
        );
        let section = section_after_heading(&html, &["active squad", "roster"]);
        assert!(section.is_some());
        assert_eq!(section.unwrap().value().name(), "table");
    }
}
