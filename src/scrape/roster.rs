//! Roster resolution over a team page.
//!
//! An ordered chain of strategies, each more permissive and less precise
//! than the last. Strategies run in order until the collected roster looks
//! plausible; every failure mode degrades to an empty roster, never an
//! error.

use itertools::Itertools;
use scraper::{Html, Selector};
use tracing::debug;

use crate::extract::markup::{section, template_blocks, template_param};
use crate::extract::Page;
use crate::model::Role;
use crate::normalize::role_from_text;
use crate::scrape::{article_title, element_text, section_after_heading};

/// Hard cap on roster size; entries beyond it are discarded in discovery
/// order.
pub const ROSTER_CAP: usize = 6;

/// A roster below this size is not yet plausible and the next strategy
/// still runs.
const MIN_PLAUSIBLE: usize = 3;

/// Anchor text containing any of these is an organization page, not a
/// player.
const ORG_KEYWORDS: &[&str] = &[
    "team",
    "esports",
    "gaming",
    "club",
    "tournament",
    "match",
    "vs",
];

/// A roster entry before the player's own page has been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterCandidate {
    pub name: String,
    pub role: Role,
}

/// Resolve a team's active roster from either document form.
pub fn resolve(page: &Page) -> Vec<RosterCandidate> {
    let roster = match page {
        Page::Dom(html) => resolve_dom(html),
        Page::Markup(text) => squad_rows(text),
    };
    debug!(count = roster.len(), "resolved roster");
    roster
}

/// DOM strategies, ordered from precise to permissive. Later strategies
/// only run while the combined roster stays below [`MIN_PLAUSIBLE`];
/// results append without duplicating earlier names.
const DOM_STRATEGIES: &[fn(&Html) -> Vec<RosterCandidate>] = &[header_anchored, bare_links];

fn resolve_dom(html: &Html) -> Vec<RosterCandidate> {
    let mut roster: Vec<RosterCandidate> = Vec::new();
    for strategy in DOM_STRATEGIES {
        if roster.len() >= MIN_PLAUSIBLE {
            break;
        }
        for candidate in strategy(html) {
            if roster.len() >= ROSTER_CAP {
                break;
            }
            if roster.iter().any(|c| c.name == candidate.name) {
                continue;
            }
            roster.push(candidate);
        }
    }
    roster.truncate(ROSTER_CAP);
    roster
}

/// Strategy 1: header-anchored table scan. Finds the "Active Squad" /
/// "Roster" section and reads player-link rows out of the next structured
/// sibling, inferring a role from each row's first cell.
fn header_anchored(html: &Html) -> Vec<RosterCandidate> {
    let Some(container) = section_after_heading(html, &["active squad", "roster"]) else {
        return Vec::new();
    };
    let (Ok(row_selector), Ok(cell_selector), Ok(link_selector)) = (
        Selector::parse("tr, li"),
        Selector::parse("td"),
        Selector::parse("a[href]"),
    ) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    for row in container.select(&row_selector) {
        if out.len() >= ROSTER_CAP {
            break;
        }
        let Some(link) = row.select(&link_selector).find(|a| {
            a.value()
                .attr("href")
                .and_then(article_title)
                .is_some()
        }) else {
            continue;
        };
        let name = element_text(&link);
        if name.len() < 2 || is_org_name(&name) {
            continue;
        }
        let role = row
            .select(&cell_selector)
            .next()
            .map(|cell| role_from_text(&element_text(&cell)))
            .unwrap_or_default();
        out.push(RosterCandidate { name, role });
    }
    out
}

/// Strategy 2: bare-link fallback. Scans the whole document for plausible
/// player-page links, deduplicated by exact anchor text.
fn bare_links(html: &Html) -> Vec<RosterCandidate> {
    let Ok(link_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    html.select(&link_selector)
        .filter(|link| {
            link.value()
                .attr("href")
                .and_then(article_title)
                .is_some()
        })
        .map(|link| element_text(&link))
        .filter(|name| name.len() >= 2 && !is_org_name(name))
        .unique()
        .take(ROSTER_CAP)
        .map(|name| RosterCandidate {
            name,
            role: Role::Flex,
        })
        .collect()
}

fn is_org_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    ORG_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Markup path: `SquadRow` template rows inside the Active Squad/Roster
/// section.
fn squad_rows(text: &str) -> Vec<RosterCandidate> {
    let body = section(text, "Active Squad")
        .or_else(|| section(text, "Roster"))
        .unwrap_or(text);
    template_blocks(body, "SquadRow")
        .into_iter()
        .filter_map(|row| {
            let name = template_param(row, "player")?.trim();
            if name.is_empty() {
                return None;
            }
            let role = template_param(row, "role")
                .map(role_from_text)
                .unwrap_or_default();
            Some(RosterCandidate {
                name: name.to_string(),
                role,
            })
        })
        .take(ROSTER_CAP)
        .collect()
}
