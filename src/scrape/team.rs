use std::collections::BTreeMap;

use scraper::{Html, Selector};
use tracing::debug;

use crate::extract::{FieldSource, FieldSpec, Page};
use crate::model::Team;
use crate::normalize::{canonical_title, country_from_flag_asset, parse_money, social_url};
use crate::scrape::roster::{self, RosterCandidate};
use crate::scrape::normalize_asset_url;

const SHORT_NAME: FieldSpec = FieldSpec::text(&["shortname", "short name", "abbreviation"]);
const REGION: FieldSpec = FieldSpec::text(&["region"]);
const LOCATION: FieldSpec = FieldSpec::text(&["location", "country"]);
const LOCATION_FLAG: FieldSpec = FieldSpec::flag(&["location", "country", "region"]);
const FOUNDED: FieldSpec = FieldSpec::text(&["founded", "created"]);
const COACH: FieldSpec = FieldSpec::text(&["coach", "manager"]);
const CAPTAIN: FieldSpec = FieldSpec::text(&["captain"]);
const EARNINGS: FieldSpec = FieldSpec::text(&["earnings", "total winnings"]);
const WEBSITE: FieldSpec = FieldSpec::text(&["website"]);
const LOGO: FieldSpec = FieldSpec::text(&["image", "logo"]);

/// Social platforms recognized both as infobox keys and by link domain.
pub(crate) const PLATFORMS: &[(&str, &[&str])] = &[
    ("twitter", &["twitter.com", "x.com"]),
    ("instagram", &["instagram.com"]),
    ("twitch", &["twitch.tv"]),
    ("youtube", &["youtube.com"]),
];

/// Parse a team page into a [`Team`] plus its unresolved roster
/// candidates. Missing fields keep their defaults; only the canonical
/// name is guaranteed.
pub fn parse_team_page(page: &Page, title: &str) -> (Team, Vec<RosterCandidate>) {
    let mut team = Team::named(canonical_title(title));
    let info = page.infobox("Infobox team");

    if let Some(short) = info.field(&SHORT_NAME) {
        team.short_name = short.to_uppercase();
    }
    if let Some(region) = info.field(&REGION) {
        team.region = region;
    }

    // Country: prefer the flag asset's encoded code, fall back to the
    // location text as-is.
    let flag_src = info.field(&LOCATION_FLAG);
    let code = flag_src.as_deref().and_then(country_from_flag_asset);
    if let Some(code) = &code {
        team.flag = Some(format!(
            "https://flagcdn.com/16x12/{}.png",
            code.to_lowercase()
        ));
    }
    team.country = code
        .or_else(|| info.field(&LOCATION))
        .unwrap_or_default();

    if let Some(founded) = info.field(&FOUNDED) {
        team.founded = founded;
    }
    team.coach = info.field(&COACH);
    team.captain = info.field(&CAPTAIN);
    team.earnings = info
        .field(&EARNINGS)
        .map(|raw| parse_money(&raw))
        .unwrap_or(0);

    team.social_links = social_links(page, info.as_ref(), &team.name);
    if let Some(website) = info.field(&WEBSITE).and_then(|raw| social_url("", &raw)) {
        team.social_links.insert("website".to_string(), website);
    }

    team.logo = logo(page, info.as_ref(), &team.name);

    let candidates = roster::resolve(page);
    debug!(team = %team.name, roster = candidates.len(), "parsed team page");
    (team, candidates)
}

/// Collect social links: infobox keys on the markup path, page anchors
/// matched by domain on the DOM path. First hit per platform wins.
pub(crate) fn social_links(
    page: &Page,
    info: &dyn FieldSource,
    page_name: &str,
) -> BTreeMap<String, String> {
    let mut links = BTreeMap::new();
    for (platform, domains) in PLATFORMS {
        let labels: &'static [&'static str] = match *platform {
            "twitter" => &["twitter"],
            "instagram" => &["instagram"],
            "twitch" => &["twitch"],
            "youtube" => &["youtube"],
            _ => &[],
        };
        if let Some(url) = info
            .field(&FieldSpec::text(labels))
            .and_then(|raw| social_url(platform, &raw))
        {
            links.insert(platform.to_string(), url);
            continue;
        }
        if let Page::Dom(html) = page {
            if let Some(url) = anchor_by_domain(html, domains) {
                links.insert(platform.to_string(), url);
            }
        }
    }
    if let Page::Dom(html) = page {
        let squashed = page_name.to_lowercase().replace(' ', "");
        if !squashed.is_empty() && !links.contains_key("website") {
            if let Some(url) = external_anchor(html, &squashed) {
                links.insert("website".to_string(), url);
            }
        }
    }
    links
}

fn anchor_by_domain(html: &Html, domains: &[&str]) -> Option<String> {
    let selector = Selector::parse("a[href]").ok()?;
    html.select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| domains.iter().any(|domain| href.contains(domain)))
        .map(str::to_string)
}

/// An off-wiki anchor whose URL contains the squashed entity name;
/// treated as the organization's own website. Known social domains are
/// already claimed by their platform and do not count.
fn external_anchor(html: &Html, squashed_name: &str) -> Option<String> {
    let selector = Selector::parse("a[href^=\"http\"]").ok()?;
    html.select(&selector)
        .filter_map(|a| a.value().attr("href"))
        .find(|href| {
            let lower = href.to_lowercase();
            !lower.contains("liquipedia.net")
                && !PLATFORMS
                    .iter()
                    .any(|(_, domains)| domains.iter().any(|d| lower.contains(d)))
                && lower.contains(squashed_name)
        })
        .map(str::to_string)
}

fn logo(page: &Page, info: &dyn FieldSource, name: &str) -> Option<String> {
    match page {
        // Markup: the infobox `image` parameter is the asset name.
        Page::Markup(_) => info.field(&LOGO),
        // DOM: first image whose alt text mentions the team.
        Page::Dom(html) => {
            let selector = Selector::parse("img[alt]").ok()?;
            let lower = name.to_lowercase();
            html.select(&selector)
                .find(|img| {
                    img.value()
                        .attr("alt")
                        .map(|alt| alt.to_lowercase().contains(&lower))
                        .unwrap_or(false)
                })
                .and_then(|img| img.value().attr("src"))
                .map(normalize_asset_url)
        }
    }
}
