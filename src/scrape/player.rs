use scraper::Selector;
use tracing::debug;

use crate::extract::markup::{section, template_blocks, template_param};
use crate::extract::{FieldSpec, Page};
use crate::model::{Achievement, Player, SIGNATURE_HEROES_CAP};
use crate::normalize::{
    canonical_title, country_from_flag_asset, history_entry, parse_age, parse_money,
    role_from_text, strip_wiki_formatting, wiki_links,
};
use crate::scrape::{element_text, section_after_heading, team::social_links};

const USERNAME: FieldSpec = FieldSpec::text(&["id"]);
const REAL_NAME: FieldSpec = FieldSpec::text(&["name", "real name"]);
const NATIONALITY_FLAG: FieldSpec = FieldSpec::flag(&["nationality", "country"]);
const NATIONALITY: FieldSpec = FieldSpec::text(&["nationality", "country"]);
const BORN: FieldSpec = FieldSpec::text(&["born", "birth"]);
const AGE: FieldSpec = FieldSpec::text(&["age"]);
const ROLE: FieldSpec = FieldSpec::text(&["role", "position"]);
const TEAM: FieldSpec = FieldSpec::text(&["team", "current team"]);
const EARNINGS: FieldSpec = FieldSpec::text(&["earnings", "total winnings", "prize"]);

/// Parse a player page into a [`Player`]. Only the canonical name is
/// required; every missing field keeps its typed default.
pub fn parse_player_page(page: &Page, title: &str) -> Player {
    let mut player = Player::named(canonical_title(title));
    let info = page.infobox("Infobox player");

    if let Some(id) = info.field(&USERNAME) {
        player.username = id;
    }
    player.real_name = info.field(&REAL_NAME);

    let flag_src = info.field(&NATIONALITY_FLAG);
    player.country = flag_src
        .as_deref()
        .and_then(country_from_flag_asset)
        .or_else(|| info.field(&NATIONALITY))
        .unwrap_or_default();

    player.born = info.field(&BORN);
    player.age = player
        .born
        .as_deref()
        .and_then(parse_age)
        .or_else(|| info.field(&AGE).as_deref().and_then(parse_age));

    if let Some(role) = info.field(&ROLE) {
        player.role = role_from_text(&role);
    }
    player.team = info
        .field(&TEAM)
        .map(|raw| {
            wiki_links(&raw)
                .into_iter()
                .next()
                .unwrap_or(raw)
        })
        .filter(|team| !team.is_empty());

    player.earnings = info
        .field(&EARNINGS)
        .map(|raw| parse_money(&raw))
        .unwrap_or(0);

    player.social_links = social_links(page, info.as_ref(), &player.name);
    player.signature_heroes = signature_heroes(page);

    if let Page::Markup(text) = page {
        player.biography = biography(text);
        player.achievements = achievements(text);
        player.history = history(text);
    }

    debug!(player = %player.name, role = %player.role, "parsed player page");
    player
}

/// Signature heroes in source order, capped. Markup pages list them as
/// wiki links under a "Signature Heroes" heading; DOM pages as links in
/// the section following the same heading.
fn signature_heroes(page: &Page) -> Vec<String> {
    let mut heroes = match page {
        Page::Markup(text) => section(text, "Signature Heroes")
            .map(wiki_links)
            .unwrap_or_default(),
        Page::Dom(html) => {
            let Some(container) = section_after_heading(html, &["signature heroes"]) else {
                return Vec::new();
            };
            let Ok(link_selector) = Selector::parse("a") else {
                return Vec::new();
            };
            container
                .select(&link_selector)
                .map(|a| element_text(&a))
                .filter(|name| !name.is_empty())
                .collect()
        }
    };
    heroes.truncate(SIGNATURE_HEROES_CAP);
    heroes
}

/// The lead paragraph: the first prose line outside any template block,
/// flattened to plain text. Empty when the page opens straight into a
/// section.
fn biography(text: &str) -> String {
    let mut depth = 0usize;
    for line in text.lines() {
        let opens = line.matches("{{").count();
        let closes = line.matches("}}").count();
        if depth == 0 {
            let trimmed = line.trim();
            let structural = trimmed.is_empty()
                || trimmed.starts_with("{{")
                || trimmed.starts_with('|')
                || trimmed.starts_with("}}")
                || trimmed.starts_with("==")
                || trimmed.starts_with('*')
                || trimmed.starts_with('<');
            if !structural {
                return strip_wiki_formatting(trimmed);
            }
        }
        depth = (depth + opens).saturating_sub(closes);
    }
    String::new()
}

/// Tournament placements from the Achievements section. Entries missing
/// a place or an event are dropped; the rest of the list is kept.
fn achievements(text: &str) -> Vec<Achievement> {
    let Some(body) = section(text, "Achievements") else {
        return Vec::new();
    };
    template_blocks(body, "TournamentResultSlot")
        .into_iter()
        .filter_map(|block| {
            let place = template_param(block, "place")?;
            let event = template_param(block, "event")?;
            if place.is_empty() || event.is_empty() {
                return None;
            }
            Some(Achievement {
                place: place.to_string(),
                event: event.to_string(),
            })
        })
        .collect()
}

/// Team stints from the History section's bullet list, unparseable
/// bullets dropped.
fn history(text: &str) -> Vec<crate::model::Stint> {
    let Some(body) = section(text, "History") else {
        return Vec::new();
    };
    body.lines()
        .filter(|line| line.trim_start().starts_with('*'))
        .filter_map(history_entry)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Role;
    use scraper::Html;

    const PLAYER_MARKUP: &str = "\
{{Infobox player
|id=Aim
|name=John Doe
|nationality=United States
|birth=2000-05-05 (age 25)
|role=Duelist
|team=[[Sentinels]]
|earnings=$42,000
|twitter=aim_fps
|twitch=aim_live
}}

'''Aim''' is an American [[Duelist]] who plays for [[Sentinels]].

==Signature Heroes==
*[[Iron Man]]
*[[Hela]]
*[[Star-Lord|Star Lord]]
*[[Loki]]

==History==
* 2023-02-01 — 2024-01-10 [[Rival Gaming|Rivals]]
* 2024-01-15 — Present [[Sentinels]]
* joined sometime in 2022

==Achievements==
{{TournamentResultSlot|place=1st|event=Rivals Invitational}}
{{TournamentResultSlot|place=2nd}}
{{TournamentResultSlot|place=3rd|event=Ignite Cup}}
";

    #[test]
    fn markup_player_full_record() {
        let page = Page::Markup(PLAYER_MARKUP.to_string());
        let player = parse_player_page(&page, "Aim");

        assert_eq!(player.name, "Aim");
        assert_eq!(player.username, "Aim");
        assert_eq!(player.real_name.as_deref(), Some("John Doe"));
        assert_eq!(player.country, "United States");
        assert_eq!(player.born.as_deref(), Some("2000-05-05 (age 25)"));
        assert_eq!(player.age, Some(20));
        assert_eq!(player.role, Role::Duelist);
        assert_eq!(player.team.as_deref(), Some("Sentinels"));
        assert_eq!(player.earnings, 42_000);
        assert_eq!(
            player.social_links.get("twitter").map(String::as_str),
            Some("https://twitter.com/aim_fps")
        );
        assert_eq!(
            player.social_links.get("twitch").map(String::as_str),
            Some("https://twitch.tv/aim_live")
        );

        assert_eq!(
            player.biography,
            "Aim is an American Duelist who plays for Sentinels."
        );

        // Capped at three, source order preserved.
        assert_eq!(player.signature_heroes, vec!["Iron Man", "Hela", "Star Lord"]);

        // The placeless slot is dropped, the rest kept in order.
        assert_eq!(player.achievements.len(), 2);
        assert_eq!(player.achievements[0].place, "1st");
        assert_eq!(player.achievements[1].event, "Ignite Cup");

        // The unparseable bullet is dropped.
        assert_eq!(player.history.len(), 2);
        assert_eq!(player.history[0].team, "Rivals");
        assert_eq!(player.history[1].end, "Present");
    }

    #[test]
    fn dom_player_infobox() {
        let html = r#"
            <div class="infobox"><table>
              <tr><th>Name</th><td>Jane Roe</td></tr>
              <tr><th>Nationality</th>
                  <td><img src="/commons/images/KR/flag.png"/>South Korea</td></tr>
              <tr><th>Role</th><td>Main Tank</td></tr>
              <tr><th>Age</th><td>21</td></tr>
            </table></div>
            <a href="https://twitch.tv/hydra_live">Twitch</a>
            <h2>Signature Heroes</h2>
            <ul>
              <li><a href="/marvelrivals/Magneto">Magneto</a></li>
              <li><a href="/marvelrivals/Venom">Venom</a></li>
            </ul>"#;
        let page = Page::Dom(Html::parse_document(html));
        let player = parse_player_page(&page, "Hydra");

        assert_eq!(player.name, "Hydra");
        assert_eq!(player.real_name.as_deref(), Some("Jane Roe"));
        assert_eq!(player.country, "KR");
        assert_eq!(player.role, Role::Vanguard);
        assert_eq!(player.age, Some(21));
        assert_eq!(player.signature_heroes, vec!["Magneto", "Venom"]);
        assert_eq!(
            player.social_links.get("twitch").map(String::as_str),
            Some("https://twitch.tv/hydra_live")
        );
    }

    #[test]
    fn empty_page_keeps_defaults() {
        let page = Page::Markup("no infobox here".to_string());
        let player = parse_player_page(&page, "Ghost_Player");
        assert_eq!(player.name, "Ghost Player");
        assert_eq!(player.username, "Ghost Player");
        assert_eq!(player.role, Role::Flex);
        assert_eq!(player.earnings, 0);
        assert!(player.team.is_none());
        assert!(player.achievements.is_empty());
    }
}
