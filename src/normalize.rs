//! Pure text-normalization helpers. Every function here is total:
//! unrecognized input maps to a safe default, never an error.

use crate::model::{Role, Stint};

/// Map raw role text onto the fixed taxonomy. Case-insensitive substring
/// match; unknown text folds to [`Role::Flex`].
pub fn role_from_text(raw: &str) -> Role {
    const TABLE: &[(&str, Role)] = &[
        ("duelist", Role::Duelist),
        ("dps", Role::Duelist),
        ("damage", Role::Duelist),
        ("vanguard", Role::Vanguard),
        ("tank", Role::Vanguard),
        ("frontline", Role::Vanguard),
        ("strategist", Role::Strategist),
        ("support", Role::Strategist),
        ("healer", Role::Strategist),
    ];
    let lower = raw.to_lowercase();
    TABLE
        .iter()
        .find(|(needle, _)| lower.contains(needle))
        .map(|(_, role)| *role)
        .unwrap_or_default()
}

/// Extract a country code from a flag asset path. Liquipedia flag images
/// carry the ISO code as a path segment (`.../commons/US/flag.png`); the
/// first segment that is exactly two ASCII uppercase letters wins. This is
/// a naming-convention heuristic and silently yields `None` on assets that
/// do not follow it.
pub fn country_from_flag_asset(src: &str) -> Option<String> {
    src.split('/')
        .find(|part| part.len() == 2 && part.bytes().all(|b| b.is_ascii_uppercase()))
        .map(str::to_string)
}

/// Parse a monetary string by stripping every non-digit character.
/// `"$12,500"` becomes `12500`; text with no digits becomes `0`.
pub fn parse_money(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse().unwrap_or(0)
}

/// Pull an age out of surrounding prose: the first digit run, capped at two
/// digits, the way the source wikis write ages inline with birth dates.
pub fn parse_age(raw: &str) -> Option<u8> {
    let start = raw.find(|c: char| c.is_ascii_digit())?;
    let digits: String = raw[start..]
        .chars()
        .take_while(char::is_ascii_digit)
        .take(2)
        .collect();
    digits.parse().ok()
}

/// Canonical social-platform domains for bare handles.
fn platform_domain(platform: &str) -> Option<&'static str> {
    match platform {
        "twitter" | "x" => Some("twitter.com"),
        "twitch" => Some("twitch.tv"),
        "youtube" => Some("youtube.com"),
        "instagram" => Some("instagram.com"),
        _ => None,
    }
}

/// Normalize a social-media value to an absolute URL. Full URLs pass
/// through untouched; bare handles are expanded against the platform's
/// canonical domain. Unknown platforms with bare handles yield `None`.
pub fn social_url(platform: &str, raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if raw.starts_with("http://") || raw.starts_with("https://") {
        return Some(raw.to_string());
    }
    let handle = raw.trim_start_matches('@');
    platform_domain(platform).map(|domain| format!("https://{domain}/{handle}"))
}

/// Derive a team abbreviation from its full name: initials of up to three
/// words for multi-word names, first four characters otherwise, uppercased.
pub fn derive_short_name(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    if words.len() >= 2 {
        words
            .iter()
            .take(3)
            .filter_map(|w| w.chars().next())
            .collect::<String>()
            .to_uppercase()
    } else {
        name.chars().take(4).collect::<String>().to_uppercase()
    }
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonical form of a wiki page title: underscores become spaces,
/// whitespace is collapsed. Used for identity comparison and dedup.
pub fn canonical_title(raw: &str) -> String {
    clean_text(&raw.replace('_', " "))
}

/// Extract the display targets of `[[link]]` / `[[target|display]]` wiki
/// links, in source order. No deduplication; list fields keep the source's
/// ordering verbatim.
pub fn wiki_links(text: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut rest = text;
    while let Some(open) = rest.find("[[") {
        let after = &rest[open + 2..];
        let Some(close) = after.find("]]") else {
            break;
        };
        let inner = &after[..close];
        let display = inner.rsplit('|').next().unwrap_or(inner).trim();
        if !display.is_empty() {
            out.push(display.to_string());
        }
        rest = &after[close + 2..];
    }
    out
}

/// Flatten wiki inline formatting to plain prose: `[[target|display]]`
/// links collapse to their display text and bold/italic quote runs are
/// removed.
pub fn strip_wiki_formatting(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(open) = rest.find("[[") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        match after.find("]]") {
            Some(close) => {
                let inner = &after[..close];
                out.push_str(inner.rsplit('|').next().unwrap_or(inner));
                rest = &after[close + 2..];
            }
            None => {
                rest = after;
            }
        }
    }
    out.push_str(rest);
    clean_text(&out.replace("'''", "").replace("''", ""))
}

/// Parse one bullet line of a player's History section:
/// `* 2024-01-15 — 2024-11-02 [[Team]]` or an open-ended
/// `* 2024-01-15 — Present [[Team]]`. Lines without a start date or a
/// team link are unparseable and dropped; the caller keeps the rest of
/// the list.
pub fn history_entry(line: &str) -> Option<Stint> {
    let line = line.trim().trim_start_matches('*').trim();
    let (start_at, start) = find_date(line)?;
    let team = wiki_links(line).into_iter().next()?;
    let rest = &line[start_at + start.len()..];
    let end = find_date(rest)
        .map(|(_, date)| date.to_string())
        .unwrap_or_else(|| "Present".to_string());
    Some(Stint {
        team,
        start: start.to_string(),
        end,
    })
}

/// First `YYYY-MM-DD` token in the text, with its byte offset.
fn find_date(text: &str) -> Option<(usize, &str)> {
    let bytes = text.as_bytes();
    (0..bytes.len().saturating_sub(9)).find_map(|i| {
        let window = &bytes[i..i + 10];
        let shaped = window.iter().enumerate().all(|(j, b)| match j {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
        if shaped {
            Some((i, &text[i..i + 10]))
        } else {
            None
        }
    })
}
