use super::{FieldSource, FieldSpec, ValueKind};
use crate::normalize::clean_text;

/// Template-markup extraction strategy.
///
/// Operates on the raw wikitext of a page as returned by the revision
/// API. Field lookups are `|key=value` parameter searches inside one
/// named template block (e.g. `Infobox player`), located by its opening
/// marker and brace balance.
pub struct TemplateMarkup<'a> {
    block: Option<&'a str>,
}

impl<'a> TemplateMarkup<'a> {
    pub fn new(text: &'a str, template: &str) -> Self {
        Self {
            block: template_blocks(text, template).into_iter().next(),
        }
    }
}

impl FieldSource for TemplateMarkup<'_> {
    fn field(&self, spec: &FieldSpec) -> Option<String> {
        let block = self.block?;
        for key in spec.labels {
            let Some(value) = template_param(block, key) else {
                continue;
            };
            let value = match spec.kind {
                ValueKind::Text => clean_text(value),
                // Wikitext conveys flags by country name, not by asset
                // path; hand the raw parameter back and let the
                // normalizer decide.
                ValueKind::FlagAsset => clean_text(value),
            };
            if !value.is_empty() {
                return Some(value);
            }
        }
        None
    }
}

/// All blocks of the named template, inner content only (between
/// `{{Name` and its balancing `}}`), in source order. Matching is
/// ASCII-case-insensitive on the template name and scans the original
/// text directly, so byte offsets stay valid regardless of what else
/// the page contains.
pub fn template_blocks<'a>(text: &'a str, name: &str) -> Vec<&'a str> {
    let marker = format!("{{{{{name}");
    let mut blocks = Vec::new();
    let mut from = 0;
    while let Some(pos) = find_ignore_ascii_case(&text[from..], &marker) {
        let inner_start = from + pos + marker.len();
        let Some(len) = balanced_block_len(&text[inner_start..]) else {
            break;
        };
        blocks.push(&text[inner_start..inner_start + len]);
        from = inner_start + len;
    }
    blocks
}

/// Byte offset of the first ASCII-case-insensitive occurrence of
/// `needle` in `haystack`. Non-ASCII bytes only match themselves.
fn find_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    (0..=haystack.len() - needle.len())
        .find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

/// Length of the block content starting just inside `{{Name`, up to the
/// matching `}}`. `None` when the block is never closed.
fn balanced_block_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i + 1 < bytes.len() {
        match &bytes[i..i + 2] {
            b"{{" => {
                depth += 1;
                i += 2;
            }
            b"}}" => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
                i += 2;
            }
            _ => i += 1,
        }
    }
    None
}

/// Look up a `|key=` parameter inside a template block. The key must
/// match exactly (ASCII case-insensitive, surrounding whitespace
/// ignored); the value runs to the next pipe, newline, or block end.
pub fn template_param<'a>(block: &'a str, key: &str) -> Option<&'a str> {
    let mut from = 0;
    while let Some(pos) = block[from..].find('|') {
        let after = &block[from + pos + 1..];
        if let Some(eq) = after.find('=') {
            let candidate = after[..eq].trim();
            // A pipe inside a wiki link is not a parameter separator;
            // such "keys" contain brackets and never match.
            if candidate.eq_ignore_ascii_case(key) {
                let raw = &after[eq + 1..];
                let end = raw
                    .find(|c| c == '|' || c == '\n')
                    .unwrap_or(raw.len());
                return Some(raw[..end].trim());
            }
        }
        from += pos + 1;
    }
    None
}

/// Slice out the body of a `== Heading ==` section, up to the next
/// heading of any level or the end of the page. Heading comparison is
/// ASCII case-insensitive on the trimmed heading text.
pub fn section<'a>(text: &'a str, heading: &str) -> Option<&'a str> {
    let mut from = 0;
    loop {
        let pos = text[from..].find("==")?;
        let start = from + pos;
        let after = &text[start + 2..];
        let close = after.find("==")?;
        let title = after[..close].trim_matches('=').trim();
        let body_start = start + 2 + close + 2;
        if title.eq_ignore_ascii_case(heading) {
            let body = &text[body_start..];
            let end = body.find("\n==").map(|i| i + 1).unwrap_or(body.len());
            return Some(&body[..end]);
        }
        from = body_start;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAYER_MARKUP: &str = r#"
{{Infobox player
|id=Aim
|name=John Doe
|nationality=United States
|role=Duelist
|earnings=$12,500
|twitter=aim_fps
|team=Sentinels
}}

==Signature Heroes==
*[[Iron Man]]
*[[Star-Lord|Star Lord]]

==Achievements==
{{TournamentResultSlot|place=1st|event=Rivals Invitational}}
{{TournamentResultSlot|place=3rd|event=Ignite Cup}}
"#;

    #[test]
    fn param_lookup_is_exact_key() {
        let source = TemplateMarkup::new(PLAYER_MARKUP, "Infobox player");
        assert_eq!(
            source.field(&FieldSpec::text(&["name"])),
            Some("John Doe".to_string())
        );
        // "id" must not match "name" or vice versa.
        assert_eq!(
            source.field(&FieldSpec::text(&["id"])),
            Some("Aim".to_string())
        );
        assert_eq!(source.field(&FieldSpec::text(&["manager"])), None);
    }

    #[test]
    fn value_stops_at_pipe_or_newline() {
        let block = "|role=Duelist|status=Active\n|team=Sentinels";
        assert_eq!(template_param(block, "role"), Some("Duelist"));
        assert_eq!(template_param(block, "status"), Some("Active"));
        assert_eq!(template_param(block, "team"), Some("Sentinels"));
    }

    #[test]
    fn missing_template_block_is_absent() {
        let source = TemplateMarkup::new("plain article text", "Infobox player");
        assert_eq!(source.field(&FieldSpec::text(&["name"])), None);
    }

    #[test]
    fn nested_templates_stay_inside_block() {
        let text = "{{Infobox team|name=X {{abbr|y}} Z|region=EU}} outside";
        let blocks = template_blocks(text, "Infobox team");
        assert_eq!(blocks.len(), 1);
        assert!(blocks[0].contains("region=EU"));
        assert!(!blocks[0].contains("outside"));
    }

    #[test]
    fn multibyte_text_before_template_keeps_offsets() {
        // "İ" lowercases to a different UTF-8 byte length; the block scan
        // must not be thrown off by surrounding non-ASCII prose.
        let text = "İstanbul-based roster.\n{{Infobox player\n|id=Aim\n|role=Duelist\n}}";
        let source = TemplateMarkup::new(text, "Infobox player");
        assert_eq!(
            source.field(&FieldSpec::text(&["id"])),
            Some("Aim".to_string())
        );
        assert_eq!(
            source.field(&FieldSpec::text(&["role"])),
            Some("Duelist".to_string())
        );
    }

    #[test]
    fn template_name_match_ignores_ascii_case() {
        let blocks = template_blocks("{{squadrow|player=Aim}}", "SquadRow");
        assert_eq!(blocks.len(), 1);
        assert_eq!(template_param(blocks[0], "player"), Some("Aim"));
    }

    #[test]
    fn repeated_templates_all_found() {
        let blocks = template_blocks(PLAYER_MARKUP, "TournamentResultSlot");
        assert_eq!(blocks.len(), 2);
        assert_eq!(template_param(blocks[0], "place"), Some("1st"));
        assert_eq!(template_param(blocks[1], "event"), Some("Ignite Cup"));
    }

    #[test]
    fn section_slicing_stops_at_next_heading() {
        let body = section(PLAYER_MARKUP, "Signature Heroes").unwrap();
        assert!(body.contains("Iron Man"));
        assert!(!body.contains("Achievements"));
        assert!(section(PLAYER_MARKUP, "History").is_none());
    }
}
