use scraper::{ElementRef, Html, Selector};

use super::{FieldSource, FieldSpec, ValueKind};
use crate::normalize::clean_text;

/// DOM-infobox extraction strategy.
///
/// Locates the structured fact table (`div.fo-nttax-infobox` on current
/// Liquipedia skins, plain `div.infobox` on older ones), then answers
/// field lookups by scanning its label/value rows. Supports both row
/// shapes seen in the wild: `<tr><th>label</th><td>value</td></tr>` and
/// the paired-div layout with an `infobox-description` label cell.
pub struct InfoboxDom<'a> {
    document: &'a Html,
}

impl<'a> InfoboxDom<'a> {
    pub fn new(document: &'a Html) -> Self {
        Self { document }
    }

    fn container(&self) -> Option<ElementRef<'a>> {
        let selector = Selector::parse("div.fo-nttax-infobox, div.infobox").ok()?;
        self.document.select(&selector).next()
    }

    fn rows(container: ElementRef<'a>) -> Vec<(String, ElementRef<'a>)> {
        let mut rows = Vec::new();

        if let (Ok(tr), Ok(th), Ok(td)) = (
            Selector::parse("tr"),
            Selector::parse("th"),
            Selector::parse("td"),
        ) {
            for row in container.select(&tr) {
                let Some(label) = row.select(&th).next() else {
                    continue;
                };
                let Some(value) = row.select(&td).next() else {
                    continue;
                };
                rows.push((clean_text(&label.text().collect::<String>()), value));
            }
        }

        if let Ok(desc) = Selector::parse("div.infobox-cell-2.infobox-description") {
            for label in container.select(&desc) {
                let Some(value) = label
                    .next_siblings()
                    .filter_map(ElementRef::wrap)
                    .next()
                else {
                    continue;
                };
                rows.push((clean_text(&label.text().collect::<String>()), value));
            }
        }

        rows
    }

    fn value_text(cell: ElementRef<'a>) -> Option<String> {
        let text = clean_text(&cell.text().collect::<String>());
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }

    fn value_flag(cell: ElementRef<'a>) -> Option<String> {
        let img = Selector::parse("img").ok()?;
        cell.select(&img)
            .next()
            .and_then(|e| e.value().attr("src"))
            .map(str::to_string)
    }
}

impl FieldSource for InfoboxDom<'_> {
    fn field(&self, spec: &FieldSpec) -> Option<String> {
        let container = self.container()?;
        let rows = Self::rows(container);
        for (label, value) in rows {
            let label_lower = label.to_lowercase();
            let matched = spec
                .labels
                .iter()
                .any(|pattern| label_lower.contains(&pattern.to_lowercase()));
            if !matched {
                continue;
            }
            let extracted = match spec.kind {
                ValueKind::Text => Self::value_text(value),
                ValueKind::FlagAsset => Self::value_flag(value),
            };
            if extracted.is_some() {
                return extracted;
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFOBOX_PAGE: &str = r#"
        <html><body>
        <div class="infobox">
          <table>
            <tr><th>Location</th><td>United States</td></tr>
            <tr><th>Nationality</th>
                <td><img src="/commons/images/US/flag.png"/>United States</td></tr>
            <tr><th>Region</th><td> NA </td></tr>
            <tr><th>Total Earnings</th><td>$12,500</td></tr>
          </table>
        </div>
        </body></html>"#;

    fn page() -> Html {
        Html::parse_document(INFOBOX_PAGE)
    }

    #[test]
    fn label_substring_match_first_wins() {
        let html = page();
        let source = InfoboxDom::new(&html);
        let spec = FieldSpec::text(&["Region"]);
        assert_eq!(source.field(&spec), Some("NA".to_string()));

        // "Location" and "Nationality" both carry country info; the first
        // matching row wins.
        let spec = FieldSpec::text(&["Location", "Nationality"]);
        assert_eq!(source.field(&spec), Some("United States".to_string()));
    }

    #[test]
    fn flag_field_returns_asset_identifier() {
        let html = page();
        let source = InfoboxDom::new(&html);
        let spec = FieldSpec::flag(&["Nationality", "Country"]);
        assert_eq!(
            source.field(&spec),
            Some("/commons/images/US/flag.png".to_string())
        );
    }

    #[test]
    fn missing_infobox_yields_absent_not_error() {
        let html = Html::parse_document("<html><body><p>stub page</p></body></html>");
        let source = InfoboxDom::new(&html);
        assert_eq!(source.field(&FieldSpec::text(&["Region"])), None);
    }

    #[test]
    fn paired_div_rows_are_scanned() {
        let html = Html::parse_document(
            r#"<div class="fo-nttax-infobox">
                 <div>
                   <div class="infobox-cell-2 infobox-description">Coach:</div>
                   <div>SolidFPS</div>
                 </div>
               </div>"#,
        );
        let source = InfoboxDom::new(&html);
        let spec = FieldSpec::text(&["Coach"]);
        assert_eq!(source.field(&spec), Some("SolidFPS".to_string()));
    }
}
