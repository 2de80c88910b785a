//! Field extraction over heterogeneous wiki documents.
//!
//! A fetched page arrives either as a parsed DOM tree (direct page
//! request) or as raw wikitext (API revision query). Both forms answer
//! the same [`FieldSource`] contract; call sites pick fields by
//! [`FieldSpec`] and never care which strategy is underneath.

pub(crate) mod dom;
pub(crate) mod markup;

use scraper::Html;

pub use dom::InfoboxDom;
pub use markup::TemplateMarkup;

/// How a field's value is conveyed in the source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    /// Plain text in the value cell / template parameter.
    Text,
    /// The value is an icon asset (national flag); the extractor returns
    /// the asset's encoded identifier instead of cell text.
    FlagAsset,
}

/// A field to look up: accepted label patterns (matched case-insensitively
/// as substrings against infobox labels, or as exact keys against template
/// parameters) plus the value kind.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub labels: &'static [&'static str],
    pub kind: ValueKind,
}

impl FieldSpec {
    pub const fn text(labels: &'static [&'static str]) -> Self {
        Self {
            labels,
            kind: ValueKind::Text,
        }
    }

    pub const fn flag(labels: &'static [&'static str]) -> Self {
        Self {
            labels,
            kind: ValueKind::FlagAsset,
        }
    }
}

/// One extraction strategy over one document. When the backing container
/// (infobox / template block) is absent, every lookup returns `None`;
/// absence is never an error.
pub trait FieldSource {
    /// Best-matching raw value for the spec; first match wins.
    fn field(&self, spec: &FieldSpec) -> Option<String>;
}

/// A fetched wiki page in whichever form the fetch boundary produced.
pub enum Page {
    Dom(Html),
    Markup(String),
}

impl Page {
    /// The strategy matching this document form, scoped to the named
    /// infobox template (markup) or the page's infobox container (DOM).
    pub fn infobox<'a>(&'a self, template: &'a str) -> Box<dyn FieldSource + 'a> {
        match self {
            Page::Dom(html) => Box::new(InfoboxDom::new(html)),
            Page::Markup(text) => Box::new(TemplateMarkup::new(text, template)),
        }
    }
}
