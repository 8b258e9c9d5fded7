use scraper::ElementRef;
use serde::Serialize;

use super::sanitize::sanitize;
use super::table::{self, RawCell, SpanMode};

/// One unit of classified section content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentBlock {
    Text { text: String },
    List { items: Vec<String> },
    Table { rows: Vec<Vec<String>> },
}

/// Closed set of top-level node kinds the segmenter understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// `h2`..`h4`, all flattened into one section tier.
    Heading(u8),
    Paragraph,
    List,
    Table,
    Ignored,
}

impl NodeKind {
    pub fn of(element: ElementRef<'_>) -> Self {
        let el = element.value();
        match el.name() {
            "p" => NodeKind::Paragraph,
            "ul" | "ol" => NodeKind::List,
            "table" => NodeKind::Table,
            name => match heading_depth(name) {
                Some(depth) => NodeKind::Heading(depth),
                // Newer MediaWiki skins wrap headings: <div class="mw-heading"><h2>..</h2></div>
                None if name == "div" && el.classes().any(|c| c == "mw-heading") => wrapped_heading(element)
                    .and_then(|h| heading_depth(h.value().name()))
                    .map_or(NodeKind::Ignored, NodeKind::Heading),
                None => NodeKind::Ignored,
            },
        }
    }
}

fn heading_depth(name: &str) -> Option<u8> {
    match name {
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        _ => None,
    }
}

fn wrapped_heading(wrapper: ElementRef<'_>) -> Option<ElementRef<'_>> {
    child_elements(wrapper).find(|c| heading_depth(c.value().name()).is_some())
}

/// Sanitized heading text, looking through an `mw-heading` wrapper when present.
pub fn heading_text(element: ElementRef<'_>) -> String {
    let target = match element.value().name() {
        "div" => wrapped_heading(element).unwrap_or(element),
        _ => element,
    };
    sanitize(&element_text(target))
}

/// Turn one content node into a block. Headings and unknown nodes yield nothing.
pub fn classify(element: ElementRef<'_>, mode: SpanMode) -> Option<ContentBlock> {
    match NodeKind::of(element) {
        NodeKind::Paragraph => {
            let text = sanitize(&element_text(element));
            (!text.is_empty()).then_some(ContentBlock::Text { text })
        }
        NodeKind::List => {
            let items = child_elements(element)
                .filter(|c| c.value().name() == "li")
                .map(|li| sanitize(&element_text(li)))
                .collect();
            Some(ContentBlock::List { items })
        }
        NodeKind::Table => {
            let rows = table::reconstruct(raw_rows(element), mode);
            (!rows.is_empty()).then_some(ContentBlock::Table { rows })
        }
        NodeKind::Heading(_) | NodeKind::Ignored => None,
    }
}

/// Rows owned by this table: direct `tr` children or those of its row groups.
/// Rows of nested tables are never reached.
fn raw_rows(table: ElementRef<'_>) -> Vec<Vec<RawCell>> {
    let mut rows = Vec::new();
    for child in child_elements(table) {
        match child.value().name() {
            "tr" => rows.push(raw_cells(child)),
            "thead" | "tbody" | "tfoot" => rows.extend(
                child_elements(child)
                    .filter(|r| r.value().name() == "tr")
                    .map(raw_cells),
            ),
            _ => {}
        }
    }
    rows
}

fn raw_cells(row: ElementRef<'_>) -> Vec<RawCell> {
    child_elements(row)
        .filter(|c| matches!(c.value().name(), "td" | "th"))
        .map(|c| {
            let el = c.value();
            RawCell::new(
                sanitize(&element_text(c)),
                table::parse_span(el.attr("rowspan")),
                table::parse_span(el.attr("colspan")),
            )
        })
        .collect()
}

fn child_elements<'a>(element: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    element.children().filter_map(ElementRef::wrap)
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}
