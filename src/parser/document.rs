use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use super::sanitize::sanitize;
use super::sections::{segment, Sections};
use super::table::SpanMode;

static TITLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1#firstHeading").unwrap());
static ANY_H1_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1").unwrap());
static SCOPED_ROOT_SEL: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("#mw-content-text .mw-parser-output").unwrap());
static ROOT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse(".mw-parser-output").unwrap());
static NOISE_SEL: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "script, style, .mw-editsection, .navbox, .vertical-navbox, .navbox-styles, .metadata, sup.reference",
    )
    .unwrap()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Document {
    pub title: String,
    pub sections: Sections,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("no title element (h1) in document")]
    MissingTitle,
    #[error("no main content container (.mw-parser-output) in document")]
    MissingContentRoot,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AssembleOptions {
    pub mode: SpanMode,
    /// Fail with `MissingContentRoot` instead of returning empty sections.
    pub require_content_root: bool,
}

/// Detach scripts, styles, edit links, citation superscripts and navigation
/// boxes. Returns how many subtrees were removed.
pub fn strip_noise(html: &mut Html) -> usize {
    let ids: Vec<_> = html.root_element().select(&NOISE_SEL).map(|el| el.id()).collect();
    for id in &ids {
        if let Some(mut node) = html.tree.get_mut(*id) {
            node.detach();
        }
    }
    ids.len()
}

/// Build the document record from an already de-noised tree.
pub fn assemble(html: &Html, options: AssembleOptions) -> Result<Document, ExtractError> {
    // `Html::select` also visits detached nodes, so search from the root.
    let doc = html.root_element();
    let title = doc
        .select(&TITLE_SEL)
        .next()
        .or_else(|| doc.select(&ANY_H1_SEL).next())
        .map(|h1| sanitize(&h1.text().collect::<String>()))
        .filter(|t| !t.is_empty())
        .ok_or(ExtractError::MissingTitle)?;

    let root = doc
        .select(&SCOPED_ROOT_SEL)
        .next()
        .or_else(|| doc.select(&ROOT_SEL).next());

    let Some(root) = root else {
        if options.require_content_root {
            return Err(ExtractError::MissingContentRoot);
        }
        warn!(%title, "no content container, emitting empty sections");
        return Ok(Document {
            title,
            sections: Sections::new(),
        });
    };

    let sections = segment(root.children().filter_map(ElementRef::wrap), options.mode);
    debug!(%title, sections = sections.len(), "assembled document");
    Ok(Document { title, sections })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::blocks::ContentBlock;
    use crate::parser::sections::DEFAULT_HEADING;

    fn page(title: &str, body: &str) -> String {
        format!(
            r#"<html><head><title>{title}</title></head><body>
            <h1 id="firstHeading">{title}</h1>
            <div id="mw-content-text"><div class="mw-parser-output">{body}</div></div>
            </body></html>"#
        )
    }

    fn build(raw: &str, options: AssembleOptions) -> Result<Document, ExtractError> {
        let mut html = Html::parse_document(raw);
        strip_noise(&mut html);
        assemble(&html, options)
    }

    #[test]
    fn end_to_end_scenario() {
        let raw = page(
            "X",
            r#"<p>Intro text[1]</p>
            <h2>Details</h2>
            <table><tr><td>c1</td><td>c2</td></tr></table>
            <h2>Notes</h2>
            <ul><li>a</li><li></li></ul>"#,
        );
        let doc = build(&raw, AssembleOptions::default()).unwrap();
        assert_eq!(doc.title, "X");
        let keys: Vec<&str> = doc.sections.keys().map(String::as_str).collect();
        assert_eq!(keys, vec![DEFAULT_HEADING, "Details", "Notes"]);
        assert_eq!(doc.sections["Overview"], vec![ContentBlock::Text { text: "Intro text".into() }]);
        assert_eq!(
            doc.sections["Details"],
            vec![ContentBlock::Table { rows: vec![vec!["c1".into(), "c2".into()]] }]
        );
        assert_eq!(
            doc.sections["Notes"],
            vec![ContentBlock::List { items: vec!["a".into(), "".into()] }]
        );
    }

    #[test]
    fn missing_title_is_fatal() {
        let raw = r#"<html><body><div class="mw-parser-output"><p>x</p></div></body></html>"#;
        assert_eq!(build(raw, AssembleOptions::default()), Err(ExtractError::MissingTitle));
    }

    #[test]
    fn noise_only_title_counts_as_missing() {
        let raw = page("[编辑]", "<p>x</p>");
        assert_eq!(build(&raw, AssembleOptions::default()), Err(ExtractError::MissingTitle));
    }

    #[test]
    fn falls_back_to_any_h1() {
        let raw = r#"<html><body><h1>Plain</h1><div class="mw-parser-output"><p>x</p></div></body></html>"#;
        let doc = build(raw, AssembleOptions::default()).unwrap();
        assert_eq!(doc.title, "Plain");
        assert_eq!(doc.sections.len(), 1);
    }

    #[test]
    fn missing_root_is_lenient_by_default() {
        let raw = r#"<html><body><h1 id="firstHeading">T</h1><p>stray</p></body></html>"#;
        let doc = build(raw, AssembleOptions::default()).unwrap();
        assert_eq!(doc.title, "T");
        assert!(doc.sections.is_empty());
    }

    #[test]
    fn missing_root_can_be_strict() {
        let raw = r#"<html><body><h1 id="firstHeading">T</h1></body></html>"#;
        let options = AssembleOptions {
            require_content_root: true,
            ..Default::default()
        };
        assert_eq!(build(raw, options), Err(ExtractError::MissingContentRoot));
    }

    #[test]
    fn noise_removed_before_segmenting() {
        let raw = page(
            "N",
            r#"<style>.x{}</style>
            <h2>History<span class="mw-editsection"><span>[</span><a>edit</a><span>]</span></span></h2>
            <p>Fact<sup class="reference"><a>[a]</a></sup> stated.</p>
            <script>var x = 1;</script>
            <table class="navbox"><tr><td>nav</td></tr></table>"#,
        );
        let doc = build(&raw, AssembleOptions::default()).unwrap();
        let keys: Vec<&str> = doc.sections.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["History"]);
        assert_eq!(doc.sections["History"], vec![ContentBlock::Text { text: "Fact stated.".into() }]);
    }

    #[test]
    fn strip_noise_counts_subtrees() {
        let mut html = Html::parse_document(
            "<html><head><style>a{}</style><script></script></head><body><p>k</p></body></html>",
        );
        assert_eq!(strip_noise(&mut html), 2);
        assert_eq!(html.root_element().select(&NOISE_SEL).count(), 0);
    }

    #[test]
    fn deterministic() {
        let raw = std::fs::read_to_string("tests/fixtures/zh_article.html").unwrap();
        let first = build(&raw, AssembleOptions::default()).unwrap();
        let second = build(&raw, AssembleOptions::default()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }
}
