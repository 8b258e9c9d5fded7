use indexmap::IndexMap;
use scraper::ElementRef;
use tracing::debug;

use super::blocks::{classify, heading_text, ContentBlock, NodeKind};
use super::table::SpanMode;

/// Section key for content that appears before the first heading.
pub const DEFAULT_HEADING: &str = "Overview";

/// Heading text → blocks, in first-seen heading order.
pub type Sections = IndexMap<String, Vec<ContentBlock>>;

/// Accumulates top-level content nodes and commits them under the heading
/// that precedes them.
pub struct Segmenter<'a> {
    mode: SpanMode,
    current_heading: String,
    current_run: Vec<ElementRef<'a>>,
    sections: Sections,
}

impl<'a> Segmenter<'a> {
    pub fn new(mode: SpanMode) -> Self {
        Segmenter {
            mode,
            current_heading: DEFAULT_HEADING.to_string(),
            current_run: Vec::new(),
            sections: Sections::new(),
        }
    }

    pub fn push(&mut self, node: ElementRef<'a>) {
        match NodeKind::of(node) {
            NodeKind::Heading(depth) => {
                self.commit_run();
                self.current_heading = heading_text(node);
                debug!(depth, heading = %self.current_heading, "open section");
            }
            NodeKind::Paragraph | NodeKind::List | NodeKind::Table => self.current_run.push(node),
            NodeKind::Ignored => {}
        }
    }

    pub fn finish(mut self) -> Sections {
        self.commit_run();
        self.sections
    }

    /// Classify the pending run and file it under the current heading.
    /// An empty run commits nothing, so back-to-back headings leave no key.
    /// A repeated heading appends to its first entry.
    fn commit_run(&mut self) {
        if self.current_run.is_empty() {
            return;
        }
        let mode = self.mode;
        let blocks: Vec<ContentBlock> = self
            .current_run
            .drain(..)
            .filter_map(|node| classify(node, mode))
            .collect();
        debug!(heading = %self.current_heading, blocks = blocks.len(), "commit section");
        self.sections
            .entry(self.current_heading.clone())
            .or_default()
            .extend(blocks);
    }
}

/// Split an ordered node stream into heading-keyed sections.
pub fn segment<'a>(nodes: impl IntoIterator<Item = ElementRef<'a>>, mode: SpanMode) -> Sections {
    let mut segmenter = Segmenter::new(mode);
    for node in nodes {
        segmenter.push(node);
    }
    segmenter.finish()
}
