pub mod blocks;
pub mod document;
pub mod sanitize;
pub mod sections;
pub mod table;

use scraper::Html;
use tracing::debug;

pub use document::{AssembleOptions, Document, ExtractError};

/// Pipeline: raw HTML → parsed tree → noise pass → sections → document.
pub fn process_html(raw: &str, options: AssembleOptions) -> Result<Document, ExtractError> {
    let mut html = Html::parse_document(raw);
    let removed = document::strip_noise(&mut html);
    debug!(removed, "stripped noise subtrees");
    document::assemble(&html, options)
}
