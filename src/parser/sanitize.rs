use std::sync::LazyLock;

use regex::Regex;

/// Bracketed editor-link text left behind by MediaWiki section headers.
static EDIT_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[\s*(?:编辑源代码|編輯原始碼|编辑|編輯|edit source|edit)\s*\]").unwrap()
});
static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\s*\d+\s*\]").unwrap());
static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strip wiki noise markers and collapse whitespace. Total and idempotent.
pub fn sanitize(raw: &str) -> String {
    let stripped = strip_markers(raw);
    WHITESPACE_RE.replace_all(&stripped, " ").trim().to_string()
}

/// Removal can expose a new marker (`[[1]2]` → `[2]`), so repeat until stable.
fn strip_markers(raw: &str) -> String {
    let mut text = raw.to_string();
    loop {
        let pass = EDIT_MARKER_RE.replace_all(&text, "");
        let pass = CITATION_RE.replace_all(&pass, "").into_owned();
        if pass == text {
            return text;
        }
        text = pass;
    }
}
