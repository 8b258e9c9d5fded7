use crate::parser::blocks::ContentBlock;
use crate::parser::Document;

const RULE_WIDTH: usize = 60;

/// Console layout: title banner, then one `== heading ==` block per section.
pub fn render(doc: &Document) -> String {
    let mut lines = vec![
        "=".repeat(RULE_WIDTH),
        doc.title.clone(),
        "=".repeat(RULE_WIDTH),
    ];

    for (heading, blocks) in &doc.sections {
        lines.push(String::new());
        lines.push(format!("== {} ==", heading));
        if blocks.is_empty() {
            lines.push("(empty)".to_string());
        }
        for block in blocks {
            match block {
                ContentBlock::Text { text } => lines.push(format!("[Text] {}", text)),
                ContentBlock::List { items } => {
                    lines.push(format!("[List] {} items", items.len()));
                    lines.extend(
                        items
                            .iter()
                            .enumerate()
                            .map(|(i, item)| format!("  {}. {}", i + 1, item)),
                    );
                }
                ContentBlock::Table { rows } => {
                    lines.push(format!("[Table] {} rows", rows.len()));
                    lines.extend(rows.iter().map(|row| format!("  {}", row.join(" | "))));
                }
            }
        }
    }

    lines.join("\n")
}

pub fn print(doc: &Document) {
    println!("{}\n", render(doc));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::sections::Sections;

    #[test]
    fn renders_each_block_kind() {
        let mut sections = Sections::new();
        sections.insert(
            "Overview".into(),
            vec![ContentBlock::Text { text: "Intro".into() }],
        );
        sections.insert(
            "Data".into(),
            vec![
                ContentBlock::Table {
                    rows: vec![vec!["a".into(), "b".into()], vec!["c".into()]],
                },
                ContentBlock::List {
                    items: vec!["x".into(), "".into()],
                },
            ],
        );
        sections.insert("Empty".into(), Vec::new());
        let doc = Document {
            title: "T".into(),
            sections,
        };

        let out = render(&doc);
        let expected = [
            "=".repeat(RULE_WIDTH).as_str(),
            "T",
            "=".repeat(RULE_WIDTH).as_str(),
            "",
            "== Overview ==",
            "[Text] Intro",
            "",
            "== Data ==",
            "[Table] 2 rows",
            "  a | b",
            "  c",
            "[List] 2 items",
            "  1. x",
            "  2. ",
            "",
            "== Empty ==",
            "(empty)",
        ]
        .join("\n");
        assert_eq!(out, expected);
    }
}
