//! Display formatting for assistant replies.

use regex::Regex;
use serde::Serialize;

use crate::reply::{RawReply, NO_RESPONSE};
use crate::rounding::round_numbers_in_text;
use crate::table::ResultTable;

pub const DEFAULT_DECIMAL_PLACES: usize = 4;
pub const DEFAULT_MAX_INLINE_ROWS: usize = 25;

/// What the chat surface shows for one reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayPayload {
    /// Explanatory text, code removed and numbers rounded
    pub text: String,
    /// Rounded result table, `None` when absent or empty
    pub table: Option<ResultTable>,
    /// Inline markdown rendering of `table`
    pub table_markdown: Option<String>,
    /// Text followed by the inline table
    pub content: String,
}

/// Formats assistant replies for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyFormatter {
    pub decimal_places: usize,
    pub max_inline_rows: usize,
}

impl Default for ReplyFormatter {
    fn default() -> Self {
        Self {
            decimal_places: DEFAULT_DECIMAL_PLACES,
            max_inline_rows: DEFAULT_MAX_INLINE_ROWS,
        }
    }
}

impl ReplyFormatter {
    pub fn new(decimal_places: usize, max_inline_rows: usize) -> Self {
        Self {
            decimal_places,
            max_inline_rows,
        }
    }

    /// Format a reply and its optional result table.
    pub fn format(&self, raw: &RawReply, table: Option<&ResultTable>) -> DisplayPayload {
        let stripped = strip_code_blocks(&raw.normalize());
        let text = if stripped.is_empty() {
            NO_RESPONSE.to_string()
        } else {
            round_numbers_in_text(&stripped, self.decimal_places)
        };

        let table = table
            .filter(|t| !t.is_empty())
            .map(|t| t.round_floats(self.decimal_places));
        let table_markdown = table
            .as_ref()
            .map(|t| t.to_markdown(self.max_inline_rows))
            .filter(|md| !md.is_empty());

        let content = match &table_markdown {
            Some(md) => format!("{}\n\n{}", text, md),
            None => text.clone(),
        };

        DisplayPayload {
            text,
            table,
            table_markdown,
            content,
        }
    }
}

/// Remove fenced code blocks, including an unterminated trailing fence.
fn strip_code_blocks(text: &str) -> String {
    let Ok(fenced) = Regex::new(r"(?s)```.*?(```|$)") else {
        return text.trim().to_string();
    };
    let Ok(blank_runs) = Regex::new(r"\n{3,}") else {
        return text.trim().to_string();
    };
    let without = fenced.replace_all(text, "");
    blank_runs.replace_all(&without, "\n\n").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_only() {
        let payload = ReplyFormatter::default().format(&RawReply::text("rate 0.039212345"), None);
        assert_eq!(payload.text, "rate 0.0392");
        assert_eq!(payload.content, payload.text);
        assert!(payload.table.is_none());
    }

    #[test]
    fn test_code_never_displayed() {
        let raw = RawReply::text(
            "Here is the answer.\n\n```sql\nSELECT * FROM cnc_sensor\n```\n\nThree machines failed.",
        );
        let payload = ReplyFormatter::default().format(&raw, None);
        assert!(!payload.content.contains("SELECT"));
        assert_eq!(payload.text, "Here is the answer.\n\nThree machines failed.");

        let only_code = RawReply::text("```\nSELECT 1");
        assert_eq!(ReplyFormatter::default().format(&only_code, None).text, NO_RESPONSE);
    }

    #[test]
    fn test_table_attached() {
        let table = ResultTable::from_json(&json!({
            "columns": ["engine", "rul"],
            "data": [[1, 12.345678], [2, 40.0], [3, 99.5]]
        }))
        .unwrap();
        let payload = ReplyFormatter::new(2, 2).format(&RawReply::text("Lowest RUL:"), Some(&table));

        let md = payload.table_markdown.as_deref().unwrap();
        assert!(md.contains("| 1 | 12.35 |"));
        assert!(md.ends_with("_… and 1 more row(s)._"));
        assert!(payload.content.starts_with("Lowest RUL:\n\n| engine | rul |"));
    }

    #[test]
    fn test_empty_table_is_text_only() {
        let table = ResultTable::from_json(&json!({"columns": ["a"], "data": []})).unwrap();
        let payload = ReplyFormatter::default().format(&RawReply::text("nothing"), Some(&table));
        assert!(payload.table.is_none());
        assert!(payload.table_markdown.is_none());
        assert_eq!(payload.content, "nothing");
    }
}
