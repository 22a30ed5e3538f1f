//! Feedback input coercion and validation.
//!
//! Feedback arrives from the UI with loosely shaped payloads: the rated
//! message index may be a pair, a scalar or missing, and the like flag may be
//! a boolean or a word. Both are coerced here before anything is logged.

use serde_json::Value;

use crate::transcript::{ChatMessage, ChatRole};

/// Resolve the rated message index.
///
/// A list or pair uses its first element; a number (or numeric string) is
/// used directly; anything else, including an absent index, becomes 0.
pub fn resolve_message_index(raw: &Value) -> i64 {
    match raw {
        Value::Array(items) => items.first().map(scalar_index).unwrap_or(0),
        other => scalar_index(other),
    }
}

fn scalar_index(raw: &Value) -> i64 {
    match raw {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Coerce a like flag. Strings `true`, `like`, `1` and `yes` are likes.
pub fn coerce_liked(raw: &Value) -> bool {
    match raw {
        Value::Bool(b) => *b,
        Value::String(s) => matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "true" | "like" | "1" | "yes"
        ),
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Null => false,
    }
}

/// Validate feedback against the transcript.
///
/// Returns the index and like flag to record, or `None` when the index is
/// out of range or names a message the assistant did not write.
pub fn validate_feedback(
    history: &[ChatMessage],
    raw_index: &Value,
    raw_liked: &Value,
) -> Option<(usize, bool)> {
    let index = usize::try_from(resolve_message_index(raw_index)).ok()?;
    let message = history.get(index)?;
    if message.role != ChatRole::Assistant {
        return None;
    }
    Some((index, coerce_liked(raw_liked)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn history() -> Vec<ChatMessage> {
        vec![
            ChatMessage::user("Which engines are critical?"),
            ChatMessage::assistant("Engines 7 and 12."),
            ChatMessage::user("Why?"),
            ChatMessage::assistant("Low RUL."),
        ]
    }

    #[test]
    fn test_index_shapes() {
        assert_eq!(resolve_message_index(&json!([3, 0])), 3);
        assert_eq!(resolve_message_index(&json!([])), 0);
        assert_eq!(resolve_message_index(&json!(1)), 1);
        assert_eq!(resolve_message_index(&json!("2")), 2);
        assert_eq!(resolve_message_index(&Value::Null), 0);
        assert_eq!(resolve_message_index(&json!({"row": 1})), 0);
    }

    #[test]
    fn test_liked_coercion() {
        assert!(coerce_liked(&json!(true)));
        assert!(coerce_liked(&json!("Like")));
        assert!(coerce_liked(&json!(" yes ")));
        assert!(coerce_liked(&json!("1")));
        assert!(!coerce_liked(&json!("dislike")));
        assert!(!coerce_liked(&json!(false)));
        assert!(coerce_liked(&json!(1)));
        assert!(!coerce_liked(&Value::Null));
    }

    #[test]
    fn test_assistant_message_accepted() {
        assert_eq!(validate_feedback(&history(), &json!([1, 0]), &json!("like")), Some((1, true)));
        assert_eq!(validate_feedback(&history(), &json!(3), &json!(false)), Some((3, false)));
    }

    #[test]
    fn test_user_message_rejected() {
        assert_eq!(validate_feedback(&history(), &json!(2), &json!(true)), None);
        // absent index defaults to 0, which is the user's question
        assert_eq!(validate_feedback(&history(), &Value::Null, &json!(true)), None);
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert_eq!(validate_feedback(&history(), &json!(9), &json!(true)), None);
        assert_eq!(validate_feedback(&history(), &json!(-1), &json!(true)), None);
        assert_eq!(validate_feedback(&[], &json!(0), &json!(true)), None);
    }
}
