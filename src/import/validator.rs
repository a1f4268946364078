//! Per-row coercion and validation of canonical book drafts.

use serde_json::Value;

use crate::models::book::BookStatus;
use crate::models::import::{BookDraft, InvalidRow, ValidatedBook};

/// Reported row numbers are 1-based file positions; the first data line sits
/// below a single header row, so array index 0 reports as row 2.
pub const HEADER_ROW_OFFSET: usize = 2;

/// Outcome of validating a batch of drafts, order-preserving on both sides.
#[derive(Debug, Default)]
pub struct ValidationSplit {
    pub valid: Vec<ValidatedBook>,
    pub invalid: Vec<InvalidRow>,
}

/// Stringify a loosely-typed value and trim it. Absent values become "".
fn coerce_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Coerce a published count to a non-negative-checkable integer.
/// Absent, null and empty-string values default to 0. Fractional numbers
/// are rejected: the canonical field is an integer.
fn coerce_count(value: Option<&Value>) -> Option<i64> {
    match value {
        None | Some(Value::Null) => Some(0),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Some(i)
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15)
                    .map(|f| f as i64)
            }
        }
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.is_empty() {
                return Some(0);
            }
            if let Ok(i) = s.parse::<i64>() {
                return Some(i);
            }
            s.parse::<f64>()
                .ok()
                .filter(|f| f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15)
                .map(|f| f as i64)
        }
        Some(Value::Bool(b)) => Some(i64::from(*b)),
        Some(_) => None,
    }
}

/// Status string after defaulting: blank-ish inputs become "Available",
/// everything else is stringified and trimmed for the enum check.
fn coerce_status(value: Option<&Value>) -> String {
    let is_blank = match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(Value::Bool(b)) => !*b,
        Some(_) => false,
    };
    if is_blank {
        return BookStatus::Available.as_str().to_string();
    }
    coerce_text(value)
}

/// Height is stringified as-is (no trim); blank-ish inputs become "".
fn coerce_height(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => {
            if n.as_f64() == Some(0.0) {
                String::new()
            } else {
                n.to_string()
            }
        }
        Some(Value::Bool(false)) => String::new(),
        Some(Value::Bool(true)) => "true".to_string(),
        Some(other) => other.to_string(),
    }
}

/// Validate a batch of drafts. A row is invalid when title or author is
/// empty after trimming, the published count is uncoercible or negative, or
/// a non-empty status falls outside the allowed enum. Invalid rows carry
/// their original file row index and coerced values for diagnostics.
pub fn validate_rows(drafts: &[BookDraft]) -> ValidationSplit {
    let mut split = ValidationSplit::default();

    for (index, draft) in drafts.iter().enumerate() {
        let title = coerce_text(draft.title.as_ref());
        let author = coerce_text(draft.author.as_ref());
        let genre = coerce_text(draft.genre.as_ref());
        let published_count = coerce_count(draft.published_count.as_ref());
        let status_str = coerce_status(draft.status.as_ref());
        let height = coerce_height(draft.height.as_ref());
        let publisher = coerce_text(draft.publisher.as_ref());
        let location = coerce_text(draft.location.as_ref());

        // A status that trims down to nothing is treated as unset.
        let status = if status_str.is_empty() {
            Some(BookStatus::default())
        } else {
            status_str.parse::<BookStatus>().ok()
        };

        let identified = !title.is_empty() && !author.is_empty();
        match (identified, published_count, status) {
            (true, Some(count), Some(status)) if count >= 0 => split.valid.push(ValidatedBook {
                title,
                author,
                genre,
                published_count: count,
                status,
                height,
                publisher,
                location,
            }),
            _ => split.invalid.push(InvalidRow {
                row: index + HEADER_ROW_OFFSET,
                title,
                author,
                genre,
                published_count,
                status: status_str,
                height,
                publisher,
                location,
            }),
        }
    }

    split
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn draft(title: Value, author: Value) -> BookDraft {
        BookDraft {
            title: Some(title),
            author: Some(author),
            ..Default::default()
        }
    }

    #[test]
    fn minimal_valid_row_gets_defaults() {
        let split = validate_rows(&[draft(json!("Dune"), json!("Frank Herbert"))]);
        assert_eq!(split.invalid.len(), 0);
        let book = &split.valid[0];
        assert_eq!(book.published_count, 0);
        assert_eq!(book.status, BookStatus::Available);
        assert_eq!(book.genre, "");
        assert_eq!(book.height, "");
    }

    #[test]
    fn whitespace_title_is_invalid() {
        let split = validate_rows(&[draft(json!("   "), json!("Someone"))]);
        assert!(split.valid.is_empty());
        assert_eq!(split.invalid[0].title, "");
    }

    #[test]
    fn missing_author_is_invalid() {
        let split = validate_rows(&[BookDraft {
            title: Some(json!("Dune")),
            ..Default::default()
        }]);
        assert!(split.valid.is_empty());
    }

    #[test]
    fn negative_count_is_invalid() {
        let mut d = draft(json!("Dune"), json!("Frank Herbert"));
        d.published_count = Some(json!(-1));
        let split = validate_rows(&[d]);
        assert!(split.valid.is_empty());
        assert_eq!(split.invalid[0].published_count, Some(-1));
    }

    #[test]
    fn non_numeric_count_is_invalid_and_reported_as_null() {
        let mut d = draft(json!("Dune"), json!("Frank Herbert"));
        d.published_count = Some(json!("many"));
        let split = validate_rows(&[d]);
        assert!(split.valid.is_empty());
        assert_eq!(split.invalid[0].published_count, None);
        let body = serde_json::to_value(&split.invalid[0]).unwrap();
        assert_eq!(body["publishedCount"], json!(null));
    }

    #[test]
    fn numeric_string_count_is_accepted() {
        let mut d = draft(json!("Dune"), json!("Frank Herbert"));
        d.published_count = Some(json!(" 12 "));
        let split = validate_rows(&[d]);
        assert_eq!(split.valid[0].published_count, 12);
    }

    #[test]
    fn empty_string_count_defaults_to_zero() {
        let mut d = draft(json!("Dune"), json!("Frank Herbert"));
        d.published_count = Some(json!(""));
        let split = validate_rows(&[d]);
        assert_eq!(split.valid[0].published_count, 0);
    }

    #[test]
    fn fractional_count_is_invalid() {
        let mut d = draft(json!("Dune"), json!("Frank Herbert"));
        d.published_count = Some(json!(2.5));
        let split = validate_rows(&[d]);
        assert!(split.valid.is_empty());
    }

    #[test]
    fn unknown_status_is_invalid() {
        let mut d = draft(json!("Dune"), json!("Frank Herbert"));
        d.status = Some(json!("Lost"));
        let split = validate_rows(&[d]);
        assert!(split.valid.is_empty());
        assert_eq!(split.invalid[0].status, "Lost");
    }

    #[test]
    fn borrowed_status_is_kept() {
        let mut d = draft(json!("Dune"), json!("Frank Herbert"));
        d.status = Some(json!(" Borrowed "));
        let split = validate_rows(&[d]);
        assert_eq!(split.valid[0].status, BookStatus::Borrowed);
    }

    #[test]
    fn row_index_accounts_for_header_row() {
        let rows = vec![
            draft(json!("A"), json!("B")),
            draft(json!(""), json!("B")),
            draft(json!(""), json!("C")),
        ];
        let split = validate_rows(&rows);
        assert_eq!(split.invalid[0].row, 3);
        assert_eq!(split.invalid[1].row, 4);
    }

    #[test]
    fn numeric_height_is_stringified() {
        let mut d = draft(json!("Dune"), json!("Frank Herbert"));
        d.height = Some(json!(23));
        let split = validate_rows(&[d]);
        assert_eq!(split.valid[0].height, "23");
    }

    #[test]
    fn order_is_preserved_across_the_split() {
        let rows = vec![
            draft(json!("A"), json!("a")),
            draft(json!("B"), json!("b")),
            draft(json!("C"), json!("c")),
        ];
        let split = validate_rows(&rows);
        let titles: Vec<_> = split.valid.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B", "C"]);
    }
}
