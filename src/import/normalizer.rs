//! Column-name normalization for imported rows.

use crate::models::import::{BookDraft, RawRow};

/// Canonical field name → accepted header aliases.
const FIELD_MAP: &[(&str, &[&str])] = &[
    ("title", &["title", "Title"]),
    ("author", &["author", "Author"]),
    ("genre", &["genre", "Genre"]),
    (
        "publishedCount",
        &[
            "publishedcount",
            "published_count",
            "Publication_Count",
            "publishedCount",
        ],
    ),
    ("status", &["status", "Status"]),
    ("height", &["height", "Height"]),
    ("publisher", &["publisher", "Publisher"]),
    ("location", &["location", "Location", "Library_Location"]),
];

/// Strip every non-alphanumeric character and lowercase, so that
/// `Publication_Count`, `publication-count` and `publicationcount` all
/// compare equal.
fn fold_header(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase()
}

/// Map one raw row's arbitrary column names onto the canonical book fields.
///
/// When several row keys match a canonical field, the last one encountered
/// in iteration order wins. That quirk is part of the import contract, so
/// the scan deliberately never breaks early. Fields with no matching column
/// stay absent; unrecognized columns are dropped.
pub fn normalize_row(row: &RawRow) -> BookDraft {
    let mut draft = BookDraft::default();
    for (field, aliases) in FIELD_MAP {
        let mut found: Option<&str> = None;
        for alias in *aliases {
            let folded_alias = fold_header(alias);
            for key in row.keys() {
                if fold_header(key) == folded_alias {
                    found = Some(key);
                }
            }
        }
        if let Some(key) = found {
            if let Some(value) = row.get(key) {
                draft.set(field, value.clone());
            }
        }
    }
    draft
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn row(pairs: &[(&str, Value)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn maps_exact_headers() {
        let draft = normalize_row(&row(&[
            ("title", json!("Dune")),
            ("author", json!("Frank Herbert")),
        ]));
        assert_eq!(draft.title, Some(json!("Dune")));
        assert_eq!(draft.author, Some(json!("Frank Herbert")));
        assert!(draft.genre.is_none());
    }

    #[test]
    fn matches_aliases_ignoring_case_and_punctuation() {
        let draft = normalize_row(&row(&[
            ("Publication_Count", json!("4")),
            ("Library_Location", json!("Shelf 9")),
            ("TITLE", json!("Emma")),
        ]));
        assert_eq!(draft.published_count, Some(json!("4")));
        assert_eq!(draft.location, Some(json!("Shelf 9")));
        assert_eq!(draft.title, Some(json!("Emma")));
    }

    #[test]
    fn unrecognized_columns_are_dropped() {
        let draft = normalize_row(&row(&[
            ("isbn", json!("978-3-16")),
            ("shelf_color", json!("red")),
            ("title", json!("Emma")),
        ]));
        assert!(draft.genre.is_none());
        assert!(draft.publisher.is_none());
        assert_eq!(draft.title, Some(json!("Emma")));
        assert!(draft.status.is_none());
        assert!(draft.height.is_none());
    }

    #[test]
    fn last_matching_column_wins() {
        // Two columns fold to "title"; the later key in iteration order
        // must win, even when the earlier one looks like a better match.
        let draft = normalize_row(&row(&[
            ("title", json!("first")),
            ("Title", json!("second")),
        ]));
        assert_eq!(draft.title, Some(json!("second")));
    }

    #[test]
    fn later_alias_beats_earlier_alias() {
        let draft = normalize_row(&row(&[
            ("published_count", json!(1)),
            ("publishedCount", json!(2)),
        ]));
        assert_eq!(draft.published_count, Some(json!(2)));
    }

    #[test]
    fn absent_fields_stay_absent() {
        let draft = normalize_row(&row(&[("genre", json!("Gothic"))]));
        assert!(draft.title.is_none());
        assert!(draft.published_count.is_none());
        assert_eq!(draft.genre, Some(json!("Gothic")));
    }
}
