//! File-format adapters for bulk upload: delimited text and spreadsheet
//! workbooks. Everything else is rejected before parsing.

use std::path::{Path, PathBuf};

use calamine::{open_workbook, Data, Reader, Xlsx};
use serde_json::Value;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::import::{ImportRejection, RawRow};

/// Extensions accepted by the upload endpoint
pub const SUPPORTED_EXTENSIONS: &[&str] = &["csv", "xlsx", "xlsm"];

pub fn is_supported(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension)
}

/// Staged upload file, removed on drop so no exit path leaks it.
pub struct TempUpload {
    path: PathBuf,
}

impl TempUpload {
    /// Write the uploaded bytes under `dir` with a generated name.
    pub async fn stage(dir: &Path, bytes: &[u8]) -> AppResult<Self> {
        tokio::fs::create_dir_all(dir)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to create upload dir: {}", e)))?;
        let path = dir.join(Uuid::new_v4().to_string());
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to stage upload: {}", e)))?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to remove temp upload {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Parse a staged file into raw rows according to its extension.
/// Unsupported extensions surface as an import rejection, parse failures as
/// internal errors.
pub fn parse_rows(path: &Path, extension: &str) -> AppResult<Vec<RawRow>> {
    match extension {
        "csv" => parse_csv(path),
        "xlsx" | "xlsm" => parse_workbook(path),
        _ => Err(AppError::ImportRejected(
            ImportRejection::unsupported_format(),
        )),
    }
}

fn row_is_blank(row: &RawRow) -> bool {
    row.values()
        .all(|v| matches!(v, Value::String(s) if s.is_empty()))
}

/// Streaming CSV parse: first line is the header, one RawRow per data line.
fn parse_csv(path: &Path) -> AppResult<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(|e| AppError::Internal(format!("Failed to open CSV: {}", e)))?;

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| AppError::Internal(format!("Failed to read CSV header: {}", e)))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| AppError::Internal(format!("Failed to parse CSV: {}", e)))?;

        let mut row = RawRow::new();
        for (col, value) in record.iter().enumerate() {
            if let Some(header) = headers.get(col) {
                row.insert(header.clone(), Value::String(value.trim().to_string()));
            }
        }

        if row_is_blank(&row) {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Convert one workbook cell to a row value. Empty cells become empty
/// strings; date cells keep their date meaning instead of a raw serial.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::String(String::new()),
        Data::String(s) => Value::String(s.trim().to_string()),
        Data::Bool(b) => Value::Bool(*b),
        Data::Int(i) => Value::from(*i),
        Data::Float(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => {
            Value::from(*f as i64)
        }
        Data::Float(f) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(f.to_string())),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(naive) => Value::String(naive.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => Value::String(dt.as_f64().to_string()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) => Value::String(String::new()),
    }
}

/// Workbook parse: first sheet only, first row as header.
fn parse_workbook(path: &Path) -> AppResult<Vec<RawRow>> {
    let mut workbook: Xlsx<_> = open_workbook(path)
        .map_err(|e: calamine::XlsxError| AppError::Internal(format!("Failed to open workbook: {}", e)))?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::Internal("Workbook has no sheets".to_string()))?;

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| AppError::Internal(format!("Failed to read sheet: {}", e)))?;

    let mut sheet_rows = range.rows();
    let header_row = match sheet_rows.next() {
        Some(r) => r,
        None => return Ok(Vec::new()),
    };
    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for data_row in sheet_rows {
        let mut row = RawRow::new();
        for (col, cell) in data_row.iter().enumerate() {
            if let Some(header) = headers.get(col) {
                row.insert(header.clone(), cell_value(cell));
            }
        }

        if row_is_blank(&row) {
            continue;
        }
        rows.push(row);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn csv_rows_keep_header_order_and_values() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "title,author,Publication_Count").unwrap();
        writeln!(file, "Dune,Frank Herbert,4").unwrap();
        writeln!(file, "Emma, Jane Austen ,2").unwrap();

        let rows = parse_rows(file.path(), "csv").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("title"), Some(&Value::String("Dune".into())));
        // Cell values are trimmed on read
        assert_eq!(
            rows[1].get("author"),
            Some(&Value::String("Jane Austen".into()))
        );
        let keys: Vec<_> = rows[0].keys().cloned().collect();
        assert_eq!(keys, vec!["title", "author", "Publication_Count"]);
    }

    #[test]
    fn blank_csv_lines_are_skipped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "title,author").unwrap();
        writeln!(file, "Dune,Frank Herbert").unwrap();
        writeln!(file, ",").unwrap();
        writeln!(file, "Emma,Jane Austen").unwrap();

        let rows = parse_rows(file.path(), "csv").unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn header_only_csv_yields_no_rows() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "title,author").unwrap();

        let rows = parse_rows(file.path(), "csv").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn unsupported_extension_is_rejected() {
        let file = NamedTempFile::new().unwrap();
        let err = parse_rows(file.path(), "txt").unwrap_err();
        match err {
            AppError::ImportRejected(rejection) => {
                assert_eq!(rejection.message, "Unsupported file type");
            }
            other => panic!("expected import rejection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn temp_upload_is_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();
        let staged_path = {
            let upload = TempUpload::stage(dir.path(), b"title,author\n").await.unwrap();
            let path = upload.path().to_path_buf();
            assert!(path.exists());
            path
        };
        assert!(!staged_path.exists());
    }
}
