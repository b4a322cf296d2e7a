use chrono::NaiveDate;
use itertools::Itertools;
use serde_json::Value;
use thiserror::Error;

/// Positional column names of a raw catalog record, in source order.
pub const RAW_COLUMNS: [&str; 13] = [
    "id",
    "ref_id",
    "project_name",
    "project_overview",
    "ref_id_2",
    "category",
    "release_type",
    "notes",
    "download_link",
    "agency",
    "unused_col_1",
    "unused_col_2",
    "unused_col_3",
];

const DROPPED_COLUMNS: [&str; 4] = ["ref_id_2", "unused_col_1", "unused_col_2", "unused_col_3"];

/// Fixed column order of the processed artifact.
pub const OUTPUT_COLUMNS: [&str; 11] = [
    "id",
    "ref_id",
    "agency",
    "project_name",
    "project_overview",
    "category",
    "release_type",
    "download_link",
    "github_repo",
    "notes",
    "date_extracted",
];

const MISSING: &str = "NA";

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("record {index} is not an array")]
    NotARecord { index: usize },
    #[error("record {index} has {found} columns, expected {expected}")]
    ColumnCount {
        index: usize,
        found: usize,
        expected: usize,
    },
    #[error("record {index}, column {column}: nested value where a scalar was expected")]
    NestedCell { index: usize, column: &'static str },
}

/// Final table: all-string rows in `OUTPUT_COLUMNS` order, deduplicated,
/// with missing values written as "NA".
#[derive(Debug)]
pub struct ProcessedTable {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

/// Working table: named columns over rows of nullable string cells.
#[derive(Debug)]
struct Table {
    columns: Vec<&'static str>,
    rows: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Attach the positional schema to each record and pull cells out as
    /// nullable strings. Non-string scalars keep their JSON display form.
    fn from_records(records: &[Value]) -> Result<Table, TransformError> {
        let mut rows = Vec::with_capacity(records.len());
        for (index, record) in records.iter().enumerate() {
            let fields = record
                .as_array()
                .ok_or(TransformError::NotARecord { index })?;
            if fields.len() != RAW_COLUMNS.len() {
                return Err(TransformError::ColumnCount {
                    index,
                    found: fields.len(),
                    expected: RAW_COLUMNS.len(),
                });
            }
            let mut row = Vec::with_capacity(fields.len());
            for (field, column) in fields.iter().zip(RAW_COLUMNS) {
                row.push(match field {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    Value::Bool(b) => Some(b.to_string()),
                    Value::Array(_) | Value::Object(_) => {
                        return Err(TransformError::NestedCell { index, column })
                    }
                });
            }
            rows.push(row);
        }
        Ok(Table {
            columns: RAW_COLUMNS.to_vec(),
            rows,
        })
    }

    fn position(&self, name: &str) -> usize {
        self.columns
            .iter()
            .position(|c| *c == name)
            .expect("column in schema")
    }

    /// Empty strings become the uniform null marker.
    fn normalize_empty(&mut self) {
        for row in &mut self.rows {
            for cell in row.iter_mut() {
                if cell.as_deref() == Some("") {
                    *cell = None;
                }
            }
        }
    }

    fn drop_columns(&mut self, names: &[&str]) {
        let dropped: Vec<usize> = names.iter().map(|name| self.position(name)).collect();
        for row in &mut self.rows {
            let mut idx = 0;
            row.retain(|_| {
                let keep = !dropped.contains(&idx);
                idx += 1;
                keep
            });
        }
        self.columns = self
            .columns
            .iter()
            .filter(|c| !names.contains(c))
            .copied()
            .collect();
    }

    fn stamp_date(&mut self, date: NaiveDate) {
        let stamp = date.format("%Y-%m-%d").to_string();
        self.columns.push("date_extracted");
        for row in &mut self.rows {
            row.push(Some(stamp.clone()));
        }
    }

    /// Route GitHub links into their own column; download_link keeps only
    /// non-GitHub links. The two are mutually exclusive per row.
    fn route_github_links(&mut self) {
        let link = self.position("download_link");
        self.columns.push("github_repo");
        for row in &mut self.rows {
            let is_github = row[link].as_deref().is_some_and(|l| l.contains("github"));
            let repo = if is_github { row[link].take() } else { None };
            row.push(repo);
        }
    }

    fn select(&mut self, order: &[&'static str]) {
        let indices: Vec<usize> = order.iter().map(|name| self.position(name)).collect();
        for row in &mut self.rows {
            *row = indices.iter().map(|&i| row[i].take()).collect();
        }
        self.columns = order.to_vec();
    }

    /// Drop exact-duplicate rows (first occurrence wins), then write out
    /// remaining nulls as "NA".
    fn finish(self) -> ProcessedTable {
        let rows = self
            .rows
            .into_iter()
            .unique()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.unwrap_or_else(|| MISSING.to_string()))
                    .collect()
            })
            .collect();
        ProcessedTable {
            columns: self.columns,
            rows,
        }
    }
}

/// Reshape cleaned positional records into the fixed processed table.
/// `date` stamps every row of the run.
pub fn transform_records(
    records: &[Value],
    date: NaiveDate,
) -> Result<ProcessedTable, TransformError> {
    let mut table = Table::from_records(records)?;
    table.normalize_empty();
    table.drop_columns(&DROPPED_COLUMNS);
    table.stamp_date(date);
    table.route_github_links();
    table.select(&OUTPUT_COLUMNS);
    Ok(table.finish())
}
