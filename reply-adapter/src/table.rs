//! Tabular results returned alongside an assistant reply.

use serde::{Deserialize, Serialize};
use serde_json::Value;

static MISSING: Value = Value::Null;

/// Typed column values. `None` is a missing cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "values", rename_all = "snake_case")]
pub enum ColumnData {
    Float(Vec<Option<f64>>),
    Int(Vec<Option<i64>>),
    Bool(Vec<Option<bool>>),
    Text(Vec<Option<String>>),
}

impl ColumnData {
    fn len(&self) -> usize {
        match self {
            Self::Float(v) => v.len(),
            Self::Int(v) => v.len(),
            Self::Bool(v) => v.len(),
            Self::Text(v) => v.len(),
        }
    }

    /// Infer a column type from raw cells.
    fn infer(cells: &[&Value]) -> Self {
        let present: Vec<&Value> = cells.iter().copied().filter(|v| !v.is_null()).collect();
        if present.is_empty() {
            return Self::Text(vec![None; cells.len()]);
        }
        if present.iter().all(|v| v.is_boolean()) {
            return Self::Bool(cells.iter().map(|v| v.as_bool()).collect());
        }
        if present.iter().all(|v| v.is_i64()) {
            return Self::Int(cells.iter().map(|v| v.as_i64()).collect());
        }
        if present.iter().all(|v| v.is_number()) {
            return Self::Float(cells.iter().map(|v| v.as_f64()).collect());
        }
        Self::Text(
            cells
                .iter()
                .map(|v| match v {
                    Value::Null => None,
                    Value::String(s) => Some(s.clone()),
                    other => Some(other.to_string()),
                })
                .collect(),
        )
    }

    fn cell(&self, row: usize) -> String {
        let rendered = match self {
            Self::Float(v) => v[row].map(|f| format!("{:?}", f)),
            Self::Int(v) => v[row].map(|i| i.to_string()),
            Self::Bool(v) => v[row].map(|b| b.to_string()),
            Self::Text(v) => v[row].clone(),
        };
        rendered.unwrap_or_default()
    }
}

/// A named column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// Column-oriented result table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultTable {
    pub columns: Vec<Column>,
}

impl ResultTable {
    /// Parse a table from JSON.
    ///
    /// Accepts the split shape `{"columns": [..], "data": [[..], ..]}`, which
    /// keeps column order, or a list of record objects. Returns `None` for
    /// anything else.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Object(map) => {
                let names = map.get("columns")?.as_array()?;
                let rows = map.get("data")?.as_array()?;
                let names: Vec<String> = names
                    .iter()
                    .map(|n| n.as_str().map(str::to_string).unwrap_or_else(|| n.to_string()))
                    .collect();
                let rows: Vec<&Vec<Value>> = rows.iter().filter_map(Value::as_array).collect();
                Some(Self::build(&names, |row, col| rows[row].get(col), rows.len()))
            }
            Value::Array(records) => {
                let records: Vec<_> = records.iter().filter_map(Value::as_object).collect();
                let mut names: Vec<String> = Vec::new();
                for record in &records {
                    for key in record.keys() {
                        if !names.contains(key) {
                            names.push(key.clone());
                        }
                    }
                }
                Some(Self::build(
                    &names,
                    |row, col| records[row].get(&names[col]),
                    records.len(),
                ))
            }
            _ => None,
        }
    }

    fn build<'a>(
        names: &[String],
        cell: impl Fn(usize, usize) -> Option<&'a Value>,
        rows: usize,
    ) -> Self {
        let columns = names
            .iter()
            .enumerate()
            .map(|(c, name)| {
                let cells: Vec<&Value> = (0..rows)
                    .map(|r| cell(r, c).unwrap_or(&MISSING))
                    .collect();
                Column {
                    name: name.clone(),
                    data: ColumnData::infer(&cells),
                }
            })
            .collect();
        Self { columns }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.columns.first().map(|c| c.data.len()).unwrap_or(0)
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }

    /// Copy with float columns rounded to `places`; other columns unchanged.
    pub fn round_floats(&self, places: usize) -> Self {
        let factor = 10f64.powi(places as i32);
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                data: match &c.data {
                    ColumnData::Float(values) => ColumnData::Float(
                        values
                            .iter()
                            .map(|v| v.map(|f| (f * factor).round() / factor))
                            .collect(),
                    ),
                    other => other.clone(),
                },
            })
            .collect();
        Self { columns }
    }

    /// Markdown table of at most `max_rows` rows.
    ///
    /// Empty tables render as an empty string; truncation appends a note
    /// with the number of hidden rows.
    pub fn to_markdown(&self, max_rows: usize) -> String {
        let total = self.row_count();
        if total == 0 || self.columns.is_empty() {
            return String::new();
        }

        let line = |cells: Vec<String>| format!("| {} |", cells.join(" | "));
        let mut lines = Vec::with_capacity(max_rows.min(total) + 2);
        lines.push(line(self.columns.iter().map(|c| escape(&c.name)).collect()));
        lines.push(line(self.columns.iter().map(|_| "---".to_string()).collect()));
        for row in 0..total.min(max_rows) {
            lines.push(line(
                self.columns.iter().map(|c| escape(&c.data.cell(row))).collect(),
            ));
        }

        let mut table = lines.join("\n");
        if total > max_rows {
            table.push_str(&format!("\n_… and {} more row(s)._", total - max_rows));
        }
        table
    }
}

fn escape(cell: &str) -> String {
    cell.replace('|', "\\|")
}
