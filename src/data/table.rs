//! In-memory tables
//!
//! Column-named rows of loosely typed cells, with the few relational
//! operations the feature pipeline needs: select, rename and left join.

use crate::{MadnessError, Result};
use csv::{ReaderBuilder, WriterBuilder};
use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};

/// Cell contents treated as missing when reading delimited text
const NA_MARKERS: [&str; 7] = ["", "NA", "N/A", "NaN", "nan", "null", "#N/A"];

/// A single table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Number(f64),
    Text(String),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Integral numbers only (years, rounds)
    pub fn as_i64(&self) -> Option<i64> {
        self.as_f64()
            .filter(|n| n.is_finite() && n.fract() == 0.0)
            .map(|n| n as i64)
    }

    fn join_key(&self) -> Option<KeyPart> {
        match self {
            Value::Missing => None,
            // -0.0 and 0.0 must land in the same bucket
            Value::Number(n) => Some(KeyPart::Number((n + 0.0).to_bits())),
            Value::Text(s) => Some(KeyPart::Text(s.clone())),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Missing)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum KeyPart {
    Number(u64),
    Text(String),
}

/// Composite join key; `None` if any part is missing
fn row_key(row: &[Value], key_columns: &[usize]) -> Option<Vec<KeyPart>> {
    key_columns.iter().map(|&i| row[i].join_key()).collect()
}

fn is_na(cell: &str) -> bool {
    NA_MARKERS.contains(&cell)
}

/// A named table of rows sharing one column layout
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    name: String,
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create an empty table with the given columns
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Table {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    /// Create a table from rows, checking that every row matches the header
    pub fn from_rows(
        name: impl Into<String>,
        columns: Vec<String>,
        rows: Vec<Vec<Value>>,
    ) -> Result<Self> {
        let mut table = Table::new(name, columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    /// Read delimited text with a header row.
    ///
    /// Headers are kept verbatim. A column is numeric when every present
    /// cell parses as a number; otherwise its present cells stay text.
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(reader);
        let columns: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();

        let mut raw: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            raw.push(record.iter().map(str::to_string).collect());
        }

        let numeric: Vec<bool> = (0..columns.len())
            .map(|col| {
                raw.iter()
                    .all(|row| is_na(&row[col]) || row[col].trim().parse::<f64>().is_ok())
            })
            .collect();

        let rows = raw
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .zip(&numeric)
                    .map(|(cell, &is_numeric)| parse_cell(cell, is_numeric))
                    .collect()
            })
            .collect();

        Ok(Table {
            name: name.into(),
            columns,
            rows,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Position of a column, or `MissingColumn`
    pub fn column_index(&self, column: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .ok_or_else(|| MadnessError::MissingColumn {
                table: self.name.clone(),
                column: column.to_string(),
            })
    }

    /// All values of one column, in row order
    pub fn column(&self, column: &str) -> Result<Vec<&Value>> {
        let idx = self.column_index(column)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    pub fn value(&self, row: usize, column: &str) -> Result<&Value> {
        let idx = self.column_index(column)?;
        self.rows
            .get(row)
            .map(|r| &r[idx])
            .ok_or_else(|| MadnessError::Parse(format!("row {} out of range in '{}'", row, self.name)))
    }

    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(MadnessError::RowWidth {
                table: self.name.clone(),
                row: self.rows.len(),
                found: row.len(),
                expected: self.columns.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Keep only the named columns, in the given order
    pub fn select(&self, columns: &[&str]) -> Result<Table> {
        let indices = columns
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>>>()?;

        Ok(Table {
            name: self.name.clone(),
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
                .collect(),
        })
    }

    /// Rename every column through `f`
    pub fn rename_with<F>(&self, f: F) -> Table
    where
        F: Fn(&str) -> String,
    {
        Table {
            name: self.name.clone(),
            columns: self.columns.iter().map(|c| f(c)).collect(),
            rows: self.rows.clone(),
        }
    }

    /// Left outer join on equally named key columns.
    ///
    /// Every left row survives. A left row with several matches is repeated
    /// once per match, in right-table order; a row without a match gets
    /// `Missing` for all right columns. Missing keys never match.
    pub fn left_join(&self, right: &Table, on: &[&str]) -> Result<Table> {
        let left_keys = on
            .iter()
            .map(|c| self.column_index(c))
            .collect::<Result<Vec<_>>>()?;
        let right_keys = on
            .iter()
            .map(|c| right.column_index(c))
            .collect::<Result<Vec<_>>>()?;

        let right_extra: Vec<usize> = (0..right.columns.len())
            .filter(|i| !right_keys.contains(i))
            .collect();

        let mut columns = self.columns.clone();
        for &i in &right_extra {
            let column = &right.columns[i];
            if columns.contains(column) {
                return Err(MadnessError::DuplicateColumn {
                    table: self.name.clone(),
                    column: column.clone(),
                });
            }
            columns.push(column.clone());
        }

        let mut index: HashMap<Vec<KeyPart>, Vec<usize>> = HashMap::new();
        for (row_idx, row) in right.rows.iter().enumerate() {
            if let Some(key) = row_key(row, &right_keys) {
                index.entry(key).or_default().push(row_idx);
            }
        }

        let mut rows = Vec::with_capacity(self.rows.len());
        for row in &self.rows {
            match row_key(row, &left_keys).and_then(|key| index.get(&key)) {
                Some(matched) => {
                    for &r in matched {
                        let mut joined = row.clone();
                        joined.extend(right_extra.iter().map(|&i| right.rows[r][i].clone()));
                        rows.push(joined);
                    }
                }
                None => {
                    let mut joined = row.clone();
                    joined.resize(columns.len(), Value::Missing);
                    rows.push(joined);
                }
            }
        }

        Ok(Table {
            name: self.name.clone(),
            columns,
            rows,
        })
    }

    /// Write as CSV with a header row; missing cells are left empty
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = WriterBuilder::new().from_writer(writer);
        writer.write_record(&self.columns)?;
        for row in &self.rows {
            writer.write_record(row.iter().map(|v| v.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }
}

fn parse_cell(cell: String, is_numeric: bool) -> Value {
    if is_na(&cell) {
        return Value::Missing;
    }
    match cell.trim().parse::<f64>() {
        Ok(n) if is_numeric => Value::Number(n),
        _ => Value::Text(cell),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, csv: &str) -> Table {
        Table::from_reader(name, csv.as_bytes()).unwrap()
    }

    #[test]
    fn test_column_type_inference() {
        let t = table(
            "teams",
            "YEAR,TEAM NO,TEAM,SCORE\n2024,1,Duke,80\n2024,2,76ers,\n2023,3,UNC,NA\n",
        );

        assert_eq!(t.columns(), &["YEAR", "TEAM NO", "TEAM", "SCORE"]);
        assert_eq!(t.len(), 3);
        assert_eq!(t.value(0, "YEAR").unwrap(), &Value::Number(2024.0));
        // Mixed column stays text even where a cell looks numeric
        assert_eq!(t.value(1, "TEAM").unwrap(), &Value::Text("76ers".into()));
        assert!(t.value(1, "SCORE").unwrap().is_missing());
        assert!(t.value(2, "SCORE").unwrap().is_missing());
    }

    #[test]
    fn test_header_only_table() {
        let t = table("resumes", "YEAR,TEAM NO,ELO\n");
        assert!(t.is_empty());
        assert_eq!(t.columns().len(), 3);
    }

    #[test]
    fn test_ragged_csv_is_error() {
        let err = Table::from_reader("bad", "A,B\n1,2\n3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, MadnessError::Csv(_)));
    }

    #[test]
    fn test_select_missing_column() {
        let t = table("kb", "YEAR,TEAM\n2024,A\n");
        let err = t.select(&["YEAR", "BADJ EM"]).unwrap_err();
        match err {
            MadnessError::MissingColumn { table, column } => {
                assert_eq!(table, "kb");
                assert_eq!(column, "BADJ EM");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_left_join_preserves_left_rows() {
        let left = table("left", "YEAR,TEAM NO,TEAM\n2024,1,A\n2024,2,B\n2023,1,C\n");
        let right = table("right", "YEAR,TEAM NO,ELO\n2024,1,1500\n2023,9,1400\n");

        let joined = left.left_join(&right, &["YEAR", "TEAM NO"]).unwrap();

        assert_eq!(joined.len(), 3);
        assert_eq!(joined.columns(), &["YEAR", "TEAM NO", "TEAM", "ELO"]);
        assert_eq!(joined.value(0, "ELO").unwrap(), &Value::Number(1500.0));
        assert!(joined.value(1, "ELO").unwrap().is_missing());
        assert!(joined.value(2, "ELO").unwrap().is_missing());
        assert_eq!(joined.value(2, "TEAM").unwrap(), &Value::Text("C".into()));
    }

    #[test]
    fn test_left_join_fans_out_duplicates() {
        let left = table("left", "YEAR,TEAM NO\n2024,1\n2024,2\n");
        let right = table("right", "YEAR,TEAM NO,ELO\n2024,1,1500\n2024,1,1510\n");

        let joined = left.left_join(&right, &["YEAR", "TEAM NO"]).unwrap();

        assert_eq!(joined.len(), 3);
        let elo: Vec<_> = joined.column("ELO").unwrap().into_iter().cloned().collect();
        assert_eq!(
            elo,
            vec![Value::Number(1500.0), Value::Number(1510.0), Value::Missing]
        );
    }

    #[test]
    fn test_missing_keys_never_match() {
        let left = table("left", "YEAR,TEAM\n,A\n");
        let right = table("right", "YEAR,TEAM,ELO\n,A,1500\n");

        let joined = left.left_join(&right, &["YEAR", "TEAM"]).unwrap();
        assert_eq!(joined.len(), 1);
        assert!(joined.value(0, "ELO").unwrap().is_missing());
    }

    #[test]
    fn test_text_keys_match_exactly() {
        let left = table("left", "TEAM\nSt. John's\nSaint John's\n");
        let right = table("right", "TEAM,SEED\nSt. John's,5\n");

        let joined = left.left_join(&right, &["TEAM"]).unwrap();
        assert_eq!(joined.value(0, "SEED").unwrap(), &Value::Number(5.0));
        assert!(joined.value(1, "SEED").unwrap().is_missing());
    }

    #[test]
    fn test_join_column_collision() {
        let left = table("left", "YEAR,ELO\n2024,1\n");
        let right = table("right", "YEAR,ELO\n2024,2\n");

        let err = left.left_join(&right, &["YEAR"]).unwrap_err();
        assert!(matches!(err, MadnessError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_rename_with() {
        let t = table("t", "YEAR,TEAM,SEED\n2024,A,1\n");
        let renamed = t.rename_with(|c| match c {
            "TEAM" => "TEAM1".to_string(),
            "YEAR" => c.to_string(),
            other => format!("{other}_T1"),
        });
        assert_eq!(renamed.columns(), &["YEAR", "TEAM1", "SEED_T1"]);
        assert_eq!(renamed.rows(), t.rows());
    }

    #[test]
    fn test_push_row_width_checked() {
        let mut t = Table::new("t", vec!["A".into(), "B".into()]);
        t.push_row(vec![Value::Number(1.0), Value::Missing]).unwrap();
        let err = t.push_row(vec![Value::Number(1.0)]).unwrap_err();
        assert!(matches!(err, MadnessError::RowWidth { found: 1, expected: 2, .. }));
    }

    #[test]
    fn test_write_csv() {
        let t = Table::from_rows(
            "out",
            vec!["YEAR".into(), "TEAM".into(), "ELO".into()],
            vec![
                vec![2024.0.into(), "A".into(), 1500.5.into()],
                vec![2024.0.into(), "B".into(), Value::Missing],
            ],
        )
        .unwrap();

        let mut buf = Vec::new();
        t.write_csv(&mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "YEAR,TEAM,ELO\n2024,A,1500.5\n2024,B,\n"
        );
    }
}
