//! Workbook loading for the fixed displacement layout: one worksheet, six
//! contiguous columns holding three (Del X, Del Y) pairs, one header row
//! after the skipped rows.

use std::fmt;
use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx, XlsxError};
use tracing::debug;

use crate::config::SheetConfig;

/// One experimental condition's paired displacements.
#[derive(Debug, Clone, PartialEq)]
pub struct ConditionSamples {
    pub label: String,
    pub xs: Vec<f64>,
    pub ys: Vec<f64>,
}

/// Errors surfaced while turning a workbook into condition samples.
#[derive(Debug)]
pub enum SheetError {
    /// Underlying workbook open/read failure, including a missing sheet.
    Workbook(XlsxError),
    /// The selected worksheet holds no cells.
    EmptyRange { sheet: String },
    /// A cell in the data block is neither numeric nor empty.
    BadCell { row: u32, col: u32, found: String },
    /// The configured first column is not a spreadsheet column label.
    BadColumn(String),
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetError::Workbook(err) => write!(f, "workbook error: {err}"),
            SheetError::EmptyRange { sheet } => write!(f, "worksheet {sheet:?} is empty"),
            SheetError::BadCell { row, col, found } => {
                write!(f, "cell ({row}, {col}) is not numeric: {found}")
            }
            SheetError::BadColumn(label) => write!(f, "not a column label: {label:?}"),
        }
    }
}

impl std::error::Error for SheetError {}

impl From<XlsxError> for SheetError {
    fn from(err: XlsxError) -> Self {
        SheetError::Workbook(err)
    }
}

/// Spreadsheet column label ("D", "AA") → zero-based column index.
pub fn column_index(label: &str) -> Result<u32, SheetError> {
    let trimmed = label.trim();
    if trimmed.is_empty() {
        return Err(SheetError::BadColumn(label.to_string()));
    }
    let mut idx: u32 = 0;
    for ch in trimmed.chars() {
        if !ch.is_ascii_alphabetic() {
            return Err(SheetError::BadColumn(label.to_string()));
        }
        idx = idx * 26 + (ch.to_ascii_uppercase() as u32 - 'A' as u32 + 1);
    }
    Ok(idx - 1)
}

/// Display title derived from the workbook filename: the segment after the
/// first underscore, extension stripped, uppercased
/// ("Gait Analysis_Brick.xlsx" → "BRICK"). Falls back to the whole stem.
pub fn derive_title(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let tail = stem.split_once('_').map(|(_, tail)| tail).unwrap_or(&stem);
    tail.to_uppercase()
}

/// Open the workbook and extract the configured condition columns.
pub fn load_conditions(
    path: &Path,
    cfg: &SheetConfig,
    labels: &[String],
) -> Result<Vec<ConditionSamples>, SheetError> {
    let mut workbook: Xlsx<_> = open_workbook(path)?;
    let range = workbook.worksheet_range(&cfg.sheet_name)?;
    extract_conditions(&range, cfg, labels)
}

/// Pull the six-column data block out of one worksheet range.
///
/// The first `skip_rows` rows are dropped, then one header row; the data
/// columns follow `first_column` as (X, Y) pairs in condition order. Numeric
/// cells are taken as-is, numeric strings are parsed, empty cells are
/// skipped. Anything else is an error naming the cell.
pub fn extract_conditions(
    range: &Range<Data>,
    cfg: &SheetConfig,
    labels: &[String],
) -> Result<Vec<ConditionSamples>, SheetError> {
    let first_col = column_index(&cfg.first_column)?;
    if range.start().is_none() {
        return Err(SheetError::EmptyRange {
            sheet: cfg.sheet_name.clone(),
        });
    }
    let (end_row, _) = range.end().unwrap_or((0, 0));
    let first_data_row = cfg.skip_rows + 1;

    let mut conditions = Vec::with_capacity(labels.len());
    for (i, label) in labels.iter().enumerate() {
        let col_x = first_col + 2 * i as u32;
        let col_y = col_x + 1;

        let mut xs = Vec::new();
        let mut ys = Vec::new();
        for row in first_data_row..=end_row {
            if let Some(v) = numeric_cell(range, row, col_x)? {
                xs.push(v);
            }
            if let Some(v) = numeric_cell(range, row, col_y)? {
                ys.push(v);
            }
        }
        debug!(
            label = %label,
            n_x = xs.len(),
            n_y = ys.len(),
            "extracted condition columns"
        );
        conditions.push(ConditionSamples {
            label: label.clone(),
            xs,
            ys,
        });
    }
    Ok(conditions)
}

fn numeric_cell(range: &Range<Data>, row: u32, col: u32) -> Result<Option<f64>, SheetError> {
    let Some(cell) = range.get_value((row, col)) else {
        return Ok(None);
    };
    match cell {
        Data::Empty => Ok(None),
        Data::Float(v) => Ok(Some(*v)),
        Data::Int(v) => Ok(Some(*v as f64)),
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            trimmed
                .parse::<f64>()
                .map(Some)
                .map_err(|_| SheetError::BadCell {
                    row,
                    col,
                    found: s.clone(),
                })
        }
        other => Err(SheetError::BadCell {
            row,
            col,
            found: format!("{other:?}"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SheetConfig;

    fn labels() -> Vec<String> {
        vec!["0ML".to_string(), "1ML".to_string(), "2ML".to_string()]
    }

    /// Worksheet shaped like the real export: a banner row, a header row,
    /// then numeric data in columns D..I.
    fn sample_range(rows: usize) -> Range<Data> {
        let mut range = Range::new((0, 0), (rows as u32 + 1, 9));
        range.set_value((0, 3), Data::String("Trial block".into()));
        for (k, header) in ["Del X1", "Del Y1", "Del X2", "Del Y2", "Del X3", "Del Y3"]
            .iter()
            .enumerate()
        {
            range.set_value((1, 3 + k as u32), Data::String((*header).into()));
        }
        for r in 0..rows as u32 {
            for k in 0..6u32 {
                let v = (r as f64) * 0.1 + (k as f64);
                range.set_value((2 + r, 3 + k), Data::Float(v));
            }
        }
        range
    }

    #[test]
    fn column_labels_resolve_to_indices() {
        assert_eq!(column_index("A").unwrap(), 0);
        assert_eq!(column_index("D").unwrap(), 3);
        assert_eq!(column_index("Z").unwrap(), 25);
        assert_eq!(column_index("AA").unwrap(), 26);
        assert_eq!(column_index(" d ").unwrap(), 3);
        assert!(matches!(column_index("4"), Err(SheetError::BadColumn(_))));
        assert!(matches!(column_index(""), Err(SheetError::BadColumn(_))));
    }

    #[test]
    fn header_and_skipped_rows_are_excluded() {
        let range = sample_range(5);
        let conditions = extract_conditions(&range, &SheetConfig::default(), &labels()).unwrap();

        assert_eq!(conditions.len(), 3);
        for (i, cond) in conditions.iter().enumerate() {
            assert_eq!(cond.xs.len(), 5, "{}", cond.label);
            assert_eq!(cond.ys.len(), 5, "{}", cond.label);
            assert_eq!(cond.xs[0], (2 * i) as f64);
            assert_eq!(cond.ys[0], (2 * i + 1) as f64);
        }
    }

    #[test]
    fn numeric_strings_parse_and_blank_cells_are_skipped() {
        let mut range = sample_range(4);
        range.set_value((3, 3), Data::String(" 0.25 ".into()));
        range.set_value((4, 3), Data::Empty);

        let conditions = extract_conditions(&range, &SheetConfig::default(), &labels()).unwrap();
        let first = &conditions[0];
        assert_eq!(first.xs.len(), 3);
        assert!((first.xs[1] - 0.25).abs() < 1e-12);
        // The paired Y column keeps all four rows.
        assert_eq!(first.ys.len(), 4);
    }

    #[test]
    fn non_numeric_cells_name_their_position() {
        let mut range = sample_range(3);
        range.set_value((3, 6), Data::Bool(true));

        let err = extract_conditions(&range, &SheetConfig::default(), &labels()).unwrap_err();
        match err {
            SheetError::BadCell { row, col, .. } => {
                assert_eq!((row, col), (3, 6));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn title_comes_from_the_segment_after_the_underscore() {
        assert_eq!(derive_title(Path::new("Gait Analysis_Brick.xlsx")), "BRICK");
        assert_eq!(derive_title(Path::new("/data/run_grass mat.xlsx")), "GRASS MAT");
        assert_eq!(derive_title(Path::new("baseline.xlsx")), "BASELINE");
    }
}
