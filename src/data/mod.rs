use log::info;
use polars::prelude::*;
use std::fmt;
use std::path::Path;
use thiserror::Error;

/// Number of damage categories tracked per candidate.
pub const CATEGORY_COUNT: usize = 18;

pub const NAME_COLUMN: &str = "name";
pub const STRENGTH_COLUMN: &str = "base_total";

/// Multiplier columns, in the order they are stored in `Candidate::multipliers`.
pub const CATEGORY_COLUMNS: [&str; CATEGORY_COUNT] = [
    "against_bug",
    "against_dark",
    "against_dragon",
    "against_electric",
    "against_fairy",
    "against_fight",
    "against_fire",
    "against_flying",
    "against_ghost",
    "against_grass",
    "against_ground",
    "against_ice",
    "against_normal",
    "against_poison",
    "against_psychic",
    "against_rock",
    "against_steel",
    "against_water",
];

/// Human readable category name, e.g. `"fire"` for `against_fire`.
pub fn category_label(category: usize) -> &'static str {
    let column = CATEGORY_COLUMNS[category];
    column.strip_prefix("against_").unwrap_or(column)
}

/// A cell that could not be turned into a finite number.
#[derive(Debug, Clone, PartialEq)]
pub struct CellError {
    /// 1-based line in the file, the header being line 1
    pub line: usize,
    pub column: String,
    pub value: String,
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}, column '{}': '{}'",
            self.line, self.column, self.value
        )
    }
}

fn describe_cells(cells: &[CellError]) -> String {
    cells
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Error, Debug)]
pub enum DataError {
    #[error("Failed to open dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to read or parse CSV file: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Dataset contains no candidate rows")]
    Empty,
    #[error("CSV file is missing required columns: {0}")]
    MissingColumns(String),
    #[error("Found {} invalid cell(s): {}", .0.len(), describe_cells(.0))]
    InvalidCells(Vec<CellError>),
}

/// One selectable item of the team dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub name: String,
    pub strength: f64,
    /// Damage multiplier taken from each category, indexed like `CATEGORY_COLUMNS`
    pub multipliers: [f64; CATEGORY_COUNT],
}

/// Read-only collection of candidates. Row order defines the gene index of
/// each candidate.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    candidates: Vec<Candidate>,
}

impl Dataset {
    pub fn new(candidates: Vec<Candidate>) -> Self {
        Self { candidates }
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Returns every required column that the header lacks.
fn detect_missing_columns(df: &DataFrame) -> Vec<&'static str> {
    let columns: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|s| s.to_string())
        .collect();

    [NAME_COLUMN, STRENGTH_COLUMN]
        .iter()
        .chain(CATEGORY_COLUMNS.iter())
        .filter(|&&required| !columns.iter().any(|c| c == required))
        .copied()
        .collect()
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<Vec<Option<&'a str>>, DataError> {
    Ok(df.column(name)?.str()?.into_iter().collect())
}

fn parse_cell(
    value: Option<&str>,
    row: usize,
    column: &str,
    errors: &mut Vec<CellError>,
) -> f64 {
    let raw = value.unwrap_or("").trim();
    match raw.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => parsed,
        _ => {
            errors.push(CellError {
                line: row + 2,
                column: column.to_string(),
                value: raw.to_string(),
            });
            f64::NAN
        }
    }
}

/// Loads the team dataset from a CSV file with a header row.
///
/// Every required column must be present and every numeric cell must parse
/// to a finite number. All offending cells are collected and reported
/// together so a broken file can be fixed in one pass.
///
/// # Errors
/// * `DataError::Io` - The file cannot be opened.
/// * `DataError::Empty` - The file is empty or only holds a header.
/// * `DataError::MissingColumns` - A required column is absent.
/// * `DataError::InvalidCells` - At least one numeric cell is malformed.
pub fn load_dataset(file_path: &Path) -> Result<Dataset, DataError> {
    if std::fs::metadata(file_path)?.len() == 0 {
        return Err(DataError::Empty);
    }

    // Read every column as text so each cell goes through `parse_cell`.
    let df = match CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .try_into_reader_with_file_path(Some(file_path.into()))?
        .finish()
    {
        Err(PolarsError::NoData(_)) => return Err(DataError::Empty),
        other => other?,
    };

    let missing = detect_missing_columns(&df);
    if !missing.is_empty() {
        return Err(DataError::MissingColumns(missing.join(", ")));
    }
    if df.height() == 0 {
        return Err(DataError::Empty);
    }

    let names = string_column(&df, NAME_COLUMN)?;
    let strengths = string_column(&df, STRENGTH_COLUMN)?;
    let categories = CATEGORY_COLUMNS
        .iter()
        .map(|column| string_column(&df, column))
        .collect::<Result<Vec<_>, _>>()?;

    let mut errors = Vec::new();
    let mut candidates = Vec::with_capacity(df.height());

    for row in 0..df.height() {
        let name = match names[row].map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                errors.push(CellError {
                    line: row + 2,
                    column: NAME_COLUMN.to_string(),
                    value: String::new(),
                });
                String::new()
            }
        };

        let strength = parse_cell(strengths[row], row, STRENGTH_COLUMN, &mut errors);

        let mut multipliers = [0.0; CATEGORY_COUNT];
        for (category, column) in CATEGORY_COLUMNS.iter().enumerate() {
            multipliers[category] = parse_cell(categories[category][row], row, column, &mut errors);
        }

        candidates.push(Candidate {
            name,
            strength,
            multipliers,
        });
    }

    if !errors.is_empty() {
        return Err(DataError::InvalidCells(errors));
    }

    info!(
        "Loaded {} candidates from '{}'",
        candidates.len(),
        file_path.display()
    );
    Ok(Dataset::new(candidates))
}
