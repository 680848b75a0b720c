//! Loan Data Loader Module
//! Reads the pre-cleaned loan dataset with Polars and normalises its schema.

use super::model::*;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Dataset not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Unsupported dataset format: {}", .0.display())]
    UnsupportedFormat(PathBuf),
    #[error("Dataset is missing column `{0}`")]
    MissingColumn(&'static str),
    #[error("Column `{column}` has {count} value(s) that do not match the expected type")]
    SchemaMismatch { column: &'static str, count: usize },
    #[error("Failed to read dataset: {0}")]
    Polars(#[from] PolarsError),
}

/// On-disk formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DatasetFormat {
    Parquet,
    Csv,
    Ipc,
}

impl DatasetFormat {
    fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "parquet" | "pq" => Some(DatasetFormat::Parquet),
            "csv" => Some(DatasetFormat::Csv),
            "arrow" | "ipc" | "feather" => Some(DatasetFormat::Ipc),
            _ => None,
        }
    }
}

/// Loads loan records from a configured location.
pub struct LoanLoader {
    path: PathBuf,
}

impl LoanLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the dataset and return a schema-checked loan table.
    pub fn load(&self) -> Result<LoanTable, LoadError> {
        if !self.path.exists() {
            return Err(LoadError::NotFound(self.path.clone()));
        }
        let format = DatasetFormat::from_path(&self.path)
            .ok_or_else(|| LoadError::UnsupportedFormat(self.path.clone()))?;

        let raw = self.scan(format)?.collect()?;
        let table = Self::normalise(&raw)?;

        log::info!(
            "Loaded {} loan records from {}",
            table.height(),
            self.path.display()
        );
        Ok(table)
    }

    fn scan(&self, format: DatasetFormat) -> PolarsResult<LazyFrame> {
        match format {
            DatasetFormat::Parquet => {
                LazyFrame::scan_parquet(&self.path, ScanArgsParquet::default())
            }
            DatasetFormat::Csv => LazyCsvReader::new(&self.path)
                .with_infer_schema_length(Some(10000))
                .with_try_parse_dates(true)
                .finish(),
            DatasetFormat::Ipc => LazyFrame::scan_ipc(&self.path, ScanArgsIpc::default()),
        }
    }

    /// Keep only the loan columns, cast to their semantic types.
    ///
    /// A cast that turns a present value into null means the column does not
    /// hold what the dashboard expects.
    fn normalise(raw: &DataFrame) -> Result<LoanTable, LoadError> {
        for name in REQUIRED_COLUMNS {
            if raw.get_column_index(name).is_none() {
                return Err(LoadError::MissingColumn(name));
            }
        }

        let mut exprs = vec![
            col(ISSUE_DATE).cast(DataType::Date),
            col(LOAN_AMOUNT).cast(DataType::Float64),
            col(INTEREST_RATE).cast(DataType::Float64),
        ];
        exprs.extend(
            CATEGORY_COLUMNS
                .iter()
                .map(|name| col(*name).cast(DataType::String)),
        );

        let df = raw.clone().lazy().select(exprs).collect()?;

        for name in REQUIRED_COLUMNS {
            let before = raw.column(name)?.null_count();
            let after = df.column(name)?.null_count();
            if after > before {
                return Err(LoadError::SchemaMismatch {
                    column: name,
                    count: after - before,
                });
            }
        }

        Ok(LoanTable::from_dataframe(df))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str =
        "issue_date,issue_weekday,loan_amount,interest_rate,loan_condition,grade,term,purpose";

    fn write_csv(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "{body}").unwrap();
        path
    }

    #[test]
    fn loads_csv_with_typed_columns() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "loans.csv",
            &format!(
                "{HEADER}\n\
                 2015-01-05,Monday,1000,10.5,Good Loan,A,36 months,car\n\
                 2015-01-06,Tuesday,2500,13.0,Bad Loan,C,60 months,debt_consolidation"
            ),
        );

        let table = LoanLoader::new(&path).load().unwrap();
        let df = table.dataframe();

        assert_eq!(table.height(), 2);
        assert_eq!(df.width(), REQUIRED_COLUMNS.len());
        assert_eq!(df.column(ISSUE_DATE).unwrap().dtype(), &DataType::Date);
        assert_eq!(df.column(LOAN_AMOUNT).unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column(GRADE).unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn missing_file_is_reported() {
        let err = LoanLoader::new("does/not/exist.parquet").load().unwrap_err();
        assert!(matches!(err, LoadError::NotFound(_)));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(&dir, "loan_clean.pkl", HEADER);
        let err = LoanLoader::new(&path).load().unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedFormat(_)));
    }

    #[test]
    fn missing_column_is_a_load_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "loans.csv",
            "issue_date,issue_weekday,loan_amount\n2015-01-05,Monday,1000",
        );
        let err = LoanLoader::new(&path).load().unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn(INTEREST_RATE)));
    }

    #[test]
    fn unparseable_date_is_a_schema_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_csv(
            &dir,
            "loans.csv",
            &format!("{HEADER}\nsoon,Monday,1000,10.5,Good Loan,A,36 months,car"),
        );
        let err = LoanLoader::new(&path).load().unwrap_err();
        assert!(matches!(
            err,
            LoadError::SchemaMismatch {
                column: ISSUE_DATE,
                count: 1
            }
        ));
    }
}
