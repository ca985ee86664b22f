use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Column names as they appear in the source files
// ---------------------------------------------------------------------------

pub const COL_YEAR: &str = "ano";
pub const COL_SENIORITY: &str = "senioridade";
pub const COL_CONTRACT: &str = "contrato";
pub const COL_COMPANY_SIZE: &str = "tamanho_empresa";
pub const COL_ROLE: &str = "cargo";
pub const COL_SALARY_USD: &str = "usd";
pub const COL_REMOTE: &str = "remoto";
pub const COL_RESIDENCE: &str = "residencia_iso3";

/// Every column a loader must find before it parses a single row.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    COL_YEAR,
    COL_SENIORITY,
    COL_CONTRACT,
    COL_COMPANY_SIZE,
    COL_ROLE,
    COL_SALARY_USD,
    COL_REMOTE,
    COL_RESIDENCE,
];

/// Required columns absent from `present`, in canonical order.
pub fn missing_columns<'a, I>(present: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let present: Vec<&str> = present.into_iter().map(str::trim).collect();
    REQUIRED_COLUMNS
        .iter()
        .filter(|col| !present.contains(col))
        .map(|col| col.to_string())
        .collect()
}

// ---------------------------------------------------------------------------
// Dimension – the four filterable axes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Dimension {
    Year,
    Seniority,
    ContractType,
    CompanySize,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::Year,
        Dimension::Seniority,
        Dimension::ContractType,
        Dimension::CompanySize,
    ];

    /// Stable position in [`Dimension::ALL`].
    pub fn index(self) -> usize {
        match self {
            Dimension::Year => 0,
            Dimension::Seniority => 1,
            Dimension::ContractType => 2,
            Dimension::CompanySize => 3,
        }
    }

    /// Human-readable label for the filter widgets.
    pub fn label(self) -> &'static str {
        match self {
            Dimension::Year => "Year",
            Dimension::Seniority => "Seniority",
            Dimension::ContractType => "Contract type",
            Dimension::CompanySize => "Company size",
        }
    }

    pub fn column(self) -> &'static str {
        match self {
            Dimension::Year => COL_YEAR,
            Dimension::Seniority => COL_SENIORITY,
            Dimension::ContractType => COL_CONTRACT,
            Dimension::CompanySize => COL_COMPANY_SIZE,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// FilterValue – one selectable value of a dimension
// ---------------------------------------------------------------------------

/// An owned value of a filter dimension. Years are integers, the other three
/// dimensions are categorical text. Derived `Ord` sorts integers numerically
/// and text lexicographically, which is the order the widgets show.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterValue {
    Integer(i64),
    Text(String),
}

impl FilterValue {
    pub fn as_key(&self) -> FilterKey<'_> {
        match self {
            FilterValue::Integer(i) => FilterKey::Integer(*i),
            FilterValue::Text(s) => FilterKey::Text(s),
        }
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        FilterValue::Integer(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        FilterValue::Text(value.to_string())
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        FilterValue::Text(value)
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Integer(i) => write!(f, "{i}"),
            FilterValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Borrowed counterpart of [`FilterValue`], used for allocation-free
/// membership tests while filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterKey<'a> {
    Integer(i64),
    Text(&'a str),
}

impl FilterKey<'_> {
    pub fn to_value(self) -> FilterValue {
        match self {
            FilterKey::Integer(i) => FilterValue::Integer(i),
            FilterKey::Text(s) => FilterValue::Text(s.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the salary table
// ---------------------------------------------------------------------------

/// A single salary observation. Serde names match the source columns so the
/// same struct reads and writes CSV / JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    #[serde(rename = "ano")]
    pub year: i64,
    #[serde(rename = "senioridade")]
    pub seniority: String,
    #[serde(rename = "contrato")]
    pub contract_type: String,
    #[serde(rename = "tamanho_empresa")]
    pub company_size: String,
    #[serde(rename = "cargo")]
    pub role: String,
    #[serde(rename = "usd")]
    pub salary_usd: f64,
    #[serde(rename = "remoto")]
    pub remote_ratio: String,
    #[serde(rename = "residencia_iso3")]
    pub residence_country_code: String,
}

impl Record {
    /// The record's value on one filter dimension.
    pub fn key(&self, dimension: Dimension) -> FilterKey<'_> {
        match dimension {
            Dimension::Year => FilterKey::Integer(self.year),
            Dimension::Seniority => FilterKey::Text(&self.seniority),
            Dimension::ContractType => FilterKey::Text(&self.contract_type),
            Dimension::CompanySize => FilterKey::Text(&self.company_size),
        }
    }

    /// Reject salaries that cannot be a real annual amount.
    pub fn validate(&self, row: usize) -> super::error::Result<()> {
        if !self.salary_usd.is_finite() || self.salary_usd < 0.0 {
            return Err(super::error::DataError::parse(
                row,
                COL_SALARY_USD,
                format!("'{}' is not a non-negative amount", self.salary_usd),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// All loaded records in file order. Read-only once built.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
