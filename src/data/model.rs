use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// RawValue – a single cell exactly as read from the source
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring what a spreadsheet or CSV can hold.
/// Kept `Ord` so option lists and passthrough maps stay deterministic.
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Spreadsheet date/time cell kept as text.
    Date(String),
    Null,
}

// -- Manual Eq/Ord so RawValue can live in BTree collections --

impl Eq for RawValue {}

impl PartialOrd for RawValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RawValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use RawValue::*;
        fn discriminant(v: &RawValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
                Date(_) => 5,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) | (Date(a), Date(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for RawValue {
    /// Text form used for display, export and text-field extraction.
    /// Nulls render as the empty string; integral floats drop the `.0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawValue::String(s) | RawValue::Date(s) => write!(f, "{s}"),
            RawValue::Integer(i) => write!(f, "{i}"),
            RawValue::Float(v) if v.fract() == 0.0 && v.abs() < 1e15 => write!(f, "{v:.0}"),
            RawValue::Float(v) => write!(f, "{v}"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Null => Ok(()),
        }
    }
}

impl RawValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RawValue::Null)
    }
}

// ---------------------------------------------------------------------------
// RawTable – what the loader hands to the normalizer
// ---------------------------------------------------------------------------

/// One source row: column name → raw value. Absent keys read as null.
pub type RawRow = BTreeMap<String, RawValue>;

/// Rows and columns exactly as read from the source file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    /// Column names in source order.
    pub columns: Vec<String>,
    /// Rows in source order.
    pub rows: Vec<RawRow>,
}

impl RawTable {
    pub fn new(columns: Vec<String>, rows: Vec<RawRow>) -> Self {
        Self { columns, rows }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

// ---------------------------------------------------------------------------
// ProviderRecord – one normalized row
// ---------------------------------------------------------------------------

/// A single provider (one row of the source table) with its derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ProviderRecord {
    pub name: String,
    pub employment_type_raw: String,
    /// `employment_type_raw` with every `[...]` span removed, trimmed.
    pub employment_type_clean: String,
    pub subspecialty_raw: String,
    /// Canonical subspecialty tags; never empty strings, never duplicated.
    pub subspecialty_tags: BTreeSet<String>,
    /// Every source column, untouched. Used for display and export.
    pub fields: RawRow,
}

impl ProviderRecord {
    /// Raw cell for `column`, `Null` when the row has none.
    pub fn field(&self, column: &str) -> &RawValue {
        self.fields.get(column).unwrap_or(&RawValue::Null)
    }
}

// ---------------------------------------------------------------------------
// Roster – the complete normalized dataset
// ---------------------------------------------------------------------------

/// The normalized table plus the option lists the filter widgets offer.
#[derive(Debug, Clone, PartialEq)]
pub struct Roster {
    /// All providers, in source order.
    pub records: Vec<ProviderRecord>,
    /// Source column order; derived fields are never listed here.
    pub columns: Vec<String>,
    /// Sorted distinct non-empty clean employment types.
    pub employment_types: BTreeSet<String>,
    /// Sorted distinct subspecialty tags.
    pub subspecialties: BTreeSet<String>,
}

impl Roster {
    /// Number of providers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the roster is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
