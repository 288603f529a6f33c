use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::error::NormalizeError;
use super::model::{ProviderRecord, RawRow, RawTable, RawValue, Roster};

/// Non-greedy `[...]` span, may cross line breaks.
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*?\]").unwrap());

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

/// Header names of the three columns the normalizer interprets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub name: String,
    pub employment_type: String,
    pub subspecialty: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            name: "MILV Radiologist/Extender".to_string(),
            employment_type: "Employment Type".to_string(),
            subspecialty: "Subspecialty".to_string(),
        }
    }
}

impl ColumnNames {
    /// Required columns in the order they are reported when missing.
    pub fn required(&self) -> [&str; 3] {
        [&self.name, &self.employment_type, &self.subspecialty]
    }
}

/// One synonym entry: every occurrence of `from` becomes `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Synonym {
    pub from: String,
    pub to: String,
}

impl Synonym {
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Ordered synonym entries, applied first to last.
pub type SynonymTable = Vec<Synonym>;

/// Spellings seen in the provider worksheet.
pub fn default_synonyms() -> SynonymTable {
    vec![
        Synonym::new("PET/CT", "PETCT"),
        Synonym::new("\u{a0}Diagnostic", "Diagnostic"),
        Synonym::new("Diagnostic\u{a0}", "Diagnostic"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizeOptions {
    pub columns: ColumnNames,
    pub synonyms: SynonymTable,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            columns: ColumnNames::default(),
            synonyms: default_synonyms(),
        }
    }
}

// ---------------------------------------------------------------------------
// Field cleaning
// ---------------------------------------------------------------------------

/// Remove every `[...]` span, then trim.
///
/// `"Partner [2020-Present]"` → `"Partner"`.
pub fn strip_brackets(raw: &str) -> String {
    BRACKETED.replace_all(raw, "").trim().to_string()
}

/// Substring replacement of each synonym, in table order. Entries with an
/// empty `from` are ignored.
pub fn apply_synonyms(raw: &str, synonyms: &[Synonym]) -> String {
    synonyms
        .iter()
        .filter(|syn| !syn.from.is_empty())
        .fold(raw.to_string(), |acc, syn| acc.replace(&syn.from, &syn.to))
}

/// Split on `,` or `/`, trim, drop empties. Duplicates collapse in the set.
pub fn split_tags(raw: &str) -> BTreeSet<String> {
    raw.split([',', '/'])
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Canonical tag set for a raw subspecialty string.
pub fn subspecialty_tags(raw: &str, synonyms: &[Synonym]) -> BTreeSet<String> {
    split_tags(&apply_synonyms(raw, synonyms))
}

// ---------------------------------------------------------------------------
// Table normalization
// ---------------------------------------------------------------------------

/// Turn a raw table into a [`Roster`].
///
/// Required columns are checked up front; no row is looked at if any is
/// missing.
pub fn normalize(table: &RawTable, opts: &NormalizeOptions) -> Result<Roster, NormalizeError> {
    let missing: Vec<String> = opts
        .columns
        .required()
        .into_iter()
        .filter(|col| !table.has_column(col))
        .map(str::to_string)
        .collect();
    if !missing.is_empty() {
        return Err(NormalizeError::MissingColumns(missing));
    }

    let records: Vec<ProviderRecord> = table
        .rows
        .iter()
        .map(|row| normalize_row(row, opts))
        .collect();

    let employment_types = records
        .iter()
        .map(|r| &r.employment_type_clean)
        .filter(|t| !t.is_empty())
        .cloned()
        .collect();
    let subspecialties = records
        .iter()
        .flat_map(|r| r.subspecialty_tags.iter().cloned())
        .collect();

    Ok(Roster {
        records,
        columns: table.columns.clone(),
        employment_types,
        subspecialties,
    })
}

fn normalize_row(row: &RawRow, opts: &NormalizeOptions) -> ProviderRecord {
    let text = |col: &str| row.get(col).map(RawValue::to_string).unwrap_or_default();

    let employment_type_raw = text(&opts.columns.employment_type);
    let subspecialty_raw = text(&opts.columns.subspecialty);

    ProviderRecord {
        name: text(&opts.columns.name),
        employment_type_clean: strip_brackets(&employment_type_raw),
        subspecialty_tags: subspecialty_tags(&subspecialty_raw, &opts.synonyms),
        employment_type_raw,
        subspecialty_raw,
        fields: row.clone(),
    }
}
