use std::borrow::Cow;
use std::fmt;
use std::path::{Path, PathBuf};

use super::error::LoadError;

/// Where a roster comes from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// Remote file fetched over HTTP(S).
    Url(String),
    /// Locally supplied file (the upload fallback).
    File(PathBuf),
}

impl Source {
    /// File name portion used to pick a parser. For URLs this is the last
    /// path segment, still percent-encoded; empty when the URL does not parse.
    fn file_name(&self) -> String {
        match self {
            Source::Url(url) => reqwest::Url::parse(url)
                .ok()
                .and_then(|u| u.path_segments()?.last().map(str::to_string))
                .unwrap_or_default(),
            Source::File(path) => path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or("")
                .to_string(),
        }
    }

    /// Dispatch by extension.
    pub fn format(&self) -> Result<SourceFormat, LoadError> {
        SourceFormat::from_file_name(&self.file_name())
    }

    /// Short label for status lines.
    pub fn label(&self) -> String {
        match self {
            Source::Url(_) => {
                let name = self.file_name();
                urlencoding::decode(&name)
                    .map(Cow::into_owned)
                    .unwrap_or_else(|_| name.clone())
            }
            Source::File(path) => path.display().to_string(),
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Url(url) => write!(f, "{url}"),
            Source::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Tabular formats the loader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Csv,
    /// Any workbook calamine can open (.xlsx, .xlsm, .xlsb, .xls, .ods).
    Workbook,
}

impl SourceFormat {
    pub const EXTENSIONS: [&'static str; 6] = ["csv", "xlsx", "xlsm", "xlsb", "xls", "ods"];

    pub fn from_file_name(name: &str) -> Result<Self, LoadError> {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "csv" => Ok(SourceFormat::Csv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(SourceFormat::Workbook),
            "" => Err(LoadError::UnsupportedFormat(format!("'{name}' has no extension"))),
            other => Err(LoadError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}
