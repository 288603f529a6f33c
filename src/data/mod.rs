//! Data layer: loading, normalization, filtering and export.
//!
//! Architecture:
//! ```text
//!  URL / .xlsx / .csv
//!        │
//!        ▼
//!   ┌──────────┐   ┌────────┐
//!   │  loader   │◄──│  cache  │  TTL map for remote sources
//!   └──────────┘   └────────┘
//!        │  RawTable
//!        ▼
//!   ┌───────────┐
//!   │ normalize  │  strip brackets, map synonyms, split tags
//!   └───────────┘
//!        │  Roster
//!        ▼
//!   ┌──────────┐
//!   │  filter   │  name / employment type / subspecialty → indices
//!   └──────────┘
//!        │
//!        ▼
//!   ┌──────────┐
//!   │  export   │  selected rows → CSV
//!   └──────────┘
//! ```

pub mod cache;
pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod normalize;
pub mod source;

pub use error::{LoadError, NormalizeError};
pub use filter::Query;
pub use model::{ProviderRecord, RawTable, RawValue, Roster};
pub use source::Source;
