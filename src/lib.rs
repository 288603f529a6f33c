//! Physician roster: load a provider worksheet, normalize its employment type
//! and subspecialty columns, and filter it for display or CSV export.

pub mod config;
pub mod data;
pub mod session;

pub use session::RosterSession;
