//! Data model for extracted spreadsheet content.
//!
//! Worksheet XML decodes into sparse [`Row`]s of [`Cell`]s. The record
//! builder then turns rows into header-named [`Record`]s using a
//! [`HeaderMap`].

mod cell;
mod record;
mod row;

pub use cell::*;
pub use record::*;
pub use row::*;
