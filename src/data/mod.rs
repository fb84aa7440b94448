//! Getting employees and leaders into shape before grouping: manual entry,
//! workbook/CSV import, and the caller-side input checks.

pub mod entry;
pub mod import;
pub mod validate;
