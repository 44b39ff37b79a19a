//! # Exporting the Collected Roster
//!
//! This module persists the collected member records to a spreadsheet
//! workbook named from the sanitized group title and a timestamp. When the
//! workbook cannot be written, the same rows are written to a UTF-8 CSV file
//! (with a byte-order mark, so spreadsheet applications detect the encoding)
//! under the same base name. An empty roster produces no file at all.
//!
//! ## Submodules
//!
//! - **workbook**: Workbook and fallback writers plus filename composition.

mod workbook;

pub use workbook::export_members;
