//! XLSX workbook decoding.
//!
//! Reads the shared-string table and the first worksheet of an Office Open
//! XML workbook and yields its data rows as header-keyed string maps.
//!
//! # Example
//!
//! ```no_run
//! use swarmset::xlsx::WorkbookReader;
//!
//! let reader = WorkbookReader::from_bytes(std::fs::read("telemetry.xlsx")?)?;
//! let rows = reader.rows().collect::<swarmset::Result<Vec<_>>>()?;
//! println!("{} data rows", rows.len());
//! # Ok::<(), swarmset::Error>(())
//! ```

mod reader;
mod shared_strings;

pub use reader::{RawRow, RawRows, WorkbookReader, SHARED_STRINGS_PATH, SHEET_PATH};
pub use shared_strings::SharedStrings;
