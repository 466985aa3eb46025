//! # swarmset
//!
//! Drone-swarm telemetry workbooks to normalized visualization datasets.
//!
//! This library reads an XLSX export of drone telemetry (one row per drone
//! per time point), validates and types each row, rescales positions into a
//! fixed 0–100 footprint and summarizes the result as a [`Dataset`] ready to
//! be serialized for a front end.
//!
//! ## Quick Start
//!
//! ```no_run
//! use swarmset::build_dataset_from_file;
//!
//! let dataset = build_dataset_from_file("telemetry.xlsx")?;
//! println!("Drones: {}", dataset.metadata.total_drones);
//! println!("Time points: {}", dataset.metadata.total_time_points);
//!
//! // Serialize for the front end
//! let json = swarmset::render::to_json_default(&dataset)?;
//! std::fs::write("dataset.json", json)?;
//! # Ok::<(), swarmset::Error>(())
//! ```
//!
//! ## Pipeline
//!
//! 1. [`xlsx::WorkbookReader`] decodes the container into header-keyed rows.
//! 2. [`builder`] drops unusable rows and maps the rest to [`Record`]s.
//! 3. [`normalize`] rescales x/z positions and detection radii.
//! 4. [`aggregate`] sorts, counts and bounds the records.
//!
//! ## Features
//!
//! - `async`: Async file loading with Tokio
//! - `ffi`: C-ABI bindings for foreign language integration

pub mod aggregate;
pub mod builder;
pub mod container;
pub mod error;
pub mod model;
pub mod normalize;
pub mod render;
pub mod timeline;
pub mod xlsx;

#[cfg(feature = "ffi")]
pub mod ffi;

// Re-exports
pub use container::OoxmlContainer;
pub use error::{Error, ErrorCategory, Result};
pub use model::{BoundingBox, Dataset, Metadata, Orientation, Record, Swarm, Vec3};
pub use timeline::TimePointIndex;
pub use xlsx::{RawRow, WorkbookReader};

use builder::RecordBuilder;
use std::path::Path;

/// Run the pipeline over an opened workbook.
///
/// All rows are read and filtered before any record is built, since each
/// record needs the index of its time point among all accepted rows.
pub fn build_dataset(reader: &WorkbookReader) -> Result<Dataset> {
    let rows = reader.rows().collect::<Result<Vec<_>>>()?;
    let read = rows.len();

    let rows = builder::accepted_rows(rows);
    let time_points =
        TimePointIndex::build(rows.iter().map(|r| r.get(builder::columns::TIME_POINT)));

    let records = RecordBuilder::new(&time_points).build_all(&rows)?;
    let (records, _) = normalize::normalize(records);
    let dataset = aggregate::assemble(records, &time_points);

    log::info!(
        "built dataset: {} rows read, {} records, {} drones, {} time points",
        read,
        dataset.len(),
        dataset.metadata.total_drones,
        dataset.metadata.total_time_points
    );
    Ok(dataset)
}

/// Build a dataset from workbook bytes.
///
/// # Example
///
/// ```no_run
/// use swarmset::build_dataset_from_bytes;
///
/// let data = std::fs::read("telemetry.xlsx")?;
/// let dataset = build_dataset_from_bytes(&data)?;
/// # Ok::<(), swarmset::Error>(())
/// ```
pub fn build_dataset_from_bytes(data: &[u8]) -> Result<Dataset> {
    build_dataset(&WorkbookReader::from_bytes(data.to_vec())?)
}

/// Build a dataset from a workbook file.
///
/// # Example
///
/// ```no_run
/// use swarmset::build_dataset_from_file;
///
/// let dataset = build_dataset_from_file("telemetry.xlsx")?;
/// for record in &dataset.records {
///     println!("{} at {}: {}", record.drone_id, record.time_label, record.state);
/// }
/// # Ok::<(), swarmset::Error>(())
/// ```
pub fn build_dataset_from_file(path: impl AsRef<Path>) -> Result<Dataset> {
    build_dataset(&WorkbookReader::open(path)?)
}

/// Build a dataset from a workbook file without blocking the runtime while
/// the file is read.
#[cfg(feature = "async")]
pub async fn build_dataset_from_file_async(path: impl AsRef<Path>) -> Result<Dataset> {
    let data = tokio::fs::read(path.as_ref()).await?;
    build_dataset(&WorkbookReader::from_bytes(data)?)
}

/// Convert a workbook file straight to pretty-printed dataset JSON.
///
/// # Example
///
/// ```no_run
/// let json = swarmset::export_json("telemetry.xlsx")?;
/// std::fs::write("dataset.json", json)?;
/// # Ok::<(), swarmset::Error>(())
/// ```
pub fn export_json(path: impl AsRef<Path>) -> Result<String> {
    let dataset = build_dataset_from_file(path)?;
    render::to_json_default(&dataset)
}
