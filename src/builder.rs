//! Mapping of raw sheet rows to telemetry records.

use crate::error::{Error, Result};
use crate::model::{resolve_swarm, Orientation, Record, Vec3};
use crate::timeline::TimePointIndex;
use crate::xlsx::RawRow;

/// Sheet column headers.
pub mod columns {
    pub const DRONE_ID: &str = "DroneID";
    pub const TIME_POINT: &str = "TimePoint";
    pub const SWARM_ID: &str = "SwarmID";
    pub const TASK_ID: &str = "TaskID";
    pub const STATE: &str = "State";
    pub const POSITION_X: &str = "PositionX";
    pub const POSITION_Y: &str = "PositionY";
    pub const POSITION_Z: &str = "PositionZ";
    pub const VELOCITY_X: &str = "VelocityX";
    pub const VELOCITY_Y: &str = "VelocityY";
    pub const VELOCITY_Z: &str = "VelocityZ";
    pub const PITCH: &str = "Pitch";
    pub const ROLL: &str = "Roll";
    pub const YAW: &str = "Yaw";
    pub const BATTERY: &str = "Battery Percentage";
    pub const DETECTION_RANGE: &str = "Detection Range(Circle)";
}

const UNKNOWN_STATE: &str = "Unknown";
const NO_TASK_CODE: &str = "-1";
const NO_TASK_ID: &str = "none";
const NO_TASK_LABEL: &str = "No Task";

/// Why a row was left out of the record set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    MissingDroneId,
    MissingTimePoint,
    NonNumericDroneId,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SkipReason::MissingDroneId => "missing DroneID",
            SkipReason::MissingTimePoint => "missing TimePoint",
            SkipReason::NonNumericDroneId => "DroneID is not numeric",
        })
    }
}

/// Decide whether a row carries a usable observation.
///
/// `DroneID` with hyphens removed must be all ASCII digits.
pub fn check_row(row: &RawRow) -> std::result::Result<(), SkipReason> {
    let drone_id = row.get(columns::DRONE_ID).trim();
    if drone_id.is_empty() {
        return Err(SkipReason::MissingDroneId);
    }
    if row.get(columns::TIME_POINT).trim().is_empty() {
        return Err(SkipReason::MissingTimePoint);
    }
    let mut digits = drone_id.chars().filter(|&c| c != '-').peekable();
    if digits.peek().is_none() || !digits.all(|c| c.is_ascii_digit()) {
        return Err(SkipReason::NonNumericDroneId);
    }
    Ok(())
}

/// Keep the rows [`check_row`] accepts, logging the others.
pub fn accepted_rows(rows: impl IntoIterator<Item = RawRow>) -> Vec<RawRow> {
    rows.into_iter()
        .filter(|row| match check_row(row) {
            Ok(()) => true,
            Err(reason) => {
                log::debug!("sheet row {}: {}, skipped", row.row_number(), reason);
                false
            }
        })
        .collect()
}

/// State slug: trimmed, lowercase, spaces and underscores as hyphens.
pub fn normalize_state(label: &str) -> String {
    label
        .trim()
        .to_lowercase()
        .replace([' ', '_'], "-")
}

/// Builds records from accepted rows against a prebuilt time point index.
#[derive(Debug)]
pub struct RecordBuilder<'a> {
    time_points: &'a TimePointIndex,
}

impl<'a> RecordBuilder<'a> {
    pub fn new(time_points: &'a TimePointIndex) -> Self {
        Self { time_points }
    }

    /// Map one accepted row.
    ///
    /// The row's time point must be in the index; rows that fail
    /// [`check_row`] should not be passed here.
    pub fn build(&self, row: &RawRow) -> Result<Record> {
        let time_label = row.get(columns::TIME_POINT).trim();
        let time_point_index = self.time_points.index_of(time_label).ok_or_else(|| {
            Error::InvalidData(format!(
                "sheet row {}: time point {:?} is not indexed",
                row.row_number(),
                time_label
            ))
        })?;

        let swarm = resolve_swarm(row.get(columns::SWARM_ID));

        let state_label = match row.get(columns::STATE).trim() {
            "" => UNKNOWN_STATE,
            text => text,
        };
        let state = normalize_state(state_label);

        let (task_id, task_label) = match row.get(columns::TASK_ID).trim() {
            "" | NO_TASK_CODE => (NO_TASK_ID.to_string(), NO_TASK_LABEL.to_string()),
            _ => (state.clone(), state_label.to_string()),
        };

        let number = |column: &str| parse_number(row, column);

        Ok(Record {
            drone_id: format!("drone-{}", row.get(columns::DRONE_ID).trim()),
            time_point_index,
            time_label: time_label.to_string(),
            swarm_id: swarm.id.to_string(),
            swarm_label: swarm.label.to_string(),
            task_id,
            task_label,
            state,
            state_label: state_label.to_string(),
            position: Vec3::new(
                number(columns::POSITION_X)?,
                number(columns::POSITION_Y)?,
                number(columns::POSITION_Z)?,
            ),
            velocity: Vec3::new(
                number(columns::VELOCITY_X)?,
                number(columns::VELOCITY_Y)?,
                number(columns::VELOCITY_Z)?,
            ),
            orientation: Orientation {
                pitch: number(columns::PITCH)?,
                roll: number(columns::ROLL)?,
                yaw: number(columns::YAW)?,
            },
            battery_percentage: number(columns::BATTERY)?,
            detection_range: number(columns::DETECTION_RANGE)?,
        })
    }

    /// Map every row, stopping at the first invalid one.
    pub fn build_all(&self, rows: &[RawRow]) -> Result<Vec<Record>> {
        rows.iter().map(|row| self.build(row)).collect()
    }
}

/// Blank or absent is `0.0`; anything else must be a finite number.
fn parse_number(row: &RawRow, column: &str) -> Result<f64> {
    let text = row.get(column).trim();
    if text.is_empty() {
        return Ok(0.0);
    }
    text.parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::InvalidNumber {
            column: column.to_string(),
            value: text.to_string(),
            row: row.row_number(),
        })
}
