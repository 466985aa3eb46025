//! Telemetry record structures.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A point or vector in the dataset's 3D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Create a vector from its components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// Attitude of a drone, in the source sheet's units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub pitch: f64,
    pub roll: f64,
    pub yaw: f64,
}

/// One drone observed at one time point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// `drone-<id>` as written in the sheet
    pub drone_id: String,

    /// Dense index of `time_label`
    #[serde(rename = "timePoint")]
    pub time_point_index: usize,

    /// Time point label, e.g. `TP3`
    pub time_label: String,

    pub swarm_id: String,
    pub swarm_label: String,

    /// `none` without a task, otherwise the state slug
    pub task_id: String,
    pub task_label: String,

    /// Normalized state slug, e.g. `return-to-base`
    pub state: String,
    /// State text as written in the sheet
    pub state_label: String,

    pub position: Vec3,
    pub velocity: Vec3,
    pub orientation: Orientation,

    pub battery_percentage: f64,

    /// Detection radius, rescaled with the x/z footprint
    pub detection_range: f64,
}

impl Record {
    /// Numeric part of the drone id, without leading zeros
    /// (`drone-12` -> `"12"`, `drone--3` -> `"3"`, `drone-007` -> `"7"`).
    ///
    /// Ids without trailing digits read as `"0"`. Compare with
    /// [`compare_digits`]; the value may exceed every integer type.
    pub fn drone_number(&self) -> &str {
        let digits_start = self
            .drone_id
            .rfind(|c: char| !c.is_ascii_digit())
            .map(|i| i + 1)
            .unwrap_or(0);
        match self.drone_id[digits_start..].trim_start_matches('0') {
            "" => "0",
            digits => digits,
        }
    }
}

/// Numeric order of two ASCII digit runs without leading zeros.
pub fn compare_digits(a: &str, b: &str) -> Ordering {
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(drone_id: &str) -> Record {
        Record {
            drone_id: drone_id.to_string(),
            time_point_index: 0,
            time_label: "TP1".to_string(),
            swarm_id: "none".to_string(),
            swarm_label: "No Swarm".to_string(),
            task_id: "none".to_string(),
            task_label: "No Task".to_string(),
            state: "idle".to_string(),
            state_label: "Idle".to_string(),
            position: Vec3::default(),
            velocity: Vec3::default(),
            orientation: Orientation::default(),
            battery_percentage: 0.0,
            detection_range: 0.0,
        }
    }

    #[test]
    fn test_drone_number() {
        assert_eq!(record("drone-12").drone_number(), "12");
        assert_eq!(record("drone--3").drone_number(), "3");
        assert_eq!(record("drone-1-07").drone_number(), "7");
        assert_eq!(record("drone-000").drone_number(), "0");
        assert_eq!(record("drone-").drone_number(), "0");
        assert_eq!(
            record("drone-123456789012345678901").drone_number(),
            "123456789012345678901"
        );
    }

    #[test]
    fn test_compare_digits() {
        assert_eq!(compare_digits("5", "10"), Ordering::Less);
        assert_eq!(compare_digits("10", "9"), Ordering::Greater);
        assert_eq!(compare_digits("42", "42"), Ordering::Equal);
        assert_eq!(
            compare_digits("18446744073709551616", "18446744073709551615"),
            Ordering::Greater
        );
        assert_eq!(compare_digits("0", "123456789012345678901"), Ordering::Less);
    }

    #[test]
    fn test_json_field_names() {
        let json = serde_json::to_value(record("drone-4")).unwrap();
        assert_eq!(json["droneId"], "drone-4");
        assert_eq!(json["timePoint"], 0);
        assert_eq!(json["timeLabel"], "TP1");
        assert_eq!(json["stateLabel"], "Idle");
        assert_eq!(json["batteryPercentage"], 0.0);
        assert_eq!(json["detectionRange"], 0.0);
        assert_eq!(json["orientation"]["yaw"], 0.0);
        assert_eq!(json["position"]["z"], 0.0);
    }
}
