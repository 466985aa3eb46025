//! Dataset model structures.

use super::{Record, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Axis-aligned bounds of the normalized positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl BoundingBox {
    /// Bounds reported when there are no records: the canonical x/z
    /// footprint on the ground plane.
    pub const FALLBACK: BoundingBox = BoundingBox {
        min: Vec3::new(0.0, 0.0, 0.0),
        max: Vec3::new(100.0, 0.0, 100.0),
    };

    /// Tightest box around `points`, or `None` when there are none.
    pub fn enclosing(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        points.into_iter().fold(None, |acc, p| {
            Some(match acc {
                None => BoundingBox { min: p, max: p },
                Some(b) => BoundingBox {
                    min: Vec3::new(b.min.x.min(p.x), b.min.y.min(p.y), b.min.z.min(p.z)),
                    max: Vec3::new(b.max.x.max(p.x), b.max.y.max(p.y), b.max.z.max(p.z)),
                },
            })
        })
    }
}

/// Dataset-level summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    /// Distinct drone ids
    pub total_drones: usize,

    /// Distinct time point labels
    pub total_time_points: usize,

    /// Records per swarm id
    pub swarm_counts: BTreeMap<String, usize>,

    /// Records per task id
    pub task_counts: BTreeMap<String, usize>,

    /// Records per state slug
    pub state_counts: BTreeMap<String, usize>,

    /// Bounds of the normalized positions
    pub bounding_box: BoundingBox,

    /// Swarm code -> display label, for every known code
    pub swarm_labels: BTreeMap<String, String>,
}

/// The finished, normalized dataset handed to the output stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    /// Time point indices, ascending
    pub time_points: Vec<usize>,

    /// Label of each index in `time_points`
    pub time_point_labels: Vec<String>,

    /// Records ordered by drone number, then time point
    #[serde(rename = "drones")]
    pub records: Vec<Record>,

    pub metadata: Metadata,
}

impl Dataset {
    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no row was accepted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records of one drone, in time order.
    pub fn drone(&self, drone_id: &str) -> impl Iterator<Item = &Record> + '_ {
        let drone_id = drone_id.to_string();
        self.records.iter().filter(move |r| r.drone_id == drone_id)
    }

    /// Records observed at one time point index.
    pub fn at_time_point(&self, index: usize) -> impl Iterator<Item = &Record> + '_ {
        self.records
            .iter()
            .filter(move |r| r.time_point_index == index)
    }
}
