//! Rescaling of positions into the canonical footprint.

use crate::model::Record;

/// Width and depth of the canonical footprint.
pub const CANONICAL_SPAN: f64 = 100.0;

/// Smallest span divided by, so a single point or a line does not divide
/// by zero.
pub const NORMALIZATION_EPSILON: f64 = 1e-6;

/// Affine map from raw x/z coordinates onto `0..=CANONICAL_SPAN`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Footprint {
    pub min_x: f64,
    pub min_z: f64,
    pub scale_x: f64,
    pub scale_z: f64,
}

impl Footprint {
    /// Fit the footprint to the raw x/z extent of `records`.
    ///
    /// Returns `None` for an empty slice.
    pub fn fit(records: &[Record]) -> Option<Self> {
        let first = records.first()?;
        let init = (
            first.position.x,
            first.position.x,
            first.position.z,
            first.position.z,
        );
        let (min_x, max_x, min_z, max_z) =
            records
                .iter()
                .fold(init, |(min_x, max_x, min_z, max_z), r| {
                    (
                        min_x.min(r.position.x),
                        max_x.max(r.position.x),
                        min_z.min(r.position.z),
                        max_z.max(r.position.z),
                    )
                });

        let span_x = (max_x - min_x).max(NORMALIZATION_EPSILON);
        let span_z = (max_z - min_z).max(NORMALIZATION_EPSILON);

        Some(Self {
            min_x,
            min_z,
            scale_x: CANONICAL_SPAN / span_x,
            scale_z: CANONICAL_SPAN / span_z,
        })
    }

    /// Factor applied to detection radii: the mean of the axis scales.
    pub fn detection_scale(&self) -> f64 {
        (self.scale_x + self.scale_z) / 2.0
    }

    /// Rescale one record in place. `y` is left as is.
    pub fn apply(&self, record: &mut Record) {
        record.position.x = (record.position.x - self.min_x) * self.scale_x;
        record.position.z = (record.position.z - self.min_z) * self.scale_z;
        record.detection_range *= self.detection_scale();
    }
}

/// Fit a footprint to `records` and rescale them all.
///
/// Returns the rescaled records with the footprint used, if any.
pub fn normalize(mut records: Vec<Record>) -> (Vec<Record>, Option<Footprint>) {
    let footprint = Footprint::fit(&records);
    if let Some(footprint) = footprint {
        records.iter_mut().for_each(|r| footprint.apply(r));
        log::debug!(
            "normalized {} records: scale x {:.6}, scale z {:.6}",
            records.len(),
            footprint.scale_x,
            footprint.scale_z
        );
    }
    (records, footprint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Orientation, Vec3};

    fn at(x: f64, y: f64, z: f64, range: f64) -> Record {
        Record {
            drone_id: "drone-1".to_string(),
            time_point_index: 0,
            time_label: "TP1".to_string(),
            swarm_id: "none".to_string(),
            swarm_label: "No Swarm".to_string(),
            task_id: "none".to_string(),
            task_label: "No Task".to_string(),
            state: "idle".to_string(),
            state_label: "Idle".to_string(),
            position: Vec3::new(x, y, z),
            velocity: Vec3::default(),
            orientation: Orientation::default(),
            battery_percentage: 100.0,
            detection_range: range,
        }
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_extremes_attained() {
        let (records, _) = normalize(vec![
            at(-50.0, 3.0, 10.0, 1.0),
            at(150.0, 7.0, 20.0, 1.0),
            at(50.0, 9.0, 15.0, 1.0),
        ]);

        let xs: Vec<f64> = records.iter().map(|r| r.position.x).collect();
        let zs: Vec<f64> = records.iter().map(|r| r.position.z).collect();
        assert!(close(xs[0], 0.0) && close(xs[1], 100.0) && close(xs[2], 50.0));
        assert!(close(zs[0], 0.0) && close(zs[1], 100.0) && close(zs[2], 50.0));
        assert_eq!(records[2].position.y, 9.0);
    }

    #[test]
    fn test_detection_scale() {
        // scale x = 100 / 200, scale z = 100 / 10
        let (records, footprint) = normalize(vec![
            at(0.0, 0.0, 0.0, 2.0),
            at(200.0, 0.0, 10.0, 4.0),
        ]);
        let footprint = footprint.unwrap();
        assert!(close(footprint.detection_scale(), 5.25));
        assert!(close(records[0].detection_range, 10.5));
        assert!(close(records[1].detection_range, 21.0));
    }

    #[test]
    fn test_degenerate_extent() {
        let (records, footprint) = normalize(vec![at(5.0, 1.0, 5.0, 1.0), at(5.0, 2.0, 5.0, 1.0)]);
        let footprint = footprint.unwrap();
        assert!((footprint.scale_x - 1e8).abs() < 1.0);
        assert!(records.iter().all(|r| r.position.x == 0.0 && r.position.z == 0.0));
        assert!(records.iter().all(|r| r.detection_range.is_finite()));
    }

    #[test]
    fn test_empty() {
        let (records, footprint) = normalize(Vec::new());
        assert!(records.is_empty());
        assert!(footprint.is_none());
    }
}
