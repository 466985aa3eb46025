//! Assembly of the final dataset.

use crate::model::{compare_digits, swarm_labels, BoundingBox, Dataset, Metadata, Record};
use crate::timeline::TimePointIndex;
use std::collections::{BTreeMap, HashSet};

/// Occurrences of each distinct key.
fn count_by<'a>(
    records: &'a [Record],
    key: impl Fn(&'a Record) -> &'a str,
) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(key(record).to_string()).or_insert(0) += 1;
    }
    counts
}

/// Order records by drone number, then time point index.
///
/// Drone numbers of any length compare numerically. The sort is stable:
/// duplicate observations keep their sheet order.
pub fn sort_records(records: &mut [Record]) {
    records.sort_by(|a, b| {
        compare_digits(a.drone_number(), b.drone_number())
            .then(a.time_point_index.cmp(&b.time_point_index))
    });
}

/// Build the dataset from normalized records.
pub fn assemble(mut records: Vec<Record>, time_points: &TimePointIndex) -> Dataset {
    sort_records(&mut records);

    let bounding_box = BoundingBox::enclosing(records.iter().map(|r| r.position))
        .unwrap_or(BoundingBox::FALLBACK);

    let total_drones = records
        .iter()
        .map(|r| r.drone_id.as_str())
        .collect::<HashSet<_>>()
        .len();

    let metadata = Metadata {
        total_drones,
        total_time_points: time_points.len(),
        swarm_counts: count_by(&records, |r| r.swarm_id.as_str()),
        task_counts: count_by(&records, |r| r.task_id.as_str()),
        state_counts: count_by(&records, |r| r.state.as_str()),
        bounding_box,
        swarm_labels: swarm_labels(),
    };

    Dataset {
        time_points: (0..time_points.len()).collect(),
        time_point_labels: time_points.labels().to_vec(),
        records,
        metadata,
    }
}
