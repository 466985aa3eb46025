//! Dense indexing of time point labels.

use crate::model::compare_digits;
use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

/// Bijection between time point labels and `0..n`.
///
/// Labels of the form `TP<digits>` (prefix in any case) are ordered by their
/// number and come before all other labels, which are ordered as strings.
/// Labels with the same number (`TP1`, `tp01`) are ordered as strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimePointIndex {
    labels: Vec<String>,
    positions: HashMap<String, usize>,
}

impl TimePointIndex {
    /// Build the index over every distinct label in `labels`.
    pub fn build<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let distinct: BTreeSet<String> = labels
            .into_iter()
            .map(|l| l.as_ref().trim().to_string())
            .collect();

        let mut labels: Vec<String> = distinct.into_iter().collect();
        labels.sort_by(|a, b| compare_labels(a, b));

        let positions = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i))
            .collect();

        Self { labels, positions }
    }

    /// Index of `label`, if it was part of the build set.
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.positions.get(label.trim()).copied()
    }

    /// Label at `index`.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    /// Labels in index order.
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// Number of distinct labels.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Digits of a `TP<digits>` label, leading zeros stripped.
fn tp_number(label: &str) -> Option<&str> {
    let prefix = label.get(..2)?;
    let digits = &label[2..];
    if !prefix.eq_ignore_ascii_case("tp")
        || digits.is_empty()
        || !digits.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }
    match digits.trim_start_matches('0') {
        "" => Some("0"),
        digits => Some(digits),
    }
}

fn compare_labels(a: &str, b: &str) -> Ordering {
    match (tp_number(a), tp_number(b)) {
        (Some(x), Some(y)) => compare_digits(x, y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    }
}
