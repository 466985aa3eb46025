//! Swarm code lookup.

use std::collections::BTreeMap;

/// A resolved swarm: slug used as a key plus its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swarm {
    pub id: &'static str,
    pub label: &'static str,
}

/// Swarm for blank, `-1`, `0` and unknown codes.
pub const NO_SWARM: Swarm = Swarm {
    id: "none",
    label: "No Swarm",
};

/// Sheet `SwarmID` code -> swarm.
pub const SWARM_TABLE: [(&str, Swarm); 7] = [
    ("-1", NO_SWARM),
    ("0", NO_SWARM),
    ("1", Swarm { id: "alpha", label: "Alpha" }),
    ("2", Swarm { id: "beta", label: "Beta" }),
    ("3", Swarm { id: "gamma", label: "Gamma" }),
    ("4", Swarm { id: "delta", label: "Delta" }),
    ("5", Swarm { id: "epsilon", label: "Epsilon" }),
];

/// Resolve a `SwarmID` cell. Blank means `-1`.
pub fn resolve_swarm(code: &str) -> Swarm {
    let code = match code.trim() {
        "" => "-1",
        other => other,
    };
    SWARM_TABLE
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, swarm)| *swarm)
        .unwrap_or(NO_SWARM)
}

/// Code -> display label for every entry of [`SWARM_TABLE`].
pub fn swarm_labels() -> BTreeMap<String, String> {
    SWARM_TABLE
        .iter()
        .map(|(code, swarm)| (code.to_string(), swarm.label.to_string()))
        .collect()
}
