//! Route-level comparison of two network models.
//!
//! For every line in the build network we look up the same-named line in
//! the base network. Matching is by name only, so a renamed route shows up
//! as an independent add and remove. Frequency is derived generically
//! (HEADWAY\[n\] or FREQ\[n\]) and a difference is reported in seconds;
//! all other scalar attributes compare by map equality per key. Node
//! sequences are surfaced as a shape-changed flag plus both raw sequences,
//! with no node-level diff.

use crate::model::Line;
use crate::network::NetworkModel;
use serde::Serialize;

/// One reported difference on a matched route. A frequency difference
/// carries `change` (seconds, build minus base); any other attribute
/// difference carries `set` with the build-side value, absent when the
/// attribute was removed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyChange {
    pub property: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteComparison {
    /// present in build only; downstream may treat it as a new route.
    BuildOnly { name: String },
    Matched {
        name: String,
        property_changes: Vec<PropertyChange>,
        shape_changed: bool,
        base_nodes: Vec<i64>,
        build_nodes: Vec<i64>,
    },
}

/// Compare `build` against `base`, one comparison per build-side line.
pub fn diff(base: &NetworkModel, build: &NetworkModel) -> Vec<RouteComparison> {
    let mut comparisons = Vec::new();
    for build_line in build.line_iter() {
        match base.line(&build_line.name) {
            None => comparisons.push(RouteComparison::BuildOnly {
                name: build_line.name.clone(),
            }),
            Some(base_line) => {
                let base_nodes: Vec<i64> = base_line.nodes.iter().map(|n| n.num).collect();
                let build_nodes: Vec<i64> = build_line.nodes.iter().map(|n| n.num).collect();
                comparisons.push(RouteComparison::Matched {
                    name: build_line.name.clone(),
                    property_changes: compare_lines(base_line, build_line),
                    shape_changed: base_nodes != build_nodes,
                    base_nodes,
                    build_nodes,
                });
            }
        }
    }
    comparisons
}

fn compare_lines(base: &Line, build: &Line) -> Vec<PropertyChange> {
    let mut changes = Vec::new();

    let base_freq = base.frequencies();
    let build_freq = build.frequencies();
    for (b, n) in base_freq.iter().zip(build_freq.iter()) {
        if (b - n).abs() > f64::EPSILON {
            changes.push(PropertyChange {
                property: "headway_secs".to_string(),
                change: Some((n - b) * 60.0),
                set: None,
            });
        }
    }

    // the frequency pass above reads exactly HEADWAY[n] / FREQ[n]; other
    // keys that merely share the prefix go through the generic pass
    let is_freq_key = |key: &str| {
        key.strip_prefix("HEADWAY")
            .or_else(|| key.strip_prefix("FREQ"))
            .and_then(|rest| rest.strip_prefix('['))
            .and_then(|rest| rest.strip_suffix(']'))
            .is_some_and(|idx| !idx.is_empty() && idx.bytes().all(|b| b.is_ascii_digit()))
    };
    for (key, base_val) in base.attrs.iter() {
        if is_freq_key(key) {
            continue;
        }
        let build_val = build.attrs.get(key);
        if build_val != Some(base_val) {
            changes.push(PropertyChange {
                property: key.to_string(),
                change: None,
                set: build_val.map(str::to_string),
            });
        }
    }
    for (key, build_val) in build.attrs.iter() {
        if is_freq_key(key) || base.attrs.contains(key) {
            continue;
        }
        changes.push(PropertyChange {
            property: key.to_string(),
            change: None,
            set: Some(build_val.to_string()),
        });
    }

    changes
}
