//! Group discovery, compatibility checks, and the row-merge fold.

use std::collections::HashMap;

use tracing::{debug, warn};

use rc_common::{ChartError, Result};
use rc_store::{ChartDescriptor, ChartStore};

use crate::table::{MergedChart, MergedRow};

/// Partition descriptors by group key, preserving first-seen group order and
/// the input order of members within each group.
pub fn plan_groups(descriptors: &[ChartDescriptor]) -> Vec<(String, Vec<&ChartDescriptor>)> {
    let mut order: Vec<String> = Vec::new();
    let mut by_group: HashMap<String, Vec<&ChartDescriptor>> = HashMap::new();

    for descriptor in descriptors {
        let members = by_group.entry(descriptor.group().to_string()).or_default();
        if members.is_empty() {
            order.push(descriptor.group().to_string());
        }
        members.push(descriptor);
    }

    order
        .into_iter()
        .map(|group| {
            let members = by_group.remove(&group).unwrap_or_default();
            (group, members)
        })
        .collect()
}

/// Result of merging one group: the combined chart plus the members that
/// were excluded for structural incompatibility.
#[derive(Debug)]
pub struct GroupMerge {
    pub chart: MergedChart,
    /// `IncompatibleGroup` entries for excluded members; non-fatal.
    pub excluded: Vec<ChartError>,
}

/// Outcome of merging every group of a scan.
///
/// Per-group failures never abort the other groups; they are collected here
/// so the caller can decide what to retry.
#[derive(Debug, Default)]
pub struct MergeReport {
    pub merged: Vec<MergedChart>,
    /// Members dropped from an otherwise-merged group (axis kind mismatch).
    pub incompatible: Vec<ChartError>,
    /// Groups whose merge failed outright, e.g. a data file still open.
    pub failed: Vec<(String, ChartError)>,
}

impl MergeReport {
    /// True when every group merged and no member was excluded.
    pub fn is_clean(&self) -> bool {
        self.incompatible.is_empty() && self.failed.is_empty()
    }
}

/// Merge one group of descriptors into a single combined table.
///
/// The first member's axis kind is canonical; members with a different axis
/// kind are excluded and reported, not fatal. Rows combine on exact
/// axis-value equality when the column slots they fill are disjoint;
/// conflicting rows stay standalone. A zero- or one-member group passes
/// through unchanged. Source files are only read, never modified.
pub fn merge_group(store: &ChartStore, members: &[&ChartDescriptor]) -> Result<GroupMerge> {
    let canonical = members
        .first()
        .ok_or_else(|| ChartError::InvalidState("cannot merge an empty group".into()))?;
    let axis_type = canonical.axis_type();

    let mut compatible = Vec::new();
    let mut excluded = Vec::new();
    for member in members {
        if member.axis_type() == axis_type {
            compatible.push(*member);
        } else {
            warn!(
                group = canonical.group(),
                base_name = member.base_name(),
                "excluding chart with mismatched axis kind"
            );
            excluded.push(ChartError::IncompatibleGroup {
                group: canonical.group().to_string(),
                base_name: member.base_name().to_string(),
                expected: axis_type,
                actual: member.axis_type(),
            });
        }
    }

    // Union of attribute columns in first-seen order, plus each member's
    // mapping from its own column positions into the combined table.
    let mut columns: Vec<String> = Vec::new();
    let mut slot_maps: Vec<Vec<usize>> = Vec::new();
    for member in &compatible {
        let mut slots = Vec::with_capacity(member.attributes().len());
        for attribute in member.attributes() {
            let idx = match columns.iter().position(|c| c == attribute) {
                Some(idx) => idx,
                None => {
                    columns.push(attribute.clone());
                    columns.len() - 1
                }
            };
            slots.push(idx);
        }
        slot_maps.push(slots);
    }

    let mut rows: Vec<MergedRow> = Vec::new();
    let mut occupied: Vec<Vec<bool>> = Vec::new();
    let mut by_axis: HashMap<u64, Vec<usize>> = HashMap::new();

    for (member, slots) in compatible.iter().zip(&slot_maps) {
        for row in store.read_rows(member)? {
            // A member's row claims all of that member's column slots, so
            // two rows merge only when their slot sets are disjoint.
            let target = by_axis
                .get(&row.axis_value)
                .and_then(|candidates| {
                    candidates
                        .iter()
                        .copied()
                        .find(|&idx| slots.iter().all(|&slot| !occupied[idx][slot]))
                });

            match target {
                Some(idx) => {
                    for (&slot, value) in slots.iter().zip(&row.values) {
                        rows[idx].values[slot] = *value;
                        occupied[idx][slot] = true;
                    }
                }
                None => {
                    let mut values = vec![None; columns.len()];
                    let mut taken = vec![false; columns.len()];
                    for (&slot, value) in slots.iter().zip(&row.values) {
                        values[slot] = *value;
                        taken[slot] = true;
                    }
                    rows.push(MergedRow {
                        axis_value: row.axis_value,
                        values,
                    });
                    occupied.push(taken);
                    by_axis
                        .entry(row.axis_value)
                        .or_default()
                        .push(rows.len() - 1);
                }
            }
        }
    }

    // Stable: equal axis values keep their per-file insertion order.
    rows.sort_by_key(|row| row.axis_value);

    debug!(
        group = canonical.group(),
        members = compatible.len(),
        excluded = excluded.len(),
        rows = rows.len(),
        "group merged"
    );

    Ok(GroupMerge {
        chart: MergedChart {
            group: canonical.group().to_string(),
            name: canonical.name().to_string(),
            x_axis: canonical.x_axis().to_string(),
            y_axis: canonical.y_axis().to_string(),
            axis_type,
            columns,
            rows,
            sources: compatible.iter().map(|m| m.base_name().to_string()).collect(),
        },
        excluded,
    })
}

/// Merge every group found among `descriptors`.
///
/// One group's failure is recorded and the remaining groups still merge;
/// unprocessed source files stay untouched for a later retry.
pub fn merge_all(store: &ChartStore, descriptors: &[ChartDescriptor]) -> MergeReport {
    let mut report = MergeReport::default();
    for (group, members) in plan_groups(descriptors) {
        match merge_group(store, &members) {
            Ok(outcome) => {
                report.merged.push(outcome.chart);
                report.incompatible.extend(outcome.excluded);
            }
            Err(err) => {
                warn!(group, %err, "group merge failed");
                report.failed.push((group, err));
            }
        }
    }
    report
}
